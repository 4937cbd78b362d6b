pub const BYTE: usize = 8;
pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const HASH_BITS: u32 = (HASH_SIZE * BYTE) as u32;
pub const POW_TARGET_DIFFICULTY: u32 = 24;
pub const GENESIS_DATA: &[u8] = b"Genesis Block";
pub const PARALLEL_SEAL_WINDOW: u64 = 1 << 16;
