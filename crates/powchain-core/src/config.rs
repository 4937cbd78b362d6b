use crate::{
    constants::POW_TARGET_DIFFICULTY,
    error::{ChainError, Result},
    pow::Target,
};
use serde::Deserialize;
use std::{fs, path::Path};

/// Sealing parameters shared by every block of a chain.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SealConfig {
    /// Leading zero bits required in a block hash.
    #[serde(default = "default_difficulty_bits")]
    pub difficulty_bits: u32,
    /// Give up after this many nonces. `None` searches the whole nonce space.
    #[serde(default)]
    pub max_attempts: Option<u64>,
    /// Split the nonce search across the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_difficulty_bits() -> u32 {
    POW_TARGET_DIFFICULTY
}

impl Default for SealConfig {
    fn default() -> Self {
        Self {
            difficulty_bits: default_difficulty_bits(),
            max_attempts: None,
            parallel: false,
        }
    }
}

impl SealConfig {
    pub fn with_difficulty(mut self, difficulty_bits: u32) -> Self {
        self.difficulty_bits = difficulty_bits;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn target(&self) -> Result<Target> {
        Target::from_difficulty(self.difficulty_bits)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ChainError::Config(e.to_string()))?;
        config.target()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| ChainError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reproduces_reference_difficulty() {
        let config = SealConfig::default();
        assert_eq!(config.difficulty_bits, 24);
        assert_eq!(config.max_attempts, None);
        assert!(!config.parallel);
    }

    #[test]
    fn toml_fields_fall_back_to_defaults() {
        let config = SealConfig::from_toml_str("parallel = true").unwrap();
        assert_eq!(config, SealConfig::default().with_parallel(true));

        let config = SealConfig::from_toml_str("difficulty_bits = 12\nmax_attempts = 500").unwrap();
        assert_eq!(config.difficulty_bits, 12);
        assert_eq!(config.max_attempts, Some(500));
    }

    #[test]
    fn toml_rejects_bad_input() {
        assert!(matches!(
            SealConfig::from_toml_str("difficulty_bits = \"lots\""),
            Err(ChainError::Config(_))
        ));
        assert_eq!(
            SealConfig::from_toml_str("difficulty_bits = 300"),
            Err(ChainError::InvalidDifficulty(300))
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SealConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ChainError::Config(msg) if msg.contains("not/here.toml")));
    }
}
