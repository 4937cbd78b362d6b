use anyhow::{Context, Result};
use clap::Parser;
use powchain_core::{Chain, SealConfig};
use std::{io, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_PAYLOADS: [&str; 2] = ["Send 12 doge to Aryan", "Send 3 more doge to Sai"];

#[derive(Parser, Debug)]
#[command(name = "powchain")]
#[command(about = "Seal a small proof-of-work chain and print every block")]
struct Cli {
    /// TOML file with `difficulty_bits`, `max_attempts` and `parallel`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leading zero bits required in each block hash
    #[arg(long)]
    difficulty: Option<u32>,

    /// Stop searching after this many nonces per block
    #[arg(long)]
    max_attempts: Option<u64>,

    /// Search nonces on all cores
    #[arg(long)]
    parallel: bool,

    /// Print the chain as a JSON array instead of text
    #[arg(long)]
    json: bool,

    /// Payloads to append after the genesis block
    payloads: Vec<String>,
}

impl Cli {
    fn seal_config(&self) -> Result<SealConfig> {
        let mut config = match &self.config {
            Some(path) => SealConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => SealConfig::default(),
        };
        if let Some(bits) = self.difficulty {
            config = config.with_difficulty(bits);
        }
        if let Some(max) = self.max_attempts {
            config = config.with_max_attempts(max);
        }
        if self.parallel {
            config = config.with_parallel(true);
        }
        config.target().context("invalid difficulty")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.seal_config()?;
    info!(
        "Sealing at difficulty {} bits (parallel: {})",
        config.difficulty_bits, config.parallel
    );

    let mut chain = Chain::with_config(config).context("sealing genesis block")?;
    if cli.payloads.is_empty() {
        for payload in DEFAULT_PAYLOADS {
            chain.append(payload)?;
        }
    } else {
        for payload in &cli.payloads {
            chain.append(payload.as_str())?;
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(chain.blocks())?);
    } else {
        chain.dump(io::stdout().lock())?;
    }
    Ok(())
}
