//! `teehash` command-line entry point.
//!
//! Writes the envelope to stdout and logs to stderr.

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use teehash::{DEFAULT_READ_SIZE, DigestAlgorithm, Relay, RelayConfig};

/// Stream a file into a multipart envelope with its digest attached.
#[derive(Debug, Parser)]
#[command(name = "teehash", version, about)]
struct Cli {
    /// File to relay.
    #[arg(default_value = "data.json")]
    path: PathBuf,

    /// Digest algorithm (sha1, blake3).
    #[arg(short, long, default_value_t = DigestAlgorithm::Sha1)]
    algorithm: DigestAlgorithm,

    /// Fixed multipart boundary instead of a random one.
    #[arg(short, long)]
    boundary: Option<String>,

    /// Bytes per read from the source.
    #[arg(long, default_value_t = DEFAULT_READ_SIZE)]
    read_size: usize,
}

impl Cli {
    fn config(&self) -> RelayConfig {
        let config = RelayConfig::default()
            .with_algorithm(self.algorithm)
            .with_read_size(self.read_size);
        match &self.boundary {
            Some(boundary) => config.with_boundary(boundary.clone()),
            None => config,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let relay = Relay::new(cli.config());

    let stdout = io::stdout();
    let report = relay
        .run_path(&cli.path, BufWriter::new(stdout.lock()))
        .with_context(|| format!("relay {}", cli.path.display()))?;

    tracing::info!(
        filename = %report.filename,
        bytes = report.bytes,
        digest = %report.digest,
        content_type = %report.content_type(),
        "envelope written"
    );
    Ok(())
}
