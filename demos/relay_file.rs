//! File relay example.
//!
//! Run with:
//!     cargo run --example relay_file -- /path/to/file

use std::env;
use std::io;

use teehash::{Relay, RelayConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    eprintln!("Relaying file: {}\n", path);

    let relay = Relay::new(RelayConfig::default().with_read_size(32 * 1024));
    let report = relay.run_path(&path, io::stdout().lock())?;

    eprintln!("\nContent-Type: {}", report.content_type());
    eprintln!(
        "Total: {} bytes, {}={}",
        report.bytes,
        report.digest.algorithm(),
        report.digest.to_hex()
    );

    Ok(())
}
