//! Basic tee example: hash while copying, then build the envelope by hand.
//!
//! Run with:
//!     cargo run --example relay_basic

use std::io::Write;

use teehash::{MultipartWriter, Sha1Accumulator, TeeReader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data = br#"{"name": "teehash", "kind": "demo"}"#;

    let mut envelope = MultipartWriter::with_boundary(Vec::new(), "demo-boundary")?;
    let mut tee = TeeReader::new(&data[..], Sha1Accumulator::new());

    {
        let mut part = envelope.create_form_file("file", "data.json")?;
        for (i, chunk) in tee.chunks(8).enumerate() {
            let chunk = chunk?;
            println!("chunk {}: {} bytes", i, chunk.len());
            part.write_all(&chunk)?;
        }
    }

    let digest = tee.finalize()?;
    envelope.write_field("sha1", &digest.to_hex())?;
    let out = envelope.finish()?;

    println!("\n{}", String::from_utf8_lossy(&out));
    Ok(())
}
