#![no_main]

use libfuzzer_sys::fuzz_target;
use teehash::{Relay, RelayConfig, Sha1Accumulator};

fuzz_target!(|input: (u16, Vec<u8>)| {
    let (read_size, data) = input;
    let config = RelayConfig::default()
        .with_boundary("fuzz-boundary")
        .with_read_size(read_size as usize + 1);

    let mut out = Vec::new();
    let report = Relay::new(config).run("fuzz.bin", &data[..], &mut out).unwrap();

    // Verify: digest matches one-shot hashing
    assert_eq!(report.digest, Sha1Accumulator::digest(&data));
    assert_eq!(report.bytes, data.len() as u64);

    // Verify: envelope ends with exactly one terminator, after the digest field
    let tail = format!("{}\r\n--fuzz-boundary--\r\n", report.digest);
    assert!(out.ends_with(tail.as_bytes()));

    // Verify: the body appears verbatim after the first header block
    let head_end = out.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
    assert_eq!(&out[head_end..head_end + data.len()], &data[..]);
});
