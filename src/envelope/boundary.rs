//! Boundary generation and validation (RFC 2046 §5.1.1).

use rand::RngCore;

use crate::error::{RelayError, Result};

/// Longest boundary RFC 2046 allows.
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Random bytes per generated boundary; hex-encoded to twice this length.
const RANDOM_BOUNDARY_BYTES: usize = 30;

/// Generates a fresh 60-character hex boundary.
pub fn random_boundary() -> String {
    let mut bytes = [0u8; RANDOM_BOUNDARY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Checks that `boundary` may be used as a multipart delimiter.
pub fn validate_boundary(boundary: &str) -> Result<()> {
    let reject = |reason| {
        Err(RelayError::InvalidBoundary {
            boundary: boundary.to_string(),
            reason,
        })
    };

    if boundary.is_empty() {
        return reject("boundary must not be empty");
    }
    if boundary.len() > MAX_BOUNDARY_LEN {
        return reject("boundary longer than 70 characters");
    }
    if boundary.ends_with(' ') {
        return reject("boundary must not end with a space");
    }
    if !boundary.bytes().all(is_bchar) {
        return reject("boundary contains a character outside bchars");
    }
    Ok(())
}

fn is_bchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"'()+_,-./:=? ".contains(&b)
}

/// `Content-Type` value for a form-data envelope using `boundary`.
///
/// The boundary is quoted when it contains tspecials or a space.
pub fn form_data_content_type(boundary: &str) -> String {
    if boundary.bytes().any(|b| b"()<>@,;:\\\"/[]?= ".contains(&b)) {
        format!("multipart/form-data; boundary=\"{}\"", boundary)
    } else {
        format!("multipart/form-data; boundary={}", boundary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_boundary_shape() {
        let b = random_boundary();
        assert_eq!(b.len(), 60);
        assert!(b.bytes().all(|c| c.is_ascii_hexdigit()));
        validate_boundary(&b).unwrap();
    }

    #[test]
    fn test_random_boundaries_differ() {
        assert_ne!(random_boundary(), random_boundary());
    }

    #[test]
    fn test_validate_rejects() {
        assert!(validate_boundary("").is_err());
        assert!(validate_boundary(&"a".repeat(71)).is_err());
        assert!(validate_boundary("ends with space ").is_err());
        assert!(validate_boundary("semi;colon").is_err());
        assert!(validate_boundary("line\r\nbreak").is_err());
    }

    #[test]
    fn test_validate_accepts() {
        validate_boundary(&"a".repeat(70)).unwrap();
        validate_boundary("MyBoundary").unwrap();
        validate_boundary("with space and (parens)").unwrap();
    }

    #[test]
    fn test_content_type_quotes_specials() {
        assert_eq!(
            form_data_content_type("abc123"),
            "multipart/form-data; boundary=abc123"
        );
        assert_eq!(
            form_data_content_type("a b"),
            "multipart/form-data; boundary=\"a b\""
        );
        assert_eq!(
            form_data_content_type("a=b"),
            "multipart/form-data; boundary=\"a=b\""
        );
    }
}
