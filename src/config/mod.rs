//! Configuration for relay runs.
//!
//! - [`RelayConfig`] - read size, digest algorithm, field names, boundary
//!
//! # Example
//!
//! ```
//! use teehash::{DigestAlgorithm, RelayConfig};
//!
//! let config = RelayConfig::default()
//!     .with_read_size(64 * 1024)
//!     .with_algorithm(DigestAlgorithm::Sha1)
//!     .with_boundary("fixed-boundary");
//! config.validate()?;
//!
//! assert_eq!(config.digest_field(), "sha1");
//! # Ok::<(), teehash::RelayError>(())
//! ```

use crate::envelope::validate_boundary;
use crate::error::{RelayError, Result};
use crate::hash::DigestAlgorithm;

/// Default size of each read from the source (8 KiB).
pub const DEFAULT_READ_SIZE: usize = 8 * 1024;

/// Largest accepted read size (16 MiB).
pub const MAX_READ_SIZE: usize = 16 * 1024 * 1024;

/// Default name of the body part.
pub const DEFAULT_FILE_FIELD: &str = "file";

/// Configuration for a [`Relay`](crate::Relay).
///
/// The digest field defaults to the algorithm name (`"sha1"`), and the boundary
/// defaults to a fresh random one per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    read_size: usize,
    algorithm: DigestAlgorithm,
    file_field: String,
    digest_field: Option<String>,
    boundary: Option<String>,
}

impl RelayConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            read_size: DEFAULT_READ_SIZE,
            algorithm: DigestAlgorithm::default(),
            file_field: DEFAULT_FILE_FIELD.to_string(),
            digest_field: None,
            boundary: None,
        }
    }

    /// Sets the size of each read from the source.
    pub fn with_read_size(mut self, size: usize) -> Self {
        self.read_size = size;
        self
    }

    /// Sets the digest algorithm.
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the name of the body part.
    pub fn with_file_field(mut self, field: impl Into<String>) -> Self {
        self.file_field = field.into();
        self
    }

    /// Sets the name of the digest field.
    pub fn with_digest_field(mut self, field: impl Into<String>) -> Self {
        self.digest_field = Some(field.into());
        self
    }

    /// Uses a fixed boundary instead of a random one.
    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Returns the read size.
    pub fn read_size(&self) -> usize {
        self.read_size
    }

    /// Returns the digest algorithm.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Returns the name of the body part.
    pub fn file_field(&self) -> &str {
        &self.file_field
    }

    /// Returns the digest field name, defaulting to the algorithm name.
    pub fn digest_field(&self) -> &str {
        self.digest_field
            .as_deref()
            .unwrap_or_else(|| self.algorithm.name())
    }

    /// Returns the fixed boundary, if set.
    pub fn boundary(&self) -> Option<&str> {
        self.boundary.as_deref()
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<()> {
        if self.read_size == 0 {
            return Err(RelayError::InvalidConfig {
                message: "read_size must be non-zero",
            });
        }

        if self.read_size > MAX_READ_SIZE {
            return Err(RelayError::InvalidConfig {
                message: "read_size cannot exceed 16 MiB",
            });
        }

        if self.file_field.is_empty() {
            return Err(RelayError::InvalidConfig {
                message: "file field name must be non-empty",
            });
        }

        if self.digest_field().is_empty() {
            return Err(RelayError::InvalidConfig {
                message: "digest field name must be non-empty",
            });
        }

        if has_line_break(&self.file_field) || has_line_break(self.digest_field()) {
            return Err(RelayError::InvalidConfig {
                message: "field names must not contain CR or LF",
            });
        }

        if self.digest_field() == self.file_field {
            return Err(RelayError::InvalidConfig {
                message: "digest field and file field must differ",
            });
        }

        if let Some(boundary) = &self.boundary {
            validate_boundary(boundary)?;
        }

        Ok(())
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\r', '\n'])
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new()
    }
}
