//! Error types for digestrs.

use std::fmt;

/// Errors that can occur while computing digests.
#[derive(Debug)]
pub enum DigestError {
    /// The algorithm name is not recognized by the provider.
    UnknownAlgorithm {
        /// The name that failed to resolve.
        name: String,
    },

    /// An argument had the wrong type or an invalid value.
    InvalidArgument {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The engine has already produced its digest; no further
    /// `update`, `digest`, or `copy` calls are allowed.
    AlreadyFinalized,

    /// The input could not be consumed (malformed encoded text).
    UpdateFailed,

    /// The key material was rejected for the chosen algorithm.
    InvalidKeyMaterial,

    /// The algorithm is not in the off-thread allow-list.
    UnsupportedAlgorithm {
        /// The name that was rejected.
        name: String,
    },

    /// The worker executing an async job disappeared before
    /// delivering a result.
    JobFailed,
}

impl fmt::Display for DigestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestError::UnknownAlgorithm { name } => {
                write!(f, "unknown digest algorithm: {:?}", name)
            }
            DigestError::InvalidArgument { message } => {
                write!(f, "invalid argument: {}", message)
            }
            DigestError::AlreadyFinalized => {
                write!(f, "digest already finalized")
            }
            DigestError::UpdateFailed => {
                write!(f, "digest update failed")
            }
            DigestError::InvalidKeyMaterial => {
                write!(f, "invalid key material")
            }
            DigestError::UnsupportedAlgorithm { name } => {
                write!(f, "algorithm not supported for async digests: {:?}", name)
            }
            DigestError::JobFailed => {
                write!(f, "async digest job failed")
            }
        }
    }
}

impl std::error::Error for DigestError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DigestError::UnknownAlgorithm {
            name: "sha0".to_string(),
        };
        assert!(err.to_string().contains("unknown digest algorithm"));
        assert!(err.to_string().contains("sha0"));
    }

    #[test]
    fn test_finalized_display() {
        let err = DigestError::AlreadyFinalized;
        assert!(err.to_string().contains("finalized"));
    }

    #[test]
    fn test_is_error() {
        fn assert_error<E: std::error::Error>(_: E) {}
        assert_error(DigestError::UpdateFailed);
    }
}
