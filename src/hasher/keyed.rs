//! The keyed (HMAC) digest engine.
//!
//! Unlike the unkeyed engine there is no lazy fast path: key scheduling
//! dominates initialization cost, so the context is created eagerly at
//! construction and every update goes straight to it.

use bytes::Bytes;

use crate::algorithm::{self, AlgorithmId};
use crate::encoding::{DigestOutput, Input, OutputEncoding};
use crate::error::DigestError;
use crate::provider::MacContext;

/// Keyed lifecycle: the context exists from construction, and the only
/// transition is into `Finalized`.
#[derive(Debug)]
enum KeyedState {
    Active { context: MacContext },
    Finalized,
}

/// A keyed (HMAC) incremental digest computation.
///
/// # Example
///
/// ```
/// use digestrs::KeyedHasher;
///
/// let mut mac = KeyedHasher::new("sha256", &b"key"[..])?;
/// mac.update("The quick brown fox jumps over the lazy dog")?;
/// let tag = mac.digest();
/// assert_eq!(tag.len(), 32);
/// # Ok::<(), digestrs::DigestError>(())
/// ```
///
/// # Repeated digests
///
/// For backward compatibility with long-standing caller expectations,
/// `digest` never fails: the first call yields the real tag and
/// finalizes; every later call returns the fixed empty-digest value.
/// `update` after finalization still fails.
#[derive(Debug)]
pub struct KeyedHasher {
    algorithm: AlgorithmId,
    state: KeyedState,
}

impl KeyedHasher {
    /// Creates a keyed engine for the named algorithm.
    ///
    /// The key is an [`Input`]: raw bytes, or text with an encoding,
    /// resolved to bytes immediately. Key scheduling happens here, not
    /// lazily.
    ///
    /// # Errors
    ///
    /// - [`DigestError::UnknownAlgorithm`] if the name does not resolve
    /// - [`DigestError::InvalidArgument`] for algorithms without a
    ///   keyed form (XOFs)
    /// - [`DigestError::InvalidKeyMaterial`] if the key text is
    ///   malformed or the provider rejects the key
    pub fn new<'a>(algorithm: &str, key: impl Into<Input<'a>>) -> Result<Self, DigestError> {
        let id = algorithm::resolve(algorithm)
            .or_else(|| algorithm::resolve_slow(algorithm))
            .ok_or_else(|| DigestError::UnknownAlgorithm {
                name: algorithm.to_string(),
            })?;

        let key = key
            .into()
            .into_bytes()
            .map_err(|_| DigestError::InvalidKeyMaterial)?;
        let context = MacContext::new(id, &key)?;

        Ok(Self {
            algorithm: id,
            state: KeyedState::Active { context },
        })
    }

    /// Returns the algorithm this engine is bound to.
    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Returns true once `digest` has been called.
    pub fn is_finalized(&self) -> bool {
        matches!(self.state, KeyedState::Finalized)
    }

    /// Feeds data into the engine.
    ///
    /// Same payload contract as [`Hasher::update`], forwarded directly
    /// to the keyed context.
    ///
    /// [`Hasher::update`]: crate::Hasher::update
    pub fn update<'a>(&mut self, data: impl Into<Input<'a>>) -> Result<&mut Self, DigestError> {
        match &mut self.state {
            KeyedState::Finalized => Err(DigestError::AlreadyFinalized),
            KeyedState::Active { context } => {
                let bytes = data.into().into_bytes()?;
                context.update(&bytes);
                Ok(self)
            }
        }
    }

    /// Returns the authentication tag and finalizes the engine.
    ///
    /// Never fails: once finalized, further calls return empty bytes.
    pub fn digest(&mut self) -> Bytes {
        match std::mem::replace(&mut self.state, KeyedState::Finalized) {
            KeyedState::Active { context } => context.finalize(),
            KeyedState::Finalized => Bytes::new(),
        }
    }

    /// Like [`digest`](KeyedHasher::digest), transformed to the
    /// requested output encoding. After finalization this is the empty
    /// value under that encoding (empty bytes, or the empty string).
    pub fn digest_encoded(&mut self, encoding: OutputEncoding) -> DigestOutput {
        encoding.encode(self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::TextEncoding;

    // RFC-style published vector for HMAC-SHA256("key", "The quick
    // brown fox jumps over the lazy dog").
    const FOX_HMAC_SHA256: &str =
        "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8";

    #[test]
    fn test_hmac_sha256_vector() {
        let mut mac = KeyedHasher::new("sha256", &b"key"[..]).unwrap();
        mac.update("The quick brown fox jumps over the lazy dog")
            .unwrap();
        assert_eq!(hex::encode(mac.digest()), FOX_HMAC_SHA256);
    }

    #[test]
    fn test_second_digest_returns_empty() {
        let mut mac = KeyedHasher::new("sha256", &b"key"[..]).unwrap();
        mac.update("The quick brown fox jumps over the lazy dog")
            .unwrap();

        let first = mac.digest();
        assert_eq!(hex::encode(&first), FOX_HMAC_SHA256);

        let second = mac.digest();
        assert!(second.is_empty());

        match mac.digest_encoded(OutputEncoding::Hex) {
            DigestOutput::Text(text) => assert_eq!(text, ""),
            DigestOutput::Bytes(_) => panic!("hex output must be text"),
        }
    }

    #[test]
    fn test_update_after_digest_fails() {
        let mut mac = KeyedHasher::new("sha256", &b"key"[..]).unwrap();
        mac.digest();
        assert!(matches!(
            mac.update("late"),
            Err(DigestError::AlreadyFinalized)
        ));
    }

    #[test]
    fn test_keyed_chunking_invariance() {
        let mut split = KeyedHasher::new("sha256", &b"key"[..]).unwrap();
        split.update("The quick brown fox ").unwrap();
        split.update("jumps over the lazy dog").unwrap();
        assert_eq!(hex::encode(split.digest()), FOX_HMAC_SHA256);
    }

    #[test]
    fn test_encoded_key() {
        // "key" spelled in hex.
        let from_hex = KeyedHasher::new("sha256", Input::Text("6b6579", TextEncoding::Hex));
        let mut mac = from_hex.unwrap();
        mac.update("The quick brown fox jumps over the lazy dog")
            .unwrap();
        assert_eq!(hex::encode(mac.digest()), FOX_HMAC_SHA256);
    }

    #[test]
    fn test_malformed_key_text() {
        assert!(matches!(
            KeyedHasher::new("sha256", Input::Text("zz", TextEncoding::Hex)),
            Err(DigestError::InvalidKeyMaterial)
        ));
    }

    #[test]
    fn test_keyed_rejects_xof() {
        assert!(matches!(
            KeyedHasher::new("shake256", &b"key"[..]),
            Err(DigestError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_keyed_unknown_algorithm() {
        assert!(matches!(
            KeyedHasher::new("sha0", &b"key"[..]),
            Err(DigestError::UnknownAlgorithm { .. })
        ));
    }
}
