//! The bundled digest provider.
//!
//! Wraps the RustCrypto hashers (and optionally BLAKE3) behind two
//! algorithm-erased context types:
//!
//! - [`DigestContext`] - unkeyed incremental state: `update` + `finalize`,
//!   cloneable into a fully independent copy
//! - [`MacContext`] - keyed (HMAC) incremental state
//! - [`one_shot_digest`] - init+update+finalize in a single call, using
//!   each algorithm's one-shot entry point
//!
//! Engines treat this module as a capability: they decide *when* to
//! create, clone, and finalize contexts; the provider decides *how*.

use std::fmt;

use bytes::Bytes;
use digest::{Digest, ExtendableOutput, Update, XofReader};
use hmac::{Mac, SimpleHmac};

use crate::algorithm::AlgorithmId;
use crate::error::DigestError;

/// An algorithm-bound incremental digest computation.
///
/// Cloning produces an independent context: internal compression state
/// and counters are copied, and future updates to either side do not
/// affect the other.
#[derive(Clone)]
pub(crate) enum DigestContext {
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha224(sha2::Sha224),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
    Sha512_224(sha2::Sha512_224),
    Sha512_256(sha2::Sha512_256),
    Sha3_224(sha3::Sha3_224),
    Sha3_256(sha3::Sha3_256),
    Sha3_384(sha3::Sha3_384),
    Sha3_512(sha3::Sha3_512),
    Shake128(sha3::Shake128),
    Shake256(sha3::Shake256),
    #[cfg(feature = "blake3")]
    Blake3(Box<blake3::Hasher>),
}

impl DigestContext {
    /// Creates a fresh context for the given algorithm.
    pub(crate) fn new(id: AlgorithmId) -> Self {
        match id {
            AlgorithmId::Md5 => DigestContext::Md5(md5::Md5::new()),
            AlgorithmId::Sha1 => DigestContext::Sha1(sha1::Sha1::new()),
            AlgorithmId::Sha224 => DigestContext::Sha224(sha2::Sha224::new()),
            AlgorithmId::Sha256 => DigestContext::Sha256(sha2::Sha256::new()),
            AlgorithmId::Sha384 => DigestContext::Sha384(sha2::Sha384::new()),
            AlgorithmId::Sha512 => DigestContext::Sha512(sha2::Sha512::new()),
            AlgorithmId::Sha512_224 => DigestContext::Sha512_224(sha2::Sha512_224::new()),
            AlgorithmId::Sha512_256 => DigestContext::Sha512_256(sha2::Sha512_256::new()),
            AlgorithmId::Sha3_224 => DigestContext::Sha3_224(sha3::Sha3_224::new()),
            AlgorithmId::Sha3_256 => DigestContext::Sha3_256(sha3::Sha3_256::new()),
            AlgorithmId::Sha3_384 => DigestContext::Sha3_384(sha3::Sha3_384::new()),
            AlgorithmId::Sha3_512 => DigestContext::Sha3_512(sha3::Sha3_512::new()),
            AlgorithmId::Shake128 => DigestContext::Shake128(sha3::Shake128::default()),
            AlgorithmId::Shake256 => DigestContext::Shake256(sha3::Shake256::default()),
            #[cfg(feature = "blake3")]
            AlgorithmId::Blake3 => DigestContext::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    /// Returns the algorithm bound to this context.
    pub(crate) fn algorithm(&self) -> AlgorithmId {
        match self {
            DigestContext::Md5(_) => AlgorithmId::Md5,
            DigestContext::Sha1(_) => AlgorithmId::Sha1,
            DigestContext::Sha224(_) => AlgorithmId::Sha224,
            DigestContext::Sha256(_) => AlgorithmId::Sha256,
            DigestContext::Sha384(_) => AlgorithmId::Sha384,
            DigestContext::Sha512(_) => AlgorithmId::Sha512,
            DigestContext::Sha512_224(_) => AlgorithmId::Sha512_224,
            DigestContext::Sha512_256(_) => AlgorithmId::Sha512_256,
            DigestContext::Sha3_224(_) => AlgorithmId::Sha3_224,
            DigestContext::Sha3_256(_) => AlgorithmId::Sha3_256,
            DigestContext::Sha3_384(_) => AlgorithmId::Sha3_384,
            DigestContext::Sha3_512(_) => AlgorithmId::Sha3_512,
            DigestContext::Shake128(_) => AlgorithmId::Shake128,
            DigestContext::Shake256(_) => AlgorithmId::Shake256,
            #[cfg(feature = "blake3")]
            DigestContext::Blake3(_) => AlgorithmId::Blake3,
        }
    }

    /// Absorbs more input. Infallible for every bundled algorithm.
    pub(crate) fn update(&mut self, data: &[u8]) {
        match self {
            DigestContext::Md5(ctx) => Digest::update(ctx, data),
            DigestContext::Sha1(ctx) => Digest::update(ctx, data),
            DigestContext::Sha224(ctx) => Digest::update(ctx, data),
            DigestContext::Sha256(ctx) => Digest::update(ctx, data),
            DigestContext::Sha384(ctx) => Digest::update(ctx, data),
            DigestContext::Sha512(ctx) => Digest::update(ctx, data),
            DigestContext::Sha512_224(ctx) => Digest::update(ctx, data),
            DigestContext::Sha512_256(ctx) => Digest::update(ctx, data),
            DigestContext::Sha3_224(ctx) => Digest::update(ctx, data),
            DigestContext::Sha3_256(ctx) => Digest::update(ctx, data),
            DigestContext::Sha3_384(ctx) => Digest::update(ctx, data),
            DigestContext::Sha3_512(ctx) => Digest::update(ctx, data),
            DigestContext::Shake128(ctx) => Update::update(ctx, data),
            DigestContext::Shake256(ctx) => Update::update(ctx, data),
            #[cfg(feature = "blake3")]
            DigestContext::Blake3(ctx) => {
                ctx.update(data);
            }
        }
    }

    /// Finalizes the context and returns the digest bytes.
    ///
    /// Fixed-output algorithms emit their natural output and ignore
    /// `output_length` (the engine validates it up front). XOFs emit
    /// exactly `output_length` bytes, defaulting to the algorithm's
    /// natural length.
    pub(crate) fn finalize(self, output_length: Option<usize>) -> Bytes {
        let xof_len = output_length.unwrap_or_else(|| self.algorithm().output_len());
        match self {
            DigestContext::Md5(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha1(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha224(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha256(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha384(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha512(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha512_224(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha512_256(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha3_224(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha3_256(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha3_384(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Sha3_512(ctx) => Bytes::copy_from_slice(&ctx.finalize()),
            DigestContext::Shake128(ctx) => {
                let mut out = vec![0u8; xof_len];
                ctx.finalize_xof().read(&mut out);
                Bytes::from(out)
            }
            DigestContext::Shake256(ctx) => {
                let mut out = vec![0u8; xof_len];
                ctx.finalize_xof().read(&mut out);
                Bytes::from(out)
            }
            #[cfg(feature = "blake3")]
            DigestContext::Blake3(ctx) => {
                let mut out = vec![0u8; xof_len];
                ctx.finalize_xof().fill(&mut out);
                Bytes::from(out)
            }
        }
    }
}

impl fmt::Debug for DigestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DigestContext")
            .field(&self.algorithm().name())
            .finish()
    }
}

/// Computes a full digest of one buffer without a persistent context.
///
/// Semantically equivalent to `DigestContext::new` + `update` +
/// `finalize`, but dispatches to each algorithm's one-shot entry point.
pub(crate) fn one_shot_digest(
    id: AlgorithmId,
    data: &[u8],
    output_length: Option<usize>,
) -> Bytes {
    let xof_len = output_length.unwrap_or_else(|| id.output_len());
    match id {
        AlgorithmId::Md5 => Bytes::copy_from_slice(&md5::Md5::digest(data)),
        AlgorithmId::Sha1 => Bytes::copy_from_slice(&sha1::Sha1::digest(data)),
        AlgorithmId::Sha224 => Bytes::copy_from_slice(&sha2::Sha224::digest(data)),
        AlgorithmId::Sha256 => Bytes::copy_from_slice(&sha2::Sha256::digest(data)),
        AlgorithmId::Sha384 => Bytes::copy_from_slice(&sha2::Sha384::digest(data)),
        AlgorithmId::Sha512 => Bytes::copy_from_slice(&sha2::Sha512::digest(data)),
        AlgorithmId::Sha512_224 => Bytes::copy_from_slice(&sha2::Sha512_224::digest(data)),
        AlgorithmId::Sha512_256 => Bytes::copy_from_slice(&sha2::Sha512_256::digest(data)),
        AlgorithmId::Sha3_224 => Bytes::copy_from_slice(&sha3::Sha3_224::digest(data)),
        AlgorithmId::Sha3_256 => Bytes::copy_from_slice(&sha3::Sha3_256::digest(data)),
        AlgorithmId::Sha3_384 => Bytes::copy_from_slice(&sha3::Sha3_384::digest(data)),
        AlgorithmId::Sha3_512 => Bytes::copy_from_slice(&sha3::Sha3_512::digest(data)),
        AlgorithmId::Shake128 => {
            let mut out = vec![0u8; xof_len];
            sha3::Shake128::digest_xof(data, &mut out);
            Bytes::from(out)
        }
        AlgorithmId::Shake256 => {
            let mut out = vec![0u8; xof_len];
            sha3::Shake256::digest_xof(data, &mut out);
            Bytes::from(out)
        }
        #[cfg(feature = "blake3")]
        AlgorithmId::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            hasher.update(data);
            let mut out = vec![0u8; xof_len];
            hasher.finalize_xof().fill(&mut out);
            Bytes::from(out)
        }
    }
}

/// A keyed (HMAC) incremental digest computation.
///
/// Key scheduling happens eagerly in [`MacContext::new`]; there is no
/// lazy variant because keyed initialization cost dominates.
#[derive(Clone)]
pub(crate) enum MacContext {
    Md5(SimpleHmac<md5::Md5>),
    Sha1(SimpleHmac<sha1::Sha1>),
    Sha224(SimpleHmac<sha2::Sha224>),
    Sha256(SimpleHmac<sha2::Sha256>),
    Sha384(SimpleHmac<sha2::Sha384>),
    Sha512(SimpleHmac<sha2::Sha512>),
    Sha512_224(SimpleHmac<sha2::Sha512_224>),
    Sha512_256(SimpleHmac<sha2::Sha512_256>),
    Sha3_224(SimpleHmac<sha3::Sha3_224>),
    Sha3_256(SimpleHmac<sha3::Sha3_256>),
    Sha3_384(SimpleHmac<sha3::Sha3_384>),
    Sha3_512(SimpleHmac<sha3::Sha3_512>),
}

impl MacContext {
    /// Creates a keyed context for the given algorithm and key.
    ///
    /// XOF algorithms have no keyed form and are rejected with
    /// `InvalidArgument`; a key the provider cannot schedule yields
    /// `InvalidKeyMaterial`.
    pub(crate) fn new(id: AlgorithmId, key: &[u8]) -> Result<Self, DigestError> {
        fn keyed<D>(key: &[u8]) -> Result<SimpleHmac<D>, DigestError>
        where
            D: Digest + digest::core_api::BlockSizeUser,
        {
            SimpleHmac::new_from_slice(key).map_err(|_| DigestError::InvalidKeyMaterial)
        }

        match id {
            AlgorithmId::Md5 => Ok(MacContext::Md5(keyed(key)?)),
            AlgorithmId::Sha1 => Ok(MacContext::Sha1(keyed(key)?)),
            AlgorithmId::Sha224 => Ok(MacContext::Sha224(keyed(key)?)),
            AlgorithmId::Sha256 => Ok(MacContext::Sha256(keyed(key)?)),
            AlgorithmId::Sha384 => Ok(MacContext::Sha384(keyed(key)?)),
            AlgorithmId::Sha512 => Ok(MacContext::Sha512(keyed(key)?)),
            AlgorithmId::Sha512_224 => Ok(MacContext::Sha512_224(keyed(key)?)),
            AlgorithmId::Sha512_256 => Ok(MacContext::Sha512_256(keyed(key)?)),
            AlgorithmId::Sha3_224 => Ok(MacContext::Sha3_224(keyed(key)?)),
            AlgorithmId::Sha3_256 => Ok(MacContext::Sha3_256(keyed(key)?)),
            AlgorithmId::Sha3_384 => Ok(MacContext::Sha3_384(keyed(key)?)),
            AlgorithmId::Sha3_512 => Ok(MacContext::Sha3_512(keyed(key)?)),
            _ => Err(DigestError::InvalidArgument {
                message: "algorithm does not support keyed digests",
            }),
        }
    }

    /// Returns the algorithm bound to this context.
    pub(crate) fn algorithm(&self) -> AlgorithmId {
        match self {
            MacContext::Md5(_) => AlgorithmId::Md5,
            MacContext::Sha1(_) => AlgorithmId::Sha1,
            MacContext::Sha224(_) => AlgorithmId::Sha224,
            MacContext::Sha256(_) => AlgorithmId::Sha256,
            MacContext::Sha384(_) => AlgorithmId::Sha384,
            MacContext::Sha512(_) => AlgorithmId::Sha512,
            MacContext::Sha512_224(_) => AlgorithmId::Sha512_224,
            MacContext::Sha512_256(_) => AlgorithmId::Sha512_256,
            MacContext::Sha3_224(_) => AlgorithmId::Sha3_224,
            MacContext::Sha3_256(_) => AlgorithmId::Sha3_256,
            MacContext::Sha3_384(_) => AlgorithmId::Sha3_384,
            MacContext::Sha3_512(_) => AlgorithmId::Sha3_512,
        }
    }

    /// Absorbs more input.
    pub(crate) fn update(&mut self, data: &[u8]) {
        match self {
            MacContext::Md5(ctx) => Mac::update(ctx, data),
            MacContext::Sha1(ctx) => Mac::update(ctx, data),
            MacContext::Sha224(ctx) => Mac::update(ctx, data),
            MacContext::Sha256(ctx) => Mac::update(ctx, data),
            MacContext::Sha384(ctx) => Mac::update(ctx, data),
            MacContext::Sha512(ctx) => Mac::update(ctx, data),
            MacContext::Sha512_224(ctx) => Mac::update(ctx, data),
            MacContext::Sha512_256(ctx) => Mac::update(ctx, data),
            MacContext::Sha3_224(ctx) => Mac::update(ctx, data),
            MacContext::Sha3_256(ctx) => Mac::update(ctx, data),
            MacContext::Sha3_384(ctx) => Mac::update(ctx, data),
            MacContext::Sha3_512(ctx) => Mac::update(ctx, data),
        }
    }

    /// Finalizes the context and returns the authentication tag.
    pub(crate) fn finalize(self) -> Bytes {
        match self {
            MacContext::Md5(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha1(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha224(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha256(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha384(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha512(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha512_224(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha512_256(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha3_224(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha3_256(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha3_384(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
            MacContext::Sha3_512(ctx) => Bytes::copy_from_slice(&ctx.finalize().into_bytes()),
        }
    }
}

impl fmt::Debug for MacContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MacContext")
            .field(&self.algorithm().name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut ctx = DigestContext::new(AlgorithmId::Sha256);
        ctx.update(b"hello ");
        ctx.update(b"world");
        let incremental = ctx.finalize(None);

        let one_shot = one_shot_digest(AlgorithmId::Sha256, b"hello world", None);
        assert_eq!(incremental, one_shot);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut ctx = DigestContext::new(AlgorithmId::Sha1);
        ctx.update(b"shared prefix");

        let mut fork = ctx.clone();
        fork.update(b" plus more");

        let base = ctx.finalize(None);
        let forked = fork.finalize(None);
        assert_ne!(base, forked);
        assert_eq!(base, one_shot_digest(AlgorithmId::Sha1, b"shared prefix", None));
    }

    #[test]
    fn test_xof_lengths() {
        let short = one_shot_digest(AlgorithmId::Shake256, b"abc", Some(16));
        let long = one_shot_digest(AlgorithmId::Shake256, b"abc", Some(64));
        assert_eq!(short.len(), 16);
        assert_eq!(long.len(), 64);
        // XOF output is a prefix-consistent stream.
        assert_eq!(&short[..], &long[..16]);
    }

    #[test]
    fn test_xof_default_length() {
        let ctx = DigestContext::new(AlgorithmId::Shake128);
        assert_eq!(ctx.finalize(None).len(), 16);
    }

    #[test]
    fn test_mac_rejects_xof() {
        assert!(matches!(
            MacContext::new(AlgorithmId::Shake128, b"key"),
            Err(DigestError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_mac_accepts_any_key_length() {
        assert!(MacContext::new(AlgorithmId::Sha256, b"").is_ok());
        assert!(MacContext::new(AlgorithmId::Sha256, &[0u8; 200]).is_ok());
    }

    #[cfg(feature = "blake3")]
    #[test]
    fn test_blake3_context() {
        let mut ctx = DigestContext::new(AlgorithmId::Blake3);
        ctx.update(b"abc");
        let incremental = ctx.finalize(None);
        assert_eq!(incremental.len(), 32);
        assert_eq!(incremental, one_shot_digest(AlgorithmId::Blake3, b"abc", None));
    }
}
