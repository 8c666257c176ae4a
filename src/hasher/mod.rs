//! Digest engines: the incremental [`Hasher`], the keyed
//! [`KeyedHasher`], and the one-shot [`hash`] / [`hash_encoded`]
//! helpers.

mod engine;
mod keyed;

pub use engine::{HashOptions, Hasher};
pub use keyed::KeyedHasher;

use bytes::Bytes;

use crate::algorithm;
use crate::encoding::{DigestOutput, Input, OutputEncoding};
use crate::error::DigestError;
use crate::provider::one_shot_digest;

/// Computes a digest of a single input in one call.
///
/// Semantically equivalent to `Hasher::new(algorithm)?.update(data)?.
/// digest()`, but never allocates a digest context.
///
/// # Example
///
/// ```
/// use digestrs::hash;
///
/// let digest = hash("sha256", "abc")?;
/// assert_eq!(hex::encode(&digest),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
/// # Ok::<(), digestrs::DigestError>(())
/// ```
pub fn hash<'a>(algorithm: &str, data: impl Into<Input<'a>>) -> Result<Bytes, DigestError> {
    hash_encoded(algorithm, data, OutputEncoding::Buffer).map(DigestOutput::into_bytes)
}

/// Computes a digest of a single input, transformed to the requested
/// output encoding.
pub fn hash_encoded<'a>(
    algorithm: &str,
    data: impl Into<Input<'a>>,
    encoding: OutputEncoding,
) -> Result<DigestOutput, DigestError> {
    let id = algorithm::resolve(algorithm)
        .or_else(|| algorithm::resolve_slow(algorithm))
        .ok_or_else(|| DigestError::UnknownAlgorithm {
            name: algorithm.to_string(),
        })?;
    let bytes = data.into().into_bytes()?;
    Ok(encoding.encode(one_shot_digest(id, &bytes, None)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_matches_engine() {
        let one_shot = hash("sha512", "abc").unwrap();
        let engine = Hasher::new("sha512").unwrap().update("abc").unwrap().digest().unwrap();
        assert_eq!(one_shot, engine);
    }

    #[test]
    fn test_one_shot_hex_output() {
        let out = hash_encoded("md5", "abc", OutputEncoding::Hex).unwrap();
        assert_eq!(out.as_text(), Some("900150983cd24fb0d6963f7d28e17f72"));
    }

    #[test]
    fn test_one_shot_unknown_algorithm() {
        assert!(matches!(
            hash("gost", "abc"),
            Err(DigestError::UnknownAlgorithm { .. })
        ));
    }

    #[test]
    fn test_one_shot_alias() {
        assert_eq!(hash("SHA-256", "abc").unwrap(), hash("sha256", "abc").unwrap());
    }
}
