//! Algorithm identifiers and the process-wide name registry.
//!
//! Resolving an algorithm name takes one of two routes:
//!
//! - [`resolve`] - case-sensitive lookup of canonical names, backed by a
//!   process-wide append-only cache. This is the fast path taken on every
//!   engine construction.
//! - [`resolve_slow`] - case-insensitive fallback that also accepts dashed
//!   aliases ("SHA-256", "shake-128"). Alias results are not inserted into
//!   the cache; engines constructed through this route skip the lazy fast
//!   path and materialize their context eagerly.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// A stable identifier for a digest algorithm supported by the
/// bundled provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AlgorithmId {
    /// MD5 (16-byte output). Broken for collision resistance; provided
    /// for interoperability only.
    Md5,
    /// SHA-1 (20-byte output).
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// SHA-512/224.
    Sha512_224,
    /// SHA-512/256.
    Sha512_256,
    /// SHA3-224.
    Sha3_224,
    /// SHA3-256.
    Sha3_256,
    /// SHA3-384.
    Sha3_384,
    /// SHA3-512.
    Sha3_512,
    /// SHAKE128 extendable-output function.
    Shake128,
    /// SHAKE256 extendable-output function.
    Shake256,
    /// BLAKE3 (XOF-capable).
    #[cfg(feature = "blake3")]
    Blake3,
}

/// Canonical lowercase names, in provider order. Only these names take
/// the cached fast path.
const CANONICAL: &[(&str, AlgorithmId)] = &[
    ("md5", AlgorithmId::Md5),
    ("sha1", AlgorithmId::Sha1),
    ("sha224", AlgorithmId::Sha224),
    ("sha256", AlgorithmId::Sha256),
    ("sha384", AlgorithmId::Sha384),
    ("sha512", AlgorithmId::Sha512),
    ("sha512-224", AlgorithmId::Sha512_224),
    ("sha512-256", AlgorithmId::Sha512_256),
    ("sha3-224", AlgorithmId::Sha3_224),
    ("sha3-256", AlgorithmId::Sha3_256),
    ("sha3-384", AlgorithmId::Sha3_384),
    ("sha3-512", AlgorithmId::Sha3_512),
    ("shake128", AlgorithmId::Shake128),
    ("shake256", AlgorithmId::Shake256),
    #[cfg(feature = "blake3")]
    ("blake3", AlgorithmId::Blake3),
];

impl AlgorithmId {
    /// Returns the canonical lowercase name of the algorithm.
    pub fn name(&self) -> &'static str {
        for &(name, id) in CANONICAL {
            if id == *self {
                return name;
            }
        }
        // CANONICAL covers every variant.
        ""
    }

    /// Returns the natural output length in bytes.
    ///
    /// For extendable-output functions this is the default length used
    /// when the caller does not request one.
    pub fn output_len(&self) -> usize {
        match self {
            AlgorithmId::Md5 => 16,
            AlgorithmId::Sha1 => 20,
            AlgorithmId::Sha224 => 28,
            AlgorithmId::Sha256 => 32,
            AlgorithmId::Sha384 => 48,
            AlgorithmId::Sha512 => 64,
            AlgorithmId::Sha512_224 => 28,
            AlgorithmId::Sha512_256 => 32,
            AlgorithmId::Sha3_224 => 28,
            AlgorithmId::Sha3_256 => 32,
            AlgorithmId::Sha3_384 => 48,
            AlgorithmId::Sha3_512 => 64,
            AlgorithmId::Shake128 => 16,
            AlgorithmId::Shake256 => 32,
            #[cfg(feature = "blake3")]
            AlgorithmId::Blake3 => 32,
        }
    }

    /// Returns true for extendable-output functions, whose output
    /// length is caller-selectable.
    pub fn is_xof(&self) -> bool {
        match self {
            AlgorithmId::Shake128 | AlgorithmId::Shake256 => true,
            #[cfg(feature = "blake3")]
            AlgorithmId::Blake3 => true,
            _ => false,
        }
    }

    /// Returns true if the algorithm can be used for keyed (HMAC)
    /// digests.
    pub fn supports_keyed(&self) -> bool {
        !self.is_xof()
    }
}

fn cache() -> &'static RwLock<HashMap<String, AlgorithmId>> {
    static CACHE: OnceLock<RwLock<HashMap<String, AlgorithmId>>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Resolves a canonical algorithm name to its identifier.
///
/// Lookup is case-sensitive. The first successful resolution of each
/// name is inserted into a process-wide cache; the cache is append-only
/// and never invalidated. Aliases and unknown names return `None` and
/// callers fall back to [`resolve_slow`].
///
/// # Example
///
/// ```
/// use digestrs::{resolve, AlgorithmId};
///
/// assert_eq!(resolve("sha256"), Some(AlgorithmId::Sha256));
/// assert_eq!(resolve("SHA256"), None); // alias, slow path only
/// ```
pub fn resolve(name: &str) -> Option<AlgorithmId> {
    if let Ok(cache) = cache().read() {
        if let Some(&id) = cache.get(name) {
            return Some(id);
        }
    }

    let id = CANONICAL
        .iter()
        .find(|&&(canonical, _)| canonical == name)
        .map(|&(_, id)| id)?;

    // Idempotent insert; concurrent resolvers may race to write the
    // same entry.
    if let Ok(mut cache) = cache().write() {
        cache.entry(name.to_string()).or_insert(id);
    }
    Some(id)
}

/// Resolves an algorithm name through the name-based fallback path.
///
/// Case-insensitive, and accepts common dashed aliases ("SHA-256",
/// "shake-128"). Results are not cached; an engine constructed through
/// this route behaves as if buffering were unavailable.
pub fn resolve_slow(name: &str) -> Option<AlgorithmId> {
    let lowered = name.to_ascii_lowercase();
    if let Some(id) = CANONICAL
        .iter()
        .find(|&&(canonical, _)| canonical == lowered)
        .map(|&(_, id)| id)
    {
        return Some(id);
    }

    // Dashed aliases: "sha-1", "sha-256", "shake-128", ...
    let alias = match lowered.as_str() {
        "sha-1" => "sha1",
        "sha-224" => "sha224",
        "sha-256" => "sha256",
        "sha-384" => "sha384",
        "sha-512" => "sha512",
        "sha-512/224" | "sha512/224" => "sha512-224",
        "sha-512/256" | "sha512/256" => "sha512-256",
        "shake-128" => "shake128",
        "shake-256" => "shake256",
        _ => return None,
    };
    CANONICAL
        .iter()
        .find(|&&(canonical, _)| canonical == alias)
        .map(|&(_, id)| id)
}
