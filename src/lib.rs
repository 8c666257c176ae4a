//! digestrs
//!
//! Incremental message digests for Rust.
//!
//! `digestrs` computes cryptographic hashes and keyed hashes (HMAC)
//! over data supplied in one or more chunks, behind a stream-like
//! `update`/`digest` contract. Internally it defers digest-context
//! allocation: a caller that only ever supplies a single chunk before
//! finalizing resolves through a one-shot function and never pays for a
//! persistent context.
//!
//! The crate intentionally:
//! - does NOT implement compression functions (RustCrypto and BLAKE3
//!   provide them)
//! - does NOT manage streams or files
//! - does NOT do key derivation or encryption
//!
//! It only does one thing: **bytes in → digest out**
//!
//! # Hashing
//!
//! ```
//! use digestrs::{Hasher, hash};
//!
//! // Incremental
//! let mut hasher = Hasher::new("sha256")?;
//! hasher.update("hello ")?;
//! hasher.update("world")?;
//! let digest = hasher.digest()?;
//!
//! // One-shot, identical result
//! assert_eq!(digest, hash("sha256", "hello world")?);
//! # Ok::<(), digestrs::DigestError>(())
//! ```
//!
//! # Keyed hashing (HMAC)
//!
//! ```
//! use digestrs::KeyedHasher;
//!
//! let mut mac = KeyedHasher::new("sha256", &b"secret"[..])?;
//! mac.update("message")?;
//! let tag = mac.digest();
//! # Ok::<(), digestrs::DigestError>(())
//! ```
//!
//! # Async (feature = "async-job")
//!
//! ```ignore
//! use bytes::Bytes;
//! use digestrs::digest_job;
//!
//! async fn demo() -> Result<(), digestrs::DigestError> {
//!     let digest = digest_job("sha256", Bytes::from_static(b"abc"))?.await?;
//!     println!("{}", hex::encode(digest));
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod algorithm;
mod encoding;
mod error;
mod hasher;

mod provider; // internal digest/hmac contexts over RustCrypto + blake3

#[cfg(feature = "async-job")]
mod job;

//
// Public surface (intentionally tiny)
//

pub use algorithm::{AlgorithmId, resolve, resolve_slow};
pub use encoding::{DigestOutput, Input, OutputEncoding, TextEncoding};
pub use error::DigestError;
pub use hasher::{HashOptions, Hasher, KeyedHasher, hash, hash_encoded};

#[cfg(feature = "async-job")]
pub use job::{DigestJob, MAX_JOB_INPUT_LEN, digest_job};
