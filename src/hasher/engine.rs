//! The incremental digest engine.
//!
//! [`Hasher`] implements the `update`/`digest` contract with a lazy
//! materialization fast path: the first (and often only) chunk is
//! buffered instead of creating a digest context, and if `digest()`
//! arrives before a second chunk the whole computation resolves through
//! the one-shot digest function with no context ever allocated. Genuine
//! multi-chunk streams materialize a context on the second `update`.
//!
//! # Example
//!
//! ```
//! use digestrs::Hasher;
//!
//! let digest = Hasher::new("sha256")?.update("abc")?.digest()?;
//! assert_eq!(hex::encode(&digest),
//!     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
//! # Ok::<(), digestrs::DigestError>(())
//! ```

use bytes::Bytes;

use crate::algorithm::{self, AlgorithmId};
use crate::encoding::{DigestOutput, Input, OutputEncoding, TextEncoding};
use crate::error::DigestError;
use crate::provider::{DigestContext, one_shot_digest};

/// Options for constructing a [`Hasher`].
///
/// # Example
///
/// ```
/// use digestrs::{Hasher, HashOptions};
///
/// // A 64-byte SHAKE256 digest, with the buffering fast path off.
/// let options = HashOptions::default()
///     .with_output_length(64)
///     .with_buffering_disabled();
/// let hasher = Hasher::with_options("shake256", options)?;
/// # Ok::<(), digestrs::DigestError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HashOptions {
    output_length: Option<u32>,
    disable_buffering: bool,
}

impl HashOptions {
    /// Creates the default options: natural output length, buffering
    /// enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a specific output length in bytes.
    ///
    /// Only meaningful for extendable-output algorithms; for fixed
    /// algorithms any value other than the natural length is rejected
    /// at construction.
    pub fn with_output_length(mut self, length: u32) -> Self {
        self.output_length = Some(length);
        self
    }

    /// Disables the single-chunk buffering fast path, forcing eager
    /// context creation.
    pub fn with_buffering_disabled(mut self) -> Self {
        self.disable_buffering = true;
        self
    }

    /// Returns the requested output length, if any.
    pub fn output_length(&self) -> Option<u32> {
        self.output_length
    }

    /// Returns true if the buffering fast path is disabled.
    pub fn buffering_disabled(&self) -> bool {
        self.disable_buffering
    }

    fn validate_for(&self, id: AlgorithmId) -> Result<(), DigestError> {
        if let Some(length) = self.output_length {
            if !id.is_xof() && length as usize != id.output_len() {
                return Err(DigestError::InvalidArgument {
                    message: "output length does not match a fixed-output algorithm",
                });
            }
        }
        Ok(())
    }
}

/// A single buffered update, held until the engine decides between the
/// one-shot path and a real context.
///
/// Text is kept undecoded alongside its encoding; decoding happens at
/// drain or one-shot time, so the fast path never pays for it twice.
#[derive(Debug, Clone)]
enum BufferedData {
    Bytes(Bytes),
    Text(String, TextEncoding),
}

impl BufferedData {
    fn capture(input: Input<'_>) -> Self {
        match input {
            Input::Bytes(bytes) => BufferedData::Bytes(Bytes::copy_from_slice(bytes)),
            Input::Text(text, encoding) => BufferedData::Text(text.to_string(), encoding),
        }
    }

    fn into_bytes(self) -> Result<Bytes, DigestError> {
        match self {
            BufferedData::Bytes(bytes) => Ok(bytes),
            BufferedData::Text(text, encoding) => encoding.decode(&text),
        }
    }
}

/// Engine lifecycle, as an explicit sum type.
///
/// Holding buffered data and an active context at the same time is
/// unrepresentable: a transition into `Active` drains the buffer first.
#[derive(Debug)]
enum EngineState {
    /// No context, no data consumed.
    Fresh,
    /// Exactly one update occurred and was buffered; no context exists.
    Buffered { data: BufferedData },
    /// A context has been materialized and owns all consumed data.
    Active { context: DigestContext },
    /// `digest` has been called. Terminal.
    Finalized,
}

/// An incremental, algorithm-bound digest computation.
///
/// Construct with an algorithm name, feed data with [`update`], and
/// finish exactly once with [`digest`] (or [`digest_encoded`]). The
/// engine is single-threaded and exclusively owned; [`copy`] produces a
/// fully independent engine sharing no mutable state.
///
/// [`update`]: Hasher::update
/// [`digest`]: Hasher::digest
/// [`digest_encoded`]: Hasher::digest_encoded
/// [`copy`]: Hasher::copy
///
/// # Chunking invariance
///
/// Splitting the input across any number of `update` calls never
/// changes the digest:
///
/// ```
/// use digestrs::Hasher;
///
/// let split = Hasher::new("sha256")?.update("ab")?.update("c")?.digest()?;
/// let whole = Hasher::new("sha256")?.update("abc")?.digest()?;
/// assert_eq!(split, whole);
/// # Ok::<(), digestrs::DigestError>(())
/// ```
#[derive(Debug)]
pub struct Hasher {
    algorithm: AlgorithmId,
    output_length: Option<u32>,
    disable_buffering: bool,
    update_count: u64,
    state: EngineState,
}

impl Hasher {
    /// Creates an engine for the named algorithm with default options.
    ///
    /// # Errors
    ///
    /// [`DigestError::UnknownAlgorithm`] if the name resolves through
    /// neither the cached fast path nor the alias fallback.
    pub fn new(algorithm: &str) -> Result<Self, DigestError> {
        Self::with_options(algorithm, HashOptions::default())
    }

    /// Creates an engine for the named algorithm.
    ///
    /// Canonical names resolve through the process-wide cache and defer
    /// context creation; alias spellings resolve through the slow path
    /// and create the context immediately, as does
    /// [`HashOptions::with_buffering_disabled`].
    pub fn with_options(algorithm: &str, options: HashOptions) -> Result<Self, DigestError> {
        let (id, cached) = match algorithm::resolve(algorithm) {
            Some(id) => (id, true),
            None => match algorithm::resolve_slow(algorithm) {
                Some(id) => (id, false),
                None => {
                    return Err(DigestError::UnknownAlgorithm {
                        name: algorithm.to_string(),
                    });
                }
            },
        };
        options.validate_for(id)?;

        // Alias-resolved names skip the lazy path; if anything is wrong
        // with the algorithm it fails here rather than on first use.
        let eager = options.disable_buffering || !cached;
        let state = if eager {
            EngineState::Active {
                context: DigestContext::new(id),
            }
        } else {
            EngineState::Fresh
        };

        Ok(Self {
            algorithm: id,
            output_length: options.output_length,
            disable_buffering: options.disable_buffering,
            update_count: 0,
            state,
        })
    }

    /// Returns the algorithm this engine is bound to.
    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Returns the number of `update` calls made so far.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Returns true once `digest` has been called.
    pub fn is_finalized(&self) -> bool {
        matches!(self.state, EngineState::Finalized)
    }

    /// Feeds data into the engine.
    ///
    /// Accepts raw bytes or text (see [`Input`]); bare `&str` input is
    /// treated as UTF-8. Returns `&mut Self` so updates chain.
    ///
    /// The very first update on a lazily-constructed engine is buffered
    /// without touching any context; every other update is forwarded to
    /// the context, materializing it (and draining the buffer, in call
    /// order) first.
    ///
    /// # Errors
    ///
    /// - [`DigestError::AlreadyFinalized`] after `digest`
    /// - [`DigestError::UpdateFailed`] when encoded text is malformed
    pub fn update<'a>(&mut self, data: impl Into<Input<'a>>) -> Result<&mut Self, DigestError> {
        let data = data.into();
        if self.is_finalized() {
            return Err(DigestError::AlreadyFinalized);
        }

        // Counts every call, whichever branch runs below.
        self.update_count += 1;

        if matches!(self.state, EngineState::Fresh) && !self.disable_buffering {
            self.state = EngineState::Buffered {
                data: BufferedData::capture(data),
            };
            return Ok(self);
        }

        // Materialize (draining any buffered chunk) before looking at
        // the new payload, so a decode failure here never leaves a
        // stale buffer behind. Byte slices feed the context directly.
        let context = self.materialize()?;
        match data {
            Input::Bytes(bytes) => context.update(bytes),
            Input::Text(text, encoding) => {
                let decoded = encoding.decode(text)?;
                context.update(&decoded);
            }
        }
        Ok(self)
    }

    /// Finalizes the engine and returns the raw digest bytes.
    ///
    /// Exactly one `digest` call is allowed. With zero updates this is
    /// the algorithm's digest of the empty byte sequence; with exactly
    /// one buffered update the computation resolves through the
    /// one-shot digest function and no context is ever created.
    pub fn digest(&mut self) -> Result<Bytes, DigestError> {
        self.digest_encoded(OutputEncoding::Buffer)
            .map(DigestOutput::into_bytes)
    }

    /// Finalizes the engine, transforming the digest to the requested
    /// output encoding.
    pub fn digest_encoded(&mut self, encoding: OutputEncoding) -> Result<DigestOutput, DigestError> {
        let output_length = self.output_length.map(|len| len as usize);
        // Finalization is terminal even when decoding the buffered
        // payload fails below.
        match std::mem::replace(&mut self.state, EngineState::Finalized) {
            EngineState::Finalized => Err(DigestError::AlreadyFinalized),
            EngineState::Active { context } => Ok(encoding.encode(context.finalize(output_length))),
            EngineState::Buffered { data } => {
                let bytes = data.into_bytes()?;
                Ok(encoding.encode(one_shot_digest(self.algorithm, &bytes, output_length)))
            }
            EngineState::Fresh => {
                Ok(encoding.encode(one_shot_digest(self.algorithm, &[], output_length)))
            }
        }
    }

    /// Creates an independent engine continuing from the current state.
    ///
    /// The copy shares the algorithm identity and update count but owns
    /// its own context: further updates to either side do not affect
    /// the other. Legal only before finalization.
    pub fn copy(&self) -> Result<Self, DigestError> {
        self.copy_with_options(HashOptions {
            output_length: self.output_length,
            disable_buffering: self.disable_buffering,
        })
    }

    /// Like [`copy`](Hasher::copy), but with new options for the copy
    /// (e.g. a different XOF output length).
    pub fn copy_with_options(&self, options: HashOptions) -> Result<Self, DigestError> {
        options.validate_for(self.algorithm)?;
        let state = match &self.state {
            EngineState::Finalized => return Err(DigestError::AlreadyFinalized),
            EngineState::Fresh => EngineState::Fresh,
            EngineState::Buffered { data } => EngineState::Buffered { data: data.clone() },
            EngineState::Active { context } => EngineState::Active {
                context: context.clone(),
            },
        };
        Ok(Self {
            algorithm: self.algorithm,
            output_length: options.output_length,
            disable_buffering: options.disable_buffering,
            update_count: self.update_count,
            state,
        })
    }

    /// Ensures the state is `Active`, creating the context and draining
    /// any buffered payload (in original call order) first.
    fn materialize(&mut self) -> Result<&mut DigestContext, DigestError> {
        if !matches!(self.state, EngineState::Active { .. }) {
            let next = match std::mem::replace(&mut self.state, EngineState::Fresh) {
                EngineState::Fresh => EngineState::Active {
                    context: DigestContext::new(self.algorithm),
                },
                EngineState::Buffered { data } => {
                    let mut context = DigestContext::new(self.algorithm);
                    match data.into_bytes() {
                        Ok(bytes) => {
                            context.update(&bytes);
                            EngineState::Active { context }
                        }
                        Err(err) => {
                            // The malformed payload is dropped; the
                            // materialization invariant still holds.
                            self.state = EngineState::Active { context };
                            return Err(err);
                        }
                    }
                }
                other => other,
            };
            self.state = next;
        }

        match &mut self.state {
            EngineState::Active { context } => Ok(context),
            _ => Err(DigestError::AlreadyFinalized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::TextEncoding;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn hex_digest(hasher: &mut Hasher) -> String {
        match hasher.digest_encoded(OutputEncoding::Hex).unwrap() {
            DigestOutput::Text(text) => text,
            DigestOutput::Bytes(_) => panic!("hex output must be text"),
        }
    }

    #[test]
    fn test_single_update_takes_buffered_path() {
        let mut hasher = Hasher::new("sha256").unwrap();
        hasher.update("abc").unwrap();
        assert_eq!(hasher.update_count(), 1);
        assert_eq!(hex_digest(&mut hasher), ABC_SHA256);
    }

    #[test]
    fn test_disable_buffering_same_digest() {
        let options = HashOptions::default().with_buffering_disabled();
        let mut hasher = Hasher::with_options("sha256", options).unwrap();
        hasher.update("abc").unwrap();
        assert_eq!(hex_digest(&mut hasher), ABC_SHA256);
    }

    #[test]
    fn test_two_updates_materialize_context() {
        let mut hasher = Hasher::new("sha256").unwrap();
        hasher.update("ab").unwrap();
        hasher.update("c").unwrap();
        assert_eq!(hasher.update_count(), 2);
        assert_eq!(hex_digest(&mut hasher), ABC_SHA256);
    }

    #[test]
    fn test_zero_updates_digest_empty() {
        let mut hasher = Hasher::new("sha256").unwrap();
        assert_eq!(
            hex_digest(&mut hasher),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_finalized_is_terminal() {
        let mut hasher = Hasher::new("sha256").unwrap();
        hasher.update("abc").unwrap();
        hasher.digest().unwrap();

        assert!(matches!(
            hasher.update("more"),
            Err(DigestError::AlreadyFinalized)
        ));
        assert!(matches!(hasher.digest(), Err(DigestError::AlreadyFinalized)));
        assert!(matches!(hasher.copy(), Err(DigestError::AlreadyFinalized)));
    }

    #[test]
    fn test_unknown_algorithm() {
        assert!(matches!(
            Hasher::new("sha0"),
            Err(DigestError::UnknownAlgorithm { .. })
        ));
    }

    #[test]
    fn test_alias_name_resolves_eagerly() {
        // Alias spellings skip the buffered fast path but still digest
        // identically.
        let mut hasher = Hasher::new("SHA-256").unwrap();
        hasher.update("abc").unwrap();
        assert_eq!(hex_digest(&mut hasher), ABC_SHA256);
    }

    #[test]
    fn test_copy_from_buffered_state() {
        let mut original = Hasher::new("sha256").unwrap();
        original.update("abc").unwrap();

        let mut copy = original.copy().unwrap();
        assert_eq!(copy.update_count(), 1);

        // Diverge the original; the copy must be unaffected.
        original.update("tail").unwrap();
        assert_eq!(hex_digest(&mut copy), ABC_SHA256);
    }

    #[test]
    fn test_copy_from_active_state() {
        let mut original = Hasher::new("sha256").unwrap();
        original.update("ab").unwrap();
        original.update("c").unwrap();

        let mut copy = original.copy().unwrap();
        copy.update("extra").unwrap();

        assert_eq!(hex_digest(&mut original), ABC_SHA256);
        assert_ne!(hex_digest(&mut copy), ABC_SHA256);
    }

    #[test]
    fn test_update_count_increments_on_every_call() {
        let mut hasher = Hasher::new("sha256").unwrap();
        for expected in 1..=5u64 {
            hasher.update("x").unwrap();
            assert_eq!(hasher.update_count(), expected);
        }
    }

    #[test]
    fn test_buffered_text_decoded_on_drain() {
        // First update buffers hex text; the second forces the drain.
        let mut hasher = Hasher::new("sha256").unwrap();
        hasher.update(Input::Text("6162", TextEncoding::Hex)).unwrap();
        hasher.update("c").unwrap();
        assert_eq!(hex_digest(&mut hasher), ABC_SHA256);
    }

    #[test]
    fn test_malformed_buffered_text_fails_on_drain() {
        let mut hasher = Hasher::new("sha256").unwrap();
        hasher
            .update(Input::Text("not hex", TextEncoding::Hex))
            .unwrap();
        assert!(matches!(
            hasher.update("more"),
            Err(DigestError::UpdateFailed)
        ));
        // The engine is still usable; it simply lost the bad payload.
        assert!(hasher.update("c").is_ok());
        assert!(hasher.digest().is_ok());
    }

    #[test]
    fn test_malformed_second_update_drains_buffer_first() {
        let mut hasher = Hasher::new("sha256").unwrap();
        hasher.update("ab").unwrap();
        assert!(matches!(
            hasher.update(Input::Text("not hex", TextEncoding::Hex)),
            Err(DigestError::UpdateFailed)
        ));
        // The buffered first chunk was drained into the context before
        // the bad payload was rejected; only the bad payload is lost.
        hasher.update("c").unwrap();
        assert_eq!(hex_digest(&mut hasher), ABC_SHA256);
    }

    #[test]
    fn test_malformed_buffered_text_fails_on_digest() {
        let mut hasher = Hasher::new("sha256").unwrap();
        hasher
            .update(Input::Text("not hex", TextEncoding::Hex))
            .unwrap();
        assert!(matches!(hasher.digest(), Err(DigestError::UpdateFailed)));
        // Finalization happened regardless.
        assert!(matches!(hasher.digest(), Err(DigestError::AlreadyFinalized)));
    }

    #[test]
    fn test_output_length_rejected_for_fixed_algorithm() {
        let options = HashOptions::default().with_output_length(16);
        assert!(matches!(
            Hasher::with_options("sha256", options),
            Err(DigestError::InvalidArgument { .. })
        ));
        // The natural length is accepted.
        let options = HashOptions::default().with_output_length(32);
        assert!(Hasher::with_options("sha256", options).is_ok());
    }

    #[test]
    fn test_xof_output_length() {
        let options = HashOptions::default().with_output_length(64);
        let mut hasher = Hasher::with_options("shake256", options).unwrap();
        hasher.update("abc").unwrap();
        let digest = hasher.digest().unwrap();
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_copy_with_larger_xof_output() {
        let mut original = Hasher::new("shake256").unwrap();
        original.update("abc").unwrap();

        let mut copy = original
            .copy_with_options(HashOptions::default().with_output_length(64))
            .unwrap();

        let short = original.digest().unwrap();
        let long = copy.digest().unwrap();
        assert_eq!(short.len(), 32);
        assert_eq!(long.len(), 64);
        assert_eq!(&short[..], &long[..32]);
    }
}
