//! Off-thread one-shot digest jobs.
//!
//! [`digest_job`] hands a single buffer to a small shared pool of
//! worker threads and returns a [`DigestJob`] future that resolves with
//! the digest bytes. The submitting thread never blocks and no engine
//! state is shared with the workers; each job owns its input and
//! produces its own output.
//!
//! Only the algorithms in the off-thread allow-list (SHA-1, SHA-256,
//! SHA-384, SHA-512) are accepted. There is no cancellation: a
//! submitted job always runs to completion, and results complete in
//! whatever order their computations finish.
//!
//! # Example
//!
//! ```ignore
//! use bytes::Bytes;
//! use digestrs::digest_job;
//!
//! async fn demo() -> Result<(), digestrs::DigestError> {
//!     let digest = digest_job("sha256", Bytes::from_static(b"abc"))?.await?;
//!     assert_eq!(digest.len(), 32);
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, OnceLock};
use std::task::{Context, Poll};
use std::thread;

use bytes::Bytes;
use futures_channel::oneshot;
use pin_project_lite::pin_project;

use crate::algorithm::{self, AlgorithmId};
use crate::error::DigestError;
use crate::provider::one_shot_digest;

/// Maximum input size accepted by [`digest_job`], in bytes.
pub const MAX_JOB_INPUT_LEN: usize = i32::MAX as usize;

/// Algorithms the worker pool will execute.
const ALLOWED: &[AlgorithmId] = &[
    AlgorithmId::Sha1,
    AlgorithmId::Sha256,
    AlgorithmId::Sha384,
    AlgorithmId::Sha512,
];

fn validate_input_len(len: usize) -> Result<(), DigestError> {
    if len > MAX_JOB_INPUT_LEN {
        return Err(DigestError::InvalidArgument {
            message: "input exceeds the maximum async job length",
        });
    }
    Ok(())
}

struct JobRequest {
    id: AlgorithmId,
    data: Bytes,
    reply: oneshot::Sender<Bytes>,
}

fn pool() -> &'static mpsc::Sender<JobRequest> {
    static POOL: OnceLock<mpsc::Sender<JobRequest>> = OnceLock::new();
    POOL.get_or_init(|| {
        let (tx, rx) = mpsc::channel::<JobRequest>();
        let rx = Arc::new(Mutex::new(rx));

        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(4);
        for _ in 0..workers {
            let rx = Arc::clone(&rx);
            thread::spawn(move || {
                loop {
                    let request = match rx.lock() {
                        Ok(guard) => guard.recv(),
                        Err(_) => break,
                    };
                    match request {
                        Ok(job) => {
                            let digest = one_shot_digest(job.id, &job.data, None);
                            // The submitter may have dropped its future.
                            let _ = job.reply.send(digest);
                        }
                        Err(_) => break,
                    }
                }
            });
        }
        tx
    })
}

pin_project! {
    /// A pending off-thread digest computation.
    ///
    /// Resolves with the digest bytes once a worker finishes. Dropping
    /// the future does not cancel the job; the computation still runs
    /// to completion and its result is discarded.
    #[must_use = "futures do nothing unless polled"]
    pub struct DigestJob {
        #[pin]
        receiver: oneshot::Receiver<Bytes>,
    }
}

impl Future for DigestJob {
    type Output = Result<Bytes, DigestError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.receiver.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(digest)) => Poll::Ready(Ok(digest)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(DigestError::JobFailed)),
        }
    }
}

/// Submits a one-shot digest computation to the worker pool.
///
/// Validation happens on the calling thread: the algorithm must be in
/// the off-thread allow-list and `data` must not exceed
/// [`MAX_JOB_INPUT_LEN`]. An accepted job executes off-thread; await
/// the returned [`DigestJob`] for the result.
///
/// # Errors
///
/// - [`DigestError::UnsupportedAlgorithm`] for any name outside the
///   allow-list (including names the provider does not know at all)
/// - [`DigestError::InvalidArgument`] if the input is too large
pub fn digest_job(algorithm: &str, data: Bytes) -> Result<DigestJob, DigestError> {
    let id = algorithm::resolve(algorithm)
        .or_else(|| algorithm::resolve_slow(algorithm))
        .filter(|id| ALLOWED.contains(id))
        .ok_or_else(|| DigestError::UnsupportedAlgorithm {
            name: algorithm.to_string(),
        })?;

    validate_input_len(data.len())?;

    let (reply, receiver) = oneshot::channel();
    // The pool sender lives for the process; send only fails if every
    // worker has died.
    pool()
        .send(JobRequest { id, data, reply })
        .map_err(|_| DigestError::JobFailed)?;

    Ok(DigestJob { receiver })
}
