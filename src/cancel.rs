//! Cancellation signal for in-flight operations.
//!
//! A [`Cancellation`] fires either when its [`CancelHandle`] is triggered or
//! when its deadline passes, whichever comes first. Operations race their work
//! against [`Cancellation::cancelled`]; the losing future is dropped, which
//! aborts any HTTP request it was awaiting.
//!
//! ```rust
//! use std::time::Duration;
//! use seaweedfs_provider::Cancellation;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (handle, cancel) = Cancellation::new();
//! let cancel = cancel.with_timeout(Duration::from_secs(30));
//!
//! handle.cancel();
//! assert!(cancel.is_cancelled());
//! # }
//! ```

use std::future::{self, Future};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::Error;

/// Triggers the paired [`Cancellation`].
///
/// Dropping the handle without calling [`cancel`](CancelHandle::cancel)
/// leaves the signal untriggered forever.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Fires the signal. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns `true` once [`cancel`](CancelHandle::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// A cloneable cancellation signal with an optional deadline.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    rx: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// Creates a signal and the handle that triggers it.
    pub fn new() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (
            CancelHandle { tx: Arc::new(tx) },
            Self {
                rx: Some(rx),
                deadline: None,
            },
        )
    }

    /// A signal that never fires.
    pub fn never() -> Self {
        Self::default()
    }

    /// Sets an absolute deadline. An earlier existing deadline is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Sets a deadline relative to now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` if the signal fired or the deadline passed.
    pub fn is_cancelled(&self) -> bool {
        let signalled = self.rx.as_ref().is_some_and(|rx| *rx.borrow());
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        signalled || expired
    }

    /// Resolves once cancelled, yielding the error that describes why.
    ///
    /// An explicit cancel yields [`ErrorKind::Cancelled`](crate::ErrorKind::Cancelled);
    /// an expired deadline yields [`ErrorKind::Timeout`](crate::ErrorKind::Timeout).
    pub async fn cancelled(&self) -> Error {
        let signal = async {
            if let Some(mut rx) = self.rx.clone() {
                if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                    return Error::cancelled();
                }
            }
            future::pending::<Error>().await
        };

        let deadline = async {
            match self.deadline {
                Some(deadline) => {
                    tokio::time::sleep_until(deadline).await;
                    Error::timeout("deadline exceeded")
                },
                None => future::pending::<Error>().await,
            }
        };

        tokio::select! {
            biased;
            err = signal => err,
            err = deadline => err,
        }
    }

    /// Sleeps for `duration` unless cancelled first.
    pub async fn sleep(&self, duration: Duration) -> Result<(), Error> {
        tokio::select! {
            biased;
            err = self.cancelled() => Err(err),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Runs `fut` to completion unless cancelled first, in which case `fut`
    /// is dropped.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        tokio::select! {
            biased;
            err = self.cancelled() => Err(err),
            out = fut => out,
        }
    }
}
