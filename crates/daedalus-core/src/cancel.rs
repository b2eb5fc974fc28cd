//! Request cancellation.
//!
//! A [`CancellationToken`] is handed to every Execute stage through the
//! [`RequestContext`](crate::RequestContext). The server cancels it when the
//! client disconnects or the process is shutting down; collaborators that can
//! abort early should race their work against [`CancellationToken::cancelled`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// A cloneable, one-shot cancellation flag.
///
/// # Example
///
/// ```
/// use daedalus_core::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let token = CancellationToken::new();
/// let child = token.clone();
///
/// token.cancel();
/// assert!(child.is_cancelled());
/// child.cancelled().await;
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    sender: broadcast::Sender<()>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            sender,
        }
    }

    /// Cancels the token and wakes every waiter. Idempotent.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            let _ = self.sender.send(());
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Completes when the token is cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        if self.is_cancelled() {
            return;
        }
        let _ = receiver.recv().await;
    }

    /// Returns a guard that cancels this token when dropped.
    #[must_use]
    pub fn drop_guard(&self) -> DropGuard {
        DropGuard {
            token: Some(self.clone()),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancels its token on drop unless [`disarm`](Self::disarm)ed.
#[derive(Debug)]
pub struct DropGuard {
    token: Option<CancellationToken>,
}

impl DropGuard {
    /// Prevents the guard from cancelling the token.
    pub fn disarm(mut self) -> CancellationToken {
        self.token.take().unwrap_or_default()
    }
}

impl Drop for DropGuard {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}
