//! Cancellation and deadline carrier threaded into every backend adapter.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Request context shared by all adapters a facade creates.
///
/// Cloning is cheap and clones observe the same cancellation. Derived contexts
/// (`with_cancel`, `with_timeout`, `with_deadline`) are cancelled when their
/// parent is, but cancelling a child leaves the parent untouched.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Child context with its own cancellation.
    pub fn with_cancel(&self) -> Self {
        Self { token: self.token.child_token(), deadline: self.deadline }
    }

    /// Child context that expires `timeout` from now, or at the parent's
    /// deadline if that comes first. A timeout too large to represent adds no
    /// deadline of its own.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(at) => self.with_deadline(at),
            None => self.with_cancel(),
        }
    }

    pub fn with_deadline(&self, at: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) if parent < at => parent,
            _ => at,
        };
        Self { token: self.token.child_token(), deadline: Some(deadline) }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why this context is done, if it is.
    pub fn err(&self) -> Option<Error> {
        if self.token.is_cancelled() {
            return Some(Error::Cancelled);
        }
        match self.deadline {
            Some(at) if Instant::now() >= at => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive one backend call under this context.
    ///
    /// Fails immediately when the context is already done; otherwise the call
    /// races cancellation and the deadline.
    pub async fn run<F, T, E>(&self, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Into<Error>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }
        let call = async { call.await.map_err(Into::into) };
        let bounded = async {
            match self.deadline {
                Some(at) => tokio::time::timeout_at(at, call).await.unwrap_or(Err(Error::DeadlineExceeded)),
                None => call.await,
            }
        };
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled),
            res = bounded => res,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok_call() -> std::result::Result<u32, Error> {
        Ok(7)
    }

    #[tokio::test]
    async fn background_runs_call() {
        let ctx = Context::background();
        assert_eq!(ctx.run(ok_call()).await.unwrap(), 7);
        assert!(ctx.err().is_none());
    }

    #[tokio::test]
    async fn cancelled_context_fails_before_calling() {
        let ctx = Context::background().with_cancel();
        ctx.cancel();
        let called = std::sync::atomic::AtomicBool::new(false);
        let res = ctx
            .run(async {
                called.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok::<_, Error>(())
            })
            .await;
        assert!(matches!(res, Err(Error::Cancelled)));
        assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn parent_cancellation_reaches_children() {
        let parent = Context::background().with_cancel();
        let child = parent.with_timeout(Duration::from_secs(60));
        parent.cancel();
        assert!(matches!(child.err(), Some(Error::Cancelled)));
    }

    #[tokio::test]
    async fn child_cancellation_leaves_parent() {
        let parent = Context::background();
        let child = parent.with_cancel();
        child.cancel();
        assert!(parent.err().is_none());
    }

    #[tokio::test]
    async fn expired_deadline_fails_immediately() {
        let ctx = Context::background().with_deadline(Instant::now());
        let res = ctx.run(ok_call()).await;
        assert!(matches!(res, Err(Error::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn slow_call_hits_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(20));
        let res = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, Error>(())
            })
            .await;
        assert!(matches!(res, Err(Error::DeadlineExceeded)));
    }

    #[test]
    fn child_deadline_never_outlives_parent() {
        let parent = Context::background().with_timeout(Duration::from_secs(1));
        let child = parent.with_timeout(Duration::from_secs(600));
        assert_eq!(child.deadline(), parent.deadline());
    }

    #[test]
    fn huge_timeout_means_no_deadline() {
        let ctx = Context::background().with_timeout(Duration::MAX);
        assert_eq!(ctx.deadline(), None);
        assert!(ctx.err().is_none());

        let parent = Context::background().with_timeout(Duration::from_secs(60));
        let child = parent.with_timeout(Duration::MAX);
        assert_eq!(child.deadline(), parent.deadline());
        parent.cancel();
        assert!(matches!(child.err(), Some(Error::Cancelled)));
    }
}
