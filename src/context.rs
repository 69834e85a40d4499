//! Per-call cancellation and deadlines.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::CancelReason;

/// Cancellation scope for a single client call.
///
/// The default context never expires. A deadline and a cancellation token
/// can be combined; whichever fires first stops the call, including while it
/// is waiting between retries.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    token: Option<CancellationToken>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire `timeout` from now. A timeout too large to represent leaves
    /// the context without a deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Expire at `deadline`. An earlier existing deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the reason if the context is already done.
    pub fn check(&self) -> Option<CancelReason> {
        if self.token.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Some(CancelReason::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(CancelReason::DeadlineExceeded);
        }
        None
    }

    /// Resolves once the context is cancelled or its deadline passes. Never
    /// resolves for a context with neither.
    pub async fn done(&self) -> CancelReason {
        let deadline = async {
            match self.deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending::<()>().await,
            }
        };
        let cancelled = async {
            match &self.token {
                Some(t) => t.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => CancelReason::Cancelled,
            _ = deadline => CancelReason::DeadlineExceeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_live() {
        assert_eq!(RequestContext::new().check(), None);
        assert!(RequestContext::new().deadline().is_none());
    }

    #[tokio::test]
    async fn test_expired_deadline() {
        let ctx = RequestContext::new().with_deadline(Instant::now() - Duration::from_millis(1));
        assert_eq!(ctx.check(), Some(CancelReason::DeadlineExceeded));
        assert_eq!(ctx.done().await, CancelReason::DeadlineExceeded);
    }

    #[tokio::test]
    async fn test_cancelled_token() {
        let token = CancellationToken::new();
        let ctx = RequestContext::new().with_cancellation(token.clone());
        assert_eq!(ctx.check(), None);

        token.cancel();
        assert_eq!(ctx.check(), Some(CancelReason::Cancelled));
        assert_eq!(ctx.done().await, CancelReason::Cancelled);
    }

    #[tokio::test]
    async fn test_earlier_deadline_wins() {
        let soon = Instant::now() + Duration::from_millis(10);
        let later = soon + Duration::from_secs(60);
        let ctx = RequestContext::new().with_deadline(soon).with_deadline(later);
        assert_eq!(ctx.deadline(), Some(soon));
    }

    #[test]
    fn test_unrepresentable_timeout_stays_live() {
        let ctx = RequestContext::new().with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert_eq!(ctx.check(), None);

        let soon = Instant::now() + Duration::from_secs(1);
        let ctx = RequestContext::new()
            .with_deadline(soon)
            .with_timeout(Duration::MAX);
        assert_eq!(ctx.deadline(), Some(soon));
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_waits_for_timeout() {
        let ctx = RequestContext::new().with_timeout(Duration::from_secs(30));
        let start = Instant::now();
        assert_eq!(ctx.done().await, CancelReason::DeadlineExceeded);
        assert!(start.elapsed() >= Duration::from_secs(30));
    }
}
