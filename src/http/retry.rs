//! Retry policy and the retrying transport.
//!
//! Transient failures (connection errors, timeouts, 429 and 5xx) are retried
//! with exponential backoff. Attempt counters live on the stack of a single
//! [`Transport::send`] call; nothing is shared between concurrent calls.

use std::sync::Arc;
use std::time::Duration;

use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::logger::Logger;

use super::classify;
use super::request::Request;
use super::transport::{HttpTransport, RawResponse, TransportError};

/// Default maximum number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default lower bound for the wait between attempts.
pub const DEFAULT_RETRY_WAIT_MIN: Duration = Duration::from_millis(500);

/// Default upper bound for the wait between attempts.
pub const DEFAULT_RETRY_WAIT_MAX: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero means a single attempt.
    pub max_retries: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
    /// Statuses retried in addition to 429 and 5xx.
    pub extra_retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            min_backoff: DEFAULT_RETRY_WAIT_MIN,
            max_backoff: DEFAULT_RETRY_WAIT_MAX,
            extra_retry_statuses: Vec::new(),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait before retry number `retry` (0-based): `min * 2^retry`, capped at
    /// the maximum.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.min_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        classify::should_retry(status) || self.extra_retry_statuses.contains(&status)
    }

    fn should_retry(&self, outcome: &std::result::Result<RawResponse, TransportError>) -> bool {
        match outcome {
            Ok(response) => self.should_retry_status(response.status),
            Err(_) => true,
        }
    }
}

/// A response together with the number of attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub response: RawResponse,
    pub attempts: u32,
}

/// Runs requests through an [`HttpTransport`] under a [`RetryPolicy`].
#[derive(Clone)]
pub struct Transport {
    inner: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
    logger: Arc<dyn Logger>,
}

impl Transport {
    pub fn new(inner: Arc<dyn HttpTransport>, policy: RetryPolicy, logger: Arc<dyn Logger>) -> Self {
        Self {
            inner,
            policy,
            logger,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Sends `request`, retrying transient failures.
    ///
    /// Returns the last response received once it is either accepted or no
    /// retries remain; a status >= 400 is still an `Ok` here and is left to
    /// the classifier. A transport failure on the final attempt becomes
    /// [`Error::Transport`]. Cancellation of `ctx` takes precedence over any
    /// further attempt or backoff.
    #[tracing::instrument(skip_all, fields(operation = request.operation, method = %request.method, path = %request.path))]
    pub async fn send(&self, ctx: &RequestContext, request: &Request) -> Result<Exchange> {
        let operation = request.operation;
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            if let Some(reason) = ctx.check() {
                return Err(Error::Cancelled { operation, reason });
            }

            attempt += 1;
            self.logger.debug(
                "making request",
                &[
                    ("method", &request.method),
                    ("path", &request.path),
                    ("attempt", &attempt),
                ],
            );

            let outcome = tokio::select! {
                biased;
                reason = ctx.done() => return Err(Error::Cancelled { operation, reason }),
                outcome = self.inner.execute(request) => outcome,
            };

            if attempt >= max_attempts || !self.policy.should_retry(&outcome) {
                return match outcome {
                    Ok(response) => Ok(Exchange {
                        response,
                        attempts: attempt,
                    }),
                    Err(source) => Err(Error::Transport {
                        operation,
                        attempts: attempt,
                        source,
                    }),
                };
            }

            let delay = self.policy.backoff(attempt - 1);
            let cause = match &outcome {
                Ok(response) => format!("status {}", response.status),
                Err(e) => e.to_string(),
            };
            self.logger.warn(
                "retrying request",
                &[
                    ("path", &request.path),
                    ("attempt", &attempt),
                    ("max_attempts", &max_attempts),
                    ("cause", &cause),
                    ("delay_ms", &delay.as_millis()),
                ],
            );

            tokio::select! {
                biased;
                reason = ctx.done() => return Err(Error::Cancelled { operation, reason }),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CancelReason;
    use crate::http::request::RequestBuilder;
    use crate::http::transport::MockHttpTransport;
    use crate::logger::NoopLogger;
    use crate::logger::testing::RecordingLogger;
    use async_trait::async_trait;
    use mockall::Sequence;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn request() -> Request {
        RequestBuilder::new("http://localhost", "k")
            .get("list webhooks", "/webhooks")
            .unwrap()
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            min_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
            extra_retry_statuses: Vec::new(),
        }
    }

    fn status(status: u16) -> std::result::Result<RawResponse, TransportError> {
        Ok(RawResponse {
            status,
            body: format!("status {}", status).into_bytes(),
        })
    }

    fn transport(mock: MockHttpTransport, policy: RetryPolicy) -> Transport {
        Transport::new(Arc::new(mock), policy, Arc::new(NoopLogger))
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff(2), Duration::from_millis(2000));
        assert_eq!(policy.backoff(3), Duration::from_millis(4000));
        assert_eq!(policy.backoff(4), Duration::from_secs(5));
        assert_eq!(policy.backoff(64), Duration::from_secs(5));
    }

    #[test]
    fn test_max_attempts() {
        assert_eq!(RetryPolicy::default().max_attempts(), 4);
        assert_eq!(RetryPolicy::no_retry().max_attempts(), 1);
        let policy = RetryPolicy {
            max_retries: u32::MAX,
            ..Default::default()
        };
        assert_eq!(policy.max_attempts(), u32::MAX);
    }

    #[test]
    fn test_should_retry_status() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry_status(429));
        assert!(policy.should_retry_status(500));
        assert!(policy.should_retry_status(503));
        assert!(!policy.should_retry_status(404));
        assert!(!policy.should_retry_status(408));

        let policy = RetryPolicy {
            extra_retry_statuses: vec![408],
            ..Default::default()
        };
        assert!(policy.should_retry_status(408));
    }

    #[tokio::test]
    async fn test_send_success_first_attempt() {
        let mut mock = MockHttpTransport::new();
        mock.expect_execute().times(1).returning(|_| status(200));

        let exchange = transport(mock, fast_policy(3))
            .send(&RequestContext::new(), &request())
            .await
            .unwrap();
        assert_eq!(exchange.response.status, 200);
        assert_eq!(exchange.attempts, 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_send_retries_server_errors_then_succeeds() {
        let mut seq = Sequence::new();
        let mut mock = MockHttpTransport::new();
        mock.expect_execute()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| status(500));
        mock.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| status(200));

        let exchange = transport(mock, fast_policy(2))
            .send(&RequestContext::new(), &request())
            .await
            .unwrap();
        assert_eq!(exchange.response.status, 200);
        assert_eq!(exchange.attempts, 3);
    }

    #[tokio::test]
    async fn test_send_no_retry_makes_single_attempt() {
        let mut mock = MockHttpTransport::new();
        mock.expect_execute().times(1).returning(|_| status(500));

        let exchange = transport(mock, fast_policy(0))
            .send(&RequestContext::new(), &request())
            .await
            .unwrap();
        assert_eq!(exchange.response.status, 500);
        assert_eq!(exchange.attempts, 1);
    }

    #[tokio::test]
    async fn test_send_returns_last_response_when_exhausted() {
        let mut mock = MockHttpTransport::new();
        mock.expect_execute().times(3).returning(|_| status(503));

        let exchange = transport(mock, fast_policy(2))
            .send(&RequestContext::new(), &request())
            .await
            .unwrap();
        assert_eq!(exchange.response.status, 503);
        assert_eq!(exchange.attempts, 3);
    }

    #[tokio::test]
    async fn test_send_does_not_retry_client_errors() {
        let mut mock = MockHttpTransport::new();
        mock.expect_execute().times(1).returning(|_| status(404));

        let exchange = transport(mock, fast_policy(3))
            .send(&RequestContext::new(), &request())
            .await
            .unwrap();
        assert_eq!(exchange.response.status, 404);
        assert_eq!(exchange.attempts, 1);
    }

    #[tokio::test]
    async fn test_send_retries_rate_limit() {
        let mut seq = Sequence::new();
        let mut mock = MockHttpTransport::new();
        mock.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| status(429));
        mock.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| status(200));

        let exchange = transport(mock, fast_policy(3))
            .send(&RequestContext::new(), &request())
            .await
            .unwrap();
        assert_eq!(exchange.attempts, 2);
    }

    #[tokio::test]
    async fn test_send_transport_error_exhausts_into_transport_error() {
        let mut mock = MockHttpTransport::new();
        mock.expect_execute()
            .times(3)
            .returning(|_| Err(TransportError::new("connection reset")));

        let err = transport(mock, fast_policy(2))
            .send(&RequestContext::new(), &request())
            .await
            .unwrap_err();
        match err {
            Error::Transport {
                operation,
                attempts,
                source,
            } => {
                assert_eq!(operation, "list webhooks");
                assert_eq!(attempts, 3);
                assert_eq!(source.to_string(), "connection reset");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_last_outcome_wins() {
        // A transport failure followed by a 500 on the final attempt surfaces
        // the response, not the earlier failure.
        let mut seq = Sequence::new();
        let mut mock = MockHttpTransport::new();
        mock.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(TransportError::timeout("timed out")));
        mock.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| status(500));

        let exchange = transport(mock, fast_policy(1))
            .send(&RequestContext::new(), &request())
            .await
            .unwrap();
        assert_eq!(exchange.response.status, 500);
        assert_eq!(exchange.attempts, 2);
    }

    #[tokio::test]
    async fn test_send_cancelled_before_first_attempt() {
        let mut mock = MockHttpTransport::new();
        mock.expect_execute().never();

        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let ctx = RequestContext::new().with_cancellation(token);

        let err = transport(mock, fast_policy(3))
            .send(&ctx, &request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Cancelled {
                reason: CancelReason::Cancelled,
                ..
            }
        ));
    }

    /// Answers every request after a fixed delay.
    struct SlowTransport {
        delay: Duration,
        calls: AtomicU32,
    }

    #[async_trait]
    impl HttpTransport for SlowTransport {
        async fn execute(&self, _request: &Request) -> std::result::Result<RawResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            status(500)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_during_attempt_is_cancellation_not_exhaustion() {
        let slow = Arc::new(SlowTransport {
            delay: Duration::from_secs(2),
            calls: AtomicU32::new(0),
        });
        let transport = Transport::new(slow.clone(), fast_policy(5), Arc::new(NoopLogger));
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(100));

        let err = transport.send(&ctx, &request()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Cancelled {
                reason: CancelReason::DeadlineExceeded,
                ..
            }
        ));
        assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_during_backoff_stops_retrying() {
        let mut mock = MockHttpTransport::new();
        mock.expect_execute().times(1).returning(|_| status(503));

        let policy = RetryPolicy {
            max_retries: 3,
            min_backoff: Duration::from_secs(10),
            max_backoff: Duration::from_secs(10),
            extra_retry_statuses: Vec::new(),
        };
        let ctx = RequestContext::new().with_timeout(Duration::from_secs(1));

        let err = transport(mock, policy)
            .send(&ctx, &request())
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_retries_are_logged() {
        let mut seq = Sequence::new();
        let mut mock = MockHttpTransport::new();
        mock.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| status(502));
        mock.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| status(200));

        let logger = Arc::new(RecordingLogger::default());
        let transport = Transport::new(Arc::new(mock), fast_policy(1), logger.clone());
        transport.send(&RequestContext::new(), &request()).await.unwrap();

        let warnings: Vec<_> = logger
            .lines()
            .into_iter()
            .filter(|l| l.starts_with("WARN"))
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("cause=status 502"));
        assert!(warnings[0].contains("attempt=1"));
    }
}
