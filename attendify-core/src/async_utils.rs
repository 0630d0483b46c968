//! Async utilities and patterns

use crate::error::{AttendifyError, AttendifyResult, ErrorContext};
use tokio::time::{timeout, Duration};

/// Timeout wrapper for async operations
pub async fn with_timeout<F, T>(
    future: F,
    timeout_ms: u64,
    operation_name: &str,
) -> AttendifyResult<T>
where
    F: std::future::Future<Output = T>,
{
    match timeout(Duration::from_millis(timeout_ms), future).await {
        Ok(result) => Ok(result),
        Err(_) => Err(AttendifyError::Timeout {
            operation: operation_name.to_string(),
            duration_ms: timeout_ms,
            context: ErrorContext::new("async_utils")
                .with_operation("timeout")
                .with_metadata("timeout_ms", &timeout_ms.to_string())
                .with_suggestion("Increase timeout duration")
                .with_suggestion("Verify service availability"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let value = with_timeout(async { 7 }, 100, "quick").await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let result = with_timeout(tokio::time::sleep(Duration::from_secs(10)), 50, "slow").await;

        match result {
            Err(AttendifyError::Timeout {
                operation,
                duration_ms,
                ..
            }) => {
                assert_eq!(operation, "slow");
                assert_eq!(duration_ms, 50);
            }
            other => panic!("Expected timeout, got {:?}", other.map(|_| ())),
        }
    }
}
