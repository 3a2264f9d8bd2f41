//! Deadlines for store calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use warden_core::error::AppError;
use warden_core::result::AppResult;

/// Run a store call, failing with `Internal` if it outlives `limit`.
///
/// Errors returned by the call itself pass through untouched.
pub async fn bounded<T, F>(operation: &'static str, limit: Duration, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                limit_ms = limit.as_millis() as u64,
                "Store call deadline elapsed"
            );
            Err(AppError::internal(format!(
                "{operation}: store did not answer within {} ms",
                limit.as_millis()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use warden_core::error::ErrorKind;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_deadline_is_internal() {
        let err = bounded("exists", Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(true)
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(err.message.starts_with("exists:"));
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let err = bounded::<(), _>("fetch", Duration::from_secs(1), async {
            Err(AppError::not_found("missing"))
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
