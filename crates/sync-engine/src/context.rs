//! Call-site capture for asynchronous failures.
//!
//! Stack traces taken after an asynchronous boundary point into the engine's
//! poll loops, not at the test line that invoked the action. The binder
//! captures the stack synchronously at entry, then appends locator and
//! call-site to any failure raised downstream, so one log line is enough to
//! find both what broke and where it was invoked.

use crate::errors::SyncError;
use chrono::{DateTime, Utc};
use std::backtrace::Backtrace;
use std::future::Future;
use tracing::warn;

/// Diagnostic context captured at the start of an engine operation.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    locator: String,
    call_site: String,
    captured_at: DateTime<Utc>,
}

impl ErrorContext {
    /// Capture the current call stack. Must run before the first suspension
    /// point of the operation it describes.
    pub fn capture(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            call_site: Backtrace::force_capture().to_string(),
            captured_at: Utc::now(),
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn call_site(&self) -> &str {
        &self.call_site
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Append locator and call-site stack to the error's diagnostic message,
    /// preserving the variant and its fields.
    pub fn annotate(&self, mut err: SyncError) -> SyncError {
        let message = err.message_mut();
        message.push_str("\n Locator: ");
        message.push_str(&self.locator);
        message.push_str("\n STACK: ");
        message.push_str(&self.call_site);
        err
    }
}

/// Run `operation`, annotating any failure with the captured context before
/// rethrowing. This is the only place that mutates an in-flight error; all
/// other layers propagate unmodified.
pub async fn with_error_context<T, F>(ctx: &ErrorContext, operation: F) -> Result<T, SyncError>
where
    F: Future<Output = Result<T, SyncError>>,
{
    operation.await.map_err(|err| {
        warn!(locator = %ctx.locator, error = %err, "operation failed, attaching call-site context");
        ctx.annotate(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WaitKind;
    use std::time::Duration;

    #[test]
    fn test_capture_records_nonempty_stack() {
        let ctx = ErrorContext::capture("#submit");
        assert_eq!(ctx.locator(), "#submit");
        assert!(!ctx.call_site().is_empty());
    }

    #[test]
    fn test_annotate_preserves_variant() {
        let ctx = ErrorContext::capture("#submit");
        let err = ctx.annotate(SyncError::timeout(
            WaitKind::Exist,
            Duration::from_secs(1),
            "no element",
        ));
        assert!(err.is_timeout());
        let text = err.to_string();
        assert!(text.contains("no element"));
        assert!(text.contains("Locator: #submit"));
        assert!(text.contains("STACK:"));
    }

    #[tokio::test]
    async fn test_with_error_context_passes_success_through() {
        let ctx = ErrorContext::capture("#ok");
        let value = with_error_context(&ctx, async { Ok::<_, SyncError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_with_error_context_annotates_failure() {
        let ctx = ErrorContext::capture("#bad");
        let err = with_error_context(&ctx, async {
            Err::<(), _>(SyncError::Execution("boom".to_string()))
        })
        .await
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("boom"));
        assert!(text.contains("Locator: #bad"));
        assert!(text.contains("STACK:"));
    }
}
