//! Host entry points and safe wrappers.

use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

use super::Guard;
use crate::error::ErrorKind;
use crate::intake::ErrorDetails;
use crate::notifications::Dispatch;

impl Guard {
    /// An error nobody handled.
    pub fn report_uncaught<E: std::error::Error + ?Sized>(&self, error: &E) -> Dispatch {
        self.capture_error(error, &ErrorKind::UncaughtRuntimeError)
    }

    /// An asynchronous operation rejected with no handler attached.
    ///
    /// Rejection reasons are often not errors at all, so this takes details.
    pub fn report_rejection(&self, reason: ErrorDetails) -> Dispatch {
        self.capture(reason, &ErrorKind::RejectedOperation)
    }

    /// An error written to the host console.
    pub fn report_console<E: std::error::Error + ?Sized>(&self, error: &E) -> Dispatch {
        self.capture_error(error, &ErrorKind::ConsoleError)
    }

    /// Await `operation`, returning `fallback` instead of its error.
    pub async fn safe_async<T, E, Fut>(&self, operation: Fut, fallback: T) -> T
    where
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error,
    {
        match operation.await {
            Ok(value) => value,
            Err(e) => {
                self.capture_error(&e, &ErrorKind::WrappedAsyncFailure);
                fallback
            }
        }
    }

    /// Run `operation`, returning `None` if it fails or panics.
    pub fn safe_sync<T, E, F>(&self, operation: F) -> Option<T>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::error::Error,
    {
        match catch_unwind(AssertUnwindSafe(operation)) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                self.capture_error(&e, &ErrorKind::WrappedOperationFailure);
                None
            }
            Err(payload) => {
                self.capture(
                    ErrorDetails::message(panic_message(payload.as_ref())),
                    &ErrorKind::WrappedOperationFailure,
                );
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "operation panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GuardConfig;
    use crate::error::MessageError;
    use crate::Guard;

    #[tokio::test]
    async fn test_safe_async_returns_fallback() {
        let guard = Guard::new(GuardConfig::default());

        let ok = guard.safe_async(async { Ok::<_, MessageError>(7) }, 0).await;
        assert_eq!(ok, 7);
        assert!(guard.errors().is_empty());

        let failed = guard
            .safe_async(async { Err::<i32, _>(MessageError::from("boom")) }, -1)
            .await;
        assert_eq!(failed, -1);

        let errors = guard.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, "Safe Async Wrapper");
        assert_eq!(errors[0].message, "boom");
    }

    #[test]
    fn test_safe_sync_catches_errors_and_panics() {
        let guard = Guard::new(GuardConfig::default());

        assert_eq!(guard.safe_sync(|| Ok::<_, MessageError>("fine")), Some("fine"));
        assert_eq!(guard.safe_sync(|| Err::<(), _>(MessageError::from("bad node"))), None);
        assert_eq!(
            guard.safe_sync(|| -> Result<(), MessageError> { panic!("detached element") }),
            None
        );

        let errors = guard.errors();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.category == "Safe DOM Operation"));
        assert_eq!(errors[1].message, "detached element");
    }

    #[test]
    fn test_host_entry_points_use_categories() {
        let guard = Guard::new(GuardConfig::default());
        guard.report_uncaught(&MessageError::from("x is undefined"));
        guard.report_rejection(crate::intake::ErrorDetails::message("rejected"));
        guard.report_console(&MessageError::from("logged"));

        let categories: Vec<_> = guard.errors().into_iter().map(|e| e.category).collect();
        assert_eq!(categories, vec!["JavaScript Error", "Promise Rejection", "Console Error"]);
    }
}
