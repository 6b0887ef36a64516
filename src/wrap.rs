//! Result-wrapping combinators.
//!
//! `wrapped` and `async_wrapped` adapt a callable that may panic into one
//! that always returns a `Result`. The dispatcher reuses the same machinery
//! to contain a panicking response classifier.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use futures::future::BoxFuture;

/// A caught panic payload.
///
/// The payload is carried unmodified; [`message`](Self::message) recovers the
/// conventional `&str`/`String` forms for display, and
/// [`into_inner`](Self::into_inner) hands back the raw payload for callers
/// that panicked with something else.
pub struct CaughtPanic(Box<dyn Any + Send>);

impl CaughtPanic {
    pub(crate) fn new(payload: Box<dyn Any + Send>) -> Self {
        Self(payload)
    }

    /// The panic message, if the payload was a string.
    pub fn message(&self) -> &str {
        if let Some(s) = self.0.downcast_ref::<&'static str>() {
            s
        } else if let Some(s) = self.0.downcast_ref::<String>() {
            s
        } else {
            "non-string panic payload"
        }
    }

    /// Consume the carrier and return the raw panic payload.
    pub fn into_inner(self) -> Box<dyn Any + Send> {
        self.0
    }
}

impl fmt::Debug for CaughtPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CaughtPanic").field(&self.message()).finish()
    }
}

impl fmt::Display for CaughtPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for CaughtPanic {}

/// Adapt a callable into one that never panics.
///
/// Normal completion becomes `Ok(value)`; a panic becomes
/// `Err(CaughtPanic)` with the payload passed through unmodified.
///
/// ```
/// use smart_fetch::wrapped;
///
/// let res = wrapped(|| 4)();
/// assert_eq!(res.unwrap(), 4);
///
/// let res: Result<i32, _> = wrapped(|| panic!("boom"))();
/// assert_eq!(res.unwrap_err().message(), "boom");
/// ```
pub fn wrapped<F, T>(f: F) -> impl FnOnce() -> Result<T, CaughtPanic>
where
    F: FnOnce() -> T,
{
    move || panic::catch_unwind(AssertUnwindSafe(f)).map_err(CaughtPanic::new)
}

/// Async flavor of [`wrapped`].
///
/// The returned callable produces a future; awaiting it yields `Ok` on
/// normal completion and `Err(CaughtPanic)` if the callable or its future
/// panics.
pub fn async_wrapped<F, Fut, T>(f: F) -> impl FnOnce() -> BoxFuture<'static, Result<T, CaughtPanic>>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    move || {
        AssertUnwindSafe(async move { f().await })
            .catch_unwind()
            .map(|outcome| outcome.map_err(CaughtPanic::new))
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_returns_ok_on_normal_completion() {
        let res = wrapped(|| 4)();
        assert_eq!(res.unwrap(), 4);
    }

    #[test]
    fn wrapped_forwards_arguments_via_capture() {
        let (a, b) = (2, 3);
        let res = wrapped(move || a + b)();
        assert_eq!(res.unwrap(), 5);
    }

    #[test]
    fn wrapped_catches_panics() {
        let res: Result<i32, CaughtPanic> = wrapped(|| panic!("wrapped error tester"))();
        assert_eq!(res.unwrap_err().message(), "wrapped error tester");
    }

    #[test]
    fn wrapped_passes_payload_through_unmodified() {
        let res: Result<(), CaughtPanic> = wrapped(|| panic::panic_any(42_i32))();
        let payload = res.unwrap_err().into_inner();
        assert_eq!(payload.downcast_ref::<i32>(), Some(&42));
    }

    #[tokio::test]
    async fn async_wrapped_returns_ok_on_successful_calls() {
        let res = async_wrapped(|| async { 5 })().await;
        assert_eq!(res.unwrap(), 5);
    }

    #[tokio::test]
    async fn async_wrapped_catches_panics_inside_the_future() {
        let res: Result<i32, CaughtPanic> =
            async_wrapped(|| async { panic!("async wrapped error tester") })().await;
        assert_eq!(res.unwrap_err().message(), "async wrapped error tester");
    }

    #[tokio::test]
    async fn async_wrapped_catches_panics_before_the_future_exists() {
        let res: Result<i32, CaughtPanic> = async_wrapped(|| {
            panic!("constructor panicked");
            #[allow(unreachable_code)]
            async {
                0
            }
        })()
        .await;
        assert_eq!(res.unwrap_err().message(), "constructor panicked");
    }
}
