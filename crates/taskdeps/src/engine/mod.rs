//! The dependency graph engine.
//!
//! - [`cycle`]: decides whether a candidate edge would close a cycle
//! - [`readiness`]: answers "can this task start" and "why not"
//! - [`service`]: the validated write path and the read-side aggregate
//!
//! All components read the live store on every call and keep no cached state.

pub mod cycle;
pub mod readiness;
pub mod service;

pub use cycle::CycleDetector;
pub use readiness::ReadinessEvaluator;
pub use service::DependencyService;

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// Run `fut` with a deadline, mapping expiry to `Error::Cancelled`.
pub(crate) async fn with_deadline<T>(
    limit: Duration,
    operation: &'static str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, timeout = ?limit, "Operation timed out");
            Err(Error::Cancelled(format!(
                "{operation} did not complete within {}ms",
                limit.as_millis()
            )))
        }
    }
}
