//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific view of the dashboard.

mod accounts;
mod dashboard;
mod transactions;

use std::future::Future;
use std::time::Duration;

pub use accounts::AccountService;
pub use dashboard::{Dashboard, DashboardService};
pub use transactions::TransactionService;

use crate::domain::result::{Error, Result};

/// Bound one external call by `limit`. Elapsing counts as an upstream failure.
pub(crate) async fn with_timeout<T, F>(limit: Duration, what: &str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(Error::upstream(format!(
            "{} timed out after {}s",
            what,
            limit.as_secs_f64()
        ))),
    }
}
