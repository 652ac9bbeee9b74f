// Conflict retry policy
use crate::error::{AppError, Result};
use std::future::Future;
use tracing::warn;

/// How many times a write is re-run after losing the store's write lock
pub const CONFLICT_RETRY_LIMIT: u32 = 1;

/// Run `attempt`, re-running it when it fails with `AppError::Conflict`
///
/// Each call to `attempt` must open its own transaction, so a retry always
/// re-validates against the rows as they are now. The final error is returned
/// unchanged; callers decide how a persistent conflict is reported.
///
/// # Example
/// ```text
/// let receipt = with_conflict_retry("enqueue", || async move {
///     let mut tx = repo.begin_transaction().await?;
///     ...
/// })
/// .await?;
/// ```
pub async fn with_conflict_retry<T, F, Fut>(operation: &str, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(err) if err.is_conflict() && retries < CONFLICT_RETRY_LIMIT => {
                retries += 1;
                warn!(
                    operation = %operation,
                    retry = %retries,
                    error = %err,
                    "Write conflict, retrying"
                );
            }
            other => return other,
        }
    }
}

/// Report a persistent conflict as "no matching row"
///
/// From the caller's side a lost race means the targeted row no longer matches
/// what it asked for.
pub fn conflict_as_not_found(err: AppError) -> AppError {
    match err {
        AppError::Conflict(msg) => AppError::NotFound(format!(
            "Target no longer matches after a concurrent update ({})",
            msg
        )),
        other => other,
    }
}
