pub mod auth;
pub mod crew;
pub mod error;
pub mod health;
pub mod login;
pub mod schedule;

use std::sync::Arc;

use crate::app::AppState;
use error::ApiError;

/// Run a SQLite-bound closure on the blocking pool.
///
/// Managers hold a std Mutex around their connection; taking it on an async
/// worker would stall every other request on that thread.
pub async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppState) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
}
