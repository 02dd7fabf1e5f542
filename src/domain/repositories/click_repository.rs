//! Repository trait for the append-only click ledger.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for click events.
///
/// The ledger is append-only and time-ordered per code. Writes happen on the
/// background worker only; reads serve the analytics aggregator.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends one click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including the
    /// (pathological) same-microsecond key collision.
    async fn record(&self, new_click: NewClick) -> Result<(), AppError>;

    /// Returns the time-windowed slice of the ledger for one code, all events
    /// with `clicked_at >= since`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_code_since(
        &self,
        code: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Click>, AppError>;
}
