//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkStatus, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Outcome of a conditional insert.
///
/// `AlreadyExists` is a normal result, not an error: the random-code path
/// retries with a fresh code, the custom-code path surfaces a conflict.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Created(Link),
    AlreadyExists,
}

/// Repository interface for the link store.
///
/// Uniqueness and counter atomicity live here, not in callers: `create` is an
/// atomic insert-if-absent and `increment_usage` is a commutative add, so
/// concurrent requests need no coordination above the store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link only if no row exists for its code.
    ///
    /// This conditional insert is the single enforcement point for code
    /// uniqueness; any pre-check is a latency fast path only.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<CreateOutcome, AppError>;

    /// Point lookup by short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Atomically adds 1 to the usage counter and returns the new count, or
    /// `None` if the code does not exist.
    ///
    /// Implemented as a commutative add in a single statement; safe under
    /// unbounded concurrent callers with no lost updates.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_usage(&self, code: &str) -> Result<Option<i64>, AppError>;

    /// Keyset-paginated listing of an owner's links, newest first.
    ///
    /// `after` is the decoded cursor position of the previous page's last
    /// row; `None` starts from the top.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_owner(
        &self,
        owner: &str,
        limit: i64,
        after: Option<i64>,
    ) -> Result<Vec<Link>, AppError>;

    /// Out-of-band status change. Returns `false` if the code is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn set_status(&self, code: &str, status: LinkStatus) -> Result<bool, AppError>;
}
