//! Repository trait for API credential resolution.

use crate::error::AppError;
use async_trait::async_trait;

/// A stored API key record, keyed by credential hash.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub key_hash: String,
    pub owner: String,
    pub label: String,
    pub revoked: bool,
}

/// Repository interface for resolving hashed credentials to owner identities.
///
/// Key *issuance* belongs to an external provider; this store only needs to
/// answer "which owner does this credential belong to". Raw credentials are
/// hashed before they reach this trait.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgKeyRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyRepository: Send + Sync {
    /// Resolves a credential hash to its owner identity, `None` if unknown
    /// or revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn resolve(&self, key_hash: &str) -> Result<Option<String>, AppError>;

    /// Records that a credential was used. Best-effort audit data.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn touch(&self, key_hash: &str) -> Result<(), AppError>;

    /// Registers a new key hash for an owner (operator tooling).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the hash already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn register(&self, key_hash: &str, owner: &str, label: &str) -> Result<(), AppError>;

    /// Revokes a key. Returns `false` if the hash is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn revoke(&self, key_hash: &str) -> Result<bool, AppError>;

    /// Lists keys for an owner, including revoked ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ApiKey>, AppError>;
}
