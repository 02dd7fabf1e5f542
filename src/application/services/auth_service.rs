//! Credential resolution service.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::KeyRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Resolves raw API credentials to opaque owner identities.
///
/// Credentials are hashed with HMAC-SHA256 (keyed by `signing_secret`) before
/// storage and comparison. An attacker with read-only access to the database
/// cannot verify or forge credentials without the server-side secret.
///
/// Issuance of credentials belongs to an external provider; the matching
/// operator tooling lives in the admin binary.
pub struct AuthService {
    keys: Arc<dyn KeyRepository>,
    signing_secret: String,
}

impl AuthService {
    /// # Arguments
    ///
    /// - `keys` - key repository for hash lookups
    /// - `signing_secret` - HMAC key; must match the value used when the
    ///   credentials were registered
    pub fn new(keys: Arc<dyn KeyRepository>, signing_secret: String) -> Self {
        Self {
            keys,
            signing_secret,
        }
    }

    /// Hashes a raw credential with HMAC-SHA256 using the server secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_credential(&self, credential: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(credential.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Resolves a raw credential to its owner identity.
    ///
    /// Returns `Ok(None)` for unknown or revoked credentials. On success the
    /// key's last-used timestamp is updated best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve_owner(&self, credential: &str) -> Result<Option<String>, AppError> {
        let hash = self.hash_credential(credential);

        let owner = self.keys.resolve(&hash).await?;

        if owner.is_some() {
            let _ = self.keys.touch(&hash).await;
        }

        Ok(owner)
    }
}
