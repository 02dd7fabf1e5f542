//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// Activation state of a link.
///
/// Links are never physically deleted; deactivation is the only way to take
/// one out of service, and it is reversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Active,
    Inactive,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Active => "active",
            LinkStatus::Inactive => "inactive",
        }
    }

    /// Parses the stored representation. Unknown values map to `Inactive` so
    /// a corrupted row can never serve redirects.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "active" => LinkStatus::Active,
            _ => LinkStatus::Inactive,
        }
    }
}

/// A shortened URL link with metadata.
///
/// The short code is globally unique and immutable once created. After
/// creation the row is only ever touched by the usage-counter increment or an
/// out-of-band status change.
#[derive(Debug, Clone)]
pub struct Link {
    /// Row position used only as the pagination cursor.
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub status: LinkStatus,
    pub usage_count: i64,
    /// Opaque owner identity; `None` for legacy anonymous links.
    pub owner: Option<String>,
    /// Opaque credential the link was created with.
    pub credential: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        code: String,
        long_url: String,
        status: LinkStatus,
        usage_count: i64,
        owner: Option<String>,
        credential: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            long_url,
            status,
            usage_count,
            owner,
            credential,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LinkStatus::Active
    }

    /// Whether `requester` may read this link's analytics. Ownership is an
    /// opaque equality check; anonymous links belong to nobody.
    pub fn is_owned_by(&self, requester: &str) -> bool {
        self.owner.as_deref() == Some(requester)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
    pub owner: Option<String>,
    pub credential: String,
}
