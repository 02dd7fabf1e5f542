//! Repository traits - the seams between business logic and storage.

mod click_repository;
mod key_repository;
mod link_repository;

pub use click_repository::ClickRepository;
pub use key_repository::{ApiKey, KeyRepository};
pub use link_repository::{CreateOutcome, LinkRepository};

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use key_repository::MockKeyRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
