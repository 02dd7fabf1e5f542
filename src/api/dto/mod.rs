//! Request/response DTOs for the REST API.

pub mod analytics;
pub mod health;
pub mod links;
pub mod shorten;
