//! Short code generation and validation utilities.

use std::sync::LazyLock;

use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;

/// Default length of generated short codes. 62^6 ≈ 5.7e10 possible codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Codes that would shadow system routes.
const RESERVED_CODES: &[&str] = &["urls", "health", "api", "admin", "static"];

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

/// Generates a random short code of exactly `length` characters, drawn
/// uniformly from the 62-character alphanumeric alphabet.
///
/// The thread RNG is a CSPRNG, so collision probability at realistic table
/// sizes is negligible - but uniqueness is enforced by the store's
/// conditional insert, never assumed from this function.
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Validates a caller-supplied custom short code.
///
/// # Rules
///
/// - Length: 4-32 characters
/// - Allowed characters: ASCII letters and digits
/// - Cannot be a reserved system route
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < 4 || code.len() > 32 {
        return Err(AppError::bad_request(
            "Custom code must be 4-32 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters and digits",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
