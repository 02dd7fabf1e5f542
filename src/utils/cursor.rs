//! Opaque continuation tokens for paginated listings.
//!
//! A token is the URL-safe base64 encoding of the decimal row position the
//! previous page stopped at. Opaque to clients, lossless on round-trip.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use crate::error::AppError;

/// Encodes a cursor position into an opaque continuation token.
pub fn encode(position: i64) -> String {
    URL_SAFE_NO_PAD.encode(position.to_string())
}

/// Decodes a continuation token back into a cursor position.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for tokens that are not valid base64 or
/// do not decode to a non-negative integer.
pub fn decode(token: &str) -> Result<i64, AppError> {
    let invalid = || {
        AppError::bad_request(
            "Invalid pagination token",
            json!({ "field": "next_token", "value": token }),
        )
    };

    let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| invalid())?;
    let text = String::from_utf8(bytes).map_err(|_| invalid())?;
    let position: i64 = text.parse().map_err(|_| invalid())?;

    if position < 0 {
        return Err(invalid());
    }

    Ok(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for position in [0, 1, 42, 999_999, i64::MAX] {
            assert_eq!(decode(&encode(position)).unwrap(), position);
        }
    }

    #[test]
    fn test_token_is_opaque() {
        // Not the raw number: clients should not be tempted to fabricate it.
        assert_ne!(encode(42), "42");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("!!not-base64!!").is_err());
        assert!(decode("").is_err());
    }

    #[test]
    fn test_decode_rejects_non_numeric_payload() {
        let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("not-a-number");
        assert!(decode(&token).is_err());
    }

    #[test]
    fn test_decode_rejects_negative_position() {
        let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("-5");
        assert!(decode(&token).is_err());
    }
}
