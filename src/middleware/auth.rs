use tracing::debug;

use super::Stage;
use crate::error::ApiError;
use crate::request::Request;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "api-key";

/// Shared-secret authentication.
///
/// Passes when the `api-key` header equals the configured key byte for byte.
/// The comparison takes the same time wherever the first differing byte is.
pub struct ApiKey {
    key: Box<[u8]>,
}

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into().into_bytes().into_boxed_slice() }
    }
}

impl Stage for ApiKey {
    fn check(&self, req: &Request) -> Result<(), ApiError> {
        match req.header_value(API_KEY_HEADER) {
            Some(given) if constant_time_eq(given.as_bytes(), &self.key) => Ok(()),
            Some(_) => {
                debug!(path = %req.path(), "api key mismatch");
                Err(ApiError::auth("Unauthorized: invalid API key"))
            }
            None => {
                debug!(path = %req.path(), "api key missing");
                Err(ApiError::auth("Unauthorized: missing API key"))
            }
        }
    }
}

/// Compares all bytes regardless of where they differ. Length is not secret.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_key_passes() {
        let req = Request::new("POST", "/products").header("API-Key", "s3cret");
        assert_eq!(ApiKey::new("s3cret").check(&req), Ok(()));
    }

    #[test]
    fn missing_or_wrong_key_is_auth_error() {
        let stage = ApiKey::new("s3cret");
        let missing = stage.check(&Request::new("POST", "/products")).unwrap_err();
        let wrong = stage
            .check(&Request::new("POST", "/products").header("api-key", "s3creT"))
            .unwrap_err();
        assert!(matches!(missing, ApiError::Auth(_)));
        assert!(matches!(wrong, ApiError::Auth(_)));
    }

    #[test]
    fn prefix_of_key_is_rejected() {
        let req = Request::new("POST", "/products").header("api-key", "s3c");
        assert!(ApiKey::new("s3cret").check(&req).is_err());
    }

    #[test]
    fn constant_time_eq_basics() {
        assert!(constant_time_eq(b"", b""));
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
