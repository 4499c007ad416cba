use serde_json::Value;

use super::Stage;
use crate::error::ApiError;
use crate::request::Request;

/// Presence and type checks on a product body.
///
/// `name` is checked before `price`; the first failure is reported alone.
/// The body is only read, never rewritten.
pub struct ValidateProduct;

impl Stage for ValidateProduct {
    fn check(&self, req: &Request) -> Result<(), ApiError> {
        let body: Value = req.json()?;
        let Value::Object(fields) = &body else {
            return Err(ApiError::validation("Request body must be a JSON object"));
        };

        match fields.get("name") {
            Some(Value::String(name)) if !name.is_empty() => {}
            _ => return Err(ApiError::validation("Name is required and must be a non-empty string")),
        }

        match fields.get("price").and_then(Value::as_f64) {
            Some(price) if price >= 0.0 => Ok(()),
            _ => Err(ApiError::validation("Price is required and must be a non-negative number")),
        }
    }
}
