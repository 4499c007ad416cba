use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use super::Stage;
use crate::error::ApiError;
use crate::request::Request;

/// Access log: one INFO event per request, before anything else runs.
///
/// Emitted under the `stockroom::access` target so it can be filtered on its
/// own (`RUST_LOG=stockroom::access=info`). The event carries its own UTC
/// timestamp because subscribers are free to drop theirs.
pub struct Logger;

impl Stage for Logger {
    fn check(&self, req: &Request) -> Result<(), ApiError> {
        info!(
            target: "stockroom::access",
            at = %timestamp(Utc::now()),
            method = %req.method(),
            url = %url(req),
            "request"
        );
        Ok(())
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn url(req: &Request) -> String {
    match req.raw_query() {
        Some(q) => format!("{}?{q}", req.path()),
        None => req.path().to_owned(),
    }
}
