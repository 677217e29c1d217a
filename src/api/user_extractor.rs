use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;

use crate::model::UserContext;

/// Axum extractor for the audit identity of a request.
///
/// - X-User-Id: user identifier written to created_by/updated_by
/// - X-User-Name: optional display name
///
/// Requests without an X-User-Id are attributed to the development user.
#[async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(user_from_headers(&parts.headers))
    }
}

fn user_from_headers(headers: &HeaderMap) -> UserContext {
    match extract_header_value(headers, "x-user-id") {
        Some(user_id) => {
            UserContext::with_name(user_id, extract_header_value(headers, "x-user-name"))
        }
        None => UserContext::default_user(),
    }
}

/// Header value as a trimmed, non-empty string
fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
