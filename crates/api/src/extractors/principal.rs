//! Principal extractor.
//!
//! Authentication and session handling live in front of this service; the
//! engine only needs an opaque principal for audit attribution. The
//! gateway forwards it in the `X-Principal` header.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use serde_json::json;

/// Header carrying the authenticated principal.
pub const PRINCIPAL_HEADER: &str = "x-principal";

/// The authenticated principal, as forwarded by the gateway.
#[derive(Debug, Clone)]
pub struct Principal(pub String);

impl Principal {
    /// Returns the principal identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "missing_principal",
                    "message": "X-Principal header is required"
                })),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_principal_extracted_from_header() {
        let request = Request::builder()
            .header("X-Principal", "agent.comptable")
            .body(())
            .unwrap();
        let (mut parts, ()) = request.into_parts();

        let principal = Principal::from_request_parts(&mut parts, &())
            .await
            .expect("principal extracted");
        assert_eq!(principal.as_str(), "agent.comptable");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, ()) = request.into_parts();

        let err = Principal::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_blank_header_is_unauthorized() {
        let request = Request::builder()
            .header("X-Principal", "   ")
            .body(())
            .unwrap();
        let (mut parts, ()) = request.into_parts();

        assert!(
            Principal::from_request_parts(&mut parts, &())
                .await
                .is_err()
        );
    }
}
