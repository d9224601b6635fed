//! Bearer-token authentication and request-context construction.

use axum::http::HeaderMap;
use bridge_primitives::{Identity, RequestContext, Subject};
use thiserror::Error;

/// Authentication failures, rejected before any dispatch happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// A token is configured but the request carried none.
    #[error("missing bearer token")]
    MissingToken,
    /// A token is configured and the presented one did not match.
    #[error("invalid bearer token")]
    InvalidToken,
}

/// Resolves the calling subject from the request headers.
///
/// With no configured token every caller runs as the anonymous subject and
/// per-tool permissions decide. With a token configured, the request must
/// carry `Authorization: Bearer <token>`; a match runs as the supplied
/// service identity.
///
/// # Errors
///
/// Returns [`AuthError`] when a token is configured and the request carries
/// none, or a non-matching one.
pub fn authenticate(
    expected_token: Option<&str>,
    service_identity: &Identity,
    headers: &HeaderMap,
) -> Result<Subject, AuthError> {
    let Some(expected) = expected_token else {
        return Ok(Subject::Anonymous);
    };

    let presented = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    if presented == expected {
        Ok(Subject::Authenticated(service_identity.clone()))
    } else {
        Err(AuthError::InvalidToken)
    }
}

/// Builds the read-only request context handed to the permission chain.
///
/// Copies the transport headers (values that are not valid UTF-8 are
/// dropped) and the raw query string into the context.
#[must_use]
pub fn build_context(subject: Subject, headers: &HeaderMap, raw_query: Option<&str>) -> RequestContext {
    let mut ctx = RequestContext::new(subject);

    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            ctx.insert_header(name.as_str(), value);
        }
    }

    if let Some(raw_query) = raw_query {
        for pair in raw_query.split('&').filter(|pair| !pair.is_empty()) {
            match pair.split_once('=') {
                Some((name, value)) => ctx.insert_query(name, value),
                None => ctx.insert_query(pair, ""),
            }
        }
    }

    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use bridge_primitives::SubjectId;

    fn identity() -> Identity {
        Identity::new(SubjectId::random(), "mcp-client")
    }

    #[test]
    fn no_configured_token_yields_anonymous() {
        let headers = HeaderMap::new();
        let subject = authenticate(None, &identity(), &headers).unwrap();
        assert!(!subject.is_authenticated());
    }

    #[test]
    fn matching_token_authenticates_service_identity() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer s3cret"));

        let subject = authenticate(Some("s3cret"), &identity(), &headers).unwrap();
        assert!(subject.is_authenticated());
        assert_eq!(subject.identity().unwrap().username(), "mcp-client");
    }

    #[test]
    fn missing_or_wrong_token_rejected() {
        let headers = HeaderMap::new();
        assert_eq!(
            authenticate(Some("s3cret"), &identity(), &headers),
            Err(AuthError::MissingToken)
        );

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer wrong"));
        assert_eq!(
            authenticate(Some("s3cret"), &identity(), &headers),
            Err(AuthError::InvalidToken)
        );

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(
            authenticate(Some("s3cret"), &identity(), &headers),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn context_carries_headers_and_query() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("k-1"));

        let ctx = build_context(Subject::Anonymous, &headers, Some("api_key=k-1&flag"));
        assert_eq!(ctx.header("X-Api-Key"), Some("k-1"));
        assert_eq!(ctx.query_param("api_key"), Some("k-1"));
        assert_eq!(ctx.query_param("flag"), Some(""));
    }
}
