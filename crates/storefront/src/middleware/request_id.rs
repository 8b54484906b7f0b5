//! Request ID middleware for request tracing and correlation.
//!
//! Each request carries an ID that is recorded in the tracing span, tagged on
//! the Sentry scope, and echoed in the response headers. A well-formed ID
//! from an upstream proxy is reused; anything else is replaced by a UUID v4.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest incoming request ID that is reused as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok()),
    );

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Reuse an incoming ID if it is short and printable, otherwise mint one.
fn resolve_request_id(incoming: Option<&str>) -> String {
    incoming
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http, middleware, routing::get};
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn test_resolve_request_id_reuses_valid_id() {
        assert_eq!(resolve_request_id(Some("abc-123")), "abc-123");
        assert_eq!(resolve_request_id(Some("  cf-ray-1 ")), "cf-ray-1");
    }

    #[test]
    fn test_resolve_request_id_replaces_bad_id() {
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        for incoming in [None, Some(""), Some("has space"), Some(long.as_str())] {
            let id = resolve_request_id(incoming);
            assert!(Uuid::parse_str(&id).is_ok(), "expected uuid, got {id}");
        }
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(request_id_middleware));

        let response = app
            .oneshot(
                http::Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "req-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "req-7");
    }
}
