//! Request tracing middleware.
//!
//! Tags every request with an ID, taken from `X-Request-ID` or generated,
//! and logs its completion.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn request_id_of(req: &Request<Body>) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Middleware that extracts or generates a request ID and echoes it back.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = request_id_of(&req);
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let start = std::time::Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
    });

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-request-id"), header_value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/health");
        if let Some(value) = header {
            builder = builder.header(REQUEST_ID_HEADER, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_request_id_from_header() {
        assert_eq!(request_id_of(&request(Some("req-123_abc"))), "req-123_abc");
    }

    #[test]
    fn test_request_id_generated_when_missing() {
        let id = request_id_of(&request(None));
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_request_id_generated_when_empty() {
        let id = request_id_of(&request(Some("")));
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_request_id_echoed_in_response() {
        use axum::{middleware::from_fn, routing::get, Router};
        use tower::ServiceExt;

        let app = Router::new()
            .route("/api/health", get(|| async { "ok" }))
            .layer(from_fn(trace_id));

        let response = app.oneshot(request(Some("req-123_abc"))).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-123_abc");
    }
}
