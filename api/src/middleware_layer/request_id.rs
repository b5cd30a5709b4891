use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Keeps a caller-supplied `X-Request-Id` or assigns `req-<nanos>`, makes it
/// visible to handlers and echoes it on the response.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = match existing_id(req.headers()) {
        Some(v) => v,
        None => {
            let nanos = Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
            let generated = HeaderValue::from_str(&format!("req-{nanos}"))
                .unwrap_or_else(|_| HeaderValue::from_static("req-unknown"));
            req.headers_mut().insert(REQUEST_ID_HEADER, generated.clone());
            generated
        }
    };

    let mut res = next.run(req).await;
    res.headers_mut().insert(REQUEST_ID_HEADER, id);
    res
}

fn existing_id(headers: &HeaderMap) -> Option<HeaderValue> {
    headers
        .get(REQUEST_ID_HEADER)
        .filter(|h| h.to_str().map(|v| !v.trim().is_empty()).unwrap_or(false))
        .cloned()
}

/// Request id for logging (`-` when absent).
pub fn request_id_of(headers: &HeaderMap) -> &str {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}
