use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const TRACE_HEADER: &str = "X-Trace-Id";

/// Tag every request with a fresh id, recorded on the tracing span covering
/// the handler and echoed in the response headers.
pub async fn assign_trace_id(req: Request<Body>, next: Next) -> Response {
    let trace_id = Uuid::new_v4().to_string();

    let span = tracing::info_span!(
        "request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path()
    );
    let mut res = next.run(req).instrument(span).await;

    res.headers_mut().insert(
        TRACE_HEADER,
        HeaderValue::from_str(&trace_id).unwrap_or(HeaderValue::from_static("invalid")),
    );
    res
}
