use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use log::{error, info, warn};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;

/// The caller's request id, if it is short printable ASCII.
fn incoming_request_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map(str::to_string)
}

/// Logs each request on entry and exit, tagging both lines (and the response)
/// with the caller's request id or a fresh one.
pub async fn logging_middleware(mut request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let request_id = incoming_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header_value {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    info!("[{}] --> {} {}", request_id, method, uri);

    let mut response = next.run(request).await;

    let duration = start_time.elapsed();
    let status = response.status();
    if status.is_server_error() {
        error!(
            "[{}] <-- {} {} {} in {}ms",
            request_id,
            method,
            uri,
            status,
            duration.as_millis()
        );
    } else if status.is_client_error() {
        warn!(
            "[{}] <-- {} {} {} in {}ms",
            request_id,
            method,
            uri,
            status,
            duration.as_millis()
        );
    } else {
        info!(
            "[{}] <-- {} {} {} in {}ms",
            request_id,
            method,
            uri,
            status,
            duration.as_millis()
        );
    }

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
