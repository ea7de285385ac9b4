//! Middleware for logging requests and responses.

use axum::{body::Body, extract::Request, middleware::Next, response::Response};

/// The number of body bytes included in request/response log lines before
/// truncation. Full bodies go to the `debug` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both sides are logged at the `info` level with the body truncated to
/// [LOG_BODY_LENGTH_LIMIT] bytes; the full body is logged at `debug`.
/// Bodies are reconstructed from the original bytes, so binary responses
/// (the statement exports) pass through unchanged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    log_body(
        &format!("Received request: {} {}", parts.method, parts.uri),
        &String::from_utf8_lossy(&body_bytes),
    );

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    log_body(
        &format!("Sending response: {}", parts.status),
        &String::from_utf8_lossy(&body_bytes),
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

fn log_body(prefix: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("{prefix} body: {}…", truncated(body));
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{prefix} body: {body:?}");
    }
}

/// The longest prefix of `body` within the log limit that does not split a
/// UTF-8 character.
fn truncated(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

#[cfg(test)]
mod truncated_tests {
    use super::{LOG_BODY_LENGTH_LIMIT, truncated};

    #[test]
    fn short_bodies_pass_through() {
        assert_eq!(truncated("hello"), "hello");
    }

    #[test]
    fn long_bodies_are_cut_to_the_limit() {
        let body = "x".repeat(200);

        assert_eq!(truncated(&body).len(), LOG_BODY_LENGTH_LIMIT);
    }

    #[test]
    fn never_splits_a_character() {
        let body = "é".repeat(200);

        let cut = truncated(&body);
        assert!(cut.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(body.starts_with(cut));
    }
}
