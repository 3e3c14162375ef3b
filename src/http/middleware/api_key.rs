use crate::error::ApiError;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Reads pass through; anything that writes must carry `X-Api-Key`.
pub async fn require_api_key_for_writes(
    State(expected): State<String>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_read_only(request.method()) {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get("X-Api-Key")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if provided.is_empty() || provided != expected {
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

fn is_read_only(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_safe_methods_skip_the_key() {
        assert!(is_read_only(&Method::GET));
        assert!(is_read_only(&Method::HEAD));
        assert!(!is_read_only(&Method::OPTIONS));
        assert!(!is_read_only(&Method::POST));
        assert!(!is_read_only(&Method::PUT));
        assert!(!is_read_only(&Method::DELETE));
    }
}
