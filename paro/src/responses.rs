//! JSON response helper for listing endpoints
//!
//! ```rust,ignore
//! use paro::{responses::JsonResponse, QueryOptions};
//!
//! async fn list_posts(options: QueryOptions) -> JsonResponse<serde_json::Value> {
//!     let posts = load_posts(&options).await;
//!     JsonResponse::new(options.shape(&architect(), posts, Some("posts")))
//!         .with_header("x-total-count", "42")
//! }
//! ```

use axum::{
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON body with a status code (200 unless changed) and extra headers
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
    headers: HeaderMap,
}

impl<T> JsonResponse<T> {
    /// Create a 200 OK response
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
        }
    }

    /// Override the status code
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Add a header; names or values that are not valid HTTP are skipped
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => tracing::warn!(header = name, "Skipping invalid response header"),
        }
        self
    }

    /// The status code that will be sent
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        (self.status, self.headers, Json(self.data)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_to_ok() {
        let response = JsonResponse::new(json!({ "data": [] }));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn test_status_and_headers() {
        let response = JsonResponse::new(json!([]))
            .with_status(StatusCode::PARTIAL_CONTENT)
            .with_header("x-total-count", "42")
            .into_response();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.headers()["x-total-count"], "42");
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
    }

    #[test]
    fn test_invalid_header_is_skipped() {
        let response = JsonResponse::new(json!(null))
            .with_header("bad header", "x")
            .with_header("x-ok", "line\nbreak")
            .into_response();
        assert!(!response.headers().contains_key("x-ok"));
        assert_eq!(response.status(), StatusCode::OK);
    }
}
