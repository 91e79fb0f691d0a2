//! Axum extractor for [`QueryOptions`]
//!
//! Handlers take `QueryOptions` as an argument; the parser is pulled from the
//! router state, so any state `S` with `OptionsParser: FromRef<S>` works.
//! Parse failures reject the request with a 400 JSON body.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use paro::{config::Config, OptionsParser, QueryOptions};
//!
//! async fn list_posts(options: QueryOptions) -> String {
//!     format!("limit={:?}", options.limit())
//! }
//!
//! let config = Config::load()?;
//! let app = Router::new()
//!     .route("/posts", get(list_posts))
//!     .with_state(OptionsParser::from_config(&config));
//! ```

use std::collections::HashMap;

use axum::{
    extract::{FromRef, FromRequestParts, Query},
    http::{request::Parts, Uri},
};

use crate::error::ParseError;
use crate::options::{OptionsParser, QueryOptions};

impl<S> FromRequestParts<S> for QueryOptions
where
    S: Send + Sync,
    OptionsParser: FromRef<S>,
{
    type Rejection = ParseError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let parser = OptionsParser::from_ref(state);
        let raw_query = raw_query(&parts.uri)?;
        parser.parse(&raw_query)
    }
}

/// Decode the query string of `uri` into a key/value map
///
/// When a key repeats, the last value wins.
///
/// # Errors
///
/// [`ParseError::MalformedParameter`] when the query string cannot be decoded.
pub fn raw_query(uri: &Uri) -> Result<HashMap<String, String>, ParseError> {
    let Query(map) = Query::<HashMap<String, String>>::try_from_uri(uri)
        .map_err(|e| ParseError::malformed("query", e.body_text()))?;
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorResponse;
    use crate::include::IncludeMode;
    use crate::options::Defaults;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[derive(Clone)]
    struct AppState {
        parser: OptionsParser,
    }

    impl FromRef<AppState> for OptionsParser {
        fn from_ref(state: &AppState) -> Self {
            state.parser.clone()
        }
    }

    async fn echo(options: QueryOptions) -> Json<QueryOptions> {
        Json(options)
    }

    fn app(parser: OptionsParser) -> Router {
        Router::new()
            .route("/posts", get(echo))
            .with_state(AppState { parser })
    }

    fn uri(pairs: &[(&str, &str)]) -> String {
        format!("/posts?{}", serde_urlencoded::to_string(pairs).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_extracts_options() {
        let uri = uri(&[
            ("includes", r#"["author:sideload"]"#),
            ("sort", r#"[{"field":"title","direction":"desc"}]"#),
            ("limit", "10"),
            ("page", "2"),
        ]);

        let (status, body) = get_json(app(OptionsParser::default()), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["includeModes"], json!({ "author": "sideload" }));
        assert_eq!(body["sort"], json!([{ "field": "title", "direction": "desc" }]));
        assert_eq!(body["limit"], json!(10));
        assert_eq!(body["page"], json!(2));
    }

    #[tokio::test]
    async fn test_no_query_uses_state_defaults() {
        let parser = OptionsParser::default().with_defaults(
            Defaults::default()
                .with_limit(20)
                .with_include_mode(IncludeMode::Sideload)
                .with_includes(vec![json!("tags")]),
        );

        let (status, body) = get_json(app(parser), "/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["limit"], json!(20));
        assert_eq!(body["includeModes"], json!({ "tags": "sideload" }));
    }

    #[tokio::test]
    async fn test_rejects_with_bad_request() {
        let uri = uri(&[("filters", r#"[{"or":true}]"#)]);

        let (status, body) = get_json(app(OptionsParser::default()), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(error.status, 400);
        assert_eq!(error.code.as_deref(), Some("MISSING_KEY"));
        assert!(error.error.contains("filters"));
    }

    #[tokio::test]
    async fn test_page_without_limit_is_rejected() {
        let (status, body) = get_json(app(OptionsParser::default()), "/posts?page=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("INVALID_COMBINATION"));
    }

    #[test]
    fn test_raw_query_decodes_percent_encoding() {
        let uri: Uri = "/posts?fields=%5B%22id%22%5D&limit=5".parse().unwrap();
        let map = raw_query(&uri).unwrap();
        assert_eq!(map["fields"], r#"["id"]"#);
        assert_eq!(map["limit"], "5");

        let uri: Uri = "/posts".parse().unwrap();
        assert!(raw_query(&uri).unwrap().is_empty());
    }
}
