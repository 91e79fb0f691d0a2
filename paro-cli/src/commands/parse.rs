use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use axum::http::Uri;
use paro::{extract::raw_query, Defaults, OptionsParser};

pub async fn execute(
    config: Option<PathBuf>,
    query: Option<String>,
    params: Vec<String>,
    defaults: Option<String>,
    pretty: bool,
) -> Result<()> {
    let config = super::load_config(config.as_deref())?;
    let parser = OptionsParser::from_config(&config);

    let raw = collect_query(query.as_deref(), &params)?;
    tracing::debug!(parameters = raw.len(), "Collected query parameters");

    let options = match defaults {
        Some(json) => {
            let defaults: Defaults =
                serde_json::from_str(&json).context("--defaults is not a valid defaults object")?;
            parser.parse_with(&raw, &defaults)?
        }
        None => parser.parse(&raw)?,
    };

    let output = if pretty {
        serde_json::to_string_pretty(&options)?
    } else {
        serde_json::to_string(&options)?
    };
    println!("{output}");

    Ok(())
}

/// Merge the encoded query string with raw `KEY=VALUE` overrides
fn collect_query(query: Option<&str>, params: &[String]) -> Result<HashMap<String, String>> {
    let mut raw = match query {
        Some(query) => {
            let uri: Uri = format!("/?{}", query.trim_start_matches('?'))
                .parse()
                .context("query string is not URL-encoded; encode it or pass --param KEY=VALUE")?;
            raw_query(&uri)?
        }
        None => HashMap::new(),
    };

    for param in params {
        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| anyhow!("--param `{param}` is not in KEY=VALUE form"))?;
        raw.insert(key.to_string(), value.to_string());
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_encoded_query() {
        let raw = collect_query(Some("?limit=10&sort=%5B%7B%22field%22%3A%22id%22%7D%5D"), &[])
            .unwrap();
        assert_eq!(raw["limit"], "10");
        assert_eq!(raw["sort"], r#"[{"field":"id"}]"#);
    }

    #[test]
    fn test_params_override_query() {
        let raw = collect_query(
            Some("limit=10"),
            &[
                "limit=5".to_string(),
                r#"includes=["author:sideload"]"#.to_string(),
            ],
        )
        .unwrap();
        assert_eq!(raw["limit"], "5");
        assert_eq!(raw["includes"], r#"["author:sideload"]"#);
    }

    #[test]
    fn test_param_without_equals_is_rejected() {
        let err = collect_query(None, &["limit".to_string()]).unwrap_err();
        assert!(err.to_string().contains("KEY=VALUE"));
    }

    #[test]
    fn test_unencoded_query_is_rejected() {
        assert!(collect_query(Some("fields=first name"), &[]).is_err());
    }
}
