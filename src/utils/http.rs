// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Build the configured header map.
pub fn build_headers(config: &HttpConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AppError::config(format!("invalid header name {name:?}: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| AppError::config(format!("invalid value for header {name}: {e}")))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig, timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .default_headers(build_headers(config)?)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// GET `url` and return the body, failing on non-success status.
pub async fn fetch_text(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<String> {
    let text = client
        .get(url)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_headers_from_defaults() {
        let headers = build_headers(&HttpConfig::default()).unwrap();
        assert!(headers.contains_key("user-agent"));
        assert!(headers.contains_key("referer"));
    }

    #[test]
    fn test_build_headers_rejects_bad_name() {
        let mut config = HttpConfig::default();
        config.headers.insert("bad header".into(), "x".into());
        assert!(matches!(build_headers(&config), Err(AppError::Config(_))));
    }
}
