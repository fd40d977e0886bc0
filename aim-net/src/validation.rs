// aim-net/src/validation.rs
use aim_common::error::{AimError, Result};
use url::Url;

/// Validates an endpoint URL, accepting only http and https schemes.
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| AimError::Config(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AimError::Config(format!(
            "Invalid URL scheme for '{url_str}': must be http or https, but got '{other}'"
        ))),
    }
}

/// Joins an endpoint and a relative path with exactly one `/` between them.
pub fn combine_paths(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Proxy address understood by reqwest, built from the configured url and port.
pub fn proxy_address(proxy_url: &str, proxy_port: Option<&str>) -> String {
    let with_scheme = if proxy_url.contains("://") {
        proxy_url.to_string()
    } else {
        format!("http://{proxy_url}")
    };
    match proxy_port {
        Some(port) => format!("{}:{}", with_scheme.trim_end_matches('/'), port),
        None => with_scheme,
    }
}
