//! Centralized validation of session settings.

use url::Url;

use crate::config::ProxySettings;

/// Largest page size accepted for read iteration (memory bound per round trip)
pub const MAX_PAGE_SIZE: usize = 100_000;

/// Default page size for read iteration
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Server URL is empty")]
    EmptyUrl,

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("Invalid proxy '{0}' (expected HOST:PORT)")]
    InvalidProxy(String),

    #[error("Page size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    InvalidPageSize(usize),

    #[error("Timeout must be at least one second")]
    InvalidTimeout,
}

/// Validate a server base URL and strip trailing slashes.
///
/// # Examples
///
/// ```
/// use megan_remote::utils::validation::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("http://localhost:8001/megan6server/").unwrap(),
///     "http://localhost:8001/megan6server"
/// );
/// assert!(normalize_base_url("ftp://example.org").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::EmptyUrl`, `ValidationError::InvalidUrl` or
/// `ValidationError::UnsupportedScheme`.
pub fn normalize_base_url(url: &str) -> Result<String, ValidationError> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    let parsed = Url::parse(trimmed).map_err(|e| ValidationError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: "base URL must not carry a query or fragment".to_string(),
        });
    }

    Ok(trimmed.to_string())
}

/// Parse a `HOST:PORT` proxy specification
///
/// # Errors
///
/// Returns `ValidationError::InvalidProxy` if the host is empty or the port is not
/// a non-zero 16-bit number.
pub fn parse_proxy(spec: &str) -> Result<ProxySettings, ValidationError> {
    let invalid = || ValidationError::InvalidProxy(spec.to_string());

    let (host, port) = spec.trim().rsplit_once(':').ok_or_else(invalid)?;
    let port: u16 = port.parse().map_err(|_| invalid())?;
    if host.is_empty() || port == 0 {
        return Err(invalid());
    }

    Ok(ProxySettings {
        host: host.to_string(),
        port,
    })
}

/// Check that a page size is usable for iteration
///
/// # Errors
///
/// Returns `ValidationError::InvalidPageSize` when outside `1..=MAX_PAGE_SIZE`.
pub fn validate_page_size(page_size: usize) -> Result<usize, ValidationError> {
    if (1..=MAX_PAGE_SIZE).contains(&page_size) {
        Ok(page_size)
    } else {
        Err(ValidationError::InvalidPageSize(page_size))
    }
}

/// Bring a page size into `1..=MAX_PAGE_SIZE`
#[must_use]
pub fn clamp_page_size(page_size: usize) -> usize {
    page_size.clamp(1, MAX_PAGE_SIZE)
}
