use std::borrow::Cow;
use std::str::FromStr;
use std::time::Duration;

use reqwest::blocking::{Client, Request, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Proxy, StatusCode, Url};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::remote::error::ClientError;
use crate::utils::validation::normalize_base_url;

/// Prefix of a response body that reports an application-level error
pub const ERROR_SENTINEL: &str = "401 Error:";

const BINARY_CONTENT_TYPE: &str = "application/octet-stream";
const TEXT_CONTENT_TYPE: &str = "application/text";

/// User name and credential hash, fixed for the lifetime of a client
#[derive(Clone)]
struct Credentials {
    user: String,
    password_hash: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Authenticated, timeout-bounded HTTP access to one server.
///
/// Every request carries Basic credentials; there are no cookies or tokens.
/// Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct TransportClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
}

impl TransportClient {
    /// Build a client for the server described by `config`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` for invalid settings or
    /// `ClientError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let base_url = normalize_base_url(&config.server_url).map_err(crate::config::ConfigError::from)?;
        let timeout = Duration::from_secs(config.timeout_secs);

        // With the http2 feature, TLS connections negotiate HTTP/2 via ALPN and
        // fall back to HTTP/1.1 when the server does not offer it.
        let builder = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .redirect(redirect::Policy::limited(config.max_redirects));

        let builder = match &config.proxy {
            Some(proxy) => builder.proxy(Proxy::all(proxy.url())?),
            None => builder.no_proxy(),
        };

        info!(
            server = %base_url,
            user = %config.user,
            proxy = ?config.proxy.as_ref().map(|p| p.url()),
            "created remote client"
        );

        Ok(Self {
            http: builder.build()?,
            base_url,
            credentials: Credentials {
                user: config.user.clone(),
                password_hash: config.password_hash.clone(),
            },
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user(&self) -> &str {
        &self.credentials.user
    }

    /// Resolve a command against the base URL, adding a leading `/` if missing
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if the result is not a valid URL.
    pub fn resolve(&self, command: &str) -> Result<Url, ClientError> {
        let path = if command.starts_with('/') {
            Cow::Borrowed(command)
        } else {
            Cow::Owned(format!("/{command}"))
        };
        let full = format!("{}{path}", self.base_url);
        Url::parse(&full).map_err(|e| ClientError::InvalidUrl(format!("{full}: {e}")))
    }

    /// Build, but do not send, the request for `command`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` or `ClientError::Transport` if the
    /// request cannot be assembled.
    pub fn build_request(&self, command: &str, binary: bool) -> Result<Request, ClientError> {
        let url = self.resolve(command)?;
        let content_type = if binary {
            BINARY_CONTENT_TYPE
        } else {
            TEXT_CONTENT_TYPE
        };

        Ok(self
            .http
            .get(url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, content_type)
            .basic_auth(&self.credentials.user, Some(&self.credentials.password_hash))
            .build()?)
    }

    fn send(&self, command: &str, binary: bool) -> Result<Response, ClientError> {
        let request = self.build_request(command, binary)?;
        debug!(command, binary, "sending request");

        let response = self.http.execute(request)?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized(status));
        }
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(response)
    }

    /// Send `command` and return the response as lines
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` if the first line starts with [`ERROR_SENTINEL`],
    /// or any transport/status error.
    pub fn get_lines(&self, command: &str) -> Result<Vec<String>, ClientError> {
        let body = self.send(command, false)?.text()?;
        check_text(&body)?;
        Ok(body.lines().map(str::to_string).collect())
    }

    /// Send `command` and return the whole text body
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` if the first line starts with [`ERROR_SENTINEL`],
    /// or any transport/status error.
    pub fn get_string(&self, command: &str) -> Result<String, ClientError> {
        let body = self.send(command, false)?.text()?;
        check_text(&body)?;
        Ok(body)
    }

    /// Send `command` and return the raw body
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` if the body starts with the bytes of
    /// [`ERROR_SENTINEL`], or any transport/status error.
    pub fn get_bytes(&self, command: &str) -> Result<Vec<u8>, ClientError> {
        let body = self.send(command, true)?.bytes()?;
        check_bytes(&body)?;
        Ok(body.to_vec())
    }

    /// Send `command` and parse the first token of the response as `i64`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidNumber` if the response does not start with a number.
    pub fn get_long(&self, command: &str) -> Result<i64, ClientError> {
        parse_first_token(&self.get_string(command)?)
    }

    /// Send `command` and parse the first token of the response as `i32`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidNumber` if the response does not start with a number.
    pub fn get_int(&self, command: &str) -> Result<i32, ClientError> {
        parse_first_token(&self.get_string(command)?)
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

fn check_text(body: &str) -> Result<(), ClientError> {
    let line = first_line(body);
    if line.starts_with(ERROR_SENTINEL) {
        return Err(ClientError::Server(line.to_string()));
    }
    Ok(())
}

fn check_bytes(body: &[u8]) -> Result<(), ClientError> {
    if body.starts_with(ERROR_SENTINEL.as_bytes()) {
        let text = String::from_utf8_lossy(body);
        return Err(ClientError::Server(first_line(&text).to_string()));
    }
    Ok(())
}

fn parse_first_token<T: FromStr>(text: &str) -> Result<T, ClientError> {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| ClientError::InvalidNumber(text.chars().take(64).collect()))
}
