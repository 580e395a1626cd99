//! Remote management API client used by resource capabilities.

use std::fmt;

use serde_json::Value;
use tracing::debug;

mod error;

pub use error::ClientError;

type ClientResult<T> = std::result::Result<T, ClientError>;

/// Remote operations every resource kind is built on.
///
/// Paths are relative to the API base (for example `/projects/web`).
pub trait RemoteApi {
    /// Fetch a resource, returning `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the response cannot be decoded.
    fn get(&self, path: &str) -> ClientResult<Option<Value>>;

    /// Create the resource at `path`, or replace it when it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the server rejects the body.
    fn create_or_update(&self, path: &str, body: &Value) -> ClientResult<()>;

    /// Delete the resource at `path`. Returns `false` when it was already gone.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    fn delete(&self, path: &str) -> ClientResult<bool>;
}

#[derive(Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint: String,
    pub token: Option<String>,
}

fn redacted(token: Option<&String>) -> Option<&'static str> {
    token.map(|_| "[REDACTED]")
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ClientSettings")
            .field("endpoint", &self.endpoint)
            .field("token", &redacted(self.token.as_ref()))
            .finish()
    }
}

/// Blocking HTTP implementation of [`RemoteApi`].
#[derive(Clone)]
pub struct HttpRemote {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl fmt::Debug for HttpRemote {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HttpRemote")
            .field("base_url", &self.base_url)
            .field("token", &redacted(self.token.as_ref()))
            .finish_non_exhaustive()
    }
}

impl HttpRemote {
    #[must_use]
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            token: settings.token,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: &'static str, url: &str) -> ureq::Request {
        let request = self
            .agent
            .request(method, url)
            .set("Accept", "application/json");
        match &self.token {
            Some(token) => request.set("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }
}

impl RemoteApi for HttpRemote {
    fn get(&self, path: &str) -> ClientResult<Option<Value>> {
        let url = self.url(path);
        debug!(%url, "GET");
        match self.request("GET", &url).call() {
            Ok(response) => response
                .into_json::<Value>()
                .map(Some)
                .map_err(|source| ClientError::Decode { url, source }),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(error) => Err(classify("GET", url, error)),
        }
    }

    fn create_or_update(&self, path: &str, body: &Value) -> ClientResult<()> {
        let url = self.url(path);
        debug!(%url, "PUT");
        self.request("PUT", &url)
            .send_json(body)
            .map(|_| ())
            .map_err(|error| classify("PUT", url, error))
    }

    fn delete(&self, path: &str) -> ClientResult<bool> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        match self.request("DELETE", &url).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(error) => Err(classify("DELETE", url, error)),
        }
    }
}

fn classify(method: &'static str, url: String, error: ureq::Error) -> ClientError {
    match error {
        ureq::Error::Status(status, response) => ClientError::Status {
            method,
            url,
            status,
            body: response.into_string().unwrap_or_default().trim().to_string(),
        },
        ureq::Error::Transport(transport) => ClientError::Transport {
            method,
            url,
            source: Box::new(transport),
        },
    }
}
