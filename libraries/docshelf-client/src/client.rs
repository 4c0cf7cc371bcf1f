//! Main Docshelf client.

use crate::auth::AuthClient;
use crate::documents::DocumentsClient;
use crate::envelope;
use crate::error::{ClientError, Result};
use crate::store::TokenStore;
use crate::types::ClientConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Main client for a Docshelf server.
///
/// Every API call goes through [`dispatch`](DocshelfClient::dispatch),
/// which attaches the stored session token, negotiates the
/// Content-Type, and unwraps the server's response envelope. The typed
/// operations live on the [`auth`](DocshelfClient::auth) and
/// [`documents`](DocshelfClient::documents) sub-clients.
///
/// # Example
///
/// ```ignore
/// use docshelf_client::{ClientConfig, DocshelfClient, MemoryTokenStore};
/// use std::sync::Arc;
///
/// let config = ClientConfig::new("http://127.0.0.1:8000");
/// let client = DocshelfClient::new(config, Arc::new(MemoryTokenStore::new()))?;
///
/// client.ping().await?;
/// client.auth().login("alice", "secret").await?;
///
/// let receipt = client.documents().upload("report.pdf".as_ref()).await?;
/// println!("Uploaded document {}", receipt.id);
/// ```
pub struct DocshelfClient {
    http: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl DocshelfClient {
    /// Create a new client with the given configuration and token store.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        // Validate URL
        if config.base_url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Normalize URL
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        // Create HTTP client with reasonable defaults
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Docshelf/{} (CLI)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            base_url,
            store,
        })
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token store this client reads before every request.
    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    /// Send a request and unwrap the response.
    ///
    /// This is the single path every API call takes:
    ///
    /// 1. The stored session token, when present, is attached as
    ///    `Authorization: Bearer <token>`, replacing any caller-supplied
    ///    Authorization header.
    /// 2. Unless the body is multipart, a missing Content-Type defaults
    ///    to `application/json`; caller-supplied headers are kept.
    ///    Multipart requests get no Content-Type from us so the
    ///    transport can generate the boundary.
    /// 3. The body text is decoded as JSON (empty or invalid bodies
    ///    decode to null) and the envelope, when present, is unwrapped
    ///    to its `data` value.
    ///
    /// The token store is never written here.
    pub async fn dispatch(&self, path: &str, options: RequestOptions) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.store.get().await?;

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        if let Some(token) = &token {
            let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::InvalidHeader(format!("authorization: {}", e)))?;
            headers.insert(AUTHORIZATION, bearer);
        }

        let multipart = matches!(options.body, RequestBody::Multipart(_));
        if !multipart && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        debug!(
            method = %options.method,
            url = %url,
            authenticated = token.is_some(),
            "Dispatching request"
        );

        let mut request = self.http.request(options.method, &url).headers(headers);
        request = match options.body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.body(value.to_string()),
            RequestBody::Raw(text) => request.body(text),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(ClientError::Request)?;

        match envelope::normalize(status, envelope::parse_body(&text)) {
            Ok(payload) => Ok(payload),
            Err(e) => {
                warn!(status = status, url = %url, error = %e, "Request failed");
                Err(e)
            }
        }
    }

    /// Check that the server is up.
    ///
    /// Hits the unauthenticated health route and returns its message.
    pub async fn ping(&self) -> Result<String> {
        let payload = self.dispatch("/ping", RequestOptions::default()).await?;

        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::ParseError("health reply had no message".into()))?
            .to_string();

        info!(message = %message, "Server reachable");
        Ok(message)
    }

    /// Authentication operations.
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(self)
    }

    /// Document operations.
    pub fn documents(&self) -> DocumentsClient<'_> {
        DocumentsClient::new(self)
    }
}

/// Body variants understood by [`DocshelfClient::dispatch`].
#[derive(Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON payload.
    Json(Value),
    /// Pre-encoded body; the caller owns the Content-Type.
    Raw(String),
    /// Multipart form; the transport owns the Content-Type.
    Multipart(Form),
}

/// Per-request options for [`DocshelfClient::dispatch`].
///
/// Defaults to a GET with no headers and no body.
#[derive(Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body.
    pub fn json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTokenStore;

    fn client(url: &str) -> Result<DocshelfClient> {
        DocshelfClient::new(ClientConfig::new(url), Arc::new(MemoryTokenStore::new()))
    }

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(client("https://example.com").is_ok());
        assert!(client("http://localhost:8000").is_ok());

        // Invalid URLs
        assert!(client("").is_err());
        assert!(client("not-a-url").is_err());
        assert!(client("ftp://example.com").is_err());
    }

    #[test]
    fn test_url_normalization() {
        let trimmed = client("http://example.com/").expect("valid url");
        assert_eq!(trimmed.base_url(), "http://example.com");

        let repeated = client("http://example.com///").expect("valid url");
        assert!(!repeated.base_url().ends_with('/'));
    }
}
