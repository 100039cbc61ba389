//! Main client implementation.

use std::time::Duration;

use reqwest::header::HeaderValue;
use url::Url;

use crate::api::{KnowledgeBaseApi, RagApi, UsageApi};
use crate::error::{Error, Result};
use crate::http::HttpClient;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://cloud.jabrod.com";

/// Prefix every valid API key starts with.
pub const API_KEY_PREFIX: &str = "jb_";

/// Environment variable read by [`ClientBuilder::from_env`] for the API key.
pub const API_KEY_ENV: &str = "JABROD_API_KEY";

/// Environment variable read by [`ClientBuilder::from_env`] for the base URL.
pub const BASE_URL_ENV: &str = "JABROD_BASE_URL";

/// Jabrod API client.
///
/// Provides typed access to knowledge base, RAG and usage endpoints. All
/// resources share one transport, so cloning is cheap.
///
/// # Example
///
/// ```no_run
/// use jabrod::{CreateKnowledgeBaseRequest, Jabrod};
///
/// # async fn example() -> jabrod::Result<()> {
/// let client = Jabrod::new("jb_xxx")?;
///
/// let kb = client
///     .kb()
///     .create(CreateKnowledgeBaseRequest::new("Product Docs"))
///     .await?;
/// println!("Created {}", kb.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Jabrod {
    http: HttpClient,
}

impl Jabrod {
    /// Create a client for the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client configured from `JABROD_API_KEY` and `JABROD_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        ClientBuilder::from_env().build()
    }

    /// SDK version.
    pub fn version() -> &'static str {
        crate::VERSION
    }

    /// Get the base URL, without trailing separator.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the knowledge base API.
    pub fn kb(&self) -> KnowledgeBaseApi {
        KnowledgeBaseApi::new(self.http.clone())
    }

    /// Access the query and chat API.
    pub fn rag(&self) -> RagApi {
        RagApi::new(self.http.clone())
    }

    /// Access the usage API.
    pub fn usage(&self) -> UsageApi {
        UsageApi::new(self.http.clone())
    }

    /// Access the underlying transport, for endpoints without a typed wrapper.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

/// Builder for creating a [`Jabrod`] client.
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Create a builder seeded from the environment.
    ///
    /// Unset variables leave the corresponding option unset; later setter
    /// calls override what was read.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            base_url: std::env::var(BASE_URL_ENV).ok(),
            ..Self::new()
        }
    }

    /// Set the API key (starts with `jb_`).
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a request timeout. No timeout is applied unless set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    ///
    /// Fails without touching the network if the API key is missing or
    /// malformed, or the base URL does not parse.
    pub fn build(self) -> Result<Jabrod> {
        let api_key = self.api_key.filter(|key| !key.is_empty()).ok_or_else(|| {
            Error::Config(
                "API key is required. Get one at https://agent.jabrod.com/dashboard".to_string(),
            )
        })?;
        if !api_key.starts_with(API_KEY_PREFIX) {
            return Err(Error::Config(format!(
                "Invalid API key format. Keys should start with \"{}\"",
                API_KEY_PREFIX
            )));
        }

        let base_url = normalize_base_url(
            self.base_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .unwrap_or(DEFAULT_BASE_URL),
        );
        Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| Error::Config("Invalid API key".to_string()))?;
        authorization.set_sensitive(true);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("jabrod/{}", crate::VERSION));

        let http = reqwest::Client::builder().user_agent(user_agent).build()?;

        tracing::debug!(%base_url, "Created Jabrod client");

        Ok(Jabrod {
            http: HttpClient::new(http, base_url, authorization, self.timeout),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a single trailing `/`. `https://host//` keeps one.
fn normalize_base_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_api_key() {
        let err = ClientBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("required")));

        let err = Jabrod::new("").unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("required")));
    }

    #[test]
    fn test_builder_rejects_bad_prefix() {
        let err = Jabrod::new("sk_live_123").unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("jb_")));

        // Prefix match is case-sensitive.
        assert!(Jabrod::new("JB_123").is_err());
    }

    #[test]
    fn test_builder_defaults_base_url() {
        let client = Jabrod::new("jb_test").unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);

        let client = Jabrod::builder()
            .api_key("jb_test")
            .base_url("")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_strips_one_trailing_slash() {
        let client = Jabrod::builder()
            .api_key("jb_test")
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");

        let client = Jabrod::builder()
            .api_key("jb_test")
            .base_url("http://localhost:8080//")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/");
    }

    #[test]
    fn test_builder_rejects_unparseable_base_url() {
        let err = Jabrod::builder()
            .api_key("jb_test")
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("base URL")));
    }

    #[test]
    fn test_builder_rejects_key_with_control_chars() {
        let err = Jabrod::new("jb_bad\nkey").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_url_building() {
        let client = Jabrod::builder()
            .api_key("jb_test")
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();

        let url = client.http().url("/v1/kb").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/kb");
    }

    #[test]
    fn test_resources_share_transport() {
        let client = Jabrod::builder()
            .api_key("jb_test")
            .base_url("http://example.test/api/")
            .build()
            .unwrap();
        let cloned = client.clone();
        assert_eq!(cloned.base_url(), "http://example.test/api");
        assert_eq!(cloned.http().base_url(), client.http().base_url());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let builder = Jabrod::builder().api_key("jb_secret");
        assert!(!format!("{:?}", builder).contains("jb_secret"));

        let client = builder.build().unwrap();
        assert!(!format!("{:?}", client).contains("jb_secret"));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var(API_KEY_ENV, "jb_from_env");
        std::env::set_var(BASE_URL_ENV, "http://env.example/");
        let client = Jabrod::from_env().unwrap();
        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(BASE_URL_ENV);

        assert_eq!(client.base_url(), "http://env.example");
    }

    #[test]
    fn test_version() {
        assert_eq!(Jabrod::version(), env!("CARGO_PKG_VERSION"));
    }
}
