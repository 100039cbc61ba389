//! Authenticated request primitive.
//!
//! Every call goes through [`HttpClient::request`]: it composes the URL,
//! injects the bearer token, picks JSON or multipart encoding, and unwraps
//! the response envelope into either the payload or an [`Error::Api`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};
use crate::types::ApiEnvelope;

/// Per-request options for [`HttpClient::request`].
///
/// `body` and `form` are mutually exclusive. When both are set the form is
/// sent and the JSON body is dropped.
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// JSON body.
    pub body: Option<serde_json::Value>,
    /// Extra headers, merged over the defaults.
    pub headers: HeaderMap,
    /// Multipart form body.
    pub form: Option<Form>,
}

impl RequestOptions {
    /// Options carrying a JSON body.
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self> {
        Ok(Self {
            body: Some(serde_json::to_value(body)?),
            ..Default::default()
        })
    }

    /// Options carrying a multipart form.
    pub fn form(form: Form) -> Self {
        Self {
            form: Some(form),
            ..Default::default()
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// HTTP transport shared by every API resource.
///
/// Cheap to clone; clones share the same connection pool and credentials.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpInner>,
}

struct HttpInner {
    http: reqwest::Client,
    /// Base URL with the trailing separator already stripped.
    base_url: String,
    /// Pre-built `Bearer` header value, marked sensitive.
    authorization: HeaderValue,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: String,
        authorization: HeaderValue,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(HttpInner {
                http,
                base_url,
                authorization,
                timeout,
            }),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Build a URL for an API path. The path is appended verbatim.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.inner.base_url, path)).map_err(Error::from)
    }

    /// Make an authenticated request and unwrap the response envelope.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let url = self.url(path)?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.inner.authorization.clone());
        headers.extend(options.headers);

        let body = options.body.filter(|b| !b.is_null());
        let mut builder = self.inner.http.request(method.clone(), url.clone());
        builder = match (options.form, body) {
            (Some(form), body) => {
                if body.is_some() {
                    tracing::debug!(%url, "Multipart form supplied, dropping JSON body");
                }
                builder.headers(headers).multipart(form)
            }
            (None, Some(body)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                builder.headers(headers).body(serde_json::to_vec(&body)?)
            }
            (None, None) => builder.headers(headers),
        };
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(%method, %url, "Sending request");
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        decode_response(status, &text).inspect_err(|e| {
            if let Error::Api { code, .. } = e {
                tracing::debug!(%method, %url, status = status.as_u16(), %code, "Request failed");
            }
        })
    }

    /// Make a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, RequestOptions::default())
            .await
    }

    /// Make a POST request with a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, RequestOptions::json(body)?)
            .await
    }

    /// Make a POST request with a multipart form body.
    pub async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        self.request(Method::POST, path, RequestOptions::form(form))
            .await
    }

    /// Make a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::DELETE, path, RequestOptions::default())
            .await
    }

    /// Make a PATCH request with a JSON body.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, RequestOptions::json(body)?)
            .await
    }
}

/// Turn a status and raw body into the envelope payload or an error.
///
/// Transport status and the envelope's `success` flag are checked
/// independently. A failed exchange whose body is not an envelope still
/// yields [`Error::Api`]; a successful one propagates the parse error.
pub(crate) fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    let envelope: ApiEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if !status.is_success() => {
            tracing::warn!(status = status.as_u16(), error = %e, "Failed to parse error envelope");
            return Err(Error::api(status.as_u16(), None, None, None));
        }
        Err(e) => {
            tracing::warn!(status = status.as_u16(), error = %e, "Failed to parse response envelope");
            return Err(Error::Json(e));
        }
    };

    if !status.is_success() || !envelope.success {
        return Err(envelope.into_error(status.as_u16()));
    }

    let data = envelope.data.unwrap_or(serde_json::Value::Null);
    Ok(serde_json::from_value(data)?)
}
