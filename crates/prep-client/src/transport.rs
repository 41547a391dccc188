//! Transport seam between resource operations and the network.
//!
//! Resource code only ever builds an [`ApiRequest`]; how it reaches the server
//! is up to the [`Transport`] implementation. [`HttpTransport`] is the real
//! one; tests plug in an in-memory transport.

use std::future::Future;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request relative to the configured API root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the API root, e.g. `/admin/subjects`.
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            ..Self::get(path)
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Executes API requests and returns the decoded JSON body.
///
/// An empty success body is reported as `Value::Null`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: ApiRequest) -> impl Future<Output = Result<Value>> + Send;
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    authorization: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("prep-admin/{}", env!("CARGO_PKG_VERSION")));
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(user_agent)
            .build()
            .map_err(ApiError::from)?;
        Ok(Self {
            client,
            base_url,
            authorization: config.authorization_header(),
        })
    }

    /// Absolute URL for `request`: path segments appended to the API root,
    /// query pairs encoded in order.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::Config(format!("{} cannot be a base URL", self.base_url)))?;
            segments.pop_if_empty();
            for segment in request.path.split('/').filter(|segment| !segment.is_empty()) {
                segments.push(segment);
            }
        }
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &request.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url_for(&request)?;
        debug!(method = request.method.as_str(), %url, "sending request");

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .header(ACCEPT, "application/json");
        if let Some(authorization) = &self.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), path = %request.path, "request failed");
            return Err(ApiError::from_status(status.as_u16(), &request.path, body));
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(base: &str) -> HttpTransport {
        HttpTransport::new(&ApiConfig::default().with_base_url(base)).unwrap()
    }

    #[test]
    fn test_url_joins_path_below_base() {
        let transport = http("https://api.example.com/v1");
        let url = transport
            .url_for(&ApiRequest::get("/admin/subjects"))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/admin/subjects");

        let transport = http("https://api.example.com/v1/");
        let url = transport
            .url_for(&ApiRequest::get("/admin/subjects"))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/admin/subjects");
    }

    #[test]
    fn test_url_encodes_query_in_order() {
        let transport = http("http://localhost:8080/v1");
        let request = ApiRequest::get("/admin/users").with_query(vec![
            ("page", "2".to_string()),
            ("status", "ACTIVE,BLOCKED".to_string()),
            ("username", "a b".to_string()),
        ]);
        let url = transport.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/admin/users?page=2&status=ACTIVE%2CBLOCKED&username=a+b"
        );
    }

    #[test]
    fn test_url_escapes_identifier_segments() {
        let transport = http("http://localhost:8080/v1");
        let request = ApiRequest::new(Method::Delete, format!("/admin/questions/{}", "q 1"));
        let url = transport.url_for(&request).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/admin/questions/q%201");
    }
}
