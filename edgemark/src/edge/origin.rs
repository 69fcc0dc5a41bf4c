//! Origin fetch seam.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use super::EdgeRequest;
use crate::config::EdgeConfig;
use crate::errors::OriginError;

/// Response captured from the origin server.
#[derive(Debug, Clone)]
pub struct OriginResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Content-Type header value.
    pub content_type: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl OriginResponse {
    /// Builds a 200 HTML response with the given body.
    #[must_use]
    pub fn html(body: impl Into<String>) -> Self {
        Self::with_content_type(200, "text/html; charset=utf-8", body.into().into_bytes())
    }

    /// Builds a response with an arbitrary content type.
    #[must_use]
    pub fn with_content_type(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), content_type.to_string());
        Self {
            status,
            headers,
            content_type: Some(content_type.to_string()),
            body,
        }
    }

    /// Whether the response carries an HTML document.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_ref()
            .map(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
            .unwrap_or(false)
    }

    /// The body as text, when it is valid UTF-8.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Transport used to reach the origin server.
#[async_trait]
pub trait OriginClient: Send + Sync {
    /// Fetches the origin response for an inbound request, unmodified.
    async fn fetch(&self, request: &EdgeRequest) -> Result<OriginResponse, OriginError>;
}

/// reqwest-backed origin client with bounded timeouts.
pub struct HttpOriginClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpOriginClient {
    /// Builds a client from edge configuration.
    pub fn new(config: &EdgeConfig) -> Result<Self, OriginError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| OriginError::Other(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.origin_timeout(),
        })
    }

    fn classify(url: &str, error: &reqwest::Error) -> OriginError {
        if error.is_timeout() {
            OriginError::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            OriginError::Unreachable {
                url: url.to_string(),
            }
        } else {
            OriginError::Other(error.to_string())
        }
    }
}

#[async_trait]
impl OriginClient for HttpOriginClient {
    async fn fetch(&self, request: &EdgeRequest) -> Result<OriginResponse, OriginError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| OriginError::Other(format!("invalid method: {}", request.method)))?;

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(self.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::classify(&request.url, &e))?;

        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(text) = value.to_str() {
                headers.insert(name.to_string(), text.to_string());
            }
        }
        let content_type = headers.get("content-type").cloned();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::classify(&request.url, &e))?
            .to_vec();

        Ok(OriginResponse {
            status,
            headers,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_html() {
        assert!(OriginResponse::html("<html></html>").is_html());
        assert!(OriginResponse::with_content_type(
            200,
            "application/xhtml+xml",
            Vec::new()
        )
        .is_html());
        assert!(!OriginResponse::with_content_type(200, "application/json", Vec::new()).is_html());

        let no_type = OriginResponse {
            status: 200,
            headers: HashMap::new(),
            content_type: None,
            body: Vec::new(),
        };
        assert!(!no_type.is_html());
    }

    #[test]
    fn test_text_requires_utf8() {
        let response = OriginResponse::html("hello");
        assert_eq!(response.text(), Some("hello"));

        let binary = OriginResponse::with_content_type(200, "image/png", vec![0xff, 0xfe]);
        assert_eq!(binary.text(), None);
    }

    #[test]
    fn test_client_builds_from_config() {
        assert!(HttpOriginClient::new(&EdgeConfig::default()).is_ok());
    }
}
