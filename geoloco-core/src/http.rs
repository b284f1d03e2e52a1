use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Default timeout applied to every provider request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw provider response: status code and body, untouched
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Parsed JSON view of the body
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

/// Transport used by the adapters to reach a provider
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &Url) -> Result<HttpResponse>;
}

/// Blocking reqwest transport
pub struct BlockingClient {
    client: reqwest::blocking::Client,
}

impl BlockingClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let user_agent = format!("geoloco/{}", env!("CARGO_PKG_VERSION"));

        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

impl HttpClient for BlockingClient {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .context("Failed to send geocoding request")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .context("Failed to read geocoding response")?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Answers every request with the same canned response and remembers
    /// which URLs were requested
    pub struct CannedClient {
        response: HttpResponse,
        requested: Mutex<Vec<String>>,
    }

    impl CannedClient {
        pub fn new(status: u16, body: impl Into<String>) -> Self {
            Self {
                response: HttpResponse {
                    status,
                    body: body.into(),
                },
                requested: Mutex::new(Vec::new()),
            }
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl HttpClient for CannedClient {
        fn get(&self, url: &Url) -> Result<HttpResponse> {
            self.requested.lock().unwrap().push(url.as_str().to_string());
            Ok(self.response.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_json_view() -> Result<()> {
        let response = HttpResponse {
            status: 200,
            body: r#"{"status": "OK", "results": []}"#.to_string(),
        };

        let parsed = response.json()?;
        assert_eq!(parsed["status"], "OK");
        assert!(parsed["results"].as_array().is_some());

        Ok(())
    }

    #[test]
    fn test_response_json_rejects_plain_text() {
        let response = HttpResponse {
            status: 403,
            body: "Evil body".to_string(),
        };
        assert!(response.json().is_err());
    }

    #[test]
    fn test_blocking_client_builds() {
        assert!(BlockingClient::with_timeout(Duration::from_secs(1)).is_ok());
    }
}
