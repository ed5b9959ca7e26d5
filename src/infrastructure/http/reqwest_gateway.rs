use crate::application::ports::{GatewayError, HttpGateway};
use crate::domain::value_objects::{HttpMethod, RequestDescriptor};
use crate::shared::config::ApiConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// reqwestベースのHTTPゲートウェイ。ベースURLに相対パスを連結して送信する。
pub struct ReqwestGateway {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestGateway {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|err| AppError::ConfigurationError(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn send(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<Value, GatewayError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), self.url_for(&request.path));

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|err| {
            if err.is_builder() {
                GatewayError::InvalidRequest(err.to_string())
            } else {
                // No HTTP response was received.
                GatewayError::Connectivity(err.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            if status == reqwest::StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            return Ok(response.json::<Value>().await.unwrap_or(Value::Null));
        }

        let message = status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string();
        let body = response.json::<Value>().await.ok();
        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> ReqwestGateway {
        ReqwestGateway::new(&ApiConfig {
            base_url: "http://localhost:8000/api/".to_string(),
            request_timeout: 5,
        })
        .unwrap()
    }

    #[test]
    fn url_joins_without_duplicate_slash() {
        let gateway = gateway();
        assert_eq!(
            gateway.url_for("/transactions"),
            "http://localhost:8000/api/transactions"
        );
        assert_eq!(
            gateway.url_for("transactions"),
            "http://localhost:8000/api/transactions"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        let gateway = gateway();
        assert_eq!(
            gateway.url_for("https://example.com/api/x"),
            "https://example.com/api/x"
        );
    }

    #[tokio::test]
    async fn unreachable_host_maps_to_connectivity() {
        let gateway = ReqwestGateway::new(&ApiConfig {
            // Reserved TEST-NET-1 address: nothing listens here.
            base_url: "http://192.0.2.1:9".to_string(),
            request_timeout: 1,
        })
        .unwrap();

        let err = gateway
            .send(&RequestDescriptor::get("/ping"), None)
            .await
            .expect_err("request must fail");
        assert!(err.is_connectivity(), "got {err:?}");
    }
}
