use crate::domain::model::{HttpReply, HttpRequest};
use crate::domain::ports::{Transport, TransportError};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("resilient-gql/", env!("CARGO_PKG_VERSION"));

/// 以 reqwest 實作的 HTTP transport，不做任何重試
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// `timeout` 為 `None` 時沿用 reqwest 預設值（不設逾時）
    pub fn new(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpReply, TransportError> {
        let body = serde_json::to_vec(&request.body)
            .map_err(|e| TransportError::new(format!("failed to encode request body: {}", e)))?;

        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(body).send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        tracing::debug!("📡 {} responded with status {}", request.url, status);

        let body = response.bytes().await.map_err(transport_error)?;
        Ok(HttpReply {
            status,
            body: body.to_vec(),
        })
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    TransportError {
        message: err.to_string(),
        is_timeout: err.is_timeout(),
        is_connect: err.is_connect(),
    }
}
