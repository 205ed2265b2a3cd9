use crate::domain::model::EndpointList;
use crate::utils::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ENVIRONMENT_VAR: &str = "APP_ENV";

pub const PRODUCTION_ENDPOINT: &str = "https://api.quizapp.example.com/graphql";

/// 開發環境依序嘗試：Android 模擬器的宿主機位址、localhost、127.0.0.1
pub const DEVELOPMENT_ENDPOINTS: &[&str] = &[
    "http://10.0.2.2:4000/graphql",
    "http://localhost:4000/graphql",
    "http://127.0.0.1:4000/graphql",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    /// 先看 `APP_ENV`，沒有設定時依編譯模式決定（debug build 視為開發環境）
    pub fn detect() -> Result<Self> {
        match std::env::var(ENVIRONMENT_VAR) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::from_build()),
        }
    }

    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn default_endpoints(self) -> Result<EndpointList> {
        let urls = match self {
            Environment::Production => vec![PRODUCTION_ENDPOINT.to_string()],
            Environment::Development => DEVELOPMENT_ENDPOINTS
                .iter()
                .map(|url| url.to_string())
                .collect(),
        };
        EndpointList::new(urls)
    }
}

impl FromStr for Environment {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(ClientError::InvalidConfigValueError {
                field: ENVIRONMENT_VAR.to_string(),
                value: other.to_string(),
                reason: "Expected 'production' or 'development'".to_string(),
            }),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
        }
    }
}
