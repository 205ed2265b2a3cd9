use crate::adapters::http::ReqwestTransport;
use crate::adapters::storage::{FileSessionStore, MemorySessionStore};
use crate::config::environment::Environment;
use crate::core::client::{ResilientQueryClient, ResilientQueryClientBuilder};
use crate::domain::model::EndpointList;
use crate::domain::ports::SessionStore;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_positive_number,
    validate_required_field, validate_url, validate_url_list, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const SESSION_STORE_KINDS: &[&str] = &["memory", "file"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub client: Option<ClientSection>,
    pub endpoints: Option<EndpointsConfig>,
    pub http: Option<HttpConfig>,
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSection {
    pub name: Option<String>,
    pub environment: Option<Environment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsConfig {
    pub production: Option<String>,
    pub development: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub store: Option<String>,
    pub path: Option<String>,
}

impl ClientConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ClientError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ClientError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ClientError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(endpoints) = &self.endpoints {
            if let Some(production) = &endpoints.production {
                validate_url("endpoints.production", production)?;
            }
            if let Some(development) = &endpoints.development {
                validate_url_list("endpoints.development", development)?;
            }
        }

        if let Some(http) = &self.http {
            if let Some(timeout) = http.timeout_seconds {
                validate_positive_number("http.timeout_seconds", timeout, 1)?;
            }
            if let Some(user_agent) = &http.user_agent {
                validate_non_empty_string("http.user_agent", user_agent)?;
            }
        }

        let store = self.session_store_kind();
        validate_one_of("session.store", store, SESSION_STORE_KINDS)?;
        if store == "file" {
            let path_value = self.session_path_value();
            let path = validate_required_field("session.path", &path_value)?;
            validate_path("session.path", path)?;
        }

        Ok(())
    }

    /// 配置檔指定的環境優先，否則看 `APP_ENV` 與編譯模式
    pub fn environment(&self) -> Result<Environment> {
        match self.client.as_ref().and_then(|c| c.environment) {
            Some(environment) => Ok(environment),
            None => Environment::detect(),
        }
    }

    pub fn endpoint_list(&self, environment: Environment) -> Result<EndpointList> {
        let configured = self.endpoints.as_ref().and_then(|e| match environment {
            Environment::Production => e.production.clone().map(|url| vec![url]),
            Environment::Development => e.development.clone(),
        });

        match configured {
            Some(urls) => EndpointList::new(urls),
            None => environment.default_endpoints(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.http
            .as_ref()
            .and_then(|h| h.timeout_seconds)
            .map(Duration::from_secs)
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.http.as_ref().and_then(|h| h.user_agent.as_deref())
    }

    pub fn session_store_kind(&self) -> &str {
        self.session
            .as_ref()
            .and_then(|s| s.store.as_deref())
            .unwrap_or("memory")
    }

    fn session_path_value(&self) -> Option<String> {
        self.session.as_ref().and_then(|s| s.path.clone())
    }

    /// 命令列參數覆寫 session 檔案位置時改用檔案儲存
    pub fn use_session_file(&mut self, path: impl Into<String>) {
        self.session = Some(SessionConfig {
            store: Some("file".to_string()),
            path: Some(path.into()),
        });
    }

    pub fn session_store(&self) -> Result<Arc<dyn SessionStore>> {
        match self.session_store_kind() {
            "file" => {
                let path_value = self.session_path_value();
                let path = validate_required_field("session.path", &path_value)?;
                let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(path));
                Ok(store)
            }
            "memory" => {
                let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
                Ok(store)
            }
            other => Err(ClientError::InvalidConfigValueError {
                field: "session.store".to_string(),
                value: other.to_string(),
                reason: format!("Allowed values: {}", SESSION_STORE_KINDS.join(", ")),
            }),
        }
    }

    /// 依配置建立 client builder；logout handler 由呼叫端決定
    pub fn client_builder(&self, environment: Environment) -> Result<ResilientQueryClientBuilder> {
        let endpoints = self.endpoint_list(environment)?;
        let transport = ReqwestTransport::new(self.timeout(), self.user_agent())?;

        tracing::debug!(
            "Using {} endpoint(s) for {} (primary: {})",
            endpoints.len(),
            environment,
            endpoints.primary()
        );

        Ok(ResilientQueryClient::builder(endpoints)
            .transport(Arc::new(transport))
            .session_store(self.session_store()?))
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
