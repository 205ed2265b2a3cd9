use crate::adapters::http::ReqwestTransport;
use crate::adapters::storage::MemorySessionStore;
use crate::core::auth::is_auth_failure;
use crate::core::session::SessionManager;
use crate::domain::model::{EndpointList, GraphqlResponse, HttpRequest, QueryRequest, ResponseOutcome};
use crate::domain::ports::{LogoutHandler, SessionStore, Transport};
use crate::utils::error::{ClientError, EndpointError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct ResilientQueryClientBuilder {
    endpoints: EndpointList,
    transport: Option<Arc<dyn Transport>>,
    session_store: Option<Arc<dyn SessionStore>>,
    logout_handler: Option<LogoutHandler>,
}

impl ResilientQueryClientBuilder {
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    /// 只保留最後一次設定的 handler
    pub fn logout_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.logout_handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<ResilientQueryClient> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(None, None)?),
        };
        let store: Arc<dyn SessionStore> = match self.session_store {
            Some(store) => store,
            None => Arc::new(MemorySessionStore::new()),
        };

        Ok(ResilientQueryClient {
            endpoints: Arc::new(self.endpoints),
            transport,
            sessions: SessionManager::new(store),
            logout_handler: self.logout_handler,
        })
    }
}

/// 依序嘗試每個端點執行 GraphQL 請求，並在 session 失效時清除登入狀態
#[derive(Clone)]
pub struct ResilientQueryClient {
    endpoints: Arc<EndpointList>,
    transport: Arc<dyn Transport>,
    sessions: SessionManager,
    logout_handler: Option<LogoutHandler>,
}

impl ResilientQueryClient {
    pub fn builder(endpoints: EndpointList) -> ResilientQueryClientBuilder {
        ResilientQueryClientBuilder {
            endpoints,
            transport: None,
            session_store: None,
            logout_handler: None,
        }
    }

    pub fn endpoints(&self) -> &EndpointList {
        &self.endpoints
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// 依優先順序嘗試端點，回傳第一個成功解碼的回應。
    ///
    /// 回應中帶有 GraphQL `errors` 時仍會回傳給呼叫端，只有全部端點都失敗才會回傳
    /// `ClientError::TransportExhausted`。
    pub async fn execute(&self, request: &QueryRequest) -> Result<GraphqlResponse> {
        if request.query.trim().is_empty() {
            return Err(ClientError::ValidationError {
                message: "query document cannot be empty".to_string(),
            });
        }

        let token = self.resolve_token(request);
        let headers = request_headers(token.as_deref());
        let body = serde_json::to_value(request.payload())?;

        let total = self.endpoints.len();
        let mut session_expired = false;
        let mut attempts = 0;
        let mut last_error: Option<EndpointError> = None;

        for (index, url) in self.endpoints.iter().enumerate() {
            attempts += 1;
            tracing::debug!("📡 Trying endpoint {}/{}: {}", index + 1, total, url);

            let reply = match self
                .transport
                .send(HttpRequest {
                    url: url.to_string(),
                    headers: headers.clone(),
                    body: body.clone(),
                })
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!("⚠️ Connection to {} failed ({}): {}", url, e.kind(), e);
                    last_error = Some(EndpointError::Transport {
                        url: url.to_string(),
                        message: format!("{}: {}", e.kind(), e.message),
                    });
                    continue;
                }
            };

            if !reply.is_success() {
                if is_auth_failure(&ResponseOutcome::HttpError(reply.status)) {
                    tracing::warn!("🔒 {} answered 401 Unauthorized", url);
                    self.expire_session_once(&mut session_expired);
                    last_error = Some(EndpointError::Unauthorized {
                        url: url.to_string(),
                    });
                } else {
                    tracing::warn!("⚠️ {} answered HTTP {}", url, reply.status);
                    last_error = Some(EndpointError::HttpStatus {
                        url: url.to_string(),
                        status: reply.status,
                    });
                }
                continue;
            }

            let response = match decode_response(&reply.body) {
                Ok(response) => response,
                Err(message) => {
                    tracing::warn!("⚠️ {} returned an invalid GraphQL body: {}", url, message);
                    last_error = Some(EndpointError::Decode {
                        url: url.to_string(),
                        message,
                    });
                    continue;
                }
            };

            if is_auth_failure(&response.outcome()) {
                tracing::warn!("🔒 {} reported an unauthenticated session", url);
                self.expire_session_once(&mut session_expired);
            }

            if response.has_errors() {
                tracing::debug!(
                    "GraphQL response from {} carries {} error(s)",
                    url,
                    response.error_messages().len()
                );
            }
            tracing::debug!("✅ Query served by {}", url);
            return Ok(response);
        }

        tracing::error!("❌ All {} endpoint(s) failed", attempts);
        Err(ClientError::TransportExhausted {
            attempts,
            last: last_error.map(Box::new),
        })
    }

    /// 清除 session 並通知 logout handler。重複呼叫不會出錯
    pub fn expire_session(&self) {
        if let Err(e) = self.sessions.clear() {
            tracing::error!("❌ Failed to clear the stored session: {}", e);
        }
        if let Some(handler) = &self.logout_handler {
            handler();
        }
    }

    fn expire_session_once(&self, already_expired: &mut bool) {
        if *already_expired {
            return;
        }
        *already_expired = true;
        self.expire_session();
    }

    fn resolve_token(&self, request: &QueryRequest) -> Option<String> {
        if let Some(token) = request.token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Some(token.to_string());
        }

        match self.sessions.token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("⚠️ Could not read the stored token, sending anonymously: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for ResilientQueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientQueryClient")
            .field("endpoints", &self.endpoints)
            .field("has_logout_handler", &self.logout_handler.is_some())
            .finish_non_exhaustive()
    }
}

fn request_headers(token: Option<&str>) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("Accept".to_string(), "application/json".to_string());
    if let Some(token) = token {
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
    }
    headers
}

/// 2xx 的 body 必須是 JSON 物件才算 GraphQL 回應
fn decode_response(body: &[u8]) -> std::result::Result<GraphqlResponse, String> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}
