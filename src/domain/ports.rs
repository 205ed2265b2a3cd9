use crate::domain::model::{HttpReply, HttpRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 持久化的 key-value 儲存，保存 `auth_token` 與 `user_data`
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// 移除不存在的 key 不是錯誤
    fn remove(&self, key: &str) -> Result<()>;
}

/// 網路層失敗（連線、DNS、逾時等），不包含 HTTP 錯誤狀態碼
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub is_timeout: bool,
    pub is_connect: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_timeout: false,
            is_connect: false,
        }
    }

    pub fn kind(&self) -> &'static str {
        if self.is_timeout {
            "timeout"
        } else if self.is_connect {
            "connect"
        } else {
            "transport"
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpReply, TransportError>;
}

/// 偵測到 session 失效時呼叫，例如導回登入畫面
pub type LogoutHandler = Arc<dyn Fn() + Send + Sync>;
