use crate::domain::model::Session;
use crate::domain::ports::SessionStore;
use crate::utils::error::{ClientError, Result};
use std::sync::Arc;

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const USER_DATA_KEY: &str = "user_data";

/// 包裝 `SessionStore`，負責 session 的讀取、替換與刪除（不做合併）
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// 目前的 bearer token，空字串視為沒有登入
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(AUTH_TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty()))
    }

    pub fn profile(&self) -> Result<Option<serde_json::Value>> {
        match self.store.get(USER_DATA_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn current(&self) -> Result<Option<Session>> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };
        let user = self.profile()?.unwrap_or(serde_json::Value::Null);
        Ok(Some(Session { token, user }))
    }

    /// 登入或註冊成功後整個取代舊的 session
    pub fn save(&self, session: &Session) -> Result<()> {
        if session.token.trim().is_empty() {
            return Err(ClientError::ValidationError {
                message: "session token cannot be empty".to_string(),
            });
        }

        let user = serde_json::to_string(&session.user)?;
        self.store.set(AUTH_TOKEN_KEY, &session.token)?;
        self.store.set(USER_DATA_KEY, &user)?;
        tracing::debug!("💾 Session saved");
        Ok(())
    }

    /// 刪除 token 與使用者資料。重複呼叫結果相同
    pub fn clear(&self) -> Result<()> {
        let token_result = self.store.remove(AUTH_TOKEN_KEY);
        let user_result = self.store.remove(USER_DATA_KEY);
        token_result?;
        user_result?;
        tracing::debug!("🧹 Session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}
