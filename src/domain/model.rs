use crate::utils::error::{ClientError, Result};
use crate::utils::validation::validate_url_list;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub type Variables = serde_json::Map<String, serde_json::Value>;

/// 依優先順序排列的 GraphQL 端點，第一個為主要端點
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointList {
    urls: Vec<String>,
}

impl EndpointList {
    pub fn new(urls: Vec<String>) -> Result<Self> {
        validate_url_list("endpoints", &urls)?;
        Ok(Self { urls })
    }

    pub fn primary(&self) -> &str {
        &self.urls[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// 登入後持久化的 session：bearer token 與使用者資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryRequest {
    pub query: String,
    pub variables: Option<Variables>,
    pub token: Option<String>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            token: None,
        }
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = Some(variables);
        self
    }

    /// 指定 token，優先於 session 中儲存的 token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub(crate) fn payload(&self) -> GraphqlPayload<'_> {
        GraphqlPayload {
            query: &self.query,
            variables: self.variables.as_ref(),
        }
    }
}

/// 實際送出的 JSON body
#[derive(Debug, Serialize)]
pub struct GraphqlPayload<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<&'a Variables>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// 伺服器送出 `null` 或省略時為空字串，`extensions.code` 仍可判斷
    #[serde(default, deserialize_with = "string_or_null")]
    pub message: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub locations: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub path: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
    /// 非標準欄位原樣保留
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GraphqlError {
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(|code| code.as_str())
    }
}

/// 標準 GraphQL 回應：`data` 可能只有部分欄位，`errors` 可能同時存在。
///
/// `"data": null` 解碼為 `Some(Value::Null)`，與缺少 `data` 的 `None` 不同，
/// 重新序列化時會得到伺服器送來的同一份 body。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphqlError>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// 欄位存在就是 `Some`，即使值為 `null`
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

fn string_or_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl GraphqlResponse {
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.errors
            .iter()
            .flatten()
            .map(|error| error.message.as_str())
            .collect()
    }

    /// 以強型別解碼 `data`。欄位型別不符（例如布林值被送成 "1"）視為 schema 錯誤，
    /// 不做任何寬鬆轉換。
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        let data = match &self.data {
            Some(data) if !data.is_null() => data.clone(),
            _ => {
                return Err(ClientError::SchemaViolation {
                    message: "response has no data".to_string(),
                })
            }
        };

        serde_json::from_value(data).map_err(|e| {
            tracing::warn!("⚠️ Response data does not match the expected schema: {}", e);
            ClientError::SchemaViolation {
                message: e.to_string(),
            }
        })
    }

    pub fn outcome(&self) -> ResponseOutcome<'_> {
        match self.errors.as_deref() {
            Some(errors) if !errors.is_empty() => ResponseOutcome::GraphqlErrors {
                data: self.data.as_ref(),
                errors,
            },
            _ => ResponseOutcome::Success(self.data.as_ref()),
        }
    }
}

/// 單一端點回覆的分類結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseOutcome<'a> {
    Success(Option<&'a serde_json::Value>),
    GraphqlErrors {
        data: Option<&'a serde_json::Value>,
        errors: &'a [GraphqlError],
    },
    HttpError(u16),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
