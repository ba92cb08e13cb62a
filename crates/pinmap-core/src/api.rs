//! HTTP API 线上约定：路径与错误响应体

use serde::{Deserialize, Serialize};

/// 记录集合路径
pub const DATA_PATH: &str = "/data";
/// 检索路径
pub const SEARCH_PATH: &str = "/search";

/// 统一错误响应体 `{error, details}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    /// 面向用户的一行消息
    pub fn message(&self) -> String {
        match self.details {
            Some(ref details) if !details.is_empty() => format!("{}: {}", self.error, details),
            _ => self.error.clone(),
        }
    }
}

/// `GET /search` 的查询参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub terms: Option<String>,
}
