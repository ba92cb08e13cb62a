//! API 错误到 HTTP 响应的映射

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pinmap_core::{ErrorBody, ValidationError};
use pinmap_store::StoreError;
use thiserror::Error;

pub const CREATE_FAILED: &str = "Failed to create record";
pub const FETCH_FAILED: &str = "Failed to fetch records";
pub const SEARCH_FAILED: &str = "Search failed";
pub const UPDATE_FAILED: &str = "Failed to update record";
pub const DELETE_FAILED: &str = "Failed to delete record";

/// 处理器错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 输入校验失败，发生在访问存储之前
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 请求体不是合法 JSON 或字段类型不符
    #[error("{0}")]
    MalformedBody(String),

    /// 操作的记录不存在
    #[error("{context}: memory not found: {id}")]
    NotFound { context: &'static str, id: String },

    /// 存储层失败
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// 为存储错误附加操作上下文，`NotFound` 单独映射为 404
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| match source {
            StoreError::NotFound { id } => ApiError::NotFound { context, id },
            source => ApiError::Store { context, source },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Validation(e) if e.is_missing_field() => {
                ErrorBody::new("Missing required fields", e.to_string())
            }
            ApiError::Validation(e) => ErrorBody::new("Invalid field value", e.to_string()),
            ApiError::MalformedBody(details) => {
                ErrorBody::new("Invalid request body", details.clone())
            }
            ApiError::NotFound { context, id } => {
                ErrorBody::new(*context, format!("Memory not found: {}", id))
            }
            ApiError::Store { context, source } => ErrorBody::new(*context, source.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Store { .. } => tracing::error!("API error: {}", self),
            _ => tracing::debug!("Request rejected: {}", self),
        }
        (status, Json(self.body())).into_response()
    }
}
