//! # Store Error Types
//!
//! 定义存储层相关的错误类型。

use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化/反序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 记录不存在
    #[error("Memory not found: {id}")]
    NotFound { id: String },

    /// 记录已存在
    #[error("Memory already exists: {id}")]
    AlreadyExists { id: String },

    /// 其他错误
    #[error("Storage error: {message}")]
    Other { message: String },
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// 创建其他错误
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// 存储结果类型
pub type StoreResult<T> = Result<T, StoreError>;
