use thiserror::Error;

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 服务端返回的 `{error, details}`
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// 展示给用户的提示文本
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::Decode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_shows_server_message() {
        let err = ClientError::Api {
            status: 400,
            message: "Missing required fields: text is required".to_string(),
        };
        assert_eq!(err.user_message(), "Missing required fields: text is required");
        assert_eq!(err.status(), Some(400));
    }
}
