//! Memory REST API 客户端

use async_trait::async_trait;
use pinmap_core::{
    CreateMemoryRequest, ErrorBody, Memory, SearchParams, UpdateMemoryRequest, DATA_PATH,
    SEARCH_PATH,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};

/// 记录 API 抽象，`ClientState` 通过它读写数据
#[async_trait]
pub trait MemoryApi: Send + Sync {
    async fn create(&self, request: &CreateMemoryRequest) -> ClientResult<Memory>;

    /// 最近的记录，新的在前
    async fn list(&self) -> ClientResult<Vec<Memory>>;

    async fn search(&self, terms: &str) -> ClientResult<Vec<Memory>>;

    async fn update(&self, id: &str, request: &UpdateMemoryRequest) -> ClientResult<Memory>;

    async fn delete(&self, id: &str) -> ClientResult<Memory>;

    async fn health_check(&self) -> bool;
}

/// 基于 reqwest 的实现
#[derive(Debug, Clone)]
pub struct HttpMemoryApi {
    server_url: String,
    base_path: String,
    client: Client,
}

impl HttpMemoryApi {
    pub fn new(server_url: &str) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            base_path: String::new(),
            client: Client::new(),
        }
    }

    /// API 挂载点，例如 "/api"
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = base_path.trim_end_matches('/').to_string();
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.server_url, self.base_path, path)
    }

    fn record_url(&self, id: &str) -> String {
        self.url(&format!("{}/{}", DATA_PATH, id))
    }
}

#[async_trait]
impl MemoryApi for HttpMemoryApi {
    async fn create(&self, request: &CreateMemoryRequest) -> ClientResult<Memory> {
        log::debug!("POST {}", self.url(DATA_PATH));
        let response = self
            .client
            .post(self.url(DATA_PATH))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn list(&self) -> ClientResult<Vec<Memory>> {
        let response = self.client.get(self.url(DATA_PATH)).send().await?;
        decode(response).await
    }

    async fn search(&self, terms: &str) -> ClientResult<Vec<Memory>> {
        let params = SearchParams {
            terms: Some(terms.to_string()),
        };
        let response = self
            .client
            .get(self.url(SEARCH_PATH))
            .query(&params)
            .send()
            .await?;
        decode(response).await
    }

    async fn update(&self, id: &str, request: &UpdateMemoryRequest) -> ClientResult<Memory> {
        let response = self
            .client
            .put(self.record_url(id))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete(&self, id: &str) -> ClientResult<Memory> {
        let response = self.client.delete(self.record_url(id)).send().await?;
        decode(response).await
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.server_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("Health check failed: {}", e);
                false
            }
        }
    }
}

/// 成功时解析响应体；失败时把 `{error, details}` 转为 [`ClientError::Api`]
async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(body) => body.message(),
            Err(_) if bytes.is_empty() => status.to_string(),
            Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
        };
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}
