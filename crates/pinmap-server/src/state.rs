use std::path::PathBuf;
use std::sync::Arc;

use pinmap_config::{ApiConfig, Config, ConfigManager, StorageConfig, StorageType};
use pinmap_store::{InMemoryStore, JsonStore, JsonStoreConfig, MemoryStore};
use tokio::sync::RwLock;

/// 应用状态，所有处理器共享
///
/// `config` 与 [`ConfigManager`] 共享同一份数据，热重载后的 API 参数对新请求立即生效。
pub struct AppState {
    pub store: Arc<dyn MemoryStore>,
    config: Arc<RwLock<Config>>,
}

impl AppState {
    pub fn new(store: Arc<dyn MemoryStore>, api: ApiConfig) -> Self {
        let config = Config {
            api,
            ..Config::default()
        };
        Self {
            store,
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// 打开存储，并与配置管理器共享配置
    pub async fn from_manager(
        manager: &ConfigManager,
        storage: &StorageConfig,
    ) -> anyhow::Result<Self> {
        let store = open_store(storage).await?;
        Ok(Self {
            store,
            config: manager.get(),
        })
    }

    /// 当前 API 参数
    pub async fn api(&self) -> ApiConfig {
        self.config.read().await.api.clone()
    }
}

/// 按配置选择存储后端
pub async fn open_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn MemoryStore>> {
    match config.storage_type {
        StorageType::Memory => {
            tracing::warn!("Using in-memory storage, memories will be lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageType::Json => {
            let path = config
                .path
                .as_deref()
                .map(|p| pinmap_config::expand_tilde(p).unwrap_or_else(|| PathBuf::from(p)))
                .or_else(pinmap_config::default_memories_dir)
                .unwrap_or_else(|| PathBuf::from("./pinmap_memories"));

            let store = JsonStore::new(JsonStoreConfig::new(path)).await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_json_store_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig {
            storage_type: StorageType::Json,
            path: Some(temp_dir.path().to_string_lossy().to_string()),
        };

        let store = open_store(&config).await.unwrap();
        assert_eq!(store.backend(), "json");
        assert!(temp_dir.path().join("memories").exists());
    }

    #[tokio::test]
    async fn test_api_follows_shared_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(Config::default(), temp_dir.path().join("config.json"));
        let storage = StorageConfig {
            storage_type: StorageType::Memory,
            path: None,
        };

        let state = AppState::from_manager(&manager, &storage).await.unwrap();
        assert_eq!(state.api().await.search_limit, 10);

        manager
            .update(|config| config.set_value("api.search_limit", "3"))
            .await
            .unwrap();
        assert_eq!(state.api().await.search_limit, 3);
    }

    #[tokio::test]
    async fn test_open_memory_store_from_config() {
        let config = StorageConfig {
            storage_type: StorageType::Memory,
            path: None,
        };

        let store = open_store(&config).await.unwrap();
        assert_eq!(store.backend(), "memory");
    }
}
