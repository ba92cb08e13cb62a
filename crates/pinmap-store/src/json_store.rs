//! # JsonStore Implementation
//!
//! 基于 JSON 文档文件的 Memory 持久化存储实现。
//!
//! 存储结构:
//! ```text
//! <base_path>/
//! └── memories/
//!     ├── <memory_id>.json      # 单条 Memory 文档
//!     └── ...
//! ```
//!
//! 启动时从磁盘重建内存索引，查询只读索引；写操作先落盘再更新索引。

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use pinmap_core::{Memory, MemoryPatch, MemoryQuery, NewMemory};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::{stats_of, MemoryStore, StoreStats};

/// JsonStore 配置
#[derive(Debug, Clone)]
pub struct JsonStoreConfig {
    /// 存储根目录
    pub base_path: PathBuf,
}

impl JsonStoreConfig {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Default for JsonStoreConfig {
    fn default() -> Self {
        Self::new("~/.pinmap/memories")
    }
}

/// JsonStore 实现
pub struct JsonStore {
    config: JsonStoreConfig,
    /// 所有记录的内存缓存: id -> Memory
    index: Arc<RwLock<HashMap<String, Memory>>>,
    /// 串行化写操作（读-改-写）
    write_lock: Mutex<()>,
    base_path: PathBuf,
    memories_path: PathBuf,
}

impl JsonStore {
    /// 创建新的 JsonStore 实例并加载现有文档
    pub async fn new(config: JsonStoreConfig) -> StoreResult<Self> {
        let base_path_str = config.base_path.to_string_lossy().to_string();
        let base_path = PathBuf::from(shellexpand::tilde(&base_path_str).as_ref());
        let memories_path = base_path.join("memories");

        fs::create_dir_all(&memories_path).await?;

        let store = Self {
            config,
            index: Arc::new(RwLock::new(HashMap::new())),
            write_lock: Mutex::new(()),
            base_path,
            memories_path,
        };

        store.rebuild_index().await?;

        info!("JsonStore initialized at {:?}", store.config.base_path);

        Ok(store)
    }

    /// 获取文档路径
    fn document_path(&self, id: &str) -> PathBuf {
        self.memories_path.join(format!("{}.json", id))
    }

    /// 写入文档：先写临时文件再重命名，避免读到半个文档
    async fn write_document(&self, memory: &Memory) -> StoreResult<()> {
        let path = self.document_path(&memory.id);
        let tmp_path = self.memories_path.join(format!(".{}.json.tmp", memory.id));
        let content = serde_json::to_string_pretty(memory)?;

        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn remove_document(&self, id: &str) -> StoreResult<()> {
        match fs::remove_file(self.document_path(id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    /// 从磁盘重建索引，无法读取或解析的文档会被跳过
    async fn rebuild_index(&self) -> StoreResult<()> {
        let mut entries = fs::read_dir(&self.memories_path).await?;
        let mut loaded = HashMap::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read memory document {:?}: {}", path, e);
                    continue;
                }
            };
            match serde_json::from_str::<Memory>(&content) {
                Ok(memory) => {
                    loaded.insert(memory.id.clone(), memory);
                }
                Err(e) => {
                    warn!("Failed to parse memory document {:?}: {}", path, e);
                }
            }
        }

        let count = loaded.len();
        *self.index.write() = loaded;

        info!("Rebuilt index with {} memories", count);
        Ok(())
    }

    fn cached(&self, id: &str) -> Option<Memory> {
        self.index.read().get(id).cloned()
    }
}

#[async_trait]
impl MemoryStore for JsonStore {
    async fn create(&self, new: NewMemory) -> StoreResult<Memory> {
        let _guard = self.write_lock.lock().await;

        let memory = Memory::create(new);
        if self.cached(&memory.id).is_some() {
            return Err(StoreError::AlreadyExists { id: memory.id });
        }

        self.write_document(&memory).await?;
        self.index.write().insert(memory.id.clone(), memory.clone());

        debug!("Created memory: {}", memory.id);
        Ok(memory)
    }

    async fn find(&self, query: &MemoryQuery) -> StoreResult<Vec<Memory>> {
        let snapshot: Vec<Memory> = self.index.read().values().cloned().collect();
        Ok(query.apply(snapshot))
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Memory>> {
        Ok(self.cached(id))
    }

    async fn update(&self, id: &str, patch: &MemoryPatch) -> StoreResult<Memory> {
        let _guard = self.write_lock.lock().await;

        let mut memory = self.cached(id).ok_or_else(|| StoreError::not_found(id))?;
        memory.apply(patch);

        self.write_document(&memory).await?;
        self.index.write().insert(memory.id.clone(), memory.clone());

        debug!("Updated memory: {}", id);
        Ok(memory)
    }

    async fn delete(&self, id: &str) -> StoreResult<Memory> {
        let _guard = self.write_lock.lock().await;

        let memory = self.cached(id).ok_or_else(|| StoreError::not_found(id))?;

        self.remove_document(id).await?;
        self.index.write().remove(id);

        info!("Deleted memory: {}", id);
        Ok(memory)
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        Ok(stats_of(self.index.read().values()))
    }

    async fn health_check(&self) -> StoreResult<()> {
        // 检查目录是否可写
        let test_file = self.base_path.join(".health_check");
        fs::write(&test_file, "ok").await?;
        fs::remove_file(&test_file).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "json"
    }
}
