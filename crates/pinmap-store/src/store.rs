//! # Store Trait
//!
//! Memory 持久化能力：创建、检索、更新、删除。具体的连接与并发控制由实现自行负责。

use async_trait::async_trait;
use pinmap_core::{Memory, MemoryPatch, MemoryQuery, NewMemory};

use crate::error::StoreResult;

/// 存储统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// 记录总数
    pub total_memories: u64,
    /// 可放置到地图上的记录数
    pub placeable_memories: u64,
}

/// Memory 存储 trait
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// 持久化新记录，分配 id 和创建时间
    async fn create(&self, new: NewMemory) -> StoreResult<Memory>;

    /// 按条件检索
    async fn find(&self, query: &MemoryQuery) -> StoreResult<Vec<Memory>>;

    /// 按 id 获取
    async fn get(&self, id: &str) -> StoreResult<Option<Memory>>;

    /// 部分更新，记录不存在时返回 `NotFound`
    async fn update(&self, id: &str, patch: &MemoryPatch) -> StoreResult<Memory>;

    /// 删除并返回被删除的记录，记录不存在时返回 `NotFound`
    async fn delete(&self, id: &str) -> StoreResult<Memory>;

    /// 获取存储统计信息
    async fn stats(&self) -> StoreResult<StoreStats>;

    /// 健康检查
    async fn health_check(&self) -> StoreResult<()>;

    /// 存储后端名称
    fn backend(&self) -> &'static str;
}

pub(crate) fn stats_of<'a>(memories: impl Iterator<Item = &'a Memory>) -> StoreStats {
    let mut stats = StoreStats::default();
    for memory in memories {
        stats.total_memories += 1;
        if memory.is_placeable() {
            stats.placeable_memories += 1;
        }
    }
    stats
}
