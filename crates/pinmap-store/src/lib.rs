//! # Pinmap Store
//!
//! Memory 的持久化存储。
//!
//! - **MemoryStore trait**：创建 / 检索 / 更新 / 删除，检索条件见 [`pinmap_core::MemoryQuery`]
//! - **InMemoryStore**：进程内存储，用于开发和测试
//! - **JsonStore**：每条记录一个 JSON 文档，启动时重建内存索引

pub mod error;
pub mod json_store;
pub mod memory_store;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use json_store::{JsonStore, JsonStoreConfig};
pub use memory_store::InMemoryStore;
pub use store::{MemoryStore, StoreStats};
