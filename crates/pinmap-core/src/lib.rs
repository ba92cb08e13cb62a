//! # Pinmap Core
//!
//! 地图笔记（Memory）系统的核心类型。
//!
//! - **Memory 实体**：带坐标的短文本笔记
//! - **输入校验**：创建 / 更新请求的必填检查与坐标数值化
//! - **检索条件**：`MemoryQuery`，对 place / text 做大小写不敏感的子串匹配
//! - **展示格式**：时间戳与坐标标签

pub mod api;
pub mod format;
pub mod input;
pub mod memory;
pub mod query;

pub use api::{ErrorBody, SearchParams, DATA_PATH, SEARCH_PATH};
pub use format::{format_timestamp, format_timestamp_in, pinned_label};
pub use input::{
    CreateMemoryRequest, MemoryPatch, NewMemory, UpdateMemoryRequest, ValidationError,
    DEFAULT_PLACE,
};
pub use memory::{LngLat, Memory};
pub use query::{MemoryQuery, SortOrder};

/// 版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
