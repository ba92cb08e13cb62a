//! # Memory Query
//!
//! 与具体存储无关的检索能力：对 place 和 text 做大小写不敏感的子串匹配，
//! 按创建时间排序并截断。

use serde::{Deserialize, Serialize};

use crate::memory::Memory;

/// 排序方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// 检索条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryQuery {
    /// 匹配词，`None` 表示不过滤
    pub terms: Option<String>,
    /// 按 `created_at` 的排序方向
    pub order: SortOrder,
    /// 最多返回条数
    pub limit: Option<usize>,
}

impl MemoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最近的若干条记录
    pub fn recent(limit: usize) -> Self {
        Self::new().with_limit(limit)
    }

    /// place 或 text 包含 `terms` 的记录；空字符串匹配全部
    pub fn search(terms: impl Into<String>, limit: usize) -> Self {
        Self::new().with_terms(terms).with_limit(limit)
    }

    pub fn with_terms(mut self, terms: impl Into<String>) -> Self {
        self.terms = Some(terms.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn matches(&self, memory: &Memory) -> bool {
        match self.terms {
            Some(ref terms) if !terms.is_empty() => {
                let needle = terms.to_lowercase();
                memory.place.to_lowercase().contains(&needle)
                    || memory.text.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    /// 过滤、排序并截断
    pub fn apply<I>(&self, memories: I) -> Vec<Memory>
    where
        I: IntoIterator<Item = Memory>,
    {
        let mut result: Vec<_> = memories.into_iter().filter(|m| self.matches(m)).collect();

        match self.order {
            SortOrder::Asc => result.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::Desc => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        if let Some(limit) = self.limit {
            result.truncate(limit);
        }

        result
    }
}
