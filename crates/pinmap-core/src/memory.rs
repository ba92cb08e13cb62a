//! # Memory Types
//!
//! 定义 Memory 实体与经纬度坐标。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::{MemoryPatch, NewMemory};

/// 经纬度坐标（经度在前，与地图组件的约定一致）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl std::fmt::Display for LngLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lng, self.lat)
    }
}

/// 地图笔记
///
/// `id` 与 `created_at` 由存储层在创建时分配，之后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: String,
    pub place: String,
    pub text: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Memory {
    /// 由校验通过的输入创建新记录，分配 id 和时间戳
    pub fn create(new: NewMemory) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            place: new.place,
            text: new.text,
            lat: new.lat,
            lng: new.lng,
            created_at: now,
            updated_at: now,
        }
    }

    /// 两个坐标都存在时才可放置到地图上
    pub fn is_placeable(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }

    pub fn coordinate(&self) -> Option<LngLat> {
        match (self.lng, self.lat) {
            (Some(lng), Some(lat)) => Some(LngLat::new(lng, lat)),
            _ => None,
        }
    }

    /// 应用部分更新，刷新 `updated_at`
    pub fn apply(&mut self, patch: &MemoryPatch) {
        if let Some(ref place) = patch.place {
            self.place = place.clone();
        }
        if let Some(ref text) = patch.text {
            self.text = text.clone();
        }
        if let Some(coordinate) = patch.coordinate {
            self.lat = Some(coordinate.lat);
            self.lng = Some(coordinate.lng);
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_memory(lat: Option<f64>, lng: Option<f64>) -> NewMemory {
        NewMemory {
            place: "Pinned location".to_string(),
            text: "Coffee here".to_string(),
            lat,
            lng,
        }
    }

    #[test]
    fn test_create_assigns_identity() {
        let a = Memory::create(new_memory(None, None));
        let b = Memory::create(new_memory(None, None));

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_placeable_requires_both_coordinates() {
        assert!(Memory::create(new_memory(Some(43.65), Some(-79.38))).is_placeable());
        assert!(!Memory::create(new_memory(Some(43.65), None)).is_placeable());
        assert!(!Memory::create(new_memory(None, None)).is_placeable());

        let memory = Memory::create(new_memory(Some(43.65), Some(-79.38)));
        assert_eq!(memory.coordinate(), Some(LngLat::new(-79.38, 43.65)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let memory = Memory::create(new_memory(Some(1.0), Some(2.0)));
        let value = serde_json::to_value(&memory).unwrap();

        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_apply_patch_keeps_identity() {
        let mut memory = Memory::create(new_memory(None, None));
        let id = memory.id.clone();
        let created_at = memory.created_at;

        memory.apply(&MemoryPatch {
            place: None,
            text: Some("Tea instead".to_string()),
            coordinate: Some(LngLat::new(-79.0, 43.0)),
        });

        assert_eq!(memory.id, id);
        assert_eq!(memory.created_at, created_at);
        assert_eq!(memory.text, "Tea instead");
        assert_eq!(memory.place, "Pinned location");
        assert!(memory.is_placeable());
    }
}
