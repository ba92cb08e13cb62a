//! # Request Validation
//!
//! 创建 / 更新请求的线上格式与校验。
//!
//! 坐标策略：坐标可选，但必须成对出现。JSON `null`、缺失的键以及空字符串
//! 都视为"缺失"。数值或数字字符串会被转换为 `f64`。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::memory::LngLat;

/// place 缺省时使用的占位文本
pub const DEFAULT_PLACE: &str = "Pinned location";

/// 校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// text 缺失或为空
    #[error("text is required")]
    MissingText,

    /// 只提供了一个坐标
    #[error("{missing} is required when {present} is provided")]
    UnpairedCoordinate {
        present: &'static str,
        missing: &'static str,
    },

    /// 坐标无法转换为数值
    #[error("{field} must be a number, got {value}")]
    InvalidCoordinate { field: &'static str, value: String },

    /// 坐标超出范围
    #[error("{field} out of range: {value}")]
    CoordinateOutOfRange { field: &'static str, value: f64 },
}

impl ValidationError {
    /// 是否属于"必填字段缺失"一类
    pub fn is_missing_field(&self) -> bool {
        matches!(
            self,
            ValidationError::MissingText | ValidationError::UnpairedCoordinate { .. }
        )
    }
}

/// 创建请求 `{place?, text, lat?, lng?}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateMemoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<Value>,
}

impl CreateMemoryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    pub fn with_coordinate(mut self, coordinate: LngLat) -> Self {
        self.lat = Some(Value::from(coordinate.lat));
        self.lng = Some(Value::from(coordinate.lng));
        self
    }

    /// 校验并规范化输入
    pub fn validate(self, default_place: &str) -> Result<NewMemory, ValidationError> {
        let text = match self.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(ValidationError::MissingText),
        };

        let coordinate = paired_coordinate(self.lat.as_ref(), self.lng.as_ref())?;

        let place = match self.place {
            Some(place) if !place.is_empty() => place,
            _ => default_place.to_string(),
        };

        Ok(NewMemory {
            place,
            text,
            lat: coordinate.map(|c| c.lat),
            lng: coordinate.map(|c| c.lng),
        })
    }
}

/// 校验通过的创建输入
#[derive(Debug, Clone, PartialEq)]
pub struct NewMemory {
    pub place: String,
    pub text: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// 更新请求，任意字段子集
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMemoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<Value>,
}

impl UpdateMemoryRequest {
    /// 校验并生成补丁
    ///
    /// 坐标必须成对替换。空 place 会被重置为默认占位文本。
    pub fn validate(self, default_place: &str) -> Result<MemoryPatch, ValidationError> {
        let text = match self.text {
            Some(text) if text.trim().is_empty() => return Err(ValidationError::MissingText),
            other => other,
        };

        let coordinate = paired_coordinate(self.lat.as_ref(), self.lng.as_ref())?;

        let place = self.place.map(|place| {
            if place.is_empty() {
                default_place.to_string()
            } else {
                place
            }
        });

        Ok(MemoryPatch {
            place,
            text,
            coordinate,
        })
    }
}

/// 校验通过的部分更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPatch {
    pub place: Option<String>,
    pub text: Option<String>,
    pub coordinate: Option<LngLat>,
}

impl MemoryPatch {
    pub fn is_empty(&self) -> bool {
        self.place.is_none() && self.text.is_none() && self.coordinate.is_none()
    }
}

fn paired_coordinate(
    lat: Option<&Value>,
    lng: Option<&Value>,
) -> Result<Option<LngLat>, ValidationError> {
    let lat = coerce_coordinate("lat", lat)?;
    let lng = coerce_coordinate("lng", lng)?;

    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            check_range("lat", lat, 90.0)?;
            check_range("lng", lng, 180.0)?;
            Ok(Some(LngLat::new(lng, lat)))
        }
        (None, None) => Ok(None),
        (Some(_), None) => Err(ValidationError::UnpairedCoordinate {
            present: "lat",
            missing: "lng",
        }),
        (None, Some(_)) => Err(ValidationError::UnpairedCoordinate {
            present: "lng",
            missing: "lat",
        }),
    }
}

/// 把 JSON 值转换为坐标数值；`None`、`null` 与空字符串视为缺失
fn coerce_coordinate(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<f64>, ValidationError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ValidationError::InvalidCoordinate {
            field,
            value: value.map(|v| v.to_string()).unwrap_or_default(),
        }),
    }
}

fn check_range(field: &'static str, value: f64, bound: f64) -> Result<(), ValidationError> {
    if value < -bound || value > bound {
        return Err(ValidationError::CoordinateOutOfRange { field, value });
    }
    Ok(())
}
