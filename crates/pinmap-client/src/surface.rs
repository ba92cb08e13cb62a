//! 地图与页面的抽象
//!
//! 具体渲染（浏览器中的地图组件、终端输出等）由调用方实现，`ClientState` 只通过这些 trait 驱动它们。

use pinmap_core::LngLat;

/// 标记样式；`color` 为空时使用地图组件的默认样式
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerStyle {
    pub color: Option<String>,
}

impl MarkerStyle {
    /// 草稿标记
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn colored(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
        }
    }
}

/// 标记弹出框内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub text: String,
    pub timestamp: String,
}

/// 相机目标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub center: LngLat,
    pub zoom: f64,
    pub speed: f64,
}

/// 列表中的一张卡片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCard {
    pub id: String,
    pub place: String,
    pub text: String,
    pub timestamp: String,
}

/// 交互式地图
pub trait MapSurface {
    /// 标记句柄
    type Marker;

    fn add_marker(&mut self, at: LngLat, style: &MarkerStyle, popup: Option<Popup>)
        -> Self::Marker;

    fn remove_marker(&mut self, marker: Self::Marker);

    fn toggle_popup(&mut self, marker: &Self::Marker);

    fn fly_to(&mut self, target: CameraTarget);

    /// 无动画地设置初始视图
    fn jump_to(&mut self, _center: LngLat, _zoom: f64) {}
}

/// 表单、列表与提示
pub trait PageSurface {
    fn show_form(&mut self);

    fn hide_form(&mut self);

    fn reset_form(&mut self);

    fn set_place_label(&mut self, label: &str);

    fn clear_list(&mut self);

    fn append_card(&mut self, card: MemoryCard);

    /// 列表为空或加载失败时的占位文本
    fn show_placeholder(&mut self, message: &str);

    fn alert(&mut self, message: &str);

    fn set_submit_enabled(&mut self, enabled: bool);
}
