//! 客户端状态：保持地图标记、列表与服务端数据一致
//!
//! 每次成功创建之后都会整体重建标记表与列表，不在两次获取之间保留缓存。

use std::collections::HashMap;

use pinmap_config::ClientConfig;
use pinmap_core::{
    format_timestamp, pinned_label, CreateMemoryRequest, LngLat, Memory, DEFAULT_PLACE,
};

use crate::api::MemoryApi;
use crate::error::ClientResult;
use crate::surface::{CameraTarget, MapSurface, MarkerStyle, MemoryCard, PageSurface, Popup};

pub const NO_MEMORIES: &str = "No memories yet.";
pub const LOAD_FAILED: &str = "Could not load memories.";
pub const CHOOSE_LOCATION: &str = "Click on the map to choose a location.";
pub const WRITE_MEMORY: &str = "Please write a memory.";

/// 已放置到地图上的标记
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker<H> {
    pub handle: H,
    pub coordinate: LngLat,
}

pub struct ClientState<A, M: MapSurface, P> {
    api: A,
    map: M,
    page: P,
    config: ClientConfig,
    selected_coordinate: Option<LngLat>,
    pending_marker: Option<M::Marker>,
    markers: HashMap<String, PlacedMarker<M::Marker>>,
    submit_in_flight: bool,
    fetch_failed: bool,
}

impl<A, M, P> ClientState<A, M, P>
where
    A: MemoryApi,
    M: MapSurface,
    P: PageSurface,
{
    pub fn new(api: A, map: M, page: P, config: ClientConfig) -> Self {
        Self {
            api,
            map,
            page,
            config,
            selected_coordinate: None,
            pending_marker: None,
            markers: HashMap::new(),
            submit_in_flight: false,
            fetch_failed: false,
        }
    }

    /// 页面加载：设置初始视图，隐藏表单，获取并渲染
    pub async fn load(&mut self) {
        let [lng, lat] = self.config.initial_center;
        self.map.jump_to(LngLat::new(lng, lat), self.config.initial_zoom);
        self.page.hide_form();
        self.fetch_and_render().await;
    }

    /// 地图点击：记录坐标，替换草稿标记并打开表单
    pub fn on_map_click(&mut self, point: LngLat) {
        self.selected_coordinate = Some(point);

        if let Some(marker) = self.pending_marker.take() {
            self.map.remove_marker(marker);
        }
        let marker = self.map.add_marker(point, &MarkerStyle::draft(), None);
        self.pending_marker = Some(marker);

        self.page.show_form();
        self.page.set_place_label(&pinned_label(point));
    }

    /// 校验表单并生成创建请求，同时禁用提交
    ///
    /// 返回 `None` 时状态不变（已有请求在途、未选坐标或内容为空）。
    pub fn begin_submit(&mut self, text: &str) -> Option<CreateMemoryRequest> {
        if self.submit_in_flight {
            log::debug!("Submit ignored, a create request is already in flight");
            return None;
        }

        let Some(coordinate) = self.selected_coordinate else {
            self.page.alert(CHOOSE_LOCATION);
            return None;
        };

        let text = text.trim();
        if text.is_empty() {
            self.page.alert(WRITE_MEMORY);
            return None;
        }

        self.submit_in_flight = true;
        self.page.set_submit_enabled(false);

        Some(
            CreateMemoryRequest::new(text)
                .with_place(DEFAULT_PLACE)
                .with_coordinate(coordinate),
        )
    }

    /// 处理创建结果；成功后清理草稿并重新获取
    pub async fn finish_submit(&mut self, result: ClientResult<Memory>) -> Option<Memory> {
        self.submit_in_flight = false;
        self.page.set_submit_enabled(true);

        match result {
            Ok(memory) => {
                log::info!("Saved memory {}", memory.id);
                self.page.reset_form();
                self.page.hide_form();
                self.selected_coordinate = None;
                if let Some(marker) = self.pending_marker.take() {
                    self.map.remove_marker(marker);
                }
                self.fetch_and_render().await;
                Some(memory)
            }
            Err(e) => {
                log::warn!("Failed to save memory: {}", e);
                self.page.alert(&e.user_message());
                None
            }
        }
    }

    pub async fn submit(&mut self, text: &str) -> Option<Memory> {
        let request = self.begin_submit(text)?;
        let result = self.api.create(&request).await;
        self.finish_submit(result).await
    }

    /// 列表卡片点击：飞到对应标记并切换弹出框；没有标记时返回 `false`
    pub fn on_card_click(&mut self, id: &str) -> bool {
        let Some(placed) = self.markers.get(id) else {
            return false;
        };

        self.map.fly_to(CameraTarget {
            center: placed.coordinate,
            zoom: self.config.fly_zoom,
            speed: self.config.fly_speed,
        });
        self.map.toggle_popup(&placed.handle);
        true
    }

    /// 清空标记与列表，重新获取并渲染
    pub async fn fetch_and_render(&mut self) {
        for (_, placed) in self.markers.drain() {
            self.map.remove_marker(placed.handle);
        }
        self.page.clear_list();

        let memories = match self.api.list().await {
            Ok(memories) => memories,
            Err(e) => {
                log::warn!("Failed to load memories: {}", e);
                self.fetch_failed = true;
                self.page.show_placeholder(LOAD_FAILED);
                return;
            }
        };
        self.fetch_failed = false;

        if memories.is_empty() {
            self.page.show_placeholder(NO_MEMORIES);
            return;
        }

        let style = MarkerStyle::colored(self.config.marker_color.clone());
        for memory in memories {
            let timestamp = format_timestamp(&memory.created_at);

            if let Some(coordinate) = memory.coordinate() {
                let popup = Popup {
                    text: memory.text.clone(),
                    timestamp: timestamp.clone(),
                };
                let handle = self.map.add_marker(coordinate, &style, Some(popup));
                let placed = PlacedMarker { handle, coordinate };
                if let Some(stale) = self.markers.insert(memory.id.clone(), placed) {
                    self.map.remove_marker(stale.handle);
                }
            }

            self.page.append_card(MemoryCard {
                id: memory.id,
                place: memory.place,
                text: memory.text,
                timestamp,
            });
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn selected_coordinate(&self) -> Option<LngLat> {
        self.selected_coordinate
    }

    pub fn pending_marker(&self) -> Option<&M::Marker> {
        self.pending_marker.as_ref()
    }

    pub fn marker(&self, id: &str) -> Option<&PlacedMarker<M::Marker>> {
        self.markers.get(id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn is_submit_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    /// 最近一次获取是否失败
    pub fn fetch_failed(&self) -> bool {
        self.fetch_failed
    }
}
