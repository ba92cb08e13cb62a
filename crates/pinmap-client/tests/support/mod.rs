//! 记录调用的地图与页面实现

#![allow(dead_code)]

use pinmap_client::{CameraTarget, MapSurface, MarkerStyle, MemoryCard, PageSurface, Popup};
use pinmap_core::LngLat;

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Added {
        handle: usize,
        at: LngLat,
        style: MarkerStyle,
        popup: Option<Popup>,
    },
    Removed(usize),
    TogglePopup(usize),
    FlyTo(CameraTarget),
    JumpTo(LngLat, f64),
}

#[derive(Debug, Default)]
pub struct RecordingMap {
    next_handle: usize,
    pub live: Vec<usize>,
    pub events: Vec<MapEvent>,
}

impl RecordingMap {
    pub fn fly_targets(&self) -> Vec<CameraTarget> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MapEvent::FlyTo(target) => Some(*target),
                _ => None,
            })
            .collect()
    }

    pub fn toggled(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MapEvent::TogglePopup(handle) => Some(*handle),
                _ => None,
            })
            .collect()
    }

    /// 当前仍在地图上的标记
    pub fn live_markers(&self) -> Vec<&MapEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, MapEvent::Added { handle, .. } if self.live.contains(handle)))
            .collect()
    }
}

impl MapSurface for RecordingMap {
    type Marker = usize;

    fn add_marker(&mut self, at: LngLat, style: &MarkerStyle, popup: Option<Popup>) -> usize {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.push(handle);
        self.events.push(MapEvent::Added {
            handle,
            at,
            style: style.clone(),
            popup,
        });
        handle
    }

    fn remove_marker(&mut self, marker: usize) {
        self.live.retain(|h| *h != marker);
        self.events.push(MapEvent::Removed(marker));
    }

    fn toggle_popup(&mut self, marker: &usize) {
        self.events.push(MapEvent::TogglePopup(*marker));
    }

    fn fly_to(&mut self, target: CameraTarget) {
        self.events.push(MapEvent::FlyTo(target));
    }

    fn jump_to(&mut self, center: LngLat, zoom: f64) {
        self.events.push(MapEvent::JumpTo(center, zoom));
    }
}

#[derive(Debug)]
pub struct RecordingPage {
    pub form_visible: bool,
    pub form_resets: usize,
    pub place_label: Option<String>,
    pub cards: Vec<MemoryCard>,
    pub placeholder: Option<String>,
    pub alerts: Vec<String>,
    pub submit_enabled: bool,
}

impl Default for RecordingPage {
    fn default() -> Self {
        Self {
            form_visible: true,
            form_resets: 0,
            place_label: None,
            cards: Vec::new(),
            placeholder: None,
            alerts: Vec::new(),
            submit_enabled: true,
        }
    }
}

impl PageSurface for RecordingPage {
    fn show_form(&mut self) {
        self.form_visible = true;
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
    }

    fn reset_form(&mut self) {
        self.form_resets += 1;
        self.place_label = None;
    }

    fn set_place_label(&mut self, label: &str) {
        self.place_label = Some(label.to_string());
    }

    fn clear_list(&mut self) {
        self.cards.clear();
        self.placeholder = None;
    }

    fn append_card(&mut self, card: MemoryCard) {
        self.cards.push(card);
    }

    fn show_placeholder(&mut self, message: &str) {
        self.placeholder = Some(message.to_string());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }
}
