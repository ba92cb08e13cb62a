//! 终端版地图与页面：把 `ClientState` 的渲染输出到 stdout

use colored::Colorize;
use pinmap_client::{CameraTarget, MapSurface, MarkerStyle, MemoryCard, PageSurface, Popup};
use pinmap_core::LngLat;

/// 终端没有真正的地图，只记录标记数量
#[derive(Debug, Default)]
pub struct TerminalMap {
    next_marker: usize,
    placed: usize,
}

impl TerminalMap {
    pub fn placed(&self) -> usize {
        self.placed
    }
}

impl MapSurface for TerminalMap {
    type Marker = usize;

    fn add_marker(&mut self, at: LngLat, style: &MarkerStyle, popup: Option<Popup>) -> usize {
        let marker = self.next_marker;
        self.next_marker += 1;
        self.placed += 1;
        log::debug!(
            "marker #{} at {} (color {:?}, popup: {})",
            marker,
            at,
            style.color,
            popup.is_some()
        );
        marker
    }

    fn remove_marker(&mut self, marker: usize) {
        self.placed = self.placed.saturating_sub(1);
        log::debug!("marker #{} removed", marker);
    }

    fn toggle_popup(&mut self, marker: &usize) {
        log::debug!("popup toggled on marker #{}", marker);
    }

    fn fly_to(&mut self, target: CameraTarget) {
        println!(
            "{}",
            format!(
                "📍 {:.4}, {:.4} (zoom {})",
                target.center.lat, target.center.lng, target.zoom
            )
            .cyan()
        );
    }
}

#[derive(Debug, Default)]
pub struct TerminalPage {
    pub cards: Vec<MemoryCard>,
    /// 只收集卡片，不打印
    pub quiet: bool,
}

impl TerminalPage {
    pub fn quiet() -> Self {
        Self {
            cards: Vec::new(),
            quiet: true,
        }
    }
}

impl PageSurface for TerminalPage {
    fn show_form(&mut self) {}

    fn hide_form(&mut self) {}

    fn reset_form(&mut self) {}

    fn set_place_label(&mut self, label: &str) {
        println!("{}", label.dimmed());
    }

    fn clear_list(&mut self) {
        self.cards.clear();
    }

    fn append_card(&mut self, card: MemoryCard) {
        if self.quiet {
            self.cards.push(card);
            return;
        }
        println!("{}", card.place.bold());
        println!("  {}", card.text);
        println!("  {}", format!("{}  {}", card.timestamp, card.id).dimmed());
        self.cards.push(card);
    }

    fn show_placeholder(&mut self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{}", message.dimmed());
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{}", format!("❌ {}", message).red());
    }

    fn set_submit_enabled(&mut self, _enabled: bool) {}
}
