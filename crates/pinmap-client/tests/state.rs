//! ClientState 状态转换测试（进程内假 API）

mod support;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use pinmap_client::{
    ClientError, ClientResult, ClientState, MemoryApi, CHOOSE_LOCATION, LOAD_FAILED, NO_MEMORIES,
    WRITE_MEMORY,
};
use pinmap_config::ClientConfig;
use pinmap_core::{CreateMemoryRequest, LngLat, Memory, UpdateMemoryRequest, DEFAULT_PLACE};
use support::{MapEvent, RecordingMap, RecordingPage};

/// 按调用记录请求的假 API
#[derive(Default)]
struct FakeApi {
    memories: Mutex<Vec<Memory>>,
    created: Mutex<Vec<CreateMemoryRequest>>,
    fail_list: Mutex<bool>,
    reject_create: Mutex<Option<String>>,
}

impl FakeApi {
    fn with(memories: Vec<Memory>) -> Self {
        Self {
            memories: Mutex::new(memories),
            ..Default::default()
        }
    }
}

fn not_found() -> ClientError {
    ClientError::Api {
        status: 404,
        message: "not found".to_string(),
    }
}

#[async_trait]
impl MemoryApi for FakeApi {
    async fn create(&self, request: &CreateMemoryRequest) -> ClientResult<Memory> {
        self.created.lock().push(request.clone());
        if let Some(message) = self.reject_create.lock().clone() {
            return Err(ClientError::Api {
                status: 500,
                message,
            });
        }

        let new = request
            .clone()
            .validate(DEFAULT_PLACE)
            .map_err(|e| ClientError::Api {
                status: 400,
                message: e.to_string(),
            })?;
        let memory = Memory::create(new);
        self.memories.lock().insert(0, memory.clone());
        Ok(memory)
    }

    async fn list(&self) -> ClientResult<Vec<Memory>> {
        if *self.fail_list.lock() {
            return Err(ClientError::Api {
                status: 500,
                message: "Failed to fetch records".to_string(),
            });
        }
        Ok(self.memories.lock().clone())
    }

    async fn search(&self, _terms: &str) -> ClientResult<Vec<Memory>> {
        self.list().await
    }

    async fn update(&self, _id: &str, _request: &UpdateMemoryRequest) -> ClientResult<Memory> {
        Err(not_found())
    }

    async fn delete(&self, _id: &str) -> ClientResult<Memory> {
        Err(not_found())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

fn memory(id: &str, text: &str, coordinate: Option<LngLat>, age_secs: i64) -> Memory {
    let at = Utc::now() - Duration::seconds(age_secs);
    Memory {
        id: id.to_string(),
        place: DEFAULT_PLACE.to_string(),
        text: text.to_string(),
        lat: coordinate.map(|c| c.lat),
        lng: coordinate.map(|c| c.lng),
        created_at: at,
        updated_at: at,
    }
}

type TestState = ClientState<FakeApi, RecordingMap, RecordingPage>;

fn state(api: FakeApi) -> TestState {
    ClientState::new(
        api,
        RecordingMap::default(),
        RecordingPage::default(),
        ClientConfig::default(),
    )
}

#[tokio::test]
async fn load_renders_cards_and_markers_for_placeable_memories() {
    let api = FakeApi::with(vec![
        memory("a", "Coffee here", Some(LngLat::new(-79.38, 43.65)), 10),
        memory("b", "No location", None, 20),
    ]);
    let mut state = state(api);

    state.load().await;

    assert!(!state.page().form_visible);
    assert_eq!(
        state.map().events.first(),
        Some(&MapEvent::JumpTo(LngLat::new(-79.38, 43.65), 11.0))
    );

    let ids: Vec<_> = state.page().cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(state.marker_count(), 1);
    assert!(state.marker("a").is_some());
    assert!(state.marker("b").is_none());
    assert_eq!(state.page().placeholder, None);

    match state.map().live_markers().as_slice() {
        [MapEvent::Added { style, popup, .. }] => {
            assert_eq!(style.color.as_deref(), Some("#b86b3a"));
            assert_eq!(popup.as_ref().map(|p| p.text.as_str()), Some("Coffee here"));
        }
        other => panic!("unexpected markers: {:?}", other),
    }
}

#[tokio::test]
async fn load_empty_shows_placeholder() {
    let mut state = state(FakeApi::default());

    state.load().await;

    assert!(state.page().cards.is_empty());
    assert_eq!(state.page().placeholder.as_deref(), Some(NO_MEMORIES));
    assert_eq!(state.marker_count(), 0);
    assert!(!state.fetch_failed());
}

#[tokio::test]
async fn fetch_failure_shows_error_placeholder() {
    let api = FakeApi::with(vec![memory("a", "x", Some(LngLat::new(1.0, 2.0)), 0)]);
    let mut state = state(api);
    state.load().await;
    assert_eq!(state.marker_count(), 1);

    *state.api().fail_list.lock() = true;
    state.fetch_and_render().await;

    assert_eq!(state.page().placeholder.as_deref(), Some(LOAD_FAILED));
    assert!(state.page().cards.is_empty());
    assert_eq!(state.marker_count(), 0);
    assert!(state.map().live.is_empty());
    assert!(state.fetch_failed());

    *state.api().fail_list.lock() = false;
    state.fetch_and_render().await;
    assert!(!state.fetch_failed());
}

#[tokio::test]
async fn map_click_places_single_draft_marker() {
    let mut state = state(FakeApi::default());
    state.load().await;

    state.on_map_click(LngLat::new(-79.38, 43.65));
    let first = state.pending_marker().copied();
    state.on_map_click(LngLat::new(-79.4, 43.7));

    assert_eq!(state.selected_coordinate(), Some(LngLat::new(-79.4, 43.7)));
    assert!(state.page().form_visible);
    assert_eq!(
        state.page().place_label.as_deref(),
        Some("Pinned location: 43.7000, -79.4000")
    );

    // 旧草稿被移除，地图上只剩一个
    assert!(state.map().events.contains(&MapEvent::Removed(first.unwrap())));
    assert_eq!(state.map().live.len(), 1);
    assert_eq!(state.pending_marker().copied(), state.map().live.first().copied());
}

#[tokio::test]
async fn submit_without_location_alerts() {
    let mut state = state(FakeApi::default());
    state.load().await;

    assert!(state.submit("Coffee here").await.is_none());

    assert_eq!(state.page().alerts, vec![CHOOSE_LOCATION.to_string()]);
    assert!(state.api().created.lock().is_empty());
}

#[tokio::test]
async fn submit_blank_text_alerts_and_keeps_draft() {
    let mut state = state(FakeApi::default());
    state.load().await;
    state.on_map_click(LngLat::new(-79.38, 43.65));

    assert!(state.submit("   ").await.is_none());

    assert_eq!(state.page().alerts, vec![WRITE_MEMORY.to_string()]);
    assert!(state.api().created.lock().is_empty());
    assert!(state.pending_marker().is_some());
    assert_eq!(state.selected_coordinate(), Some(LngLat::new(-79.38, 43.65)));
    assert!(state.page().form_visible);
}

#[tokio::test]
async fn successful_submit_clears_draft_and_refetches() {
    let mut state = state(FakeApi::default());
    state.load().await;
    state.on_map_click(LngLat::new(-79.38, 43.65));
    let draft = state.pending_marker().copied().unwrap();

    let saved = state.submit("  Coffee here  ").await.unwrap();

    let sent = state.api().created.lock().clone();
    assert_eq!(
        sent,
        vec![CreateMemoryRequest::new("Coffee here")
            .with_place(DEFAULT_PLACE)
            .with_coordinate(LngLat::new(-79.38, 43.65))]
    );

    assert_eq!(saved.text, "Coffee here");
    assert_eq!(state.selected_coordinate(), None);
    assert!(state.pending_marker().is_none());
    assert!(!state.map().live.contains(&draft));
    assert!(!state.page().form_visible);
    assert_eq!(state.page().form_resets, 1);
    assert!(state.page().submit_enabled);

    assert_eq!(state.page().cards.len(), 1);
    assert_eq!(state.marker_count(), 1);
    assert_eq!(state.map().live.len(), 1);
}

#[tokio::test]
async fn failed_submit_alerts_server_message_and_keeps_state() {
    let api = FakeApi::default();
    *api.reject_create.lock() = Some("Failed to create record: disk full".to_string());
    let mut state = state(api);
    state.load().await;
    state.on_map_click(LngLat::new(-79.38, 43.65));

    assert!(state.submit("Coffee here").await.is_none());

    assert_eq!(
        state.page().alerts,
        vec!["Failed to create record: disk full".to_string()]
    );
    assert!(state.pending_marker().is_some());
    assert_eq!(state.selected_coordinate(), Some(LngLat::new(-79.38, 43.65)));
    assert!(!state.is_submit_in_flight());
    assert!(state.page().submit_enabled);
}

#[tokio::test]
async fn second_submit_is_ignored_while_in_flight() {
    let mut state = state(FakeApi::default());
    state.load().await;
    state.on_map_click(LngLat::new(-79.38, 43.65));

    let request = state.begin_submit("Coffee here").unwrap();
    assert!(state.is_submit_in_flight());
    assert!(!state.page().submit_enabled);

    assert!(state.begin_submit("Coffee again").is_none());
    assert!(state.page().alerts.is_empty());

    let result = state.api().create(&request).await;
    state.finish_submit(result).await;

    assert!(!state.is_submit_in_flight());
    assert_eq!(state.api().created.lock().len(), 1);
    assert_eq!(state.page().cards.len(), 1);
}

#[tokio::test]
async fn card_click_flies_and_toggles_popup() {
    let api = FakeApi::with(vec![
        memory("a", "Coffee here", Some(LngLat::new(-79.38, 43.65)), 0),
        memory("b", "Nowhere", None, 5),
    ]);
    let mut state = state(api);
    state.load().await;

    assert!(state.on_card_click("a"));
    let handle = state.marker("a").unwrap().handle;

    let targets = state.map().fly_targets();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].center, LngLat::new(-79.38, 43.65));
    assert_eq!(targets[0].zoom, 15.0);
    assert_eq!(targets[0].speed, 0.8);
    assert_eq!(state.map().toggled(), vec![handle]);

    // 没有坐标或未知 id 时不操作地图
    assert!(!state.on_card_click("b"));
    assert!(!state.on_card_click("missing"));
    assert_eq!(state.map().fly_targets().len(), 1);
}

#[tokio::test]
async fn refetch_never_duplicates_markers() {
    let api = FakeApi::with(vec![
        memory("a", "one", Some(LngLat::new(1.0, 1.0)), 0),
        memory("b", "two", Some(LngLat::new(2.0, 2.0)), 5),
    ]);
    let mut state = state(api);
    state.load().await;
    state.fetch_and_render().await;
    state.fetch_and_render().await;

    assert_eq!(state.marker_count(), 2);
    assert_eq!(state.map().live.len(), 2);
    assert_eq!(state.page().cards.len(), 2);
}

#[tokio::test]
async fn repeated_id_in_snapshot_keeps_one_marker() {
    let api = FakeApi::with(vec![
        memory("a", "newer copy", Some(LngLat::new(3.0, 3.0)), 0),
        memory("a", "older copy", Some(LngLat::new(1.0, 1.0)), 5),
    ]);
    let mut state = state(api);
    state.load().await;

    assert_eq!(state.marker_count(), 1);
    assert_eq!(state.map().live.len(), 1);
    assert_eq!(state.marker("a").unwrap().coordinate, LngLat::new(1.0, 1.0));

    // 下一轮能移除全部标记
    *state.api().fail_list.lock() = true;
    state.fetch_and_render().await;
    assert!(state.map().live.is_empty());
}
