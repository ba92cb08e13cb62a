//! # Pinmap Client
//!
//! HTTP API 客户端与客户端状态管理。`ClientState` 通过 [`MapSurface`] 与
//! [`PageSurface`] 驱动地图和列表，保证二者与服务端的最新快照一致。

pub mod api;
pub mod error;
pub mod state;
pub mod surface;

pub use api::{HttpMemoryApi, MemoryApi};
pub use error::{ClientError, ClientResult};
pub use state::{
    ClientState, PlacedMarker, CHOOSE_LOCATION, LOAD_FAILED, NO_MEMORIES, WRITE_MEMORY,
};
pub use surface::{CameraTarget, MapSurface, MarkerStyle, MemoryCard, PageSurface, Popup};
