pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{create_router, run_server, serve};
pub use state::{open_store, AppState};
