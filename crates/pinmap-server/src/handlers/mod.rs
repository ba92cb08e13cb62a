pub mod health;
pub mod memories;

pub use health::health_handler;
pub use memories::{create_memory, delete_memory, list_memories, search_memories, update_memory};
