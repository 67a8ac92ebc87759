pub mod core;
pub mod event;
pub mod math;
pub mod subsystems;
pub mod window;

pub use crate::core::config::EngineConfig;
pub use crate::core::engine::Engine;
pub use crate::core::error::EngineError;
pub use crate::event::{Event, EventBus, EventHandler, EventKind};
