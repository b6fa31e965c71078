pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod event;
pub mod event_api;
pub mod health;
pub mod lock;
pub mod lock_api;
pub mod scene;
pub mod scene_api;
pub mod session;
pub mod session_api;

pub use diagnostics::*;
pub use entity::*;
pub use error::*;
pub use event::*;
pub use event_api::*;
pub use health::*;
pub use lock::*;
pub use lock_api::*;
pub use scene::*;
pub use scene_api::*;
pub use session::*;
pub use session_api::*;
