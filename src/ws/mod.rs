pub mod scene_events;
pub mod session_events;

pub use scene_events::scene_events_ws;
pub use session_events::session_events_ws;
