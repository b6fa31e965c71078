pub mod error;
pub mod event_stream_service;
pub mod scene_data_service;
pub mod session_service;
pub mod version;

pub use error::ServiceError;
pub use event_stream_service::EventStreamService;
pub use scene_data_service::SceneDataService;
pub use session_service::SessionService;
pub use version::VersionCounter;
