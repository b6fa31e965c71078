use std::sync::Arc;

use crate::config::Config;
use crate::services::{EventStreamService, SceneDataService, SessionService, VersionCounter};

/// Shared handle to the three collaboration services. Cloned into every
/// handler and WebSocket task.
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<SessionService>,
    pub scene_data: Arc<SceneDataService>,
    pub events: Arc<EventStreamService>,
    pub versions: Arc<VersionCounter>,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let versions = Arc::new(VersionCounter::new());
        let events = Arc::new(EventStreamService::new(config.event_history_limit));
        let scene_data = Arc::new(SceneDataService::new(versions.clone(), events.clone()));
        let sessions = Arc::new(SessionService::new());

        Arc::new(Self {
            config,
            sessions,
            scene_data,
            events,
            versions,
        })
    }
}
