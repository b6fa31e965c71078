use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    SessionEvent, SessionEventType, SessionInfo, SessionStatus, UserInfo, UserStatus,
};
use crate::services::error::ServiceError;

struct SessionEventSink {
    event_types: HashSet<SessionEventType>,
    tx: UnboundedSender<SessionEvent>,
}

/// Owns session records, membership, and the session-event broadcast
/// registry. All state is process-memory only.
pub struct SessionService {
    sessions: RwLock<HashMap<String, SessionInfo>>,
    users: RwLock<HashMap<String, Vec<UserInfo>>>,
    streams: RwLock<HashMap<String, HashMap<String, SessionEventSink>>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            streams: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_session(
        &self,
        project_name: &str,
        creator_id: &str,
        metadata: HashMap<String, String>,
    ) -> SessionInfo {
        let session_id = Uuid::new_v4().to_string();
        let session_info = SessionInfo {
            session_id: session_id.clone(),
            project_name: project_name.to_string(),
            creator_id: creator_id.to_string(),
            created_time: Utc::now().timestamp(),
            status: SessionStatus::Active,
            metadata,
        };

        self.sessions
            .write()
            .await
            .insert(session_id.clone(), session_info.clone());
        self.users.write().await.insert(session_id.clone(), Vec::new());

        info!("Session created: {} (project: {})", session_id, project_name);
        session_info
    }

    /// Idempotent per user: rejoining replaces the prior membership record.
    /// Broadcasts UserJoined fire-and-forget.
    pub async fn join_session(
        self: &Arc<Self>,
        session_id: &str,
        user_id: &str,
        client_type: &str,
        client_metadata: HashMap<String, String>,
    ) -> Result<(SessionInfo, Vec<UserInfo>), ServiceError> {
        let session_info = self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| ServiceError::session_not_found(session_id))?;

        let user_info = UserInfo {
            user_id: user_id.to_string(),
            display_name: user_id.to_string(),
            client_type: client_type.to_string(),
            joined_time: Utc::now().timestamp(),
            status: UserStatus::Online,
            metadata: client_metadata,
        };

        let active_users = {
            let mut users = self.users.write().await;
            let session_users = users.entry(session_id.to_string()).or_default();
            session_users.retain(|u| u.user_id != user_id);
            session_users.push(user_info);
            session_users.clone()
        };

        info!("User joined session: {} -> {}", user_id, session_id);
        self.spawn_broadcast(session_id, user_id, SessionEventType::UserJoined);

        Ok((session_info, active_users))
    }

    /// Lenient: removing an absent membership is a silent success.
    pub async fn leave_session(self: &Arc<Self>, session_id: &str, user_id: &str) {
        let removed = {
            let mut users = self.users.write().await;
            match users.get_mut(session_id) {
                Some(session_users) => {
                    let before = session_users.len();
                    session_users.retain(|u| u.user_id != user_id);
                    session_users.len() < before
                }
                None => false,
            }
        };

        if removed {
            info!("User left session: {} <- {}", user_id, session_id);
            self.spawn_broadcast(session_id, user_id, SessionEventType::UserLeft);
        }
    }

    pub async fn get_session_info(
        &self,
        session_id: &str,
    ) -> Result<(SessionInfo, Vec<UserInfo>), ServiceError> {
        let session_info = self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| ServiceError::session_not_found(session_id))?;
        let active_users = self
            .users
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default();
        Ok((session_info, active_users))
    }

    /// Active -> Closed transition: drops membership and session-event
    /// streams after a final SessionClosed broadcast.
    pub async fn close_session(
        self: &Arc<Self>,
        session_id: &str,
        user_id: &str,
    ) -> Result<(), ServiceError> {
        {
            let mut sessions = self.sessions.write().await;
            let session = sessions
                .get_mut(session_id)
                .ok_or_else(|| ServiceError::session_not_found(session_id))?;
            session.status = SessionStatus::Closed;
        }

        self.broadcast_session_event(
            session_id,
            SessionEvent {
                event_type: SessionEventType::SessionClosed,
                session_id: session_id.to_string(),
                user_id: user_id.to_string(),
                timestamp: Utc::now().timestamp(),
            },
        )
        .await;

        self.users.write().await.remove(session_id);
        self.streams.write().await.remove(session_id);
        info!("Session closed: {} (by: {})", session_id, user_id);
        Ok(())
    }

    pub async fn session_exists(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// Register a session-event stream; fails when the session is unknown.
    pub async fn subscribe_events(
        &self,
        session_id: &str,
        user_id: &str,
        event_types: Vec<SessionEventType>,
    ) -> Result<(String, UnboundedReceiver<SessionEvent>), ServiceError> {
        if !self.session_exists(session_id).await {
            return Err(ServiceError::session_not_found(session_id));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let subscription_id = Uuid::new_v4().to_string();
        self.streams
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .insert(
                subscription_id.clone(),
                SessionEventSink {
                    event_types: event_types.into_iter().collect(),
                    tx,
                },
            );

        info!(
            "Session event stream started: {} (user: {}, subscription: {})",
            session_id, user_id, subscription_id
        );
        Ok((subscription_id, rx))
    }

    pub async fn unsubscribe_events(&self, session_id: &str, subscription_id: &str) {
        let mut streams = self.streams.write().await;
        if let Some(session_streams) = streams.get_mut(session_id) {
            if session_streams.remove(subscription_id).is_some() {
                debug!(
                    "Session event stream removed: {} ({})",
                    session_id, subscription_id
                );
            }
        }
    }

    /// Deliver to every registered stream whose type filter matches,
    /// pruning streams whose receiver is gone. Delivery failure to one
    /// stream never blocks the others or the caller.
    async fn broadcast_session_event(&self, session_id: &str, event: SessionEvent) {
        let mut dead = Vec::new();
        {
            let streams = self.streams.read().await;
            let Some(session_streams) = streams.get(session_id) else {
                return;
            };
            for (id, sink) in session_streams.iter() {
                if !sink.event_types.is_empty() && !sink.event_types.contains(&event.event_type) {
                    continue;
                }
                if sink.tx.send(event.clone()).is_err() {
                    dead.push(id.clone());
                }
            }
        }

        if !dead.is_empty() {
            let mut streams = self.streams.write().await;
            if let Some(session_streams) = streams.get_mut(session_id) {
                for id in &dead {
                    session_streams.remove(id);
                    warn!("Removed dead session event stream: {} ({})", session_id, id);
                }
            }
        }
    }

    fn spawn_broadcast(self: &Arc<Self>, session_id: &str, user_id: &str, event_type: SessionEventType) {
        let svc = self.clone();
        let event = SessionEvent {
            event_type,
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            timestamp: Utc::now().timestamp(),
        };
        let session_id = session_id.to_string();
        tokio::spawn(async move {
            svc.broadcast_session_event(&session_id, event).await;
        });
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.values().map(|u| u.len()).sum()
    }

    pub async fn stream_count(&self) -> usize {
        self.streams.read().await.values().map(|s| s.len()).sum()
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_get_session() {
        let svc = Arc::new(SessionService::new());
        let info = svc.create_session("Project", "u1", HashMap::new()).await;
        assert_eq!(info.status, SessionStatus::Active);

        let (fetched, users) = svc.get_session_info(&info.session_id).await.unwrap();
        assert_eq!(fetched.project_name, "Project");
        assert_eq!(fetched.creator_id, "u1");
        assert!(users.is_empty());

        let err = svc.get_session_info("missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn rejoin_replaces_membership() {
        let svc = Arc::new(SessionService::new());
        let info = svc.create_session("P", "u1", HashMap::new()).await;

        svc.join_session(&info.session_id, "u1", "Unity", HashMap::new())
            .await
            .unwrap();
        let (_, users) = svc
            .join_session(&info.session_id, "u1", "Godot", HashMap::new())
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].client_type, "Godot");

        let err = svc
            .join_session("missing", "u1", "Unity", HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn leave_is_lenient() {
        let svc = Arc::new(SessionService::new());
        let info = svc.create_session("P", "u1", HashMap::new()).await;

        // Leaving without ever joining is a silent success
        svc.leave_session(&info.session_id, "ghost").await;
        svc.leave_session("missing", "ghost").await;

        svc.join_session(&info.session_id, "u1", "Unity", HashMap::new())
            .await
            .unwrap();
        svc.leave_session(&info.session_id, "u1").await;
        let (_, users) = svc.get_session_info(&info.session_id).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn session_events_reach_subscribers() {
        let svc = Arc::new(SessionService::new());
        let info = svc.create_session("P", "u1", HashMap::new()).await;
        let (_id, mut rx) = svc
            .subscribe_events(&info.session_id, "watcher", Vec::new())
            .await
            .unwrap();

        svc.join_session(&info.session_id, "u2", "Unity", HashMap::new())
            .await
            .unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, SessionEventType::UserJoined);
        assert_eq!(event.user_id, "u2");

        svc.leave_session(&info.session_id, "u2").await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, SessionEventType::UserLeft);
    }

    #[tokio::test]
    async fn event_type_filter_applies_to_stream() {
        let svc = Arc::new(SessionService::new());
        let info = svc.create_session("P", "u1", HashMap::new()).await;
        let (_id, mut rx) = svc
            .subscribe_events(&info.session_id, "watcher", vec![SessionEventType::UserLeft])
            .await
            .unwrap();

        svc.join_session(&info.session_id, "u2", "Unity", HashMap::new())
            .await
            .unwrap();
        svc.leave_session(&info.session_id, "u2").await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, SessionEventType::UserLeft);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn close_session_broadcasts_and_clears() {
        let svc = Arc::new(SessionService::new());
        let info = svc.create_session("P", "u1", HashMap::new()).await;
        svc.join_session(&info.session_id, "u2", "Unity", HashMap::new())
            .await
            .unwrap();
        let (_id, mut rx) = svc
            .subscribe_events(&info.session_id, "watcher", Vec::new())
            .await
            .unwrap();

        svc.close_session(&info.session_id, "u1").await.unwrap();

        // close_session awaits the SessionClosed broadcast before dropping
        // the stream registry, so it is buffered by now. The UserJoined
        // broadcast was spawned and may or may not have landed first.
        let mut saw_closed = false;
        while let Ok(event) = rx.try_recv() {
            if event.event_type == SessionEventType::SessionClosed {
                saw_closed = true;
            }
        }
        assert!(saw_closed);

        let (session, users) = svc.get_session_info(&info.session_id).await.unwrap();
        assert_eq!(session.status, SessionStatus::Closed);
        assert!(users.is_empty());
        assert_eq!(svc.stream_count().await, 0);
    }
}
