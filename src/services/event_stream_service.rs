use std::collections::{HashMap, HashSet, VecDeque};
use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{EventFilter, SceneChangeEvent, SceneChangeType};

/// One active streaming subscriber. The sender feeds the WebSocket task
/// that owns the paired receiver; the channel is unbounded so a slow
/// socket never blocks the publisher.
pub struct EventSubscription {
    pub user_id: String,
    pub event_types: HashSet<SceneChangeType>,
    pub filter: Option<EventFilter>,
    tx: UnboundedSender<SceneChangeEvent>,
}

impl EventSubscription {
    /// Delivery predicate: type set (empty = all) AND every non-empty
    /// filter criterion.
    fn matches(&self, event: &SceneChangeEvent) -> bool {
        if !self.event_types.is_empty() && !self.event_types.contains(&event.change_type) {
            return false;
        }
        let Some(filter) = &self.filter else {
            return true;
        };
        if !filter.entity_ids.is_empty() && !filter.entity_ids.contains(&event.entity_id) {
            return false;
        }
        if !filter.entity_types.is_empty() && !filter.entity_types.contains(&event.entity_type) {
            return false;
        }
        if !filter.user_ids.is_empty() && !filter.user_ids.contains(&event.user_id) {
            return false;
        }
        true
    }
}

/// Real-time scene-change fan-out plus a bounded per-session history ring.
pub struct EventStreamService {
    subscriptions: RwLock<HashMap<String, HashMap<String, EventSubscription>>>,
    history: RwLock<HashMap<String, VecDeque<SceneChangeEvent>>>,
    max_history: usize,
}

impl EventStreamService {
    pub fn new(max_history: usize) -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            history: RwLock::new(HashMap::new()),
            max_history,
        }
    }

    /// Register a streaming subscriber. Returns the subscription id (used
    /// to deregister) and the event receiver the stream task drains.
    pub async fn subscribe(
        &self,
        session_id: &str,
        user_id: &str,
        event_types: Vec<SceneChangeType>,
        filter: Option<EventFilter>,
    ) -> (String, UnboundedReceiver<SceneChangeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription_id = Uuid::new_v4().to_string();

        let subscription = EventSubscription {
            user_id: user_id.to_string(),
            event_types: event_types.into_iter().collect(),
            filter,
            tx,
        };

        let mut subs = self.subscriptions.write().await;
        subs.entry(session_id.to_string())
            .or_default()
            .insert(subscription_id.clone(), subscription);

        info!(
            "Scene event subscription started: {} (user: {}, subscription: {})",
            session_id, user_id, subscription_id
        );
        (subscription_id, rx)
    }

    /// Remove a subscription after client close or cancellation.
    pub async fn unsubscribe(&self, session_id: &str, subscription_id: &str) {
        let mut subs = self.subscriptions.write().await;
        if let Some(session_subs) = subs.get_mut(session_id) {
            if session_subs.remove(subscription_id).is_some() {
                debug!(
                    "Scene event subscription removed: {} ({})",
                    session_id, subscription_id
                );
            }
        }
    }

    /// Append the event to the session history (FIFO-capped) and fan it
    /// out to every matching subscriber. Subscribers whose channel is gone
    /// are pruned here; that and explicit unsubscribe are the only cleanup
    /// paths. Returns the number of subscribers the event was delivered to.
    pub async fn publish(
        &self,
        session_id: &str,
        user_id: &str,
        mut event: SceneChangeEvent,
    ) -> usize {
        if event.timestamp == 0 {
            event.timestamp = Utc::now().timestamp();
        }
        if event.user_id.is_empty() {
            event.user_id = user_id.to_string();
        }

        self.append_history(session_id, event.clone()).await;

        // Send to matching subscribers without holding the write lock;
        // an unbounded send only fails when the receiver side is gone.
        let mut dead = Vec::new();
        let mut delivered = 0;
        {
            let subs = self.subscriptions.read().await;
            if let Some(session_subs) = subs.get(session_id) {
                for (id, sub) in session_subs.iter() {
                    if !sub.matches(&event) {
                        continue;
                    }
                    if sub.tx.send(event.clone()).is_err() {
                        dead.push(id.clone());
                    } else {
                        delivered += 1;
                    }
                }
            }
        }

        if !dead.is_empty() {
            let mut subs = self.subscriptions.write().await;
            if let Some(session_subs) = subs.get_mut(session_id) {
                for id in &dead {
                    session_subs.remove(id);
                    warn!("Removed dead scene event subscription: {} ({})", session_id, id);
                }
            }
        }

        info!(
            "Published scene event: {:?} | entity: {} | user: {} | delivered: {}",
            event.change_type, event.entity_id, event.user_id, delivered
        );
        delivered
    }

    async fn append_history(&self, session_id: &str, event: SceneChangeEvent) {
        let mut history = self.history.write().await;
        let session_history = history.entry(session_id.to_string()).or_default();
        session_history.push_back(event);
        while session_history.len() > self.max_history {
            session_history.pop_front();
        }
    }

    /// Filter history by inclusive time range and optional type set;
    /// total_count reflects the filtered result before pagination.
    pub async fn event_history(
        &self,
        session_id: &str,
        start_time: i64,
        end_time: i64,
        event_types: Vec<SceneChangeType>,
        limit: usize,
        offset: usize,
    ) -> (Vec<SceneChangeEvent>, usize) {
        let history = self.history.read().await;
        let Some(session_history) = history.get(session_id) else {
            return (Vec::new(), 0);
        };

        let type_set: HashSet<SceneChangeType> = event_types.into_iter().collect();
        let filtered: Vec<&SceneChangeEvent> = session_history
            .iter()
            .filter(|e| start_time <= 0 || e.timestamp >= start_time)
            .filter(|e| end_time <= 0 || e.timestamp <= end_time)
            .filter(|e| type_set.is_empty() || type_set.contains(&e.change_type))
            .collect();

        let total_count = filtered.len();
        let page = filtered
            .into_iter()
            .skip(offset)
            .take(if limit > 0 { limit } else { usize::MAX })
            .cloned()
            .collect();
        (page, total_count)
    }

    /// Drop a session's subscriptions and history (session close).
    pub async fn cleanup_session(&self, session_id: &str) {
        self.subscriptions.write().await.remove(session_id);
        self.history.write().await.remove(session_id);
        info!("Cleaned up event data for session: {}", session_id);
    }

    pub async fn subscription_count(&self) -> usize {
        self.subscriptions
            .read()
            .await
            .values()
            .map(|s| s.len())
            .sum()
    }

    pub async fn history_event_count(&self) -> usize {
        self.history.read().await.values().map(|h| h.len()).sum()
    }
}
