use std::collections::HashMap;
use std::sync::Arc;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::scene_api::{BatchOperation, OperationResult, OperationType};
use crate::models::{
    EntityLock, EntityQuery, LockType, SceneChangeEvent, SceneChangeType, SceneData,
    SceneEntity, SceneMetadata,
};
use crate::services::error::ServiceError;
use crate::services::event_stream_service::EventStreamService;
use crate::services::version::VersionCounter;

type EntityMap = Arc<RwLock<HashMap<String, SceneEntity>>>;
type LockMap = Arc<RwLock<HashMap<String, EntityLock>>>;

/// Entity CRUD, query, batch and lock operations over per-session stores.
/// Every mutation draws a version from the process-wide counter and
/// publishes a change event through the event stream service.
pub struct SceneDataService {
    /// Scene records keyed by "session_id:scene_id"
    scenes: RwLock<HashMap<String, SceneData>>,
    /// Per-session entity stores; the outer map is only locked to look up
    /// or create a session's store, so sessions never serialize each other
    entities: RwLock<HashMap<String, EntityMap>>,
    /// Per-session lock tables; check-and-insert happens under the
    /// session table's write lock, making acquisition atomic per entity
    locks: RwLock<HashMap<String, LockMap>>,
    versions: Arc<VersionCounter>,
    events: Arc<EventStreamService>,
}

impl SceneDataService {
    pub fn new(versions: Arc<VersionCounter>, events: Arc<EventStreamService>) -> Self {
        Self {
            scenes: RwLock::new(HashMap::new()),
            entities: RwLock::new(HashMap::new()),
            locks: RwLock::new(HashMap::new()),
            versions,
            events,
        }
    }

    async fn session_entities(&self, session_id: &str) -> EntityMap {
        let mut entities = self.entities.write().await;
        entities
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(HashMap::new())))
            .clone()
    }

    async fn session_locks(&self, session_id: &str) -> LockMap {
        let mut locks = self.locks.write().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(HashMap::new())))
            .clone()
    }

    async fn publish_change(
        &self,
        session_id: &str,
        user_id: &str,
        change_type: SceneChangeType,
        entity_id: &str,
        entity_type: &str,
    ) {
        self.events
            .publish(
                session_id,
                user_id,
                SceneChangeEvent {
                    change_type,
                    entity_id: entity_id.to_string(),
                    entity_type: entity_type.to_string(),
                    user_id: user_id.to_string(),
                    timestamp: 0,
                },
            )
            .await;
    }

    /// Lazily creates a default scene record on first access. The returned
    /// snapshot is a copy; callers must re-fetch to observe later mutation.
    pub async fn get_scene_data(&self, session_id: &str, scene_id: Option<&str>) -> SceneData {
        let scene_id = match scene_id {
            Some(id) if !id.is_empty() => id,
            _ => "default",
        };
        let key = format!("{}:{}", session_id, scene_id);

        let mut scene = {
            let mut scenes = self.scenes.write().await;
            scenes
                .entry(key)
                .or_insert_with(|| {
                    let now = Utc::now().timestamp();
                    SceneData {
                        scene_id: scene_id.to_string(),
                        name: format!("Scene_{}", scene_id),
                        entities: Vec::new(),
                        version: 1,
                        metadata: SceneMetadata {
                            created_by: "system".to_string(),
                            created_time: now,
                            modified_by: "system".to_string(),
                            modified_time: now,
                        },
                    }
                })
                .clone()
        };

        let entities = self.session_entities(session_id).await;
        scene.entities = entities.read().await.values().cloned().collect();

        info!(
            "Fetched scene data: {}:{} ({} entities)",
            session_id,
            scene.scene_id,
            scene.entities.len()
        );
        scene
    }

    /// Wholesale replace of the scene record and the session's entity set.
    /// Last-writer-wins; concurrent calls clobber each other by design of
    /// the protocol, not merged.
    pub async fn update_scene_data(
        &self,
        session_id: &str,
        user_id: &str,
        mut scene_data: SceneData,
    ) -> i64 {
        let version = self.versions.next();
        scene_data.version = version;
        scene_data.metadata.modified_by = user_id.to_string();
        scene_data.metadata.modified_time = Utc::now().timestamp();

        let key = format!("{}:{}", session_id, scene_data.scene_id);
        let incoming: HashMap<String, SceneEntity> = scene_data
            .entities
            .iter()
            .cloned()
            .map(|e| (e.entity_id.clone(), e))
            .collect();

        self.scenes.write().await.insert(key.clone(), scene_data);

        let entities = self.session_entities(session_id).await;
        *entities.write().await = incoming;

        info!(
            "Scene data replaced: {} (version: {}, user: {})",
            key, version, user_id
        );
        self.publish_change(session_id, user_id, SceneChangeType::SceneUpdated, "", "")
            .await;
        version
    }

    /// Assigns an id when blank and stamps creation metadata. No existence
    /// check: a caller-supplied colliding id silently overwrites.
    pub async fn create_entity(
        &self,
        session_id: &str,
        user_id: &str,
        mut entity: SceneEntity,
    ) -> (String, i64) {
        if entity.entity_id.is_empty() {
            entity.entity_id = Uuid::new_v4().to_string();
        }

        let now = Utc::now().timestamp();
        entity.metadata.created_by = user_id.to_string();
        entity.metadata.created_time = now;
        entity.metadata.modified_by = user_id.to_string();
        entity.metadata.modified_time = now;
        entity.metadata.version = self.versions.next();

        let entity_id = entity.entity_id.clone();
        let entity_type = entity.entity_type.clone();
        let version = entity.metadata.version;

        let entities = self.session_entities(session_id).await;
        entities.write().await.insert(entity_id.clone(), entity);

        info!(
            "Entity created: {} [id: {}] (user: {}, version: {})",
            entity_type, entity_id, user_id, version
        );
        self.publish_change(
            session_id,
            user_id,
            SceneChangeType::EntityAdded,
            &entity_id,
            &entity_type,
        )
        .await;
        (entity_id, version)
    }

    /// Wholesale record replace (not a field merge). Existing locks are
    /// advisory and not checked here.
    pub async fn update_entity(
        &self,
        session_id: &str,
        user_id: &str,
        mut entity: SceneEntity,
    ) -> Result<i64, ServiceError> {
        let entities = self.session_entities(session_id).await;

        entity.metadata.modified_by = user_id.to_string();
        entity.metadata.modified_time = Utc::now().timestamp();

        let (entity_id, entity_type, version) = {
            let mut store = entities.write().await;
            if !store.contains_key(&entity.entity_id) {
                return Err(ServiceError::entity_not_found(&entity.entity_id));
            }
            entity.metadata.version = self.versions.next();
            let id = entity.entity_id.clone();
            let entity_type = entity.entity_type.clone();
            let version = entity.metadata.version;
            store.insert(id.clone(), entity);
            (id, entity_type, version)
        };

        info!(
            "Entity updated: {} (user: {}, version: {})",
            entity_id, user_id, version
        );
        self.publish_change(
            session_id,
            user_id,
            SceneChangeType::EntityModified,
            &entity_id,
            &entity_type,
        )
        .await;
        Ok(version)
    }

    pub async fn delete_entity(
        &self,
        session_id: &str,
        user_id: &str,
        entity_id: &str,
    ) -> Result<i64, ServiceError> {
        let entities = self.session_entities(session_id).await;
        let removed = entities
            .write()
            .await
            .remove(entity_id)
            .ok_or_else(|| ServiceError::entity_not_found(entity_id))?;

        let version = self.versions.next();
        info!(
            "Entity deleted: {} [id: {}] (user: {})",
            removed.name, entity_id, user_id
        );
        self.publish_change(
            session_id,
            user_id,
            SceneChangeType::EntityRemoved,
            entity_id,
            &removed.entity_type,
        )
        .await;
        Ok(version)
    }

    pub async fn get_entity(
        &self,
        session_id: &str,
        entity_id: &str,
    ) -> Result<SceneEntity, ServiceError> {
        let entities = self.session_entities(session_id).await;
        let store = entities.read().await;
        store
            .get(entity_id)
            .cloned()
            .ok_or_else(|| ServiceError::entity_not_found(entity_id))
    }

    /// Conjunction of all provided criteria; empty criteria are no-ops.
    /// total_count is computed before pagination.
    pub async fn query_entities(
        &self,
        session_id: &str,
        query: &EntityQuery,
    ) -> (Vec<SceneEntity>, usize) {
        let entities = self.session_entities(session_id).await;
        let store = entities.read().await;

        let mut matched: Vec<&SceneEntity> = store
            .values()
            .filter(|e| query.entity_ids.is_empty() || query.entity_ids.contains(&e.entity_id))
            .filter(|e| query.types.is_empty() || query.types.contains(&e.entity_type))
            .filter(|e| match &query.parent_id {
                Some(parent) if !parent.is_empty() => e.parent_id.as_deref() == Some(parent),
                _ => true,
            })
            .filter(|e| {
                query.tags.is_empty()
                    || e.metadata.tags.iter().any(|tag| query.tags.contains(tag))
            })
            .collect();

        // Deterministic paging over the hash map
        matched.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));

        let total_count = matched.len();
        let page = matched
            .into_iter()
            .skip(query.offset)
            .take(if query.limit > 0 { query.limit } else { usize::MAX })
            .cloned()
            .collect();
        (page, total_count)
    }

    /// Ordered, non-atomic: each operation succeeds or fails on its own and
    /// draws its own version; the batch version is a single counter value
    /// obtained up front.
    pub async fn batch_update(
        &self,
        session_id: &str,
        user_id: &str,
        operations: Vec<BatchOperation>,
    ) -> (Vec<OperationResult>, i64) {
        let batch_version = self.versions.next();
        let mut results = Vec::with_capacity(operations.len());

        for operation in operations {
            let result = match operation.operation_type {
                OperationType::Create => {
                    let (entity_id, _) =
                        self.create_entity(session_id, user_id, operation.entity).await;
                    OperationResult {
                        success: true,
                        error_message: String::new(),
                        entity_id,
                    }
                }
                OperationType::Update => {
                    let entity_id = operation.entity.entity_id.clone();
                    match self.update_entity(session_id, user_id, operation.entity).await {
                        Ok(_) => OperationResult {
                            success: true,
                            error_message: String::new(),
                            entity_id,
                        },
                        Err(e) => OperationResult {
                            success: false,
                            error_message: e.to_string(),
                            entity_id,
                        },
                    }
                }
                OperationType::Delete => {
                    let entity_id = operation.entity.entity_id.clone();
                    match self.delete_entity(session_id, user_id, &entity_id).await {
                        Ok(_) => OperationResult {
                            success: true,
                            error_message: String::new(),
                            entity_id,
                        },
                        Err(e) => OperationResult {
                            success: false,
                            error_message: e.to_string(),
                            entity_id,
                        },
                    }
                }
            };
            results.push(result);
        }

        info!(
            "Batch completed: {} operations (user: {}, batch version: {})",
            results.len(),
            user_id,
            batch_version
        );
        (results, batch_version)
    }

    /// Single-holder advisory lock. A request conflicts when a different
    /// user already holds any lock on the entity; the same user re-acquires
    /// freely (refreshes the record, including a type change). The check
    /// and insert run under the session lock table's write lock.
    pub async fn lock_entity(
        &self,
        session_id: &str,
        user_id: &str,
        entity_id: &str,
        lock_type: LockType,
    ) -> Result<EntityLock, ServiceError> {
        let locks = self.session_locks(session_id).await;
        let mut table = locks.write().await;

        if let Some(existing) = table.get(entity_id) {
            if existing.user_id != user_id {
                return Err(ServiceError::Conflict(format!(
                    "Entity '{}' is locked by user '{}'",
                    entity_id, existing.user_id
                )));
            }
        }

        let lock_info = EntityLock {
            entity_id: entity_id.to_string(),
            user_id: user_id.to_string(),
            lock_type,
            acquired_time: Utc::now().timestamp(),
            // Locks never expire on their own; unlock is explicit
            expires_time: 0,
        };
        table.insert(entity_id.to_string(), lock_info.clone());

        info!(
            "Entity locked: {} (user: {}, type: {:?})",
            entity_id, user_id, lock_type
        );
        Ok(lock_info)
    }

    /// Only the holder may unlock; unlocking an absent lock is a silent
    /// success.
    pub async fn unlock_entity(
        &self,
        session_id: &str,
        user_id: &str,
        entity_id: &str,
    ) -> Result<(), ServiceError> {
        let locks = self.session_locks(session_id).await;
        let mut table = locks.write().await;

        if let Some(existing) = table.get(entity_id) {
            if existing.user_id != user_id {
                return Err(ServiceError::Conflict(format!(
                    "Only the lock holder may unlock entity '{}'",
                    entity_id
                )));
            }
            table.remove(entity_id);
            info!("Entity unlocked: {} (user: {})", entity_id, user_id);
        }
        Ok(())
    }

    /// All session locks when entity_ids is empty, else the matching subset.
    pub async fn get_entity_locks(
        &self,
        session_id: &str,
        entity_ids: &[String],
    ) -> Vec<EntityLock> {
        let locks = self.session_locks(session_id).await;
        let table = locks.read().await;

        if entity_ids.is_empty() {
            table.values().cloned().collect()
        } else {
            entity_ids
                .iter()
                .filter_map(|id| table.get(id).cloned())
                .collect()
        }
    }

    pub async fn entity_count(&self) -> usize {
        let mut count = 0;
        for store in self.entities.read().await.values() {
            count += store.read().await.len();
        }
        count
    }

    pub async fn lock_count(&self) -> usize {
        let mut count = 0;
        for table in self.locks.read().await.values() {
            count += table.read().await.len();
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PropertyValue, Transform};

    fn service() -> SceneDataService {
        SceneDataService::new(
            Arc::new(VersionCounter::new()),
            Arc::new(EventStreamService::new(1000)),
        )
    }

    fn entity(name: &str, entity_type: &str) -> SceneEntity {
        SceneEntity {
            entity_id: String::new(),
            name: name.to_string(),
            entity_type: entity_type.to_string(),
            transform: Transform::default(),
            parent_id: None,
            properties: HashMap::new(),
            metadata: Default::default(),
        }
    }

    #[tokio::test]
    async fn entity_lifecycle() {
        let svc = service();
        let (entity_id, version) = svc.create_entity("s1", "u1", entity("E1", "Mesh")).await;
        assert!(!entity_id.is_empty());
        assert_eq!(version, 1);

        let fetched = svc.get_entity("s1", &entity_id).await.unwrap();
        assert_eq!(fetched.name, "E1");
        assert_eq!(fetched.metadata.created_by, "u1");
        assert_eq!(fetched.metadata.version, 1);

        let delete_version = svc.delete_entity("s1", "u1", &entity_id).await.unwrap();
        assert!(delete_version > version);

        let err = svc.get_entity("s1", &entity_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let err = svc
            .update_entity("s1", "u1", svc_entity(&entity_id))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    fn svc_entity(entity_id: &str) -> SceneEntity {
        let mut e = entity("E1", "Mesh");
        e.entity_id = entity_id.to_string();
        e
    }

    #[tokio::test]
    async fn versions_strictly_increase_across_sessions() {
        let svc = service();
        let mut versions = Vec::new();
        for i in 0..4 {
            let session = if i % 2 == 0 { "a" } else { "b" };
            let (_, v) = svc.create_entity(session, "u1", entity("E", "Mesh")).await;
            versions.push(v);
        }
        for pair in versions.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[tokio::test]
    async fn update_replaces_record_wholesale() {
        let svc = service();
        let mut initial = entity("E1", "Mesh");
        initial
            .properties
            .insert("visible".to_string(), PropertyValue::Bool(true));
        let (entity_id, v1) = svc.create_entity("s1", "u1", initial).await;

        let mut replacement = entity("E1-renamed", "Mesh");
        replacement.entity_id = entity_id.clone();
        let v2 = svc.update_entity("s1", "u2", replacement).await.unwrap();
        assert!(v2 > v1);

        let fetched = svc.get_entity("s1", &entity_id).await.unwrap();
        assert_eq!(fetched.name, "E1-renamed");
        assert_eq!(fetched.metadata.modified_by, "u2");
        // Wholesale replace: the old property set is gone
        assert!(fetched.properties.is_empty());
    }

    #[tokio::test]
    async fn query_filters_are_conjunctive() {
        let svc = service();
        for i in 0..3 {
            svc.create_entity("s1", "u1", entity(&format!("M{}", i), "Mesh"))
                .await;
        }
        svc.create_entity("s1", "u1", entity("L0", "Light")).await;

        let query = EntityQuery {
            types: vec!["Mesh".to_string()],
            limit: 2,
            ..Default::default()
        };
        let (page, total) = svc.query_entities("s1", &query).await;
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|e| e.entity_type == "Mesh"));

        let (all, total) = svc.query_entities("s1", &EntityQuery::default()).await;
        assert_eq!(total, 4);
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn query_by_tags_and_parent() {
        let svc = service();
        let mut tagged = entity("T", "Mesh");
        tagged.metadata.tags.push("x".to_string());
        let (parent_id, _) = svc.create_entity("s1", "u1", entity("P", "Group")).await;
        tagged.parent_id = Some(parent_id.clone());
        svc.create_entity("s1", "u1", tagged).await;
        svc.create_entity("s1", "u1", entity("Other", "Mesh")).await;

        let query = EntityQuery {
            tags: vec!["x".to_string()],
            ..Default::default()
        };
        let (page, total) = svc.query_entities("s1", &query).await;
        assert_eq!(total, 1);
        assert_eq!(page[0].name, "T");

        let query = EntityQuery {
            parent_id: Some(parent_id),
            ..Default::default()
        };
        let (page, _) = svc.query_entities("s1", &query).await;
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "T");
    }

    #[tokio::test]
    async fn batch_failures_are_isolated() {
        let svc = service();
        let ops = vec![
            BatchOperation {
                operation_type: OperationType::Create,
                entity: entity("A", "Mesh"),
            },
            BatchOperation {
                operation_type: OperationType::Update,
                // Never created, so the update fails
                entity: svc_entity("missing"),
            },
        ];

        let (results, batch_version) = svc.batch_update("s1", "u1", ops).await;
        assert!(batch_version > 0);
        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(!results[1].error_message.is_empty());

        // A exists, the failed op left nothing behind
        assert!(svc.get_entity("s1", &results[0].entity_id).await.is_ok());
        assert!(svc.get_entity("s1", "missing").await.is_err());
    }

    #[tokio::test]
    async fn exclusive_lock_blocks_other_users() {
        let svc = service();
        svc.lock_entity("s1", "userA", "e1", LockType::Exclusive)
            .await
            .unwrap();

        let err = svc
            .lock_entity("s1", "userB", "e1", LockType::Exclusive)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Re-entrant for the holder
        let lock = svc
            .lock_entity("s1", "userA", "e1", LockType::Exclusive)
            .await
            .unwrap();
        assert_eq!(lock.user_id, "userA");
    }

    #[tokio::test]
    async fn unlock_requires_holder_then_frees() {
        let svc = service();
        svc.lock_entity("s1", "userA", "e1", LockType::Exclusive)
            .await
            .unwrap();

        let err = svc.unlock_entity("s1", "userB", "e1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        svc.unlock_entity("s1", "userA", "e1").await.unwrap();
        // Unlocking again is a silent success
        svc.unlock_entity("s1", "userA", "e1").await.unwrap();

        svc.lock_entity("s1", "userB", "e1", LockType::Shared)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn lock_listing_supports_subset() {
        let svc = service();
        svc.lock_entity("s1", "u1", "e1", LockType::Exclusive)
            .await
            .unwrap();
        svc.lock_entity("s1", "u2", "e2", LockType::Shared)
            .await
            .unwrap();

        let all = svc.get_entity_locks("s1", &[]).await;
        assert_eq!(all.len(), 2);

        let subset = svc
            .get_entity_locks("s1", &["e2".to_string(), "ghost".to_string()])
            .await;
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].user_id, "u2");
    }

    #[tokio::test]
    async fn scene_data_lazily_created_and_replaced() {
        let svc = service();
        let scene = svc.get_scene_data("s1", None).await;
        assert_eq!(scene.scene_id, "default");
        assert_eq!(scene.name, "Scene_default");
        assert_eq!(scene.version, 1);
        assert_eq!(scene.metadata.created_by, "system");
        assert!(scene.entities.is_empty());

        // Entities created afterwards show up in a fresh snapshot
        svc.create_entity("s1", "u1", entity("E1", "Mesh")).await;
        let scene = svc.get_scene_data("s1", None).await;
        assert_eq!(scene.entities.len(), 1);

        // Wholesale replace drops the previous entity set
        let mut replacement = svc.get_scene_data("s1", None).await;
        let mut incoming = entity("New", "Light");
        incoming.entity_id = "fixed-id".to_string();
        replacement.entities = vec![incoming];
        let version = svc.update_scene_data("s1", "u2", replacement).await;
        assert!(version > 1);

        let scene = svc.get_scene_data("s1", None).await;
        assert_eq!(scene.entities.len(), 1);
        assert_eq!(scene.entities[0].entity_id, "fixed-id");
        assert_eq!(scene.metadata.modified_by, "u2");
    }

    #[tokio::test]
    async fn mutations_publish_change_events() {
        let versions = Arc::new(VersionCounter::new());
        let events = Arc::new(EventStreamService::new(1000));
        let svc = SceneDataService::new(versions, events.clone());

        let (_sub, mut rx) = events.subscribe("s1", "watcher", Vec::new(), None).await;

        let (entity_id, _) = svc.create_entity("s1", "u1", entity("E1", "Mesh")).await;
        let added = rx.recv().await.unwrap();
        assert_eq!(added.change_type, SceneChangeType::EntityAdded);
        assert_eq!(added.entity_id, entity_id);
        assert_eq!(added.entity_type, "Mesh");
        assert_eq!(added.user_id, "u1");

        svc.delete_entity("s1", "u1", &entity_id).await.unwrap();
        let removed = rx.recv().await.unwrap();
        assert_eq!(removed.change_type, SceneChangeType::EntityRemoved);
        assert_eq!(removed.entity_id, entity_id);
    }
}
