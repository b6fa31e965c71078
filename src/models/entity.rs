use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Vector3 {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }
}

impl Vector3 {
    pub fn one() -> Self {
        Self { x: 1.0, y: 1.0, z: 1.0 }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        // Identity rotation
        Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct Transform {
    #[serde(default)]
    pub position: Vector3,
    #[serde(default)]
    pub rotation: Quaternion,
    #[serde(default = "Vector3::one")]
    pub scale: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::default(),
            rotation: Quaternion::default(),
            scale: Vector3::one(),
        }
    }
}

/// Typed value of an arbitrary entity property
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct EntityMetadata {
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub modified_by: String,
    #[serde(default)]
    pub modified_time: i64,
    /// Assigned from the process-wide version counter on every mutation
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The unit of shared scene data: a named object with a transform and
/// arbitrary typed properties.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SceneEntity {
    /// Server-generated UUID when left empty on creation
    #[serde(default)]
    pub entity_id: String,
    pub name: String,
    /// Free-form type name, e.g. "Mesh", "Light"
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
    #[serde(default)]
    pub metadata: EntityMetadata,
}
