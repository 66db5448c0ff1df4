// src/entity/log.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Created,
    Updated,
    Deleted,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Created => write!(f, "CREATED"),
            ChangeType::Updated => write!(f, "UPDATED"),
            ChangeType::Deleted => write!(f, "DELETED"),
        }
    }
}

impl std::str::FromStr for ChangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATED" => Ok(ChangeType::Created),
            "UPDATED" => Ok(ChangeType::Updated),
            "DELETED" => Ok(ChangeType::Deleted),
            _ => Err(format!("Invalid change type: {}", s)),
        }
    }
}

/// One immutable audit record per lifecycle event.
///
/// Entries are append-only: never mutated, never deleted, and they outlive
/// the soft-deletion of the order they describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLog {
    pub id: Uuid,
    pub order_id: Uuid,
    pub change_type: ChangeType,
    pub changed_by: Option<String>,
    pub changed_at: DateTime<Utc>,
    /// Full field snapshot before the change; None for CREATED
    pub old_values: Option<Map<String, Value>>,
    /// Full field snapshot after the change
    pub new_values: Map<String, Value>,
}
