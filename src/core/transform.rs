use crate::domain::model::{SourceRow, TargetDocument};
use crate::domain::ports::Transform;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Maps a `contacts` row to a `migracle-contacts` item. Every item gets a
/// freshly generated id, independent of any source identifier.
pub struct ContactTransform;

/// Maps a `subscribers` row to a `migracle-subscribers` item. The email is
/// the item's key; no separate id is generated.
pub struct SubscriberTransform;

impl Transform for ContactTransform {
    fn apply(&self, row: &SourceRow) -> TargetDocument {
        let mut fields = HashMap::new();
        fields.insert(
            "id".to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );
        fields.insert("name".to_string(), copied(row, "name"));
        fields.insert("email".to_string(), copied(row, "email"));
        fields.insert("message".to_string(), copied(row, "message"));
        fields.insert("created_at".to_string(), created_at_or_now(row));
        TargetDocument { fields }
    }
}

impl Transform for SubscriberTransform {
    fn apply(&self, row: &SourceRow) -> TargetDocument {
        let mut fields = HashMap::new();
        fields.insert("email".to_string(), copied(row, "email"));
        fields.insert("created_at".to_string(), created_at_or_now(row));
        TargetDocument { fields }
    }
}

fn copied(row: &SourceRow, column: &str) -> Value {
    row.data.get(column).cloned().unwrap_or(Value::Null)
}

/// Source value if present and non-empty, else the current time.
fn created_at_or_now(row: &SourceRow) -> Value {
    match row.data.get("created_at") {
        Some(Value::String(s)) if !s.is_empty() => Value::String(s.clone()),
        _ => Value::String(Utc::now().to_rfc3339()),
    }
}
