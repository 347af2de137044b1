use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row read from a source table: column name -> scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    pub data: HashMap<String, serde_json::Value>,
}

impl SourceRow {
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.data.get(column).and_then(|v| v.as_str())
    }
}

/// One item destined for the document store: field name -> scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDocument {
    pub fields: HashMap<String, serde_json::Value>,
}

impl TargetDocument {
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct TableCount {
    pub table: String,
    pub migrated: usize,
}

/// Per-table counts for one successful migration run.
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    pub tables: Vec<TableCount>,
}

impl MigrationReport {
    pub fn total(&self) -> usize {
        self.tables.iter().map(|t| t.migrated).sum()
    }
}
