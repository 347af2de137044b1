use crate::domain::model::TargetDocument;
use crate::domain::ports::Destination;
use crate::utils::error::{MigrateError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use std::time::Duration;

/// DynamoDB destination: one `BatchWriteItem` call per chunk, full table
/// name addressing, per-item put.
#[derive(Debug, Clone)]
pub struct DynamoDestination {
    client: Client,
    batch_timeout: Option<Duration>,
}

impl DynamoDestination {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            batch_timeout: None,
        }
    }

    /// Optional deadline per bulk write. Unset means an unresponsive call
    /// blocks the run indefinitely.
    pub fn with_batch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.batch_timeout = timeout;
        self
    }
}

#[async_trait]
impl Destination for DynamoDestination {
    async fn batch_put(&self, table: &str, batch: usize, items: &[TargetDocument]) -> Result<()> {
        let mut requests = Vec::with_capacity(items.len());
        for doc in items {
            let put = PutRequest::builder()
                .set_item(Some(to_item(doc)))
                .build()
                .map_err(|e| write_error(table, batch, e))?;
            requests.push(WriteRequest::builder().put_request(put).build());
        }

        let call = self
            .client
            .batch_write_item()
            .set_request_items(Some(HashMap::from([(table.to_string(), requests)])))
            .send();

        let output = match self.batch_timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(|_| write_error(table, batch, "bulk write timed out"))?,
            None => call.await,
        }
        .map_err(|e| write_error(table, batch, DisplayErrorContext(&e)))?;

        // No retry policy: items the service hands back unprocessed fail the
        // chunk instead of being dropped silently.
        if let Some(unprocessed) = output.unprocessed_items() {
            let count: usize = unprocessed.values().map(Vec::len).sum();
            if count > 0 {
                return Err(write_error(
                    table,
                    batch,
                    format!("{count} items were returned unprocessed"),
                ));
            }
        }

        Ok(())
    }
}

fn to_item(doc: &TargetDocument) -> HashMap<String, AttributeValue> {
    doc.fields
        .iter()
        .map(|(name, value)| (name.clone(), to_attribute_value(value)))
        .collect()
}

fn to_attribute_value(value: &serde_json::Value) -> AttributeValue {
    match value {
        serde_json::Value::Null => AttributeValue::Null(true),
        serde_json::Value::Bool(b) => AttributeValue::Bool(*b),
        serde_json::Value::Number(n) => AttributeValue::N(n.to_string()),
        serde_json::Value::String(s) => AttributeValue::S(s.clone()),
        other => AttributeValue::S(other.to_string()),
    }
}

fn write_error(table: &str, batch: usize, message: impl ToString) -> MigrateError {
    MigrateError::DestinationWrite {
        table: table.to_string(),
        batch,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_scalar_attribute_values() {
        assert_eq!(
            to_attribute_value(&json!("alice@example.com")),
            AttributeValue::S("alice@example.com".to_string())
        );
        assert_eq!(to_attribute_value(&json!(42)), AttributeValue::N("42".to_string()));
        assert_eq!(to_attribute_value(&json!(true)), AttributeValue::Bool(true));
        assert_eq!(to_attribute_value(&Value::Null), AttributeValue::Null(true));
    }

    #[test]
    fn test_to_item_maps_every_field() {
        let mut fields = HashMap::new();
        fields.insert("id".to_string(), json!("abc-123"));
        fields.insert("created_at".to_string(), json!("2024-01-01T00:00:00Z"));
        fields.insert("name".to_string(), Value::Null);

        let item = to_item(&TargetDocument { fields });

        assert_eq!(item.len(), 3);
        assert_eq!(item.get("id"), Some(&AttributeValue::S("abc-123".to_string())));
        assert_eq!(item.get("name"), Some(&AttributeValue::Null(true)));
    }
}
