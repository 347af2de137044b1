use crate::domain::model::TargetDocument;
use crate::domain::ports::Destination;
use crate::utils::error::Result;

/// DynamoDB's BatchWriteItem limit: at most 25 put requests per call.
pub const MAX_BATCH_SIZE: usize = 25;

/// Accumulates documents into ordered chunks of at most 25 and flushes each
/// chunk with one bulk call. Flushes are strictly sequential: a chunk is
/// awaited before the next one starts accumulating, so the last logged batch
/// index tells exactly how much data landed.
pub struct BatchWriter<'a, D: Destination + ?Sized> {
    destination: &'a D,
    table: String,
    buffer: Vec<TargetDocument>,
    batches_flushed: usize,
    written: usize,
}

impl<'a, D: Destination + ?Sized> BatchWriter<'a, D> {
    pub fn new(destination: &'a D, table: impl Into<String>) -> Self {
        Self {
            destination,
            table: table.into(),
            buffer: Vec::with_capacity(MAX_BATCH_SIZE),
            batches_flushed: 0,
            written: 0,
        }
    }

    pub async fn push(&mut self, doc: TargetDocument) -> Result<()> {
        self.buffer.push(doc);
        if self.buffer.len() == MAX_BATCH_SIZE {
            self.flush().await?;
        }
        Ok(())
    }

    /// Flushes the final partial chunk, if any, and returns the total count
    /// written. On failure the error carries the failing batch index; chunks
    /// flushed before it stay persisted in the destination.
    pub async fn finish(mut self) -> Result<usize> {
        if !self.buffer.is_empty() {
            self.flush().await?;
        }
        Ok(self.written)
    }

    async fn flush(&mut self) -> Result<()> {
        let chunk = std::mem::replace(&mut self.buffer, Vec::with_capacity(MAX_BATCH_SIZE));
        let batch = self.batches_flushed + 1;

        self.destination
            .batch_put(&self.table, batch, &chunk)
            .await?;

        self.batches_flushed = batch;
        self.written += chunk.len();
        tracing::info!(
            table = %self.table,
            batch,
            size = chunk.len(),
            "Migrated batch"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Destination;
    use crate::utils::error::MigrateError;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockDestination {
        batches: Arc<Mutex<Vec<(String, usize, usize)>>>,
        fail_on_batch: Option<usize>,
    }

    impl MockDestination {
        fn failing_on(batch: usize) -> Self {
            Self {
                fail_on_batch: Some(batch),
                ..Default::default()
            }
        }

        async fn recorded(&self) -> Vec<(String, usize, usize)> {
            self.batches.lock().await.clone()
        }
    }

    #[async_trait]
    impl Destination for MockDestination {
        async fn batch_put(
            &self,
            table: &str,
            batch: usize,
            items: &[TargetDocument],
        ) -> Result<()> {
            if self.fail_on_batch == Some(batch) {
                return Err(MigrateError::DestinationWrite {
                    table: table.to_string(),
                    batch,
                    message: "simulated network error".to_string(),
                });
            }
            self.batches
                .lock()
                .await
                .push((table.to_string(), batch, items.len()));
            Ok(())
        }
    }

    fn doc(n: usize) -> TargetDocument {
        let mut fields = HashMap::new();
        fields.insert("id".to_string(), Value::String(n.to_string()));
        TargetDocument { fields }
    }

    #[tokio::test]
    async fn test_thirty_documents_make_two_batches() {
        let dest = MockDestination::default();
        let mut writer = BatchWriter::new(&dest, "migracle-contacts");

        for n in 0..30 {
            writer.push(doc(n)).await.unwrap();
        }
        let written = writer.finish().await.unwrap();

        assert_eq!(written, 30);
        assert_eq!(
            dest.recorded().await,
            vec![
                ("migracle-contacts".to_string(), 1, 25),
                ("migracle-contacts".to_string(), 2, 5),
            ]
        );
    }

    #[tokio::test]
    async fn test_exactly_twenty_five_documents_make_one_batch() {
        let dest = MockDestination::default();
        let mut writer = BatchWriter::new(&dest, "migracle-subscribers");

        for n in 0..25 {
            writer.push(doc(n)).await.unwrap();
        }
        let written = writer.finish().await.unwrap();

        assert_eq!(written, 25);
        assert_eq!(
            dest.recorded().await,
            vec![("migracle-subscribers".to_string(), 1, 25)]
        );
    }

    #[tokio::test]
    async fn test_batch_count_is_ceil_of_rows_over_25() {
        for rows in [1usize, 24, 26, 50, 51, 100] {
            let dest = MockDestination::default();
            let mut writer = BatchWriter::new(&dest, "t");
            for n in 0..rows {
                writer.push(doc(n)).await.unwrap();
            }
            assert_eq!(writer.finish().await.unwrap(), rows);

            let recorded = dest.recorded().await;
            assert_eq!(recorded.len(), rows.div_ceil(25));
            assert_eq!(recorded.iter().map(|(_, _, size)| size).sum::<usize>(), rows);
        }
    }

    #[tokio::test]
    async fn test_no_documents_make_no_batches() {
        let dest = MockDestination::default();
        let writer = BatchWriter::new(&dest, "t");

        assert_eq!(writer.finish().await.unwrap(), 0);
        assert!(dest.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn test_second_batch_failure_loses_unflushed_count() {
        let dest = MockDestination::failing_on(2);
        let mut writer = BatchWriter::new(&dest, "migracle-contacts");

        let mut result = Ok(());
        for n in 0..30 {
            result = writer.push(doc(n)).await;
            if result.is_err() {
                break;
            }
        }
        // 30 documents fit the buffer without tripping the failure until the
        // final flush.
        result.unwrap();
        let err = writer.finish().await.unwrap_err();

        assert!(matches!(
            err,
            MigrateError::DestinationWrite { batch: 2, .. }
        ));
        // Chunk 1 is persisted in the destination even though no count was
        // reported for the table.
        assert_eq!(
            dest.recorded().await,
            vec![("migracle-contacts".to_string(), 1, 25)]
        );
    }

    #[tokio::test]
    async fn test_failure_on_full_chunk_surfaces_from_push() {
        let dest = MockDestination::failing_on(1);
        let mut writer = BatchWriter::new(&dest, "t");

        for n in 0..24 {
            writer.push(doc(n)).await.unwrap();
        }
        let err = writer.push(doc(24)).await.unwrap_err();
        assert!(matches!(
            err,
            MigrateError::DestinationWrite { batch: 1, .. }
        ));
    }
}
