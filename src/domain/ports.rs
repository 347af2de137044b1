use crate::domain::model::{SourceRow, TargetDocument};
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Streams rows out of one relational source table.
///
/// The sequence is lazy, finite and non-restartable; the channel closing is
/// the end-of-rows signal, and a read failure arrives in-band as an `Err`
/// item after which no further rows are produced.
pub trait RowSource: Send + Sync {
    fn stream(&self, table: &str) -> mpsc::Receiver<Result<SourceRow>>;

    /// Releases the underlying connection. Called once, on every exit path.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Per-table field-mapping policy. Pure: one document per row, the input
/// row is never mutated.
pub trait Transform: Send + Sync {
    fn apply(&self, row: &SourceRow) -> TargetDocument;
}

/// Bulk-write sink for transformed documents.
#[async_trait]
pub trait Destination: Send + Sync {
    /// Writes one chunk of at most 25 documents in a single bulk call.
    /// `batch` is the 1-based chunk index within the current table, carried
    /// so failures can be attributed to an exact chunk.
    async fn batch_put(&self, table: &str, batch: usize, items: &[TargetDocument]) -> Result<()>;
}
