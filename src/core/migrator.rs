use crate::core::batch::BatchWriter;
use crate::core::transform::{ContactTransform, SubscriberTransform};
use crate::domain::model::{MigrationReport, TableCount};
use crate::domain::ports::{Destination, RowSource, Transform};
use crate::utils::error::Result;

/// One source table -> destination table mapping with its field policy.
pub struct TablePipeline {
    pub source_table: String,
    pub destination_table: String,
    pub transform: Box<dyn Transform>,
}

impl TablePipeline {
    pub fn new(
        source_table: impl Into<String>,
        destination_table: impl Into<String>,
        transform: impl Transform + 'static,
    ) -> Self {
        Self {
            source_table: source_table.into(),
            destination_table: destination_table.into(),
            transform: Box::new(transform),
        }
    }
}

/// The reference pipeline order: contacts first, then subscribers.
pub fn default_pipelines() -> Vec<TablePipeline> {
    vec![
        TablePipeline::new("contacts", "migracle-contacts", ContactTransform),
        TablePipeline::new("subscribers", "migracle-subscribers", SubscriberTransform),
    ]
}

/// Drives the configured pipelines in order, one at a time, and aggregates
/// per-table counts. The first pipeline error aborts the run; remaining
/// pipelines are skipped. The source connection is closed on every exit
/// path, and a close failure is logged without changing the outcome.
pub struct Migrator<S: RowSource, D: Destination> {
    source: S,
    destination: D,
    pipelines: Vec<TablePipeline>,
}

impl<S: RowSource, D: Destination> Migrator<S, D> {
    pub fn new(source: S, destination: D) -> Self {
        Self::with_pipelines(source, destination, default_pipelines())
    }

    pub fn with_pipelines(source: S, destination: D, pipelines: Vec<TablePipeline>) -> Self {
        Self {
            source,
            destination,
            pipelines,
        }
    }

    pub async fn run(self) -> Result<MigrationReport> {
        let Self {
            source,
            destination,
            pipelines,
        } = self;

        let result = Self::run_pipelines(&source, &destination, &pipelines).await;

        match source.close() {
            Ok(()) => tracing::info!("SQLite database connection closed"),
            Err(e) => tracing::warn!("{e}"),
        }

        result
    }

    async fn run_pipelines(
        source: &S,
        destination: &D,
        pipelines: &[TablePipeline],
    ) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        for pipeline in pipelines {
            tracing::info!(table = %pipeline.source_table, "Starting migration");
            let migrated = Self::run_pipeline(source, destination, pipeline)
                .await
                .inspect_err(|e| {
                    tracing::error!(table = %pipeline.source_table, "Migration failed: {e}")
                })?;
            tracing::info!(
                table = %pipeline.source_table,
                migrated,
                "Successfully migrated table"
            );
            report.tables.push(TableCount {
                table: pipeline.source_table.clone(),
                migrated,
            });
        }

        Ok(report)
    }

    async fn run_pipeline(
        source: &S,
        destination: &D,
        pipeline: &TablePipeline,
    ) -> Result<usize> {
        let mut rows = source.stream(&pipeline.source_table);
        let mut writer = BatchWriter::new(destination, pipeline.destination_table.as_str());

        while let Some(row) = rows.recv().await {
            let row = row?;
            writer.push(pipeline.transform.apply(&row)).await?;
        }

        writer.finish().await
    }
}
