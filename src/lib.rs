pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::dynamo::DynamoDestination;
pub use crate::config::MigrateConfig;
pub use crate::core::migrator::{default_pipelines, Migrator, TablePipeline};
pub use crate::core::source::SqliteSource;
pub use crate::core::transform::{ContactTransform, SubscriberTransform};
pub use crate::utils::error::{MigrateError, Result};
