pub mod batch;
pub mod migrator;
pub mod source;
pub mod transform;

pub use crate::domain::model::{MigrationReport, SourceRow, TargetDocument};
pub use crate::domain::ports::{Destination, RowSource, Transform};
pub use crate::utils::error::Result;
