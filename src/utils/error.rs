use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Error connecting to SQLite database: {0}")]
    Connect(String),

    #[error("Error reading {table}: {message}")]
    SourceRead { table: String, message: String },

    #[error("Error writing batch {batch} of {table}: {message}")]
    DestinationWrite {
        table: String,
        batch: usize,
        message: String,
    },

    #[error("Error closing SQLite database: {0}")]
    Close(String),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, MigrateError>;
