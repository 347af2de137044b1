use crate::domain::model::SourceRow;
use crate::domain::ports::RowSource;
use crate::utils::error::{MigrateError, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

const ROW_CHANNEL_CAPACITY: usize = 64;

/// Row source backed by a file-based SQLite database.
///
/// The connection is opened once and owned here; per-table reads run on the
/// blocking thread pool and feed a bounded channel, so the consumer sees a
/// lazy stream in the engine's natural enumeration order.
pub struct SqliteSource {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        // The source is read-only for the whole run.
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| MigrateError::Connect(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl RowSource for SqliteSource {
    fn stream(&self, table: &str) -> mpsc::Receiver<Result<SourceRow>> {
        let (tx, rx) = mpsc::channel(ROW_CHANNEL_CAPACITY);
        let conn = Arc::clone(&self.conn);
        let table = table.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(|e| e.into_inner());
            if let Err(e) = read_rows(&conn, &table, &tx) {
                // In-band error; the receiver aborts the pipeline on it.
                let _ = tx.blocking_send(Err(e));
            }
        });

        rx
    }

    fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().unwrap_or_else(|e| e.into_inner());
                conn.close()
                    .map_err(|(_, e)| MigrateError::Close(e.to_string()))
            }
            // A reader task still holds the handle (aborted pipeline); the
            // connection is dropped when that task finishes.
            Err(_) => Ok(()),
        }
    }
}

fn read_rows(conn: &Connection, table: &str, tx: &mpsc::Sender<Result<SourceRow>>) -> Result<()> {
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {table}"))
        .map_err(|e| source_read(table, e))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = stmt.query([]).map_err(|e| source_read(table, e))?;
    loop {
        match rows.next() {
            Ok(Some(row)) => {
                let mut data = HashMap::with_capacity(columns.len());
                for (i, name) in columns.iter().enumerate() {
                    let value = match row.get_ref(i).map_err(|e| source_read(table, e))? {
                        ValueRef::Null => serde_json::Value::Null,
                        ValueRef::Integer(n) => serde_json::Value::from(n),
                        ValueRef::Real(f) => serde_json::Value::from(f),
                        ValueRef::Text(t) => {
                            serde_json::Value::String(String::from_utf8_lossy(t).into_owned())
                        }
                        ValueRef::Blob(b) => {
                            serde_json::Value::String(String::from_utf8_lossy(b).into_owned())
                        }
                    };
                    data.insert(name.clone(), value);
                }
                if tx.blocking_send(Ok(SourceRow { data })).is_err() {
                    // Receiver dropped; stop reading.
                    return Ok(());
                }
            }
            Ok(None) => return Ok(()),
            Err(e) => return Err(source_read(table, e)),
        }
    }
}

fn source_read(table: &str, e: rusqlite::Error) -> MigrateError {
    MigrateError::SourceRead {
        table: table.to_string(),
        message: e.to_string(),
    }
}
