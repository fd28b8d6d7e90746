//! Connection bootstrap for a registered model.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Apply connection pragmas from `DbOptions`.
//! - Create every mapped table before handing the connection out.
//!
//! # Invariants
//! - A `DbContext` only exists once all mapped tables exist.
//! - Table creation is all-or-nothing.

use super::model_builder::Model;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Connection settings applied on open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbOptions {
    /// Enforce `REFERENCES` constraints (`PRAGMA foreign_keys`).
    pub foreign_keys: bool,
    pub busy_timeout_ms: u64,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            foreign_keys: true,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Open connection with the registered model applied.
#[derive(Debug)]
pub struct DbContext {
    conn: Connection,
    model: Model,
}

impl DbContext {
    /// Opens a SQLite database file and creates all mapped tables.
    ///
    /// # Side effects
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>, model: Model, options: &DbOptions) -> DbResult<Self> {
        Self::open_with("file", || Connection::open(path), model, options)
    }

    /// Opens an in-memory SQLite database and creates all mapped tables.
    pub fn open_in_memory(model: Model, options: &DbOptions) -> DbResult<Self> {
        Self::open_with("memory", Connection::open_in_memory, model, options)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Releases the context and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    fn open_with(
        mode: &str,
        connect: impl FnOnce() -> rusqlite::Result<Connection>,
        model: Model,
        options: &DbOptions,
    ) -> DbResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=db_open module=db status=start mode={mode} tables={}",
            model.tables().len()
        );

        let mut conn = match connect() {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        match bootstrap_connection(&mut conn, &model, options) {
            Ok(()) => {
                info!(
                    "event=db_open module=db status=ok mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self { conn, model })
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

fn bootstrap_connection(
    conn: &mut Connection,
    model: &Model,
    options: &DbOptions,
) -> rusqlite::Result<()> {
    let foreign_keys = if options.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"))?;
    conn.busy_timeout(Duration::from_millis(options.busy_timeout_ms))?;

    let tx = conn.transaction()?;
    for ddl in model.create_table_sql() {
        tx.execute_batch(&ddl)?;
    }
    tx.commit()
}
