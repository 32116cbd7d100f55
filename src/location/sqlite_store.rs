//! SQLite-backed history store.
//!
//! `rusqlite` connections are not `Sync`, so the connection lives on a
//! dedicated worker thread and callers hand it closures over an mpsc
//! channel, getting results back through a oneshot. The history itself is
//! still the one JSON blob from `store.rs`, held in a key-value table; the
//! database adds durability and atomic replacement, not schema.

use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::oneshot;

use crate::location::store::HistoryStore;
use crate::models::LocationRecord;

const HISTORY_KEY: &str = "locationHistory";

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct StoreInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to history DB thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join history DB thread: {join_err:?}");
            }
        }
    }
}

#[derive(Clone)]
pub struct SqliteHistoryStore {
    inner: Arc<StoreInner>,
    db_path: Arc<PathBuf>,
}

impl SqliteHistoryStore {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("moodpulse-history-db".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open SQLite database")));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }

                let init_result = conn
                    .execute(
                        "CREATE TABLE IF NOT EXISTS kv_store (
                             key TEXT PRIMARY KEY,
                             value BLOB NOT NULL
                         )",
                        [],
                    )
                    .map(|_| ())
                    .context("failed to create kv_store table");
                if ready_tx.send(init_result).is_err() {
                    error!("History DB initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => {
                            task(&mut conn);
                        }
                        DbCommand::Shutdown => break,
                    }
                }

                info!("History database thread shutting down");
            })
            .with_context(|| "failed to spawn history database worker thread")?;

        ready_rx
            .recv()
            .context("history database worker exited before signaling readiness")??;

        info!("History database initialized at {}", db_path.display());

        Ok(Self {
            inner: Arc::new(StoreInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("History DB caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to history DB thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("history database thread terminated unexpectedly"))?
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn load(&self) -> Result<Vec<LocationRecord>> {
        self.execute(|conn| {
            let blob: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![HISTORY_KEY],
                    |row| row.get(0),
                )
                .optional()
                .context("failed to read history blob")?;

            match blob {
                Some(bytes) => {
                    serde_json::from_slice(&bytes).context("invalid history blob in database")
                }
                None => Ok(Vec::new()),
            }
        })
        .await
    }

    async fn save(&self, history: &[LocationRecord]) -> Result<()> {
        let blob = serde_json::to_vec(history)?;
        self.execute(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2)",
                params![HISTORY_KEY, blob],
            )
            .context("failed to write history blob")?;
            Ok(())
        })
        .await
    }
}
