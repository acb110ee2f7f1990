//! Board persisted as a single JSON file.
//!
//! The file is loaded once into an [`InMemoryDatabase`]. Each write is applied
//! to a staged copy of the board, persisted, and only then published, so a
//! failed disk write leaves both the file and the served state untouched.
//! Single-process only: another process editing the file concurrently will
//! be overwritten.

use crate::storage::memory::{BoardSnapshot, InMemoryDatabase};
use async_trait::async_trait;
use board_application::ports::database::{DatabaseError, DatabaseOperations, NewDocument};
use board_domain::{Comment, Document, Persona, Ticket, TicketState};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct JsonFileDatabase {
    path: PathBuf,
    inner: InMemoryDatabase,
    /// Serializes stage, persist and publish
    write_lock: Mutex<()>,
}

impl JsonFileDatabase {
    /// Open a board file, starting empty when it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let path = path.into();
        let snapshot = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<BoardSnapshot>(&content).map_err(|e| {
                DatabaseError::Backend(format!("invalid board file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Board file not found, starting empty");
                BoardSnapshot::default()
            }
            Err(e) => {
                return Err(DatabaseError::Backend(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        debug!(
            path = %path.display(),
            tickets = snapshot.tickets.len(),
            "Loaded board"
        );

        Ok(Self {
            path,
            inner: InMemoryDatabase::from_snapshot(snapshot),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &InMemoryDatabase {
        &self.inner
    }

    /// Copy of the current board for a write to run against.
    async fn stage(&self) -> InMemoryDatabase {
        InMemoryDatabase::from_snapshot(self.inner.snapshot().await)
    }

    /// Persist a staged board, then make it the served one.
    async fn commit(&self, staged: InMemoryDatabase) -> Result<(), DatabaseError> {
        let snapshot = staged.snapshot().await;
        self.persist(&snapshot).await?;
        self.inner.restore(snapshot).await;
        Ok(())
    }

    async fn persist(&self, snapshot: &BoardSnapshot) -> Result<(), DatabaseError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| DatabaseError::Backend(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DatabaseError::Backend(e.to_string()))?;
        }

        // Write-then-rename so a crash never leaves a truncated board.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| DatabaseError::Backend(format!("{}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DatabaseError::Backend(format!("{}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl DatabaseOperations for JsonFileDatabase {
    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, DatabaseError> {
        self.inner.get_ticket(id).await
    }

    async fn update_ticket_state(
        &self,
        id: &str,
        expected: TicketState,
        new: TicketState,
    ) -> Result<Ticket, DatabaseError> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage().await;
        let ticket = staged.update_ticket_state(id, expected, new).await?;
        self.commit(staged).await?;
        Ok(ticket)
    }

    async fn create_comment(
        &self,
        ticket_id: &str,
        persona_id: &str,
        content: &str,
    ) -> Result<Comment, DatabaseError> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage().await;
        let comment = staged.create_comment(ticket_id, persona_id, content).await?;
        self.commit(staged).await?;
        Ok(comment)
    }

    async fn get_persona(&self, id: &str) -> Result<Option<Persona>, DatabaseError> {
        self.inner.get_persona(id).await
    }

    async fn save_document(&self, document: NewDocument) -> Result<Document, DatabaseError> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage().await;
        let saved = staged.save_document(document).await?;
        self.commit(staged).await?;
        Ok(saved)
    }
}
