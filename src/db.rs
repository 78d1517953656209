//! SQLite persistence for conversation state and context data

mod schema;

use schema::SCHEMA;

use crate::store::{ConversationStore, StoreError};
use crate::view::{ConversationId, StateId};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub type DbResult<T> = Result<T, StoreError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn get_state(&self, conversation_id: &str) -> DbResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let state: Option<Option<String>> = conn
            .query_row(
                "SELECT state FROM conversation_state WHERE conversation_id = ?1",
                params![conversation_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(state.flatten())
    }

    pub fn set_state(&self, conversation_id: &str, state: Option<&str>) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO conversation_state (conversation_id, state, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(conversation_id) DO UPDATE SET state = ?2, updated_at = ?3",
            params![conversation_id, state, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get_data(&self, conversation_id: &str) -> DbResult<HashMap<String, Value>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT key, value FROM conversation_data WHERE conversation_id = ?1 ORDER BY key",
        )?;
        let rows = stmt.query_map(params![conversation_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut data = HashMap::new();
        for row in rows {
            let (key, raw) = row?;
            data.insert(key, serde_json::from_str(&raw)?);
        }
        Ok(data)
    }

    pub fn set_data(&self, conversation_id: &str, key: &str, value: &Value) -> DbResult<()> {
        let raw = serde_json::to_string(value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO conversation_data (conversation_id, key, value, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(conversation_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
            params![conversation_id, key, raw, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Remove everything stored for a conversation
    pub fn forget(&self, conversation_id: &str) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM conversation_data WHERE conversation_id = ?1",
            params![conversation_id],
        )?;
        conn.execute(
            "DELETE FROM conversation_state WHERE conversation_id = ?1",
            params![conversation_id],
        )?;
        Ok(())
    }
}

/// Adapter to use Database as a [`ConversationStore`]
#[derive(Clone)]
pub struct DatabaseStore {
    db: Database,
}

impl DatabaseStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ConversationStore for DatabaseStore {
    async fn get_state(&self, conversation: &ConversationId) -> Result<Option<StateId>, StoreError> {
        Ok(self.db.get_state(conversation.as_str())?.map(StateId::from))
    }

    async fn set_state(
        &self,
        conversation: &ConversationId,
        state: Option<&StateId>,
    ) -> Result<(), StoreError> {
        self.db
            .set_state(conversation.as_str(), state.map(StateId::as_str))
    }

    async fn get_data(
        &self,
        conversation: &ConversationId,
    ) -> Result<HashMap<String, Value>, StoreError> {
        self.db.get_data(conversation.as_str())
    }

    async fn set_data(
        &self,
        conversation: &ConversationId,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        self.db.set_data(conversation.as_str(), key, &value)
    }
}
