use super::{DocumentStore, Filter, Result, StoreError};
use common::model::document::Document;
use log::debug;
use rusqlite::{params, Connection, ErrorCode};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// A `DocumentStore` backed by a single SQLite database.
///
/// Each collection is a table `(id TEXT PRIMARY KEY, body TEXT NOT NULL)` holding the
/// document serialized as JSON. Tables are created on first use. The connection sits
/// behind a mutex, so every trait call runs alone against the database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`. `":memory:"` gives a private
    /// in-memory database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self::with_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::with_connection(conn))
    }

    pub fn with_connection(conn: Connection) -> Self {
        SqliteStore {
            conn: Mutex::new(conn),
        }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn ensure_collection(conn: &Connection, collection: &str) -> Result<()> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(StoreError::InvalidCollection(collection.to_string()));
    }

    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, body TEXT NOT NULL)",
            collection
        ),
        [],
    )?;
    Ok(())
}

/// Loads the documents of `collection` that match `filter`, in insertion order.
fn load(conn: &Connection, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
    ensure_collection(conn, collection)?;

    let bodies: Vec<String> = match filter {
        Filter::Id(id) => {
            let mut stmt =
                conn.prepare(&format!("SELECT body FROM {} WHERE id = ?1", collection))?;
            let rows = stmt.query_map(params![id], |row| row.get(0))?;
            let bodies = rows.collect::<std::result::Result<Vec<String>, _>>()?;
            bodies
        }
        Filter::All | Filter::Eq(..) => {
            let mut stmt =
                conn.prepare(&format!("SELECT body FROM {} ORDER BY rowid", collection))?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let bodies = rows.collect::<std::result::Result<Vec<String>, _>>()?;
            bodies
        }
    };

    let mut documents = Vec::with_capacity(bodies.len());
    for body in bodies {
        let document: Document = serde_json::from_str(&body)?;
        if filter.matches(&document) {
            documents.push(document);
        }
    }
    Ok(documents)
}

fn document_id(document: &Document) -> Result<&str> {
    document
        .get("id")
        .and_then(Value::as_str)
        .ok_or(StoreError::MissingId)
}

fn write_body(conn: &Connection, collection: &str, id: &str, document: &Document) -> Result<()> {
    let body = serde_json::to_string(document)?;
    conn.execute(
        &format!("UPDATE {} SET body = ?1 WHERE id = ?2", collection),
        params![body, id],
    )?;
    Ok(())
}

impl DocumentStore for SqliteStore {
    fn insert_one(&self, collection: &str, document: &Document) -> Result<()> {
        let conn = self.connection()?;
        ensure_collection(&conn, collection)?;

        let id = document_id(document)?;
        let body = serde_json::to_string(document)?;
        let inserted = conn.execute(
            &format!("INSERT INTO {} (id, body) VALUES (?1, ?2)", collection),
            params![id, body],
        );

        match inserted {
            Ok(_) => {
                debug!("Inserted {} into {}", id, collection);
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateId(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        let conn = self.connection()?;
        load(&conn, collection, filter)
    }

    fn update_one(&self, collection: &str, filter: &Filter, set: &Document) -> Result<bool> {
        let conn = self.connection()?;
        let Some(mut document) = load(&conn, collection, filter)?.into_iter().next() else {
            return Ok(false);
        };

        let id = document_id(&document)?.to_string();
        for (key, value) in set {
            if key != "id" {
                document.insert(key.clone(), value.clone());
            }
        }

        write_body(&conn, collection, &id, &document)?;
        debug!("Updated {} in {} ({} fields)", id, collection, set.len());
        Ok(true)
    }

    fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        document: &Document,
    ) -> Result<bool> {
        let conn = self.connection()?;
        let Some(current) = load(&conn, collection, filter)?.into_iter().next() else {
            return Ok(false);
        };

        let id = document_id(&current)?.to_string();
        let mut replacement = document.clone();
        replacement.insert("id".to_string(), Value::String(id.clone()));

        write_body(&conn, collection, &id, &replacement)?;
        debug!("Replaced {} in {}", id, collection);
        Ok(true)
    }

    fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool> {
        let conn = self.connection()?;
        let Some(current) = load(&conn, collection, filter)?.into_iter().next() else {
            return Ok(false);
        };

        let id = document_id(&current)?;
        conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", collection),
            params![id],
        )?;
        debug!("Deleted {} from {}", id, collection);
        Ok(true)
    }
}
