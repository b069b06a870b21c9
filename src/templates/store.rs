//! SQLite-backed store of reusable prompt templates.
//!
//! A fresh database is seeded with a few starter templates so there is
//! always something to pick from.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use thiserror::Error;

/// Templates inserted into an empty store
const DEFAULT_TEMPLATES: [(&str, &str); 3] = [
    (
        "Bloom's Taxonomy",
        "Generate questions aligned with Bloom's Taxonomy: 2 remembering, 2 understanding, \
         2 applying, 2 analyzing, 1 evaluating, 1 creating. Return in JSON format.",
    ),
    (
        "Socratic Method",
        "Generate questions that encourage critical thinking and exploration, \
         following the Socratic Method. Return 10 questions in JSON format.",
    ),
    (
        "Simple Recall",
        "Generate straightforward recall questions to test basic comprehension \
         of the text. Return 10 questions in JSON format.",
    ),
];

/// Errors that can occur with the template store
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' already exists")]
    AlreadyExists(String),

    #[error("Template name and prompt must not be empty")]
    Empty,

    #[error("Failed to create template directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// A stored prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

/// Name → prompt store
pub struct TemplateStore {
    conn: Connection,
}

impl TemplateStore {
    /// Open (or create) the store at `path`
    pub fn open(path: &Path) -> Result<Self, TemplateError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Open a throwaway in-memory store
    pub fn open_in_memory() -> Result<Self, TemplateError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, TemplateError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS frameworks (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                prompt TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM frameworks", [], |row| row.get(0))?;
        if count == 0 {
            let now = Utc::now().to_rfc3339();
            for (name, prompt) in DEFAULT_TEMPLATES {
                conn.execute(
                    "INSERT OR IGNORE INTO frameworks (name, prompt, created_at) VALUES (?1, ?2, ?3)",
                    params![name, prompt, now],
                )?;
            }
        }

        Ok(Self { conn })
    }

    /// Template names, sorted
    pub fn list(&self) -> Result<Vec<String>, TemplateError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM frameworks ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Full templates, sorted by name
    pub fn templates(&self) -> Result<Vec<Template>, TemplateError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, prompt, created_at FROM frameworks ORDER BY name")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .map(|(name, prompt, created_at)| Template {
                name,
                prompt,
                created_at: DateTime::parse_from_rfc3339(&created_at)
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            })
            .collect())
    }

    /// Prompt text for `name`
    pub fn get(&self, name: &str) -> Result<Option<String>, TemplateError> {
        let prompt = self
            .conn
            .query_row(
                "SELECT prompt FROM frameworks WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(prompt)
    }

    /// Add a template; names are unique
    pub fn add(&self, name: &str, prompt: &str) -> Result<(), TemplateError> {
        if name.trim().is_empty() || prompt.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let result = self.conn.execute(
            "INSERT INTO frameworks (name, prompt, created_at) VALUES (?1, ?2, ?3)",
            params![name, prompt, Utc::now().to_rfc3339()],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(TemplateError::AlreadyExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a template; returns whether it existed
    pub fn delete(&self, name: &str) -> Result<bool, TemplateError> {
        let deleted = self
            .conn
            .execute("DELETE FROM frameworks WHERE name = ?1", params![name])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_seeded_with_defaults() {
        let store = TemplateStore::open_in_memory().unwrap();
        assert_eq!(
            store.list().unwrap(),
            vec!["Bloom's Taxonomy", "Simple Recall", "Socratic Method"]
        );
        assert!(store
            .get("Simple Recall")
            .unwrap()
            .unwrap()
            .contains("recall questions"));
    }

    #[test]
    fn test_add_and_get() {
        let store = TemplateStore::open_in_memory().unwrap();
        store.add("Exam Prep", "Write exam-style questions.").unwrap();

        assert_eq!(
            store.get("Exam Prep").unwrap(),
            Some("Write exam-style questions.".to_string())
        );
        assert_eq!(store.get("Unknown").unwrap(), None);
        assert_eq!(store.list().unwrap().len(), 4);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let store = TemplateStore::open_in_memory().unwrap();
        let err = store.add("Socratic Method", "Something else").unwrap_err();

        assert!(matches!(err, TemplateError::AlreadyExists(name) if name == "Socratic Method"));
        assert!(matches!(store.add(" ", "x"), Err(TemplateError::Empty)));
    }

    #[test]
    fn test_delete() {
        let store = TemplateStore::open_in_memory().unwrap();

        assert!(store.delete("Simple Recall").unwrap());
        assert!(!store.delete("Simple Recall").unwrap());
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_persists_without_reseeding() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join("templates.db");

        {
            let store = TemplateStore::open(&path).unwrap();
            for name in store.list().unwrap() {
                store.delete(&name).unwrap();
            }
            store.add("Only", "Just this one").unwrap();
        }

        let reopened = TemplateStore::open(&path).unwrap();
        let templates = reopened.templates().unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "Only");
        assert!(templates[0].created_at > DateTime::<Utc>::UNIX_EPOCH);
    }
}
