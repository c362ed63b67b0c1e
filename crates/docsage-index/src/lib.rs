//! Persisted per-document vector index using sqlite-vec.
//!
//! Each ingested document gets its own SQLite database under the owning
//! user's storage directory (`<root>/<user>/db/index.sqlite`) holding the
//! chunk text and a vec0 virtual table with the chunk embeddings. Building a
//! new index for a user truncates the previous one in place, which is how
//! replaced sessions reclaim their on-disk index storage.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{Connection, params};
use zerocopy::IntoBytes;

mod error;

pub use error::{IndexError, Result};

/// File name of the index database inside a user's `db/` directory.
pub const INDEX_FILE_NAME: &str = "index.sqlite";

// ─────────────────────────────────────────────────────────────────────────────
// Extension Setup
// ─────────────────────────────────────────────────────────────────────────────

/// Register the sqlite-vec extension for all future connections.
///
/// Must be called once before any [`DocumentIndex`] is created.
/// `sqlite3_auto_extension` applies process-wide.
pub fn init_vector_extension() {
    use rusqlite::ffi::sqlite3_auto_extension;
    use sqlite_vec::sqlite3_vec_init;

    unsafe {
        #[allow(clippy::missing_transmute_annotations)]
        sqlite3_auto_extension(Some(std::mem::transmute(sqlite3_vec_init as *const ())));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Index
// ─────────────────────────────────────────────────────────────────────────────

/// A chunk retrieved by similarity search.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The chunk text.
    pub content: String,
    /// Distance from the query vector (lower = more similar).
    pub distance: f32,
}

/// Persisted vector index over one document's chunks.
pub struct DocumentIndex {
    conn: Mutex<Connection>,
    path: PathBuf,
    dims: usize,
}

impl DocumentIndex {
    /// Create a fresh index in `dir`, truncating any previous index there.
    pub fn create(dir: impl AsRef<Path>, dims: usize) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let path = dir.join(INDEX_FILE_NAME);
        let conn = Connection::open(&path)?;

        conn.execute_batch(&format!(
            r#"
            DROP TABLE IF EXISTS chunk_embeddings;
            DROP TABLE IF EXISTS chunks;
            CREATE TABLE chunks (
                id INTEGER PRIMARY KEY,
                content TEXT NOT NULL
            );
            CREATE VIRTUAL TABLE chunk_embeddings USING vec0(
                chunk_id INTEGER PRIMARY KEY,
                embedding float[{dims}]
            );
            "#
        ))?;

        tracing::info!(path = %path.display(), dims, "Created document index");

        Ok(Self {
            conn: Mutex::new(conn),
            path,
            dims,
        })
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Embedding dimensionality this index was created with.
    pub fn dimensions(&self) -> usize {
        self.dims
    }

    /// Append chunks with their embeddings.
    pub fn add_chunks(&self, chunks: &[(String, Vec<f32>)]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        for (content, embedding) in chunks {
            if embedding.len() != self.dims {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dims,
                    got: embedding.len(),
                });
            }

            tx.execute("INSERT INTO chunks (content) VALUES (?1)", params![content])?;
            let chunk_id = tx.last_insert_rowid();
            tx.execute(
                "INSERT INTO chunk_embeddings (chunk_id, embedding) VALUES (?1, ?2)",
                params![chunk_id, embedding.as_bytes()],
            )?;
        }

        tx.commit()?;
        tracing::debug!(count = chunks.len(), "Indexed chunks");
        Ok(())
    }

    /// Return the `limit` chunks closest to `query`, nearest first.
    pub fn search(&self, query: &[f32], limit: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dims {
            return Err(IndexError::DimensionMismatch {
                expected: self.dims,
                got: query.len(),
            });
        }

        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            r#"
            SELECT chunk_id, distance
            FROM chunk_embeddings
            WHERE embedding MATCH ?1
            ORDER BY distance
            LIMIT ?2
            "#,
        )?;

        let mut rows = stmt.query(params![query.as_bytes(), limit as i64])?;
        let mut hits: Vec<(i64, f32)> = Vec::new();
        while let Some(row) = rows.next()? {
            hits.push((row.get(0)?, row.get(1)?));
        }

        let mut results = Vec::with_capacity(hits.len());
        for (chunk_id, distance) in hits {
            let content: String = conn.query_row(
                "SELECT content FROM chunks WHERE id = ?1",
                params![chunk_id],
                |row| row.get(0),
            )?;
            results.push(ScoredChunk { content, distance });
        }

        tracing::debug!(found = results.len(), limit, "Similarity search");
        Ok(results)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
