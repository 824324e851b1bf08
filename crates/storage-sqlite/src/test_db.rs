//! Throwaway migrated databases for repository tests.

use std::sync::Arc;

use tempfile::TempDir;

use crate::db::{create_pool, init, run_migrations, spawn_writer, DbPool, WriteHandle};

pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

/// Must be called from inside a Tokio runtime; the writer actor is spawned on it.
pub fn setup() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let db_path = init(dir.path().join("data").join("footprint.db").to_str().unwrap()).unwrap();
    let pool = create_pool(&db_path).unwrap();
    run_migrations(&pool).unwrap();
    let writer = spawn_writer(pool.as_ref().clone());
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}
