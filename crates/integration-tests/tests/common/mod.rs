//! Shared fixture: the real queue service over file-backed SQLite

#![allow(dead_code)]

use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use walkin_core::application::{EnqueueRequest, QueueService};
use walkin_core::domain::LocationSet;
use walkin_core::port::time_provider::SteppingTimeProvider;
use walkin_infra_sqlite::{create_pool, run_migrations, SqliteCustomerRepository};

pub const LOCATIONS: [&str; 2] = ["downtown", "uptown"];

pub struct Fixture {
    // Keeps the database directory alive for the test's lifetime
    pub dir: TempDir,
    pub pool: SqlitePool,
    pub repo: Arc<SqliteCustomerRepository>,
    pub service: Arc<QueueService>,
}

pub async fn open(dir: &Path) -> (SqlitePool, Arc<SqliteCustomerRepository>, Arc<QueueService>) {
    let db_path = dir.join("queue.db");
    let pool = create_pool(db_path.to_str().unwrap()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let repo = Arc::new(SqliteCustomerRepository::new(pool.clone()));
    let service = Arc::new(QueueService::new(
        repo.clone(),
        repo.clone(),
        Arc::new(LocationSet::new(LOCATIONS).unwrap()),
        Arc::new(SteppingTimeProvider::new(1_000, 1)),
    ));
    (pool, repo, service)
}

pub async fn setup() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let (pool, repo, service) = open(dir.path()).await;
    Fixture {
        dir,
        pool,
        repo,
        service,
    }
}

pub fn join(name: &str) -> EnqueueRequest {
    EnqueueRequest {
        first_name: name.to_string(),
        location: LOCATIONS[0].to_string(),
    }
}

/// (first_name, queue_position) of every pending customer in queue order
pub async fn queue_of(service: &QueueService) -> Vec<(String, i64)> {
    service
        .list_queue()
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.first_name, c.queue_position))
        .collect()
}

pub fn names(expected: &[(&str, i64)]) -> Vec<(String, i64)> {
    expected
        .iter()
        .map(|(name, pos)| (name.to_string(), *pos))
        .collect()
}
