use chrono::{Local, NaiveDateTime, SubsecRound};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::info;

use crate::db::{
    connect_pool,
    daily_snapshot::{
        models::{DailySnapshot, NewDailySnapshot, SnapshotMetrics},
        queries::{
            get_all_daily_snapshots, upsert_daily_snapshot, GetAllDailySnapshotsError,
            UpsertDailySnapshotError,
        },
    },
    run_migrations, ConnectPoolError, DatabaseUrl, DbPool, RunMigrationsError,
};

/// Owns persistence of daily snapshots. Built once at startup and cloned into
/// request handlers; the pool is released when the last clone is dropped.
#[derive(Clone)]
pub struct SnapshotStore {
    pool: DbPool,
}

#[derive(Debug, Error)]
pub enum ConnectStoreError {
    #[error("ConnectPool: {source}")]
    ConnectPool {
        #[from]
        source: ConnectPoolError,
    },
}

#[derive(Debug, Error)]
pub enum InitializeStoreError {
    #[error("RunMigrations: {source}")]
    RunMigrations {
        #[from]
        source: RunMigrationsError,
    },
    #[error("Join: {source}")]
    Join {
        #[from]
        source: JoinError,
    },
}

#[derive(Debug, Error)]
pub enum UpsertSnapshotError {
    #[error(transparent)]
    UpsertDailySnapshot {
        #[from]
        source: UpsertDailySnapshotError,
    },
    #[error("Join: {source}")]
    Join {
        #[from]
        source: JoinError,
    },
}

#[derive(Debug, Error)]
pub enum GetHistoryError {
    #[error(transparent)]
    GetAllDailySnapshots {
        #[from]
        source: GetAllDailySnapshotsError,
    },
    #[error("Join: {source}")]
    Join {
        #[from]
        source: JoinError,
    },
}

impl SnapshotStore {
    pub fn connect(url: &DatabaseUrl) -> Result<Self, ConnectStoreError> {
        let pool = connect_pool(url)?;
        info!(backend = url.backend_name(), "Snapshot store connected");

        Ok(Self { pool })
    }

    /// Creates the schema if needed. Safe to call more than once.
    pub async fn initialize(&self) -> Result<(), InitializeStoreError> {
        let pool = self.pool.clone();
        let applied = tokio::task::spawn_blocking(move || run_migrations(&pool)).await??;

        if applied.is_empty() {
            info!("No pending migrations to apply");
        } else {
            for version in &applied {
                info!(%version, "Applied migration");
            }
        }

        Ok(())
    }

    pub async fn upsert_today(
        &self,
        metrics: SnapshotMetrics,
    ) -> Result<DailySnapshot, UpsertSnapshotError> {
        self.upsert_for(Local::now().naive_local(), metrics).await
    }

    /// Upserts the snapshot for the calendar day containing `taken_at`.
    pub async fn upsert_for(
        &self,
        taken_at: NaiveDateTime,
        metrics: SnapshotMetrics,
    ) -> Result<DailySnapshot, UpsertSnapshotError> {
        // Postgres keeps microseconds; truncating keeps the created/updated check exact.
        let taken_at = taken_at.trunc_subsecs(6);
        let new = NewDailySnapshot {
            date: taken_at,
            day: taken_at.date(),
            leetcode_count: metrics.leetcode_count,
            codeforces_rating: metrics.codeforces_rating,
            github_repos: metrics.github_repos,
        };

        let pool = self.pool.clone();
        let stored = tokio::task::spawn_blocking(move || upsert_daily_snapshot(&pool, &new)).await??;

        if stored.date == taken_at {
            info!(day = %stored.day, "Creating new stats");
        } else {
            info!(day = %stored.day, "Updating stats");
        }

        Ok(stored)
    }

    pub async fn history(&self) -> Result<Vec<DailySnapshot>, GetHistoryError> {
        let pool = self.pool.clone();
        let snapshots = tokio::task::spawn_blocking(move || get_all_daily_snapshots(&pool)).await??;

        Ok(snapshots)
    }
}
