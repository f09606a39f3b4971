use diesel::prelude::*;
use thiserror::Error;
use crate::db::{daily_snapshot::models::*, schema::daily_snapshots::dsl::*, with_connection, DbPool};

#[derive(Debug, Error)]
pub enum UpsertDailySnapshotError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },
    #[error("UpsertDailySnapshot: {source}")]
    UpsertDailySnapshot {
        #[from]
        source: diesel::result::Error,
    },
}

/// Inserts `new`, or overwrites the three metrics of the row that already
/// holds `new.day`. The row's `date` keeps its first value.
pub fn upsert_daily_snapshot(
    pool: &DbPool,
    new: &NewDailySnapshot,
) -> Result<DailySnapshot, UpsertDailySnapshotError> {
    let metrics = SnapshotMetrics::from(new);

    let stored = with_connection!(pool, |conn| {
        conn.transaction(|conn| {
            diesel::insert_into(daily_snapshots)
                .values(new)
                .on_conflict(day)
                .do_update()
                .set(metrics)
                .execute(conn)?;

            daily_snapshots
                .filter(day.eq(new.day))
                .first::<DailySnapshot>(conn)
        })
    })??;

    Ok(stored)
}

#[derive(Debug, Error)]
pub enum GetAllDailySnapshotsError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },
    #[error("GetAllDailySnapshots: {source}")]
    GetAllDailySnapshots {
        #[from]
        source: diesel::result::Error,
    },
}

/// Every stored snapshot, oldest first.
pub fn get_all_daily_snapshots(
    pool: &DbPool,
) -> Result<Vec<DailySnapshot>, GetAllDailySnapshotsError> {
    let snapshots = with_connection!(pool, |conn| {
        daily_snapshots
            .order((date.asc(), id.asc()))
            .load::<DailySnapshot>(conn)
    })??;

    Ok(snapshots)
}
