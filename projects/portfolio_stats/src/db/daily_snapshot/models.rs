use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::Serialize;
use crate::db::schema::daily_snapshots;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = daily_snapshots)]
pub struct DailySnapshot {
    pub id: i32,
    pub date: NaiveDateTime,
    pub day: NaiveDate,
    pub leetcode_count: i32,
    pub codeforces_rating: i32,
    pub github_repos: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = daily_snapshots)]
pub struct NewDailySnapshot {
    pub date: NaiveDateTime,
    pub day: NaiveDate,
    pub leetcode_count: i32,
    pub codeforces_rating: i32,
    pub github_repos: i32,
}

/// The three metric columns, used as the update set of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = daily_snapshots)]
pub struct SnapshotMetrics {
    pub leetcode_count: i32,
    pub codeforces_rating: i32,
    pub github_repos: i32,
}

/// Wire shape of one `/history` entry.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub date: NaiveDateTime,
    pub leetcode_count: i32,
    pub codeforces_rating: i32,
    pub github_repos: i32,
}

impl From<DailySnapshot> for HistoryEntry {
    fn from(snapshot: DailySnapshot) -> Self {
        Self {
            date: snapshot.date,
            leetcode_count: snapshot.leetcode_count,
            codeforces_rating: snapshot.codeforces_rating,
            github_repos: snapshot.github_repos,
        }
    }
}

impl From<&NewDailySnapshot> for SnapshotMetrics {
    fn from(new: &NewDailySnapshot) -> Self {
        Self {
            leetcode_count: new.leetcode_count,
            codeforces_rating: new.codeforces_rating,
            github_repos: new.github_repos,
        }
    }
}
