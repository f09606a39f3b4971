use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use interfaces_codeforces_user_info::index::fetch_codeforces_rating;
use interfaces_github_users::index::fetch_github_repo_count;
use interfaces_leetcode_submit_stats::index::fetch_leetcode_count;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::config::ProvidersConfig;
use crate::db::daily_snapshot::models::SnapshotMetrics;
use crate::services::snapshot_store::{SnapshotStore, UpsertSnapshotError};

/// The current reading returned by `/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsResult {
    pub leetcode: i32,
    pub codeforces: i32,
    pub github: i32,
}

impl From<StatsResult> for SnapshotMetrics {
    fn from(stats: StatsResult) -> Self {
        Self {
            leetcode_count: stats.leetcode,
            codeforces_rating: stats.codeforces,
            github_repos: stats.github,
        }
    }
}

#[derive(Debug, Error)]
pub enum GetAllStatsError {
    #[error("UpsertSnapshot: {source}")]
    UpsertSnapshot {
        #[from]
        source: UpsertSnapshotError,
    },
}

#[derive(Clone)]
pub struct StatsAggregator {
    client: Client,
    providers: ProvidersConfig,
    store: SnapshotStore,
}

impl StatsAggregator {
    pub fn new(client: Client, providers: ProvidersConfig, store: SnapshotStore) -> Self {
        Self { client, providers, store }
    }

    /// Fetches all three metrics concurrently, records them as today's
    /// snapshot and returns them. Provider failures read as zero; only a
    /// store failure is returned as an error.
    pub async fn get_all_stats(&self) -> Result<StatsResult, GetAllStatsError> {
        let providers = &self.providers;
        let limit = providers.fetch_timeout;

        let (leetcode, codeforces, github) = tokio::join!(
            fetch_or_zero(
                "leetcode",
                limit,
                fetch_leetcode_count(&self.client, &providers.leetcode_base_url, &providers.leetcode_username),
            ),
            fetch_or_zero(
                "codeforces",
                limit,
                fetch_codeforces_rating(&self.client, &providers.codeforces_base_url, &providers.codeforces_username),
            ),
            fetch_or_zero(
                "github",
                limit,
                fetch_github_repo_count(&self.client, &providers.github_base_url, &providers.github_username),
            ),
        );

        let stats = StatsResult { leetcode, codeforces, github };
        self.store.upsert_today(stats.into()).await?;

        Ok(stats)
    }
}

/// Awaits one provider fetch, collapsing every failure mode (error, timeout,
/// out-of-range value) to `0` with a warning naming the provider.
pub async fn fetch_or_zero<F, E>(provider: &'static str, limit: Duration, fetch: F) -> i32
where
    F: Future<Output = Result<i64, E>>,
    E: Display,
{
    match tokio::time::timeout(limit, fetch).await {
        Ok(Ok(value)) => i32::try_from(value).unwrap_or_else(|_| {
            warn!(provider, value, "Metric out of range, reporting 0");
            0
        }),
        Ok(Err(err)) => {
            warn!(provider, error = %err, "Fetch failed, reporting 0");
            0
        }
        Err(_) => {
            warn!(provider, timeout_ms = limit.as_millis() as u64, "Fetch timed out, reporting 0");
            0
        }
    }
}
