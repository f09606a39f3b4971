use reqwest::Client;

use crate::config::ProvidersConfig;
use crate::services::{aggregator::StatsAggregator, snapshot_store::SnapshotStore};

/// Handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: SnapshotStore,
    pub aggregator: StatsAggregator,
}

impl AppState {
    pub fn new(client: Client, providers: ProvidersConfig, store: SnapshotStore) -> Self {
        let aggregator = StatsAggregator::new(client, providers, store.clone());
        Self { store, aggregator }
    }
}
