pub mod aggregator;
pub mod snapshot_store;
