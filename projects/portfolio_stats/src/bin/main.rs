use projects_portfolio_stats::{
	config::{Config, ConfigError},
	router::app_router,
	services::snapshot_store::{ConnectStoreError, InitializeStoreError, SnapshotStore},
	state::AppState,
};
use reqwest::Client;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum MainError {
	#[error("LoadConfig: {source}")]
	LoadConfig {
		#[source]
		source: ConfigError,
	},
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("BuildHttpClient: {source}")]
	BuildHttpClient {
		#[source]
		source: reqwest::Error,
	},
	#[error("ConnectStore: {source}")]
	ConnectStore {
		#[source]
		source: ConnectStoreError,
	},
	#[error("InitializeStore: {source}")]
	InitializeStore {
		#[source]
		source: InitializeStoreError,
	},
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	},
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	let config = Config::from_env()
		.map_err(|source| MainError::LoadConfig { source })?;

	utils_trace::init(&config.log_level, config.log_format)
		.map_err(|source| MainError::TracingInit { source })?;

	let client = Client::builder()
		.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
		.build()
		.map_err(|source| MainError::BuildHttpClient { source })?;

	let store = SnapshotStore::connect(&config.database_url)
		.map_err(|source| MainError::ConnectStore { source })?;
	store
		.initialize()
		.await
		.map_err(|source| MainError::InitializeStore { source })?;

	let app = app_router(AppState::new(client, config.providers.clone(), store));

	let listener = TcpListener::bind(config.bind_addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!("Server running on addr: {}", config.bind_addr);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.map_err(|source| MainError::Serve { source })?;

	info!("Server stopped");

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			warn!(error = %err, "Failed to listen for Ctrl-C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(err) => {
				warn!(error = %err, "Failed to listen for SIGTERM");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	info!("Shutdown signal received");
}
