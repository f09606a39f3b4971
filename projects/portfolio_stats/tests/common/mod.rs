#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use projects_portfolio_stats::{
    config::ProvidersConfig,
    db::DatabaseUrl,
    router::app_router,
    services::snapshot_store::SnapshotStore,
    state::AppState,
};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

/// What a mocked provider answers with.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Metric(i64),
    Garbage,
}

#[derive(Debug, Clone, Copy)]
pub struct Replies {
    pub leetcode: Reply,
    pub codeforces: Reply,
    pub github: Reply,
}

impl Replies {
    pub fn metrics(leetcode: i64, codeforces: i64, github: i64) -> Self {
        Self {
            leetcode: Reply::Metric(leetcode),
            codeforces: Reply::Metric(codeforces),
            github: Reply::Metric(github),
        }
    }
}

#[derive(Debug)]
struct MockState {
    replies: Mutex<Replies>,
    github_user_agent: Mutex<Option<String>>,
}

/// Local stand-in for LeetCode, Codeforces and GitHub, all on one address.
pub struct MockProviders {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockProviders {
    pub async fn start(replies: Replies) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            replies: Mutex::new(replies),
            github_user_agent: Mutex::new(None),
        });

        let app = Router::new()
            .route("/graphql", post(leetcode_graphql))
            .route("/api/user.info", get(codeforces_user_info))
            .route("/users/{username}", get(github_user))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set(&self, replies: Replies) {
        *self.state.replies.lock().unwrap() = replies;
    }

    /// `User-Agent` of the most recent GitHub profile request.
    pub fn github_user_agent(&self) -> Option<String> {
        self.state.github_user_agent.lock().unwrap().clone()
    }

    pub fn providers(&self) -> ProvidersConfig {
        providers_at(&self.base_url())
    }
}

pub fn providers_at(base_url: &str) -> ProvidersConfig {
    ProvidersConfig {
        leetcode_username: "lc-user".to_string(),
        codeforces_username: "cf-user".to_string(),
        github_username: "gh-user".to_string(),
        leetcode_base_url: base_url.to_string(),
        codeforces_base_url: base_url.to_string(),
        github_base_url: base_url.to_string(),
        fetch_timeout: Duration::from_secs(5),
    }
}

/// An address nothing listens on, for simulating refused connections.
pub async fn closed_base_url() -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

fn garbage() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html>upstream exploded</html>").into_response()
}

async fn leetcode_graphql(
    State(state): State<Arc<MockState>>,
    Json(payload): Json<Value>,
) -> Response {
    assert_eq!(payload["variables"]["username"], "lc-user");

    let reply = state.replies.lock().unwrap().leetcode;
    match reply {
        Reply::Metric(count) => Json(json!({
            "data": {
                "matchedUser": {
                    "submitStats": {
                        "acSubmissionNum": [
                            {"difficulty": "All", "count": count},
                            {"difficulty": "Easy", "count": count / 2}
                        ]
                    }
                }
            }
        }))
        .into_response(),
        Reply::Garbage => garbage(),
    }
}

async fn codeforces_user_info(State(state): State<Arc<MockState>>) -> Response {
    let reply = state.replies.lock().unwrap().codeforces;
    match reply {
        Reply::Metric(rating) => Json(json!({
            "status": "OK",
            "result": [{"handle": "cf-user", "rating": rating}]
        }))
        .into_response(),
        Reply::Garbage => garbage(),
    }
}

async fn github_user(
    State(state): State<Arc<MockState>>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Response {
    *state.github_user_agent.lock().unwrap() = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let reply = state.replies.lock().unwrap().github;
    match reply {
        Reply::Metric(public_repos) => Json(json!({
            "login": username,
            "public_repos": public_repos
        }))
        .into_response(),
        Reply::Garbage => garbage(),
    }
}

/// A migrated SQLite store in a temp dir. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn temp_store() -> anyhow::Result<(TempDir, SnapshotStore)> {
    let (dir, store) = uninitialized_store()?;
    store.initialize().await?;
    Ok((dir, store))
}

/// A store whose schema was never created, so every query fails.
pub fn uninitialized_store() -> anyhow::Result<(TempDir, SnapshotStore)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("stats.db");
    let url = DatabaseUrl::parse(path.to_str());
    let store = SnapshotStore::connect(&url)?;
    Ok((dir, store))
}

pub fn app_state(providers: ProvidersConfig, store: SnapshotStore) -> AppState {
    AppState::new(Client::new(), providers, store)
}

pub async fn get_json(state: AppState, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    let response = app_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}
