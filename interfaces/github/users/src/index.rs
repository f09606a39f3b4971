use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

pub struct GitHubRestResult {
    pub body: String,
    pub status: StatusCode,
}

#[derive(Debug, Deserialize)]
pub struct UserProfile {
    pub login: Option<String>,
    pub public_repos: Option<i64>,
    /// Set on error payloads such as 404s and rate limiting.
    pub message: Option<String>,
}

/// GitHub rejects requests without a `User-Agent`; `client` must carry one.
pub async fn fetch_user_profile(
    client: &Client,
    base_url: &str,
    username: &str,
) -> Result<GitHubRestResult, FetchUserProfileError> {
    let response = client
        .get(format!("{}/users/{username}", base_url.trim_end_matches('/')))
        .header("Accept", "application/vnd.github+json")
        .send()
        .await
        .map_err(|source| FetchUserProfileError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchUserProfileError::ResponseRead { source })?;

    Ok(GitHubRestResult { body, status })
}

#[derive(Debug, Error)]
pub enum FetchUserProfileError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

pub async fn fetch_github_repo_count(
    client: &Client,
    base_url: &str,
    username: &str,
) -> Result<i64, FetchGitHubRepoCountError> {
    let GitHubRestResult { body, status } = fetch_user_profile(client, base_url, username).await?;

    parse_public_repos(status, &body)
}

pub fn parse_public_repos(status: StatusCode, body: &str) -> Result<i64, FetchGitHubRepoCountError> {
    let profile: UserProfile = serde_json::from_str(body)?;

    if !status.is_success() {
        return Err(FetchGitHubRepoCountError::UnexpectedStatus {
            status,
            message: profile.message.unwrap_or_default(),
        });
    }

    Ok(profile.public_repos.unwrap_or(0))
}

#[derive(Debug, Error)]
pub enum FetchGitHubRepoCountError {
    #[error("FetchUserProfile: {source}")]
    FetchUserProfile {
        #[from]
        source: FetchUserProfileError,
    },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },

    #[error("UnexpectedStatus: {status} {message}")]
    UnexpectedStatus {
        status: StatusCode,
        message: String,
    },
}
