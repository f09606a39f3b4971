use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://codeforces.com";

const STATUS_OK: &str = "OK";

pub struct CodeforcesApiResult {
    pub body: String,
}

/// Envelope shared by every Codeforces API method.
#[derive(Debug, Deserialize)]
pub struct UserInfoResponse {
    pub status: String,
    pub comment: Option<String>,
    #[serde(default)]
    pub result: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub handle: String,
    /// Absent for users who never took part in a rated contest.
    pub rating: Option<i64>,
}

pub async fn fetch_user_info(
    client: &Client,
    base_url: &str,
    handle: &str,
) -> Result<CodeforcesApiResult, FetchUserInfoError> {
    let response = client
        .get(format!("{}/api/user.info", base_url.trim_end_matches('/')))
        .query(&[("handles", handle)])
        .send()
        .await
        .map_err(|source| FetchUserInfoError::RequestSend { source })?;

    let body = response
        .text()
        .await
        .map_err(|source| FetchUserInfoError::ResponseRead { source })?;

    Ok(CodeforcesApiResult { body })
}

#[derive(Debug, Error)]
pub enum FetchUserInfoError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

// Codeforces answers failures with a 400 and a FAILED envelope, so the body
// is parsed whatever the HTTP status.
pub async fn fetch_codeforces_rating(
    client: &Client,
    base_url: &str,
    handle: &str,
) -> Result<i64, FetchCodeforcesRatingError> {
    let CodeforcesApiResult { body } = fetch_user_info(client, base_url, handle).await?;

    parse_rating(&body)
}

pub fn parse_rating(body: &str) -> Result<i64, FetchCodeforcesRatingError> {
    let parsed: UserInfoResponse = serde_json::from_str(body)?;

    if parsed.status != STATUS_OK {
        return Err(FetchCodeforcesRatingError::StatusNotOk {
            status: parsed.status,
            comment: parsed.comment.unwrap_or_default(),
        });
    }

    let user = parsed
        .result
        .into_iter()
        .next()
        .ok_or(FetchCodeforcesRatingError::NoMatchedUser)?;

    Ok(user.rating.unwrap_or(0))
}

#[derive(Debug, Error)]
pub enum FetchCodeforcesRatingError {
    #[error("FetchUserInfo: {source}")]
    FetchUserInfo {
        #[from]
        source: FetchUserInfoError,
    },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },

    #[error("StatusNotOk: {status} ({comment})")]
    StatusNotOk {
        status: String,
        comment: String,
    },

    #[error("Empty result in user.info response")]
    NoMatchedUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_status_returns_first_rating() {
        let body = r#"{"status":"OK","result":[{"handle":"tourist","rating":1400,"maxRating":1500}]}"#;

        assert_eq!(parse_rating(body).unwrap(), 1400);
    }

    #[test]
    fn unrated_user_reads_as_zero() {
        let body = r#"{"status":"OK","result":[{"handle":"newcomer"}]}"#;

        assert_eq!(parse_rating(body).unwrap(), 0);
    }

    #[test]
    fn failed_status_is_an_error() {
        let body = r#"{"status":"FAILED","comment":"handles: User with handle nobody not found"}"#;

        match parse_rating(body) {
            Err(FetchCodeforcesRatingError::StatusNotOk { status, comment }) => {
                assert_eq!(status, "FAILED");
                assert!(comment.contains("not found"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_result_is_an_error() {
        let body = r#"{"status":"OK","result":[]}"#;

        assert!(matches!(
            parse_rating(body),
            Err(FetchCodeforcesRatingError::NoMatchedUser)
        ));
    }
}
