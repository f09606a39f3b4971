use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://leetcode.com";

const ALL_DIFFICULTIES: &str = "All";

pub struct LeetCodeGraphQLResult {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: Option<GraphQLData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLData {
    pub matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    pub submit_stats: SubmitStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStats {
    pub ac_submission_num: Vec<SubmissionCount>,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionCount {
    pub difficulty: String,
    pub count: i64,
}

pub async fn fetch_user_submit_stats(
    client: &Client,
    base_url: &str,
    username: &str,
) -> Result<LeetCodeGraphQLResult, FetchUserSubmitStatsError> {
    let graphql_query = r#"
        query getUserProfile($username: String!) {
            matchedUser(username: $username) {
                submitStats: submitStatsGlobal {
                    acSubmissionNum {
                        difficulty
                        count
                    }
                }
            }
        }
    "#;

    let payload = serde_json::json!({
        "query": graphql_query,
        "variables": {
            "username": username,
        }
    });

    let response = client
        .post(format!("{}/graphql", base_url.trim_end_matches('/')))
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await
        .map_err(|source| FetchUserSubmitStatsError::RequestSend { source })?;

    let body = response
        .text()
        .await
        .map_err(|source| FetchUserSubmitStatsError::ResponseRead { source })?;

    Ok(LeetCodeGraphQLResult { body })
}

#[derive(Debug, Error)]
pub enum FetchUserSubmitStatsError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

/// Total accepted submissions across all difficulties.
pub async fn fetch_leetcode_count(
    client: &Client,
    base_url: &str,
    username: &str,
) -> Result<i64, FetchLeetCodeCountError> {
    let LeetCodeGraphQLResult { body } =
        fetch_user_submit_stats(client, base_url, username).await?;

    parse_accepted_count(&body)
}

pub fn parse_accepted_count(body: &str) -> Result<i64, FetchLeetCodeCountError> {
    let parsed: GraphQLResponse = serde_json::from_str(body)?;

    let matched_user = parsed
        .data
        .ok_or(FetchLeetCodeCountError::DataFieldMissing)?
        .matched_user
        .ok_or(FetchLeetCodeCountError::MatchedUserMissing)?;

    matched_user
        .submit_stats
        .ac_submission_num
        .into_iter()
        .find(|entry| entry.difficulty == ALL_DIFFICULTIES)
        .map(|entry| entry.count)
        .ok_or(FetchLeetCodeCountError::AllDifficultiesMissing)
}

#[derive(Debug, Error)]
pub enum FetchLeetCodeCountError {
    #[error("FetchUserSubmitStats: {source}")]
    FetchUserSubmitStats {
        #[from]
        source: FetchUserSubmitStatsError,
    },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },

    #[error("Missing data field in GraphQL response")]
    DataFieldMissing,

    #[error("No matched user in GraphQL response")]
    MatchedUserMissing,

    #[error("No \"All\" entry in acSubmissionNum")]
    AllDifficultiesMissing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_all_difficulties_count() {
        let body = r#"{
            "data": {
                "matchedUser": {
                    "submitStats": {
                        "acSubmissionNum": [
                            {"difficulty": "All", "count": 120},
                            {"difficulty": "Easy", "count": 70},
                            {"difficulty": "Medium", "count": 45},
                            {"difficulty": "Hard", "count": 5}
                        ]
                    }
                }
            }
        }"#;

        assert_eq!(parse_accepted_count(body).unwrap(), 120);
    }

    #[test]
    fn errors_without_data_is_an_error() {
        let body = r#"{"errors": [{"message": "too many requests"}]}"#;

        assert!(matches!(
            parse_accepted_count(body),
            Err(FetchLeetCodeCountError::DataFieldMissing)
        ));
    }

    #[test]
    fn unknown_user_is_an_error() {
        let body = r#"{"data": {"matchedUser": null}, "errors": [{"message": "That user does not exist."}]}"#;

        assert!(matches!(
            parse_accepted_count(body),
            Err(FetchLeetCodeCountError::MatchedUserMissing)
        ));
    }

    #[test]
    fn missing_all_entry_is_an_error() {
        let body = r#"{"data": {"matchedUser": {"submitStats": {"acSubmissionNum": [{"difficulty": "Easy", "count": 3}]}}}}"#;

        assert!(matches!(
            parse_accepted_count(body),
            Err(FetchLeetCodeCountError::AllDifficultiesMissing)
        ));
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(matches!(
            parse_accepted_count("<html>rate limited</html>"),
            Err(FetchLeetCodeCountError::DeserializeResponseBody { .. })
        ));
    }
}
