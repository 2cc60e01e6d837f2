//! Serde types matching the GitHub GraphQL response for the issues query.
//!
//! Field values are fetched through aliases (`sprint`, `status`, `hours`,
//! `activity`) so each project item deserializes into one flat struct.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V> {
  pub query: &'a str,
  pub variables: V,
}

#[derive(Debug, Serialize)]
pub struct IssueQueryVariables {
  pub login: String,
  /// RFC 3339 timestamp; issues updated before it are skipped
  pub since: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
  pub data: Option<T>,
  #[serde(default)]
  pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
  pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiUserData {
  pub user: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
  pub issues: ApiConnection<ApiIssueNode>,
}

#[derive(Debug, Deserialize)]
pub struct ApiConnection<T> {
  #[serde(default = "Vec::new")]
  pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct ApiIssueNode {
  pub title: String,
  pub repository: Option<ApiRepository>,
  pub projects: ApiConnection<ApiProjectItem>,
}

#[derive(Debug, Deserialize)]
pub struct ApiRepository {
  #[serde(rename = "nameWithOwner")]
  pub name_with_owner: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiProjectItem {
  pub project: Option<ApiTitled>,
  pub sprint: Option<ApiTitled>,
  pub status: Option<ApiValue>,
  pub hours: Option<ApiNumber>,
  pub activity: Option<ApiValue>,
}

/// Project or iteration field value
#[derive(Debug, Deserialize)]
pub struct ApiTitled {
  pub title: Option<String>,
}

/// Single-select field value
#[derive(Debug, Deserialize)]
pub struct ApiValue {
  pub value: Option<String>,
}

/// Number field value
#[derive(Debug, Deserialize)]
pub struct ApiNumber {
  pub number: Option<f64>,
}

/// Issues of `$login` updated since `$since`, with their project fields.
pub const ISSUES_QUERY: &str = r#"
query($login: String!, $since: DateTime!) {
  user(login: $login) {
    issues(first: 100, filterBy: {since: $since}, orderBy: {field: UPDATED_AT, direction: DESC}) {
      nodes {
        title
        repository { nameWithOwner }
        projects: projectItems(first: 10) {
          nodes {
            project { title }
            sprint: fieldValueByName(name: "Sprint") {
              ... on ProjectV2ItemFieldIterationValue { title }
            }
            status: fieldValueByName(name: "Status") {
              ... on ProjectV2ItemFieldSingleSelectValue { value: name }
            }
            hours: fieldValueByName(name: "Hours") {
              ... on ProjectV2ItemFieldNumberValue { number }
            }
            activity: fieldValueByName(name: "Activity") {
              ... on ProjectV2ItemFieldSingleSelectValue { value: name }
            }
          }
        }
      }
    }
  }
}
"#;
