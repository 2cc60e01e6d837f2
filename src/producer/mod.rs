//! The `publish` job: collect issues from GitHub and publish the dashboard
//! document the display fetches.

pub mod api_types;
pub mod transform;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::cache::SnapshotStore;
use crate::config::ProducerConfig;
use crate::feed::{DashboardData, Issue, RemoteDocument};
use api_types::{
  ApiUserData, GraphQlRequest, GraphQlResponse, IssueQueryVariables, ISSUES_QUERY,
};

const USER_AGENT: &str = concat!("workboard/", env!("CARGO_PKG_VERSION"));

/// Informational header of a published document.
#[derive(Debug, Serialize)]
pub struct Metadata {
  pub generated_at: String,
  pub hostname: String,
  pub system: SystemInfo,
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
  pub platform: String,
  pub version: String,
  pub user: String,
}

impl Metadata {
  fn collect(now: DateTime<Utc>) -> Self {
    Self {
      generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
      hostname: gethostname::gethostname().to_string_lossy().into_owned(),
      system: SystemInfo {
        platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
        version: env!("CARGO_PKG_VERSION").to_string(),
        user: env_or_unknown("USER"),
      },
    }
  }
}

fn env_or_unknown(key: &str) -> String {
  std::env::var(key).unwrap_or_else(|_| "unknown".to_string())
}

/// Wrap grouped issues into a document the sync engine accepts. The producer
/// has no calendar source, so `events` is always empty.
pub fn build_document(
  issues: BTreeMap<String, Vec<Issue>>,
  now: DateTime<Utc>,
) -> Result<RemoteDocument> {
  let metadata = serde_json::to_value(Metadata::collect(now))?;

  Ok(RemoteDocument {
    metadata: Some(metadata),
    data: DashboardData {
      issues,
      events: Vec::new(),
    },
  })
}

/// What a publish run produced.
#[derive(Debug)]
pub struct PublishReport {
  pub issue_count: usize,
  pub fingerprint: String,
  pub uploaded: bool,
}

pub struct Publisher {
  http: reqwest::Client,
  config: ProducerConfig,
  token: String,
  credential: Option<String>,
}

impl Publisher {
  pub fn new(
    config: ProducerConfig,
    token: String,
    credential: Option<String>,
    timeout: std::time::Duration,
  ) -> Result<Self> {
    let http = reqwest::Client::builder()
      .user_agent(USER_AGENT)
      .timeout(timeout)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      config,
      token,
      credential,
    })
  }

  pub async fn run(&self) -> Result<PublishReport> {
    let now = Utc::now();
    let data = self.query_issues(now).await?;

    let issues = transform::transform(data, &self.config.project);
    let issue_count = issues.values().map(Vec::len).sum();
    info!(issue_count, project = %self.config.project, "Collected issues");

    let document = build_document(issues, now)?;
    let body = serde_json::to_string_pretty(&document)?;

    let outcome = SnapshotStore::new(&self.config.output)
      .commit(&body)
      .map_err(|e| eyre!("Failed to write {}: {}", self.config.output.display(), e))?;
    info!(path = %self.config.output.display(), fingerprint = outcome.fingerprint(), "Wrote document");

    let uploaded = match &self.config.publish_url {
      Some(url) => {
        self.upload(url, body).await?;
        info!(%url, "Uploaded document");
        true
      }
      None => false,
    };

    Ok(PublishReport {
      issue_count,
      fingerprint: outcome.fingerprint().to_string(),
      uploaded,
    })
  }

  async fn query_issues(&self, now: DateTime<Utc>) -> Result<ApiUserData> {
    let since = now - Duration::days(self.config.lookback_days);
    let request = GraphQlRequest {
      query: ISSUES_QUERY,
      variables: IssueQueryVariables {
        login: self.config.login.clone(),
        since: since.to_rfc3339_opts(SecondsFormat::Secs, true),
      },
    };

    let raw = self
      .http
      .post(&self.config.graphql_url)
      .bearer_auth(&self.token)
      .json(&request)
      .send()
      .await
      .map_err(|e| eyre!("Failed to query GitHub: {}", e))?
      .error_for_status()
      .map_err(|e| eyre!("GitHub query failed: {}", e))?
      .text()
      .await
      .map_err(|e| eyre!("Failed to read GitHub response: {}", e))?;

    if let Some(path) = &self.config.raw_response_path {
      SnapshotStore::new(path)
        .commit(&raw)
        .map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))?;
      debug!(path = %path.display(), "Saved raw GitHub response");
    }

    let response: GraphQlResponse<ApiUserData> = serde_json::from_str(&raw)
      .map_err(|e| eyre!("Failed to parse GitHub response: {}", e))?;

    into_data(response)
  }

  async fn upload(&self, url: &str, body: String) -> Result<()> {
    let mut request = self
      .http
      .put(url)
      .header(CONTENT_TYPE, "application/json")
      .body(body);
    if let Some(credential) = &self.credential {
      request = request.header(AUTHORIZATION, format!("Basic {}", credential));
    }

    request
      .send()
      .await
      .map_err(|e| eyre!("Failed to upload to {}: {}", url, e))?
      .error_for_status()
      .map_err(|e| eyre!("Upload to {} rejected: {}", url, e))?;

    Ok(())
  }
}

/// GraphQL reports failures in-band; surface them as errors.
fn into_data(response: GraphQlResponse<ApiUserData>) -> Result<ApiUserData> {
  if !response.errors.is_empty() {
    let messages: Vec<_> = response.errors.iter().map(|e| e.message.as_str()).collect();
    return Err(eyre!("GitHub query returned errors: {}", messages.join("; ")));
  }

  response
    .data
    .ok_or_else(|| eyre!("GitHub response contained no data"))
}
