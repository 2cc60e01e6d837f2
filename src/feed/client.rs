use crate::config::SourceConfig;
use crate::sync::SyncError;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// Where the sync engine pulls raw document bodies from.
pub trait DocumentSource {
  /// Fetch the full document body as text.
  async fn fetch(&self) -> Result<String, SyncError>;
}

/// HTTP client for the published dashboard document
pub struct FeedClient {
  http: reqwest::Client,
  url: Url,
  credential: Option<String>,
}

impl FeedClient {
  pub fn new(config: &SourceConfig, credential: Option<String>) -> Result<Self> {
    let url = config.parsed_url()?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      url,
      credential,
    })
  }

  pub fn url(&self) -> &Url {
    &self.url
  }
}

impl DocumentSource for FeedClient {
  async fn fetch(&self) -> Result<String, SyncError> {
    let mut request = self.http.get(self.url.clone());
    if let Some(credential) = &self.credential {
      request = request.header(AUTHORIZATION, format!("Basic {}", credential));
    }

    let response = request
      .send()
      .await
      .map_err(|e| SyncError::Transport(e.to_string()))?;

    check_status(response.status())?;

    response
      .text()
      .await
      .map_err(|e| SyncError::Transport(format!("Failed to read response body: {}", e)))
  }
}

/// Only a plain 200 counts as a successful fetch.
fn check_status(status: StatusCode) -> Result<(), SyncError> {
  if status == StatusCode::OK {
    Ok(())
  } else {
    Err(SyncError::HttpStatus(status.as_u16()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{serve, Reply};

  #[test]
  fn test_check_status_ok() {
    assert!(check_status(StatusCode::OK).is_ok());
  }

  #[test]
  fn test_check_status_rejects_other_success_codes() {
    assert!(matches!(
      check_status(StatusCode::NO_CONTENT),
      Err(SyncError::HttpStatus(204))
    ));
  }

  #[test]
  fn test_check_status_rejects_errors() {
    assert!(matches!(
      check_status(StatusCode::UNAUTHORIZED),
      Err(SyncError::HttpStatus(401))
    ));
    assert!(matches!(
      check_status(StatusCode::BAD_GATEWAY),
      Err(SyncError::HttpStatus(502))
    ));
  }

  fn client_for(base: &str, credential: Option<&str>) -> FeedClient {
    let config = SourceConfig {
      url: format!("{}/work.json", base),
      timeout_secs: 5,
      ..SourceConfig::default()
    };
    FeedClient::new(&config, credential.map(str::to_string)).unwrap()
  }

  #[tokio::test]
  async fn test_fetch_sends_basic_auth_and_returns_body() {
    let body = r#"{"data":{"issues":{},"events":[{"start":"09:00","title":"Stand-up"}]}}"#;
    let (base, server) = serve(vec![Reply::new(200, body)]).await;

    let fetched = client_for(&base, Some("dXNlcjpwdw==")).fetch().await.unwrap();
    assert_eq!(fetched, body);

    let requests = server.await.unwrap();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/work.json");
    assert_eq!(requests[0].header("authorization"), Some("Basic dXNlcjpwdw=="));
  }

  #[tokio::test]
  async fn test_fetch_without_credential_sends_no_auth() {
    let (base, server) = serve(vec![Reply::new(200, "{}")]).await;

    client_for(&base, None).fetch().await.unwrap();

    let requests = server.await.unwrap();
    assert_eq!(requests[0].header("authorization"), None);
  }

  #[tokio::test]
  async fn test_fetch_maps_error_status() {
    let (base, server) = serve(vec![Reply::new(500, "boom")]).await;

    let err = client_for(&base, Some("dXNlcjpwdw==")).fetch().await.unwrap_err();
    assert!(matches!(err, SyncError::HttpStatus(500)));
    assert_eq!(err.to_string(), "HTTP error 500");

    server.await.unwrap();
  }

  #[tokio::test]
  async fn test_fetch_unreachable_is_transport_error() {
    // Bind then drop, so nothing listens on the port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client_for(&base, None).fetch().await.unwrap_err();
    assert!(matches!(err, SyncError::Transport(_)));
  }

  #[test]
  fn test_new_rejects_bad_url() {
    let config = SourceConfig {
      url: "not a url".to_string(),
      ..SourceConfig::default()
    };
    assert!(FeedClient::new(&config, None).is_err());
  }
}
