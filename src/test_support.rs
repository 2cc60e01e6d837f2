//! One-shot HTTP server on a loopback port, for tests that need to see what
//! actually goes over the wire.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as the server received it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
  pub method: String,
  pub path: String,
  pub headers: Vec<(String, String)>,
  pub body: String,
}

impl CapturedRequest {
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(key, _)| key.eq_ignore_ascii_case(name))
      .map(|(_, value)| value.as_str())
  }
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct Reply {
  pub status: u16,
  pub body: String,
}

impl Reply {
  pub fn new(status: u16, body: impl Into<String>) -> Self {
    Self {
      status,
      body: body.into(),
    }
  }
}

/// Serve `replies` in order, one connection each, then stop.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and a handle resolving to
/// the captured requests.
pub async fn serve(replies: Vec<Reply>) -> (String, JoinHandle<Vec<CapturedRequest>>) {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let base = format!("http://{}", listener.local_addr().unwrap());

  let handle = tokio::spawn(async move {
    let mut captured = Vec::new();
    for reply in replies {
      let (mut stream, _) = listener.accept().await.unwrap();
      captured.push(read_request(&mut stream).await);

      let response = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.body.len(),
        reply.body
      );
      stream.write_all(response.as_bytes()).await.unwrap();
      stream.shutdown().await.unwrap();
    }
    captured
  });

  (base, handle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> CapturedRequest {
  let mut raw = Vec::new();
  let mut chunk = [0u8; 4096];

  let head_end = loop {
    let n = stream.read(&mut chunk).await.unwrap();
    assert!(n > 0, "connection closed before the request head ended");
    raw.extend_from_slice(&chunk[..n]);
    if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
      break pos;
    }
  };

  let head = String::from_utf8_lossy(&raw[..head_end]).to_string();
  let mut lines = head.split("\r\n");
  let mut request_line = lines.next().unwrap_or_default().split(' ');
  let method = request_line.next().unwrap_or_default().to_string();
  let path = request_line.next().unwrap_or_default().to_string();

  let headers: Vec<(String, String)> = lines
    .filter_map(|line| line.split_once(':'))
    .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
    .collect();

  let content_length = headers
    .iter()
    .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
    .and_then(|(_, value)| value.parse::<usize>().ok())
    .unwrap_or(0);

  let mut body = raw[head_end + 4..].to_vec();
  while body.len() < content_length {
    let n = stream.read(&mut chunk).await.unwrap();
    if n == 0 {
      break;
    }
    body.extend_from_slice(&chunk[..n]);
  }

  CapturedRequest {
    method,
    path,
    headers,
    body: String::from_utf8_lossy(&body).to_string(),
  }
}
