use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a profile page could not be used. Never shown to the user; the
/// pipeline falls back to the search snippet instead.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("could not read body: {0}")]
    Body(String),
}

pub struct PageFetcher {
    client: Option<Client>,
}

impl PageFetcher {
    pub fn new() -> Self {
        Self::with_timeout(PAGE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(PAGE_USER_AGENT));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .cookie_store(true)
            .build();

        // A fetcher without a client simply fails every request.
        let client = match client {
            Ok(c) => Some(c),
            Err(e) => {
                debug!("Could not build page client: {}", e);
                None
            }
        };

        PageFetcher { client }
    }

    /// One GET, no retry. Only a 200 response counts as a body.
    pub fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
        let parsed = Url::parse(url).map_err(|_| FetchFailure::InvalidUrl(url.to_string()))?;
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| FetchFailure::Transport("http client unavailable".to_string()))?;

        let resp = client
            .get(parsed)
            .send()
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            return Err(FetchFailure::Status(resp.status()));
        }

        resp.text().map_err(|e| FetchFailure::Body(e.to_string()))
    }

    /// Body text on success, empty string on any failure.
    pub fn fetch_page(&self, url: &str) -> String {
        match self.fetch(url) {
            Ok(body) => body,
            Err(e) => {
                debug!("Fetch of {} failed: {}", url, e);
                String::new()
            }
        }
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    /// Serves exactly one canned HTTP response on a local port and reports
    /// the request head it received.
    fn serve_once(response: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let n = stream.read(&mut buf).unwrap_or(0);
                let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (format!("http://{}/in/jane-doe", addr), rx)
    }

    /// Accepts one connection and never answers it.
    fn serve_silence() -> (String, mpsc::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (done_tx, done_rx) = mpsc::channel::<()>();
        thread::spawn(move || {
            if let Ok((_stream, _)) = listener.accept() {
                let _ = done_rx.recv();
            }
        });
        (format!("http://{}/in/slow", addr), done_tx)
    }

    #[test]
    fn test_ok_returns_body() {
        let (url, _rx) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 11\r\nConnection: close\r\n\r\nhello world");
        let fetcher = PageFetcher::new();
        assert_eq!(fetcher.fetch(&url).unwrap(), "hello world");
        let (url, _rx) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nhi");
        assert_eq!(fetcher.fetch_page(&url), "hi");
    }

    #[test]
    fn test_non_200_is_empty() {
        let (url, _rx) = serve_once("HTTP/1.1 403 Forbidden\r\nContent-Length: 6\r\nConnection: close\r\n\r\ndenied");
        let fetcher = PageFetcher::new();
        assert_eq!(fetcher.fetch_page(&url), "");

        let (url, _rx) = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 4\r\nConnection: close\r\n\r\nnope");
        match fetcher.fetch(&url) {
            Err(FetchFailure::Status(code)) => assert_eq!(code, StatusCode::NOT_FOUND),
            other => panic!("expected status failure, got {:?}", other),
        }
    }

    #[test]
    fn test_sends_browser_user_agent() {
        let (url, rx) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok");
        let fetcher = PageFetcher::new();
        assert_eq!(fetcher.fetch_page(&url), "ok");

        let head = rx.recv().unwrap();
        let user_agent = head
            .lines()
            .find(|l| l.to_ascii_lowercase().starts_with("user-agent:"))
            .unwrap();
        assert_eq!(
            user_agent.splitn(2, ':').nth(1).unwrap().trim(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"
        );
    }

    #[test]
    fn test_default_timeout_is_ten_seconds() {
        assert_eq!(PAGE_TIMEOUT, Duration::from_secs(10));
    }

    #[test]
    fn test_timeout_is_empty() {
        let (url, done) = serve_silence();
        let fetcher = PageFetcher::with_timeout(Duration::from_millis(200));

        let start = Instant::now();
        assert!(matches!(fetcher.fetch(&url), Err(FetchFailure::Transport(_))));
        assert!(start.elapsed() < Duration::from_secs(5));
        let _ = done.send(());

        let (url, done) = serve_silence();
        assert_eq!(fetcher.fetch_page(&url), "");
        let _ = done.send(());
    }

    #[test]
    fn test_connection_refused_is_empty() {
        // Bind then drop so the port is closed.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let fetcher = PageFetcher::new();
        let url = format!("http://127.0.0.1:{}/", port);
        assert!(matches!(fetcher.fetch(&url), Err(FetchFailure::Transport(_))));
        assert_eq!(fetcher.fetch_page(&url), "");
    }

    #[test]
    fn test_invalid_url_is_empty() {
        let fetcher = PageFetcher::new();
        assert!(matches!(fetcher.fetch("not a url"), Err(FetchFailure::InvalidUrl(_))));
        assert_eq!(fetcher.fetch_page(""), "");
    }
}
