use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::Selector;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::parser::nodes::{parse_selector, Page};

const USER_AGENT: &str = concat!("book_scraper/", env!("CARGO_PKG_VERSION"));

/// Any failure while retrieving a page. Always fatal to the current run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Retrieves a page and hands back its container nodes and visible text.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    container: Selector,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        let container = parse_selector(&config.container_selector)?;
        Ok(Self { client, container })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!("GET {}", parsed);
        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let html = response.text().await?;

        Ok(Page::from_html(&html, &self.container))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Loopback tests must not go through a proxy configured in the environment.
    fn local_fetcher() -> HttpFetcher {
        HttpFetcher {
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
            container: parse_selector("article").unwrap(),
        }
    }

    /// Answers a single connection with `response` and returns the base URL.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn server_error_becomes_status() {
        let base = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let url = format!("{}/index.html", base);
        let fetcher = local_fetcher();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { ref url, status: 500 } if url.ends_with("/index.html")));
    }

    #[tokio::test]
    async fn success_is_parsed_into_page() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 80\r\nConnection: close\r\n\r\n\
             <html><body><article><h2>T</h2><p>ISBN 9781617293290</p></article></body></html>",
        )
        .await;
        let fetcher = local_fetcher();
        let page = fetcher.fetch(&format!("{}/book.html", base)).await.unwrap();
        assert_eq!(page.nodes.len(), 2);
        assert!(page.text.contains("9781617293290"));
    }

    #[tokio::test]
    async fn connection_refused_is_a_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = local_fetcher();
        let err = fetcher.fetch(&format!("http://{}/index.html", addr)).await.unwrap_err();
        assert!(matches!(err, FetchError::Request(_)));
    }

    #[tokio::test]
    async fn rejects_malformed_url() {
        let fetcher = local_fetcher();
        let err = fetcher.fetch("not_a_url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { ref url, .. } if url == "not_a_url"));
    }

    #[test]
    fn rejects_bad_container_selector() {
        let config = Config {
            container_selector: "<<".into(),
            ..Config::default()
        };
        assert!(HttpFetcher::new(&config).is_err());
    }
}
