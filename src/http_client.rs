use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

const REQUEST_TIMEOUT_SECS: u64 = 45;
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()
            .context("failed to build http client")
    })
}

/// Raw status and body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

/// A single HTTP GET. `Err` means the request never produced a status
/// (connect failure, timeout, unreadable body).
pub trait PageFetcher {
    fn get(&self, url: &str, timeout: Duration) -> Result<PageResponse>;
}

pub struct HttpPageFetcher {
    client: &'static Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn get(&self, url: &str, timeout: Duration) -> Result<PageResponse> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .context("request failed")?;
        let status = resp.status().as_u16();
        let body = resp.text().context("failed reading body")?;
        Ok(PageResponse { status, body })
    }
}
