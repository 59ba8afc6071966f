use log::info;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const CUSTOM_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// One result of the Custom Search API. Missing fields read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// One API response. `items` is absent when the engine has nothing more.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub items: Option<Vec<SearchItem>>,
    #[serde(skip)]
    pub start: u32,
}

impl SearchPage {
    pub fn items(&self) -> &[SearchItem] {
        self.items.as_deref().unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("API Error {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("Search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct SearchEngine {
    client: Client,
    api_key: String,
    engine_id: String,
    endpoint: String,
}

impl SearchEngine {
    pub fn new(api_key: &str, engine_id: &str) -> Result<Self, SearchError> {
        Self::with_endpoint(api_key, engine_id, CUSTOM_SEARCH_ENDPOINT)
    }

    pub fn with_endpoint(api_key: &str, engine_id: &str, endpoint: &str) -> Result<Self, SearchError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(SearchEngine {
            client,
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
            endpoint: endpoint.to_string(),
        })
    }

    fn request_url(&self, query: &str, start: u32) -> String {
        format!(
            "{}?key={}&cx={}&q={}&start={}",
            self.endpoint,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.engine_id),
            urlencoding::encode(query),
            start
        )
    }

    /// Fetches one page of results starting at the 1-based `start` offset.
    pub fn search(&self, query: &str, start: u32) -> Result<SearchPage, SearchError> {
        info!("Requesting results {}..{} for '{}'", start, start + 9, query);

        let resp = self.client.get(self.request_url(query, start)).send()?;
        let status = resp.status();

        if status != StatusCode::OK {
            let body = resp.text().unwrap_or_default();
            return Err(SearchError::Upstream { status, body });
        }

        let text = resp.text()?;
        let mut page: SearchPage = serde_json::from_str(&text)?;
        page.start = start;
        Ok(page)
    }
}
