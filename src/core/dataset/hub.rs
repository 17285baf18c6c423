//! Streaming rows of a hub-hosted dataset.
//!
//! Rows are pulled from the datasets-server `/rows` endpoint one page
//! at a time, so indexing can start before the dataset is fully
//! downloaded. Each page is a blocking HTTP call; there is no retry.

use crate::core::error::{Result, SpaceriniError};
use crate::core::types::Row;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::VecDeque;

/// Maximum page size accepted by the `/rows` endpoint
pub const ROWS_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEntry>,
    #[serde(default)]
    num_rows_total: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: Row,
}

#[derive(Debug, Deserialize)]
struct SplitsResponse {
    splits: Vec<SplitEntry>,
}

#[derive(Debug, Deserialize)]
struct SplitEntry {
    config: String,
    split: String,
}

/// One-pass iterator over the rows of a hub dataset split
pub struct HubRowStream {
    client: Client,
    endpoint: String,
    token: Option<String>,
    dataset: String,
    config: String,
    split: String,
    offset: usize,
    total: Option<usize>,
    buffer: VecDeque<Row>,
    done: bool,
}

impl std::fmt::Debug for HubRowStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubRowStream")
            .field("dataset", &self.dataset)
            .field("config", &self.config)
            .field("split", &self.split)
            .field("offset", &self.offset)
            .finish()
    }
}

impl HubRowStream {
    /// Open a stream, discovering the dataset config when not given
    pub fn open(
        endpoint: &str,
        token: Option<&str>,
        dataset: &str,
        config: Option<&str>,
        split: &str,
    ) -> Result<Self> {
        let client = Client::builder().build()?;
        let endpoint = endpoint.trim_end_matches('/').to_string();

        let config = match config {
            Some(c) => c.to_string(),
            None => discover_config(&client, &endpoint, token, dataset, split)?,
        };

        tracing::info!(
            "Streaming hub dataset {} (config={}, split={})",
            dataset,
            config,
            split
        );

        Ok(Self {
            client,
            endpoint,
            token: token.map(str::to_string),
            dataset: dataset.to_string(),
            config,
            split: split.to_string(),
            offset: 0,
            total: None,
            buffer: VecDeque::new(),
            done: false,
        })
    }

    /// Total row count, known once the first page has been fetched
    pub fn total_rows(&self) -> Option<usize> {
        self.total
    }

    fn fetch_page(&mut self) -> Result<()> {
        let offset = self.offset.to_string();
        let length = ROWS_PAGE_SIZE.to_string();
        let mut request = self
            .client
            .get(format!("{}/rows", self.endpoint))
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("config", self.config.as_str()),
                ("split", self.split.as_str()),
                ("offset", offset.as_str()),
                ("length", length.as_str()),
            ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let body = send_for_text(request)?;
        let page = parse_rows_page(&body)?;
        let fetched = page.rows.len();

        self.total = page.num_rows_total.or(self.total);
        self.offset += fetched;
        self.buffer.extend(page.rows.into_iter().map(|entry| entry.row));

        let exhausted = self.total.is_some_and(|total| self.offset >= total);
        if fetched == 0 || exhausted {
            self.done = true;
        }

        tracing::debug!(
            "Fetched {} rows from {} (offset now {})",
            fetched,
            self.dataset,
            self.offset
        );
        Ok(())
    }
}

impl Iterator for HubRowStream {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.done {
            if let Err(e) = self.fetch_page() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Only buffered rows are certain; the server's total may drift
        let buffered = self.buffer.len();
        (buffered, self.done.then_some(buffered))
    }
}

fn discover_config(
    client: &Client,
    endpoint: &str,
    token: Option<&str>,
    dataset: &str,
    split: &str,
) -> Result<String> {
    let mut request = client
        .get(format!("{endpoint}/splits"))
        .query(&[("dataset", dataset)]);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let body = send_for_text(request)?;
    pick_config(&body, dataset, split)
}

pub(crate) fn send_for_text(request: reqwest::blocking::RequestBuilder) -> Result<String> {
    let response = request.send()?;
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(SpaceriniError::RemoteApi(format!("{status}: {body}")));
    }
    Ok(body)
}

fn parse_rows_page(body: &str) -> Result<RowsPage> {
    Ok(serde_json::from_str(body)?)
}

/// Pick the first config that provides the requested split
fn pick_config(body: &str, dataset: &str, split: &str) -> Result<String> {
    let response: SplitsResponse = serde_json::from_str(body)?;
    response
        .splits
        .into_iter()
        .find(|entry| entry.split == split)
        .map(|entry| entry.config)
        .ok_or_else(|| {
            SpaceriniError::ConfigError(format!(
                "Dataset '{dataset}' has no split named '{split}'"
            ))
        })
}
