//! Page-number pagination over one endpoint
//!
//! Requests `{base_url}{endpoint}?page={page}&limit={page_size}` starting at
//! page 1 and hands back one tagged outcome per call. The sequence is finite
//! and not restartable: once an `End` or `Error` outcome has been returned,
//! every further call yields `None`.

use std::fmt;

use jaffle_protocol::Batch;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::JaffleShopConfig;
use crate::error::ConnectorError;

/// Why a page sequence ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The API returned an empty page
    EmptyPage,
    /// The page ceiling was reached
    PageLimit,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPage => f.write_str("empty page"),
            Self::PageLimit => f.write_str("page limit"),
        }
    }
}

/// Result of one `next_page` call
#[derive(Debug)]
pub enum PageOutcome {
    /// A page of records
    Batch(Batch),
    /// Normal end of the sequence
    End(EndReason),
    /// Fetch or decode failed; the sequence is over
    Error(ConnectorError),
}

/// How a decoded response body is read
#[derive(Debug, PartialEq)]
pub(crate) enum PageBody {
    /// Nothing left to fetch
    Empty,
    /// Records to yield
    Records(Batch),
    /// Non-empty scalar body, nothing to yield
    Unrecognized(&'static str),
}

/// Lazily pages through one endpoint
pub struct Paginator {
    client: reqwest::Client,
    endpoint: String,
    url: String,
    page: u32,
    page_size: u32,
    max_pages: u32,
    finished: bool,
}

impl Paginator {
    /// Create a paginator for `endpoint` (which begins with `/`)
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        config: &JaffleShopConfig,
    ) -> Self {
        let endpoint = endpoint.into();
        let url = format!("{}{}", config.base_url, endpoint);
        Self {
            client,
            endpoint,
            url,
            page: 1,
            page_size: config.page_size,
            max_pages: config.max_pages,
            finished: false,
        }
    }

    /// Endpoint path this paginator walks
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a terminal outcome has already been returned
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fetch the next page
    ///
    /// Returns `None` once the sequence is over.
    pub async fn next_page(&mut self) -> Option<PageOutcome> {
        if self.finished {
            return None;
        }

        loop {
            if self.page > self.max_pages {
                debug!(
                    endpoint = %self.endpoint,
                    max_pages = self.max_pages,
                    "page ceiling reached"
                );
                return Some(self.finish(PageOutcome::End(EndReason::PageLimit)));
            }

            let body = match self.fetch(self.page).await {
                Ok(body) => body,
                Err(e) => {
                    let kind = if e.is_request_error() {
                        "Request"
                    } else {
                        "Unexpected"
                    };
                    warn!(
                        endpoint = %self.endpoint,
                        page = self.page,
                        error = %e,
                        "{} error for {}: {}",
                        kind,
                        self.endpoint,
                        e
                    );
                    return Some(self.finish(PageOutcome::Error(e)));
                }
            };

            match interpret_body(body) {
                PageBody::Empty => {
                    debug!(endpoint = %self.endpoint, page = self.page, "empty page");
                    return Some(self.finish(PageOutcome::End(EndReason::EmptyPage)));
                }
                PageBody::Records(batch) => {
                    debug!(
                        endpoint = %self.endpoint,
                        page = self.page,
                        records = batch.len(),
                        "fetched page"
                    );
                    self.page += 1;
                    return Some(PageOutcome::Batch(batch));
                }
                PageBody::Unrecognized(kind) => {
                    warn!(
                        endpoint = %self.endpoint,
                        page = self.page,
                        body = kind,
                        "page body is neither a list nor an object, skipping"
                    );
                    self.page += 1;
                }
            }
        }
    }

    fn finish(&mut self, outcome: PageOutcome) -> PageOutcome {
        self.finished = true;
        outcome
    }

    /// Fetch and decode one page (single attempt, no retry)
    async fn fetch(&self, page: u32) -> Result<Value, ConnectorError> {
        let url = format!("{}?page={}&limit={}", self.url, page, self.page_size);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Decide what a decoded body means
///
/// Arrays are yielded as-is. Objects prefer a non-empty `data` field, then a
/// non-empty `results` field, and otherwise count as one record.
pub(crate) fn interpret_body(body: Value) -> PageBody {
    if is_empty_value(&body) {
        return PageBody::Empty;
    }

    match body {
        Value::Array(items) => PageBody::Records(Batch::from_values(items)),
        Value::Object(mut map) => {
            for key in ["data", "results"] {
                if map.get(key).is_some_and(|v| !is_empty_value(v))
                    && let Some(inner) = map.remove(key)
                {
                    return PageBody::Records(into_batch(inner));
                }
            }
            PageBody::Records(Batch::single(map))
        }
        Value::String(_) => PageBody::Unrecognized("string"),
        Value::Number(_) => PageBody::Unrecognized("number"),
        Value::Bool(_) => PageBody::Unrecognized("bool"),
        Value::Null => PageBody::Empty,
    }
}

fn into_batch(value: Value) -> Batch {
    match value {
        Value::Array(items) => Batch::from_values(items),
        other => Batch::from_values([other]),
    }
}

/// Null, false, zero, and empty strings, arrays and objects all end pagination
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
