//! Resource extraction
//!
//! A `ResourceExtractor` streams one resource's pages to its caller and keeps
//! the per-resource bookkeeping: how many records went out, and how the
//! extraction ended.

use std::fmt;

use jaffle_protocol::{Batch, Record, TableSpec};
use tracing::{info, warn};

use crate::config::JaffleShopConfig;
use crate::paginator::{EndReason, PageOutcome, Paginator};

/// Static description of one extractable collection
#[derive(Debug, Clone)]
pub struct ResourceDef {
    name: String,
    endpoint: String,
    table: TableSpec,
    placeholder: Record,
}

impl ResourceDef {
    /// Describe a resource
    ///
    /// `placeholder` is loaded in place of real data when the resource fails
    /// before yielding any record.
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        table: TableSpec,
        placeholder: Record,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            table,
            placeholder,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn table(&self) -> &TableSpec {
        &self.table
    }

    pub fn placeholder(&self) -> &Record {
        &self.placeholder
    }
}

/// How an extraction ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractStatus {
    /// Still yielding batches
    Running,
    /// Paginator ended normally
    Completed(EndReason),
    /// Failed after some records were yielded; those records stand
    Truncated { error: String },
    /// Failed before any record; the placeholder record was yielded
    Fallback { error: String },
}

impl ExtractStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Whether the extraction ended on an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Truncated { .. } | Self::Fallback { .. })
    }
}

impl fmt::Display for ExtractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Completed(reason) => write!(f, "completed ({})", reason),
            Self::Truncated { error } => write!(f, "truncated ({})", error),
            Self::Fallback { error } => write!(f, "placeholder loaded ({})", error),
        }
    }
}

/// Per-resource extraction bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Resource name
    pub resource: String,
    /// Records yielded, placeholder excluded
    pub records: u64,
    /// Batches yielded, placeholder excluded
    pub batches: u64,
    /// Terminal status
    pub status: ExtractStatus,
}

impl ExtractionResult {
    fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            records: 0,
            batches: 0,
            status: ExtractStatus::Running,
        }
    }
}

impl fmt::Display for ExtractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} records in {} batches, {}",
            self.resource, self.records, self.batches, self.status
        )
    }
}

/// Streams one resource's batches
pub struct ResourceExtractor {
    def: ResourceDef,
    paginator: Paginator,
    result: ExtractionResult,
}

impl ResourceExtractor {
    /// Create an extractor for `def`, sharing the given HTTP client
    pub fn new(def: ResourceDef, client: reqwest::Client, config: &JaffleShopConfig) -> Self {
        let paginator = Paginator::new(client, def.endpoint(), config);
        let result = ExtractionResult::new(def.name());
        Self {
            def,
            paginator,
            result,
        }
    }

    pub fn name(&self) -> &str {
        self.def.name()
    }

    pub fn table(&self) -> &TableSpec {
        self.def.table()
    }

    /// Records yielded and terminal status so far
    pub fn result(&self) -> &ExtractionResult {
        &self.result
    }

    /// Next non-empty batch, or `None` when the resource is exhausted
    pub async fn next_batch(&mut self) -> Option<Batch> {
        if self.result.status.is_finished() {
            return None;
        }

        loop {
            let Some(outcome) = self.paginator.next_page().await else {
                // Paginator closed without a terminal outcome reaching us
                self.complete(EndReason::EmptyPage);
                return None;
            };

            match outcome {
                PageOutcome::Batch(batch) => {
                    if batch.is_empty() {
                        continue;
                    }
                    self.result.records += batch.len() as u64;
                    self.result.batches += 1;
                    return Some(batch);
                }
                PageOutcome::End(reason) => {
                    self.complete(reason);
                    return None;
                }
                PageOutcome::Error(e) => {
                    let error = e.to_string();
                    if self.result.records == 0 {
                        warn!(
                            resource = %self.def.name(),
                            error = %error,
                            "Error extracting {}: {}",
                            self.def.name(),
                            error
                        );
                        self.result.status = ExtractStatus::Fallback { error };
                        return Some(Batch::single(self.def.placeholder().clone()));
                    }

                    self.log_summary();
                    warn!(
                        resource = %self.def.name(),
                        records = self.result.records,
                        error = %error,
                        "extraction stopped early, keeping partial result"
                    );
                    self.result.status = ExtractStatus::Truncated { error };
                    return None;
                }
            }
        }
    }

    fn complete(&mut self, reason: EndReason) {
        self.result.status = ExtractStatus::Completed(reason);
        self.log_summary();
    }

    fn log_summary(&self) {
        info!(
            resource = %self.def.name(),
            records = self.result.records,
            "{}: {} records extracted",
            title_case(self.def.name()),
            self.result.records
        );
    }
}

/// "customers" -> "Customers"
fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
