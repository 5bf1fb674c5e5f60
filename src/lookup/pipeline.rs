//! Query orchestration.
//!
//! [`LookupPipeline`] runs one query end to end:
//! select backend → fetch → parse → attach "view more" → format.
//! Each query performs exactly one fetch; nothing is retried or cached.

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::LookupConfig;
use crate::lookup::backend::Backend;
use crate::lookup::render;
use crate::model::{PackageQuery, RawResponse, ResultSet};
use crate::traits::{Fetcher, LookupError};

// ============================================================================
// Pipeline Types
// ============================================================================

/// Outcome of a successful lookup.
#[derive(Debug, Clone)]
pub struct LookupResult {
    pub backend: Backend,
    pub result_set: ResultSet,
    /// One-line rendering of `result_set`.
    pub summary: String,
    pub stats: LookupStats,
}

#[derive(Debug, Default, Clone)]
pub struct LookupStats {
    pub total_duration_ms: u64,
    pub fetch_duration_ms: u64,
    pub parse_duration_ms: u64,
    pub bytes_fetched: usize,
    /// Entries carried after merging.
    pub entries: usize,
}

// ============================================================================
// Pipeline Executor
// ============================================================================

pub struct LookupPipeline<F>
where
    F: Fetcher,
{
    fetcher: F,
    config: LookupConfig,
}

impl<F> LookupPipeline<F>
where
    F: Fetcher,
{
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            config: LookupConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LookupConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = max_results;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs `query` against its backend.
    ///
    /// # Errors
    ///
    /// - [`LookupError::UnknownDistribution`] if no backend serves the release
    /// - [`LookupError::Network`] from the fetcher, unchanged
    /// - [`LookupError::NotFound`] / [`LookupError::Parse`] from the adapter
    pub async fn execute(&self, query: &PackageQuery) -> Result<LookupResult, LookupError> {
        let start = Instant::now();
        let mut stats = LookupStats::default();

        let backend = Backend::select(query)?;
        let url = backend.request_url(query, &self.config);
        debug!(backend = %backend, url = %url, "Fetching");

        // ====================================================================
        // Fetch
        // ====================================================================

        let fetch_start = Instant::now();
        let fetched = self.fetcher.fetch(&url).await?;
        stats.fetch_duration_ms = fetch_start.elapsed().as_millis() as u64;
        stats.bytes_fetched = fetched.body.len();
        info!(
            backend = backend.id(),
            duration_ms = stats.fetch_duration_ms,
            bytes = stats.bytes_fetched,
            "Fetch completed"
        );

        // ====================================================================
        // Parse
        // ====================================================================

        let parse_start = Instant::now();
        let raw = RawResponse {
            body: fetched.body,
            content_type: fetched.content_type,
            format: backend.raw_format(),
        };
        let result_set = match backend.parse(&raw, query) {
            Ok(set) => set.with_view_more(backend.view_more(query, &self.config)),
            Err(e) => {
                if matches!(e, LookupError::Parse { .. }) {
                    warn!(backend = backend.id(), url = %url, error = %e, "Unparseable response");
                }
                return Err(e);
            }
        };
        stats.parse_duration_ms = parse_start.elapsed().as_millis() as u64;
        stats.entries = result_set.len();

        let verbose = query.verbose || self.config.verbose;
        let summary = render::format(&result_set, self.config.max_results, verbose);

        stats.total_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            backend = backend.id(),
            duration_ms = stats.total_duration_ms,
            entries = stats.entries,
            total = result_set.total_count,
            "Lookup completed"
        );

        Ok(LookupResult {
            backend,
            result_set,
            summary,
            stats,
        })
    }

    /// Runs `query` and returns only the formatted summary.
    pub async fn summarize(&self, query: &PackageQuery) -> Result<String, LookupError> {
        self.execute(query).await.map(|result| result.summary)
    }
}

// ============================================================================
// Tests
// ============================================================================
