//! Execution engine module
//!
//! Runs one job end to end.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Extractor` - Drains a page source, shapes the records into flat rows,
//!   computes hierarchy levels, projects onto the output schema and hands the
//!   table to a sink
//! - `RunOptions` - Per-run overrides (stamp, output path and format)
//! - `RunStats` - Counters for a finished run
//!
//! Rows are only projected after the source is exhausted, since depth
//! resolution and auto-discovered headers need the whole collection.

mod types;

pub use types::{RunOptions, RunStats};

use crate::decode::create_decoder;
use crate::error::{Error, Result};
use crate::flatten::{explode, flatten_record};
use crate::hierarchy::annotate_levels;
use crate::http::{HttpClient, HttpClientConfig};
use crate::loader::JobDefinition;
use crate::output::{create_sink, OutputFormat, RowSink};
use crate::pagination::{collect_records, HttpPageSource, PageSource, StaticPageSource};
use crate::projection::{GenerationStamp, Projector, Table};
use crate::session::{with_session, Session, TokenSession};
use crate::types::{FlatRow, RawRecord};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs a job definition
#[derive(Debug, Clone)]
pub struct Extractor {
    job: JobDefinition,
    options: RunOptions,
}

impl Extractor {
    /// Create an extractor for a job
    pub fn new(job: JobDefinition) -> Self {
        Self {
            job,
            options: RunOptions::default(),
        }
    }

    /// Apply run overrides
    #[must_use]
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// The job being run
    pub fn job(&self) -> &JobDefinition {
        &self.job
    }

    /// Effective output file
    pub fn output_path(&self) -> PathBuf {
        self.options
            .output_path
            .clone()
            .unwrap_or_else(|| self.job.output_path())
    }

    /// Effective output format
    pub fn output_format(&self) -> OutputFormat {
        match (&self.options.output_format, &self.options.output_path) {
            (Some(format), _) => *format,
            (None, Some(path)) => OutputFormat::from_path(path),
            (None, None) => self.job.output_format(),
        }
    }

    /// Projector configured from the job's output section
    pub fn projector(&self) -> Projector {
        let projector = match &self.job.output.id_alias {
            Some(alias) => Projector::with_id_alias(alias),
            None => Projector::default(),
        };
        projector.with_timestamp_column(&self.job.output.timestamp_column)
    }

    // ========================================================================
    // Row shaping
    // ========================================================================

    /// Flatten (or explode) records and add the job's constant columns
    pub fn shape_records(&self, records: &[RawRecord]) -> Vec<FlatRow> {
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            match (&self.job.explode, record) {
                (Some(settings), RawRecord::Tree(node)) => {
                    rows.extend(explode(node, &settings.path, &settings.alias));
                }
                (Some(_), RawRecord::Markup(_)) => {
                    warn!("Explode is not supported for markup records, flattening instead");
                    rows.push(flatten_record(record));
                }
                (None, _) => rows.push(flatten_record(record)),
            }
        }

        let constants = &self.job.output.constants;
        if !constants.is_empty() {
            for row in &mut rows {
                for (key, value) in constants {
                    row.insert(key, value);
                }
            }
        }

        debug!("Shaped {} records into {} rows", records.len(), rows.len());
        rows
    }

    /// Shape, annotate and project collected records into a table
    pub fn process_records(&self, records: &[RawRecord], stats: &mut RunStats) -> Table {
        let mut rows = self.shape_records(records);
        stats.rows_projected = rows.len();

        stats.depths = self
            .job
            .hierarchy
            .as_ref()
            .map(|fields| annotate_levels(&mut rows, fields));

        let stamp = self
            .options
            .stamp
            .clone()
            .unwrap_or_else(GenerationStamp::now);
        self.projector()
            .project_with_stamp(&rows, &self.job.output.columns, stamp)
    }

    // ========================================================================
    // Running
    // ========================================================================

    /// Drain `source`, project its records and write the table to `sink`
    pub async fn run_source<S>(&self, source: &mut S, sink: &mut dyn RowSink) -> Result<RunStats>
    where
        S: PageSource + ?Sized,
    {
        let start = Instant::now();
        let mut stats = RunStats::new();

        let collected = collect_records(source).await?;
        stats.pages_fetched = collected.pages;
        stats.records_fetched = collected.records.len();
        debug!("Job '{}': source drained", self.job.name);

        let table = self.process_records(&collected.records, &mut stats);
        stats.rows_written = sink.write(&table)?;

        #[allow(clippy::cast_possible_truncation)]
        stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            "Job '{}': wrote {} rows with {} columns in {}ms",
            self.job.name,
            stats.rows_written,
            table.headers().len(),
            stats.duration_ms
        );
        if stats.cycles() > 0 {
            warn!(
                "Job '{}': {} hierarchy cycles were broken",
                self.job.name,
                stats.cycles()
            );
        }

        Ok(stats)
    }

    /// Run the job against its remote API, writing to `sink`
    ///
    /// When the job declares a session, its token is read from the
    /// environment and released once the run ends.
    pub async fn run(&self, sink: &mut dyn RowSink) -> Result<RunStats> {
        let Some(config) = &self.job.session else {
            let client = self.client(Vec::new())?;
            return self.fetch(client, sink).await;
        };

        let mut session = TokenSession::from_config(config)?;
        if let Some(path) = &config.sign_out_path {
            session = session.with_sign_out(self.client(Vec::new())?, path);
        }
        self.run_with_session(&session, sink).await
    }

    /// Run the job with a caller-supplied session, releasing it afterwards
    pub async fn run_with_session<S>(&self, session: &S, sink: &mut dyn RowSink) -> Result<RunStats>
    where
        S: Session + ?Sized,
    {
        let client = self.client(session.headers())?;
        with_session(session, self.fetch(client, sink)).await
    }

    /// Run the job and write to its configured output file
    pub async fn run_to_output(&self) -> Result<RunStats> {
        let path = self.output_path();
        let mut sink = create_sink(self.output_format(), path.clone());
        let stats = self.run(sink.as_mut()).await?;
        info!("Output written to {}", path.display());
        Ok(stats)
    }

    /// Run the job over one saved response body instead of the remote API
    pub async fn run_file(&self, input: &Path, sink: &mut dyn RowSink) -> Result<RunStats> {
        let body = fs::read_to_string(input).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: input.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        let decoded = create_decoder(&self.job.decoder.to_config()).decode(&body)?;
        debug!("Decoded {} records from {}", decoded.records.len(), input.display());

        let mut source = StaticPageSource::single(decoded.records);
        self.run_source(&mut source, sink).await
    }

    async fn fetch(&self, client: HttpClient, sink: &mut dyn RowSink) -> Result<RunStats> {
        let request = self.job.request.to_page_request()?;
        let decoder = create_decoder(&self.job.decoder.to_config());
        let mut source =
            HttpPageSource::new(client, request, decoder, self.job.pagination.clone());
        self.run_source(&mut source, sink).await
    }

    fn client(&self, session_headers: Vec<(String, String)>) -> Result<HttpClient> {
        let config = HttpClientConfig::builder()
            .base_url(&self.job.base_url)
            .timeout(self.job.http.timeout())
            .headers(
                self.job
                    .http
                    .headers
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone())),
            )
            .headers(session_headers)
            .build();
        HttpClient::with_config(config)
    }
}
