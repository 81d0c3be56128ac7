//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::decode::{create_decoder, DecoderConfig, DecoderFormat};
use crate::engine::{Extractor, RunOptions, RunStats};
use crate::error::{Error, Result};
use crate::flatten::flatten_record;
use crate::loader::{load_job, JobDefinition};
use crate::output::{create_sink, OutputFormat};
use crate::projection::GenerationStamp;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                job,
                input,
                output,
                format,
                stamp,
            } => {
                self.run_job(
                    job,
                    input.as_deref(),
                    output.clone(),
                    *format,
                    stamp.as_deref(),
                )
                .await
            }
            Commands::Validate { job } => self.validate(job),
            Commands::Flatten { input, records } => self.flatten(input, records.as_deref()),
        }
    }

    /// Run a job, from the API or from a saved response
    async fn run_job(
        &self,
        job_path: &Path,
        input: Option<&Path>,
        output: Option<PathBuf>,
        format: Option<OutputFormat>,
        stamp: Option<&str>,
    ) -> Result<()> {
        let job = load_job(job_path)?;

        let mut options = RunOptions::new();
        if let Some(path) = output {
            options = options.with_output_path(path);
        }
        if let Some(format) = format {
            options = options.with_output_format(format);
        }
        if let Some(stamp) = stamp {
            options = options.with_stamp(GenerationStamp::fixed(stamp));
        }
        let extractor = Extractor::new(job).with_options(options);

        self.log("INFO", format!("Running job '{}'", extractor.job().name));

        let stats = match input {
            Some(input) => {
                let mut sink = create_sink(extractor.output_format(), extractor.output_path());
                extractor.run_file(input, sink.as_mut()).await?
            }
            None => extractor.run_to_output().await?,
        };

        self.output_message(&stats_message(
            extractor.job(),
            &extractor.output_path(),
            &stats,
        ));
        Ok(())
    }

    /// Validate a job definition
    fn validate(&self, job_path: &Path) -> Result<()> {
        let job = load_job(job_path)?;

        let columns = if job.output.columns.is_auto() {
            "auto-discovered columns".to_string()
        } else {
            format!("{} declared columns", job.output.columns.columns().len())
        };
        self.log(
            "INFO",
            format!(
                "Job '{}' is valid: {} {} with {columns}, writing {}",
                job.name,
                job.request.method()?,
                job.request.path,
                job.output_path().display()
            ),
        );
        Ok(())
    }

    /// Print one ROW message per flat row of a saved response
    fn flatten(&self, input: &Path, records: Option<&str>) -> Result<()> {
        let body = fs::read_to_string(input).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: input.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let is_xml = input
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        let mut config = DecoderConfig {
            format: if is_xml {
                DecoderFormat::Xml
            } else {
                DecoderFormat::Json
            },
            ..DecoderConfig::default()
        };
        if let Some(path) = records {
            config = config.with_record_path(path);
        }

        let decoded = create_decoder(&config).decode(&body)?;
        for record in &decoded.records {
            let row: Map<String, Value> = flatten_record(record)
                .iter()
                .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
                .collect();
            self.output_message(&json!({ "type": "ROW", "row": row }));
        }

        self.log(
            "INFO",
            format!(
                "Flattened {} records from {}",
                decoded.records.len(),
                input.display()
            ),
        );
        Ok(())
    }

    fn log(&self, level: &str, message: String) {
        self.output_message(&json!({
            "type": "LOG",
            "log": { "level": level, "message": message }
        }));
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        let text = if self.cli.pretty {
            serde_json::to_string_pretty(msg)
        } else {
            serde_json::to_string(msg)
        };
        println!("{}", text.unwrap_or_default());
    }
}

fn stats_message(job: &JobDefinition, output: &Path, stats: &RunStats) -> Value {
    let mut message = json!({
        "type": "STATS",
        "stats": {
            "job": job.name,
            "output": output.display().to_string(),
            "pages": stats.pages_fetched,
            "records": stats.records_fetched,
            "rows": stats.rows_projected,
            "written": stats.rows_written,
            "duration_ms": stats.duration_ms,
        }
    });
    if let Some(report) = &stats.depths {
        let distribution: Map<String, Value> = report
            .distribution
            .iter()
            .map(|(depth, count)| (depth.to_string(), json!(count)))
            .collect();
        message["stats"]["levels"] = Value::Object(distribution);
        message["stats"]["cycles"] = json!(report.cycles);
    }
    message
}
