//! YAML parser for job definitions
//!
//! Parses and validates job YAML files.

use crate::decode::DecoderFormat;
use crate::error::{Error, Result};
use crate::loader::types::JobDefinition;
use crate::pagination::PaginationConfig;
use std::fs;
use std::path::Path;
use url::Url;

/// Load a job definition from a YAML file
pub fn load_job(path: impl AsRef<Path>) -> Result<JobDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read job file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_job_from_str(&content)
}

/// Load a job definition from a YAML string
pub fn load_job_from_str(yaml: &str) -> Result<JobDefinition> {
    let def: JobDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse job YAML: {e}")))?;

    validate_job(&def)?;
    Ok(def)
}

/// Validate a job definition
fn validate_job(def: &JobDefinition) -> Result<()> {
    if def.name.trim().is_empty() {
        return Err(Error::config("Job name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::config("Job base_url cannot be empty"));
    }
    Url::parse(&def.base_url).map_err(|e| {
        Error::config(format!(
            "Job '{}' has invalid base_url '{}': {e}",
            def.name, def.base_url
        ))
    })?;

    if def.request.path.is_empty() {
        return Err(Error::config(format!(
            "Job '{}' request path cannot be empty",
            def.name
        )));
    }

    def.request
        .method()
        .map_err(|e| Error::config(format!("Job '{}': {e}", def.name)))?;

    if def.request.body.is_some() && def.request.graphql.is_some() {
        return Err(Error::config(format!(
            "Job '{}' sets both request body and graphql",
            def.name
        )));
    }

    if let PaginationConfig::PageNumber { page_size: 0, .. } = def.pagination {
        return Err(Error::config(format!(
            "Job '{}' pagination page_size must be at least 1",
            def.name
        )));
    }

    if let Some(explode) = &def.explode {
        if explode.path.is_empty() || explode.alias.is_empty() {
            return Err(Error::config(format!(
                "Job '{}' explode needs both path and alias",
                def.name
            )));
        }
        if def.decoder.format != DecoderFormat::Json {
            return Err(Error::config(format!(
                "Job '{}' explode requires the json decoder",
                def.name
            )));
        }
    }

    if let Some(fields) = &def.hierarchy {
        if fields.id_field.is_empty() || fields.parent_field.is_empty() || fields.level_field.is_empty()
        {
            return Err(Error::config(format!(
                "Job '{}' hierarchy fields cannot be empty",
                def.name
            )));
        }
    }

    if let Some(session) = &def.session {
        if session.token_env.is_empty() {
            return Err(Error::missing_field("session.token_env"));
        }
    }

    if def.output.timestamp_column.is_empty() {
        return Err(Error::config(format!(
            "Job '{}' timestamp_column cannot be empty",
            def.name
        )));
    }

    Ok(())
}
