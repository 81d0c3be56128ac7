//! Tests for YAML loader module

use super::*;
use crate::decode::DecoderFormat;
use crate::output::OutputFormat;
use crate::pagination::PaginationConfig;
use reqwest::Method;
use std::path::PathBuf;

const PROJECTS_JOB: &str = r#"
name: projects
base_url: https://tableau.example.com/api/3.19
session:
  token_env: TABLEAU_TOKEN
  sign_out_path: /auth/signout
http:
  timeout_secs: 60
  headers:
    Accept: application/xml
request:
  path: /sites/site-1/projects
decoder:
  format: xml
  records: project
  pagination: pagination
pagination:
  type: page_number
  page_size: 500
hierarchy: {}
output:
  id_alias: LUID
  columns: [id, name, description, parentProjectId, projectLevel, owner.id]
  constants:
    site_id: site-1
  path: out/projects.csv
"#;

// ============================================================================
// Basic Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_job() {
    let yaml = r#"
name: users
base_url: https://api.example.com
request:
  path: /users
"#;

    let def = load_job_from_str(yaml).unwrap();
    assert_eq!(def.name, "users");
    assert_eq!(def.base_url, "https://api.example.com");
    assert_eq!(def.request.method().unwrap(), Method::GET);
    assert_eq!(def.decoder.format, DecoderFormat::Json);
    assert_eq!(def.pagination, PaginationConfig::default());
    assert!(def.session.is_none());
    assert!(def.explode.is_none());
    assert!(def.hierarchy.is_none());
    assert!(def.output.columns.is_auto());
    assert_eq!(def.output.timestamp_column, "AdminInsightsPublishedAt");
    assert_eq!(def.http.timeout_secs, 30);
}

#[test]
fn test_load_projects_job() {
    let def = load_job_from_str(PROJECTS_JOB).unwrap();

    let session = def.session.as_ref().unwrap();
    assert_eq!(session.token_env, "TABLEAU_TOKEN");
    assert_eq!(session.token_header, "X-Tableau-Auth");
    assert_eq!(session.sign_out_path.as_deref(), Some("/auth/signout"));

    assert_eq!(def.http.headers.get("Accept").map(String::as_str), Some("application/xml"));
    assert_eq!(def.decoder.format, DecoderFormat::Xml);
    assert_eq!(def.pagination, PaginationConfig::page_number(500));

    let fields = def.hierarchy.as_ref().unwrap();
    assert_eq!(fields.level_field, "projectLevel");

    assert_eq!(def.output.id_alias.as_deref(), Some("LUID"));
    assert_eq!(def.output.columns.columns().len(), 6);
    assert_eq!(def.output.constants.get("site_id").map(String::as_str), Some("site-1"));
    assert_eq!(def.output_path(), PathBuf::from("out/projects.csv"));
    assert_eq!(def.output_format(), OutputFormat::Csv);
}

#[test]
fn test_decoder_definition_to_config() {
    let def = load_job_from_str(PROJECTS_JOB).unwrap();
    let config = def.decoder.to_config();
    assert_eq!(config.format, DecoderFormat::Xml);
    assert_eq!(config.record_path.as_deref(), Some("project"));
    assert_eq!(config.pagination_path.as_deref(), Some("pagination"));
}

#[test]
fn test_graphql_request_defaults_to_post() {
    let yaml = r#"
name: datasources
base_url: https://tableau.example.com
request:
  path: /api/metadata/graphql
  graphql: "{ publishedDatasources { id name } }"
decoder:
  records: data.publishedDatasources
pagination:
  type: none
explode:
  path: upstreamTables
  alias: table
output:
  id_alias: ID
"#;

    let def = load_job_from_str(yaml).unwrap();
    let request = def.request.to_page_request().unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(
        request.body,
        Some(serde_json::json!({"query": "{ publishedDatasources { id name } }"}))
    );
    assert!(!def.pagination.is_paged());
    let explode = def.explode.unwrap();
    assert_eq!(explode.path, "upstreamTables");
    assert_eq!(explode.alias, "table");
}

#[test]
fn test_request_params_keep_order() {
    let yaml = r#"
name: workbooks
base_url: https://tableau.example.com
request:
  path: /sites/s/workbooks
  params:
    fields: _all_
    filter: "ownerName:eq:ann"
"#;
    let request = load_job_from_str(yaml).unwrap().request.to_page_request().unwrap();
    assert_eq!(
        request.query,
        vec![
            ("fields".to_string(), "_all_".to_string()),
            ("filter".to_string(), "ownerName:eq:ann".to_string()),
        ]
    );
}

#[test]
fn test_output_defaults_from_name_and_format() {
    let yaml = r#"
name: flows
base_url: https://tableau.example.com
request:
  path: /flows
output:
  format: parquet
"#;
    let def = load_job_from_str(yaml).unwrap();
    assert_eq!(def.output_format(), OutputFormat::Parquet);
    assert_eq!(def.output_path(), PathBuf::from("flows.parquet"));

    let yaml = r#"
name: flows
base_url: https://tableau.example.com
request:
  path: /flows
output:
  path: flows.parquet
"#;
    assert_eq!(load_job_from_str(yaml).unwrap().output_format(), OutputFormat::Parquet);
}

// ============================================================================
// Validation Tests
// ============================================================================

fn assert_invalid(yaml: &str, fragment: &str) {
    let err = load_job_from_str(yaml).unwrap_err();
    assert!(
        err.to_string().contains(fragment),
        "expected '{fragment}' in '{err}'"
    );
}

#[test]
fn test_empty_name_rejected() {
    assert_invalid(
        "name: ''\nbase_url: https://a.example\nrequest: {path: /x}",
        "name cannot be empty",
    );
}

#[test]
fn test_invalid_base_url_rejected() {
    assert_invalid(
        "name: j\nbase_url: not a url\nrequest: {path: /x}",
        "invalid base_url",
    );
}

#[test]
fn test_empty_path_rejected() {
    assert_invalid(
        "name: j\nbase_url: https://a.example\nrequest: {path: ''}",
        "path cannot be empty",
    );
}

#[test]
fn test_unsupported_method_rejected() {
    assert_invalid(
        "name: j\nbase_url: https://a.example\nrequest: {path: /x, method: DELETE}",
        "unsupported HTTP method",
    );
}

#[test]
fn test_body_and_graphql_rejected() {
    assert_invalid(
        "name: j\nbase_url: https://a.example\nrequest: {path: /x, body: {a: 1}, graphql: '{ x }'}",
        "both request body and graphql",
    );
}

#[test]
fn test_explode_with_xml_rejected() {
    let yaml = r#"
name: j
base_url: https://a.example
request: {path: /x}
decoder: {format: xml, records: item}
explode: {path: items, alias: item}
"#;
    assert_invalid(yaml, "explode requires the json decoder");
}

#[test]
fn test_zero_page_size_rejected() {
    assert_invalid(
        "name: j\nbase_url: https://a.example\nrequest: {path: /x}\npagination: {type: page_number, page_size: 0}",
        "page_size must be at least 1",
    );
}

#[test]
fn test_missing_required_field_rejected() {
    assert_invalid("name: j\nrequest: {path: /x}", "Failed to parse job YAML");
}

#[test]
fn test_unknown_pagination_type_rejected() {
    assert_invalid(
        "name: j\nbase_url: https://a.example\nrequest: {path: /x}\npagination: {type: cursor}",
        "Failed to parse job YAML",
    );
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_job_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.yaml");
    std::fs::write(&path, PROJECTS_JOB).unwrap();

    let def = load_job(&path).unwrap();
    assert_eq!(def.name, "projects");
}

#[test]
fn test_load_job_missing_file() {
    let err = load_job("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, crate::Error::FileNotFound { .. }));
}
