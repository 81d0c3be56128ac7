//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML job → HTTP requests → CSV/Parquet output

use insights_extract::flatten::flatten;
use insights_extract::output::CsvSink;
use insights_extract::{
    load_job, load_job_from_str, Extractor, GenerationStamp, Node, RunOptions,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs::File;
use std::path::Path;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STAMP: &str = "2026-05-01T00:00:00.000000+00:00";

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn projects_page(number: u32, total: u32, projects: &[(&str, &str, &str)]) -> String {
    let items: String = projects
        .iter()
        .map(|(id, name, parent)| {
            format!(
                r#"<project id="{id}" name="{name}" parentProjectId="{parent}"><owner id="u-{id}"/></project>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<tsResponse xmlns="http://tableau.com/api">
  <pagination pageNumber="{number}" pageSize="2" totalAvailable="{total}"/>
  <projects>{items}</projects>
</tsResponse>"#
    )
}

// ============================================================================
// Projects: XML pages, session, hierarchy levels, CSV
// ============================================================================

#[tokio::test]
async fn test_projects_job_to_csv() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/3.19/sites/site-1/projects"))
        .and(query_param("pageNumber", "1"))
        .and(header("X-Tableau-Auth", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(projects_page(
            1,
            3,
            &[("p1", "Top", ""), ("p3", "Grandchild", "p2")],
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3.19/sites/site-1/projects"))
        .and(query_param("pageNumber", "2"))
        .and(header("X-Tableau-Auth", "secret-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(projects_page(2, 3, &[("p2", "Child", "p1")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/3.19/auth/signout"))
        .and(header("X-Tableau-Auth", "secret-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    std::env::set_var("INSIGHTS_EXTRACT_IT_PROJECTS_TOKEN", "secret-token");

    let dir = tempfile::tempdir().unwrap();
    let job_path = dir.path().join("projects.yaml");
    let output = dir.path().join("projects.csv");
    let yaml = format!(
        r#"
name: projects
base_url: {base}/api/3.19
session:
  token_env: INSIGHTS_EXTRACT_IT_PROJECTS_TOKEN
  sign_out_path: /auth/signout
request:
  path: /sites/site-1/projects
decoder:
  format: xml
  records: project
  pagination: pagination
pagination:
  type: page_number
  page_size: 2
hierarchy: {{}}
output:
  id_alias: LUID
  columns: [id, name, parentProjectId, owner.id, projectLevel]
  constants:
    siteLuid: site-1
  path: {output}
"#,
        base = server.uri(),
        output = output.display()
    );
    std::fs::write(&job_path, yaml).unwrap();

    let job = load_job(&job_path).unwrap();
    let stats = Extractor::new(job)
        .with_options(RunOptions::new().with_stamp(GenerationStamp::fixed(STAMP)))
        .run_to_output()
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.rows_written, 3);

    let (headers, rows) = read_csv(&output);
    assert_eq!(
        headers,
        vec![
            "LUID",
            "Name",
            "Parent Project Id",
            "Owner Id",
            "Project Level",
            "Admin Insights Published At"
        ]
    );
    assert_eq!(
        rows,
        vec![
            vec!["p1", "Top", "", "u-p1", "0", STAMP],
            vec!["p3", "Grandchild", "p2", "u-p3", "2", STAMP],
            vec!["p2", "Child", "p1", "u-p2", "1", STAMP],
        ]
    );
}

// ============================================================================
// Datasources: GraphQL, explode, Parquet
// ============================================================================

#[tokio::test]
async fn test_graphql_explode_job_to_parquet() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/metadata/graphql"))
        .and(body_json(json!({"query": "{ publishedDatasources { id name upstreamTables { name } } }"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"publishedDatasources": [
                {"id": "d1", "name": "Orders", "upstreamTables": [
                    {"name": "orders", "database": {"connectionType": "postgres"}},
                    {"name": "returns", "database": {"connectionType": "postgres"}}
                ]},
                {"id": "d2", "name": "Empty", "upstreamTables": []}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let yaml = r#"
name: datasources
base_url: "{base}"
request:
  path: /api/metadata/graphql
  graphql: "{ publishedDatasources { id name upstreamTables { name } } }"
decoder:
  records: data.publishedDatasources
pagination:
  type: none
explode:
  path: upstreamTables
  alias: table
output:
  id_alias: ID
  format: parquet
"#
    .replace("{base}", &server.uri());

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("datasources.parquet");
    let stats = Extractor::new(load_job_from_str(&yaml).unwrap())
        .with_options(
            RunOptions::new()
                .with_stamp(GenerationStamp::fixed(STAMP))
                .with_output_path(&output),
        )
        .run_to_output()
        .await
        .unwrap();

    assert_eq!(stats.records_fetched, 2);
    assert_eq!(stats.rows_written, 3);

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&output).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total, 3);

    let schema = batches[0].schema();
    let headers: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert!(headers.contains(&"ID"));
    assert_eq!(headers.last(), Some(&"Admin Insights Published At"));
}

// ============================================================================
// Error paths
// ============================================================================

#[tokio::test]
async fn test_http_error_leaves_no_output() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flows"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let yaml = format!(
        "name: flows\nbase_url: {}\nrequest: {{path: /flows}}",
        server.uri()
    );
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("flows.csv");
    let mut sink = CsvSink::new(&output);

    let err = Extractor::new(load_job_from_str(&yaml).unwrap())
        .run(&mut sink)
        .await
        .unwrap_err();

    assert!(err.is_remote());
    assert!(!output.exists());
}

// ============================================================================
// Flattening
// ============================================================================

#[test]
fn test_flatten_nested_document() {
    let node = Node::from(json!({"a": {"b": 1, "c": [2, 3]}}));
    let row = flatten(&node, "");
    let pairs: Vec<(&str, &str)> = row.iter().collect();
    assert_eq!(pairs, vec![("a.b", "1"), ("a.c.[0]", "2"), ("a.c.[1]", "3")]);
}
