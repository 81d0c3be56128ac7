//! HTTP client module
//!
//! Provides the HTTP client used by page sources and session release.
//!
//! # Features
//!
//! - **Base URL joining**: request paths are resolved against the job's
//!   site URL
//! - **Default headers**: session token and accept type on every request
//! - **Status errors**: non-2xx responses fail with status and body

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
