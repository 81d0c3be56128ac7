//! Response decoder module
//!
//! Supports: JSON, XML
//!
//! # Overview
//!
//! The decode module turns a response body into raw records plus the
//! pagination block the body carries, if any. JSON records become object
//! trees, XML records stay element trees so the flattener can keep
//! attributes and text apart.

mod decoders;
mod types;

pub use decoders::{create_decoder, JsonDecoder, XmlDecoder};
pub use types::{DecodedPage, DecoderConfig, DecoderFormat, RecordDecoder};
