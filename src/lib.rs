//! # avro2json
//!
//! Convert [Apache Avro](https://avro.apache.org/) object container files
//! into JSON, unwrapping `Body` envelope fields along the way.
//!
//! ## Features
//!
//! - Reads any number of container files, each with its own embedded schema
//! - Concatenates all records into a single JSON array
//! - Unwraps a `Body` field (string or bytes) and re-parses it as JSON,
//!   splicing JSON arrays element by element
//! - Coerces non-JSON Avro values (bytes, logical types, ...) to strings
//! - Typed errors with an [`ErrorKind`] callers can branch on
//! - CLI tool `avro2json`
//!
//! ## Example (Programmatic Usage)
//!
//! ```no_run
//! use avro2json::{convert, Conversion, ConvertOptions};
//!
//! let options = ConvertOptions::new(["topic_1.avro", "topic_2.avro"]);
//! match convert(&options) {
//!     Ok(Conversion::Json(json)) => println!("{json}"),
//!     Ok(_) => {}
//!     Err(e) => eprintln!("{} ({})", e, e.kind()),
//! }
//! ```
//!
//! ## Example (CLI)
//!
//! ```bash
//! avro2json topic_1.avro topic_2.avro --output topic.json
//! ```
//!
//! ## Crate Layout
//!
//! - [`reader`] — Decode Avro container files into records
//! - [`value`] — Avro value → JSON value coercion
//! - [`body`] — `Body` envelope extraction
//! - [`converter`] — End-to-end conversion and output handling
//! - [`error`] — Error type and kinds
//!
//! The CLI binary is enabled with the `cli` feature (on by default).
pub mod body;
pub mod converter;
pub mod error;
pub mod reader;
pub mod value;

pub use converter::{avro_to_json, avro_to_json_reporting, convert, Conversion, ConvertOptions};
pub use error::{Error, ErrorKind};
