//! # tracemap
//!
//! Generate and consume source maps (v3): a compact index correlating
//! positions in a generated artifact (compiled or minified output) with
//! positions in the original source files.
//!
//! ## Getting Started
//!
//! ```
//! use tracemap::{Mapping, SourceMapConsumer, SourceMapGenerator};
//!
//! // Accumulate mappings and serialize them
//! let mut generator = SourceMapGenerator::new();
//! generator.set_file("out.min.js");
//! generator.add_mapping(Mapping::new(0, 0).with_source("out.js", 0, 0));
//! generator.add_mapping(Mapping::new(0, 10).with_source("out.js", 2, 2).with_name("sum"));
//! let json = generator.generate().to_string().unwrap();
//!
//! // Parse a payload and query it
//! let consumer = SourceMapConsumer::from(json.into_bytes()).unwrap();
//! let found = consumer.mapping_for_line(1, 11).unwrap();
//! assert_eq!((found.source.as_str(), found.line, found.column), ("out.js", 3, 3));
//! assert_eq!(found.name.as_deref(), Some("sum"));
//! ```
//!
//! ## Overview
//!
//! ### `SourceMapGenerator`
//!
//! [SourceMapGenerator] accumulates [Mapping] events in any order, sorts and
//! delta-encodes them into the v3 `mappings` grammar, and produces a
//! [SourceMapPayload] ready for JSON serialization.
//!
//! ### `SourceMapConsumer`
//!
//! [SourceMapConsumer] parses a payload into per-generated-line entry tables
//! and answers forward (generated → original) lookups by binary search and
//! reverse (original → generated) lookups through a lazily built index. Its
//! lookup API is 1-based, matching stack traces and devtools.
//!
//! ### `Position`
//!
//! [Position] represents a 0-based line and 0-based column in a file.

mod consumer;
mod error;
mod generator;
mod interner;
mod mapping;
mod payload;
mod splitter;
mod vlq;

pub use consumer::*;
pub use error::*;
pub use generator::*;
pub use mapping::*;
pub use payload::SourceMapPayload;
