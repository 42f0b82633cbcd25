//! CEF (Common Event Format) line parsing.
//!
//! Splits the fixed pipe-delimited header, re-segments the free-form
//! extension block into key/value pairs, and routes the result into a
//! vendor-specific field layout.
//!
//! # Architecture
//!
//! - `header`: strict 8-segment header splitting and validation
//! - `tokenizer`: lenient extension tokenizer (quoted and bracketed
//!   multi-token values, silent truncation at end of input)
//! - `json`: best-effort secondary JSON decode for designated fields
//! - `vendors/`: schema variants and the (vendor, product) dispatch table
//! - `event`: assembly and the uniform read/serialize API
//!
//! Header validation is strict; extension parsing is deliberately lenient.
//! Malformed extension content never fails a parse — it degrades to raw
//! text so best-effort telemetry stays available.

pub mod error;
pub mod event;
pub mod fields;
pub mod header;
pub mod json;
pub mod tokenizer;
pub mod vendors;

// Re-export commonly used types
pub use error::ParseError;
pub use event::CefEvent;
pub use fields::{FieldMap, FieldValue};
pub use header::MAX_LINE_LEN;
pub use tokenizer::parse_extensions;
pub use vendors::{
    CentrifyExtension, DefaultExtension, Extension, ExtensionSchema, ImpervaExtension,
};
