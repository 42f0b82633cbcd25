use thiserror::Error;

/// Errors surfaced by the parsing pipeline.
///
/// Every variant is returned to the caller; none is fatal to the process
/// and none is retried. Unterminated extension delimiters and failed
/// embedded-JSON decodes have no variant here: both degrade to raw text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Raw input is empty or exceeds [`MAX_LINE_LEN`](crate::header::MAX_LINE_LEN) bytes.
    #[error("invalid CEF string length: {0} bytes")]
    InvalidLength(usize),

    /// Input does not match the `CEF:` 8-segment pipe grammar.
    #[error("invalid CEF format")]
    InvalidFormat,

    /// A header component fails the charset/length rule.
    #[error("invalid CEF component: {0}")]
    InvalidComponent(&'static str),

    /// `get_field` was asked for a name the active variant does not declare.
    #[error("field {0} not found")]
    FieldNotFound(String),

    /// Cancellation observed at the checkpoint before extension parsing.
    #[error("parse cancelled")]
    Cancelled,
}
