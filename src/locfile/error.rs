//! Custom error types for the locfile-reader crate.

use thiserror::Error;

/// The primary error type for all parse operations in this crate.
///
/// The two parsers fail differently on purpose: the properties parser
/// skips malformed lines and only fails on I/O, while the DTD parser
/// treats any markup it cannot tokenize as fatal for that file, because
/// a broken declarative-markup stream cannot be resynchronized.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An error originating from I/O while reading the source stream.
    #[error("I/O error: {0:?}")]
    Read(#[from] std::io::Error),

    /// The tokenizer scaffolding could not be assembled or failed outside
    /// the substituted source content. Indicates a setup problem, not a
    /// data problem.
    #[error("Parser configuration failed: {0}")]
    Configuration(String),

    /// Markup the DTD tokenizer cannot process at all. The line number is
    /// best-effort, mapped back into the original DTD stream.
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: u64, message: String },
}

/// A convenience `Result` type alias using the crate's `ParseError` type.
pub type Result<T> = std::result::Result<T, ParseError>;
