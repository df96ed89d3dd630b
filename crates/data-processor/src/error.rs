//! Error types for snapshot processing.

use thiserror::Error;

/// Errors raised while turning a snapshot payload into tables.
///
/// Processing is deliberately fail-loud only for structural problems: a
/// payload that reaches the processor is expected to have passed the
/// boundary validation, so a missing section is a contract violation, not
/// a recoverable condition. Field-level coercion failures never error.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// A required top-level section was absent from the payload
    #[error("snapshot payload missing section: {section}")]
    MissingSection { section: &'static str },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ProcessError>;
