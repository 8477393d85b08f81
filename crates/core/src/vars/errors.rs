//! Error types for typed-value conversion.

use thiserror::Error;

use super::types::VariableType;

/// Errors that can occur when coercing a variable's raw text to its
/// declared type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// The raw text cannot be parsed as the declared type.
    ///
    /// Type inference never produces this state; it is reachable only when
    /// a caller overrides the type explicitly (e.g. type `Date` with raw
    /// text `"abc"`). That is a legitimate, surfaced failure, not a defect.
    #[error("cannot convert {raw:?} to {target}")]
    Unparsable {
        /// The raw text that failed to parse.
        raw: String,
        /// The type the text was being converted to.
        target: VariableType,
    },
}

impl ConversionError {
    pub(crate) fn unparsable(raw: &str, target: VariableType) -> Self {
        Self::Unparsable { raw: raw.to_string(), target }
    }
}
