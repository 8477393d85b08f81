//! Deferred, unevaluated expressions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An unevaluated expression.
///
/// Holds the raw source text of an expression-typed variable. This crate
/// never parses or evaluates it; the owning layer hands [`source`] to an
/// external expression engine together with a value provider keyed by
/// variable name.
///
/// [`source`]: Expression::source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression {
    source: String,
}

impl Expression {
    /// Wrap raw source text without evaluating it.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    /// The raw source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Consume the wrapper, yielding the raw source text.
    #[must_use]
    pub fn into_source(self) -> String {
        self.source
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for Expression {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for Expression {
    fn from(source: String) -> Self {
        Self { source }
    }
}
