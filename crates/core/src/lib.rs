#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod vars;

pub use vars::{ConversionError, Expression, TypedValue, Variable, VariableType};

#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
