//! Named, typed, text-backed variables.
//!
//! A [`Variable`] stores its value as raw text and coerces it to a concrete
//! runtime type on demand. When no type has been declared, setting a value
//! guesses one from the text (int, long, double, decimal, boolean, date,
//! falling back to string), so end users never have to annotate types by
//! hand. Every successful mutation notifies an observer callback supplied at
//! construction, which the owning page/UI layer uses to re-render or persist.
//!
//! Expression-typed variables are never evaluated here; their text is handed
//! to an external expression engine as an opaque [`Expression`].

pub mod errors;
pub mod expression;
pub mod types;
pub mod variable;

pub use errors::ConversionError;
pub use expression::Expression;
pub use types::{TypedValue, VariableType, infer_type};
pub use variable::Variable;
