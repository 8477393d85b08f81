//! Variable type tags, typed values, and type inference.
//!
//! Raw text is the storage format for every variable; this module owns the
//! mapping from `(type tag, raw text)` to a concrete [`TypedValue`], and the
//! ordered guessing that assigns a tag to untyped input.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ConversionError;
use super::expression::Expression;

/// The closed set of type tags a variable can carry.
///
/// `None` means "not yet typed": the next non-blank value assignment will
/// run inference. `Null` is a deliberate "always absent" type, distinct
/// from `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// Not yet typed; value assignment triggers inference.
    #[default]
    None,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 64-bit floating point.
    Double,
    /// Arbitrary-precision decimal.
    Decimal,
    /// Verbatim text.
    String,
    /// Date/time, parsed leniently from several common formats.
    Date,
    /// `true`/`false`, case-insensitive.
    Boolean,
    /// Always the absent value, regardless of raw text.
    Null,
    /// Deferred source text for an external expression engine.
    Expression,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Expression => "expression",
        };
        f.write_str(name)
    }
}

/// A variable's raw text coerced to its concrete runtime type.
///
/// Produced on demand by [`Variable::typed_value`]; never cached.
///
/// [`Variable::typed_value`]: super::variable::Variable::typed_value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypedValue {
    /// The absent value: untyped or `Null` variables, and blank numerics.
    Nothing,
    Int(i32),
    Long(i64),
    Double(f64),
    Decimal(BigDecimal),
    String(String),
    Date(NaiveDateTime),
    Boolean(bool),
    /// Unevaluated; handed to the external expression engine as-is.
    Expression(Expression),
}

impl TypedValue {
    /// Coerce raw text to the concrete value for `target`.
    ///
    /// Blank raw text (unset, empty, or whitespace-only) yields
    /// [`TypedValue::Nothing`] for the four numeric types. `Date` and
    /// `Boolean` carry no such guard and fail on blank input; this
    /// asymmetry is kept for compatibility with the behavior callers
    /// already depend on. `String` and `Expression` keep the text
    /// verbatim, including an empty string, and yield `Nothing` only when
    /// no value was ever assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Unparsable`] when the raw text cannot be
    /// parsed as `target` (the `Int`, `Long`, `Double`, `Decimal`, `Date`,
    /// and `Boolean` arms). `String`, `Null`, `Expression`, and `None`
    /// always succeed.
    pub fn convert(target: VariableType, raw: Option<&str>) -> Result<Self, ConversionError> {
        let text = raw.unwrap_or("");
        let blank = text.trim().is_empty();

        match target {
            VariableType::None | VariableType::Null => Ok(Self::Nothing),
            VariableType::String => {
                Ok(raw.map_or(Self::Nothing, |s| Self::String(s.to_string())))
            }
            VariableType::Expression => {
                Ok(raw.map_or(Self::Nothing, |s| Self::Expression(Expression::new(s))))
            }
            VariableType::Int if blank => Ok(Self::Nothing),
            VariableType::Int => text
                .trim()
                .parse::<i32>()
                .map(Self::Int)
                .map_err(|_| ConversionError::unparsable(text, target)),
            VariableType::Long if blank => Ok(Self::Nothing),
            VariableType::Long => text
                .trim()
                .parse::<i64>()
                .map(Self::Long)
                .map_err(|_| ConversionError::unparsable(text, target)),
            VariableType::Double if blank => Ok(Self::Nothing),
            VariableType::Double => text
                .trim()
                .parse::<f64>()
                .map(Self::Double)
                .map_err(|_| ConversionError::unparsable(text, target)),
            VariableType::Decimal if blank => Ok(Self::Nothing),
            VariableType::Decimal => BigDecimal::from_str(text.trim())
                .map(Self::Decimal)
                .map_err(|_| ConversionError::unparsable(text, target)),
            VariableType::Date => parse_date(text)
                .map(Self::Date)
                .ok_or_else(|| ConversionError::unparsable(text, target)),
            VariableType::Boolean => parse_bool(text)
                .map(Self::Boolean)
                .ok_or_else(|| ConversionError::unparsable(text, target)),
        }
    }

    /// The type tag this value corresponds to.
    ///
    /// [`TypedValue::Nothing`] reports [`VariableType::Null`].
    #[must_use]
    pub fn type_tag(&self) -> VariableType {
        match self {
            Self::Nothing => VariableType::Null,
            Self::Int(_) => VariableType::Int,
            Self::Long(_) => VariableType::Long,
            Self::Double(_) => VariableType::Double,
            Self::Decimal(_) => VariableType::Decimal,
            Self::String(_) => VariableType::String,
            Self::Date(_) => VariableType::Date,
            Self::Boolean(_) => VariableType::Boolean,
            Self::Expression(_) => VariableType::Expression,
        }
    }

    /// Whether this is the absent value.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nothing => Ok(()),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S")),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Expression(e) => write!(f, "{e}"),
        }
    }
}

/// Guess a type tag for non-blank raw text.
///
/// Probes in fixed order: `Int`, `Long`, `Double`, `Decimal`, `Boolean`,
/// `Date`, then `String` as the catch-all. Returns `None` for blank input
/// (the caller leaves the variable untyped).
#[must_use]
pub fn infer_type(raw: &str) -> Option<VariableType> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let ty = if text.parse::<i32>().is_ok() {
        VariableType::Int
    } else if text.parse::<i64>().is_ok() {
        VariableType::Long
    } else if text.parse::<f64>().is_ok() {
        VariableType::Double
    } else if BigDecimal::from_str(text).is_ok() {
        VariableType::Decimal
    } else if parse_bool(text).is_some() {
        VariableType::Boolean
    } else if parse_date(text).is_some() {
        VariableType::Date
    } else {
        VariableType::String
    };
    Some(ty)
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Lenient date/time parse over the formats end users actually type.
///
/// Date-only input resolves to midnight; time-only input resolves on the
/// epoch-of-convention 0001-01-01, matching the lenient platform parse the
/// original tool exposed to its users.
fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    for fmt in TIME_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(text, fmt) {
            return Some(NaiveDate::from_ymd_opt(1, 1, 1)?.and_time(t));
        }
    }
    None
}
