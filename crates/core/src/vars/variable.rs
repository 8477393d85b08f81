//! The variable entity: mutation, notification, and lazy typed access.

use std::fmt;
use tracing::{debug, trace};

use super::errors::ConversionError;
use super::types::{TypedValue, VariableType, infer_type};

type ChangeListener = Box<dyn FnMut()>;

/// A named, text-backed value with an inferred or explicit type tag.
///
/// The raw text is the source of truth; [`typed_value`] coerces it to a
/// concrete [`TypedValue`] fresh on every call. Each mutator notifies the
/// stored callback exactly once, synchronously, after the field (and any
/// inferred type) has been applied, and only when the new value actually
/// differs from the old one.
///
/// Re-entrant mutation of the same `Variable` from inside the callback is
/// not supported. Plain ownership makes it unreachable; going through
/// `Rc<RefCell<Variable>>` fails with a borrow panic rather than running.
///
/// [`typed_value`]: Variable::typed_value
pub struct Variable {
    name: Option<String>,
    var_type: VariableType,
    raw: Option<String>,
    on_change: Option<ChangeListener>,
}

impl Variable {
    /// A named variable that notifies `on_change` on every mutation.
    #[must_use]
    pub fn new(name: impl Into<String>, on_change: impl FnMut() + 'static) -> Self {
        Self {
            name: Some(name.into()),
            var_type: VariableType::None,
            raw: None,
            on_change: Some(Box::new(on_change)),
        }
    }

    /// A variable without a name yet; assign one later with [`set_name`].
    ///
    /// [`set_name`]: Variable::set_name
    #[must_use]
    pub fn unnamed(on_change: impl FnMut() + 'static) -> Self {
        Self {
            name: None,
            var_type: VariableType::None,
            raw: None,
            on_change: Some(Box::new(on_change)),
        }
    }

    /// A named variable with no observer; mutations are silent.
    #[must_use]
    pub fn detached(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            var_type: VariableType::None,
            raw: None,
            on_change: None,
        }
    }

    /// The lookup key collaborators use to bind this variable.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The current type tag.
    #[must_use]
    pub fn var_type(&self) -> VariableType {
        self.var_type
    }

    /// The raw text value, verbatim.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Rename the variable. No-op (and no notification) if unchanged.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.name.as_deref() != Some(name.as_str()) {
            self.name = Some(name);
            self.notify();
        }
    }

    /// Override the type tag. No-op (and no notification) if unchanged.
    ///
    /// Setting [`VariableType::None`] re-arms inference for the next value
    /// assignment. An override can leave the variable unconvertible (e.g.
    /// type `Date` over raw text `"abc"`); that surfaces later as an error
    /// from [`typed_value`], never here.
    ///
    /// [`typed_value`]: Variable::typed_value
    pub fn set_type(&mut self, var_type: VariableType) {
        if self.var_type != var_type {
            self.var_type = var_type;
            self.notify();
        }
    }

    /// Assign raw text. No-op (and no notification) if unchanged.
    ///
    /// When the variable is still untyped, a type is inferred from the new
    /// text before the single notification fires, so observers always see
    /// the settled state. Once a type is set (inferred or explicit), later
    /// assignments never re-guess; reset the type to [`VariableType::None`]
    /// to re-arm inference.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        if self.raw.as_deref() != Some(value.as_str()) {
            self.raw = Some(value);
            self.infer_if_untyped();
            self.notify();
        }
    }

    /// The raw text coerced to the current type. Computed fresh per call.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] when the raw text cannot be parsed as
    /// the current type; see [`TypedValue::convert`] for the per-type
    /// contract.
    pub fn typed_value(&self) -> Result<TypedValue, ConversionError> {
        TypedValue::convert(self.var_type, self.raw.as_deref())
    }

    fn infer_if_untyped(&mut self) {
        if self.var_type != VariableType::None {
            return;
        }
        let Some(raw) = self.raw.as_deref() else {
            return;
        };
        if let Some(ty) = infer_type(raw) {
            debug!(name = self.name.as_deref().unwrap_or(""), %ty, "inferred variable type");
            self.var_type = ty;
        }
    }

    fn notify(&mut self) {
        trace!(name = self.name.as_deref().unwrap_or(""), "variable changed");
        if let Some(listener) = self.on_change.as_mut() {
            listener();
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("var_type", &self.var_type)
            .field("raw", &self.raw)
            .field("observed", &self.on_change.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn counting() -> (Rc<RefCell<usize>>, Variable) {
        let count = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&count);
        let var = Variable::new("x", move || *seen.borrow_mut() += 1);
        (count, var)
    }

    #[test]
    fn new_variable_is_untyped_and_empty() {
        let var = Variable::detached("x");
        assert_eq!(var.name(), Some("x"));
        assert_eq!(var.var_type(), VariableType::None);
        assert_eq!(var.value(), None);
        assert_eq!(var.typed_value().unwrap(), TypedValue::Nothing);
    }

    #[test]
    fn set_value_infers_once_and_notifies_once() {
        let (count, mut var) = counting();
        var.set_value("42");
        assert_eq!(var.var_type(), VariableType::Int);
        assert_eq!(var.typed_value().unwrap(), TypedValue::Int(42));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn same_value_twice_notifies_once() {
        let (count, mut var) = counting();
        var.set_value("hello");
        var.set_value("hello");
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn same_name_and_type_are_no_ops() {
        let (count, mut var) = counting();
        var.set_name("x");
        var.set_type(VariableType::None);
        assert_eq!(*count.borrow(), 0);
        var.set_name("y");
        var.set_type(VariableType::Long);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn inferred_type_sticks_across_value_changes() {
        let mut var = Variable::detached("x");
        var.set_value("true");
        assert_eq!(var.var_type(), VariableType::Boolean);
        var.set_value("hello");
        // Still Boolean; only an explicit reset re-arms inference.
        assert_eq!(var.var_type(), VariableType::Boolean);
        assert!(var.typed_value().is_err());
    }

    #[test]
    fn reset_to_none_re_arms_inference() {
        let mut var = Variable::detached("x");
        var.set_value("true");
        var.set_type(VariableType::None);
        var.set_value("2024-01-15");
        assert_eq!(var.var_type(), VariableType::Date);
    }

    #[test]
    fn explicit_type_is_not_re_guessed() {
        let mut var = Variable::detached("x");
        var.set_type(VariableType::Int);
        var.set_value("007");
        assert_eq!(var.var_type(), VariableType::Int);
        assert_eq!(var.typed_value().unwrap(), TypedValue::Int(7));
    }

    #[test]
    fn blank_value_leaves_type_none() {
        let (count, mut var) = counting();
        var.set_value("   ");
        assert_eq!(var.var_type(), VariableType::None);
        assert_eq!(var.typed_value().unwrap(), TypedValue::Nothing);
        // The value itself did change, so one notification fired.
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn boolean_inference_yields_boolean_value() {
        let mut var = Variable::detached("flag");
        var.set_value("false");
        assert_eq!(var.var_type(), VariableType::Boolean);
        assert_eq!(var.typed_value().unwrap(), TypedValue::Boolean(false));
    }

    #[test]
    fn date_override_over_garbage_fails_loudly() {
        let mut var = Variable::detached("when");
        var.set_type(VariableType::Date);
        var.set_value("not-a-date");
        assert!(matches!(
            var.typed_value(),
            Err(ConversionError::Unparsable { target: VariableType::Date, .. })
        ));
    }

    #[test]
    fn expression_value_stays_unevaluated() {
        let mut var = Variable::detached("calc");
        var.set_type(VariableType::Expression);
        var.set_value("1 + 2");
        match var.typed_value().unwrap() {
            TypedValue::Expression(expr) => assert_eq!(expr.source(), "1 + 2"),
            other => panic!("expected expression, got {other:?}"),
        }
    }

    #[test]
    fn unnamed_variable_gets_named_later() {
        let count = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&count);
        let mut var = Variable::unnamed(move || *seen.borrow_mut() += 1);
        assert_eq!(var.name(), None);
        var.set_name("total");
        assert_eq!(var.name(), Some("total"));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn detached_variable_mutates_silently() {
        let mut var = Variable::detached("x");
        var.set_value("3.5");
        assert_eq!(var.var_type(), VariableType::Double);
        assert_eq!(var.typed_value().unwrap(), TypedValue::Double(3.5));
    }
}
