//! The tagged Value model and the free functions that give it a
//! print/truthiness/comparison protocol. Capabilities are explicit
//! functions over the sum type rather than polymorphic methods nailed to
//! each variant.

use std::fmt;
use std::rc::Rc;

use span::Span;

use crate::context::Context;
use crate::error::RuntimeError;
use crate::eval::call_method;
use crate::object::{ClassDef, Instance};

#[derive(Clone)]
pub enum Value {
  None,
  Number(i32),
  String(Rc<str>),
  Bool(bool),
  Class(Rc<ClassDef>),
  ClassInstance(Instance),
}

impl Value {
  pub fn string(s: impl Into<Rc<str>>) -> Value {
    Value::String(s.into())
  }

  /// `None`, `False`, `0`, and `""` are falsy; everything else is truthy.
  pub fn is_true(&self) -> bool {
    match self {
      Value::None => false,
      Value::Bool(b) => *b,
      Value::Number(n) => *n != 0,
      Value::String(s) => !s.is_empty(),
      Value::Class(_) | Value::ClassInstance(_) => true,
    }
  }

  pub fn type_name(&self) -> &'static str {
    match self {
      Value::None => "None",
      Value::Number(_) => "Number",
      Value::String(_) => "String",
      Value::Bool(_) => "Bool",
      Value::Class(_) => "Class",
      Value::ClassInstance(_) => "ClassInstance",
    }
  }
}

/// Structural equality for test convenience and internal bookkeeping.
/// This is NOT the language's dunder-aware `Equal`; use [`equal`] for that.
impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::None, Value::None) => true,
      (Value::Number(a), Value::Number(b)) => a == b,
      (Value::String(a), Value::String(b)) => a == b,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
      (Value::ClassInstance(a), Value::ClassInstance(b)) => a == b,
      _ => false,
    }
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::None => write!(f, "None"),
      Value::Number(n) => write!(f, "Number({n})"),
      Value::String(s) => write!(f, "String({s:?})"),
      Value::Bool(b) => write!(f, "Bool({b})"),
      Value::Class(c) => write!(f, "Class({})", c.name),
      Value::ClassInstance(i) => write!(f, "{i:?}"),
    }
  }
}

/// Render `value` the way `Print` renders a single argument: `__str__` for
/// instances that define it, otherwise the default representation. `span`
/// is the source location to blame if `__str__` fails or recurses into an
/// error.
pub fn stringify(value: &Value, span: Span, ctx: &mut Context) -> Result<String, RuntimeError> {
  match value {
    Value::None => Ok("None".to_string()),
    Value::Number(n) => Ok(n.to_string()),
    Value::Bool(b) => Ok(if *b { "True" } else { "False" }.to_string()),
    Value::String(s) => Ok(s.to_string()),
    Value::Class(c) => Ok(format!("Class {}", c.name)),
    Value::ClassInstance(instance) => {
      if instance.has_method("__str__", 0) {
        let result = call_method(instance, "__str__", Vec::new(), span, ctx)?;
        stringify(&result, span, ctx)
      } else {
        Ok(format!("ClassInstance@{}", instance.id()))
      }
    }
  }
}

/// `Equal`: native for same-typed Bool/Number/String pairs, both-`None` is
/// equal, `ClassInstance` LHS delegates to `__eq__(rhs)`.
pub fn equal(lhs: &Value, rhs: &Value, span: Span, ctx: &mut Context) -> Result<bool, RuntimeError> {
  match (lhs, rhs) {
    (Value::None, Value::None) => Ok(true),
    (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
    (Value::Number(a), Value::Number(b)) => Ok(a == b),
    (Value::String(a), Value::String(b)) => Ok(a == b),
    (Value::ClassInstance(instance), _) => {
      if instance.has_method("__eq__", 1) {
        let result = call_method(instance, "__eq__", vec![rhs.clone()], span, ctx)?;
        Ok(result.is_true())
      } else {
        Err(RuntimeError::at(
          span,
          format!(
            "'{}' has no __eq__ method for comparison",
            instance_class_name(instance)
          ),
        ))
      }
    }
    _ => Err(RuntimeError::at(
      span,
      format!(
        "cannot compare {} and {} for equality",
        lhs.type_name(),
        rhs.type_name()
      ),
    )),
  }
}

/// `Less`: native for same-typed Bool/Number/String pairs, `ClassInstance`
/// LHS delegates to `__lt__(rhs)`.
pub fn less(lhs: &Value, rhs: &Value, span: Span, ctx: &mut Context) -> Result<bool, RuntimeError> {
  match (lhs, rhs) {
    (Value::Bool(a), Value::Bool(b)) => Ok(!*a && *b),
    (Value::Number(a), Value::Number(b)) => Ok(a < b),
    (Value::String(a), Value::String(b)) => Ok(a < b),
    (Value::ClassInstance(instance), _) => {
      if instance.has_method("__lt__", 1) {
        let result = call_method(instance, "__lt__", vec![rhs.clone()], span, ctx)?;
        Ok(result.is_true())
      } else {
        Err(RuntimeError::at(
          span,
          format!(
            "'{}' has no __lt__ method for comparison",
            instance_class_name(instance)
          ),
        ))
      }
    }
    _ => Err(RuntimeError::at(
      span,
      format!("cannot order {} and {}", lhs.type_name(), rhs.type_name()),
    )),
  }
}

pub fn not_equal(lhs: &Value, rhs: &Value, span: Span, ctx: &mut Context) -> Result<bool, RuntimeError> {
  Ok(!equal(lhs, rhs, span, ctx)?)
}

pub fn greater(lhs: &Value, rhs: &Value, span: Span, ctx: &mut Context) -> Result<bool, RuntimeError> {
  Ok(!less(lhs, rhs, span, ctx)? && !equal(lhs, rhs, span, ctx)?)
}

pub fn less_or_equal(lhs: &Value, rhs: &Value, span: Span, ctx: &mut Context) -> Result<bool, RuntimeError> {
  Ok(!greater(lhs, rhs, span, ctx)?)
}

pub fn greater_or_equal(lhs: &Value, rhs: &Value, span: Span, ctx: &mut Context) -> Result<bool, RuntimeError> {
  Ok(!less(lhs, rhs, span, ctx)?)
}

fn instance_class_name(instance: &Instance) -> Rc<str> {
  instance.class().name.clone()
}
