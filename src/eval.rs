//! The recursive evaluator: one function per AST node shape. `Return` is
//! reified as an explicit [`Flow`] value threaded through every statement
//! rather than unwound via a host exception.

use std::rc::Rc;

use indexmap::IndexMap;
use span::Span;

use crate::ast::{Comparator, Expr, PrintArgs, SExpr, SStmt, Stmt};
use crate::closure::Closure;
use crate::context::Context;
use crate::error::RuntimeError;
use crate::object::{ClassDef, Instance};
use crate::value::{self, Value};

/// Non-local control flow: every statement either finishes normally with a
/// (usually ignored) value, or is carrying a `Return` up to the nearest
/// `MethodBody`.
pub enum Flow {
  Normal(Value),
  Return(Value),
}

impl Flow {
  pub fn into_value(self) -> Value {
    match self {
      Flow::Normal(v) | Flow::Return(v) => v,
    }
  }
}

fn write(ctx: &mut Context, span: Span, s: &str) -> Result<(), RuntimeError> {
  ctx
    .print(s)
    .map_err(|e| RuntimeError::at(span, format!("output error: {e}")))
}

/// Call `method_name` on `instance` with already-evaluated `args`. Shared by
/// `MethodCall`/`NewInstance` and by `value::{equal,less}`'s dunder dispatch.
/// `span` blames the call site (the method call expression, or the
/// comparison/arithmetic expression that fell back to a dunder).
pub fn call_method(
  instance: &Instance,
  method_name: &str,
  args: Vec<Value>,
  span: Span,
  ctx: &mut Context,
) -> Result<Value, RuntimeError> {
  let method = instance.get_method(method_name).ok_or_else(|| {
    RuntimeError::at(
      span,
      format!(
        "'{}' object has no method '{method_name}'",
        instance.class().name
      ),
    )
  })?;
  if method.params.len() != args.len() {
    return Err(RuntimeError::at(
      span,
      format!(
        "'{method_name}' takes {} argument(s), {} given",
        method.params.len(),
        args.len()
      ),
    ));
  }
  let mut frame = Closure::new();
  frame.set("self", Value::ClassInstance(instance.clone()));
  for (param, arg) in method.params.iter().zip(args) {
    frame.set(param.clone(), arg);
  }
  let flow = eval_stmt(&method.body, &mut frame, ctx)?;
  Ok(flow.into_value())
}

fn resolve_variable(path: &[Rc<str>], span: Span, closure: &Closure) -> Result<Value, RuntimeError> {
  let (first, rest) = path
    .split_first()
    .expect("VariableValue always has at least one segment");
  let mut current = closure
    .get(first)
    .cloned()
    .ok_or_else(|| RuntimeError::at(span, format!("name '{first}' is not defined")))?;
  for field in rest {
    current = match current {
      Value::ClassInstance(instance) => instance.get_field(field).ok_or_else(|| {
        RuntimeError::at(
          span,
          format!("'{}' has no field '{field}'", instance.class().name),
        )
      })?,
      other => {
        return Err(RuntimeError::at(
          span,
          format!("'{}' is not a class instance", other.type_name()),
        ))
      }
    };
  }
  Ok(current)
}

/// Resolve `path` down to its owning `ClassInstance` (everything but the
/// final segment, which is the field `FieldAssignment` is about to bind).
fn resolve_owner(path: &[Rc<str>], span: Span, closure: &Closure) -> Result<Instance, RuntimeError> {
  let (first, rest) = path
    .split_first()
    .expect("FieldAssignment target always has at least one segment");
  let mut current = closure
    .get(first)
    .cloned()
    .ok_or_else(|| RuntimeError::at(span, format!("name '{first}' is not defined")))?;
  for field in rest {
    current = match current {
      Value::ClassInstance(instance) => instance.get_field(field).ok_or_else(|| {
        RuntimeError::at(
          span,
          format!("'{}' has no field '{field}'", instance.class().name),
        )
      })?,
      other => {
        return Err(RuntimeError::at(
          span,
          format!("'{}' is not a class instance", other.type_name()),
        ))
      }
    };
  }
  match current {
    Value::ClassInstance(instance) => Ok(instance),
    other => Err(RuntimeError::at(
      span,
      format!("cannot assign a field on a {}", other.type_name()),
    )),
  }
}

fn add(lhs: Value, rhs: Value, span: Span, ctx: &mut Context) -> Result<Value, RuntimeError> {
  match (lhs, rhs) {
    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.wrapping_add(b))),
    (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
    (Value::ClassInstance(instance), rhs) => {
      if instance.has_method("__add__", 1) {
        call_method(&instance, "__add__", vec![rhs], span, ctx)
      } else {
        Err(RuntimeError::at(
          span,
          format!("'{}' has no __add__ method", instance.class().name),
        ))
      }
    }
    (lhs, rhs) => Err(RuntimeError::at(
      span,
      format!("cannot add {} and {}", lhs.type_name(), rhs.type_name()),
    )),
  }
}

fn sub(lhs: Value, rhs: Value, span: Span) -> Result<Value, RuntimeError> {
  match (lhs, rhs) {
    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.wrapping_sub(b))),
    (lhs, rhs) => Err(RuntimeError::at(
      span,
      format!("cannot subtract {} and {}", lhs.type_name(), rhs.type_name()),
    )),
  }
}

fn mult(lhs: Value, rhs: Value, span: Span) -> Result<Value, RuntimeError> {
  match (lhs, rhs) {
    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.wrapping_mul(b))),
    (lhs, rhs) => Err(RuntimeError::at(
      span,
      format!("cannot multiply {} and {}", lhs.type_name(), rhs.type_name()),
    )),
  }
}

fn div(lhs: Value, rhs: Value, span: Span) -> Result<Value, RuntimeError> {
  match (lhs, rhs) {
    (Value::Number(_), Value::Number(0)) => Err(RuntimeError::at(span, "division by zero")),
    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.wrapping_div(b))),
    (lhs, rhs) => Err(RuntimeError::at(
      span,
      format!("cannot divide {} and {}", lhs.type_name(), rhs.type_name()),
    )),
  }
}

pub fn eval_expr(expr: &SExpr, closure: &mut Closure, ctx: &mut Context) -> Result<Value, RuntimeError> {
  let span = expr.span;
  match &**expr {
    Expr::Number(n) => Ok(Value::Number(*n)),
    Expr::Str(s) => Ok(Value::String(s.clone())),
    Expr::Bool(b) => Ok(Value::Bool(*b)),
    Expr::NoneConst => Ok(Value::None),
    Expr::Variable(path) => resolve_variable(path, span, closure),
    Expr::Stringify(inner) => {
      let v = eval_expr(inner, closure, ctx)?;
      let s = value::stringify(&v, span, ctx)?;
      Ok(Value::string(s))
    }
    Expr::Add(l, r) => {
      let lv = eval_expr(l, closure, ctx)?;
      let rv = eval_expr(r, closure, ctx)?;
      add(lv, rv, span, ctx)
    }
    Expr::Sub(l, r) => {
      let lv = eval_expr(l, closure, ctx)?;
      let rv = eval_expr(r, closure, ctx)?;
      sub(lv, rv, span)
    }
    Expr::Mult(l, r) => {
      let lv = eval_expr(l, closure, ctx)?;
      let rv = eval_expr(r, closure, ctx)?;
      mult(lv, rv, span)
    }
    Expr::Div(l, r) => {
      let lv = eval_expr(l, closure, ctx)?;
      let rv = eval_expr(r, closure, ctx)?;
      div(lv, rv, span)
    }
    Expr::And(l, r) => {
      let lv = eval_expr(l, closure, ctx)?;
      if !lv.is_true() {
        return Ok(Value::Bool(false));
      }
      let rv = eval_expr(r, closure, ctx)?;
      Ok(Value::Bool(rv.is_true()))
    }
    Expr::Or(l, r) => {
      let lv = eval_expr(l, closure, ctx)?;
      if lv.is_true() {
        return Ok(Value::Bool(true));
      }
      let rv = eval_expr(r, closure, ctx)?;
      Ok(Value::Bool(rv.is_true()))
    }
    Expr::Not(e) => {
      let v = eval_expr(e, closure, ctx)?;
      Ok(Value::Bool(!v.is_true()))
    }
    Expr::Comparison(cmp, l, r) => {
      let lv = eval_expr(l, closure, ctx)?;
      let rv = eval_expr(r, closure, ctx)?;
      let result = match cmp {
        Comparator::Equal => value::equal(&lv, &rv, span, ctx)?,
        Comparator::NotEqual => value::not_equal(&lv, &rv, span, ctx)?,
        Comparator::Less => value::less(&lv, &rv, span, ctx)?,
        Comparator::Greater => value::greater(&lv, &rv, span, ctx)?,
        Comparator::LessOrEqual => value::less_or_equal(&lv, &rv, span, ctx)?,
        Comparator::GreaterOrEqual => value::greater_or_equal(&lv, &rv, span, ctx)?,
      };
      Ok(Value::Bool(result))
    }
    Expr::MethodCall {
      object,
      method,
      args,
    } => {
      let receiver = eval_expr(object, closure, ctx)?;
      let Value::ClassInstance(instance) = receiver else {
        return Err(RuntimeError::at(
          span,
          format!("cannot call method '{method}' on a {}", receiver.type_name()),
        ));
      };
      if !instance.has_method(method, args.len()) {
        return Err(RuntimeError::at(
          span,
          format!(
            "'{}' object has no method '{method}' taking {} argument(s)",
            instance.class().name,
            args.len()
          ),
        ));
      }
      let mut values = Vec::with_capacity(args.len());
      for arg in args {
        values.push(eval_expr(arg, closure, ctx)?);
      }
      call_method(&instance, method, values, span, ctx)
    }
    Expr::NewInstance { class_ref, args } => {
      let class_value = eval_expr(class_ref, closure, ctx)?;
      let Value::Class(class) = class_value else {
        return Err(RuntimeError::at(
          span,
          format!("cannot instantiate a {}", class_value.type_name()),
        ));
      };
      let mut values = Vec::with_capacity(args.len());
      for arg in args {
        values.push(eval_expr(arg, closure, ctx)?);
      }
      let instance = Instance::new(class);
      if instance.has_method("__init__", values.len()) {
        call_method(&instance, "__init__", values, span, ctx)?;
      }
      Ok(Value::ClassInstance(instance))
    }
  }
}

pub fn eval_stmt(stmt: &SStmt, closure: &mut Closure, ctx: &mut Context) -> Result<Flow, RuntimeError> {
  let span = stmt.span;
  match &**stmt {
    Stmt::Assignment { name, value } => {
      let v = eval_expr(value, closure, ctx)?;
      closure.set(name.clone(), v.clone());
      Ok(Flow::Normal(v))
    }
    Stmt::FieldAssignment {
      object_path,
      field,
      value,
    } => {
      let owner = resolve_owner(object_path, span, closure)?;
      let v = eval_expr(value, closure, ctx)?;
      owner.set_field(field.clone(), v.clone());
      Ok(Flow::Normal(v))
    }
    Stmt::Print(PrintArgs::Bare(name)) => {
      if let Some(v) = closure.get(name).cloned() {
        if v.is_true() {
          let s = value::stringify(&v, span, ctx)?;
          write(ctx, span, &s)?;
        }
      }
      write(ctx, span, "\n")?;
      Ok(Flow::Normal(Value::None))
    }
    Stmt::Print(PrintArgs::List(exprs)) => {
      let mut parts = Vec::with_capacity(exprs.len());
      for e in exprs {
        let v = eval_expr(e, closure, ctx)?;
        parts.push(value::stringify(&v, span, ctx)?);
      }
      write(ctx, span, &parts.join(" "))?;
      write(ctx, span, "\n")?;
      Ok(Flow::Normal(Value::None))
    }
    Stmt::Expr(e) => {
      let v = eval_expr(e, closure, ctx)?;
      Ok(Flow::Normal(v))
    }
    Stmt::IfElse {
      cond,
      then_branch,
      else_branch,
    } => {
      let cv = eval_expr(cond, closure, ctx)?;
      if cv.is_true() {
        eval_stmt(then_branch, closure, ctx)
      } else if let Some(else_branch) = else_branch {
        eval_stmt(else_branch, closure, ctx)
      } else {
        Ok(Flow::Normal(Value::None))
      }
    }
    Stmt::Compound(stmts) => {
      for s in stmts {
        match eval_stmt(s, closure, ctx)? {
          Flow::Return(v) => return Ok(Flow::Return(v)),
          Flow::Normal(_) => continue,
        }
      }
      Ok(Flow::Normal(Value::None))
    }
    Stmt::Return(expr) => {
      let v = match expr {
        Some(e) => eval_expr(e, closure, ctx)?,
        Option::None => Value::None,
      };
      Ok(Flow::Return(v))
    }
    Stmt::MethodBody(body) => match eval_stmt(body, closure, ctx)? {
      Flow::Return(v) => Ok(Flow::Normal(v)),
      Flow::Normal(_) => Ok(Flow::Normal(Value::None)),
    },
    Stmt::ClassDefinition {
      name,
      parent,
      methods,
    } => {
      let parent_class = match parent {
        Some(parent_name) => match closure.get(parent_name) {
          Some(Value::Class(c)) => Some(c.clone()),
          Some(_) => {
            return Err(RuntimeError::at(
              span,
              format!("'{parent_name}' is not a class"),
            ))
          }
          Option::None => {
            return Err(RuntimeError::at(
              span,
              format!("undefined parent class '{parent_name}'"),
            ))
          }
        },
        Option::None => Option::None,
      };
      let mut method_map: IndexMap<Rc<str>, Rc<crate::object::Method>> = IndexMap::new();
      for method in methods {
        method_map.insert(method.name.clone(), method.clone());
      }
      let class = Rc::new(ClassDef::new(name.clone(), parent_class, method_map));
      closure.set(name.clone(), Value::Class(class));
      Ok(Flow::Normal(Value::None))
    }
  }
}

#[cfg(test)]
mod tests;
