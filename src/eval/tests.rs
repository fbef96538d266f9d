use std::cell::RefCell;
use std::rc::Rc;

use span::Spanned;

use crate::ast::{PrintArgs, Stmt};
use crate::closure::Closure;
use crate::context::Context;

use super::*;

fn spanned<T>(value: T) -> Spanned<T> {
  Spanned::new(span::Span::default(), value)
}

fn run_stmt(stmt: Stmt, closure: &mut Closure) -> (Flow, String) {
  let sink = Rc::new(RefCell::new(String::new()));
  let mut ctx = Context::new(sink.clone(), crate::context::NoInput);
  let flow = eval_stmt(&spanned(stmt), closure, &mut ctx).expect("should evaluate");
  let output = sink.borrow().clone();
  (flow, output)
}

// `PrintArgs::Bare` is the node's other shape; the parser only ever
// builds `List`, so this exercises it directly.
#[test]
fn print_bare_prints_truthy_value_then_newline() {
  let mut closure = Closure::new();
  closure.set("x", Value::Number(5));
  let (_, output) = run_stmt(Stmt::Print(PrintArgs::Bare(Rc::from("x"))), &mut closure);
  assert_eq!(output, "5\n");
}

#[test]
fn print_bare_skips_falsy_value_but_still_newlines() {
  let mut closure = Closure::new();
  closure.set("x", Value::Number(0));
  let (_, output) = run_stmt(Stmt::Print(PrintArgs::Bare(Rc::from("x"))), &mut closure);
  assert_eq!(output, "\n");
}

#[test]
fn print_bare_of_undefined_name_is_just_a_newline() {
  let mut closure = Closure::new();
  let (_, output) = run_stmt(Stmt::Print(PrintArgs::Bare(Rc::from("nope"))), &mut closure);
  assert_eq!(output, "\n");
}

#[test]
fn compound_stops_at_first_return() {
  let mut closure = Closure::new();
  let stmts = vec![
    spanned(Stmt::Return(Some(spanned(Expr::Number(1))))),
    spanned(Stmt::Return(Some(spanned(Expr::Number(2))))),
  ];
  let (flow, _) = run_stmt(Stmt::Compound(stmts), &mut closure);
  match flow {
    Flow::Return(Value::Number(n)) => assert_eq!(n, 1),
    _ => panic!("expected Return(1)"),
  }
}

#[test]
fn division_by_zero_is_a_runtime_error() {
  let v = div(Value::Number(4), Value::Number(0), span::Span::default());
  assert!(v.is_err());
}
