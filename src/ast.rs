//! The AST. Each node evaluates via the walk in `eval.rs`; expression nodes
//! yield a plain [`crate::value::Value`], statement nodes yield a
//! [`crate::eval::Flow`] so a `Return` anywhere inside can bubble up to the
//! nearest `MethodBody` without exceptions.

use std::rc::Rc;

use span::Spanned;

use crate::object::Method;

pub type SExpr = Spanned<Expr>;
pub type SStmt = Spanned<Stmt>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
  Equal,
  NotEqual,
  Less,
  Greater,
  LessOrEqual,
  GreaterOrEqual,
}

pub enum Expr {
  Number(i32),
  Str(Rc<str>),
  Bool(bool),
  NoneConst,

  /// `VariableValue`: a dotted path, `n1.n2...nk`.
  Variable(Vec<Rc<str>>),
  Stringify(Box<SExpr>),

  Add(Box<SExpr>, Box<SExpr>),
  Sub(Box<SExpr>, Box<SExpr>),
  Mult(Box<SExpr>, Box<SExpr>),
  Div(Box<SExpr>, Box<SExpr>),

  And(Box<SExpr>, Box<SExpr>),
  Or(Box<SExpr>, Box<SExpr>),
  Not(Box<SExpr>),
  Comparison(Comparator, Box<SExpr>, Box<SExpr>),

  MethodCall {
    object: Box<SExpr>,
    method: Rc<str>,
    args: Vec<SExpr>,
  },
  NewInstance {
    class_ref: Box<SExpr>,
    args: Vec<SExpr>,
  },
}

/// The `Print` node's two shapes. The parser only ever builds `List`;
/// `Bare` exists so the node's full contract is honored and is exercised
/// directly in `eval`'s tests.
pub enum PrintArgs {
  Bare(Rc<str>),
  List(Vec<SExpr>),
}

pub enum Stmt {
  Assignment {
    name: Rc<str>,
    value: SExpr,
  },
  FieldAssignment {
    object_path: Vec<Rc<str>>,
    field: Rc<str>,
    value: SExpr,
  },
  Print(PrintArgs),
  /// A bare expression evaluated for its side effects (e.g. a method call
  /// used as a statement).
  Expr(SExpr),
  IfElse {
    cond: SExpr,
    then_branch: Box<SStmt>,
    else_branch: Option<Box<SStmt>>,
  },
  Compound(Vec<SStmt>),
  Return(Option<SExpr>),
  /// Wraps a method's body; catches `Return` from anywhere within.
  MethodBody(Box<SStmt>),
  ClassDefinition {
    name: Rc<str>,
    parent: Option<Rc<str>>,
    methods: Vec<Rc<Method>>,
  },
}
