use crate::ast::{Comparator, Expr, Stmt};

use super::parse;

fn stmts(src: &str) -> Vec<Stmt> {
  match parse(src).expect("should parse").into_inner() {
    Stmt::Compound(stmts) => stmts.into_iter().map(|s| s.into_inner()).collect(),
    other => vec![other],
  }
}

#[test]
fn elif_chain_desugars_to_nested_if_else() {
  let src = "if a:\n  x = 1\nelif b:\n  x = 2\nelse:\n  x = 3\n";
  let program = stmts(src);
  assert_eq!(program.len(), 1);
  let Stmt::IfElse { else_branch, .. } = &program[0] else {
    panic!("expected IfElse");
  };
  let else_branch = else_branch.as_ref().expect("elif should produce an else branch");
  assert!(matches!(&***else_branch, Stmt::IfElse { .. }));
}

#[test]
fn additive_is_left_associative() {
  // "1 - 2 - 3" should parse as (1 - 2) - 3, not 1 - (2 - 3).
  let program = stmts("print 1 - 2 - 3\n");
  let Stmt::Print(crate::ast::PrintArgs::List(args)) = &program[0] else {
    panic!("expected Print");
  };
  let Expr::Sub(lhs, rhs) = &*args[0] else {
    panic!("expected top-level Sub");
  };
  assert!(matches!(&***rhs, Expr::Number(3)));
  assert!(matches!(&***lhs, Expr::Sub(..)));
}

#[test]
fn mult_binds_tighter_than_additive() {
  // "1 + 2 * 3" should parse as 1 + (2 * 3).
  let program = stmts("print 1 + 2 * 3\n");
  let Stmt::Print(crate::ast::PrintArgs::List(args)) = &program[0] else {
    panic!("expected Print");
  };
  let Expr::Add(lhs, rhs) = &*args[0] else {
    panic!("expected top-level Add");
  };
  assert!(matches!(&***lhs, Expr::Number(1)));
  assert!(matches!(&***rhs, Expr::Mult(..)));
}

#[test]
fn unary_minus_desugars_to_zero_minus_operand() {
  let program = stmts("print -x\n");
  let Stmt::Print(crate::ast::PrintArgs::List(args)) = &program[0] else {
    panic!("expected Print");
  };
  let Expr::Sub(lhs, rhs) = &*args[0] else {
    panic!("expected Sub");
  };
  assert!(matches!(&***lhs, Expr::Number(0)));
  assert!(matches!(&***rhs, Expr::Variable(_)));
}

#[test]
fn comparison_does_not_chain() {
  // comparisons sit above additive and are not associative with each other;
  // "a < b" parses straight through without consulting a second operator.
  let program = stmts("print a < b\n");
  let Stmt::Print(crate::ast::PrintArgs::List(args)) = &program[0] else {
    panic!("expected Print");
  };
  assert!(matches!(&*args[0], Expr::Comparison(Comparator::Less, ..)));
}

#[test]
fn and_binds_tighter_than_or() {
  let program = stmts("print a or b and c\n");
  let Stmt::Print(crate::ast::PrintArgs::List(args)) = &program[0] else {
    panic!("expected Print");
  };
  let Expr::Or(lhs, rhs) = &*args[0] else {
    panic!("expected top-level Or");
  };
  assert!(matches!(&***lhs, Expr::Variable(_)));
  assert!(matches!(&***rhs, Expr::And(..)));
}

#[test]
fn method_call_vs_bare_field_path() {
  let program = stmts("print a.b.c\n");
  let Stmt::Print(crate::ast::PrintArgs::List(args)) = &program[0] else {
    panic!("expected Print");
  };
  match &*args[0] {
    Expr::Variable(path) => {
      let names: Vec<&str> = path.iter().map(|s| s.as_ref()).collect();
      assert_eq!(names, ["a", "b", "c"]);
    }
    _ => panic!("expected a dotted Variable path"),
  }
}

#[test]
fn dotted_path_followed_by_a_call_is_a_method_call() {
  // `a.b` with no call is a field path; attaching `(...)` is what turns the
  // last segment into a method call rather than a bare path read.
  let program = stmts("print a.b()\n");
  let Stmt::Print(crate::ast::PrintArgs::List(args)) = &program[0] else {
    panic!("expected Print");
  };
  assert!(matches!(&*args[0], Expr::MethodCall { .. }));
}

#[test]
fn assignment_vs_field_assignment() {
  assert!(matches!(&stmts("x = 1\n")[0], Stmt::Assignment { .. }));
  let Stmt::FieldAssignment {
    object_path, field, ..
  } = &stmts("a.b = 1\n")[0]
  else {
    panic!("expected FieldAssignment");
  };
  assert_eq!(object_path.iter().map(|s| s.as_ref()).collect::<Vec<_>>(), ["a"]);
  assert_eq!(field.as_ref(), "b");
}

#[test]
fn assignment_to_a_non_variable_is_a_parse_error() {
  assert!(parse("1 = 2\n").is_err());
}

#[test]
fn class_with_parent_and_methods_parses() {
  let src = "class B(A):\n  def f(x):\n    return x\n";
  let program = stmts(src);
  let Stmt::ClassDefinition {
    name,
    parent,
    methods,
  } = &program[0]
  else {
    panic!("expected ClassDefinition");
  };
  assert_eq!(name.as_ref(), "B");
  assert_eq!(parent.as_deref(), Some("A"));
  assert_eq!(methods.len(), 1);
  assert_eq!(methods[0].name.as_ref(), "f");
  assert_eq!(methods[0].params.len(), 1);
}

#[test]
fn str_call_parses_to_stringify_not_a_variable() {
  let program = stmts("print str(x)\n");
  let Stmt::Print(crate::ast::PrintArgs::List(args)) = &program[0] else {
    panic!("expected Print");
  };
  assert!(matches!(&*args[0], Expr::Stringify(_)));
}

#[test]
fn missing_colon_after_if_condition_is_a_parse_error() {
  assert!(parse("if a\n  x = 1\n").is_err());
}

#[test]
fn no_trailing_newline_still_parses_via_eof_dedent_drain() {
  // the lexer synthesizes the missing Newline/Dedent pair at EOF (see
  // lexer::tests::indentation_drain_at_eof), so this is valid, not an error.
  assert!(parse("if a:\n  x = 1").is_ok());
}

#[test]
fn unterminated_argument_list_is_a_parse_error() {
  assert!(parse("print a.b(1,\n").is_err());
}
