use indoc::indoc;

use crate::Interpreter;

macro_rules! check {
  ($name:ident, $src:expr, $expected:expr) => {
    #[test]
    fn $name() {
      let (mut interp, sink) = Interpreter::with_string_sink();
      interp.run($src).expect("program should evaluate");
      assert_eq!(sink.borrow().as_str(), $expected);
    }
  };
}

macro_rules! check_error {
  ($name:ident, $src:expr) => {
    #[test]
    fn $name() {
      let (mut interp, _sink) = Interpreter::with_string_sink();
      let result = interp.run($src);
      assert!(result.is_err(), "expected a runtime error");
    }
  };
}

// End-to-end scenarios.

check!(scenario_arithmetic, "x = 1 + 2\nprint x\n", "3\n");
check!(scenario_string_concat, indoc! {r#"
    s = "a" + "b"
    print s
"#}, "ab\n");
check!(
  scenario_str_dunder,
  indoc! {r#"
    class P:
      def __init__(a):
        self.a = a
      def __str__():
        return self.a
    p = P("hi")
    print p
  "#},
  "hi\n"
);
check!(
  scenario_inheritance_override,
  indoc! {r#"
    class A:
      def f():
        return 1
    class B(A):
      def f():
        return 2
    b = B()
    print b.f()
  "#},
  "2\n"
);
check_error!(scenario_division_by_zero, "print 1 / 0\n");

#[test]
fn scenario_indentation_drain_parses_and_runs() {
  // no trailing newline - exercises the lexer's EOF dedent drain.
  let src = "class C:\n  def f():\n    return 1\n";
  let (mut interp, _sink) = Interpreter::with_string_sink();
  interp.run(src).expect("should parse and run");
}

// Evaluator invariants.

check!(truthiness_none_is_false, "if None:\n  print 1\nelse:\n  print 2\n", "2\n");
check!(truthiness_zero_is_false, "if 0:\n  print 1\nelse:\n  print 2\n", "2\n");
check!(truthiness_empty_string_is_false, indoc! {r#"
    if "":
      print 1
    else:
      print 2
"#}, "2\n");
check!(truthiness_nonzero_is_true, "if 5:\n  print 1\nelse:\n  print 2\n", "1\n");

check!(equal_reflexive_for_numbers, "print 3 == 3\n", "True\n");
check!(not_equal_is_negation, "print 3 != 3\n", "False\n");
check!(greater_or_equal_is_not_less, "print 3 >= 3\n", "True\n");
check!(less_or_equal_is_not_greater, "print 2 <= 3\n", "True\n");

#[test]
fn short_circuit_and_skips_rhs() {
  let src = indoc! {r#"
    class Counter:
      def __init__():
        self.calls = 0
      def bump():
        self.calls = self.calls + 1
        return True
    c = Counter()
    x = False and c.bump()
    print c.calls
  "#};
  let (mut interp, sink) = Interpreter::with_string_sink();
  interp.run(src).expect("should evaluate");
  assert_eq!(sink.borrow().as_str(), "0\n");
}

#[test]
fn short_circuit_or_skips_rhs() {
  let src = indoc! {r#"
    class Counter:
      def __init__():
        self.calls = 0
      def bump():
        self.calls = self.calls + 1
        return True
    c = Counter()
    x = True or c.bump()
    print c.calls
  "#};
  let (mut interp, sink) = Interpreter::with_string_sink();
  interp.run(src).expect("should evaluate");
  assert_eq!(sink.borrow().as_str(), "0\n");
}

check!(
  return_terminates_nested_blocks,
  indoc! {r#"
    class A:
      def f(x):
        if x:
          if x:
            return 42
        return 0
    a = A()
    print a.f(True)
  "#},
  "42\n"
);

check!(
  elif_chain_desugars_to_nested_if_else,
  indoc! {r#"
    x = 2
    if x == 1:
      print "one"
    elif x == 2:
      print "two"
    else:
      print "other"
  "#},
  "two\n"
);

check_error!(
  undefined_variable_is_an_error,
  "print undefined_name\n"
);

check_error!(
  field_access_on_non_instance_is_an_error,
  "x = 1\ny = x.field\nprint y\n"
);
