//! Mython: a tree-walking interpreter for a small indentation-sensitive,
//! dynamically-typed scripting language.

pub mod ast;
pub mod closure;
pub mod context;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;
pub mod value;

pub use closure::Closure;
pub use context::{Context, Input, Output};
pub use error::Error;
pub use value::Value;

/// Embedding entry point: configure I/O via [`Interpreter::builder`], then
/// run one or more chunks of source against one persistent root `Closure`
/// (so top-level names set by an earlier chunk are visible to a later one —
/// what a REPL needs, and harmless for the common one-shot case).
pub struct Interpreter {
  ctx: Context,
  root: Closure,
}

impl Interpreter {
  pub fn builder() -> InterpreterBuilder {
    InterpreterBuilder {
      output: Box::new(context::Stdout),
      input: Box::new(context::Stdin),
    }
  }

  /// Lex, parse, and evaluate `src` against the persistent root closure.
  pub fn run(&mut self, src: &str) -> Result<Value, Error> {
    let program = parser::parse(src)?;
    let flow = eval::eval_stmt(&program, &mut self.root, &mut self.ctx)?;
    Ok(flow.into_value())
  }

  /// Convenience constructor for embedders (and tests) that just want to
  /// read `print` output back out of a shared buffer.
  pub fn with_string_sink() -> (Interpreter, std::rc::Rc<std::cell::RefCell<String>>) {
    let sink = std::rc::Rc::new(std::cell::RefCell::new(String::new()));
    let interp = Interpreter::builder().with_output(sink.clone()).build();
    (interp, sink)
  }
}

pub struct InterpreterBuilder {
  output: Box<dyn Output>,
  input: Box<dyn Input>,
}

impl InterpreterBuilder {
  pub fn with_output(mut self, output: impl Output + 'static) -> Self {
    self.output = Box::new(output);
    self
  }

  pub fn with_input(mut self, input: impl Input + 'static) -> Self {
    self.input = Box::new(input);
    self
  }

  pub fn build(self) -> Interpreter {
    Interpreter {
      ctx: Context::from_boxed(self.output, self.input),
      root: Closure::new(),
    }
  }
}

#[cfg(test)]
mod tests;
