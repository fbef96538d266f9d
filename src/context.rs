//! `Context`: the evaluator's handle on the outside world. Only an output
//! sink for `print` is strictly required, but `Input` sits alongside
//! `Output` as a symmetric pair so an embedder (e.g. the REPL) has a
//! matching input half, even though Mython itself has no `input()`
//! builtin to drive it.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

/// Sink for `print` output.
pub trait Output {
  fn write_str(&mut self, s: &str) -> io::Result<()>;
}

/// Source of input for embedders; unused by the language itself.
pub trait Input {
  fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl Output for Vec<u8> {
  fn write_str(&mut self, s: &str) -> io::Result<()> {
    self.extend_from_slice(s.as_bytes());
    Ok(())
  }
}

impl Output for String {
  fn write_str(&mut self, s: &str) -> io::Result<()> {
    self.push_str(s);
    Ok(())
  }
}

/// A shared buffer sink, handy for embedders (and tests) that want to read
/// output back out after a run without tearing the `Context` apart.
impl Output for Rc<RefCell<String>> {
  fn write_str(&mut self, s: &str) -> io::Result<()> {
    self.borrow_mut().push_str(s);
    Ok(())
  }
}

pub struct Stdout;

impl Output for Stdout {
  fn write_str(&mut self, s: &str) -> io::Result<()> {
    use io::Write;
    io::stdout().write_all(s.as_bytes())
  }
}

pub struct Stdin;

impl Input for Stdin {
  fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
    io::stdin().read_line(buf)
  }
}

pub struct NoInput;

impl Input for NoInput {
  fn read_line(&mut self, _buf: &mut String) -> io::Result<usize> {
    Ok(0)
  }
}

/// Passed down the evaluation tree; owns the I/O sinks `print` (and any
/// embedder-provided input) go through.
pub struct Context {
  output: Box<dyn Output>,
  input: Box<dyn Input>,
}

impl Context {
  pub fn new(output: impl Output + 'static, input: impl Input + 'static) -> Self {
    Context {
      output: Box::new(output),
      input: Box::new(input),
    }
  }

  pub fn stdio() -> Self {
    Context::new(Stdout, Stdin)
  }

  pub fn from_boxed(output: Box<dyn Output>, input: Box<dyn Input>) -> Self {
    Context { output, input }
  }

  pub fn print(&mut self, s: &str) -> io::Result<()> {
    self.output.write_str(s)
  }

  pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
    self.input.read_line(buf)
  }
}
