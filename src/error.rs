//! Crate-wide error type. Every variant carries enough to render a
//! [`diag::Report`] against the original source text.

use std::fmt;

use diag::{Report, Source};
use span::Span;

#[derive(Debug, Clone)]
pub struct LexerError {
  pub span: Span,
  pub message: String,
}

#[derive(Debug, Clone)]
pub struct ParseError {
  pub span: Span,
  pub message: String,
}

#[derive(Debug, Clone)]
pub struct RuntimeError {
  pub span: Span,
  pub message: String,
}

impl RuntimeError {
  pub fn at(span: Span, message: impl Into<String>) -> Self {
    RuntimeError {
      span,
      message: message.into(),
    }
  }
}

impl fmt::Display for LexerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message)
  }
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message)
  }
}

impl fmt::Display for RuntimeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message)
  }
}

/// Top-level error for everything that can go wrong running a program.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
  #[error("{0}")]
  Lex(LexerError),
  #[error("{0}")]
  Parse(ParseError),
  #[error("{0}")]
  Runtime(RuntimeError),
}

impl From<LexerError> for Error {
  fn from(e: LexerError) -> Self {
    Error::Lex(e)
  }
}

impl From<ParseError> for Error {
  fn from(e: ParseError) -> Self {
    Error::Parse(e)
  }
}

impl From<RuntimeError> for Error {
  fn from(e: RuntimeError) -> Self {
    Error::Runtime(e)
  }
}

impl Error {
  /// Render a pretty, span-pointing report against `source`.
  pub fn report(&self, source: &str) -> String {
    let (span, message) = match self {
      Error::Lex(e) => (e.span, e.message.clone()),
      Error::Parse(e) => (e.span, e.message.clone()),
      Error::Runtime(e) => (e.span, e.message.clone()),
    };
    Report::error()
      .source(Source::string(source))
      .message(message.clone())
      .span(span)
      .build()
      .emit_to_string()
      .unwrap_or(message)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
