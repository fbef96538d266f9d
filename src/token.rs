//! Token model: the alphabet the lexer produces and the parser consumes.
//!
//! `TokenKind` is the raw lexical category `logos` recognizes straight from
//! source bytes — keywords, operators, and the three literal shapes, plus a
//! handful of hidden categories (indentation, intra-line whitespace,
//! comments, and the catch-all error) that never reach the parser. `Token`
//! is the richer, data-carrying value the parser actually matches on;
//! `Lexer` does the `TokenKind` → `Token` conversion (and the
//! indentation bookkeeping) in one place, in `lexer.rs`.

use std::fmt;

use logos::Logos;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Logos, PartialEq)]
pub enum TokenKind {
  #[token("class")]
  Kw_Class,
  #[token("return")]
  Kw_Return,
  #[token("if")]
  Kw_If,
  #[token("else")]
  Kw_Else,
  #[token("def")]
  Kw_Def,
  #[token("print")]
  Kw_Print,
  #[token("and")]
  Kw_And,
  #[token("or")]
  Kw_Or,
  #[token("not")]
  Kw_Not,
  #[token("None")]
  Kw_None,
  #[token("True")]
  Kw_True,
  #[token("False")]
  Kw_False,

  #[token("==")]
  Op_EqualEqual,
  #[token("!=")]
  Op_BangEqual,
  #[token("<=")]
  Op_LessEqual,
  #[token(">=")]
  Op_MoreEqual,

  #[token("=")]
  Char_Equal,
  #[token("<")]
  Char_Less,
  #[token(">")]
  Char_More,
  #[token("+")]
  Char_Plus,
  #[token("-")]
  Char_Minus,
  #[token("*")]
  Char_Star,
  #[token("/")]
  Char_Slash,
  #[token(",")]
  Char_Comma,
  #[token(".")]
  Char_Dot,
  #[token("(")]
  Char_ParenL,
  #[token(")")]
  Char_ParenR,
  #[token(":")]
  Char_Colon,

  /// `0`, `1`, `42`, etc.
  #[regex(r"[0-9]+")]
  Lit_Number,
  /// `'...'` or `"..."`; escapes are decoded by `Lexer`, not by this regex.
  #[regex(r#"'([^'\\\n]|\\.)*'"#)]
  #[regex(r#""([^"\\\n]|\\.)*""#)]
  Lit_String,
  /// `a`, `_x0`, `doStuff`, etc. Keywords above win on equal-length matches,
  /// so this only ever matches genuine identifiers.
  #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
  Lit_Ident,

  /// One or more line breaks, plus whatever spaces open the final line —
  /// `measure_indent` in `lexer.rs` reads the indentation off that tail.
  #[doc(hidden)]
  #[regex(r"\n+[ ]*")]
  _Tok_Indent,
  #[doc(hidden)]
  #[regex(r"[ ]+")]
  _Tok_Space,
  #[doc(hidden)]
  #[regex(r"#[^\n]*")]
  _Tok_Comment,

  #[doc(hidden)]
  #[error]
  _Tok_Error,
}

/// A single lexical token.
///
/// `Indent`/`Dedent`/`Newline` are synthetic: the lexer invents them from
/// indentation, they never appear literally in source text.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
  Number(i32),
  Id(String),
  String(String),
  Char(char),

  Class,
  Return,
  If,
  Else,
  Def,
  Print,
  And,
  Or,
  Not,
  None,
  True,
  False,

  Eq,
  NotEq,
  LessOrEq,
  GreaterOrEq,

  Newline,
  Indent,
  Dedent,
  Eof,
}

impl Token {
  pub fn as_id(&self) -> Option<&str> {
    match self {
      Token::Id(s) => Some(s),
      _ => Option::None,
    }
  }

  pub fn as_number(&self) -> Option<i32> {
    match self {
      Token::Number(n) => Some(*n),
      _ => Option::None,
    }
  }

  pub fn as_string(&self) -> Option<&str> {
    match self {
      Token::String(s) => Some(s),
      _ => Option::None,
    }
  }

  pub fn as_char(&self) -> Option<char> {
    match self {
      Token::Char(c) => Some(*c),
      _ => Option::None,
    }
  }

  pub fn is_eof(&self) -> bool {
    matches!(self, Token::Eof)
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Token::Number(n) => write!(f, "{n}"),
      Token::Id(s) => write!(f, "{s}"),
      Token::String(s) => write!(f, "{s:?}"),
      Token::Char(c) => write!(f, "{c}"),
      Token::Class => write!(f, "class"),
      Token::Return => write!(f, "return"),
      Token::If => write!(f, "if"),
      Token::Else => write!(f, "else"),
      Token::Def => write!(f, "def"),
      Token::Print => write!(f, "print"),
      Token::And => write!(f, "and"),
      Token::Or => write!(f, "or"),
      Token::Not => write!(f, "not"),
      Token::None => write!(f, "None"),
      Token::True => write!(f, "True"),
      Token::False => write!(f, "False"),
      Token::Eq => write!(f, "=="),
      Token::NotEq => write!(f, "!="),
      Token::LessOrEq => write!(f, "<="),
      Token::GreaterOrEq => write!(f, ">="),
      Token::Newline => write!(f, "<newline>"),
      Token::Indent => write!(f, "<indent>"),
      Token::Dedent => write!(f, "<dedent>"),
      Token::Eof => write!(f, "<eof>"),
    }
  }
}
