//! Indentation-aware lexer: turns Mython source text into a token stream.
//!
//! Primitive tokenization (keywords, operators, numbers, strings,
//! identifiers) is `logos`-generated from [`TokenKind`]; this module is a
//! thin stateful wrapper around that raw token stream, folding indentation
//! into synthetic `Indent`/`Dedent`/`Newline` tokens via `measure_indent`
//! plus a one-token lookahead buffer over the raw stream.

use std::ops::Range;

use logos::Logos;
use span::Span;

use crate::error::LexerError;
use crate::token::{Token, TokenKind};

const INDENT_WIDTH: i32 = 2;

pub struct Lexer<'src> {
  src: &'src str,
  inner: logos::Lexer<'src, TokenKind>,
  buffered: Option<(TokenKind, Range<usize>)>,
  old_dent: i32,
  curr_dent: i32,
  primed: bool,
  current: Token,
  current_span: Span,
}

impl<'src> Lexer<'src> {
  pub fn new(src: &'src str) -> Result<Self, LexerError> {
    let mut lexer = Lexer {
      src,
      inner: TokenKind::lexer(src),
      buffered: None,
      old_dent: 0,
      curr_dent: 0,
      primed: false,
      current: Token::Newline,
      current_span: Span { start: 0, end: 0 },
    };
    lexer.advance()?;
    Ok(lexer)
  }

  pub fn current(&self) -> &Token {
    &self.current
  }

  pub fn span(&self) -> Span {
    self.current_span
  }

  pub fn next(&mut self) -> Result<&Token, LexerError> {
    self.advance()?;
    Ok(&self.current)
  }

  pub fn expect(&self, token: &Token) -> Result<(), LexerError> {
    if self.current == *token {
      Ok(())
    } else {
      Err(self.error(format!("expected `{token}`, found `{}`", self.current)))
    }
  }

  pub fn expect_id(&self) -> Result<&str, LexerError> {
    self
      .current
      .as_id()
      .ok_or_else(|| self.error(format!("expected identifier, found `{}`", self.current)))
  }

  pub fn expect_char(&self, c: char) -> Result<(), LexerError> {
    match self.current.as_char() {
      Some(found) if found == c => Ok(()),
      _ => Err(self.error(format!("expected `{c}`, found `{}`", self.current))),
    }
  }

  fn error(&self, message: impl Into<String>) -> LexerError {
    LexerError {
      span: self.current_span,
      message: message.into(),
    }
  }

  /// Look at the next raw `logos` token without consuming it.
  fn raw_peek(&mut self) -> Option<TokenKind> {
    if self.buffered.is_none() {
      self.buffered = self.inner.next().map(|kind| (kind, self.inner.span()));
    }
    self.buffered.as_ref().map(|(kind, _)| *kind)
  }

  /// Consume and return the raw token `raw_peek` just looked at.
  fn raw_bump(&mut self) -> (TokenKind, Range<usize>) {
    self.raw_peek();
    self.buffered.take().expect("raw_peek primed the buffer")
  }

  fn emit(&mut self, token: Token, span: Span) -> Result<(), LexerError> {
    self.current_span = span;
    self.current = token;
    Ok(())
  }

  /// The span of the raw token currently sitting in the lookahead buffer
  /// (used to give synthesized `Indent`/`Dedent` tokens a sensible point
  /// span: wherever the next real token starts).
  fn peeked_start(&self) -> usize {
    self
      .buffered
      .as_ref()
      .map(|(_, range)| range.start)
      .unwrap_or(self.src.len())
  }

  /// Consume whitespace/comments/newlines, folding them into indentation
  /// bookkeeping, then deliver the next `Indent`/`Dedent`/`Newline` or real
  /// token (or drain trailing dedents at EOF).
  fn advance(&mut self) -> Result<(), LexerError> {
    loop {
      match self.raw_peek() {
        Some(TokenKind::_Tok_Space) => {
          let (_, range) = self.raw_bump();
          // Only the run of spaces opening the very first line counts: every
          // later line's indentation is folded into `_Tok_Indent` instead,
          // since every later line is necessarily preceded by a newline.
          if !self.primed {
            self.curr_dent = (range.end - range.start) as i32;
          }
        }
        Some(TokenKind::_Tok_Comment) => {
          self.raw_bump();
        }
        Some(TokenKind::_Tok_Indent) => {
          let (_, range) = self.raw_bump();
          self.curr_dent = measure_indent(&self.src[range.clone()]);
          self.primed = true;
          if !matches!(self.current, Token::Newline) {
            let at = range.start;
            return self.emit(Token::Newline, Span { start: at, end: at });
          }
        }
        Some(TokenKind::_Tok_Error) => {
          let (_, range) = self.raw_bump();
          return Err(LexerError {
            span: range.clone().into(),
            message: format!("unexpected character `{}`", &self.src[range]),
          });
        }
        None => return self.finish_at_eof(),
        Some(_) => {
          self.primed = true;
          if self.curr_dent > self.old_dent {
            self.old_dent += INDENT_WIDTH;
            let at = self.peeked_start();
            return self.emit(Token::Indent, Span { start: at, end: at });
          }
          if self.curr_dent < self.old_dent {
            self.old_dent -= INDENT_WIDTH;
            let at = self.peeked_start();
            return self.emit(Token::Dedent, Span { start: at, end: at });
          }
          return self.lex_substantive();
        }
      }
    }
  }

  fn finish_at_eof(&mut self) -> Result<(), LexerError> {
    let at = self.src.len();
    let eof_span = Span { start: at, end: at };
    match self.current {
      Token::Eof => self.emit(Token::Eof, eof_span),
      Token::Newline | Token::Dedent => {
        if self.old_dent > 0 {
          self.old_dent -= INDENT_WIDTH;
          self.emit(Token::Dedent, eof_span)
        } else {
          self.emit(Token::Eof, eof_span)
        }
      }
      _ => self.emit(Token::Newline, eof_span),
    }
  }

  fn lex_substantive(&mut self) -> Result<(), LexerError> {
    let (kind, range) = self.raw_bump();
    let lexeme = &self.src[range.clone()];
    let span: Span = range.into();
    let token = token_from_kind(kind, lexeme, span)?;
    self.current = token;
    self.current_span = span;
    Ok(())
  }
}

/// The indentation of the last line in a `_Tok_Indent` match: earlier blank
/// lines in the same match don't count, only the one the next token sits on.
fn measure_indent(lexeme: &str) -> i32 {
  let pos = lexeme.rfind('\n').unwrap_or(0);
  (lexeme.len() - pos - 1) as i32
}

fn token_from_kind(kind: TokenKind, lexeme: &str, span: Span) -> Result<Token, LexerError> {
  Ok(match kind {
    TokenKind::Kw_Class => Token::Class,
    TokenKind::Kw_Return => Token::Return,
    TokenKind::Kw_If => Token::If,
    TokenKind::Kw_Else => Token::Else,
    TokenKind::Kw_Def => Token::Def,
    TokenKind::Kw_Print => Token::Print,
    TokenKind::Kw_And => Token::And,
    TokenKind::Kw_Or => Token::Or,
    TokenKind::Kw_Not => Token::Not,
    TokenKind::Kw_None => Token::None,
    TokenKind::Kw_True => Token::True,
    TokenKind::Kw_False => Token::False,
    TokenKind::Op_EqualEqual => Token::Eq,
    TokenKind::Op_BangEqual => Token::NotEq,
    TokenKind::Op_LessEqual => Token::LessOrEq,
    TokenKind::Op_MoreEqual => Token::GreaterOrEq,
    TokenKind::Char_Equal => Token::Char('='),
    TokenKind::Char_Less => Token::Char('<'),
    TokenKind::Char_More => Token::Char('>'),
    TokenKind::Char_Plus => Token::Char('+'),
    TokenKind::Char_Minus => Token::Char('-'),
    TokenKind::Char_Star => Token::Char('*'),
    TokenKind::Char_Slash => Token::Char('/'),
    TokenKind::Char_Comma => Token::Char(','),
    TokenKind::Char_Dot => Token::Char('.'),
    TokenKind::Char_ParenL => Token::Char('('),
    TokenKind::Char_ParenR => Token::Char(')'),
    TokenKind::Char_Colon => Token::Char(':'),
    TokenKind::Lit_Number => Token::Number(decode_number(lexeme)),
    TokenKind::Lit_String => Token::String(decode_string(lexeme, span)?),
    TokenKind::Lit_Ident => Token::Id(lexeme.to_string()),
    TokenKind::_Tok_Indent
    | TokenKind::_Tok_Space
    | TokenKind::_Tok_Comment
    | TokenKind::_Tok_Error => {
      unreachable!("filtered out by `Lexer::advance` before reaching `lex_substantive`")
    }
  })
}

fn decode_number(lexeme: &str) -> i32 {
  let mut value: i32 = 0;
  for c in lexeme.chars() {
    let digit = c as i32 - '0' as i32;
    value = value.wrapping_mul(10).wrapping_add(digit);
  }
  value
}

/// Strips the surrounding quotes and decodes `\n`/`\t`/`\r`/`\\`/`\'`/`\"`.
/// The regex that produced `lexeme` only ever matches a balanced, quoted
/// literal, so every backslash here is guaranteed to have a character after
/// it; an unrecognized one is still a real error.
fn decode_string(lexeme: &str, span: Span) -> Result<String, LexerError> {
  let inner = &lexeme[1..lexeme.len() - 1];
  let mut value = String::new();
  let mut chars = inner.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      value.push(c);
      continue;
    }
    let escaped = chars
      .next()
      .expect("regex only matches `\\.` pairs, never a trailing lone backslash");
    let decoded = match escaped {
      'n' => '\n',
      't' => '\t',
      'r' => '\r',
      '\\' => '\\',
      '\'' => '\'',
      '"' => '"',
      other => {
        return Err(LexerError {
          span,
          message: format!("unrecognized escape sequence `\\{other}`"),
        })
      }
    };
    value.push(decoded);
  }
  Ok(value)
}
