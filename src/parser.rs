//! Recursive-descent parser: `Lexer` token stream → AST. One function per
//! precedence level, cursoring over the lexer's `current()`/`bump()`
//! contract with indentation already resolved into `Indent`/`Dedent`
//! tokens underneath.

use std::rc::Rc;

use span::{Span, Spanned};

use crate::ast::{Comparator, Expr, PrintArgs, SExpr, SStmt, Stmt};
use crate::error::{Error, ParseError};
use crate::lexer::Lexer;
use crate::object::Method;
use crate::token::Token;

pub struct Parser<'src> {
  lexer: Lexer<'src>,
}

pub fn parse(src: &str) -> Result<SStmt, Error> {
  Parser::new(src)?.parse_program()
}

impl<'src> Parser<'src> {
  pub fn new(src: &'src str) -> Result<Self, Error> {
    Ok(Parser {
      lexer: Lexer::new(src)?,
    })
  }

  fn current_span(&self) -> Span {
    self.lexer.span()
  }

  fn error(&self, message: impl Into<String>) -> Error {
    Error::Parse(ParseError {
      span: self.lexer.span(),
      message: message.into(),
    })
  }

  fn bump(&mut self) -> Result<(), Error> {
    self.lexer.next()?;
    Ok(())
  }

  fn expect_token(&mut self, token: &Token) -> Result<(), Error> {
    if self.lexer.current() == token {
      self.bump()
    } else {
      Err(self.error(format!(
        "expected `{token}`, found `{}`",
        self.lexer.current()
      )))
    }
  }

  fn expect_char(&mut self, c: char) -> Result<(), Error> {
    match self.lexer.current().as_char() {
      Some(found) if found == c => self.bump(),
      _ => Err(self.error(format!(
        "expected `{c}`, found `{}`",
        self.lexer.current()
      ))),
    }
  }

  fn expect_id(&mut self) -> Result<Rc<str>, Error> {
    match self.lexer.current().as_id() {
      Some(word) => {
        let word: Rc<str> = Rc::from(word);
        self.bump()?;
        Ok(word)
      }
      Option::None => Err(self.error(format!(
        "expected identifier, found `{}`",
        self.lexer.current()
      ))),
    }
  }

  pub fn parse_program(mut self) -> Result<SStmt, Error> {
    let start = self.current_span();
    let mut stmts = Vec::new();
    while !self.lexer.current().is_eof() {
      if matches!(self.lexer.current(), Token::Newline) {
        self.bump()?;
        continue;
      }
      stmts.push(self.parse_stmt()?);
    }
    let end = self.current_span();
    Ok(Spanned::new(start.join(end), Stmt::Compound(stmts)))
  }

  fn parse_block(&mut self) -> Result<Vec<SStmt>, Error> {
    self.expect_token(&Token::Indent)?;
    let mut stmts = Vec::new();
    loop {
      match self.lexer.current() {
        Token::Dedent => {
          self.bump()?;
          break;
        }
        Token::Eof => {
          return Err(self.error("unexpected end of input, expected a statement or dedent"))
        }
        Token::Newline => {
          self.bump()?;
        }
        _ => stmts.push(self.parse_stmt()?),
      }
    }
    Ok(stmts)
  }

  fn parse_stmt(&mut self) -> Result<SStmt, Error> {
    match self.lexer.current() {
      Token::Class => self.parse_class_def(),
      Token::If => self.parse_if_stmt(),
      Token::Return => self.parse_return_stmt(),
      Token::Print => self.parse_print_stmt(),
      _ => self.parse_simple_stmt(),
    }
  }

  fn parse_class_def(&mut self) -> Result<SStmt, Error> {
    let start = self.current_span();
    self.bump()?; // 'class'
    let name = self.expect_id()?;
    let parent = if self.lexer.current().as_char() == Some('(') {
      self.bump()?;
      let parent = self.expect_id()?;
      self.expect_char(')')?;
      Some(parent)
    } else {
      Option::None
    };
    self.expect_char(':')?;
    self.expect_token(&Token::Newline)?;
    self.expect_token(&Token::Indent)?;
    let mut methods = Vec::new();
    loop {
      match self.lexer.current() {
        Token::Dedent => {
          self.bump()?;
          break;
        }
        Token::Newline => {
          self.bump()?;
        }
        Token::Eof => return Err(self.error("unexpected end of input inside class body")),
        _ => methods.push(self.parse_method_def()?),
      }
    }
    let end = self.current_span();
    Ok(Spanned::new(
      start.join(end),
      Stmt::ClassDefinition {
        name,
        parent,
        methods,
      },
    ))
  }

  fn parse_method_def(&mut self) -> Result<Rc<Method>, Error> {
    self.expect_token(&Token::Def)?;
    let name = self.expect_id()?;
    self.expect_char('(')?;
    let mut params = Vec::new();
    if self.lexer.current().as_char() != Some(')') {
      loop {
        params.push(self.expect_id()?);
        if self.lexer.current().as_char() == Some(',') {
          self.bump()?;
          continue;
        }
        break;
      }
    }
    self.expect_char(')')?;
    self.expect_char(':')?;
    self.expect_token(&Token::Newline)?;
    let start = self.current_span();
    let stmts = self.parse_block()?;
    let end = self.current_span();
    let block = Spanned::new(start.join(end), Stmt::Compound(stmts));
    let body = Spanned::new(block.span, Stmt::MethodBody(Box::new(block)));
    Ok(Rc::new(Method {
      name,
      params,
      body: Rc::new(body),
    }))
  }

  fn parse_if_stmt(&mut self) -> Result<SStmt, Error> {
    let start = self.current_span();
    self.bump()?; // 'if'
    let cond = self.parse_expr()?;
    self.expect_char(':')?;
    self.expect_token(&Token::Newline)?;
    let block_start = self.current_span();
    let stmts = self.parse_block()?;
    let block_end = self.current_span();
    let then_branch = Box::new(Spanned::new(block_start.join(block_end), Stmt::Compound(stmts)));
    let else_branch = self.parse_elif_or_else()?;
    let end = self.current_span();
    Ok(Spanned::new(
      start.join(end),
      Stmt::IfElse {
        cond,
        then_branch,
        else_branch,
      },
    ))
  }

  /// `elif` is not a keyword: it's the identifier `elif` in exactly the one
  /// spot an `else` could also go, peeked here without touching the
  /// lexer's keyword table, so `elif` stays a legal variable/field name
  /// everywhere else a word can appear.
  fn parse_elif_or_else(&mut self) -> Result<Option<Box<SStmt>>, Error> {
    if self.lexer.current().as_id() == Some("elif") {
      let start = self.current_span();
      self.bump()?;
      let cond = self.parse_expr()?;
      self.expect_char(':')?;
      self.expect_token(&Token::Newline)?;
      let block_start = self.current_span();
      let stmts = self.parse_block()?;
      let block_end = self.current_span();
      let then_branch = Box::new(Spanned::new(
        block_start.join(block_end),
        Stmt::Compound(stmts),
      ));
      let else_branch = self.parse_elif_or_else()?;
      let end = self.current_span();
      return Ok(Some(Box::new(Spanned::new(
        start.join(end),
        Stmt::IfElse {
          cond,
          then_branch,
          else_branch,
        },
      ))));
    }
    if matches!(self.lexer.current(), Token::Else) {
      self.bump()?;
      self.expect_char(':')?;
      self.expect_token(&Token::Newline)?;
      let start = self.current_span();
      let stmts = self.parse_block()?;
      let end = self.current_span();
      return Ok(Some(Box::new(Spanned::new(
        start.join(end),
        Stmt::Compound(stmts),
      ))));
    }
    Ok(Option::None)
  }

  fn parse_return_stmt(&mut self) -> Result<SStmt, Error> {
    let start = self.current_span();
    self.bump()?; // 'return'
    let expr = if matches!(self.lexer.current(), Token::Newline) {
      Option::None
    } else {
      Some(self.parse_expr()?)
    };
    self.expect_token(&Token::Newline)?;
    let end = self.current_span();
    Ok(Spanned::new(start.join(end), Stmt::Return(expr)))
  }

  fn parse_print_stmt(&mut self) -> Result<SStmt, Error> {
    let start = self.current_span();
    self.bump()?; // 'print'
    let mut args = Vec::new();
    if !matches!(self.lexer.current(), Token::Newline) {
      args.push(self.parse_expr()?);
      while self.lexer.current().as_char() == Some(',') {
        self.bump()?;
        args.push(self.parse_expr()?);
      }
    }
    self.expect_token(&Token::Newline)?;
    let end = self.current_span();
    Ok(Spanned::new(start.join(end), Stmt::Print(PrintArgs::List(args))))
  }

  fn parse_simple_stmt(&mut self) -> Result<SStmt, Error> {
    let start = self.current_span();
    let expr = self.parse_expr()?;
    if self.lexer.current().as_char() == Some('=') {
      self.bump()?;
      let value = self.parse_expr()?;
      self.expect_token(&Token::Newline)?;
      let end = self.current_span();
      let stmt = match expr.into_inner() {
        Expr::Variable(path) if path.len() == 1 => Stmt::Assignment {
          name: path.into_iter().next().expect("len checked"),
          value,
        },
        Expr::Variable(mut path) => {
          let field = path.pop().expect("len >= 2");
          Stmt::FieldAssignment {
            object_path: path,
            field,
            value,
          }
        }
        _ => return Err(self.error("left-hand side of assignment must be a variable or field")),
      };
      return Ok(Spanned::new(start.join(end), stmt));
    }
    self.expect_token(&Token::Newline)?;
    let end = self.current_span();
    Ok(Spanned::new(start.join(end), Stmt::Expr(expr)))
  }

  fn parse_expr(&mut self) -> Result<SExpr, Error> {
    self.parse_or()
  }

  fn parse_or(&mut self) -> Result<SExpr, Error> {
    let mut lhs = self.parse_and()?;
    while matches!(self.lexer.current(), Token::Or) {
      let start = lhs.span;
      self.bump()?;
      let rhs = self.parse_and()?;
      let end = rhs.span;
      lhs = Spanned::new(start.join(end), Expr::Or(Box::new(lhs), Box::new(rhs)));
    }
    Ok(lhs)
  }

  fn parse_and(&mut self) -> Result<SExpr, Error> {
    let mut lhs = self.parse_not()?;
    while matches!(self.lexer.current(), Token::And) {
      let start = lhs.span;
      self.bump()?;
      let rhs = self.parse_not()?;
      let end = rhs.span;
      lhs = Spanned::new(start.join(end), Expr::And(Box::new(lhs), Box::new(rhs)));
    }
    Ok(lhs)
  }

  fn parse_not(&mut self) -> Result<SExpr, Error> {
    if matches!(self.lexer.current(), Token::Not) {
      let start = self.current_span();
      self.bump()?;
      let operand = self.parse_not()?;
      let end = operand.span;
      return Ok(Spanned::new(start.join(end), Expr::Not(Box::new(operand))));
    }
    self.parse_comparison()
  }

  fn parse_comparison(&mut self) -> Result<SExpr, Error> {
    let lhs = self.parse_additive()?;
    let cmp = match self.lexer.current() {
      Token::Eq => Some(Comparator::Equal),
      Token::NotEq => Some(Comparator::NotEqual),
      Token::LessOrEq => Some(Comparator::LessOrEqual),
      Token::GreaterOrEq => Some(Comparator::GreaterOrEqual),
      Token::Char('<') => Some(Comparator::Less),
      Token::Char('>') => Some(Comparator::Greater),
      _ => Option::None,
    };
    let Some(cmp) = cmp else {
      return Ok(lhs);
    };
    let start = lhs.span;
    self.bump()?;
    let rhs = self.parse_additive()?;
    let end = rhs.span;
    Ok(Spanned::new(
      start.join(end),
      Expr::Comparison(cmp, Box::new(lhs), Box::new(rhs)),
    ))
  }

  fn parse_additive(&mut self) -> Result<SExpr, Error> {
    let mut lhs = self.parse_term()?;
    loop {
      let is_add = match self.lexer.current().as_char() {
        Some('+') => true,
        Some('-') => false,
        _ => break,
      };
      let start = lhs.span;
      self.bump()?;
      let rhs = self.parse_term()?;
      let end = rhs.span;
      lhs = Spanned::new(
        start.join(end),
        if is_add {
          Expr::Add(Box::new(lhs), Box::new(rhs))
        } else {
          Expr::Sub(Box::new(lhs), Box::new(rhs))
        },
      );
    }
    Ok(lhs)
  }

  fn parse_term(&mut self) -> Result<SExpr, Error> {
    let mut lhs = self.parse_unary()?;
    loop {
      let is_mult = match self.lexer.current().as_char() {
        Some('*') => true,
        Some('/') => false,
        _ => break,
      };
      let start = lhs.span;
      self.bump()?;
      let rhs = self.parse_unary()?;
      let end = rhs.span;
      lhs = Spanned::new(
        start.join(end),
        if is_mult {
          Expr::Mult(Box::new(lhs), Box::new(rhs))
        } else {
          Expr::Div(Box::new(lhs), Box::new(rhs))
        },
      );
    }
    Ok(lhs)
  }

  fn parse_unary(&mut self) -> Result<SExpr, Error> {
    if self.lexer.current().as_char() == Some('-') {
      let start = self.current_span();
      self.bump()?;
      let operand = self.parse_unary()?;
      let end = operand.span;
      let zero = Spanned::new(start, Expr::Number(0));
      return Ok(Spanned::new(
        start.join(end),
        Expr::Sub(Box::new(zero), Box::new(operand)),
      ));
    }
    self.parse_postfix()
  }

  fn parse_postfix(&mut self) -> Result<SExpr, Error> {
    let mut expr = self.parse_primary()?;
    loop {
      if self.lexer.current().as_char() == Some('.') {
        let base_span = expr.span;
        self.bump()?;
        let name = self.expect_id()?;
        if self.lexer.current().as_char() == Some('(') {
          let args = self.parse_args()?;
          let end = self.current_span();
          expr = Spanned::new(
            base_span.join(end),
            Expr::MethodCall {
              object: Box::new(expr),
              method: name,
              args,
            },
          );
        } else {
          let end = self.current_span();
          let new_span = base_span.join(end);
          expr = match expr.into_inner() {
            Expr::Variable(mut path) => {
              path.push(name);
              Spanned::new(new_span, Expr::Variable(path))
            }
            _ => {
              return Err(
                self.error("field access `.name` without a call is only supported on a variable"),
              )
            }
          };
        }
      } else if self.lexer.current().as_char() == Some('(') {
        let start = expr.span;
        let args = self.parse_args()?;
        let end = self.current_span();
        expr = Spanned::new(
          start.join(end),
          Expr::NewInstance {
            class_ref: Box::new(expr),
            args,
          },
        );
      } else {
        break;
      }
    }
    Ok(expr)
  }

  fn parse_args(&mut self) -> Result<Vec<SExpr>, Error> {
    self.expect_char('(')?;
    let mut args = Vec::new();
    if self.lexer.current().as_char() != Some(')') {
      loop {
        args.push(self.parse_expr()?);
        if self.lexer.current().as_char() == Some(',') {
          self.bump()?;
          continue;
        }
        break;
      }
    }
    self.expect_char(')')?;
    Ok(args)
  }

  fn parse_primary(&mut self) -> Result<SExpr, Error> {
    let start = self.current_span();
    match self.lexer.current().clone() {
      Token::Number(n) => {
        self.bump()?;
        Ok(Spanned::new(start, Expr::Number(n)))
      }
      Token::String(s) => {
        self.bump()?;
        Ok(Spanned::new(start, Expr::Str(s.into())))
      }
      Token::True => {
        self.bump()?;
        Ok(Spanned::new(start, Expr::Bool(true)))
      }
      Token::False => {
        self.bump()?;
        Ok(Spanned::new(start, Expr::Bool(false)))
      }
      Token::None => {
        self.bump()?;
        Ok(Spanned::new(start, Expr::NoneConst))
      }
      Token::Id(ref word) if word == "str" => {
        self.bump()?;
        self.expect_char('(')?;
        let inner = self.parse_expr()?;
        self.expect_char(')')?;
        let end = self.current_span();
        Ok(Spanned::new(start.join(end), Expr::Stringify(Box::new(inner))))
      }
      Token::Id(word) => {
        self.bump()?;
        Ok(Spanned::new(start, Expr::Variable(vec![word.into()])))
      }
      Token::Char('(') => {
        self.bump()?;
        let inner = self.parse_expr()?;
        self.expect_char(')')?;
        Ok(inner)
      }
      other => Err(self.error(format!("unexpected token `{other}` in an expression"))),
    }
  }
}

#[cfg(test)]
mod tests;
