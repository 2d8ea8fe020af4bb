//! Grammar of the numeric expressions:
//!
//! ```text
//! expression  := addition | subtraction | digits
//! addition    := digits "+" expression
//! subtraction := digits "-" expression
//! digits      := [0-9]+
//! ```
//!
//! The recursion sits on the right, so `1-2-3` reads as
//! `1-(2-3)`. [`Associativity::Left`] gives the usual
//! reading. Both are parsed as a flat run of operands with
//! [`Parser::many`] and folded into a tree afterwards.

use regex::Regex;

use crate::{
  ast::Expression,
  error::ExprError,
  parser::Parser,
  primitives::{literal, matching, spaced},
  result::ParseResult,
};

const DIGITS: &str = "^[0-9]+";

type Operations<'a> =
  (Expression, Vec<(&'a str, Expression)>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Associativity {
  #[default]
  Right,
  Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrammarOptions {
  pub associativity: Associativity,
  /// Allow blanks around numbers and operators.
  pub whitespace: bool,
}

#[derive(Debug, Clone)]
pub struct ExprGrammar {
  digits: Regex,
  options: GrammarOptions,
}

impl ExprGrammar {
  pub fn new() -> Result<Self, ExprError> {
    Self::with_options(GrammarOptions::default())
  }

  pub fn with_options(
    options: GrammarOptions,
  ) -> Result<Self, ExprError> {
    Ok(Self {
      digits: Regex::new(DIGITS)?,
      options,
    })
  }

  pub fn options(&self) -> GrammarOptions {
    self.options
  }

  fn token<'a, O: 'a>(
    &self,
    p: Parser<'a, O>,
  ) -> Parser<'a, O> {
    if self.options.whitespace {
      spaced(p)
    } else {
      p
    }
  }

  pub fn digits<'a>(&self) -> Parser<'a, Expression> {
    self
      .token(matching(self.digits.clone()).label("digits"))
      .try_map(|s| s.parse::<i64>().map(Expression::Number))
  }

  pub fn expression<'a>(&self) -> Parser<'a, Expression> {
    match self.options.associativity {
      Associativity::Right => self.right_expression(),
      Associativity::Left => self.left_expression(),
    }
  }

  /// `digits (("+" | "-") digits)*`, the operands and
  /// operators in input order.
  fn operations<'a>(
    &self,
  ) -> Parser<'a, Operations<'a>> {
    let operator =
      self.token(literal("+")) | self.token(literal("-"));
    self.digits().and(operator.and(self.digits()).many())
  }

  fn right_expression<'a>(&self) -> Parser<'a, Expression> {
    self.operations().map(|(first, mut rest)| {
      let Some((mut op, mut acc)) = rest.pop() else {
        return first;
      };
      for (prev_op, lhs) in rest.into_iter().rev() {
        acc = binary(op, lhs, acc);
        op = prev_op;
      }
      binary(op, first, acc)
    })
  }

  fn left_expression<'a>(&self) -> Parser<'a, Expression> {
    self.operations().map(|(first, rest)| {
      rest
        .into_iter()
        .fold(first, |acc, (op, rhs)| binary(op, acc, rhs))
    })
  }

  /// Parse an expression from the start of `input`, leaving the
  /// rest as the remainder.
  pub fn parse<'a>(
    &self,
    input: &'a str,
  ) -> ParseResult<'a, Expression> {
    self.expression().parse(input)
  }

  /// Parse the whole of `input` as one expression.
  pub fn parse_complete(
    &self,
    input: &str,
  ) -> Result<Expression, ExprError> {
    let (ex, rest) = self.parse(input).into_result()?;
    if !rest.fragment().is_empty() {
      return Err(ExprError::Trailing {
        line: rest.location_line(),
        column: rest.get_utf8_column(),
        remainder: rest.fragment().to_string(),
      });
    }
    dprintln!("parsed {input:?} as {ex}");
    Ok(ex)
  }
}

fn binary(
  op: &str,
  lhs: Expression,
  rhs: Expression,
) -> Expression {
  if op == "+" {
    Expression::add(lhs, rhs)
  } else {
    Expression::sub(lhs, rhs)
  }
}

/// Parse `input` with the default grammar and evaluate it.
pub fn eval_str(input: &str) -> Result<i64, ExprError> {
  Ok(ExprGrammar::new()?.parse_complete(input)?.eval())
}
