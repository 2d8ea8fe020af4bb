//! The expression grammar written for pest. It accepts exactly the
//! language of [`crate::grammar::ExprGrammar`] with default options
//! and builds the same trees.

use pest::{iterators::Pair, Parser};

use crate::{ast::Expression, error::ExprError};

#[derive(pest_derive::Parser)]
#[grammar_inline = r#"
digits = @{ ASCII_DIGIT+ }
addition = { digits ~ "+" ~ expression }
subtraction = { digits ~ "-" ~ expression }
expression = { addition | subtraction | digits }
file = { SOI ~ expression ~ EOI }
"#]
pub struct ExprPestParser;

fn build(
  pair: Pair<Rule>,
) -> Result<Expression, ExprError> {
  match pair.as_rule() {
    Rule::expression => {
      let inner = pair
        .into_inner()
        .next()
        .ok_or(ExprError::Malformed("empty expression"))?;
      build(inner)
    }
    rule @ (Rule::addition | Rule::subtraction) => {
      let mut operands = pair.into_inner();
      let (Some(lhs), Some(rhs)) =
        (operands.next(), operands.next())
      else {
        return Err(ExprError::Malformed(
          "binary operation needs two operands",
        ));
      };
      let (lhs, rhs) = (build(lhs)?, build(rhs)?);
      Ok(if rule == Rule::addition {
        Expression::add(lhs, rhs)
      } else {
        Expression::sub(lhs, rhs)
      })
    }
    Rule::digits => {
      Ok(Expression::Number(pair.as_str().parse()?))
    }
    _ => Err(ExprError::Malformed("unexpected rule")),
  }
}

/// Parse the whole of `input` as one expression.
pub fn parse(input: &str) -> Result<Expression, ExprError> {
  let file = ExprPestParser::parse(Rule::file, input)
    .map_err(Box::new)?
    .next()
    .ok_or(ExprError::Malformed("missing file rule"))?;
  let expression = file
    .into_inner()
    .next()
    .ok_or(ExprError::Malformed("missing expression"))?;
  build(expression)
}
