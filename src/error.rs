use crate::{pest_expr::Rule, result::ParseFailure};

#[derive(Debug, thiserror::Error)]
pub enum ExprError {
  #[error("invalid pattern: {0}")]
  Pattern(#[from] regex::Error),
  #[error(
    "{line}:{column}: expected {expected}, stopped at {remainder:?}"
  )]
  Syntax {
    line: u32,
    column: usize,
    expected: String,
    remainder: String,
  },
  #[error("{line}:{column}: unexpected trailing input {remainder:?}")]
  Trailing {
    line: u32,
    column: usize,
    remainder: String,
  },
  #[error("{0}")]
  Pest(#[from] Box<pest::error::Error<Rule>>),
  #[error("invalid number: {0}")]
  Number(#[from] std::num::ParseIntError),
  #[error("malformed parse tree: {0}")]
  Malformed(&'static str),
}

impl<'a> From<ParseFailure<'a>> for ExprError {
  fn from(e: ParseFailure<'a>) -> Self {
    Self::Syntax {
      line: e.at.location_line(),
      column: e.at.get_utf8_column(),
      expected: e.expected.to_string(),
      remainder: e.at.fragment().to_string(),
    }
  }
}
