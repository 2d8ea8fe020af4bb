use std::fmt::Display;

use nom_locate::LocatedSpan;

pub type Span<'a> = LocatedSpan<&'a str>;

/// What a failing parser was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
  Literal(String),
  Pattern(String),
  Label(&'static str),
  /// The text matched, but could not be turned into a value.
  Invalid(String),
  EndOfInput,
  MoreInput,
  Nom(nom::error::ErrorKind),
}

impl Display for Expected {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> std::fmt::Result {
    match self {
      Self::Literal(lit) => write!(f, "{lit:?}"),
      Self::Pattern(pat) => write!(f, "pattern /{pat}/"),
      Self::Label(name) => write!(f, "{name}"),
      Self::Invalid(msg) => write!(f, "valid value ({msg})"),
      Self::EndOfInput => write!(f, "end of input"),
      Self::MoreInput => write!(f, "more input"),
      Self::Nom(kind) => write!(f, "{}", kind.description()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
  "expected {} at {}:{}",
  .expected,
  .at.location_line(),
  .at.get_utf8_column()
)]
pub struct ParseFailure<'a> {
  /// Start of the input given to the parser reporting this failure.
  pub input: Span<'a>,
  /// Where the innermost failure happened.
  pub at: Span<'a>,
  pub expected: Expected,
}

impl<'a> ParseFailure<'a> {
  pub fn new(at: Span<'a>, expected: Expected) -> Self {
    Self {
      input: at,
      at,
      expected,
    }
  }

  /// Report this failure against `input`, keeping the
  /// position of the innermost failure.
  pub fn restart(self, input: Span<'a>) -> Self {
    Self { input, ..self }
  }
}

/// Outcome of applying a parser to a prefix of the input.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult<'a, O> {
  Success { value: O, remainder: Span<'a> },
  Failure(ParseFailure<'a>),
}

impl<'a, O> ParseResult<'a, O> {
  pub fn success(value: O, remainder: Span<'a>) -> Self {
    Self::Success { value, remainder }
  }

  pub fn failure(reason: ParseFailure<'a>) -> Self {
    Self::Failure(reason)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, Self::Success { .. })
  }

  pub fn is_failure(&self) -> bool {
    !self.is_success()
  }

  pub fn map<O1>(
    self,
    f: impl FnOnce(O) -> O1,
  ) -> ParseResult<'a, O1> {
    match self {
      Self::Success { value, remainder } => {
        ParseResult::Success {
          value: f(value),
          remainder,
        }
      }
      Self::Failure(e) => ParseResult::Failure(e),
    }
  }

  pub fn value(&self) -> Option<&O> {
    match self {
      Self::Success { value, .. } => Some(value),
      Self::Failure(_) => None,
    }
  }

  pub fn remainder(&self) -> Option<Span<'a>> {
    match self {
      Self::Success { remainder, .. } => Some(*remainder),
      Self::Failure(_) => None,
    }
  }

  pub fn failure_info(&self) -> Option<&ParseFailure<'a>> {
    match self {
      Self::Success { .. } => None,
      Self::Failure(e) => Some(e),
    }
  }

  pub fn into_result(
    self,
  ) -> Result<(O, Span<'a>), ParseFailure<'a>> {
    match self {
      Self::Success { value, remainder } => {
        Ok((value, remainder))
      }
      Self::Failure(e) => Err(e),
    }
  }
}
