use nom::{
  character::complete::multispace0, sequence::delimited,
  IResult, InputTake,
};
use regex::Regex;

use crate::{
  parser::Parser,
  result::{Expected, ParseFailure, ParseResult, Span},
};

fn consume<'a>(
  input: Span<'a>,
  len: usize,
) -> ParseResult<'a, &'a str> {
  let (rest, matched) = input.take_split(len);
  ParseResult::success(*matched.fragment(), rest)
}

/// Match `lit` at the start of the input, producing the matched
/// text.
pub fn literal<'a>(lit: &str) -> Parser<'a, &'a str> {
  let lit = lit.to_owned();
  Parser::new(move |input| {
    if input.fragment().starts_with(lit.as_str()) {
      consume(input, lit.len())
    } else {
      ParseResult::failure(ParseFailure::new(
        input,
        Expected::Literal(lit.clone()),
      ))
    }
  })
}

/// Compile `pattern` anchored at the start of the input.
pub fn regex<'a>(
  pattern: &str,
) -> Result<Parser<'a, &'a str>, regex::Error> {
  Ok(matching(Regex::new(&format!("^(?:{pattern})"))?))
}

/// Match an already compiled regex. Only a match beginning at the
/// first character of the input counts.
pub fn matching<'a>(re: Regex) -> Parser<'a, &'a str> {
  Parser::new(move |input| {
    match re.find(input.fragment()) {
      Some(m) if m.start() == 0 => consume(input, m.end()),
      _ => ParseResult::failure(ParseFailure::new(
        input,
        Expected::Pattern(re.as_str().to_owned()),
      )),
    }
  })
}

/// Match one character satisfying `pred`.
pub fn satisfy<'a>(
  name: &'static str,
  pred: impl Fn(char) -> bool + 'a,
) -> Parser<'a, char> {
  Parser::new(move |input| {
    match input.fragment().chars().next() {
      Some(c) if pred(c) => {
        let (rest, _) = input.take_split(c.len_utf8());
        ParseResult::success(c, rest)
      }
      _ => ParseResult::failure(ParseFailure::new(
        input,
        Expected::Label(name),
      )),
    }
  })
}

/// Match the longest non-empty run of characters satisfying
/// `pred`.
pub fn take_while1<'a>(
  name: &'static str,
  pred: impl Fn(char) -> bool + 'a,
) -> Parser<'a, &'a str> {
  Parser::new(move |input| {
    let len = input
      .fragment()
      .char_indices()
      .find(|(_, c)| !pred(*c))
      .map_or(input.fragment().len(), |(i, _)| i);
    if len == 0 {
      ParseResult::failure(ParseFailure::new(
        input,
        Expected::Label(name),
      ))
    } else {
      consume(input, len)
    }
  })
}

pub fn end_of_input<'a>() -> Parser<'a, ()> {
  Parser::new(|input| {
    if input.fragment().is_empty() {
      ParseResult::success((), input)
    } else {
      ParseResult::failure(ParseFailure::new(
        input,
        Expected::EndOfInput,
      ))
    }
  })
}

/// Lift a nom parser over [`Span`] into a [`Parser`].
pub fn from_nom<'a, O: 'a>(
  f: impl Fn(Span<'a>) -> IResult<Span<'a>, O> + 'a,
) -> Parser<'a, O> {
  Parser::new(move |input| match f(input) {
    Ok((remainder, value)) => {
      ParseResult::success(value, remainder)
    }
    Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
      ParseResult::failure(ParseFailure {
        input,
        at: e.input,
        expected: Expected::Nom(e.code),
      })
    }
    Err(nom::Err::Incomplete(_)) => ParseResult::failure(
      ParseFailure::new(input, Expected::MoreInput),
    ),
  })
}

/// Skip any amount of whitespace, including none.
pub fn whitespace<'a>() -> Parser<'a, ()> {
  from_nom(|i| multispace0(i).map(|(r, _)| (r, ())))
}

/// Surround `p` with optional whitespace on both sides.
pub fn spaced<'a, O: 'a>(
  p: Parser<'a, O>,
) -> Parser<'a, O> {
  whitespace().then(p).skip(whitespace())
}

/// Like [`spaced`], but for a nom parser, the way the nom grammars
/// delimit their tokens.
pub fn space_delimited<'a, O: 'a>(
  f: impl Fn(Span<'a>) -> IResult<Span<'a>, O> + 'a,
) -> Parser<'a, O> {
  from_nom(move |i| {
    delimited(multispace0, &f, multispace0)(i)
  })
}
