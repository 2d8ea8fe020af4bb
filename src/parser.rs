use std::{
  ops::{BitAnd, BitOr},
  rc::Rc,
};

use nom::{InputTake, Offset};

use crate::result::{
  Expected, ParseFailure, ParseResult, Span,
};

type ParseFn<'a, O> =
  dyn Fn(Span<'a>) -> ParseResult<'a, O> + 'a;

/// The part of `i` that lies before `r`. `r` must be a
/// remainder of `i`.
pub(crate) fn calc_offset<'a>(
  i: Span<'a>,
  r: Span<'a>,
) -> Span<'a> {
  i.take(i.offset(&r))
}

/// A parser is a shared, immutable function from input text to
/// a [`ParseResult`]. Combinators consume parsers and return new
/// ones closing over them; nothing is mutated.
pub struct Parser<'a, O> {
  run: Rc<ParseFn<'a, O>>,
}

impl<'a, O> Clone for Parser<'a, O> {
  fn clone(&self) -> Self {
    Self {
      run: Rc::clone(&self.run),
    }
  }
}

impl<'a, O: 'a> Parser<'a, O> {
  pub fn new(
    f: impl Fn(Span<'a>) -> ParseResult<'a, O> + 'a,
  ) -> Self {
    Self { run: Rc::new(f) }
  }

  pub fn apply(
    &self,
    input: Span<'a>,
  ) -> ParseResult<'a, O> {
    (self.run)(input)
  }

  pub fn parse(
    &self,
    input: &'a str,
  ) -> ParseResult<'a, O> {
    self.apply(Span::new(input))
  }

  /// Sequencing. `next` runs on the remainder of `self`; a
  /// failure on either side is reported against the original
  /// input.
  pub fn and<O2: 'a>(
    self,
    next: Parser<'a, O2>,
  ) -> Parser<'a, (O, O2)> {
    Parser::new(move |input| {
      let (first, rest) = match self.apply(input) {
        ParseResult::Success { value, remainder } => {
          (value, remainder)
        }
        ParseResult::Failure(e) => {
          return ParseResult::Failure(e.restart(input))
        }
      };
      match next.apply(rest) {
        ParseResult::Success { value, remainder } => {
          ParseResult::success((first, value), remainder)
        }
        ParseResult::Failure(e) => {
          ParseResult::Failure(e.restart(input))
        }
      }
    })
  }

  /// Ordered choice: `other` only runs when `self` fails, and
  /// always on the original input.
  pub fn or(self, other: Self) -> Self {
    Parser::new(move |input| match self.apply(input) {
      res @ ParseResult::Success { .. } => res,
      ParseResult::Failure(_) => other.apply(input),
    })
  }

  /// Zero or more repetitions. Never fails.
  pub fn many(self) -> Parser<'a, Vec<O>> {
    self.fold_many(Vec::new, |mut acc, value| {
      acc.push(value);
      acc
    })
  }

  pub fn many1(self) -> Parser<'a, Vec<O>> {
    self.clone().and(self.many()).map(|(first, rest)| {
      let mut values = Vec::with_capacity(rest.len() + 1);
      values.push(first);
      values.extend(rest);
      values
    })
  }

  /// Iterative left fold over repetitions of `self`. A success
  /// that consumes nothing stops the loop and is discarded.
  pub fn fold_many<A: 'a>(
    self,
    init: impl Fn() -> A + 'a,
    f: impl Fn(A, O) -> A + 'a,
  ) -> Parser<'a, A> {
    Parser::new(move |input| {
      let mut acc = init();
      let mut rest = input;
      while let ParseResult::Success { value, remainder } =
        self.apply(rest)
      {
        let offset = remainder.location_offset();
        if offset == rest.location_offset() {
          break;
        }
        acc = f(acc, value);
        rest = remainder;
      }
      ParseResult::success(acc, rest)
    })
  }

  pub fn map<O1: 'a>(
    self,
    f: impl Fn(O) -> O1 + 'a,
  ) -> Parser<'a, O1> {
    Parser::new(move |input| self.apply(input).map(&f))
  }

  /// Like [`Self::map`], but `f` may reject the value, which
  /// turns the success into a failure at the original input.
  pub fn try_map<O1: 'a, E: std::fmt::Display>(
    self,
    f: impl Fn(O) -> Result<O1, E> + 'a,
  ) -> Parser<'a, O1> {
    Parser::new(move |input| match self.apply(input) {
      ParseResult::Success { value, remainder } => {
        match f(value) {
          Ok(value) => {
            ParseResult::success(value, remainder)
          }
          Err(e) => ParseResult::failure(ParseFailure::new(
            input,
            Expected::Invalid(e.to_string()),
          )),
        }
      }
      ParseResult::Failure(e) => ParseResult::Failure(e),
    })
  }

  /// Applicative application: the function parser (`self`) runs
  /// first, then `arg` on its remainder.
  pub fn ap<V: 'a, O1: 'a>(
    self,
    arg: Parser<'a, V>,
  ) -> Parser<'a, O1>
  where
    O: FnOnce(V) -> O1,
  {
    Parser::new(move |input| {
      let (f, rest) = match self.apply(input) {
        ParseResult::Success { value, remainder } => {
          (value, remainder)
        }
        ParseResult::Failure(e) => {
          return ParseResult::Failure(e.restart(input))
        }
      };
      match arg.apply(rest) {
        ParseResult::Success { value, remainder } => {
          ParseResult::success(f(value), remainder)
        }
        ParseResult::Failure(e) => {
          ParseResult::Failure(e.restart(input))
        }
      }
    })
  }

  pub fn opt(self) -> Parser<'a, Option<O>> {
    Parser::new(move |input| match self.apply(input) {
      ParseResult::Success { value, remainder } => {
        ParseResult::success(Some(value), remainder)
      }
      ParseResult::Failure(_) => {
        ParseResult::success(None, input)
      }
    })
  }

  /// Run `next` after `self` and keep only the value of `self`.
  pub fn skip<O2: 'a>(self, next: Parser<'a, O2>) -> Self {
    self.and(next).map(|(value, _)| value)
  }

  /// Run `next` after `self` and keep only the value of `next`.
  pub fn then<O2: 'a>(
    self,
    next: Parser<'a, O2>,
  ) -> Parser<'a, O2> {
    self.and(next).map(|(_, value)| value)
  }

  pub fn void(self) -> Parser<'a, ()> {
    self.map(|_| ())
  }

  /// Replace the value with the text the parser consumed.
  pub fn recognize(self) -> Parser<'a, &'a str> {
    Parser::new(move |input| match self.apply(input) {
      ParseResult::Success { remainder, .. } => {
        let consumed = calc_offset(input, remainder);
        let text = *consumed.fragment();
        ParseResult::success(text, remainder)
      }
      ParseResult::Failure(e) => ParseResult::Failure(e),
    })
  }

  /// Name this parser in failures and in debug traces.
  pub fn label(self, name: &'static str) -> Self {
    Parser::new(move |input| {
      dprintln!(
        "{name}: trying at {}:{}",
        input.location_line(),
        input.get_utf8_column()
      );
      match self.apply(input) {
        res @ ParseResult::Success { .. } => {
          dprintln!("{name}: matched");
          res
        }
        ParseResult::Failure(e) => {
          dprintln!("{name}: failed, {e}");
          ParseResult::Failure(ParseFailure {
            expected: Expected::Label(name),
            ..e
          })
        }
      }
    })
  }
}

impl<'a, O: 'a> BitOr for Parser<'a, O> {
  type Output = Self;

  fn bitor(self, rhs: Self) -> Self {
    self.or(rhs)
  }
}

impl<'a, O: 'a, O2: 'a> BitAnd<Parser<'a, O2>>
  for Parser<'a, O>
{
  type Output = Parser<'a, (O, O2)>;

  fn bitand(self, rhs: Parser<'a, O2>) -> Self::Output {
    self.and(rhs)
  }
}

/// Succeed with `value` without consuming anything.
pub fn pure<'a, O: Clone + 'a>(value: O) -> Parser<'a, O> {
  Parser::new(move |input| {
    ParseResult::success(value.clone(), input)
  })
}

pub fn fail<'a, O: 'a>(
  expected: Expected,
) -> Parser<'a, O> {
  Parser::new(move |input| {
    ParseResult::failure(ParseFailure::new(
      input,
      expected.clone(),
    ))
  })
}

/// Defer building a parser until it is applied, so grammars can
/// refer to themselves.
pub fn lazy<'a, O: 'a>(
  f: impl Fn() -> Parser<'a, O> + 'a,
) -> Parser<'a, O> {
  Parser::new(move |input| f().apply(input))
}

pub fn choice<'a, O: 'a>(
  parsers: Vec<Parser<'a, O>>,
) -> Parser<'a, O> {
  parsers
    .into_iter()
    .reduce(Parser::or)
    .unwrap_or_else(|| fail(Expected::Label("an alternative")))
}

pub fn lift2<'a, A: 'a, B: 'a, C: 'a>(
  f: impl Fn(A, B) -> C + 'a,
  a: Parser<'a, A>,
  b: Parser<'a, B>,
) -> Parser<'a, C> {
  let f = Rc::new(f);
  a.map(move |x| {
    let f = Rc::clone(&f);
    move |y: B| (*f)(x, y)
  })
  .ap(b)
}

pub fn lift3<'a, A: 'a, B: 'a, C: 'a, D: 'a>(
  f: impl Fn(A, B, C) -> D + 'a,
  a: Parser<'a, A>,
  b: Parser<'a, B>,
  c: Parser<'a, C>,
) -> Parser<'a, D> {
  let f = Rc::new(f);
  a.map(move |x| {
    let f = Rc::clone(&f);
    move |y: B| move |z: C| (*f)(x, y, z)
  })
  .ap(b)
  .ap(c)
}

/// Tuples of parsers that can run in sequence, producing a tuple
/// of their values.
pub trait Product<'a> {
  type Output: 'a;

  fn product(self) -> Parser<'a, Self::Output>;
}

macro_rules! impl_product {
  ($($p:ident: $o:ident => $v:ident),+) => {
    impl<'a, $($o: 'a),+> Product<'a> for ($(Parser<'a, $o>,)+) {
      type Output = ($($o,)+);

      fn product(self) -> Parser<'a, Self::Output> {
        let ($($p,)+) = self;
        Parser::new(move |input| {
          let rest = input;
          $(
            let ($v, rest) = match $p.apply(rest) {
              ParseResult::Success { value, remainder } => {
                (value, remainder)
              }
              ParseResult::Failure(e) => {
                return ParseResult::Failure(e.restart(input))
              }
            };
          )+
          ParseResult::success(($($v,)+), rest)
        })
      }
    }
  };
}

impl_product!(pa: A => va);
impl_product!(pa: A => va, pb: B => vb);
impl_product!(pa: A => va, pb: B => vb, pc: C => vc);
impl_product!(pa: A => va, pb: B => vb, pc: C => vc, pd: D => vd);
impl_product!(
  pa: A => va, pb: B => vb, pc: C => vc, pd: D => vd,
  pe: E => ve
);
impl_product!(
  pa: A => va, pb: B => vb, pc: C => vc, pd: D => vd,
  pe: E => ve, pf: F => vf
);

pub fn product<'a, P: Product<'a>>(
  parsers: P,
) -> Parser<'a, P::Output> {
  parsers.product()
}

/// Sequence a tuple of parsers and map their values at once.
pub fn combine<'a, P: Product<'a>, O: 'a>(
  parsers: P,
  f: impl Fn(P::Output) -> O + 'a,
) -> Parser<'a, O> {
  parsers.product().map(f)
}

#[cfg(test)]
mod test {
  use std::cell::Cell;

  use super::*;
  use crate::primitives::{literal, regex};

  fn digits<'a>() -> Parser<'a, i64> {
    regex("[0-9]+")
      .expect("valid pattern")
      .try_map(|s| s.parse::<i64>())
  }

  #[test]
  fn test_and_success() {
    let res = literal("a").and(literal("b")).parse("abc");
    assert_eq!(res.value(), Some(&("a", "b")));
    assert_eq!(
      res.remainder().map(|r| *r.fragment()),
      Some("c")
    );
  }

  #[test]
  fn test_and_failure_skips_second() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let second = Parser::new(move |input| {
      counter.set(counter.get() + 1);
      ParseResult::success((), input)
    });
    let res = literal("a").and(second).parse("xyz");
    assert!(res.is_failure());
    assert_eq!(calls.get(), 0);
  }

  #[test]
  fn test_and_failure_reports_original_input() {
    let input = Span::new("ab!");
    let res = literal("ab").and(literal("c")).apply(input);
    let failure = res.failure_info().expect("failure");
    assert_eq!(failure.input, input);
    assert_eq!(failure.at.location_offset(), 2);
  }

  #[test]
  fn test_or_prefers_first() {
    let a = literal("ab");
    let input = Span::new("abc");
    let res = (a.clone() | literal("a")).apply(input);
    assert_eq!(res, a.apply(input));
  }

  #[test]
  fn test_or_falls_back_on_original_input() {
    let p = literal("ab").and(literal("x")).void()
      | literal("a").void();
    let res = p.parse("abc");
    assert_eq!(
      res.remainder().map(|r| *r.fragment()),
      Some("bc")
    );
  }

  #[test]
  fn test_or_both_fail_returns_second() {
    let input = Span::new("xyz");
    let res = (literal("a") | literal("b")).apply(input);
    assert_eq!(res, literal("b").apply(input));
    assert_eq!(
      res.failure_info().map(|e| &e.expected),
      Some(&Expected::Literal("b".to_string()))
    );
  }

  #[test]
  fn test_many_zero_times() {
    let input = Span::new("bbb");
    let res = literal("a").many().apply(input);
    assert_eq!(res, ParseResult::success(vec![], input));
  }

  #[test]
  fn test_many_collects() {
    let res = literal("a").many().parse("aaab");
    assert_eq!(res.value(), Some(&vec!["a", "a", "a"]));
    assert_eq!(
      res.remainder().map(|r| *r.fragment()),
      Some("b")
    );
  }

  #[test]
  fn test_many_long_input() {
    let input = "a".repeat(200_000);
    let res = literal("a").many().parse(&input);
    assert_eq!(res.value().map(Vec::len), Some(200_000));
  }

  #[test]
  fn test_many_stops_on_empty_match() {
    let res = pure(1).many().parse("abc");
    assert_eq!(res.value(), Some(&vec![]));
  }

  #[test]
  fn test_many1() {
    assert!(literal("a").many1().parse("b").is_failure());
    let res = literal("a").many1().parse("aab");
    assert_eq!(res.value(), Some(&vec!["a", "a"]));
  }

  #[test]
  fn test_functor_identity() {
    for input in ["12+3", "abc", ""] {
      assert_eq!(
        digits().map(|v| v).parse(input),
        digits().parse(input)
      );
    }
  }

  #[test]
  fn test_functor_composition() {
    let f = |v: i64| v * 2;
    let g = |v: i64| v - 3;
    for input in ["21x", "x21", "7"] {
      assert_eq!(
        digits().map(f).map(g).parse(input),
        digits().map(move |v| g(f(v))).parse(input)
      );
    }
  }

  #[test]
  fn test_ap_runs_function_first() {
    let sub = pure(|a: i64| move |b: i64| a - b)
      .ap(digits().skip(literal("-")))
      .ap(digits());
    assert_eq!(sub.parse("10-4").value(), Some(&6));
    assert!(sub.parse("10+4").is_failure());
  }

  #[test]
  fn test_lift() {
    let pair = lift2(|a, b| (a, b), digits(), literal("!"));
    assert_eq!(pair.parse("3!").value(), Some(&(3, "!")));

    let sum = lift3(
      |a: i64, _, b: i64| a + b,
      digits(),
      literal("+"),
      digits(),
    );
    assert_eq!(sum.parse("12+30").value(), Some(&42));
  }

  #[test]
  fn test_combine() {
    let sum = combine(
      (digits(), literal("+"), digits(), literal(";")),
      |(a, _, b, _)| a + b,
    );
    assert_eq!(sum.parse("1+2;").value(), Some(&3));

    let input = Span::new("1+2");
    let failure = sum.apply(input);
    assert_eq!(
      failure.failure_info().map(|e| e.input),
      Some(input)
    );
  }

  #[test]
  fn test_idempotent() {
    let p = digits().and(literal("+")).many();
    assert_eq!(p.parse("1+2+3"), p.parse("1+2+3"));
  }

  #[test]
  fn test_try_map_rejects() {
    let res = digits().parse("99999999999999999999");
    assert!(matches!(
      res.failure_info().map(|e| &e.expected),
      Some(Expected::Invalid(_))
    ));
  }

  #[test]
  fn test_opt_and_recognize() {
    let sign = literal("-").opt();
    assert_eq!(sign.parse("5").value(), Some(&None));
    let number = sign.and(digits()).recognize();
    assert_eq!(number.parse("-42x").value(), Some(&"-42"));
  }

  #[test]
  fn test_label() {
    let res = digits().label("number").parse("x");
    assert_eq!(
      res.failure_info().map(|e| &e.expected),
      Some(&Expected::Label("number"))
    );
  }

  #[test]
  fn test_choice() {
    let p = choice(vec![literal("a"), literal("b")]);
    assert_eq!(p.parse("b").value(), Some(&"b"));
    assert!(choice::<()>(vec![]).parse("b").is_failure());
  }
}
