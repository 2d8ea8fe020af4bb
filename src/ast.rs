use std::fmt::Display;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expression {
  Number(i64),
  Addition(Box<Expression>, Box<Expression>),
  Subtraction(Box<Expression>, Box<Expression>),
}

impl Expression {
  pub fn add(lhs: Expression, rhs: Expression) -> Self {
    Self::Addition(Box::new(lhs), Box::new(rhs))
  }

  pub fn sub(lhs: Expression, rhs: Expression) -> Self {
    Self::Subtraction(Box::new(lhs), Box::new(rhs))
  }

  /// Overflow wraps around.
  pub fn eval(&self) -> i64 {
    match self {
      Self::Number(v) => *v,
      Self::Addition(lhs, rhs) => {
        lhs.eval().wrapping_add(rhs.eval())
      }
      Self::Subtraction(lhs, rhs) => {
        lhs.eval().wrapping_sub(rhs.eval())
      }
    }
  }
}

impl Display for Expression {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> std::fmt::Result {
    match self {
      Self::Number(v) => write!(f, "{v}"),
      Self::Addition(lhs, rhs) => {
        write!(f, "({lhs} + {rhs})")
      }
      Self::Subtraction(lhs, rhs) => {
        write!(f, "({lhs} - {rhs})")
      }
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ast::Expression::Number;

  #[test]
  fn test_eval() {
    assert_eq!(Number(5).eval(), 5);
    let ex = Expression::add(Number(12), Number(34));
    assert_eq!(ex.eval(), 46);
    let ex = Expression::sub(
      Number(1),
      Expression::sub(Number(2), Number(3)),
    );
    assert_eq!(ex.eval(), 2);
  }

  #[test]
  fn test_eval_wraps() {
    let ex = Expression::add(Number(i64::MAX), Number(1));
    assert_eq!(ex.eval(), i64::MIN);
  }

  #[test]
  fn test_display() {
    let ex = Expression::sub(
      Expression::add(Number(1), Number(2)),
      Number(3),
    );
    assert_eq!(ex.to_string(), "((1 + 2) - 3)");
  }
}
