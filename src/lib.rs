use std::sync::atomic::{AtomicBool, Ordering};

pub static DEBUG: AtomicBool = AtomicBool::new(false);

#[macro_export]
macro_rules! dprintln {
    ($fmt:literal) => {
        if $crate::DEBUG.load(std::sync::atomic::Ordering::Relaxed) {
            println!($fmt);
        }
    };
    ($fmt:literal, $($args:expr),*) => {
        if $crate::DEBUG.load(std::sync::atomic::Ordering::Relaxed) {
            println!($fmt, $($args),*);
        }
    };
}

pub mod ast;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod pest_expr;
pub mod primitives;
pub mod result;

pub use crate::{
  ast::Expression,
  error::ExprError,
  grammar::{Associativity, ExprGrammar, GrammarOptions},
  parser::Parser,
  result::{Expected, ParseFailure, ParseResult, Span},
};

pub struct Args {
  pub expressions: Vec<String>,
  pub options: GrammarOptions,
  pub use_pest: bool,
  pub show_ast: bool,
  pub debug_output: bool,
}

impl Args {
  pub fn new() -> Self {
    Self {
      expressions: vec![],
      options: GrammarOptions::default(),
      use_pest: false,
      show_ast: false,
      debug_output: false,
    }
  }
}

impl Default for Args {
  fn default() -> Self {
    Self::new()
  }
}

pub fn parse_args() -> Option<Args> {
  let mut args = std::env::args();
  let exe = args.next();
  parse_args_from(exe, args)
}

pub fn parse_args_from(
  exe: Option<String>,
  args: impl Iterator<Item = String>,
) -> Option<Args> {
  let mut parsed = Args::new();
  let mut show_help = false;

  for arg in args {
    match &arg as &str {
      "-h" => show_help = true,
      "-a" => parsed.show_ast = true,
      "-l" => {
        parsed.options.associativity = Associativity::Left
      }
      "-w" => parsed.options.whitespace = true,
      "-p" => parsed.use_pest = true,
      "-D" => {
        DEBUG.store(true, Ordering::Relaxed);
        parsed.debug_output = true;
      }
      flag if flag.starts_with('-') && flag.len() == 2 => {
        println!("Unknown option {flag}");
        return None;
      }
      _ => parsed.expressions.push(arg),
    }
  }

  if show_help {
    println!(
      r#"Usage: {} [options] [expression...]

Evaluates each expression, or each line of stdin if none is given.

Options:
    -a       Show AST
    -l       Left associative operators
    -w       Allow whitespace between tokens
    -p       Use the pest grammar (ignores -l and -w)
    -D       Trace parser attempts
    -h       Display help
"#,
      exe.unwrap_or_else(|| "ruscomb".to_string())
    );
    return None;
  }

  Some(parsed)
}
