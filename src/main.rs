use std::io::BufRead;

use ruscomb::{
  parse_args, pest_expr, Args, ExprError, ExprGrammar,
  Expression,
};

fn evaluate(
  grammar: &ExprGrammar,
  args: &Args,
  source: &str,
) -> Result<i64, ExprError> {
  let ex: Expression = if args.use_pest {
    pest_expr::parse(source)?
  } else {
    grammar.parse_complete(source)?
  };
  if args.show_ast {
    println!("AST: {ex:#?}");
  }
  Ok(ex.eval())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let Some(args) = parse_args() else {
    return Ok(());
  };

  let grammar = ExprGrammar::with_options(args.options)?;
  let run = |source: &str| {
    match evaluate(&grammar, &args, source) {
      Ok(value) => println!("{value}"),
      Err(e) => eprintln!("{source:?}: {e}"),
    }
  };

  if args.expressions.is_empty() {
    for line in std::io::stdin().lock().lines() {
      let line = line?;
      let line = line.trim_end();
      if !line.is_empty() {
        run(line);
      }
    }
  } else {
    for source in &args.expressions {
      run(source.as_str());
    }
  }
  Ok(())
}
