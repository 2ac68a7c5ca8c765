//! Implementation of the `msgfmt eval` command.

use miette::{IntoDiagnostic, Result};
use msgfmt::{format_value, ExpressionEvaluator, StandardEvaluator, Variables};
use serde::Serialize;
use serde_json::json;

use super::{param_value, parse_key_val};

/// Arguments for the eval command.
#[derive(Debug, clap::Args)]
pub struct EvalArgs {
    /// Expression to evaluate, such as `#a + 1` or `1 + #a`
    #[arg(long = "expr", required = true)]
    pub expression: String,

    /// Variables in name=value format (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for eval results.
#[derive(Serialize)]
pub struct EvalResult {
    pub result: String,
    pub kind: &'static str,
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> Result<i32> {
    let variables: Variables = args
        .params
        .into_iter()
        .map(|(name, raw)| (name, param_value(raw)))
        .collect();

    let evaluator = StandardEvaluator::new();
    match evaluator.evaluate(&args.expression, &variables) {
        Ok(value) => {
            if args.json {
                let output = EvalResult {
                    result: format_value(&value),
                    kind: value.kind(),
                };
                println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                println!("{}", format_value(&value));
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = json!({
                    "error": e.to_string(),
                    "syntax": e.is_syntax(),
                });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                eprintln!("Evaluation error: {e}");
            }
            Ok(exitcode::DATAERR)
        }
    }
}
