//! Implementation of the `msgfmt render` command.

use std::path::PathBuf;
use std::sync::Arc;

use icu_locale_core::LanguageIdentifier;
use miette::{miette, IntoDiagnostic, Result};
use msgfmt::{Catalog, InterpolationOptions, MessageFormatter, Parameter, DEFAULT_MAX_DEPTH};
use serde_json::json;

use super::{param_value, parse_key_val};

/// Arguments for the render command.
#[derive(Debug, clap::Args)]
pub struct RenderArgs {
    /// Catalog file holding the message (.properties)
    #[arg(long, required = true, env = "MSGFMT_CATALOG")]
    pub catalog: PathBuf,

    /// Language of the catalog (e.g., en, ja-JP)
    #[arg(long, default_value = "und", env = "MSGFMT_LANG")]
    pub lang: String,

    /// Message code to render
    #[arg(long, required = true)]
    pub code: String,

    /// Parameters in name=value format (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Resolve placeholders in substituted values
    #[arg(long)]
    pub recursive: bool,

    /// Maximum re-runs for recursive resolution
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub depth: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the render command.
pub fn run_render(args: RenderArgs) -> Result<i32> {
    let language: LanguageIdentifier = args
        .lang
        .parse()
        .map_err(|e| miette!("Invalid language '{}': {}", args.lang, e))?;

    let catalog = Catalog::new();
    catalog
        .load_bundle(&language, &args.catalog)
        .into_diagnostic()?;

    let formatter = MessageFormatter::builder()
        .store(Arc::new(catalog))
        .language(language)
        .build();

    let options = InterpolationOptions {
        recursive: args.recursive,
        max_depth: args.depth,
    };
    let builder = args
        .params
        .into_iter()
        .fold(formatter.create(&args.code), |builder, (name, raw)| {
            builder.parameter(Parameter::new(name, param_value(raw)))
        });

    match builder.format_with(options) {
        Ok(text) => {
            if args.json {
                let output = json!({ "code": args.code, "result": text });
                println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                println!("{text}");
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = json!({ "code": args.code, "error": e.to_string() });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                eprintln!("Render error: {e}");
            }
            Ok(exitcode::DATAERR)
        }
    }
}
