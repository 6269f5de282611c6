//! `cabprice eval` - evaluate a dimension formula

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{format_number, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::formula::{evaluate_formula, Formula, SymbolValues};

#[derive(clap::Args, Debug)]
pub struct EvalArgs {
    /// Formula over width/height/depth (e.g. "width - 36")
    pub formula: String,

    /// Cabinet width in mm
    #[arg(long, short = 'W', default_value_t = 0.0)]
    pub width: f64,

    /// Cabinet height in mm
    #[arg(long, short = 'H', default_value_t = 0.0)]
    pub height: f64,

    /// Cabinet depth in mm
    #[arg(long, short = 'D', default_value_t = 0.0)]
    pub depth: f64,

    /// Fail on malformed formulas instead of printing 0
    #[arg(long)]
    pub strict: bool,
}

#[derive(Serialize)]
struct EvalOutput<'a> {
    formula: &'a str,
    width: f64,
    height: f64,
    depth: f64,
    value: f64,
}

pub fn run(args: EvalArgs, global: &GlobalOpts) -> Result<()> {
    let value = if args.strict {
        let values = SymbolValues::new(args.width, args.height, args.depth);
        Formula::parse(&args.formula)
            .and_then(|f| f.eval(&values))
            .map_err(|e| miette::miette!("Invalid formula '{}': {}", args.formula, e))?
    } else {
        evaluate_formula(Some(&args.formula), args.width, args.height, args.depth)
    };

    let output = EvalOutput {
        formula: &args.formula,
        width: args.width,
        height: args.height,
        depth: args.depth,
        value,
    };

    match resolve_format(global, OutputFormat::Auto) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&output).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.serialize(&output).into_diagnostic()?;
            wtr.flush().into_diagnostic()?;
        }
        OutputFormat::Md | OutputFormat::Auto => {
            if global.quiet {
                println!("{}", format_number(value));
            } else {
                println!(
                    "{} = {}",
                    style(&args.formula).cyan(),
                    style(format_number(value)).bold()
                );
            }
        }
    }

    Ok(())
}
