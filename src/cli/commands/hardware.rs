//! `cabprice hardware` - hardware set listing, resolution and pricing

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_money, load_catalog, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::CatalogError;
use crate::entities::{HardwareCategory, HardwareSet};
use crate::pricing::HardwarePricingResult;

#[derive(Subcommand, Debug)]
pub enum HardwareCommands {
    /// List hardware sets
    List(ListArgs),

    /// Show which set applies to a category
    Resolve(ResolveArgs),

    /// Price a hardware set with the catalog's markup and discount
    Price(PriceArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only sets in this category (hinge, runner)
    #[arg(long)]
    pub category: Option<HardwareCategory>,
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Hardware category (hinge, runner)
    pub category: HardwareCategory,

    /// Explicitly selected set id
    #[arg(long)]
    pub set: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct PriceArgs {
    /// Hardware set id
    pub set: String,

    /// Number of set applications
    #[arg(long, short = 'n', default_value_t = 1)]
    pub qty: u32,
}

pub fn run(cmd: HardwareCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        HardwareCommands::List(args) => run_list(args, global),
        HardwareCommands::Resolve(args) => run_resolve(args, global),
        HardwareCommands::Price(args) => run_price(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = load_catalog(global)?;
    let cache = catalog.hardware_cache();
    let snapshot = cache.snapshot();

    let sets: Vec<&HardwareSet> = snapshot
        .sets()
        .iter()
        .filter(|s| args.category.map_or(true, |c| s.category == c))
        .collect();

    if sets.is_empty() {
        println!("No hardware sets found.");
        return Ok(());
    }

    match resolve_format(global, OutputFormat::Md) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&sets).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&sets).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["id", "name", "category", "brand", "items", "base_cost", "is_default"])
                .into_diagnostic()?;
            for s in &sets {
                wtr.write_record([
                    s.id.clone(),
                    s.name.clone(),
                    s.category.to_string(),
                    s.brand.clone().unwrap_or_default(),
                    s.items.len().to_string(),
                    format!("{:.2}", s.base_cost()),
                    s.is_default.to_string(),
                ])
                .into_diagnostic()?;
            }
            wtr.flush().into_diagnostic()?;
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["ID", "Name", "Category", "Brand", "Items", "Base cost", "Default"]);
            for s in &sets {
                builder.push_record([
                    s.id.clone(),
                    s.name.clone(),
                    s.category.to_string(),
                    s.brand.clone().unwrap_or_default(),
                    s.items.len().to_string(),
                    format_money(s.base_cost()),
                    if s.is_default { "yes" } else { "" }.to_string(),
                ]);
            }
            println!("{}", builder.build().with(Style::markdown()));
        }
    }

    Ok(())
}

fn run_resolve(args: ResolveArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = load_catalog(global)?;
    let cache = catalog.hardware_cache();
    let snapshot = cache.snapshot();

    let Some(set) = snapshot.resolve(args.category, args.set.as_deref()) else {
        if !global.quiet {
            println!(
                "{} No {} sets available",
                style("!").yellow(),
                args.category
            );
        }
        return Ok(());
    };

    match resolve_format(global, OutputFormat::Auto) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(set).into_diagnostic()?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(set).into_diagnostic()?),
        _ if global.quiet => println!("{}", set.id),
        _ => println!(
            "{} {} → {} ({})",
            style("✓").green(),
            args.category,
            style(&set.id).cyan(),
            set.name
        ),
    }

    Ok(())
}

fn run_price(args: PriceArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = load_catalog(global)?;
    let cache = catalog.hardware_cache();
    let snapshot = cache.snapshot();

    let set = snapshot
        .get(&args.set)
        .ok_or_else(|| CatalogError::unknown::<HardwareSet>(args.set.as_str()))?;
    let result = snapshot.price(set, args.qty);

    match resolve_format(global, OutputFormat::Auto) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&result).into_diagnostic()?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.serialize(&result).into_diagnostic()?;
            wtr.flush().into_diagnostic()?;
        }
        _ => print_pricing(&result, global.quiet),
    }

    Ok(())
}

fn print_pricing(result: &HardwarePricingResult, quiet: bool) {
    if quiet {
        println!("{}", format_money(result.final_cost));
        return;
    }

    println!(
        "{} [{}] × {}",
        style(&result.set_name).bold(),
        style(&result.set_id).cyan(),
        result.quantity
    );
    println!("   Base:      {:>10}", format_money(result.base_cost));
    println!(
        "   Marked up: {:>10}   (+{}%)",
        format_money(result.marked_up_cost),
        result.markup_pct
    );
    println!(
        "   {}     {:>10}   (-{}%)",
        style("Final:").bold(),
        style(format_money(result.final_cost)).green(),
        result.discount_pct
    );
}
