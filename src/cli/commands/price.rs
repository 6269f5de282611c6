//! `cabprice price` - price a cabinet line

use chrono::{DateTime, Utc};
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{
    format_money, format_number, load_catalog, lookup_optional, require_cabinet,
    resolve_dimensions, resolve_format,
};
use crate::cli::{DimensionArgs, GlobalOpts, OutputFormat};
use crate::core::Catalog;
use crate::entities::HardwareCategory;
use crate::pricing::{
    price_cabinet, HardwareSelection, PriceBreakdown, PriceOutcome, PricingRequest, StyleOptions,
};

#[derive(clap::Args, Debug)]
pub struct PriceArgs {
    /// Cabinet type id
    pub cabinet: String,

    #[command(flatten)]
    pub dims: DimensionArgs,

    /// Number of cabinets
    #[arg(long, short = 'n', default_value_t = 1)]
    pub qty: u32,

    /// Door style id
    #[arg(long)]
    pub door_style: Option<String>,

    /// Door colour id
    #[arg(long)]
    pub color: Option<String>,

    /// Door finish id
    #[arg(long)]
    pub finish: Option<String>,

    /// Itemize hinge and runner sets
    #[arg(long)]
    pub hardware: bool,

    /// Hinge set id (implies --hardware)
    #[arg(long)]
    pub hinge: Option<String>,

    /// Runner set id (implies --hardware)
    #[arg(long)]
    pub runner: Option<String>,
}

#[derive(Serialize)]
struct PriceReport<'a> {
    priced_at: DateTime<Utc>,
    #[serde(flatten)]
    outcome: &'a PriceOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<'a> PriceReport<'a> {
    fn new(outcome: &'a PriceOutcome) -> Self {
        let message = match outcome {
            PriceOutcome::Unavailable { reason } => Some(reason.to_string()),
            PriceOutcome::Priced(_) => None,
        };
        Self {
            priced_at: Utc::now(),
            outcome,
            message,
        }
    }
}

#[derive(Serialize)]
struct PriceRow<'a> {
    cabinet_id: &'a str,
    width_mm: f64,
    height_mm: f64,
    depth_mm: f64,
    quantity: u32,
    carcass: f64,
    doors: f64,
    hardware: f64,
    surcharges: f64,
    unit_price: f64,
    subtotal: f64,
    gst: f64,
    total: f64,
}

pub fn run(args: PriceArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = load_catalog(global)?;
    let cabinet = require_cabinet(&catalog, &args.cabinet)?;
    let parts = catalog.parts_for(&cabinet.id);

    let style_options = StyleOptions {
        door_style: lookup_optional(args.door_style.as_deref(), |id| {
            catalog.door_style(id)
        })?,
        color: lookup_optional(args.color.as_deref(), |id| catalog.color(id))?,
        finish: lookup_optional(args.finish.as_deref(), |id| catalog.finish(id))?,
    };

    let request = PricingRequest {
        cabinet: Some(cabinet),
        parts: &parts,
        dimensions: Some(resolve_dimensions(cabinet, &args.dims)),
        quantity: args.qty,
        material: catalog.material_for(cabinet),
        style: style_options,
        hardware: HardwareSelection {
            itemize: args.hardware || args.hinge.is_some() || args.runner.is_some(),
            hinge_set_id: require_set(&catalog, args.hinge, HardwareCategory::Hinge)?,
            runner_set_id: require_set(&catalog, args.runner, HardwareCategory::Runner)?,
        },
    };

    let cache = catalog.hardware_cache();
    let outcome = price_cabinet(&request, &catalog.settings, &cache.snapshot());

    match resolve_format(global, OutputFormat::Auto) {
        OutputFormat::Json => {
            let report = PriceReport::new(&outcome);
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let report = PriceReport::new(&outcome);
            print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
        }
        format => match &outcome {
            PriceOutcome::Unavailable { reason } => {
                println!("{} {}", style("!").yellow(), reason);
            }
            PriceOutcome::Priced(breakdown) => match format {
                OutputFormat::Csv => print_csv(breakdown)?,
                OutputFormat::Md => println!("{}", markdown_table(breakdown)),
                _ => print_summary(breakdown, global.quiet),
            },
        },
    }

    Ok(())
}

/// Check a `--hinge`/`--runner` id names a set of that category
fn require_set(
    catalog: &Catalog,
    id: Option<String>,
    category: HardwareCategory,
) -> Result<Option<String>> {
    let Some(set) = lookup_optional(id.as_deref(), |id| catalog.hardware_set(id))? else {
        return Ok(None);
    };
    if set.category != category {
        return Err(miette::miette!(
            help = format!("Run 'cabprice hardware list --category {}'", category),
            "hardware set '{}' is a {} set, not a {} set",
            set.id,
            set.category,
            category
        ));
    }
    Ok(Some(set.id.clone()))
}

fn print_csv(b: &PriceBreakdown) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.serialize(PriceRow {
        cabinet_id: &b.cabinet_id,
        width_mm: b.dimensions.width_mm,
        height_mm: b.dimensions.height_mm,
        depth_mm: b.dimensions.depth_mm,
        quantity: b.quantity,
        carcass: b.carcass(),
        doors: b.doors(),
        hardware: b.hardware(),
        surcharges: b.surcharges(),
        unit_price: b.unit_price,
        subtotal: b.subtotal,
        gst: b.gst,
        total: b.total,
    })
    .into_diagnostic()?;
    wtr.flush().into_diagnostic()?;
    Ok(())
}

fn markdown_table(b: &PriceBreakdown) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Component", "Per cabinet", "Line"]);

    let qty = b.quantity as f64;
    for (label, amount) in [
        ("Carcass", b.carcass()),
        ("Doors", b.doors()),
        ("Hardware", b.hardware()),
        ("Surcharges", b.surcharges()),
    ] {
        builder.push_record([
            label.to_string(),
            format_money(amount),
            format_money(amount * qty),
        ]);
    }
    builder.push_record([
        "Subtotal".to_string(),
        format_money(b.unit_price),
        format_money(b.subtotal),
    ]);
    builder.push_record([
        format!("GST ({}%)", format_number(b.gst_rate * 100.0)),
        String::new(),
        format_money(b.gst),
    ]);
    builder.push_record(["Total".to_string(), String::new(), format_money(b.total)]);

    builder.build().with(Style::markdown()).to_string()
}

fn print_summary(b: &PriceBreakdown, quiet: bool) {
    if quiet {
        println!("{}", format_money(b.total));
        return;
    }

    let dims = &b.dimensions;
    println!(
        "{} {} ({} × {} × {} mm) × {}",
        style(&b.cabinet_name).bold(),
        style(format!("[{}]", b.cabinet_id)).cyan(),
        format_number(dims.width_mm),
        format_number(dims.height_mm),
        format_number(dims.depth_mm),
        b.quantity
    );
    if let Some(ref method) = b.calculation_method {
        println!("   Method: {}", method);
    }

    let cost = &b.per_cabinet;
    println!();
    println!(
        "   Carcass:     {:>10}   ({:.4} m² @ {}/m²)",
        format_money(cost.carcass),
        cost.carcass_area_sqm,
        format_money(cost.carcass_rate_per_sqm)
    );
    println!(
        "   Doors:       {:>10}   ({:.4} m² @ {}/m²)",
        format_money(cost.doors),
        cost.door_area_sqm,
        format_money(cost.door_rate_per_sqm)
    );
    println!("   Hardware:    {:>10}", format_money(cost.hardware));
    for item in &b.hardware_items {
        println!(
            "     {} {} × {}: {}",
            style(item.category).dim(),
            item.pricing.set_name,
            item.pricing.quantity,
            format_money(item.pricing.final_cost)
        );
    }
    println!("   Surcharges:  {:>10}", format_money(cost.surcharges));
    println!("   Unit price:  {:>10}", format_money(b.unit_price));
    println!();
    println!("   Subtotal:    {:>10}", format_money(b.subtotal));
    println!(
        "   GST ({}%):   {:>10}",
        format_number(b.gst_rate * 100.0),
        format_money(b.gst)
    );
    println!(
        "   {}       {:>10}",
        style("Total:").bold(),
        style(format_money(b.total)).green().bold()
    );
}
