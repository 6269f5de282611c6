//! `cabprice catalog` - inspect the loaded catalog

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_number, load_catalog, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Catalog;

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List cabinet types with their default dimensions
    List(ListArgs),

    /// Load the catalog and report record counts and problems
    Check,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only cabinets in this category (base, wall, tall, ...)
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Serialize)]
struct CabinetRow<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    width_mm: f64,
    height_mm: f64,
    depth_mm: f64,
    doors: u32,
    drawers: u32,
    parts: usize,
}

#[derive(Serialize)]
struct CatalogSummary {
    cabinets: usize,
    parts: usize,
    materials: usize,
    door_styles: usize,
    colors: usize,
    finishes: usize,
    hardware_sets: usize,
    settings: usize,
    warnings: Vec<String>,
}

impl CatalogSummary {
    fn new(catalog: &Catalog) -> Self {
        Self {
            cabinets: catalog.cabinets.len(),
            parts: catalog.parts.len(),
            materials: catalog.materials.len(),
            door_styles: catalog.door_styles.len(),
            colors: catalog.colors.len(),
            finishes: catalog.finishes.len(),
            hardware_sets: catalog.hardware_sets.len(),
            settings: catalog.settings.len(),
            warnings: catalog.validate(),
        }
    }
}

pub fn run(cmd: CatalogCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CatalogCommands::List(args) => run_list(args, global),
        CatalogCommands::Check => run_check(global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = load_catalog(global)?;

    let rows: Vec<CabinetRow> = catalog
        .cabinets
        .iter()
        .filter(|c| {
            args.category
                .as_deref()
                .map_or(true, |cat| c.category.eq_ignore_ascii_case(cat))
        })
        .map(|c| CabinetRow {
            id: &c.id,
            name: &c.name,
            category: &c.category,
            width_mm: c.default_width_mm,
            height_mm: c.default_height_mm,
            depth_mm: c.default_depth_mm,
            doors: c.door_count,
            drawers: c.drawer_count,
            parts: catalog
                .parts
                .iter()
                .filter(|p| p.cabinet_type_id.eq_ignore_ascii_case(&c.id))
                .count(),
        })
        .collect();

    if rows.is_empty() {
        println!("No cabinets found.");
        return Ok(());
    }

    match resolve_format(global, OutputFormat::Md) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&rows).into_diagnostic()?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in &rows {
                wtr.serialize(row).into_diagnostic()?;
            }
            wtr.flush().into_diagnostic()?;
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["ID", "Name", "Category", "W × H × D (mm)", "Doors", "Drawers", "Parts"]);
            for row in &rows {
                builder.push_record([
                    row.id.to_string(),
                    row.name.to_string(),
                    row.category.to_string(),
                    format!(
                        "{} × {} × {}",
                        format_number(row.width_mm),
                        format_number(row.height_mm),
                        format_number(row.depth_mm)
                    ),
                    row.doors.to_string(),
                    row.drawers.to_string(),
                    row.parts.to_string(),
                ]);
            }
            println!("{}", builder.build().with(Style::markdown()));

            if !global.quiet {
                println!();
                println!("{} cabinet type(s)", style(rows.len()).cyan());
            }
        }
    }

    Ok(())
}

fn run_check(global: &GlobalOpts) -> Result<()> {
    let catalog = load_catalog(global)?;
    let summary = CatalogSummary::new(&catalog);

    match resolve_format(global, OutputFormat::Auto) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&summary).into_diagnostic()?),
        _ => {
            println!("{} Catalog loaded", style("✓").green());
            println!("   Cabinets:      {}", summary.cabinets);
            println!("   Parts:         {}", summary.parts);
            println!("   Materials:     {}", summary.materials);
            println!("   Door styles:   {}", summary.door_styles);
            println!("   Colors:        {}", summary.colors);
            println!("   Finishes:      {}", summary.finishes);
            println!("   Hardware sets: {}", summary.hardware_sets);
            println!("   Settings:      {}", summary.settings);

            if !summary.warnings.is_empty() {
                println!();
                for warning in &summary.warnings {
                    println!("{} {}", style("!").yellow(), warning);
                }
            }
        }
    }

    Ok(())
}
