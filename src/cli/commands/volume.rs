//! `cabprice volume` - freight volume and weight

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{
    format_number, load_catalog, lookup_optional, require_cabinet, resolve_dimensions,
    resolve_format,
};
use crate::cli::{DimensionArgs, GlobalOpts, OutputFormat};
use crate::entities::PartRole;
use crate::pricing::{calculate_volume, VolumeResult};

#[derive(clap::Args, Debug)]
pub struct VolumeArgs {
    /// Cabinet type id
    pub cabinet: String,

    #[command(flatten)]
    pub dims: DimensionArgs,

    /// Number of cabinets
    #[arg(long, short = 'n', default_value_t = 1)]
    pub qty: u32,

    /// Door style id (doors are measured in carcass material without one)
    #[arg(long)]
    pub door_style: Option<String>,
}

#[derive(Serialize)]
struct PartRow<'a> {
    part: &'a str,
    role: PartRole,
    material: &'a str,
    pieces: u64,
    width_mm: f64,
    height_mm: f64,
    area_sqm: f64,
    volume_m3: f64,
    weight_kg: f64,
}

pub fn run(args: VolumeArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = load_catalog(global)?;
    let cabinet = require_cabinet(&catalog, &args.cabinet)?;
    let material = catalog.material_for(cabinet).ok_or_else(|| {
        miette::miette!(
            "Cabinet '{}' has no carcass material ('{}' not in catalog)",
            cabinet.id,
            cabinet.material_id.as_deref().unwrap_or("hmr")
        )
    })?;
    let door_style = lookup_optional(args.door_style.as_deref(), |id| {
        catalog.door_style(id)
    })?;

    let dims = resolve_dimensions(cabinet, &args.dims);
    if !dims.is_valid() {
        return Err(miette::miette!("Dimensions must be positive: {}", dims));
    }
    if args.qty == 0 {
        return Err(miette::miette!("Quantity must be at least 1"));
    }

    let parts = catalog.parts_for(&cabinet.id);
    let result = calculate_volume(&cabinet.name, &dims, args.qty, &parts, material, door_style);

    match resolve_format(global, OutputFormat::Auto) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&result).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in part_rows(&result) {
                wtr.serialize(row).into_diagnostic()?;
            }
            wtr.flush().into_diagnostic()?;
        }
        OutputFormat::Md => {
            println!("{}", part_table(&result));
            println!();
            print_totals(&result);
        }
        OutputFormat::Auto => {
            if !global.quiet {
                println!(
                    "{} ({}) × {}",
                    style(&result.cabinet_name).bold(),
                    result.dimensions,
                    result.quantity
                );
                println!();
                println!("{}", part_table(&result));
                println!();
            }
            print_totals(&result);
        }
    }

    Ok(())
}

fn part_rows(result: &VolumeResult) -> impl Iterator<Item = PartRow<'_>> {
    result.per_part_breakdown.iter().map(|p| PartRow {
        part: &p.part_name,
        role: p.role,
        material: &p.material,
        pieces: p.pieces,
        width_mm: p.width_mm,
        height_mm: p.height_mm,
        area_sqm: p.area_sqm,
        volume_m3: p.volume_m3,
        weight_kg: p.weight_kg,
    })
}

fn part_table(result: &VolumeResult) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Part", "Role", "Material", "Pieces", "W (mm)", "H (mm)", "Volume (m³)", "Weight (kg)"]);

    for p in &result.per_part_breakdown {
        builder.push_record([
            p.part_name.clone(),
            p.role.to_string(),
            p.material.clone(),
            p.pieces.to_string(),
            format_number(p.width_mm),
            format_number(p.height_mm),
            format!("{:.6}", p.volume_m3),
            format!("{:.3}", p.weight_kg),
        ]);
    }

    builder.build().with(Style::markdown()).to_string()
}

fn print_totals(result: &VolumeResult) {
    println!(
        "Carcass: {:.6} m³, {:.3} kg",
        result.carcass_volume_m3, result.carcass_weight_kg
    );
    println!(
        "Doors:   {:.6} m³, {:.3} kg",
        result.doors_volume_m3, result.doors_weight_kg
    );
    println!(
        "{}   {:.6} m³, {:.3} kg",
        style("Total:").bold(),
        result.total_volume_m3,
        result.total_weight_kg
    );
}
