//! Shared helper functions for CLI commands
//!
//! Catalog loading, output format resolution and value formatting used by
//! more than one command module.

use miette::Result;

use crate::cli::{DimensionArgs, GlobalOpts, OutputFormat};
use crate::core::{Catalog, CatalogError, CatalogRecord, Config};
use crate::entities::{CabinetType, Dimensions};

/// Load the catalog named by `--catalog`, the environment or config files
pub fn load_catalog(global: &GlobalOpts) -> Result<Catalog> {
    let config = Config::load();
    let path = config.catalog_path(global.catalog.as_deref()).ok_or_else(|| {
        miette::miette!(
            help = "Pass --catalog PATH, set CABPRICE_CATALOG, or add `catalog:` to .cabprice.yaml",
            "No catalog configured"
        )
    })?;

    log::debug!("Loading catalog from {}", path.display());
    let catalog = Catalog::load(&path)?;

    for warning in catalog.validate() {
        log::warn!("{}", warning);
    }
    Ok(catalog)
}

/// Resolve `Auto` and the configured default against a command's fallback
pub fn resolve_format(global: &GlobalOpts, fallback: OutputFormat) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }

    let configured = Config::load()
        .default_format
        .and_then(|f| f.parse::<OutputFormat>().ok());
    match configured {
        Some(OutputFormat::Auto) | None => fallback,
        Some(format) => format,
    }
}

/// Look up a cabinet type or fail with a diagnostic
pub fn require_cabinet<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a CabinetType> {
    catalog
        .cabinet(id)
        .ok_or_else(|| CatalogError::unknown::<CabinetType>(id).into())
}

/// Look up an optional record by id, failing if an id was given but unknown
pub fn lookup_optional<'a, T: CatalogRecord>(
    id: Option<&str>,
    find: impl Fn(&str) -> Option<&'a T>,
) -> Result<Option<&'a T>> {
    match id {
        None => Ok(None),
        Some(id) => find(id)
            .map(Some)
            .ok_or_else(|| CatalogError::unknown::<T>(id).into()),
    }
}

/// Cabinet defaults with any command-line overrides applied
pub fn resolve_dimensions(cabinet: &CabinetType, args: &DimensionArgs) -> Dimensions {
    let defaults = cabinet.default_dimensions();
    Dimensions::new(
        args.width.unwrap_or(defaults.width_mm),
        args.height.unwrap_or(defaults.height_mm),
        args.depth.unwrap_or(defaults.depth_mm),
    )
}

/// Format a currency amount with two decimals
pub fn format_money(value: f64) -> String {
    format!("${:.2}", value)
}

/// Format a number, dropping the fraction when it is whole
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.4}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::find_record;
    use crate::entities::ColorSpec;
    use miette::Diagnostic;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(12.0), "$12.00");
        assert_eq!(format_money(174.296), "$174.30");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(564.0), "564");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
    }

    #[test]
    fn test_resolve_dimensions() {
        let cabinet = CabinetType::new("B600", "Base 600", 600.0, 720.0, 560.0);
        let args = DimensionArgs {
            width: Some(900.0),
            ..Default::default()
        };
        let dims = resolve_dimensions(&cabinet, &args);
        assert_eq!(dims, Dimensions::new(900.0, 720.0, 560.0));
    }

    #[test]
    fn test_lookup_optional() {
        let colors = [ColorSpec {
            id: "navy".to_string(),
            name: "Navy".to_string(),
            surcharge_rate_per_sqm: 20.0,
        }];
        let find = |id: &str| find_record(&colors, id);
        assert!(lookup_optional(None, find).unwrap().is_none());
        assert!(lookup_optional(Some("NAVY"), find).unwrap().is_some());

        let err = lookup_optional(Some("teal"), find).unwrap_err();
        assert_eq!(err.to_string(), "unknown color 'teal'");
    }

    #[test]
    fn test_require_cabinet_unknown() {
        let catalog = Catalog::default();
        let err = require_cabinet(&catalog, "X999").unwrap_err();
        assert_eq!(err.to_string(), "unknown cabinet 'X999'");
        assert!(err.help().is_some());
    }
}
