//! Material and door property resolution
//!
//! Normalizes raw catalog material/door-style records into the rate and
//! physical-property bundles the cost and volume calculators consume.

use serde::{Deserialize, Serialize};

use crate::core::settings::GlobalSettings;
use crate::entities::{ColorSpec, DoorStyleSpec, FinishSpec, MaterialSpec};

/// Share of the carcass rate billed into every door's price rate, for the
/// door's core board.
pub const DOOR_CARCASS_COMPONENT_FRACTION: f64 = 0.20;

/// Resolved carcass board rates and physical properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarcassProperties {
    pub rate_per_sqm: f64,
    pub thickness_mm: f64,
    pub weight_per_sqm: f64,
    pub weight_factor: f64,
}

/// Resolved door rates and physical properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorProperties {
    /// Base rate + colour + finish + carcass component
    pub price_rate_per_sqm: f64,
    pub thickness_mm: f64,
    pub density_per_sqm: f64,
    pub weight_factor: f64,
}

/// Optional door styling chosen for a cabinet
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleOptions<'a> {
    pub door_style: Option<&'a DoorStyleSpec>,
    pub color: Option<&'a ColorSpec>,
    pub finish: Option<&'a FinishSpec>,
}

impl<'a> StyleOptions<'a> {
    pub fn with_door_style(door_style: &'a DoorStyleSpec) -> Self {
        Self {
            door_style: Some(door_style),
            ..Default::default()
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Resolve carcass properties.
///
/// The price rate is taken from the material's own `rate_per_sqm`, then the
/// `hmr_rate_per_sqm` setting, then the material's `weight_per_sqm`.
pub fn resolve_carcass(material: &MaterialSpec, settings: &GlobalSettings) -> CarcassProperties {
    let rate = material
        .rate_per_sqm
        .or_else(|| settings.hmr_rate_per_sqm())
        .unwrap_or(material.weight_per_sqm);

    CarcassProperties {
        rate_per_sqm: non_negative(rate),
        thickness_mm: non_negative(material.thickness_mm),
        weight_per_sqm: non_negative(material.weight_per_sqm),
        weight_factor: non_negative(material.weight_factor),
    }
}

/// Resolve door properties; None when no door style is chosen
pub fn resolve_door(style: &StyleOptions<'_>, carcass: &CarcassProperties) -> Option<DoorProperties> {
    let door_style = style.door_style?;

    let color_surcharge = style.color.map_or(0.0, |c| non_negative(c.surcharge_rate_per_sqm));
    let finish_rate = style.finish.map_or(0.0, |f| non_negative(f.rate_per_sqm));
    let carcass_component = carcass.rate_per_sqm * DOOR_CARCASS_COMPONENT_FRACTION;

    Some(DoorProperties {
        price_rate_per_sqm: non_negative(door_style.base_rate_per_sqm)
            + color_surcharge
            + finish_rate
            + carcass_component,
        thickness_mm: non_negative(door_style.thickness_mm),
        density_per_sqm: non_negative(door_style.material_density_kg_per_sqm),
        weight_factor: non_negative(door_style.weight_factor),
    })
}

/// Resolve both bundles in one step
pub fn resolve_properties(
    material: &MaterialSpec,
    style: &StyleOptions<'_>,
    settings: &GlobalSettings,
) -> (CarcassProperties, Option<DoorProperties>) {
    let carcass = resolve_carcass(material, settings);
    let door = resolve_door(style, &carcass);
    (carcass, door)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::keys;

    fn hmr() -> MaterialSpec {
        MaterialSpec::new("hmr", "HMR 18mm", 12.0, 18.0)
    }

    #[test]
    fn test_carcass_rate_falls_back_to_weight() {
        let props = resolve_carcass(&hmr(), &GlobalSettings::new());
        assert_eq!(props.rate_per_sqm, 12.0);
        assert_eq!(props.thickness_mm, 18.0);
        assert_eq!(props.weight_factor, 1.0);
    }

    #[test]
    fn test_carcass_rate_from_settings() {
        let settings = GlobalSettings::new().with(keys::HMR_RATE_PER_SQM, 45.0);
        let props = resolve_carcass(&hmr(), &settings);
        assert_eq!(props.rate_per_sqm, 45.0);
        assert_eq!(props.weight_per_sqm, 12.0);
    }

    #[test]
    fn test_material_rate_overrides_settings() {
        let mut material = hmr();
        material.rate_per_sqm = Some(60.0);
        let settings = GlobalSettings::new().with(keys::HMR_RATE_PER_SQM, 45.0);
        assert_eq!(resolve_carcass(&material, &settings).rate_per_sqm, 60.0);
    }

    #[test]
    fn test_door_rate_composition() {
        let settings = GlobalSettings::new().with(keys::HMR_RATE_PER_SQM, 50.0);
        let shaker = DoorStyleSpec::new("shaker", "Shaker", 180.0, 14.0, 20.0);
        let color = ColorSpec {
            id: "navy".to_string(),
            name: "Navy".to_string(),
            surcharge_rate_per_sqm: 25.0,
        };
        let finish = FinishSpec {
            id: "gloss".to_string(),
            name: "Gloss".to_string(),
            rate_per_sqm: 15.0,
        };
        let style = StyleOptions {
            door_style: Some(&shaker),
            color: Some(&color),
            finish: Some(&finish),
        };

        let (_, door) = resolve_properties(&hmr(), &style, &settings);
        let door = door.unwrap();

        // 180 + 25 + 15 + 20% of 50
        assert!((door.price_rate_per_sqm - 230.0).abs() < 1e-9);
        assert_eq!(door.thickness_mm, 20.0);
        assert_eq!(door.density_per_sqm, 14.0);
    }

    #[test]
    fn test_surcharges_do_not_change_physical_properties() {
        let shaker = DoorStyleSpec::new("shaker", "Shaker", 180.0, 14.0, 20.0);
        let color = ColorSpec {
            id: "navy".to_string(),
            name: "Navy".to_string(),
            surcharge_rate_per_sqm: 25.0,
        };
        let carcass = resolve_carcass(&hmr(), &GlobalSettings::new());

        let plain = resolve_door(&StyleOptions::with_door_style(&shaker), &carcass).unwrap();
        let colored = resolve_door(
            &StyleOptions {
                door_style: Some(&shaker),
                color: Some(&color),
                finish: None,
            },
            &carcass,
        )
        .unwrap();

        assert_eq!(plain.thickness_mm, colored.thickness_mm);
        assert_eq!(plain.density_per_sqm, colored.density_per_sqm);
        assert!(colored.price_rate_per_sqm > plain.price_rate_per_sqm);
    }

    #[test]
    fn test_no_door_style() {
        let carcass = resolve_carcass(&hmr(), &GlobalSettings::new());
        assert!(resolve_door(&StyleOptions::default(), &carcass).is_none());
    }

    #[test]
    fn test_negative_rates_clamped() {
        let mut material = hmr();
        material.rate_per_sqm = Some(-5.0);
        assert_eq!(resolve_carcass(&material, &GlobalSettings::new()).rate_per_sqm, 0.0);
    }
}
