//! Hardware set resolution and pricing
//!
//! Resolution picks one set per category, in this order:
//!
//! 1. the explicitly selected set id, if it names a set in the category
//! 2. the category default configured in settings (`default_hinge_set_id` /
//!    `default_runner_set_id`), if it names a set in the category
//! 3. the first set in the category flagged `is_default`
//! 4. the first set in the category
//! 5. nothing, if the category has no sets
//!
//! Pricing applies markup then discount to the set's base cost and scales
//! linearly with quantity.

use serde::{Deserialize, Serialize};

use crate::core::entity::find_record;
use crate::core::settings::{
    GlobalSettings, DEFAULT_HARDWARE_DISCOUNT_PCT, DEFAULT_HARDWARE_MARKUP_PCT,
};
use crate::entities::{CabinetPart, CabinetType, HardwareCategory, HardwareSet, PartRole};

/// Markup and discount percentages applied to hardware
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardwareRates {
    pub markup_pct: f64,
    pub discount_pct: f64,
}

impl Default for HardwareRates {
    fn default() -> Self {
        Self {
            markup_pct: DEFAULT_HARDWARE_MARKUP_PCT,
            discount_pct: DEFAULT_HARDWARE_DISCOUNT_PCT,
        }
    }
}

impl HardwareRates {
    pub fn from_settings(settings: &GlobalSettings) -> Self {
        Self {
            markup_pct: settings.hardware_markup_pct(),
            discount_pct: settings.hardware_discount_pct(),
        }
    }
}

/// Result of pricing a hardware set at a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwarePricingResult {
    pub set_id: String,
    pub set_name: String,
    pub category: HardwareCategory,
    pub quantity: u32,
    /// Item cost sum times quantity
    pub base_cost: f64,
    /// Base cost with markup applied
    pub marked_up_cost: f64,
    /// Marked-up cost with discount applied
    pub final_cost: f64,
    pub markup_pct: f64,
    pub discount_pct: f64,
}

fn configured_default(category: HardwareCategory, settings: &GlobalSettings) -> Option<String> {
    match category {
        HardwareCategory::Hinge => settings.default_hinge_set_id(),
        HardwareCategory::Runner => settings.default_runner_set_id(),
    }
}

/// Pick the applicable hardware set for a category
pub fn resolve_hardware_set<'a>(
    category: HardwareCategory,
    explicit_id: Option<&str>,
    sets: &'a [HardwareSet],
    settings: &GlobalSettings,
) -> Option<&'a HardwareSet> {
    let in_category = |id: &str| find_record(sets, id).filter(|s| s.category == category);

    if let Some(id) = explicit_id {
        match in_category(id) {
            Some(set) => return Some(set),
            None => log::debug!("Selected {} set '{}' not found; using defaults", category, id),
        }
    }

    if let Some(id) = configured_default(category, settings) {
        match in_category(&id) {
            Some(set) => return Some(set),
            None => log::debug!("Configured default {} set '{}' not found", category, id),
        }
    }

    let resolved = sets
        .iter()
        .find(|s| s.category == category && s.is_default)
        .or_else(|| sets.iter().find(|s| s.category == category));

    if resolved.is_none() {
        log::debug!("No {} sets available", category);
    }
    resolved
}

/// Price a hardware set at a quantity
pub fn price_hardware_set(
    set: &HardwareSet,
    quantity: u32,
    rates: &HardwareRates,
) -> HardwarePricingResult {
    let qty = quantity as f64;
    let unit_base = set.base_cost();
    let unit_marked_up = unit_base * (1.0 + rates.markup_pct / 100.0);
    let unit_final = unit_marked_up * (1.0 - rates.discount_pct / 100.0);

    HardwarePricingResult {
        set_id: set.id.clone(),
        set_name: set.name.clone(),
        category: set.category,
        quantity,
        base_cost: unit_base * qty,
        marked_up_cost: unit_marked_up * qty,
        final_cost: unit_final * qty,
        markup_pct: rates.markup_pct,
        discount_pct: rates.discount_pct,
    }
}

/// Units of a category one cabinet needs.
///
/// Hinges: `max(door_count, 1)`, unless the cabinet has neither a door count
/// nor door parts, in which case zero. Runners: `drawer_count`.
pub fn per_cabinet_quantity(
    category: HardwareCategory,
    cabinet: &CabinetType,
    parts: &[CabinetPart],
) -> u32 {
    match category {
        HardwareCategory::Hinge => {
            let has_door_parts = parts.iter().any(|p| p.effective_role() == PartRole::Door);
            if cabinet.door_count == 0 && !has_door_parts {
                0
            } else {
                cabinet.door_count.max(1)
            }
        }
        HardwareCategory::Runner => cabinet.drawer_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::keys;

    fn sets() -> Vec<HardwareSet> {
        let mut premium = HardwareSet::new("hinge-premium", "Premium Hinge", HardwareCategory::Hinge)
            .with_item("Soft Close Hinge", 9.0, 2);
        premium.is_default = true;

        vec![
            HardwareSet::new("hinge-std", "Standard Hinge", HardwareCategory::Hinge)
                .with_item("Hinge", 4.0, 2),
            premium,
            HardwareSet::new("runner-std", "Standard Runner", HardwareCategory::Runner)
                .with_item("Runner Pair", 18.0, 1),
        ]
    }

    #[test]
    fn test_explicit_selection_wins() {
        let sets = sets();
        let settings = GlobalSettings::new().with(keys::DEFAULT_HINGE_SET_ID, "hinge-premium");
        let set = resolve_hardware_set(HardwareCategory::Hinge, Some("hinge-std"), &sets, &settings);
        assert_eq!(set.unwrap().id, "hinge-std");
    }

    #[test]
    fn test_explicit_selection_wrong_category_ignored() {
        let sets = sets();
        let set = resolve_hardware_set(
            HardwareCategory::Hinge,
            Some("runner-std"),
            &sets,
            &GlobalSettings::new(),
        );
        assert_eq!(set.unwrap().id, "hinge-premium");
    }

    #[test]
    fn test_configured_default() {
        let sets = sets();
        let settings = GlobalSettings::new().with(keys::DEFAULT_HINGE_SET_ID, "hinge-std");
        let set = resolve_hardware_set(HardwareCategory::Hinge, None, &sets, &settings);
        assert_eq!(set.unwrap().id, "hinge-std");
    }

    #[test]
    fn test_missing_configured_default_falls_through() {
        let sets = sets();
        let settings = GlobalSettings::new().with(keys::DEFAULT_HINGE_SET_ID, "gone");
        let set = resolve_hardware_set(HardwareCategory::Hinge, Some("also-gone"), &sets, &settings);
        assert_eq!(set.unwrap().id, "hinge-premium");
    }

    #[test]
    fn test_flagged_default_then_first() {
        let sets = sets();
        let hinge = resolve_hardware_set(HardwareCategory::Hinge, None, &sets, &GlobalSettings::new());
        assert_eq!(hinge.unwrap().id, "hinge-premium");

        let runner = resolve_hardware_set(HardwareCategory::Runner, None, &sets, &GlobalSettings::new());
        assert_eq!(runner.unwrap().id, "runner-std");
    }

    #[test]
    fn test_empty_category() {
        let sets: Vec<HardwareSet> = sets()
            .into_iter()
            .filter(|s| s.category == HardwareCategory::Hinge)
            .collect();
        assert!(
            resolve_hardware_set(HardwareCategory::Runner, None, &sets, &GlobalSettings::new())
                .is_none()
        );
    }

    #[test]
    fn test_default_rates() {
        let rates = HardwareRates::from_settings(&GlobalSettings::new());
        assert_eq!(rates.markup_pct, 35.0);
        assert_eq!(rates.discount_pct, 0.0);
        assert_eq!(rates, HardwareRates::default());
    }

    #[test]
    fn test_price_default_markup() {
        let set = HardwareSet::new("h", "Hinge", HardwareCategory::Hinge).with_item("Hinge", 10.0, 2);
        let result = price_hardware_set(&set, 1, &HardwareRates::default());
        assert_eq!(result.base_cost, 20.0);
        assert!((result.marked_up_cost - 27.0).abs() < 1e-9);
        assert!((result.final_cost - 27.0).abs() < 1e-9);
    }

    #[test]
    fn test_markup_then_discount() {
        let set = HardwareSet::new("h", "Hinge", HardwareCategory::Hinge).with_item("Hinge", 10.0, 2);
        let rates = HardwareRates {
            markup_pct: 35.0,
            discount_pct: 10.0,
        };
        let result = price_hardware_set(&set, 1, &rates);

        assert!((result.final_cost - 20.0 * 1.35 * 0.90).abs() < 1e-9);
        // Multiplicative, not additive: 20 × 1.25 would be 25.0
        assert!((result.final_cost - 25.0).abs() > 0.1);
    }

    #[test]
    fn test_price_scales_with_quantity() {
        let set = HardwareSet::new("r", "Runner", HardwareCategory::Runner).with_item("Runner", 18.3, 1);
        let rates = HardwareRates {
            markup_pct: 35.0,
            discount_pct: 7.5,
        };
        let one = price_hardware_set(&set, 3, &rates);
        let two = price_hardware_set(&set, 6, &rates);
        assert_eq!(two.final_cost, 2.0 * one.final_cost);
        assert_eq!(two.base_cost, 2.0 * one.base_cost);
    }

    #[test]
    fn test_per_cabinet_quantity() {
        let mut cabinet = CabinetType::new("B600", "Base 600", 600.0, 720.0, 560.0);
        let door = CabinetPart::new("B600", "Door", 1, "width", "height").door();

        assert_eq!(per_cabinet_quantity(HardwareCategory::Hinge, &cabinet, &[]), 0);
        assert_eq!(
            per_cabinet_quantity(HardwareCategory::Hinge, &cabinet, std::slice::from_ref(&door)),
            1
        );

        cabinet.door_count = 2;
        cabinet.drawer_count = 3;
        assert_eq!(per_cabinet_quantity(HardwareCategory::Hinge, &cabinet, &[]), 2);
        assert_eq!(per_cabinet_quantity(HardwareCategory::Runner, &cabinet, &[]), 3);
    }
}
