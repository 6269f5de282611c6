//! Pricing orchestrator - the single entry point for cabinet pricing
//!
//! Sequence: resolve carcass/door properties, cost carcass/doors/base
//! hardware for one cabinet, resolve and price any itemized hardware sets
//! through a [`HardwareSnapshot`], then scale by quantity and apply GST. Rounding happens once, on the final
//! total; every intermediate value in the breakdown is unrounded.

use serde::{Deserialize, Serialize};

use crate::core::cache::HardwareSnapshot;
use crate::core::settings::GlobalSettings;
use crate::entities::{Axis, CabinetPart, CabinetType, Dimensions, HardwareCategory, MaterialSpec};
use crate::pricing::cost::{calculate_cost, CostBreakdown};
use crate::pricing::hardware::{per_cabinet_quantity, HardwarePricingResult};
use crate::pricing::properties::{resolve_properties, StyleOptions};

/// Which hardware sets the caller wants itemized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareSelection {
    /// Add resolved hinge/runner sets to the hardware line
    #[serde(default)]
    pub itemize: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hinge_set_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_set_id: Option<String>,
}

impl HardwareSelection {
    /// Itemize hardware using defaults for both categories
    pub fn itemized() -> Self {
        Self {
            itemize: true,
            ..Default::default()
        }
    }

    fn explicit_id(&self, category: HardwareCategory) -> Option<&str> {
        match category {
            HardwareCategory::Hinge => self.hinge_set_id.as_deref(),
            HardwareCategory::Runner => self.runner_set_id.as_deref(),
        }
    }
}

/// Everything needed to price one cabinet line
#[derive(Debug, Clone, Default)]
pub struct PricingRequest<'a> {
    pub cabinet: Option<&'a CabinetType>,
    pub parts: &'a [CabinetPart],
    pub dimensions: Option<Dimensions>,
    pub quantity: u32,
    pub material: Option<&'a MaterialSpec>,
    pub style: StyleOptions<'a>,
    pub hardware: HardwareSelection,
}

/// Itemized hardware set on a priced cabinet line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareLineItem {
    pub category: HardwareCategory,
    /// Units needed by one cabinet
    pub per_cabinet_quantity: u32,
    /// Final cost for one cabinet
    pub per_cabinet_cost: f64,
    /// Pricing at the order quantity
    pub pricing: HardwarePricingResult,
}

/// Full price breakdown for a cabinet line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub cabinet_id: String,
    pub cabinet_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_method: Option<String>,
    pub dimensions: Dimensions,
    pub quantity: u32,

    /// Carcass, door, hardware and surcharge costs for one cabinet
    pub per_cabinet: CostBreakdown,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hardware_items: Vec<HardwareLineItem>,

    /// Price of one cabinet before GST
    pub unit_price: f64,
    /// `unit_price × quantity`
    pub subtotal: f64,
    pub gst_rate: f64,
    pub gst: f64,
    /// `subtotal + gst`, unrounded
    pub total_unrounded: f64,
    /// Final total rounded to the nearest whole currency unit
    pub total: f64,
}

impl PriceBreakdown {
    pub fn carcass(&self) -> f64 {
        self.per_cabinet.carcass
    }

    pub fn doors(&self) -> f64 {
        self.per_cabinet.doors
    }

    pub fn hardware(&self) -> f64 {
        self.per_cabinet.hardware
    }

    pub fn surcharges(&self) -> f64 {
        self.per_cabinet.surcharges
    }
}

/// Why a price could not be computed yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unavailable {
    MissingCabinetType,
    MissingDimensions,
    InvalidQuantity,
    MissingMaterial,
    /// Hardware units for the order exceed what can be counted
    QuantityTooLarge,
    DimensionOutOfRange {
        axis: Axis,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unavailable::MissingCabinetType => write!(f, "select a cabinet to see pricing"),
            Unavailable::MissingDimensions => write!(f, "enter dimensions to see pricing"),
            Unavailable::InvalidQuantity => write!(f, "enter a quantity to see pricing"),
            Unavailable::MissingMaterial => write!(f, "no carcass material is assigned to this cabinet"),
            Unavailable::QuantityTooLarge => write!(f, "quantity is too large to price"),
            Unavailable::DimensionOutOfRange {
                axis,
                value,
                min,
                max,
            } => {
                write!(f, "{} of {} mm is outside the allowed range", axis, value)?;
                match (min, max) {
                    (Some(lo), Some(hi)) => write!(f, " ({}–{} mm)", lo, hi),
                    (Some(lo), None) => write!(f, " (at least {} mm)", lo),
                    (None, Some(hi)) => write!(f, " (at most {} mm)", hi),
                    (None, None) => Ok(()),
                }
            }
        }
    }
}

/// Result of a pricing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PriceOutcome {
    Priced(Box<PriceBreakdown>),
    Unavailable { reason: Unavailable },
}

impl PriceOutcome {
    fn unavailable(reason: Unavailable) -> Self {
        log::debug!("Pricing unavailable: {}", reason);
        PriceOutcome::Unavailable { reason }
    }

    pub fn breakdown(&self) -> Option<&PriceBreakdown> {
        match self {
            PriceOutcome::Priced(b) => Some(b),
            PriceOutcome::Unavailable { .. } => None,
        }
    }

    pub fn is_priced(&self) -> bool {
        matches!(self, PriceOutcome::Priced(_))
    }
}

/// Price a cabinet line.
///
/// Never fails: inputs that make a price impossible to compute produce
/// [`PriceOutcome::Unavailable`], distinct from a price that computed to zero.
///
/// Itemized hardware is resolved and priced through `hardware`, so callers
/// holding a [`HardwareCache`](crate::core::HardwareCache) pass the snapshot
/// they took for this request.
pub fn price_cabinet(
    request: &PricingRequest<'_>,
    settings: &GlobalSettings,
    hardware: &HardwareSnapshot,
) -> PriceOutcome {
    let Some(cabinet) = request.cabinet else {
        return PriceOutcome::unavailable(Unavailable::MissingCabinetType);
    };
    let Some(dims) = request.dimensions.filter(Dimensions::is_valid) else {
        return PriceOutcome::unavailable(Unavailable::MissingDimensions);
    };
    if request.quantity == 0 {
        return PriceOutcome::unavailable(Unavailable::InvalidQuantity);
    }
    if let Some((axis, value, min, max)) = cabinet.out_of_range(&dims) {
        return PriceOutcome::unavailable(Unavailable::DimensionOutOfRange {
            axis,
            value,
            min,
            max,
        });
    }
    let Some(material) = request.material else {
        return PriceOutcome::unavailable(Unavailable::MissingMaterial);
    };

    let (carcass_props, door_props) = resolve_properties(material, &request.style, settings);

    let mut per_cabinet = calculate_cost(
        cabinet,
        request.parts,
        &dims,
        &carcass_props,
        door_props.as_ref(),
        settings.hardware_base_cost(),
        settings.wastage_factor(),
    );

    let hardware_items = if request.hardware.itemize {
        match itemize_hardware(request, cabinet, hardware) {
            Ok(items) => items,
            Err(reason) => return PriceOutcome::unavailable(reason),
        }
    } else {
        Vec::new()
    };
    per_cabinet.hardware += hardware_items
        .iter()
        .map(|item| item.per_cabinet_cost)
        .sum::<f64>();

    let unit_price = per_cabinet.unit_price();
    let subtotal = unit_price * request.quantity as f64;
    let gst_rate = settings.gst_rate();
    let gst = subtotal * gst_rate;
    let total_unrounded = subtotal + gst;

    log::debug!(
        "Priced {} × {} at {}: subtotal {:.4}, gst {:.4}",
        request.quantity,
        cabinet.id,
        dims,
        subtotal,
        gst
    );

    PriceOutcome::Priced(Box::new(PriceBreakdown {
        cabinet_id: cabinet.id.clone(),
        cabinet_name: cabinet.name.clone(),
        calculation_method: cabinet.calculation_method.clone(),
        dimensions: dims,
        quantity: request.quantity,
        per_cabinet,
        hardware_items,
        unit_price,
        subtotal,
        gst_rate,
        gst,
        total_unrounded,
        total: total_unrounded.round(),
    }))
}

fn itemize_hardware(
    request: &PricingRequest<'_>,
    cabinet: &CabinetType,
    hardware: &HardwareSnapshot,
) -> Result<Vec<HardwareLineItem>, Unavailable> {
    let mut items = Vec::new();

    for &category in HardwareCategory::all() {
        let per_cabinet = per_cabinet_quantity(category, cabinet, request.parts);
        if per_cabinet == 0 {
            continue;
        }

        let explicit = request.hardware.explicit_id(category);
        let Some(set) = hardware.resolve(category, explicit) else {
            continue;
        };

        let Some(order_quantity) = per_cabinet.checked_mul(request.quantity) else {
            log::warn!(
                "{} {} per cabinet × {} cabinets overflows the unit count",
                per_cabinet,
                category,
                request.quantity
            );
            return Err(Unavailable::QuantityTooLarge);
        };
        items.push(HardwareLineItem {
            category,
            per_cabinet_quantity: per_cabinet,
            per_cabinet_cost: hardware.price(set, per_cabinet).final_cost,
            pricing: hardware.price(set, order_quantity),
        });
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::HardwareCache;
    use crate::core::settings::keys;
    use crate::entities::{DoorStyleSpec, HardwareSet};

    fn cabinet() -> CabinetType {
        let mut cabinet = CabinetType::new("B600", "Base 600", 600.0, 720.0, 560.0);
        cabinet.door_count = 1;
        cabinet
    }

    fn parts() -> Vec<CabinetPart> {
        vec![
            CabinetPart::new("B600", "Sides", 2, "height", "depth"),
            CabinetPart::new("B600", "Back", 1, "width", "height"),
            CabinetPart::new("B600", "Bottom", 1, "width", "depth"),
            CabinetPart::new("B600", "Door", 1, "width", "height").door(),
        ]
    }

    fn hmr() -> MaterialSpec {
        MaterialSpec::new("hmr", "HMR", 12.0, 18.0)
    }

    fn request<'a>(
        cabinet: &'a CabinetType,
        parts: &'a [CabinetPart],
        material: &'a MaterialSpec,
    ) -> PricingRequest<'a> {
        PricingRequest {
            cabinet: Some(cabinet),
            parts,
            dimensions: Some(cabinet.default_dimensions()),
            quantity: 1,
            material: Some(material),
            ..Default::default()
        }
    }

    fn hinge_sets() -> Vec<HardwareSet> {
        vec![HardwareSet::new("hinge-std", "Standard Hinge", HardwareCategory::Hinge)
            .with_item("Hinge", 5.0, 2)]
    }

    fn no_hardware() -> HardwareSnapshot {
        HardwareSnapshot::default()
    }

    #[test]
    fn test_no_hardware_no_door_style() {
        let (cabinet, parts, material) = (cabinet(), parts(), hmr());
        let settings = GlobalSettings::new().with(keys::HMR_RATE_PER_SQM, 50.0);
        let hardware = HardwareSnapshot::new(hinge_sets(), settings.clone());
        let outcome = price_cabinet(&request(&cabinet, &parts, &material), &settings, &hardware);

        let breakdown = outcome.breakdown().unwrap();
        assert_eq!(breakdown.hardware(), 0.0);
        assert_eq!(breakdown.doors(), 0.0);
        assert!((breakdown.carcass() - 1.5744 * 50.0).abs() < 1e-9);
        assert!(breakdown.hardware_items.is_empty());
    }

    #[test]
    fn test_full_breakdown() {
        let (cabinet, parts, material) = (cabinet(), parts(), hmr());
        let shaker = DoorStyleSpec::new("shaker", "Shaker", 180.0, 14.0, 20.0);
        let settings = GlobalSettings::new()
            .with(keys::HMR_RATE_PER_SQM, 50.0)
            .with(keys::GST_RATE, 0.10);

        let mut req = request(&cabinet, &parts, &material);
        req.quantity = 2;
        req.style = StyleOptions::with_door_style(&shaker);
        req.hardware = HardwareSelection::itemized();

        let hardware = HardwareSnapshot::new(hinge_sets(), settings.clone());
        let breakdown = price_cabinet(&req, &settings, &hardware)
            .breakdown()
            .cloned()
            .unwrap();

        // Carcass 1.5744 m² × 50 = 78.72
        // Door 0.432 m² × (180 + 0.2 × 50) = 82.08
        // Hinges: 1 door → 1 set × 10 × 1.35 = 13.5
        let unit = 78.72 + 82.08 + 13.5;
        assert!((breakdown.unit_price - unit).abs() < 1e-9);
        assert!((breakdown.subtotal - unit * 2.0).abs() < 1e-9);
        assert!((breakdown.gst - unit * 2.0 * 0.1).abs() < 1e-9);
        assert_eq!(breakdown.total, (unit * 2.0 * 1.1).round());

        assert_eq!(breakdown.hardware_items.len(), 1);
        let hinges = &breakdown.hardware_items[0];
        assert_eq!(hinges.pricing.quantity, 2);
        assert!((hinges.pricing.final_cost - 27.0).abs() < 1e-9);
    }

    #[test]
    fn test_gst_from_settings() {
        let (cabinet, parts, material) = (cabinet(), parts(), hmr());
        let settings = GlobalSettings::new()
            .with(keys::HMR_RATE_PER_SQM, 100.0)
            .with(keys::GST_RATE, 0.15);
        let breakdown = price_cabinet(&request(&cabinet, &parts, &material), &settings, &no_hardware())
            .breakdown()
            .cloned()
            .unwrap();

        assert_eq!(breakdown.gst_rate, 0.15);
        // 157.44 × 1.15 = 181.056
        assert_eq!(breakdown.total, (breakdown.subtotal * 1.15).round());
        assert_eq!(breakdown.total, 181.0);
    }

    #[test]
    fn test_total_is_only_rounded_value() {
        let (cabinet, parts, material) = (cabinet(), parts(), hmr());
        let settings = GlobalSettings::new().with(keys::HMR_RATE_PER_SQM, 33.3);
        let breakdown = price_cabinet(&request(&cabinet, &parts, &material), &settings, &no_hardware())
            .breakdown()
            .cloned()
            .unwrap();

        assert_eq!(breakdown.total, breakdown.total.round());
        assert!(breakdown.total_unrounded.fract() != 0.0);
        assert!((breakdown.total - breakdown.total_unrounded).abs() <= 0.5);
    }

    #[test]
    fn test_unavailable_reasons() {
        let (cabinet, parts, material) = (cabinet(), parts(), hmr());
        let settings = GlobalSettings::new();

        let mut req = request(&cabinet, &parts, &material);
        req.cabinet = None;
        assert_eq!(
            price_cabinet(&req, &settings, &no_hardware()),
            PriceOutcome::Unavailable {
                reason: Unavailable::MissingCabinetType
            }
        );

        let mut req = request(&cabinet, &parts, &material);
        req.dimensions = None;
        assert!(matches!(
            price_cabinet(&req, &settings, &no_hardware()),
            PriceOutcome::Unavailable {
                reason: Unavailable::MissingDimensions
            }
        ));

        let mut req = request(&cabinet, &parts, &material);
        req.dimensions = Some(Dimensions::new(600.0, 0.0, 560.0));
        assert!(!price_cabinet(&req, &settings, &no_hardware()).is_priced());

        let mut req = request(&cabinet, &parts, &material);
        req.quantity = 0;
        assert!(matches!(
            price_cabinet(&req, &settings, &no_hardware()),
            PriceOutcome::Unavailable {
                reason: Unavailable::InvalidQuantity
            }
        ));

        let mut req = request(&cabinet, &parts, &material);
        req.material = None;
        assert!(matches!(
            price_cabinet(&req, &settings, &no_hardware()),
            PriceOutcome::Unavailable {
                reason: Unavailable::MissingMaterial
            }
        ));
    }

    #[test]
    fn test_out_of_range_dimensions() {
        let mut cabinet = cabinet();
        cabinet.max_width_mm = Some(900.0);
        let (parts, material) = (parts(), hmr());

        let mut req = request(&cabinet, &parts, &material);
        req.dimensions = Some(Dimensions::new(1200.0, 720.0, 560.0));

        match price_cabinet(&req, &GlobalSettings::new(), &no_hardware()) {
            PriceOutcome::Unavailable {
                reason: reason @ Unavailable::DimensionOutOfRange { .. },
            } => {
                assert!(reason.to_string().contains("width of 1200 mm"));
            }
            other => panic!("expected out of range, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_priced_is_not_unavailable() {
        let cabinet = cabinet();
        let material = hmr();
        let outcome = price_cabinet(&request(&cabinet, &[], &material), &GlobalSettings::new(), &no_hardware());
        let breakdown = outcome.breakdown().unwrap();
        assert_eq!(breakdown.total, 0.0);
    }

    #[test]
    fn test_runner_skipped_without_drawers() {
        let (cabinet, parts, material) = (cabinet(), parts(), hmr());
        let sets = vec![
            HardwareSet::new("runner-std", "Runner", HardwareCategory::Runner).with_item("Runner", 20.0, 1),
        ];
        let mut req = request(&cabinet, &parts, &material);
        req.hardware = HardwareSelection::itemized();

        let hardware = HardwareSnapshot::new(sets, GlobalSettings::new());
        let breakdown = price_cabinet(&req, &GlobalSettings::new(), &hardware)
            .breakdown()
            .cloned()
            .unwrap();
        // Hinges resolve to nothing (no hinge sets), runners skipped (no drawers)
        assert!(breakdown.hardware_items.is_empty());
        assert_eq!(breakdown.hardware(), 0.0);
    }

    #[test]
    fn test_pricing_follows_cache_refresh() {
        let (cabinet, parts, material) = (cabinet(), parts(), hmr());
        let settings = GlobalSettings::new();
        let cache = HardwareCache::with_data(hinge_sets(), settings.clone());

        let mut req = request(&cabinet, &parts, &material);
        req.hardware = HardwareSelection::itemized();

        let held = cache.snapshot();
        let before = price_cabinet(&req, &settings, &held);

        let dearer = vec![HardwareSet::new("hinge-std", "Standard Hinge", HardwareCategory::Hinge)
            .with_item("Hinge", 10.0, 2)];
        cache.load(dearer, settings.clone().with(keys::HARDWARE_MARKUP_PCT, 0.0));
        let after = price_cabinet(&req, &settings, &cache.snapshot());

        // 1 door: 10 × 1.35 before, 20 × 1.0 after the swap
        assert!((before.breakdown().unwrap().hardware() - 13.5).abs() < 1e-9);
        assert!((after.breakdown().unwrap().hardware() - 20.0).abs() < 1e-9);

        // A request still holding the old snapshot keeps the old prices
        let replay = price_cabinet(&req, &settings, &held);
        assert_eq!(replay, before);

        cache.invalidate();
        let cleared = price_cabinet(&req, &settings, &cache.snapshot());
        assert!(cleared.breakdown().unwrap().hardware_items.is_empty());
    }

    #[test]
    fn test_hardware_unit_overflow_is_unavailable() {
        let mut cabinet = cabinet();
        cabinet.door_count = 4;
        let (parts, material) = (parts(), hmr());
        let hardware = HardwareSnapshot::new(hinge_sets(), GlobalSettings::new());

        let mut req = request(&cabinet, &parts, &material);
        req.quantity = u32::MAX;
        req.hardware = HardwareSelection::itemized();
        assert_eq!(
            price_cabinet(&req, &GlobalSettings::new(), &hardware),
            PriceOutcome::Unavailable {
                reason: Unavailable::QuantityTooLarge
            }
        );

        // Without itemized hardware the same order still prices
        req.hardware = HardwareSelection::default();
        assert!(price_cabinet(&req, &GlobalSettings::new(), &hardware).is_priced());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = PriceOutcome::Unavailable {
            reason: Unavailable::MissingDimensions,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"unavailable\""));
        assert!(json.contains("missing_dimensions"));
    }
}
