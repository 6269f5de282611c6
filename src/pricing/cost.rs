//! Carcass and door cost calculation
//!
//! Evaluates every non-hardware part, converts its size to square metres and
//! accumulates the area into door or carcass buckets. Carcass buckets with no
//! explicit part fall back to the cabinet type's declared multiplicity of a
//! standard panel. All values are for ONE cabinet; the orchestrator applies
//! the order quantity.

use serde::{Deserialize, Serialize};

use crate::core::formula::evaluate_formula;
use crate::entities::{CabinetPart, CabinetType, Dimensions, PartRole};
use crate::pricing::properties::{CarcassProperties, DoorProperties};

/// Area contributed by one part (all pieces of it in one cabinet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartCost {
    pub part_name: String,
    pub role: PartRole,
    pub quantity: u32,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Area of all pieces, m²
    pub area_sqm: f64,
    /// False when hardware or when a dimension evaluated to ≤ 0
    pub included: bool,
}

/// Area of one carcass bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarcassBucket {
    pub role: PartRole,
    pub area_sqm: f64,
    /// Derived from the cabinet type's multiplicity rather than parts
    #[serde(default)]
    pub from_multiplicity: bool,
}

/// Per-cabinet cost breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub carcass_area_sqm: f64,
    pub carcass_rate_per_sqm: f64,
    pub carcass: f64,
    pub door_area_sqm: f64,
    pub door_rate_per_sqm: f64,
    pub doors: f64,
    /// Flat allowance plus any itemized hardware sets
    pub hardware: f64,
    /// Wastage surcharge on carcass and door material
    pub surcharges: f64,
    pub buckets: Vec<CarcassBucket>,
    pub parts: Vec<PartCost>,
}

impl CostBreakdown {
    /// Price of one cabinet before GST
    pub fn unit_price(&self) -> f64 {
        self.carcass + self.doors + self.hardware + self.surcharges
    }
}

/// Panel area in m² for millimetre sides; zero unless both are positive
pub(crate) fn panel_area_sqm(width_mm: f64, height_mm: f64) -> f64 {
    if width_mm > 0.0 && height_mm > 0.0 {
        (width_mm / 1000.0) * (height_mm / 1000.0)
    } else {
        0.0
    }
}

/// Calculate carcass, door, base hardware and surcharge costs for one cabinet
pub fn calculate_cost(
    cabinet: &CabinetType,
    parts: &[CabinetPart],
    dims: &Dimensions,
    carcass: &CarcassProperties,
    door: Option<&DoorProperties>,
    hardware_base_cost: f64,
    wastage_factor: f64,
) -> CostBreakdown {
    let mut part_costs = Vec::with_capacity(parts.len());
    let mut bucket_areas = [0.0_f64; 4];
    let mut explicit = [false; 4];
    let mut door_area_sqm = 0.0;

    for part in parts {
        let role = part.effective_role();
        let (w, h) = part.evaluate(dims);
        let included = role != PartRole::Hardware && w > 0.0 && h > 0.0;
        let area = if included {
            panel_area_sqm(w, h) * part.quantity as f64
        } else {
            0.0
        };

        if !included && role != PartRole::Hardware {
            log::debug!(
                "Part '{}' excluded: evaluated to {} × {} mm",
                part.part_name,
                w,
                h
            );
        }

        if role == PartRole::Door {
            door_area_sqm += area;
        } else if role.is_carcass() {
            let idx = bucket_index(role);
            bucket_areas[idx] += area;
            explicit[idx] = true;
        }

        part_costs.push(PartCost {
            part_name: part.part_name.clone(),
            role,
            quantity: part.quantity,
            width_mm: w,
            height_mm: h,
            area_sqm: area,
            included,
        });
    }

    let mut buckets = Vec::with_capacity(4);
    for role in PartRole::CARCASS_BUCKETS {
        let idx = bucket_index(role);
        if explicit[idx] {
            buckets.push(CarcassBucket {
                role,
                area_sqm: bucket_areas[idx],
                from_multiplicity: false,
            });
            continue;
        }

        let multiplicity = cabinet.role_multiplicity(role);
        let Some((wf, hf)) = role.standard_formulas() else {
            continue;
        };
        if multiplicity == 0 {
            continue;
        }

        let w = evaluate_formula(Some(wf), dims.width_mm, dims.height_mm, dims.depth_mm);
        let h = evaluate_formula(Some(hf), dims.width_mm, dims.height_mm, dims.depth_mm);
        buckets.push(CarcassBucket {
            role,
            area_sqm: panel_area_sqm(w, h) * multiplicity as f64,
            from_multiplicity: true,
        });
    }

    // Other panels have no standard formula to fall back on
    let other = bucket_index(PartRole::Other);
    if explicit[other] {
        buckets.push(CarcassBucket {
            role: PartRole::Other,
            area_sqm: bucket_areas[other],
            from_multiplicity: false,
        });
    }

    let carcass_area_sqm: f64 = buckets.iter().map(|b| b.area_sqm).sum();
    let carcass_cost: f64 = buckets
        .iter()
        .map(|b| b.area_sqm * carcass.rate_per_sqm)
        .sum();

    let door_rate_per_sqm = door.map_or(0.0, |d| d.price_rate_per_sqm);
    let doors = door_area_sqm * door_rate_per_sqm;

    let surcharges = (carcass_cost + doors) * (wastage_factor.max(1.0) - 1.0);

    CostBreakdown {
        carcass_area_sqm,
        carcass_rate_per_sqm: carcass.rate_per_sqm,
        carcass: carcass_cost,
        door_area_sqm,
        door_rate_per_sqm,
        doors,
        hardware: hardware_base_cost.max(0.0),
        surcharges,
        buckets,
        parts: part_costs,
    }
}

fn bucket_index(role: PartRole) -> usize {
    match role {
        PartRole::Side => 0,
        PartRole::Back => 1,
        PartRole::Bottom => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cabinet() -> CabinetType {
        CabinetType::new("B600", "Base 600", 600.0, 720.0, 560.0)
    }

    fn carcass_parts() -> Vec<CabinetPart> {
        vec![
            CabinetPart::new("B600", "Side", 2, "height", "depth"),
            CabinetPart::new("B600", "Back", 1, "width", "height"),
            CabinetPart::new("B600", "Bottom", 1, "width", "depth"),
        ]
    }

    fn carcass_props(rate: f64) -> CarcassProperties {
        CarcassProperties {
            rate_per_sqm: rate,
            thickness_mm: 18.0,
            weight_per_sqm: 12.0,
            weight_factor: 1.0,
        }
    }

    fn dims() -> Dimensions {
        Dimensions::new(600.0, 720.0, 560.0)
    }

    #[test]
    fn test_carcass_cost() {
        let cost = calculate_cost(
            &base_cabinet(),
            &carcass_parts(),
            &dims(),
            &carcass_props(50.0),
            None,
            0.0,
            1.0,
        );

        // Sides 2 × 0.72 × 0.56 + back 0.6 × 0.72 + bottom 0.6 × 0.56 = 1.5744 m²
        assert!((cost.carcass_area_sqm - 1.5744).abs() < 1e-9);
        assert!((cost.carcass - 78.72).abs() < 1e-9);
        assert_eq!(cost.doors, 0.0);
        assert_eq!(cost.hardware, 0.0);
        assert_eq!(cost.surcharges, 0.0);
        assert!(cost.buckets.iter().all(|b| !b.from_multiplicity));
    }

    #[test]
    fn test_door_cost() {
        let mut parts = carcass_parts();
        parts.push(CabinetPart::new("B600", "Door", 1, "width", "height").door());
        let door = DoorProperties {
            price_rate_per_sqm: 200.0,
            thickness_mm: 20.0,
            density_per_sqm: 14.0,
            weight_factor: 1.0,
        };

        let cost = calculate_cost(
            &base_cabinet(),
            &parts,
            &dims(),
            &carcass_props(50.0),
            Some(&door),
            0.0,
            1.0,
        );

        assert!((cost.door_area_sqm - 0.432).abs() < 1e-9);
        assert!((cost.doors - 86.4).abs() < 1e-9);
        // Door area is not carcass area
        assert!((cost.carcass_area_sqm - 1.5744).abs() < 1e-9);
    }

    #[test]
    fn test_door_parts_without_style_cost_nothing() {
        let parts = vec![CabinetPart::new("B600", "Door", 1, "width", "height").door()];
        let cost = calculate_cost(&base_cabinet(), &parts, &dims(), &carcass_props(50.0), None, 0.0, 1.0);
        assert!((cost.door_area_sqm - 0.432).abs() < 1e-9);
        assert_eq!(cost.doors, 0.0);
    }

    #[test]
    fn test_non_positive_dimensions_excluded() {
        let parts = vec![
            CabinetPart::new("B600", "Side", 2, "height", "depth"),
            CabinetPart::new("B600", "Filler", 1, "width - 600", "height"),
            CabinetPart::new("B600", "Broken", 1, "width * * 2", "height"),
        ];
        let cost = calculate_cost(&base_cabinet(), &parts, &dims(), &carcass_props(10.0), None, 0.0, 1.0);

        assert!((cost.carcass_area_sqm - 0.8064).abs() < 1e-9);
        assert!(!cost.parts[1].included);
        assert!(!cost.parts[2].included);
        assert_eq!(cost.parts[1].area_sqm, 0.0);
    }

    #[test]
    fn test_hardware_parts_excluded() {
        let mut hinge = CabinetPart::new("B600", "Hinge", 2, "35", "35");
        hinge.is_hardware = true;
        let cost = calculate_cost(&base_cabinet(), &[hinge], &dims(), &carcass_props(10.0), None, 0.0, 1.0);
        assert_eq!(cost.carcass_area_sqm, 0.0);
        assert!(!cost.parts[0].included);
    }

    #[test]
    fn test_multiplicity_fallback() {
        let mut cabinet = base_cabinet();
        cabinet.sides_qty = 2;
        cabinet.backs_qty = 1;
        cabinet.bottoms_qty = 1;

        // Only the back is explicit; sides and bottom come from multiplicities
        let parts = vec![CabinetPart::new("B600", "Back", 1, "width", "height")];
        let cost = calculate_cost(&cabinet, &parts, &dims(), &carcass_props(1.0), None, 0.0, 1.0);

        assert!((cost.carcass_area_sqm - 1.5744).abs() < 1e-9);
        let sides = cost.buckets.iter().find(|b| b.role == PartRole::Side).unwrap();
        assert!(sides.from_multiplicity);
        assert!((sides.area_sqm - 0.8064).abs() < 1e-9);
        let back = cost.buckets.iter().find(|b| b.role == PartRole::Back).unwrap();
        assert!(!back.from_multiplicity);
    }

    #[test]
    fn test_explicit_role_overrides_name() {
        // Named like a side but tagged as a shelf-type panel
        let parts = vec![CabinetPart::new("B600", "Side Shelf", 1, "width", "depth")
            .with_role(PartRole::Other)];
        let cost = calculate_cost(&base_cabinet(), &parts, &dims(), &carcass_props(1.0), None, 0.0, 1.0);
        assert_eq!(cost.buckets.len(), 1);
        assert_eq!(cost.buckets[0].role, PartRole::Other);
    }

    #[test]
    fn test_hardware_base_cost_and_wastage() {
        let cost = calculate_cost(
            &base_cabinet(),
            &carcass_parts(),
            &dims(),
            &carcass_props(50.0),
            None,
            12.5,
            1.1,
        );
        assert_eq!(cost.hardware, 12.5);
        assert!((cost.surcharges - 7.872).abs() < 1e-9);
        assert!((cost.unit_price() - (78.72 + 12.5 + 7.872)).abs() < 1e-9);
    }
}
