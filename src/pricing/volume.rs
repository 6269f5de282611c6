//! Volume and weight calculation for freight
//!
//! Every part is listed in the per-part breakdown, including parts that
//! contribute nothing, so downstream packaging decisions can be audited.
//! Totals are sums over the breakdown entries.

use serde::{Deserialize, Serialize};

use crate::entities::{CabinetPart, Dimensions, DoorStyleSpec, MaterialSpec, PartRole};
use crate::pricing::cost::panel_area_sqm;

/// Volume and weight of one part across the whole order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartVolume {
    pub part_name: String,
    pub role: PartRole,
    pub is_door: bool,
    /// Name of the material the part was measured in
    pub material: String,
    /// Pieces across the order (part quantity × cabinet quantity)
    pub pieces: u64,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Area of a single piece, m²
    pub area_sqm: f64,
    pub volume_m3: f64,
    pub weight_kg: f64,
}

/// Freight volume and weight for an order of one cabinet type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeResult {
    pub cabinet_name: String,
    pub dimensions: Dimensions,
    pub quantity: u32,
    pub total_volume_m3: f64,
    pub total_weight_kg: f64,
    pub carcass_volume_m3: f64,
    pub carcass_weight_kg: f64,
    pub doors_volume_m3: f64,
    pub doors_weight_kg: f64,
    pub per_part_breakdown: Vec<PartVolume>,
}

/// Physical properties a part is measured with
struct PanelMaterial<'a> {
    name: &'a str,
    thickness_mm: f64,
    weight_per_sqm: f64,
    weight_factor: f64,
}

impl<'a> PanelMaterial<'a> {
    fn carcass(material: &'a MaterialSpec) -> Self {
        Self {
            name: &material.name,
            thickness_mm: material.thickness_mm,
            weight_per_sqm: material.weight_per_sqm,
            weight_factor: material.weight_factor,
        }
    }

    fn door(style: &'a DoorStyleSpec) -> Self {
        Self {
            name: &style.name,
            thickness_mm: style.thickness_mm,
            weight_per_sqm: style.material_density_kg_per_sqm,
            weight_factor: style.weight_factor,
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

/// Calculate shippable volume (m³) and weight (kg)
pub fn calculate_volume(
    cabinet_name: &str,
    dims: &Dimensions,
    quantity: u32,
    parts: &[CabinetPart],
    carcass_material: &MaterialSpec,
    door_style: Option<&DoorStyleSpec>,
) -> VolumeResult {
    let mut per_part_breakdown = Vec::with_capacity(parts.len());

    for part in parts {
        let role = part.effective_role();
        let is_door = role == PartRole::Door;
        let material = match (is_door, door_style) {
            (true, Some(style)) => PanelMaterial::door(style),
            _ => PanelMaterial::carcass(carcass_material),
        };

        let (w, h) = part.evaluate(dims);
        let pieces = u64::from(part.quantity) * u64::from(quantity);
        let area_sqm = if role == PartRole::Hardware {
            0.0
        } else {
            panel_area_sqm(w, h)
        };

        let weight_factor = non_negative(material.weight_factor);
        let volume_per_piece = area_sqm * (non_negative(material.thickness_mm) / 1000.0) * weight_factor;
        let weight_per_piece = area_sqm * non_negative(material.weight_per_sqm) * weight_factor;

        per_part_breakdown.push(PartVolume {
            part_name: part.part_name.clone(),
            role,
            is_door,
            material: material.name.to_string(),
            pieces,
            width_mm: w,
            height_mm: h,
            area_sqm,
            volume_m3: volume_per_piece * pieces as f64,
            weight_kg: weight_per_piece * pieces as f64,
        });
    }

    let mut result = VolumeResult {
        cabinet_name: cabinet_name.to_string(),
        dimensions: *dims,
        quantity,
        total_volume_m3: 0.0,
        total_weight_kg: 0.0,
        carcass_volume_m3: 0.0,
        carcass_weight_kg: 0.0,
        doors_volume_m3: 0.0,
        doors_weight_kg: 0.0,
        per_part_breakdown: Vec::new(),
    };

    for entry in &per_part_breakdown {
        result.total_volume_m3 += entry.volume_m3;
        result.total_weight_kg += entry.weight_kg;
        if entry.is_door {
            result.doors_volume_m3 += entry.volume_m3;
            result.doors_weight_kg += entry.weight_kg;
        } else {
            result.carcass_volume_m3 += entry.volume_m3;
            result.carcass_weight_kg += entry.weight_kg;
        }
    }

    result.per_part_breakdown = per_part_breakdown;
    result
}
