//! Material entities - carcass board, door styles, colours and finishes

use serde::{Deserialize, Serialize};

use crate::core::entity::CatalogRecord;

fn default_weight_factor() -> f64 {
    1.0
}

/// Carcass board material (e.g. HMR)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub id: String,

    pub name: String,

    /// Nominal weight in kg/m²; also the cost-rate basis when no rate is set
    pub weight_per_sqm: f64,

    pub thickness_mm: f64,

    /// Density correction multiplier
    #[serde(default = "default_weight_factor")]
    pub weight_factor: f64,

    /// Explicit price per m², overriding settings and weight basis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_per_sqm: Option<f64>,
}

impl MaterialSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        weight_per_sqm: f64,
        thickness_mm: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight_per_sqm,
            thickness_mm,
            weight_factor: 1.0,
            rate_per_sqm: None,
        }
    }
}

impl CatalogRecord for MaterialSpec {
    const KIND: &'static str = "material";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Door style (e.g. Shaker)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorStyleSpec {
    pub id: String,

    pub name: String,

    /// Price per m² before colour/finish surcharges
    pub base_rate_per_sqm: f64,

    /// Door panel weight in kg/m²
    pub material_density_kg_per_sqm: f64,

    pub thickness_mm: f64,

    #[serde(default = "default_weight_factor")]
    pub weight_factor: f64,
}

impl DoorStyleSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_rate_per_sqm: f64,
        material_density_kg_per_sqm: f64,
        thickness_mm: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_rate_per_sqm,
            material_density_kg_per_sqm,
            thickness_mm,
            weight_factor: 1.0,
        }
    }
}

impl CatalogRecord for DoorStyleSpec {
    const KIND: &'static str = "door style";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Door colour option; adds to the door price rate only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub surcharge_rate_per_sqm: f64,
}

impl CatalogRecord for ColorSpec {
    const KIND: &'static str = "color";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Door finish option; adds to the door price rate only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rate_per_sqm: f64,
}

impl CatalogRecord for FinishSpec {
    const KIND: &'static str = "finish";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_factor_defaults_to_one() {
        let yaml = "id: hmr\nname: HMR 18mm\nweight_per_sqm: 12\nthickness_mm: 18\n";
        let material: MaterialSpec = serde_yml::from_str(yaml).unwrap();
        assert_eq!(material.weight_factor, 1.0);
        assert!(material.rate_per_sqm.is_none());

        let yaml = "id: shaker\nname: Shaker\nbase_rate_per_sqm: 180\nmaterial_density_kg_per_sqm: 14\nthickness_mm: 20\n";
        let door: DoorStyleSpec = serde_yml::from_str(yaml).unwrap();
        assert_eq!(door.weight_factor, 1.0);
    }

    #[test]
    fn test_surcharge_defaults_to_zero() {
        let color: ColorSpec = serde_yml::from_str("id: white\nname: White\n").unwrap();
        assert_eq!(color.surcharge_rate_per_sqm, 0.0);

        let finish: FinishSpec = serde_yml::from_str("id: matt\nname: Matt\n").unwrap();
        assert_eq!(finish.rate_per_sqm, 0.0);
    }
}
