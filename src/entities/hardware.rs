//! Hardware entities - priced bundles of hinges and drawer runners

use serde::{Deserialize, Serialize};

use crate::core::entity::CatalogRecord;

/// Hardware category a set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardwareCategory {
    /// Door hinges, applied per door
    Hinge,
    /// Drawer runners, applied per drawer
    Runner,
}

impl HardwareCategory {
    pub fn all() -> &'static [HardwareCategory] {
        &[HardwareCategory::Hinge, HardwareCategory::Runner]
    }
}

impl std::fmt::Display for HardwareCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HardwareCategory::Hinge => write!(f, "hinge"),
            HardwareCategory::Runner => write!(f, "runner"),
        }
    }
}

impl std::str::FromStr for HardwareCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hinge" | "hinges" => Ok(HardwareCategory::Hinge),
            "runner" | "runners" => Ok(HardwareCategory::Runner),
            _ => Err(format!("Unknown hardware category: {}", s)),
        }
    }
}

/// A purchasable hardware component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareProduct {
    #[serde(default)]
    pub id: String,

    pub name: String,

    pub cost_per_unit: f64,
}

/// A product and how many of it one set application needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareSetItem {
    pub product: HardwareProduct,

    #[serde(default = "default_item_quantity")]
    pub quantity: u32,
}

fn default_item_quantity() -> u32 {
    1
}

/// A priced bundle of hardware in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareSet {
    pub id: String,

    pub name: String,

    pub category: HardwareCategory,

    /// Brand name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Ordered items in the set
    #[serde(default)]
    pub items: Vec<HardwareSetItem>,

    /// Flagged as the category default in the catalog
    #[serde(default)]
    pub is_default: bool,
}

impl HardwareSet {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: HardwareCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            brand: None,
            items: Vec::new(),
            is_default: false,
        }
    }

    /// Add an item, returning self for chaining
    pub fn with_item(mut self, name: impl Into<String>, cost_per_unit: f64, quantity: u32) -> Self {
        let name = name.into();
        self.items.push(HardwareSetItem {
            product: HardwareProduct {
                id: name.to_lowercase().replace(' ', "-"),
                name,
                cost_per_unit,
            },
            quantity,
        });
        self
    }

    /// Sum of item unit costs times item quantities; negative costs count as zero
    pub fn base_cost(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.product.cost_per_unit.max(0.0) * item.quantity as f64)
            .sum()
    }
}

impl CatalogRecord for HardwareSet {
    const KIND: &'static str = "hardware set";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
