//! Cabinet entities - cabinet types, their parts, and requested dimensions
//!
//! A cabinet type is a catalog recipe: default and allowed dimensions, door
//! and drawer counts, and a list of parts whose sizes are formulas over the
//! cabinet's overall width, height and depth.

use serde::{Deserialize, Serialize};

use crate::core::entity::CatalogRecord;
use crate::core::formula::evaluate_formula;

/// Cabinet axis, used when reporting dimension problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Width,
    Height,
    Depth,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Width => write!(f, "width"),
            Axis::Height => write!(f, "height"),
            Axis::Depth => write!(f, "depth"),
        }
    }
}

/// Overall cabinet dimensions in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width_mm: f64,
    pub height_mm: f64,
    pub depth_mm: f64,
}

impl Dimensions {
    pub fn new(width_mm: f64, height_mm: f64, depth_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            depth_mm,
        }
    }

    /// All three axes are finite and positive
    pub fn is_valid(&self) -> bool {
        [self.width_mm, self.height_mm, self.depth_mm]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Width => self.width_mm,
            Axis::Height => self.height_mm,
            Axis::Depth => self.depth_mm,
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}W × {}H × {}D mm",
            self.width_mm, self.height_mm, self.depth_mm
        )
    }
}

/// Cabinet type - immutable catalog recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CabinetType {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,

    /// Category (base, wall, tall, ...)
    #[serde(default)]
    pub category: String,

    pub default_width_mm: f64,
    pub default_height_mm: f64,
    pub default_depth_mm: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_depth_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth_mm: Option<f64>,

    /// Number of doors on one cabinet
    #[serde(default)]
    pub door_count: u32,

    /// Number of drawers on one cabinet
    #[serde(default)]
    pub drawer_count: u32,

    /// Side panel multiplicity, used when no explicit side part exists
    #[serde(default)]
    pub sides_qty: u32,

    /// Back panel multiplicity, used when no explicit back part exists
    #[serde(default)]
    pub backs_qty: u32,

    /// Bottom panel multiplicity, used when no explicit bottom part exists
    #[serde(default)]
    pub bottoms_qty: u32,

    /// Carcass material id (defaults to the catalog's `hmr` material)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,

    /// Calculation method tag carried through for audit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_method: Option<String>,
}

impl CatalogRecord for CabinetType {
    const KIND: &'static str = "cabinet";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl CabinetType {
    /// Create a cabinet type with default dimensions and no bounds
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        width_mm: f64,
        height_mm: f64,
        depth_mm: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            default_width_mm: width_mm,
            default_height_mm: height_mm,
            default_depth_mm: depth_mm,
            min_width_mm: None,
            max_width_mm: None,
            min_height_mm: None,
            max_height_mm: None,
            min_depth_mm: None,
            max_depth_mm: None,
            door_count: 0,
            drawer_count: 0,
            sides_qty: 0,
            backs_qty: 0,
            bottoms_qty: 0,
            material_id: None,
            calculation_method: None,
        }
    }

    pub fn default_dimensions(&self) -> Dimensions {
        Dimensions::new(
            self.default_width_mm,
            self.default_height_mm,
            self.default_depth_mm,
        )
    }

    /// Allowed (min, max) for an axis; either bound may be absent
    pub fn bounds(&self, axis: Axis) -> (Option<f64>, Option<f64>) {
        match axis {
            Axis::Width => (self.min_width_mm, self.max_width_mm),
            Axis::Height => (self.min_height_mm, self.max_height_mm),
            Axis::Depth => (self.min_depth_mm, self.max_depth_mm),
        }
    }

    /// First axis of `dims` outside this type's declared bounds
    pub fn out_of_range(&self, dims: &Dimensions) -> Option<(Axis, f64, Option<f64>, Option<f64>)> {
        [Axis::Width, Axis::Height, Axis::Depth]
            .into_iter()
            .find_map(|axis| {
                let value = dims.get(axis);
                let (min, max) = self.bounds(axis);
                let below = min.is_some_and(|m| value < m);
                let above = max.is_some_and(|m| value > m);
                (below || above).then_some((axis, value, min, max))
            })
    }

    /// Fallback multiplicity for a carcass role
    pub fn role_multiplicity(&self, role: PartRole) -> u32 {
        match role {
            PartRole::Side => self.sides_qty,
            PartRole::Back => self.backs_qty,
            PartRole::Bottom => self.bottoms_qty,
            _ => 0,
        }
    }
}

/// What a part is within the cabinet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartRole {
    Side,
    Back,
    Bottom,
    Door,
    Hardware,
    /// Any other carcass panel (tops, rails, shelves)
    Other,
}

impl PartRole {
    /// Carcass roles that have a fallback multiplicity on the cabinet type
    pub const CARCASS_BUCKETS: [PartRole; 3] = [PartRole::Side, PartRole::Back, PartRole::Bottom];

    pub fn is_carcass(&self) -> bool {
        matches!(
            self,
            PartRole::Side | PartRole::Back | PartRole::Bottom | PartRole::Other
        )
    }

    /// Standard panel formulas (width, height) for a carcass bucket
    pub fn standard_formulas(&self) -> Option<(&'static str, &'static str)> {
        match self {
            PartRole::Side => Some(("height", "depth")),
            PartRole::Back => Some(("width", "height")),
            PartRole::Bottom => Some(("width", "depth")),
            _ => None,
        }
    }
}

impl std::fmt::Display for PartRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartRole::Side => write!(f, "side"),
            PartRole::Back => write!(f, "back"),
            PartRole::Bottom => write!(f, "bottom"),
            PartRole::Door => write!(f, "door"),
            PartRole::Hardware => write!(f, "hardware"),
            PartRole::Other => write!(f, "other"),
        }
    }
}

/// Legacy-data compatibility: classify a part without a stored role by its
/// display name. Only consulted when `CabinetPart::role` is absent.
pub fn legacy_role_from_name(part_name: &str) -> PartRole {
    let lower = part_name.to_lowercase();
    if lower.contains("back") {
        PartRole::Back
    } else if lower.contains("bottom") {
        PartRole::Bottom
    } else if lower.contains("side") {
        PartRole::Side
    } else {
        PartRole::Other
    }
}

fn default_quantity() -> u32 {
    1
}

/// A named part of a cabinet type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CabinetPart {
    /// Owning cabinet type id
    pub cabinet_type_id: String,

    /// Display name
    pub part_name: String,

    /// Pieces of this part in one cabinet
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Width formula over width/height/depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_formula: Option<String>,

    /// Height formula over width/height/depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_formula: Option<String>,

    #[serde(default)]
    pub is_door: bool,

    /// Hardware parts are excluded from material costing
    #[serde(default)]
    pub is_hardware: bool,

    /// Explicit role; when absent the role is inferred from the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<PartRole>,
}

impl CabinetPart {
    pub fn new(
        cabinet_type_id: impl Into<String>,
        part_name: impl Into<String>,
        quantity: u32,
        width_formula: impl Into<String>,
        height_formula: impl Into<String>,
    ) -> Self {
        Self {
            cabinet_type_id: cabinet_type_id.into(),
            part_name: part_name.into(),
            quantity,
            width_formula: Some(width_formula.into()),
            height_formula: Some(height_formula.into()),
            is_door: false,
            is_hardware: false,
            role: None,
        }
    }

    /// Mark as a door panel
    pub fn door(mut self) -> Self {
        self.is_door = true;
        self
    }

    /// Set an explicit role
    pub fn with_role(mut self, role: PartRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Role used for costing. The `is_hardware`/`is_door` flags win over
    /// everything; otherwise the stored role, then the legacy name match.
    pub fn effective_role(&self) -> PartRole {
        if self.is_hardware {
            PartRole::Hardware
        } else if self.is_door {
            PartRole::Door
        } else {
            self.role
                .unwrap_or_else(|| legacy_role_from_name(&self.part_name))
        }
    }

    /// Evaluated (width, height) in millimetres
    pub fn evaluate(&self, dims: &Dimensions) -> (f64, f64) {
        let w = evaluate_formula(
            self.width_formula.as_deref(),
            dims.width_mm,
            dims.height_mm,
            dims.depth_mm,
        );
        let h = evaluate_formula(
            self.height_formula.as_deref(),
            dims.width_mm,
            dims.height_mm,
            dims.depth_mm,
        );
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_validity() {
        assert!(Dimensions::new(600.0, 720.0, 560.0).is_valid());
        assert!(!Dimensions::new(0.0, 720.0, 560.0).is_valid());
        assert!(!Dimensions::new(600.0, -1.0, 560.0).is_valid());
        assert!(!Dimensions::new(600.0, 720.0, f64::NAN).is_valid());
    }

    #[test]
    fn test_out_of_range() {
        let mut cabinet = CabinetType::new("B600", "Base 600", 600.0, 720.0, 560.0);
        cabinet.min_width_mm = Some(300.0);
        cabinet.max_width_mm = Some(900.0);

        assert!(cabinet.out_of_range(&Dimensions::new(600.0, 720.0, 560.0)).is_none());

        let (axis, value, min, max) = cabinet
            .out_of_range(&Dimensions::new(1200.0, 720.0, 560.0))
            .unwrap();
        assert_eq!(axis, Axis::Width);
        assert_eq!(value, 1200.0);
        assert_eq!(min, Some(300.0));
        assert_eq!(max, Some(900.0));
    }

    #[test]
    fn test_effective_role_precedence() {
        let side = CabinetPart::new("B600", "Left Side", 1, "height", "depth");
        assert_eq!(side.effective_role(), PartRole::Side);

        let tagged = CabinetPart::new("B600", "Panel A", 1, "height", "depth")
            .with_role(PartRole::Back);
        assert_eq!(tagged.effective_role(), PartRole::Back);

        let door = CabinetPart::new("B600", "Back Door", 1, "width", "height").door();
        assert_eq!(door.effective_role(), PartRole::Door);

        let mut hinge = CabinetPart::new("B600", "Hinge", 2, "", "");
        hinge.is_hardware = true;
        assert_eq!(hinge.effective_role(), PartRole::Hardware);
    }

    #[test]
    fn test_legacy_role_from_name() {
        assert_eq!(legacy_role_from_name("Back Panel"), PartRole::Back);
        assert_eq!(legacy_role_from_name("BOTTOM"), PartRole::Bottom);
        assert_eq!(legacy_role_from_name("sides"), PartRole::Side);
        assert_eq!(legacy_role_from_name("Shelf"), PartRole::Other);
    }

    #[test]
    fn test_part_evaluate() {
        let part = CabinetPart::new("B600", "Shelf", 1, "width - 36", "depth - 20");
        let (w, h) = part.evaluate(&Dimensions::new(600.0, 720.0, 560.0));
        assert_eq!(w, 564.0);
        assert_eq!(h, 540.0);
    }

    #[test]
    fn test_part_yaml_defaults() {
        let yaml = "cabinet_type_id: B600\npart_name: Back\nwidth_formula: width\nheight_formula: height\n";
        let part: CabinetPart = serde_yml::from_str(yaml).unwrap();
        assert_eq!(part.quantity, 1);
        assert!(!part.is_door);
        assert!(part.role.is_none());
        assert_eq!(part.effective_role(), PartRole::Back);
    }

    #[test]
    fn test_role_serialization() {
        let part = CabinetPart::new("B600", "Panel", 1, "width", "depth").with_role(PartRole::Bottom);
        let yaml = serde_yml::to_string(&part).unwrap();
        assert!(yaml.contains("role: bottom"));
    }
}
