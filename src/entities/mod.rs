//! Entity type definitions
//!
//! The catalog supplies the following records to the pricing engine:
//!
//! **Cabinets:**
//! - [`CabinetType`] - Cabinet recipe with default/min/max dimensions and door/drawer counts
//! - [`CabinetPart`] - Named part with width/height formulas and a [`PartRole`]
//!
//! **Materials:**
//! - [`MaterialSpec`] - Carcass board with weight, thickness and weight factor
//! - [`DoorStyleSpec`] - Door style with price rate and physical properties
//! - [`ColorSpec`], [`FinishSpec`] - Door price surcharges
//!
//! **Hardware:**
//! - [`HardwareSet`] - Priced bundle of [`HardwareProduct`]s in a [`HardwareCategory`]

pub mod cabinet;
pub mod hardware;
pub mod material;

pub use cabinet::{Axis, CabinetPart, CabinetType, Dimensions, PartRole};
pub use hardware::{HardwareCategory, HardwareProduct, HardwareSet, HardwareSetItem};
pub use material::{ColorSpec, DoorStyleSpec, FinishSpec, MaterialSpec};
