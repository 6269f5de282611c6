//! cabprice: cabinet pricing and physical-properties engine
//!
//! Derives a sell price (carcass, doors, hardware, surcharges, GST) and a
//! freight volume/weight from a cabinet's part recipe and catalog rates.
//! Every calculation is a pure function of its inputs.

pub mod cli;
pub mod core;
pub mod entities;
pub mod pricing;
pub mod yaml;

pub use crate::core::cache::{HardwareCache, HardwareSnapshot};
pub use crate::core::formula::evaluate_formula;
pub use crate::pricing::{
    calculate_volume, price_cabinet, price_hardware_set, resolve_hardware_set, PriceBreakdown,
    PriceOutcome, PricingRequest, VolumeResult,
};
