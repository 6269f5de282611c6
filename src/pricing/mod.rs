//! Pricing engine - property resolution, costing, hardware and freight

pub mod cost;
pub mod hardware;
pub mod properties;
pub mod quote;
pub mod volume;

pub use cost::{calculate_cost, CarcassBucket, CostBreakdown, PartCost};
pub use hardware::{
    per_cabinet_quantity, price_hardware_set, resolve_hardware_set, HardwarePricingResult,
    HardwareRates,
};
pub use properties::{
    resolve_carcass, resolve_door, resolve_properties, CarcassProperties, DoorProperties,
    StyleOptions, DOOR_CARCASS_COMPONENT_FRACTION,
};
pub use quote::{
    price_cabinet, HardwareLineItem, HardwareSelection, PriceBreakdown, PriceOutcome,
    PricingRequest, Unavailable,
};
pub use volume::{calculate_volume, PartVolume, VolumeResult};
