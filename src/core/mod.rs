//! Core module - fundamental types and utilities

pub mod cache;
pub mod catalog;
pub mod config;
pub mod entity;
pub mod formula;
pub mod settings;

pub use cache::{HardwareCache, HardwareSnapshot};
pub use catalog::{Catalog, CatalogError};
pub use config::Config;
pub use entity::CatalogRecord;
pub use formula::{evaluate_formula, Formula, FormulaError};
pub use settings::GlobalSettings;
