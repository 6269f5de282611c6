//! CLI command implementations

pub mod catalog;
pub mod completions;
pub mod eval;
pub mod hardware;
pub mod price;
pub mod volume;
