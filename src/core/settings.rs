//! Global settings - flat key/value store of pricing rates
//!
//! Settings come from the catalog as loosely typed values (numbers, or numbers
//! stored as text). Typed accessors apply the documented defaults whenever a
//! key is absent or cannot be read as a number.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default GST rate applied to the subtotal (10%)
pub const DEFAULT_GST_RATE: f64 = 0.10;

/// Default hardware markup percentage applied to hardware set base cost
pub const DEFAULT_HARDWARE_MARKUP_PCT: f64 = 35.0;

/// Default hardware discount percentage applied after markup
pub const DEFAULT_HARDWARE_DISCOUNT_PCT: f64 = 0.0;

/// Well-known setting keys
pub mod keys {
    pub const HMR_RATE_PER_SQM: &str = "hmr_rate_per_sqm";
    pub const HARDWARE_BASE_COST: &str = "hardware_base_cost";
    pub const GST_RATE: &str = "gst_rate";
    pub const WASTAGE_FACTOR: &str = "wastage_factor";
    pub const HARDWARE_MARKUP_PCT: &str = "hardware_markup_percentage";
    pub const HARDWARE_DISCOUNT_PCT: &str = "hardware_discount_percentage";
    pub const DEFAULT_HINGE_SET_ID: &str = "default_hinge_set_id";
    pub const DEFAULT_RUNNER_SET_ID: &str = "default_runner_set_id";
}

/// A single setting value as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(f64),
    Text(String),
}

impl SettingValue {
    /// Read the value as a number, parsing text if necessary
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Number(n) if n.is_finite() => Some(*n),
            SettingValue::Number(_) => None,
            SettingValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Read the value as an identifier
    pub fn as_id(&self) -> Option<String> {
        match self {
            SettingValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            SettingValue::Text(_) => None,
            // Numeric ids are common in exported settings tables
            SettingValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                Some(format!("{}", *n as i64))
            }
            SettingValue::Number(n) => Some(n.to_string()),
        }
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        SettingValue::Number(n)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

/// Flat key/value settings store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalSettings {
    values: BTreeMap<String, SettingValue>,
}

impl GlobalSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning self for chaining
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Merge another settings store into this one (other takes precedence)
    pub fn merge(&mut self, other: GlobalSettings) {
        self.values.extend(other.values);
    }

    /// Numeric value for `key`, or None if absent or unreadable
    pub fn number(&self, key: &str) -> Option<f64> {
        let value = self.values.get(key)?;
        let number = value.as_f64();
        if number.is_none() {
            log::warn!("Setting '{}' has non-numeric value {:?}; ignoring", key, value);
        }
        number
    }

    /// Carcass board rate per square metre, if configured
    pub fn hmr_rate_per_sqm(&self) -> Option<f64> {
        self.number(keys::HMR_RATE_PER_SQM).filter(|r| *r >= 0.0)
    }

    /// Flat per-cabinet hardware allowance (0 when absent)
    pub fn hardware_base_cost(&self) -> f64 {
        self.number(keys::HARDWARE_BASE_COST)
            .filter(|c| *c >= 0.0)
            .unwrap_or(0.0)
    }

    /// GST rate as a fraction.
    ///
    /// Values above 1 are read as percentages, so both `0.1` and `10` mean 10%.
    pub fn gst_rate(&self) -> f64 {
        match self.number(keys::GST_RATE) {
            Some(rate) if rate > 1.0 => rate / 100.0,
            Some(rate) if rate >= 0.0 => rate,
            _ => DEFAULT_GST_RATE,
        }
    }

    /// Material wastage multiplier, never below 1.0
    pub fn wastage_factor(&self) -> f64 {
        self.number(keys::WASTAGE_FACTOR)
            .map(|f| f.max(1.0))
            .unwrap_or(1.0)
    }

    /// Hardware markup percentage (default 35%)
    pub fn hardware_markup_pct(&self) -> f64 {
        self.number(keys::HARDWARE_MARKUP_PCT)
            .filter(|p| *p >= 0.0)
            .unwrap_or(DEFAULT_HARDWARE_MARKUP_PCT)
    }

    /// Hardware discount percentage (default 0%), clamped to 0..=100
    pub fn hardware_discount_pct(&self) -> f64 {
        self.number(keys::HARDWARE_DISCOUNT_PCT)
            .map(|p| p.clamp(0.0, 100.0))
            .unwrap_or(DEFAULT_HARDWARE_DISCOUNT_PCT)
    }

    pub fn default_hinge_set_id(&self) -> Option<String> {
        self.values.get(keys::DEFAULT_HINGE_SET_ID)?.as_id()
    }

    pub fn default_runner_set_id(&self) -> Option<String> {
        self.values.get(keys::DEFAULT_RUNNER_SET_ID)?.as_id()
    }
}
