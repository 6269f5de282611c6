//! Hardware snapshot cache
//!
//! Holds the loaded hardware sets and hardware pricing rates as an immutable
//! snapshot behind an `Arc`. A refresh builds a complete new snapshot and
//! swaps the reference under a short write lock; readers keep working on the
//! `Arc` they already hold, so a refresh never changes data mid-request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::core::entity::find_record;
use crate::core::settings::GlobalSettings;
use crate::entities::{HardwareCategory, HardwareSet};
use crate::pricing::hardware::{
    price_hardware_set, resolve_hardware_set, HardwarePricingResult, HardwareRates,
};

/// Immutable view of loaded hardware data
#[derive(Debug, Clone, Default)]
pub struct HardwareSnapshot {
    sets: Vec<HardwareSet>,
    settings: GlobalSettings,
    rates: HardwareRates,
}

impl HardwareSnapshot {
    pub fn new(sets: Vec<HardwareSet>, settings: GlobalSettings) -> Self {
        let rates = HardwareRates::from_settings(&settings);
        Self {
            sets,
            settings,
            rates,
        }
    }

    pub fn sets(&self) -> &[HardwareSet] {
        &self.sets
    }

    pub fn rates(&self) -> HardwareRates {
        self.rates
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Look up a set by id
    pub fn get(&self, id: &str) -> Option<&HardwareSet> {
        find_record(&self.sets, id)
    }

    /// Sets in a category, in catalog order
    pub fn in_category(&self, category: HardwareCategory) -> impl Iterator<Item = &HardwareSet> {
        self.sets.iter().filter(move |s| s.category == category)
    }

    /// Resolve the applicable set for a category
    pub fn resolve(
        &self,
        category: HardwareCategory,
        explicit_id: Option<&str>,
    ) -> Option<&HardwareSet> {
        resolve_hardware_set(category, explicit_id, &self.sets, &self.settings)
    }

    /// Price a set with this snapshot's rates
    pub fn price(&self, set: &HardwareSet, quantity: u32) -> HardwarePricingResult {
        price_hardware_set(set, quantity, &self.rates)
    }
}

/// Refreshable handle to the current hardware snapshot
#[derive(Debug, Default)]
pub struct HardwareCache {
    current: RwLock<Arc<HardwareSnapshot>>,
    generation: AtomicU64,
}

impl HardwareCache {
    /// Empty cache with default rates
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache already holding the given data
    pub fn with_data(sets: Vec<HardwareSet>, settings: GlobalSettings) -> Self {
        let cache = Self::new();
        cache.load(sets, settings);
        cache
    }

    /// Replace the snapshot with freshly loaded data
    pub fn load(&self, sets: Vec<HardwareSet>, settings: GlobalSettings) {
        let snapshot = Arc::new(HardwareSnapshot::new(sets, settings));
        log::debug!(
            "Loaded hardware snapshot: {} sets, markup {}%, discount {}%",
            snapshot.sets.len(),
            snapshot.rates.markup_pct,
            snapshot.rates.discount_pct
        );
        self.swap(snapshot);
    }

    /// Drop loaded data; subsequent reads see no sets and default rates
    pub fn invalidate(&self) {
        log::debug!("Hardware snapshot invalidated");
        self.swap(Arc::new(HardwareSnapshot::default()));
    }

    /// Current snapshot; holds no lock after returning
    pub fn snapshot(&self) -> Arc<HardwareSnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Number of snapshot swaps since creation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn swap(&self, snapshot: Arc<HardwareSnapshot>) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = snapshot;
        // Bumped under the write lock so the count never runs ahead of the data
        self.generation.fetch_add(1, Ordering::Release);
    }
}
