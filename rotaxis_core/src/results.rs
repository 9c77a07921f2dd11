//! Last probe results and the status object built from them.

use std::collections::BTreeMap;

use serde::Serialize;

/// Height measured at one reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrewResult {
    pub z: f64,
}

/// `"screw1".."screwN"` to measured height, from the latest probe cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AdjustmentResult(BTreeMap<String, ScrewResult>);

/// Key for the 1-based point `index`.
pub fn screw_key(index: usize) -> String {
    format!("screw{index}")
}

impl AdjustmentResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the height for 1-based point `index`.
    pub fn insert(&mut self, index: usize, z: f64) {
        self.0.insert(screw_key(index), ScrewResult { z });
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).map(|r| r.z)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, r)| (k.as_str(), r.z))
    }
}

/// Status object: `{ "results": { "screw1": { "z": .. }, .. } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdjusterStatus {
    pub results: AdjustmentResult,
}
