//! Honors roster construction.

use serde::Serialize;

use crate::reading::{HonorMap, HonorMeta};

/// Honor key for Maftir.
pub const MAFTIR_KEY: &str = "M";

/// One assignable honor for a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HonorSlot {
    pub key: String,
    pub label: String,
    pub meta: HonorMeta,
}

/// Display label for an honor key.
pub fn honor_label(key: &str) -> String {
    if key == MAFTIR_KEY {
        "Maftir".to_string()
    } else {
        format!("Aliyah {}", key)
    }
}

/// One slot per key, in the map's order.
pub fn build_roster(map: &HonorMap) -> Vec<HonorSlot> {
    map.iter()
        .map(|(key, meta)| HonorSlot {
            key: key.to_string(),
            label: honor_label(key),
            meta: meta.clone(),
        })
        .collect()
}
