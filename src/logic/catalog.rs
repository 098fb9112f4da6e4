//! Sensor Catalog
//!
//! Ordered list of sensor ids for one run. Ids arrive from two places - the
//! manually pinned list in the flags file and the topology scan - with the
//! manual ids first so a pinned sensor keeps its position. Duplicates keep
//! their first occurrence; later repeats are dropped and counted.

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct SensorCatalog {
    ids: Vec<String>,
}

impl SensorCatalog {
    /// Build a catalog from raw id values, preserving insertion order.
    pub fn collect<I>(values: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let mut duplicates = 0usize;

        for value in values {
            let id = value.trim().to_string();
            if id.is_empty() {
                continue;
            }
            if seen.insert(id.clone()) {
                ids.push(id);
            } else {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            log::debug!("Dropped {} duplicate sensor ids", duplicates);
        }

        Self { ids }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
