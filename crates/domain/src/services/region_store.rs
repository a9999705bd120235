//! Authoritative in-memory set of geofence definitions.

use std::collections::BTreeMap;

use crate::models::Geofence;

/// Holds geofences keyed by id.
///
/// Every operation is total: unknown ids are a no-op reported through the
/// return value. Snapshots are owned copies ordered by id.
#[derive(Debug, Clone, Default)]
pub struct RegionStore {
    fences: BTreeMap<String, Geofence>,
    revision: u64,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fence, replacing any existing fence with the same id.
    ///
    /// Returns the previous definition when it differed from `fence`.
    pub fn upsert(&mut self, fence: Geofence) -> Option<Geofence> {
        if self.fences.get(&fence.id) == Some(&fence) {
            return None;
        }
        self.revision += 1;
        self.fences.insert(fence.id.clone(), fence)
    }

    /// Removes a fence. Returns false if the id is unknown.
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.fences.remove(id).is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Toggles the enabled flag. Returns false if the id is unknown.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.fences.get_mut(id) {
            Some(fence) => {
                if fence.enabled != enabled {
                    fence.enabled = enabled;
                    self.revision += 1;
                }
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<Geofence> {
        self.fences.get(id).cloned()
    }

    /// Owned copy of every fence, ordered by id.
    pub fn snapshot(&self) -> Vec<Geofence> {
        self.fences.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.fences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fences.is_empty()
    }

    /// Counter bumped on every mutation that changed the stored set.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
