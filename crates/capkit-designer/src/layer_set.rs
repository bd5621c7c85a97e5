//! Per-color layer collection.
//!
//! Layers live in an append-only slot arena with an id index beside it, so
//! lookup and removal are O(1) while iteration keeps insertion order.
//! Removal leaves a tombstone; the arena compacts itself once tombstones
//! outnumber live layers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use capkit_core::{Layer, LayerId, View};

/// Tombstones tolerated before compaction is considered.
const COMPACT_THRESHOLD: usize = 16;

/// Ordered layers of one color, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Layer>", into = "Vec<Layer>")]
pub struct ColorLayerSet {
    slots: Vec<Option<Layer>>,
    index: HashMap<LayerId, usize>,
}

impl ColorLayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live layers.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &LayerId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.index
            .get(id)
            .and_then(|&slot| self.slots.get(slot))
            .and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        let slot = *self.index.get(id)?;
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Appends a layer and returns its id.
    ///
    /// A layer whose id is already taken in this set is re-keyed so ids stay
    /// unique per color.
    pub fn push(&mut self, mut layer: Layer) -> LayerId {
        if self.index.contains_key(&layer.id) {
            let fresh = LayerId::generate();
            tracing::debug!("Duplicate layer id {} re-keyed as {}", layer.id, fresh);
            layer.id = fresh;
        }
        let id = layer.id.clone();
        self.index.insert(id.clone(), self.slots.len());
        self.slots.push(Some(layer));
        id
    }

    /// Removes a layer, returning it if it was present.
    pub fn remove(&mut self, id: &LayerId) -> Option<Layer> {
        let slot = self.index.remove(id)?;
        let removed = self.slots.get_mut(slot).and_then(Option::take);
        self.maybe_compact();
        removed
    }

    /// Live layers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.slots.iter().flatten()
    }

    /// Live layers placed on `view`.
    pub fn in_view(&self, view: View) -> impl Iterator<Item = &Layer> {
        self.iter().filter(move |layer| layer.view == view)
    }

    /// Deep copy of the live layers.
    pub fn to_vec(&self) -> Vec<Layer> {
        self.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }

    /// Deep copy with every layer re-keyed.
    pub fn duplicate_with_fresh_ids(&self) -> ColorLayerSet {
        self.iter().map(Layer::duplicate).collect()
    }

    fn maybe_compact(&mut self) {
        let tombstones = self.slots.len() - self.index.len();
        if tombstones > COMPACT_THRESHOLD && tombstones > self.index.len() {
            self.slots.retain(Option::is_some);
            self.index = self
                .slots
                .iter()
                .enumerate()
                .filter_map(|(slot, layer)| layer.as_ref().map(|l| (l.id.clone(), slot)))
                .collect();
        }
    }
}

impl PartialEq for ColorLayerSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl FromIterator<Layer> for ColorLayerSet {
    fn from_iter<T: IntoIterator<Item = Layer>>(iter: T) -> Self {
        let mut set = ColorLayerSet::new();
        for layer in iter {
            set.push(layer);
        }
        set
    }
}

impl From<Vec<Layer>> for ColorLayerSet {
    fn from(layers: Vec<Layer>) -> Self {
        layers.into_iter().collect()
    }
}

impl From<ColorLayerSet> for Vec<Layer> {
    fn from(set: ColorLayerSet) -> Self {
        set.slots.into_iter().flatten().collect()
    }
}
