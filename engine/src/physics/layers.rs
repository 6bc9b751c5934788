//! Collision layers and the masks used to filter queries

use super::PhysicsError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::{BitAnd, BitOr, Not};

/// Bit set of physics layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Mask containing every layer
    pub const ALL: LayerMask = LayerMask(0xffff_ffff);
    /// Mask containing no layer
    pub const NONE: LayerMask = LayerMask(0);
    /// Layer colliders live on unless told otherwise
    pub const DEFAULT: LayerMask = LayerMask(0x0000_0001);

    /// Mask holding the single layer at `index` (0..32)
    pub fn layer(index: u32) -> LayerMask {
        LayerMask(1u32.checked_shl(index).unwrap_or(0))
    }

    /// Does this mask share at least one layer with `other`?
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::DEFAULT
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

impl BitAnd for LayerMask {
    type Output = LayerMask;

    fn bitand(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 & rhs.0)
    }
}

impl Not for LayerMask {
    type Output = LayerMask;

    fn not(self) -> LayerMask {
        LayerMask(!self.0)
    }
}

/// Maps layer names to layer bits, handing out bits in registration order
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    layers: HashMap<String, LayerMask>,
}

impl LayerRegistry {
    /// Number of distinct layers a mask can hold
    pub const MAX_LAYERS: usize = 32;

    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `name` with the next free layer bit
    pub fn add_layer(&mut self, name: impl Into<String>) -> Result<LayerMask, PhysicsError> {
        let name = name.into();
        if self.layers.contains_key(&name) {
            return Err(PhysicsError::DuplicateLayer(name));
        }
        if self.layers.len() >= Self::MAX_LAYERS {
            return Err(PhysicsError::LayerLimit(Self::MAX_LAYERS));
        }

        let mask = LayerMask::layer(self.layers.len() as u32);
        self.layers.insert(name, mask);
        Ok(mask)
    }

    /// The layer bit registered for `name`, or an empty mask
    pub fn get(&self, name: &str) -> LayerMask {
        self.layers.get(name).copied().unwrap_or(LayerMask::NONE)
    }

    /// Mask covering every named layer; unknown names contribute nothing
    pub fn mask(&self, names: &[&str]) -> LayerMask {
        names
            .iter()
            .fold(LayerMask::NONE, |total, name| total | self.get(name))
    }

    /// Is the named layer part of `mask`?
    pub fn is_in_layer(&self, name: &str, mask: LayerMask) -> bool {
        self.get(name).intersects(mask)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
