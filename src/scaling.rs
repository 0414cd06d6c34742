//! Species/side view-space scaling primitives.
//!
//! Human and macaque cortical meshes differ in physical size, and left and
//! right hemispheres are geometric mirror images along the sagittal axis.
//! Every cross-viewer geometric transform (initial camera placement, camera
//! synchronization) is built from the three primitives here: a per-species
//! scale factor, the ratio of two factors, and a left/right mirror sign.
//! They are pure lookups so they stay unit-testable without any rendering
//! dependency.

use std::fmt;

use rustc_hash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CrossviewError;

/// Species whose cortical surfaces the viewer compares.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// Homo sapiens (reference geometry, scale 1.0).
    Human,
    /// Rhesus macaque.
    Macaque,
}

impl Species {
    /// Wire-format name, as used in API query strings and response keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Macaque => "macaque",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hemisphere side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left hemisphere.
    Left,
    /// Right hemisphere.
    Right,
}

impl Side {
    /// Wire-format name, as used in API query strings and response keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// The opposite hemisphere.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Mirror sign between two sides: `+1.0` when equal, `-1.0` otherwise.
    ///
    /// Opposite hemispheres are mirror images along the sagittal (x) axis,
    /// so an x coordinate propagated across sides flips sign.
    #[must_use]
    pub fn mirror_sign(self, other: Self) -> f32 {
        if self == other {
            1.0
        } else {
            -1.0
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-species geometric scale factors, human = 1.0 reference.
///
/// Every species appearing in the viewer set must have an entry; a missing
/// entry is a configuration error, surfaced at session startup via
/// [`SpeciesScale::ensure_covers`] so the per-event paths cannot hit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesScale {
    factors: FxHashMap<Species, f32>,
}

impl Default for SpeciesScale {
    fn default() -> Self {
        let mut factors = FxHashMap::default();
        let _ = factors.insert(Species::Human, 1.0);
        let _ = factors.insert(Species::Macaque, 0.45);
        Self { factors }
    }
}

impl SpeciesScale {
    /// Build a scale table from explicit factors.
    ///
    /// # Errors
    ///
    /// Returns [`CrossviewError::NonPositiveScale`] if any factor is zero
    /// or negative.
    pub fn new(
        factors: FxHashMap<Species, f32>,
    ) -> Result<Self, CrossviewError> {
        for (species, factor) in &factors {
            if *factor <= 0.0 {
                return Err(CrossviewError::NonPositiveScale(
                    species.to_string(),
                ));
            }
        }
        Ok(Self { factors })
    }

    /// Scale factor for one species.
    ///
    /// # Errors
    ///
    /// Returns [`CrossviewError::UnknownSpecies`] when the species has no
    /// entry in the table.
    pub fn scale_factor(
        &self,
        species: Species,
    ) -> Result<f32, CrossviewError> {
        self.factors.get(&species).copied().ok_or_else(|| {
            CrossviewError::UnknownSpecies(species.to_string())
        })
    }

    /// Ratio `scale_factor(a) / scale_factor(b)`, the multiplier carrying
    /// a camera position from species `b`'s view space into species `a`'s.
    ///
    /// # Errors
    ///
    /// Returns [`CrossviewError::UnknownSpecies`] when either species is
    /// missing from the table.
    pub fn relative_scale(
        &self,
        a: Species,
        b: Species,
    ) -> Result<f32, CrossviewError> {
        Ok(self.scale_factor(a)? / self.scale_factor(b)?)
    }

    /// Validate that every species in `species` has a table entry.
    ///
    /// # Errors
    ///
    /// Returns [`CrossviewError::UnknownSpecies`] naming the first species
    /// without an entry.
    pub fn ensure_covers<I>(&self, species: I) -> Result<(), CrossviewError>
    where
        I: IntoIterator<Item = Species>,
    {
        for s in species {
            let _ = self.scale_factor(s)?;
        }
        Ok(())
    }
}
