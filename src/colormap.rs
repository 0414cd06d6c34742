//! Scalar-to-color mapping for per-vertex intensity buffers.
//!
//! A pure function of `(values, map, limits)`: each value is normalized
//! into `[0, 1]` against the color limits and sampled from the active
//! colormap, yielding one RGB triple per vertex for the renderer's
//! vertex-color attribute.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CrossviewError;

/// Named colormaps available to the viewer UI.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum ColorMap {
    /// Rainbow colormap, the viewer default.
    #[default]
    Turbo,
    /// Perceptually uniform, good for scientific data.
    Viridis,
    /// Purple to yellow, perceptually uniform.
    Plasma,
    /// Black to yellow through red.
    Inferno,
    /// Diverging blue-white-red for +/- values.
    CoolWarm,
}

impl ColorMap {
    /// Sample the colormap at parameter `t` (clamped to `0.0..=1.0`).
    #[must_use]
    pub fn sample(self, t: f32) -> [f32; 3] {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Turbo => sample_turbo(t),
            Self::Viridis => sample_viridis(t),
            Self::Plasma => sample_plasma(t),
            Self::Inferno => sample_inferno(t),
            Self::CoolWarm => sample_coolwarm(t),
        }
    }
}

fn sample_turbo(t: f32) -> [f32; 3] {
    use std::f32::consts::PI;
    let r = 34.0 + 240.0 * (PI * (t - 0.3)).sin().max(0.0) + 135.0 * t * t;
    let g = 30.0 + 220.0 * (PI * (t - 0.5) * 2.0).sin().max(0.0);
    let b = 130.0 + 125.0 * (PI * (t + 0.2)).sin().max(0.0) - 200.0 * t * t;
    rgb255(r, g, b)
}

fn sample_viridis(t: f32) -> [f32; 3] {
    let r = 68.0 + t * (49.0 - 68.0 + t * (253.0 - 49.0));
    let g = 1.0 + t * (104.0 - 1.0 + t * (231.0 - 104.0));
    let b = 84.0 + t * (142.0 - 84.0 + t * (37.0 - 142.0));
    rgb255(r, g, b)
}

fn sample_plasma(t: f32) -> [f32; 3] {
    let r = 13.0 + t * (240.0 - 13.0);
    let g = 8.0 + t * t * 240.0;
    let b = 135.0 + t * (50.0 - 135.0);
    rgb255(r, g, b)
}

fn sample_inferno(t: f32) -> [f32; 3] {
    let r = t * 255.0;
    let g = t * t * 200.0;
    let b = (1.0 - t) * 128.0 * (1.0 - t * t);
    rgb255(r, g, b)
}

fn sample_coolwarm(t: f32) -> [f32; 3] {
    let (r, g, b) = if t < 0.5 {
        let s = t * 2.0;
        (59.0 + s * 196.0, 76.0 + s * 179.0, 192.0 + s * 63.0)
    } else {
        let s = (t - 0.5) * 2.0;
        (255.0, 255.0 - s * 155.0, 255.0 - s * 195.0)
    };
    rgb255(r, g, b)
}

fn rgb255(r: f32, g: f32, b: f32) -> [f32; 3] {
    [
        (r / 255.0).clamp(0.0, 1.0),
        (g / 255.0).clamp(0.0, 1.0),
        (b / 255.0).clamp(0.0, 1.0),
    ]
}

/// Map an intensity buffer to per-vertex RGB triples.
///
/// Values are normalized by `(v - min) / (max - min)` and clamped, so
/// out-of-range intensities saturate at the colormap ends.
///
/// # Errors
///
/// Returns [`CrossviewError::InvalidColorLimits`] when `min >= max`.
pub fn mesh_colors(
    values: &[f32],
    map: ColorMap,
    limits: [f32; 2],
) -> Result<Vec<[f32; 3]>, CrossviewError> {
    let [min, max] = limits;
    if min >= max {
        return Err(CrossviewError::InvalidColorLimits { min, max });
    }
    let span = max - min;
    Ok(values.iter().map(|v| map.sample((v - min) / span)).collect())
}
