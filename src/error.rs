//! Crate-level error types.

use std::fmt;

/// Errors produced by the crossview crate.
#[derive(Debug)]
pub enum CrossviewError {
    /// A gesture did not resolve to a mesh vertex. Recoverable; reported
    /// to the user, no state mutated.
    NoVertexSelected,
    /// Similarity query returned all zeros: the seed sits on a midline or
    /// boundary vertex with no defined cross-species mapping. Recoverable.
    MidlineVertex,
    /// Data-layer transport failure (network, decode).
    Transport(String),
    /// A species appears in the viewer set without a scale-table entry.
    UnknownSpecies(String),
    /// Intensity buffer length does not match the surface vertex count.
    IntensityLength {
        /// Vertex count of the surface being recolored.
        expected: usize,
        /// Length of the supplied value buffer.
        got: usize,
    },
    /// Color limits where `min >= max`.
    InvalidColorLimits {
        /// Lower limit as supplied.
        min: f32,
        /// Upper limit as supplied.
        max: f32,
    },
    /// A similarity response is missing the array for one of the viewers.
    MissingSurfaceKey(String),
    /// Species scale factor that is zero or negative.
    NonPositiveScale(String),
    /// Settings TOML parsing/serialization failure.
    SettingsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn the query worker thread.
    ThreadSpawn(std::io::Error),
}

impl CrossviewError {
    /// User-facing message for recoverable errors, suitable for the
    /// notification/toast channel.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoVertexSelected => "No vertex selected.".to_owned(),
            Self::MidlineVertex => {
                "No data available for midline vertices.".to_owned()
            }
            Self::Transport(_) => {
                "Could not reach the data server.".to_owned()
            }
            other => other.to_string(),
        }
    }

    /// Whether this error leaves the session usable (toast-and-continue)
    /// as opposed to a configuration defect that should be loud.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoVertexSelected | Self::MidlineVertex | Self::Transport(_)
        )
    }
}

impl fmt::Display for CrossviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoVertexSelected => write!(f, "no vertex selected"),
            Self::MidlineVertex => {
                write!(f, "no similarity data at midline vertex")
            }
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::UnknownSpecies(name) => {
                write!(f, "unknown species: {name}")
            }
            Self::IntensityLength { expected, got } => write!(
                f,
                "intensity buffer length {got} does not match vertex count \
                 {expected}"
            ),
            Self::InvalidColorLimits { min, max } => {
                write!(f, "invalid color limits: [{min}, {max}]")
            }
            Self::MissingSurfaceKey(key) => {
                write!(f, "similarity response missing key: {key}")
            }
            Self::NonPositiveScale(name) => {
                write!(f, "non-positive scale factor for species: {name}")
            }
            Self::SettingsParse(msg) => {
                write!(f, "settings parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn query worker: {e}")
            }
        }
    }
}

impl std::error::Error for CrossviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CrossviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
