//! Reversible range scaling for pattern data.
//!
//! Every scaler maps an observed value range onto a fixed target range and
//! can invert the mapping to recover original units. The observed range is
//! learned from data through update/reset operations; the target range is
//! fixed for the scaler's lifetime.
//!
//! # Available Scalers
//!
//! | Scaler | Description | Use Case |
//! |--------|-------------|----------|
//! | [`LinearScaler`] | Plain min-max scaling onto `[norm_min, norm_max]` | Default choice for bounded features |
//! | [`PinnedLinearScaler`] | Min-max scaling that pins one unscaled value to one scaled value | A special value (e.g. "no signal") must always map to the same constant |
//!
//! [`ScalerSet`] aggregates one scaler per input and target dimension and
//! applies them column-by-column across a whole [`crate::PatternSet`].
//!
//! # Example
//!
//! ```rust
//! use scalekit::scaling::{LinearScaler, Scaler};
//!
//! let mut scaler = LinearScaler::new(0.0, 1.0);
//! scaler.reset(&[2.0, 4.0, 8.0]).unwrap();
//!
//! let scaled = scaler.scale_value(5.0);
//! assert!((scaler.original_value(scaled) - 5.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ScaleError;

pub mod linear;
pub mod pinned;
pub mod set;
pub mod traits;

pub use linear::LinearScaler;
pub use pinned::PinnedLinearScaler;
pub use set::ScalerSet;
pub use traits::Scaler;

/// The closed set of concrete scaler types.
///
/// Each variant carries its stable wire tag (the type-name field of the
/// persistence format), its fixed parameter count, and the constructor the
/// codec dispatches to. Matching is exhaustive; an unrecognized tag fails in
/// [`ScalerKind::from_type_name`] instead of falling through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalerKind {
    /// Plain min-max scaling ([`LinearScaler`]).
    Linear,
    /// Min-max scaling through a fixed point ([`PinnedLinearScaler`]).
    PinnedLinear,
}

impl ScalerKind {
    /// Stable type tag used by the persistence format.
    pub fn type_name(self) -> &'static str {
        match self {
            ScalerKind::Linear => "Normalize",
            ScalerKind::PinnedLinear => "NormalizeWithFixpoint",
        }
    }

    /// Resolve a wire tag to a kind. Case-sensitive, exact match only.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Normalize" => Some(ScalerKind::Linear),
            "NormalizeWithFixpoint" => Some(ScalerKind::PinnedLinear),
            _ => None,
        }
    }

    /// Length of the parameter list [`Scaler::parameters`] produces for this
    /// kind.
    pub fn parameter_count(self) -> usize {
        match self {
            ScalerKind::Linear => LinearScaler::PARAMETER_COUNT,
            ScalerKind::PinnedLinear => PinnedLinearScaler::PARAMETER_COUNT,
        }
    }

    /// Construct a scaler of this kind carrying the given parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::ParameterCountMismatch`] if `params` does not
    /// have exactly [`parameter_count`](Self::parameter_count) values.
    pub fn instantiate(self, params: &[f64]) -> Result<Box<dyn Scaler>, ScaleError> {
        let mut scaler: Box<dyn Scaler> = match self {
            ScalerKind::Linear => Box::new(LinearScaler::new(0.0, 1.0)),
            ScalerKind::PinnedLinear => Box::new(PinnedLinearScaler::new(0.0, 0.0, -1.0, 1.0)),
        };
        scaler.set_parameters(params)?;
        Ok(scaler)
    }
}

/// Iterate `data[start], data[start + stride], ...` up to the end of the
/// slice.
pub(crate) fn strided_values(
    data: &[f64],
    start: usize,
    stride: usize,
) -> impl Iterator<Item = f64> + '_ {
    debug_assert!(stride > 0, "stride must be at least 1");
    data.iter().copied().skip(start).step_by(stride)
}
