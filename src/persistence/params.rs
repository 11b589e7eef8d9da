//! Serializable snapshot of a scaler set's learned parameters.

use serde::{Deserialize, Serialize};

use crate::error::ScaleError;
use crate::scaling::ScalerKind;

/// Kind and parameter list of one scaler slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    /// Concrete scaler type.
    pub kind: ScalerKind,
    /// Parameter list in the order [`crate::Scaler::parameters`] produces
    /// it; length is fixed per kind.
    pub values: Vec<f64>,
}

/// Snapshot of every input and target scaler of a
/// [`crate::ScalerSet`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalerSetParams {
    /// Input-dimension scalers, in dimension order.
    pub inputs: Vec<ScalerParams>,
    /// Target-dimension scalers, in dimension order.
    pub targets: Vec<ScalerParams>,
}

impl ScalerSetParams {
    /// Encode the snapshot into a compact byte buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ScaleError> {
        bincode::serialize(self).map_err(Into::into)
    }

    /// Decode a snapshot previously produced by
    /// [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScaleError> {
        bincode::deserialize(bytes).map_err(Into::into)
    }
}
