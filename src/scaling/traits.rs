//! The core scaling contract.
//!
//! [`Scaler`] is the object-safe trait every scaling algorithm implements.
//! Containers hold `Box<dyn Scaler>` and copy scalers through
//! [`Scaler::clone_box`], so a boxed scaler clones like a value.
//!
//! Before scaling new data, call one of the update or reset operations so
//! previously unseen values do not land outside the target range: update
//! extends a running baseline, reset recomputes it from a fresh batch.

use std::fmt;

use crate::error::ScaleError;
use crate::scaling::ScalerKind;

/// A stateful, reversible linear transform from an observed value range to a
/// fixed target range.
///
/// Batch operations take a strided view over a flat slice, the sequence
/// `data[start], data[start + stride], ...`, so one column of a row-major
/// block can be addressed without copying.
///
/// `scale_value` never clamps: values beyond the observed range produce
/// results beyond the target range, which are returned as-is and reported
/// through [`log::warn!`]. Callers that need hard bounds must clamp
/// themselves.
pub trait Scaler: fmt::Debug {
    /// Extend the observed range to cover one additional value.
    ///
    /// Does not discard previously learned bounds.
    fn update_value(&mut self, value: f64);

    /// Extend the observed range to cover every value of a strided batch.
    ///
    /// Does not discard previously learned bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::EmptyBatch`] if the view contains no values;
    /// the scaler is left untouched in that case.
    fn update_strided(&mut self, data: &[f64], start: usize, stride: usize)
        -> Result<(), ScaleError>;

    /// Discard the learned bounds, then update from a strided batch.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::EmptyBatch`] if the view contains no values;
    /// the scaler is left untouched in that case.
    fn reset_strided(&mut self, data: &[f64], start: usize, stride: usize)
        -> Result<(), ScaleError>;

    /// Extend the observed range to cover every value of a contiguous batch.
    fn update(&mut self, values: &[f64]) -> Result<(), ScaleError> {
        self.update_strided(values, 0, 1)
    }

    /// Discard the learned bounds, then update from a contiguous batch.
    fn reset(&mut self, values: &[f64]) -> Result<(), ScaleError> {
        self.reset_strided(values, 0, 1)
    }

    /// Scale a single value. Pure in the current parameters; never clamps.
    fn scale_value(&self, value: f64) -> f64;

    /// Scale a strided batch in place.
    fn scale_strided(&self, data: &mut [f64], start: usize, stride: usize) {
        debug_assert!(stride > 0, "stride must be at least 1");
        let mut index = start;
        while index < data.len() {
            data[index] = self.scale_value(data[index]);
            index += stride;
        }
    }

    /// Scale `count` values from `input` into `output`, with independent
    /// strides for the two buffers.
    ///
    /// # Panics
    ///
    /// Panics if either buffer is too short for the requested
    /// `count`/stride combination.
    fn scale_into(
        &self,
        input: &[f64],
        in_stride: usize,
        output: &mut [f64],
        out_stride: usize,
        count: usize,
    ) {
        for i in 0..count {
            output[i * out_stride] = self.scale_value(input[i * in_stride]);
        }
    }

    /// Scale a contiguous batch in place.
    fn scale_slice(&self, values: &mut [f64]) {
        self.scale_strided(values, 0, 1);
    }

    /// Map a scaled value back to its original units.
    ///
    /// Exact algebraic inverse of [`scale_value`](Self::scale_value) under
    /// the *current* parameters, not necessarily the parameters in effect
    /// when the value was produced.
    fn original_value(&self, value: f64) -> f64;

    /// The scaler's learned and fixed parameters, in the order
    /// [`set_parameters`](Self::set_parameters) expects them.
    fn parameters(&self) -> Vec<f64>;

    /// Restore parameters previously produced by
    /// [`parameters`](Self::parameters).
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::ParameterCountMismatch`] unless `params` has
    /// exactly the type's fixed length.
    fn set_parameters(&mut self, params: &[f64]) -> Result<(), ScaleError>;

    /// The concrete kind of this scaler.
    fn kind(&self) -> ScalerKind;

    /// Stable type tag used by the persistence format.
    fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Deep copy with identical parameters and type.
    fn clone_box(&self) -> Box<dyn Scaler>;
}

impl Clone for Box<dyn Scaler> {
    fn clone(&self) -> Box<dyn Scaler> {
        self.clone_box()
    }
}
