//! Per-dimension scaler aggregation for pattern sets.
//!
//! A [`ScalerSet`] owns one scaler per input dimension and one per target
//! dimension and applies them column-by-column across a whole
//! [`PatternSet`]. Scalers are always stored as deep copies; two sets never
//! share a scaler, and cloning a set clones every slot.

use std::path::Path;

use crate::error::ScaleError;
use crate::pattern::PatternSet;
use crate::persistence::{
    ScalerParams, ScalerReader, ScalerSetParams, ScalerWriter, DEFAULT_SEPARATOR,
};
use crate::scaling::Scaler;

/// Ordered input and target scalers for multi-dimensional pattern data.
///
/// Bulk operations require the batch's dimensionality to match the scaler
/// count exactly and propagate per-dimension update/reset/scale calls to
/// each scaler with the column's stride.
///
/// # Example
///
/// ```rust
/// use scalekit::{LinearScaler, PatternSet, ScalerSet};
///
/// let mut scalers = ScalerSet::new();
/// scalers.add_input_scaler(&LinearScaler::new(0.0, 1.0));
/// scalers.add_target_scaler(&LinearScaler::new(-1.0, 1.0));
///
/// let mut patterns = PatternSet::new(
///     vec![vec![2.0], vec![4.0], vec![8.0]],
///     vec![vec![100.0], vec![200.0], vec![300.0]],
/// )
/// .unwrap();
///
/// scalers.reset_scalers(&patterns).unwrap();
/// scalers.scale(&mut patterns).unwrap();
/// assert!((patterns.input(2, 0) - 1.0).abs() < 1e-12);
/// assert!((patterns.target(0, 0) - (-1.0)).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScalerSet {
    input_scalers: Vec<Box<dyn Scaler>>,
    target_scalers: Vec<Box<dyn Scaler>>,
}

impl ScalerSet {
    /// Create a set without any scalers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a deep copy of `scaler` for the next input dimension.
    pub fn add_input_scaler(&mut self, scaler: &dyn Scaler) {
        self.input_scalers.push(scaler.clone_box());
    }

    /// Append a deep copy of `scaler` for the next target dimension.
    pub fn add_target_scaler(&mut self, scaler: &dyn Scaler) {
        self.target_scalers.push(scaler.clone_box());
    }

    /// Number of input dimensions this set scales.
    pub fn num_input_dimensions(&self) -> usize {
        self.input_scalers.len()
    }

    /// Number of target dimensions this set scales.
    pub fn num_target_dimensions(&self) -> usize {
        self.target_scalers.len()
    }

    /// The scaler of input dimension `dim`, if present.
    pub fn input_scaler(&self, dim: usize) -> Option<&dyn Scaler> {
        self.input_scalers.get(dim).map(|scaler| scaler.as_ref())
    }

    /// The scaler of target dimension `dim`, if present.
    pub fn target_scaler(&self, dim: usize) -> Option<&dyn Scaler> {
        self.target_scalers.get(dim).map(|scaler| scaler.as_ref())
    }

    fn check_input_dimensions(&self, patterns: &PatternSet) -> Result<(), ScaleError> {
        if patterns.input_count() != self.input_scalers.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: self.input_scalers.len(),
                got: patterns.input_count(),
            });
        }
        Ok(())
    }

    fn check_target_dimensions(&self, patterns: &PatternSet) -> Result<(), ScaleError> {
        if patterns.target_count() != self.target_scalers.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: self.target_scalers.len(),
                got: patterns.target_count(),
            });
        }
        Ok(())
    }

    fn check_has_patterns(patterns: &PatternSet) -> Result<(), ScaleError> {
        if patterns.pattern_count() == 0 {
            return Err(ScaleError::EmptyBatch(
                "pattern set contains no patterns".to_string(),
            ));
        }
        Ok(())
    }

    /// Update every input and target scaler from `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::DimensionMismatch`] if the pattern set's input
    /// or target dimensionality differs from the scaler counts, and
    /// [`ScaleError::EmptyBatch`] if it contains no patterns.
    pub fn update_scalers(&mut self, patterns: &PatternSet) -> Result<(), ScaleError> {
        self.update_input_scalers(patterns)?;
        self.update_target_scalers(patterns)
    }

    /// Update the input scalers from `patterns`.
    pub fn update_input_scalers(&mut self, patterns: &PatternSet) -> Result<(), ScaleError> {
        self.check_input_dimensions(patterns)?;
        Self::check_has_patterns(patterns)?;
        let stride = patterns.input_count();
        for (dim, scaler) in self.input_scalers.iter_mut().enumerate() {
            scaler.update_strided(patterns.inputs(), dim, stride)?;
        }
        Ok(())
    }

    /// Update the target scalers from `patterns`.
    pub fn update_target_scalers(&mut self, patterns: &PatternSet) -> Result<(), ScaleError> {
        self.check_target_dimensions(patterns)?;
        Self::check_has_patterns(patterns)?;
        let stride = patterns.target_count();
        for (dim, scaler) in self.target_scalers.iter_mut().enumerate() {
            scaler.update_strided(patterns.targets(), dim, stride)?;
        }
        Ok(())
    }

    /// Update the run of input scalers `[start, start + values.len())` with
    /// one value each.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::DimensionMismatch`] if the run extends past the
    /// last input scaler.
    pub fn update_input_values(&mut self, values: &[f64], start: usize) -> Result<(), ScaleError> {
        if start + values.len() > self.input_scalers.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: self.input_scalers.len(),
                got: start + values.len(),
            });
        }
        for (value, scaler) in values.iter().zip(self.input_scalers[start..].iter_mut()) {
            scaler.update_value(*value);
        }
        Ok(())
    }

    /// Reset every input and target scaler from `patterns`, discarding
    /// previously learned bounds.
    pub fn reset_scalers(&mut self, patterns: &PatternSet) -> Result<(), ScaleError> {
        self.reset_input_scalers(patterns)?;
        self.reset_target_scalers(patterns)
    }

    /// Reset the input scalers from `patterns`.
    pub fn reset_input_scalers(&mut self, patterns: &PatternSet) -> Result<(), ScaleError> {
        self.check_input_dimensions(patterns)?;
        Self::check_has_patterns(patterns)?;
        let stride = patterns.input_count();
        for (dim, scaler) in self.input_scalers.iter_mut().enumerate() {
            scaler.reset_strided(patterns.inputs(), dim, stride)?;
        }
        Ok(())
    }

    /// Reset the target scalers from `patterns`.
    pub fn reset_target_scalers(&mut self, patterns: &PatternSet) -> Result<(), ScaleError> {
        self.check_target_dimensions(patterns)?;
        Self::check_has_patterns(patterns)?;
        let stride = patterns.target_count();
        for (dim, scaler) in self.target_scalers.iter_mut().enumerate() {
            scaler.reset_strided(patterns.targets(), dim, stride)?;
        }
        Ok(())
    }

    /// Scale all input and target values of `patterns` in place.
    ///
    /// Call an update or reset operation first when the data may contain
    /// values outside the learned ranges.
    pub fn scale(&self, patterns: &mut PatternSet) -> Result<(), ScaleError> {
        self.scale_inputs(patterns)?;
        self.scale_targets(patterns)
    }

    /// Scale the input block of `patterns` in place.
    pub fn scale_inputs(&self, patterns: &mut PatternSet) -> Result<(), ScaleError> {
        self.check_input_dimensions(patterns)?;
        let stride = patterns.input_count();
        for (dim, scaler) in self.input_scalers.iter().enumerate() {
            scaler.scale_strided(patterns.inputs_mut(), dim, stride);
        }
        Ok(())
    }

    /// Scale the target block of `patterns` in place.
    pub fn scale_targets(&self, patterns: &mut PatternSet) -> Result<(), ScaleError> {
        self.check_target_dimensions(patterns)?;
        let stride = patterns.target_count();
        for (dim, scaler) in self.target_scalers.iter().enumerate() {
            scaler.scale_strided(patterns.targets_mut(), dim, stride);
        }
        Ok(())
    }

    /// Scale one pattern's input values in place, one scaler per value.
    pub fn scale_input(&self, values: &mut [f64]) -> Result<(), ScaleError> {
        if values.len() != self.input_scalers.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: self.input_scalers.len(),
                got: values.len(),
            });
        }
        for (value, scaler) in values.iter_mut().zip(&self.input_scalers) {
            *value = scaler.scale_value(*value);
        }
        Ok(())
    }

    /// Scale `values` in place with the run of input scalers starting at
    /// `start`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::DimensionMismatch`] if the run extends past the
    /// last input scaler.
    pub fn scale_input_range(&self, values: &mut [f64], start: usize) -> Result<(), ScaleError> {
        if start + values.len() > self.input_scalers.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: self.input_scalers.len(),
                got: start + values.len(),
            });
        }
        for (value, scaler) in values.iter_mut().zip(&self.input_scalers[start..]) {
            *value = scaler.scale_value(*value);
        }
        Ok(())
    }

    /// Scale one pattern's input values into a fresh buffer, leaving the
    /// source untouched.
    pub fn copy_and_scale_input(&self, input: &[f64]) -> Result<Vec<f64>, ScaleError> {
        if input.len() != self.input_scalers.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: self.input_scalers.len(),
                got: input.len(),
            });
        }
        Ok(input
            .iter()
            .zip(&self.input_scalers)
            .map(|(value, scaler)| scaler.scale_value(*value))
            .collect())
    }

    /// Map one pattern's scaled target values back to original units in
    /// place.
    pub fn original_target_values(&self, values: &mut [f64]) -> Result<(), ScaleError> {
        if values.len() != self.target_scalers.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: self.target_scalers.len(),
                got: values.len(),
            });
        }
        for (value, scaler) in values.iter_mut().zip(&self.target_scalers) {
            *value = scaler.original_value(*value);
        }
        Ok(())
    }

    /// Replace this set's scalers with the ones stored in a scaler file
    /// (tab-separated).
    ///
    /// The file must contain records `input1..inputN` and
    /// `target1..targetM` with `N, M >= 1`. On any failure the set is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::Io`] if the file cannot be opened and a format
    /// error ([`ScaleError::MalformedRecord`], [`ScaleError::ScalerNotFound`],
    /// [`ScaleError::UnknownScalerType`], [`ScaleError::FieldCountMismatch`])
    /// if its records do not describe a complete scaler set.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ScaleError> {
        self.load_from_file_with_separator(path, DEFAULT_SEPARATOR)
    }

    /// [`load_from_file`](Self::load_from_file) with a custom separator
    /// byte.
    pub fn load_from_file_with_separator<P: AsRef<Path>>(
        &mut self,
        path: P,
        separator: u8,
    ) -> Result<(), ScaleError> {
        let reader = ScalerReader::open_with_separator(path, separator)?;

        let num_inputs = reader.max_index("input");
        let num_targets = reader.max_index("target");
        if num_inputs == 0 || num_targets == 0 {
            return Err(ScaleError::MalformedRecord(
                "scaler file must contain at least one input and one target record".to_string(),
            ));
        }

        let mut input_scalers = Vec::with_capacity(num_inputs);
        for i in 1..=num_inputs {
            input_scalers.push(reader.scaler(&format!("input{}", i))?);
        }
        let mut target_scalers = Vec::with_capacity(num_targets);
        for i in 1..=num_targets {
            target_scalers.push(reader.scaler(&format!("target{}", i))?);
        }

        self.input_scalers = input_scalers;
        self.target_scalers = target_scalers;
        Ok(())
    }

    /// Write all scalers to a scaler file (tab-separated), replacing it
    /// atomically on success.
    ///
    /// Records are written as `input1..inputN` followed by
    /// `target1..targetM`, in list order.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ScaleError> {
        self.save_to_file_with_separator(path, DEFAULT_SEPARATOR)
    }

    /// [`save_to_file`](Self::save_to_file) with a custom separator byte.
    pub fn save_to_file_with_separator<P: AsRef<Path>>(
        &self,
        path: P,
        separator: u8,
    ) -> Result<(), ScaleError> {
        let mut writer = ScalerWriter::create_with_separator(path, separator);
        for (i, scaler) in self.input_scalers.iter().enumerate() {
            writer.save_scaler(&format!("input{}", i + 1), scaler.as_ref())?;
        }
        for (i, scaler) in self.target_scalers.iter().enumerate() {
            writer.save_scaler(&format!("target{}", i + 1), scaler.as_ref())?;
        }
        writer.finish()
    }

    /// Extract every scaler's kind and parameters as a serializable
    /// snapshot.
    pub fn extract_params(&self) -> ScalerSetParams {
        ScalerSetParams {
            inputs: self
                .input_scalers
                .iter()
                .map(|scaler| ScalerParams {
                    kind: scaler.kind(),
                    values: scaler.parameters(),
                })
                .collect(),
            targets: self
                .target_scalers
                .iter()
                .map(|scaler| ScalerParams {
                    kind: scaler.kind(),
                    values: scaler.parameters(),
                })
                .collect(),
        }
    }

    /// Reconstruct a set from a snapshot produced by
    /// [`extract_params`](Self::extract_params).
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::ParameterCountMismatch`] if a snapshot entry
    /// does not carry its kind's fixed parameter count.
    pub fn from_params(params: &ScalerSetParams) -> Result<Self, ScaleError> {
        let input_scalers = params
            .inputs
            .iter()
            .map(|entry| entry.kind.instantiate(&entry.values))
            .collect::<Result<Vec<_>, _>>()?;
        let target_scalers = params
            .targets
            .iter()
            .map(|entry| entry.kind.instantiate(&entry.values))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            input_scalers,
            target_scalers,
        })
    }
}
