//! The scaler file text format.
//!
//! One record per line, fields separated by a single separator byte
//! (default: tab), record terminated by newline:
//!
//! ```text
//! identifier<sep>typeName<sep>param1<sep>...<sep>paramN
//! ```
//!
//! The identifier may not contain the separator or a line break. The type
//! name is one of the tags in [`ScalerKind`], matched exactly and
//! case-sensitively. The parameter count is fixed per type: 4 for
//! `Normalize`, 6 for `NormalizeWithFixpoint`; a record with extra trailing
//! fields before its line ends is a format error. Numeric fields parse
//! permissively (non-numeric text reads as `0.0`) and no whitespace
//! trimming is applied. Quoting, embedded separators and embedded newlines
//! are not part of the format.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::error::ScaleError;
use crate::scaling::{Scaler, ScalerKind};

/// Separator byte used when none is given explicitly.
pub const DEFAULT_SEPARATOR: u8 = b'\t';

/// `atoi`-style parse of an identifier suffix: the leading run of digits,
/// or 0 if there is none.
fn leading_number(suffix: &str) -> usize {
    let digits: &str = {
        let end = suffix
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(suffix.len());
        &suffix[..end]
    };
    digits.parse().unwrap_or(0)
}

/// Permissive numeric field parse: non-numeric text reads as `0.0`.
fn parse_field(field: &str) -> f64 {
    field.parse().unwrap_or(0.0)
}

/// Reads scaler records from a scaler file.
///
/// The whole file is read when the reader is opened; lookups afterwards are
/// in-memory scans, and no file handle outlives [`open`](Self::open).
pub struct ScalerReader {
    records: Vec<StringRecord>,
}

impl ScalerReader {
    /// Open a tab-separated scaler file and read all its records.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::Io`] if the file cannot be opened or read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScaleError> {
        Self::open_with_separator(path, DEFAULT_SEPARATOR)
    }

    /// [`open`](Self::open) with a custom separator byte.
    pub fn open_with_separator<P: AsRef<Path>>(
        path: P,
        separator: u8,
    ) -> Result<Self, ScaleError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_path(path.as_ref())?;

        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record?);
        }
        Ok(Self { records })
    }

    /// Largest numeric identifier suffix over all records whose identifier
    /// starts with `prefix`.
    ///
    /// An identifier must be strictly longer than the prefix to count;
    /// suffixes without a leading digit contribute 0. Returns 0 when no
    /// record matches.
    pub fn max_index(&self, prefix: &str) -> usize {
        let mut result = 0;
        for record in &self.records {
            let Some(id) = record.get(0) else {
                continue;
            };
            if id.len() > prefix.len() && id.starts_with(prefix) {
                let index = leading_number(&id[prefix.len()..]);
                if index > result {
                    result = index;
                }
            }
        }
        result
    }

    /// Build the scaler stored under the identifier `id`.
    ///
    /// Scans for the first record whose identifier equals `id` exactly,
    /// dispatches on its type tag and restores the type's fixed parameter
    /// list.
    ///
    /// # Errors
    ///
    /// - [`ScaleError::ScalerNotFound`] if no record carries `id`;
    /// - [`ScaleError::MalformedRecord`] if the record has no type field;
    /// - [`ScaleError::UnknownScalerType`] if the type tag is not one of
    ///   [`ScalerKind`]'s;
    /// - [`ScaleError::FieldCountMismatch`] if the record does not carry
    ///   exactly the type's parameter count before its line ends.
    pub fn scaler(&self, id: &str) -> Result<Box<dyn Scaler>, ScaleError> {
        for record in &self.records {
            if record.get(0) != Some(id) {
                continue;
            }

            let type_name = record.get(1).ok_or_else(|| {
                ScaleError::MalformedRecord(format!("record {:?} has no type field", id))
            })?;
            let kind = ScalerKind::from_type_name(type_name)
                .ok_or_else(|| ScaleError::UnknownScalerType(type_name.to_string()))?;

            let expected = kind.parameter_count();
            if record.len() != 2 + expected {
                return Err(ScaleError::FieldCountMismatch {
                    scaler_type: kind.type_name().to_string(),
                    expected,
                    got: record.len() - 2,
                });
            }

            let params: Vec<f64> = record.iter().skip(2).map(parse_field).collect();
            return kind.instantiate(&params);
        }
        Err(ScaleError::ScalerNotFound(id.to_string()))
    }
}

/// Writes scaler records to a scaler file.
///
/// Records are buffered in memory; [`finish`](Self::finish) writes them to a
/// temporary sibling and renames it over the target path, so a failed save
/// never leaves a partial file behind.
pub struct ScalerWriter {
    writer: csv::Writer<Vec<u8>>,
    path: PathBuf,
    separator: u8,
}

impl ScalerWriter {
    /// Create a writer targeting `path` with the tab separator.
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        Self::create_with_separator(path, DEFAULT_SEPARATOR)
    }

    /// [`create`](Self::create) with a custom separator byte.
    pub fn create_with_separator<P: AsRef<Path>>(path: P, separator: u8) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(separator)
            .flexible(true)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        Self {
            writer,
            path: path.as_ref().to_path_buf(),
            separator,
        }
    }

    /// Append one record: `id`, the scaler's type tag, then its parameters.
    ///
    /// Parameters are written with the shortest decimal representation that
    /// restores the exact `f64`, so a save/load cycle round-trips bit for
    /// bit.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::InvalidIdentifier`] if `id` contains the
    /// separator or a line break.
    pub fn save_scaler(&mut self, id: &str, scaler: &dyn Scaler) -> Result<(), ScaleError> {
        if id.bytes().any(|b| b == self.separator) || id.contains('\n') || id.contains('\r') {
            return Err(ScaleError::InvalidIdentifier(id.to_string()));
        }

        let params = scaler.parameters();
        let mut fields = Vec::with_capacity(2 + params.len());
        fields.push(id.to_string());
        fields.push(scaler.type_name().to_string());
        for value in params {
            fields.push(value.to_string());
        }
        self.writer.write_record(&fields)?;
        Ok(())
    }

    /// Flush all buffered records and atomically replace the target file.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::Io`] if the temporary file cannot be written
    /// or moved into place; the target file is left as it was.
    pub fn finish(self) -> Result<(), ScaleError> {
        let buffer = self
            .writer
            .into_inner()
            .map_err(|err| ScaleError::Io(err.to_string()))?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, &buffer)?;
        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            fs::remove_file(&tmp_path).ok();
            return Err(err.into());
        }
        Ok(())
    }
}
