//! Durable storage for learned scaler parameters.
//!
//! Two representations are provided:
//!
//! - the **scaler file** text format ([`ScalerReader`] / [`ScalerWriter`]):
//!   one record per line, fields separated by a single configurable byte
//!   (default tab), each record carrying an identifier, a scaler type tag
//!   and the type's fixed parameter list. This is the durable on-disk
//!   format; [`crate::ScalerSet::save_to_file`] and
//!   [`crate::ScalerSet::load_from_file`] build on it.
//! - a **binary snapshot** ([`ScalerSetParams`]): a serde-derived capture of
//!   a whole set's kinds and parameters, encoded with `bincode` for compact
//!   embedding in other artifacts.

pub mod params;
pub mod text;

pub use params::{ScalerParams, ScalerSetParams};
pub use text::{ScalerReader, ScalerWriter, DEFAULT_SEPARATOR};
