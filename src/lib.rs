#![allow(clippy::too_many_arguments)]

//! # odontoform
//!
//! Renders extracted dental intake form data into the standard
//! five-page Philippine Dental Association chart as a PDF.
//!
//! The pipeline has three stages:
//!
//! 1. [`schema::RawExtraction`] parses the loosely structured JSON an
//!    upstream extractor produces for each uploaded form page.
//! 2. [`normalize::Normalizer`] flattens the pages into a
//!    [`fields::CanonicalFieldMap`], reconciling drifted field names,
//!    coercing dates to ISO, and deriving chart summaries.
//! 3. [`render::DocumentAssembler`] lays out the five pages and writes
//!    the document through the deterministic [`writer::PdfWriter`].
//!
//! Reviewer corrections overlay the canonical map as
//! [`fields::UserEdits`] and take priority at render time.
//!
//! ## Quick Start
//!
//! ```no_run
//! use odontoform::normalize::Normalizer;
//! use odontoform::render::DocumentAssembler;
//! use odontoform::schema::RawExtraction;
//!
//! # fn main() -> odontoform::Result<()> {
//! let raw = RawExtraction::from_json(
//!     r#"{"patient":{"lastName":"Dela Cruz","firstName":"Juan"}}"#,
//! ).map_err(|e| odontoform::Error::InvalidInput(e.to_string()))?;
//!
//! let canonical = Normalizer::new().normalize(&raw);
//! let edits = odontoform::fields::UserEdits::new();
//! let chart = DocumentAssembler::new().assemble(&canonical, &edits)?;
//! chart.save_to_dir(std::path::Path::new("."))?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fields;
pub mod normalize;
pub mod object;
pub mod render;
pub mod schema;
pub mod teeth;
pub mod writer;

pub use error::{Error, Result};
pub use fields::{CanonicalFieldMap, FieldResolver, FieldValue, UserEdits};
pub use normalize::Normalizer;
pub use render::{DocumentAssembler, RenderedChart};
pub use schema::RawExtraction;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
