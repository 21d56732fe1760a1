//! Normalization: raw extractor output to the canonical field map.
//!
//! Flattens nested sections, reconciles drifted key names through the
//! alias tables, coerces dates to ISO, and derives the aggregate fields
//! the rendered chart needs (tooth summaries, identity propagation,
//! consent initials).

pub mod aliases;
pub mod dates;
mod mapper;

pub use mapper::Normalizer;
