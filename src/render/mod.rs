//! Rendering of the five-page chart.
//!
//! `page` provides the millimetre canvas, `layout` the shared form
//! widgets, `odontogram` and `table` the two structured sections, and
//! `document` assembles the pages into the finished file.

pub mod document;
pub mod layout;
pub mod odontogram;
pub mod page;
pub mod table;

pub use document::{DocumentAssembler, RenderedChart};
pub use page::{PageCanvas, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
