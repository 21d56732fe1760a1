//! PDF writing module.
//!
//! ## Architecture
//!
//! ```text
//! page renderers
//!     ↓
//! [ContentStreamBuilder] (operators → content stream bytes)
//!     ↓
//! [PdfWriter] (assembles complete PDF structure)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```

pub mod content_stream;
pub mod font_metrics;
pub mod object_serializer;
pub mod pdf_writer;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use font_metrics::ChartFont;
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{PdfWriter, PdfWriterConfig, LETTER_HEIGHT, LETTER_WIDTH};
