//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure: header, body,
//! xref table, and trailer. Object emission order and dictionary key order
//! are fixed, so identical page content produces byte-identical files.

use super::content_stream::ContentStreamBuilder;
use super::font_metrics::ChartFont;
use super::object_serializer::ObjectSerializer;
use crate::error::Result;
use crate::object::{Object, ObjectRef};
use std::collections::HashMap;
use std::io::Write;

/// US Letter page width in points.
pub const LETTER_WIDTH: f32 = 612.0;
/// US Letter page height in points.
pub const LETTER_HEIGHT: f32 = 792.0;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Whether to compress content streams with FlateDecode
    pub compress: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            subject: None,
            creator: Some("odontoform".to_string()),
            compress: true,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Compress data for the FlateDecode filter.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

struct PageData {
    width: f32,
    height: f32,
    content_builder: ContentStreamBuilder,
}

/// PDF document writer.
///
/// Collects finished content streams, one per page, then emits the
/// complete document with `finish`.
pub struct PdfWriter {
    config: PdfWriterConfig,
    pages: Vec<PageData>,
    next_obj_id: u32,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            next_obj_id: 1,
        }
    }

    fn alloc_obj_id(&mut self) -> u32 {
        let id = self.next_obj_id;
        self.next_obj_id += 1;
        id
    }

    /// Add a page with the given dimensions and finished content.
    pub fn push_page(&mut self, width: f32, height: f32, content: ContentStreamBuilder) {
        self.pages.push(PageData {
            width,
            height,
            content_builder: content,
        });
    }

    /// Add a US Letter sized page (8.5" x 11").
    pub fn push_letter_page(&mut self, content: ContentStreamBuilder) {
        self.push_page(LETTER_WIDTH, LETTER_HEIGHT, content);
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Build the complete PDF document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::new();
        let mut output = Vec::new();
        let mut xref_offsets: Vec<(u32, usize)> = Vec::new();

        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker so transfer agents treat the file as binary
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let catalog_id = self.alloc_obj_id();
        let pages_id = self.alloc_obj_id();

        // Font objects in fixed order for deterministic output
        let chart_fonts = [ChartFont::Helvetica, ChartFont::HelveticaBold];
        let mut font_resources: Vec<(&str, ObjectRef)> = Vec::new();
        let mut font_objects: Vec<(u32, Object)> = Vec::new();
        for font in chart_fonts {
            let font_id = self.alloc_obj_id();
            let font_obj = ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Font")),
                ("Subtype", ObjectSerializer::name("Type1")),
                ("BaseFont", ObjectSerializer::name(font.base_name())),
                ("Encoding", ObjectSerializer::name("WinAnsiEncoding")),
            ]);
            font_resources.push((font.resource_name(), ObjectRef::new(font_id, 0)));
            font_objects.push((font_id, font_obj));
        }

        let font_dict: HashMap<String, Object> = font_resources
            .iter()
            .map(|(name, obj_ref)| (name.to_string(), Object::Reference(*obj_ref)))
            .collect();

        // Pre-allocate page and content stream object IDs
        let mut page_ids: Vec<(u32, u32)> = Vec::with_capacity(self.pages.len());
        for _ in 0..self.pages.len() {
            let page_id = self.alloc_obj_id();
            let content_id = self.alloc_obj_id();
            page_ids.push((page_id, content_id));
        }

        let mut page_refs: Vec<Object> = Vec::new();
        let mut page_objects: Vec<(u32, Object)> = Vec::new();

        for (i, page_data) in self.pages.iter().enumerate() {
            let (page_id, content_id) = page_ids[i];

            let raw_content = page_data.content_builder.build()?;

            let (content_bytes, is_compressed) = if self.config.compress {
                match compress_data(&raw_content) {
                    Ok(compressed) => (compressed, true),
                    Err(e) => {
                        // Uncompressed output is always valid
                        log::warn!("content stream compression failed, storing raw: {}", e);
                        (raw_content, false)
                    },
                }
            } else {
                (raw_content, false)
            };

            let mut content_dict = HashMap::new();
            content_dict.insert("Length".to_string(), Object::Integer(content_bytes.len() as i64));
            if is_compressed {
                content_dict.insert("Filter".to_string(), Object::Name("FlateDecode".to_string()));
            }

            let page_obj = ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Page")),
                ("Parent", ObjectSerializer::reference(pages_id, 0)),
                (
                    "MediaBox",
                    ObjectSerializer::rect(0.0, 0.0, page_data.width as f64, page_data.height as f64),
                ),
                ("Contents", ObjectSerializer::reference(content_id, 0)),
                (
                    "Resources",
                    ObjectSerializer::dict(vec![("Font", Object::Dictionary(font_dict.clone()))]),
                ),
            ]);

            page_refs.push(Object::Reference(ObjectRef::new(page_id, 0)));
            page_objects.push((page_id, page_obj));
            page_objects.push((
                content_id,
                Object::Stream {
                    dict: content_dict,
                    data: bytes::Bytes::from(content_bytes),
                },
            ));
        }

        let pages_obj = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Pages")),
            ("Kids", Object::Array(page_refs)),
            ("Count", ObjectSerializer::integer(self.pages.len() as i64)),
        ]);

        let catalog_obj = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Catalog")),
            ("Pages", ObjectSerializer::reference(pages_id, 0)),
        ]);

        let info_id = self.alloc_obj_id();
        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", ObjectSerializer::string(title)));
        }
        if let Some(subject) = &self.config.subject {
            info_entries.push(("Subject", ObjectSerializer::string(subject)));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", ObjectSerializer::string(creator)));
        }
        let info_obj = ObjectSerializer::dict(info_entries);

        xref_offsets.push((catalog_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(catalog_id, 0, &catalog_obj));

        xref_offsets.push((pages_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(pages_id, 0, &pages_obj));

        for (font_id, font_obj) in &font_objects {
            xref_offsets.push((*font_id, output.len()));
            output.extend_from_slice(&serializer.serialize_indirect(*font_id, 0, font_obj));
        }

        for (obj_id, obj) in &page_objects {
            xref_offsets.push((*obj_id, output.len()));
            output.extend_from_slice(&serializer.serialize_indirect(*obj_id, 0, obj));
        }

        xref_offsets.push((info_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(info_id, 0, &info_obj));

        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", self.next_obj_id)?;
        writeln!(output, "0000000000 65535 f ")?;

        xref_offsets.sort_by_key(|(id, _)| *id);
        for (_, offset) in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(self.next_obj_id as i64)),
            ("Root", ObjectSerializer::reference(catalog_id, 0)),
            ("Info", ObjectSerializer::reference(info_id, 0)),
        ]);

        writeln!(output, "trailer")?;
        output.extend_from_slice(&serializer.serialize(&trailer));
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        log::debug!("assembled PDF: {} pages, {} bytes", self.pages.len(), output.len());
        Ok(output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uncompressed() -> PdfWriterConfig {
        PdfWriterConfig::default().with_compress(false)
    }

    #[test]
    fn test_create_empty_pdf() {
        let mut writer = PdfWriter::with_config(uncompressed());
        writer.push_letter_page(ContentStreamBuilder::new());
        let bytes = writer.finish().unwrap();

        let content = String::from_utf8_lossy(&bytes);
        assert!(content.starts_with("%PDF-1.7"));
        assert!(content.contains("/Type /Catalog"));
        assert!(content.contains("/Type /Pages"));
        assert!(content.contains("/Type /Page"));
        assert!(content.contains("%%EOF"));
    }

    #[test]
    fn test_pdf_with_text() {
        let mut content = ContentStreamBuilder::new();
        content
            .set_font("F1", 12.0)
            .text("Patient Information Record", 72.0, 720.0)
            .end_text();

        let mut writer = PdfWriter::with_config(uncompressed());
        writer.push_letter_page(content);
        let bytes = writer.finish().unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("/Type /Font"));
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.contains("(Patient Information Record) Tj"));
    }

    #[test]
    fn test_pdf_with_metadata() {
        let config = uncompressed().with_title("Dental Chart").with_subject("Intake");
        let mut writer = PdfWriter::with_config(config);
        writer.push_letter_page(ContentStreamBuilder::new());

        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);

        assert!(content.contains("/Title (Dental Chart)"));
        assert!(content.contains("/Subject (Intake)"));
    }

    #[test]
    fn test_multiple_pages_counted() {
        let mut writer = PdfWriter::with_config(uncompressed());
        for _ in 0..5 {
            writer.push_letter_page(ContentStreamBuilder::new());
        }
        assert_eq!(writer.page_count(), 5);

        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.contains("/Count 5"));
        assert!(content.contains("[0 0 612 792]"));
    }

    #[test]
    fn test_deterministic_output() {
        let build = || {
            let mut content = ContentStreamBuilder::new();
            content.set_font("F1", 10.0).text("same input", 10.0, 10.0).end_text();
            let mut writer = PdfWriter::new();
            writer.push_letter_page(content);
            writer.finish().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_compressed_stream_marked() {
        let mut content = ContentStreamBuilder::new();
        content.set_font("F1", 10.0).text("compress me", 10.0, 10.0).end_text();

        let mut writer = PdfWriter::new();
        writer.push_letter_page(content);
        let bytes = writer.finish().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Filter /FlateDecode"));
    }
}
