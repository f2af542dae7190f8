//! File text extraction for the supported document formats.

use std::io::Read;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use aria_core::{Error, Result};

/// Supported file types for text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    PlainText,
    Markdown,
    Docx,
    /// Legacy binary Word format.
    Doc,
    Pdf,
    Unknown,
}

impl FileType {
    /// Detect file type from extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" => Self::PlainText,
            "md" | "mdx" => Self::Markdown,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            "pdf" => Self::Pdf,
            _ => Self::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }

    /// Whether files of this type belong in the knowledge base.
    pub fn is_document(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

static PARAGRAPH_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"</w:p>|<w:br\s*/>").unwrap());
static XML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Extract text content from a file. `Ok(None)` when the format is not
/// readable here.
pub fn extract_text(path: &Path) -> Result<Option<String>> {
    match FileType::from_path(path) {
        FileType::PlainText | FileType::Markdown => {
            let content = std::fs::read_to_string(path).map_err(Error::Io)?;
            Ok(Some(content))
        }
        FileType::Docx => extract_docx(path).map(Some),
        FileType::Pdf => extract_pdf(path).map(Some),
        FileType::Doc => {
            tracing::warn!("No text extractor for {}", path.display());
            Ok(None)
        }
        FileType::Unknown => Ok(None),
    }
}

/// Read `word/document.xml` from a .docx container and strip the markup.
fn extract_docx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path).map_err(Error::Io)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| Error::Storage(format!("invalid docx: {}", e)))?;
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|e| Error::Storage(format!("docx without document.xml: {}", e)))?;

    let mut xml = String::new();
    entry.read_to_string(&mut xml).map_err(Error::Io)?;
    Ok(docx_xml_to_text(&xml))
}

/// Pull the text layer out of a PDF. Scanned pages without one give nothing.
fn extract_pdf(path: &Path) -> Result<String> {
    // pdf-extract panics on some malformed files.
    let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text(path))
        .map_err(|_| Error::Storage(format!("pdf parser panicked on {}", path.display())))?;
    extracted.map_err(|e| Error::Storage(format!("invalid pdf: {}", e)))
}

fn docx_xml_to_text(xml: &str) -> String {
    let with_breaks = PARAGRAPH_END.replace_all(xml, "\n");
    let stripped = XML_TAG.replace_all(&with_breaks, "");
    decode_entities(&stripped)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}


/// One-page PDF with a single Helvetica text line.
#[cfg(test)]
pub(crate) fn write_pdf(path: &Path, line: &str) {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(line)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
