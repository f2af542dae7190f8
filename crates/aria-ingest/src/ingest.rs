//! Corpus loading: documents directory → text → chunks.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::chunking::chunk_text;
use crate::file::{extract_text, FileType};
use aria_core::{Chunk, Error, Result};

/// Chunk every supported document in `dir`, in file-name order.
///
/// Files that yield no text are skipped. Extraction failures on a single
/// file are logged and skipped; failing to read the directory is an error.
pub fn load_document_chunks(dir: &Path, max_words: usize) -> Result<Vec<Chunk>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| Error::Storage(format!("cannot read {}: {}", dir.display(), e)))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && FileType::from_path(p).is_document())
        .collect();
    files.sort();

    if files.is_empty() {
        warn!("No documents found in {}", dir.display());
        return Ok(Vec::new());
    }

    let mut chunks = Vec::new();
    for path in &files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let text = match extract_text(path) {
            Ok(Some(t)) if !t.trim().is_empty() => t,
            Ok(_) => {
                warn!("No text extracted from {}", filename);
                continue;
            }
            Err(e) => {
                warn!("Failed to extract {}: {}", filename, e);
                continue;
            }
        };

        info!("Loaded {} ({} chars)", filename, text.len());
        chunks.extend(chunk_text(&text, &filename, max_words));
    }

    info!("Split {} documents into {} chunks", files.len(), chunks.len());
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_supported_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "Security audits. Threat monitoring.").unwrap();
        std::fs::write(dir.path().join("a.md"), "Cloud migration.").unwrap();
        std::fs::write(dir.path().join("logo.png"), [0u8, 1, 2]).unwrap();

        let chunks = load_document_chunks(dir.path(), 180).unwrap();
        let sources: Vec<&str> = chunks.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["a.md", "b.txt"]);
    }

    #[test]
    fn test_pdf_only_corpus_yields_chunks() {
        let dir = tempfile::tempdir().unwrap();
        crate::file::write_pdf(&dir.path().join("services.pdf"), "Cloud migration services.");

        let chunks = load_document_chunks(dir.path(), 180).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source, "services.pdf");
        assert!(chunks[0].text.contains("Cloud migration services."));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_document_chunks(dir.path(), 180).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_document_chunks(&dir.path().join("nope"), 180).is_err());
    }
}
