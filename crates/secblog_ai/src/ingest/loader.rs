use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use secblog_core::error::AppError;

use super::model::{Document, SourceMeta};

/// Load a PDF into one [`Document`] per page, in page order.
pub fn load_pdf(path: &Path) -> Result<Vec<Document>, AppError> {
    let bytes = fs::read(path).map_err(|e| {
        let code = if e.kind() == ErrorKind::NotFound {
            "INPUT_PDF_NOT_FOUND"
        } else {
            "INPUT_PDF_UNREADABLE"
        };
        AppError::new(code, "Failed to read PDF file")
            .with_details(format!("path={}; err={}", path.display(), e))
    })?;

    let doc = lopdf::Document::load_mem(&bytes).map_err(|e| {
        AppError::new("INPUT_PDF_PARSE_FAILED", "File is not a valid PDF")
            .with_details(format!("path={}; err={}", path.display(), e))
    })?;

    // get_pages is keyed by 1-based page number, so iteration is page order.
    let pages = doc.get_pages();
    let total_pages = pages.len() as u32;
    let source = path.display().to_string();

    let mut out = Vec::with_capacity(pages.len());
    for page in pages.keys().copied() {
        let text = doc.extract_text(&[page]).map_err(|e| {
            AppError::new("INPUT_PDF_PARSE_FAILED", "Failed to extract page text")
                .with_details(format!("path={}; page={}; err={}", path.display(), page, e))
        })?;
        out.push(Document::new(
            text,
            SourceMeta {
                source: source.clone(),
                page,
                total_pages,
            },
        ));
    }

    tracing::info!(path = %path.display(), pages = total_pages, "pdf loaded");
    Ok(out)
}
