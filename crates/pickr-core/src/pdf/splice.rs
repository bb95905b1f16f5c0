//! Copying the packing section out of the original document.

use lopdf::Document;
use tracing::debug;

use super::Result;
use crate::error::PdfError;

/// Build a PDF holding the original's pages from `start` (0-based) to the end.
///
/// This is the part of re-assembly that only needs the boundary index; the
/// caller appends the result after its own rendered pages.
pub fn packing_tail(data: &[u8], start: usize) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
    if doc.is_encrypted() && doc.decrypt("").is_err() {
        return Err(PdfError::Encrypted);
    }

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(PdfError::NoPages);
    }
    if start >= pages.len() {
        return Err(PdfError::InvalidPage(start));
    }

    // Page numbers are 1-based, so pages 1..=start precede the boundary.
    let leading: Vec<u32> = pages
        .keys()
        .copied()
        .filter(|number| (*number as usize) <= start)
        .collect();

    debug!(
        "Keeping {} of {} pages from index {}",
        pages.len() - leading.len(),
        pages.len(),
        start
    );

    doc.delete_pages(&leading);
    doc.prune_objects();
    doc.compress();

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| PdfError::Write(e.to_string()))?;
    Ok(output)
}
