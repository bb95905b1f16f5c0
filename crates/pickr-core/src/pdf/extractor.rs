//! Per-page PDF text extraction using pdf-extract and lopdf.

use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// PDF text extractor.
///
/// pdf-extract keeps the visual line layout, so it is tried first. When it
/// fails or loses pages, each page is read with lopdf instead. Page texts
/// are extracted once per loaded document and reused.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    pages: OnceLock<Vec<String>>,
    decrypt_empty_password: bool,
    max_pages: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self::from_config(&PdfConfig::default())
    }

    /// Create an extractor honoring the PDF settings.
    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            pages: OnceLock::new(),
            decrypt_empty_password: config.decrypt_empty_password,
            max_pages: config.max_pages,
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))
    }

    fn lopdf_page_text(&self, doc: &Document, number: u32) -> String {
        doc.extract_text(&[number]).unwrap_or_else(|e| {
            warn!("Failed to extract text from page {}: {}", number, e);
            String::new()
        })
    }

    fn lopdf_page_texts(&self, doc: &Document, count: usize) -> Vec<String> {
        (1..=count as u32)
            .map(|number| self.lopdf_page_text(doc, number))
            .collect()
    }

    fn extract_all(&self, doc: &Document) -> Vec<String> {
        let count = self.page_count();

        // pdf-extract panics on some malformed font programs
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
        }));

        match extracted {
            Ok(Ok(mut pages)) if pages.len() >= count => {
                pages.truncate(count);
                pages
            }
            Ok(Ok(pages)) => {
                debug!(
                    "pdf-extract returned {} of {} pages, reading pages with lopdf",
                    pages.len(),
                    count
                );
                self.lopdf_page_texts(doc, count)
            }
            Ok(Err(e)) => {
                warn!("pdf-extract failed ({}), reading pages with lopdf", e);
                self.lopdf_page_texts(doc, count)
            }
            Err(_) => {
                warn!("pdf-extract panicked, reading pages with lopdf");
                self.lopdf_page_texts(doc, count)
            }
        }
    }

    fn cached_pages(&self) -> Result<&[String]> {
        let doc = self.document()?;
        Ok(self.pages.get_or_init(|| self.extract_all(doc)))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        self.document = None;
        self.pages = OnceLock::new();

        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if !self.decrypt_empty_password || doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf_extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> usize {
        let total = self
            .document
            .as_ref()
            .map(|doc| doc.get_pages().len())
            .unwrap_or(0);

        if self.max_pages == 0 {
            total
        } else {
            total.min(self.max_pages)
        }
    }

    fn page_texts(&self) -> Result<Vec<String>> {
        Ok(self.cached_pages()?.to_vec())
    }

    fn extract_page_text(&self, index: usize) -> Result<String> {
        self.cached_pages()?
            .get(index)
            .cloned()
            .ok_or(PdfError::InvalidPage(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::pdf_with_pages;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.page_texts().is_err());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_one_text_per_page() {
        let data = pdf_with_pages(&[&["PICKING LIST"], &["1 AB1 X 1 1 DEP"], &["Codigo Cliente"]]);

        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();

        assert_eq!(extractor.page_count(), 3);
        assert_eq!(extractor.page_texts().unwrap().len(), 3);
    }

    #[test]
    fn test_single_page_matches_full_extraction() {
        let data = pdf_with_pages(&[&["PICKING LIST N: 18342"], &["1 GR00123 AB1 Codo 2 3 DEP"]]);

        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();

        let pages = extractor.page_texts().unwrap();
        assert_eq!(extractor.extract_page_text(1).unwrap(), pages[1]);
        assert_eq!(extractor.extract_page_text(0).unwrap(), pages[0]);
        assert!(pages[1].contains("GR00123"));
    }

    #[test]
    fn test_reload_replaces_cached_pages() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&pdf_with_pages(&[&["first document"]])).unwrap();
        assert!(extractor.extract_page_text(0).unwrap().contains("first"));

        extractor
            .load(&pdf_with_pages(&[&["second document"], &["more"]]))
            .unwrap();
        assert_eq!(extractor.page_count(), 2);
        assert!(extractor.extract_page_text(0).unwrap().contains("second"));
    }

    #[test]
    fn test_max_pages_limits_output() {
        let data = pdf_with_pages(&[&["one"], &["two"], &["three"]]);

        let mut extractor = PdfExtractor::from_config(&PdfConfig {
            max_pages: 2,
            ..Default::default()
        });
        extractor.load(&data).unwrap();

        assert_eq!(extractor.page_count(), 2);
        assert_eq!(extractor.page_texts().unwrap().len(), 2);
        assert!(matches!(
            extractor.extract_page_text(2),
            Err(PdfError::InvalidPage(2))
        ));
    }
}
