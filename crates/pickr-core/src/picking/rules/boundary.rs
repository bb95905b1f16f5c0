//! Detection of the page where the packing section starts.

use tracing::debug;

/// Finds the first page whose text carries every packing marker.
#[derive(Debug, Clone)]
pub struct PackingDetector {
    markers: Vec<String>,
}

impl PackingDetector {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    /// True when `text` contains all markers. An empty marker list never matches.
    pub fn is_packing_page(&self, text: &str) -> bool {
        !self.markers.is_empty() && self.markers.iter().all(|m| text.contains(m.as_str()))
    }

    /// 0-based index of the first packing page, or `None` when the whole
    /// document is order content. Pages after the first hit are not read.
    pub fn find_packing_start<S: AsRef<str>>(&self, pages: &[S]) -> Option<usize> {
        let found = pages.iter().position(|page| self.is_packing_page(page.as_ref()));
        debug!("Packing section start: {:?} of {} pages", found, pages.len());
        found
    }
}

impl Default for PackingDetector {
    fn default() -> Self {
        Self::new(vec![
            "Codigo Cliente".to_string(),
            "LN".to_string(),
            "Liberado".to_string(),
        ])
    }
}
