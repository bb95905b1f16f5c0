//! Rule-based extractors for picking list documents.

pub mod boundary;
pub mod header;
pub mod numbers;
pub mod patterns;
pub mod split;

pub use boundary::PackingDetector;
pub use header::{extract_header, HeaderFieldExtractor};
pub use numbers::{format_quantity, format_stock, parse_locale_decimal};
pub use split::{CodeSplit, CodeSplitter, SplitPolicy, SplitRule};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
