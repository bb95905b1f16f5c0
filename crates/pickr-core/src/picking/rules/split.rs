//! Splitting the compound remainder into legacy code and description.
//!
//! Extracted text glues the legacy code to the article name, sometimes with
//! no space at all (`FVMB1CR181Grifería`). The boundary is resolved by an
//! ordered chain of rules; the first rule whose precondition holds decides.
//! When none applies the whole remainder becomes the legacy code.
//!
//! The chain and the keyword list are plain data so document families with a
//! different layout can be handled from configuration.

use serde::{Deserialize, Serialize};

use super::patterns::{NATURAL_WORD, SEPARATOR};

/// One boundary rule of the split chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitRule {
    /// Split before a keyword that closes the leading code token.
    Keyword,
    /// Split where an upper-case letter is followed by a lower-case one.
    NaturalWord,
    /// Split at the first whitespace, `*` or `"`.
    Separator,
    /// Split at the first whitespace run.
    Whitespace,
}

/// Result of splitting a remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSplit {
    pub legacy_code: String,
    pub description: String,
    /// Rule that produced the split, `None` for the no-split fallback.
    pub rule: Option<SplitRule>,
}

impl CodeSplit {
    fn new(legacy_code: &str, description: &str, rule: Option<SplitRule>) -> Self {
        Self {
            legacy_code: legacy_code.to_string(),
            description: description.to_string(),
            rule,
        }
    }

    /// The whole remainder as legacy code, no description.
    pub fn unsplit(remainder: &str) -> Self {
        Self::new(remainder.trim(), "", None)
    }
}

/// Strategy for resolving the legacy code / description boundary.
pub trait CodeSplitter: Send + Sync {
    /// Split a remainder string.
    fn split(&self, remainder: &str) -> CodeSplit;

    /// Split a remainder that was captured as a code-like token followed by
    /// the rest of the text. The boundary may fall inside either part.
    fn split_pair(&self, code_token: &str, text_token: &str) -> CodeSplit {
        self.split(&format!("{}{}", code_token, text_token))
    }
}

/// Ordered split chain plus the curated keyword list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitPolicy {
    /// Rules tried in order. The no-split fallback always runs last.
    pub rules: Vec<SplitRule>,

    /// Upper-case words that start a description. Empty by default.
    pub keywords: Vec<String>,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                SplitRule::NaturalWord,
                SplitRule::Separator,
                SplitRule::Whitespace,
            ],
            keywords: Vec::new(),
        }
    }
}

impl SplitPolicy {
    /// Natural-word boundary, then separators. No whitespace rule.
    pub fn natural_first() -> Self {
        Self {
            rules: vec![SplitRule::NaturalWord, SplitRule::Separator],
            keywords: Vec::new(),
        }
    }

    /// Set the rule order.
    pub fn with_rules(mut self, rules: Vec<SplitRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Set the keyword list.
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    fn apply(&self, rule: SplitRule, remainder: &str) -> Option<CodeSplit> {
        match rule {
            SplitRule::Keyword => split_at_keyword(remainder, &self.keywords),
            SplitRule::NaturalWord => split_at_natural_word(remainder),
            SplitRule::Separator => split_at_separator(remainder),
            SplitRule::Whitespace => split_at_whitespace(remainder),
        }
    }
}

impl CodeSplitter for SplitPolicy {
    fn split(&self, remainder: &str) -> CodeSplit {
        let remainder = remainder.trim();
        if remainder.is_empty() {
            return CodeSplit::unsplit("");
        }

        self.rules
            .iter()
            .find_map(|rule| self.apply(*rule, remainder))
            .unwrap_or_else(|| CodeSplit::unsplit(remainder))
    }
}

/// Split before a keyword glued to the end of the leading code token.
///
/// Only hits inside the first whitespace-delimited token count, and the
/// keyword must close that token (`QR7NIPLE 1/2`) or be followed by a
/// character that cannot belong to a code. Hits later in the remainder are
/// description text and never move the boundary.
pub fn split_at_keyword(remainder: &str, keywords: &[String]) -> Option<CodeSplit> {
    let token_end = remainder
        .find(char::is_whitespace)
        .unwrap_or(remainder.len());
    let token = &remainder[..token_end];

    let pos = keywords
        .iter()
        .filter(|k| !k.is_empty())
        .filter_map(|k| {
            token
                .match_indices(k.as_str())
                .map(|(i, _)| i)
                .find(|&i| i > 0 && closes_code(&token[i + k.len()..]))
        })
        .min()?;

    Some(CodeSplit::new(
        remainder[..pos].trim(),
        remainder[pos..].trim(),
        Some(SplitRule::Keyword),
    ))
}

fn closes_code(rest: &str) -> bool {
    rest.chars()
        .next()
        .is_none_or(|c| !(c.is_uppercase() || c.is_ascii_digit()))
}

/// Split where the first capitalised word begins, if it is not at the start.
///
/// A `**` marker left on the code side is kept as a `" **"` suffix.
pub fn split_at_natural_word(remainder: &str) -> Option<CodeSplit> {
    let pos = NATURAL_WORD.find(remainder)?.start();
    if pos == 0 {
        return None;
    }

    let code = remainder[..pos].trim();
    let code = match code.strip_suffix("**") {
        Some(base) => format!("{} **", base.trim_end()).trim_start().to_string(),
        None => code.to_string(),
    };

    Some(CodeSplit {
        legacy_code: code,
        description: remainder[pos..].trim().to_string(),
        rule: Some(SplitRule::NaturalWord),
    })
}

/// Split at the first whitespace, `*` or `"`; quotes are dropped from the
/// description.
pub fn split_at_separator(remainder: &str) -> Option<CodeSplit> {
    let pos = SEPARATOR.find(remainder)?.start();
    let description = remainder[pos..].replace('"', "");

    Some(CodeSplit::new(
        remainder[..pos].trim(),
        description.trim(),
        Some(SplitRule::Separator),
    ))
}

/// Split at the first whitespace run.
pub fn split_at_whitespace(remainder: &str) -> Option<CodeSplit> {
    let (code, description) = remainder.split_once(char::is_whitespace)?;

    Some(CodeSplit::new(
        code.trim(),
        description.trim(),
        Some(SplitRule::Whitespace),
    ))
}
