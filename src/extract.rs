//! Address extraction from recognized label text.
//!
//! Recognition output is filtered down to lines that look like street
//! addresses. The filter never fails; engine problems surface as sentinel
//! strings so callers can show them like any other result.

use tracing::{debug, error, info};

use crate::model::Address;
use crate::traits::TextRecognizer;

/// Returned when no recognition engine could be initialized.
pub const ENGINE_UNAVAILABLE: &str = "OCR engine not initialized";

/// Returned when the engine could not read an image.
pub const UNREADABLE_IMAGE: &str = "Error processing image";

pub const DEFAULT_STREET_SUFFIXES: &[&str] = &[
    "ave", "avenue", "st", "street", "rd", "road", "dr", "drive", "ln", "lane",
];

/// Label boilerplate that precedes the address on a known label template.
pub const DEFAULT_PREFIX_MARKERS: &[&str] = &["Today"];

/// Returns true for the sentinel strings produced by [`Extraction::into_candidates`].
pub fn is_sentinel(candidate: &str) -> bool {
    candidate == ENGINE_UNAVAILABLE || candidate == UNREADABLE_IMAGE
}

#[derive(Debug, Clone)]
pub struct ExtractionRules {
    /// Lowercase street-suffix tokens; a line must contain one.
    pub street_suffixes: Vec<String>,
    /// Case-sensitive markers; text up to the last occurrence is discarded.
    pub prefix_markers: Vec<String>,
    /// Require suffixes to stand alone as words. Off by default so that
    /// OCR output like "OracleRd" still matches.
    pub whole_words: bool,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            street_suffixes: DEFAULT_STREET_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            prefix_markers: DEFAULT_PREFIX_MARKERS.iter().map(|s| s.to_string()).collect(),
            whole_words: false,
        }
    }
}

impl ExtractionRules {
    pub fn with_prefix_markers(mut self, markers: Vec<String>) -> Self {
        self.prefix_markers = markers;
        self
    }

    pub fn with_whole_words(mut self, whole_words: bool) -> Self {
        self.whole_words = whole_words;
        self
    }

    /// Does the line contain a street suffix, ignoring case?
    pub fn has_street_suffix(&self, line: &str) -> bool {
        let line = line.to_lowercase();
        if !self.whole_words {
            return self.street_suffixes.iter().any(|suffix| line.contains(suffix.as_str()));
        }

        line.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .any(|token| self.street_suffixes.iter().any(|suffix| suffix == token))
    }

    /// Drops everything up to and including the last prefix marker, then trims.
    pub fn strip_prefix<'a>(&self, line: &'a str) -> &'a str {
        let mut rest = line;
        for marker in self.prefix_markers.iter().filter(|m| !m.is_empty()) {
            if let Some(pos) = rest.rfind(marker.as_str()) {
                rest = &rest[pos + marker.len()..];
            }
        }
        rest.trim()
    }

    /// Lazily filters recognized lines down to candidate addresses.
    pub fn candidates<'a, I>(&'a self, lines: I) -> impl Iterator<Item = Address> + 'a
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: 'a,
    {
        lines.into_iter().filter_map(move |line| {
            let line = line.as_ref();
            if !self.has_street_suffix(line) {
                return None;
            }
            let cleaned = self.strip_prefix(line);
            (!cleaned.is_empty()).then(|| cleaned.to_string())
        })
    }
}

/// Result of running extraction on one image.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Candidate addresses in recognition order; may be empty.
    Addresses(Vec<Address>),
    EngineUnavailable,
    Unreadable,
}

impl Extraction {
    /// Flattens into the string form: candidates, or one sentinel.
    pub fn into_candidates(self) -> Vec<String> {
        match self {
            Extraction::Addresses(addresses) => addresses,
            Extraction::EngineUnavailable => vec![ENGINE_UNAVAILABLE.to_string()],
            Extraction::Unreadable => vec![UNREADABLE_IMAGE.to_string()],
        }
    }

    pub fn addresses(&self) -> &[Address] {
        match self {
            Extraction::Addresses(addresses) => addresses,
            _ => &[],
        }
    }
}

/// Runs recognition and the address filter over label images.
///
/// A missing recognizer means the engine failed to initialize; extraction
/// then degrades to the [`ENGINE_UNAVAILABLE`] sentinel.
#[derive(Debug, Clone)]
pub struct AddressExtractor<R> {
    recognizer: Option<R>,
    rules: ExtractionRules,
}

impl<R: TextRecognizer> AddressExtractor<R> {
    pub fn new(recognizer: Option<R>, rules: ExtractionRules) -> Self {
        Self { recognizer, rules }
    }

    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn extract(&self, image: &[u8]) -> Extraction {
        let Some(recognizer) = &self.recognizer else {
            return Extraction::EngineUnavailable;
        };

        match recognizer.recognize(image) {
            Ok(lines) => {
                debug!("Raw OCR results: {:?}", lines);
                let addresses: Vec<Address> = self.rules.candidates(&lines).collect();
                info!("Extracted {} candidate addresses from {} lines", addresses.len(), lines.len());
                Extraction::Addresses(addresses)
            }
            Err(err) => {
                error!("OCR processing error: {}", err);
                Extraction::Unreadable
            }
        }
    }
}
