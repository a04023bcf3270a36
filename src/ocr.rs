//! Tesseract command-line adapter for text recognition.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{info, warn};

use crate::error::OcrError;
use crate::traits::TextRecognizer;

#[derive(Debug, Clone)]
pub struct TesseractConfig {
    /// Executable name or path.
    pub binary: String,
    /// Tesseract language pack, e.g. "eng".
    pub language: String,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

/// Runs `tesseract stdin stdout` per image.
///
/// Output is grouped into paragraphs: tesseract separates text blocks with
/// blank lines, and the lines of one block are joined with a space.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    config: TesseractConfig,
}

impl TesseractRecognizer {
    /// Runs `--version` once; an error here means the engine is unavailable.
    pub fn new(config: TesseractConfig) -> Result<Self, OcrError> {
        let output = Command::new(&config.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|err| OcrError::EngineUnavailable(format!("{}: {}", config.binary, err)))?;

        if !output.status.success() {
            return Err(OcrError::EngineUnavailable(format!(
                "{} --version exited with {}",
                config.binary, output.status
            )));
        }

        let banner = String::from_utf8_lossy(&output.stdout);
        info!("OCR engine ready: {}", banner.lines().next().unwrap_or("tesseract"));

        Ok(Self { config })
    }

    /// Like [`TesseractRecognizer::new`], logging and discarding the error.
    pub fn try_init(config: TesseractConfig) -> Option<Self> {
        match Self::new(config) {
            Ok(recognizer) => Some(recognizer),
            Err(err) => {
                warn!("Failed to initialize OCR engine: {}", err);
                None
            }
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, OcrError> {
        let mut child = Command::new(&self.config.binary)
            .args(["stdin", "stdout", "-l", self.config.language.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // The child may exit without reading stdin; it is reaped either way,
        // and its own error outranks the broken pipe.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(image),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        Ok(paragraphs(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Groups raw OCR text into paragraphs separated by blank lines.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                out.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }

    out
}

/// Recognized region texts as lines, dropping empty and unrecognized regions.
pub fn region_lines<I, S>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .flatten()
        .map(|text| text.as_ref().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_lines_skip_unrecognized() {
        let texts = vec![Some(" 10 A St "), None, Some(""), Some("Fragile")];
        assert_eq!(region_lines(texts), vec!["10 A St", "Fragile"]);
    }

    #[test]
    fn test_paragraphs_join_block_lines() {
        let text = "Deliver Today\n10 A St\n\n\nFRAGILE\n\x0c";
        assert_eq!(paragraphs(text), vec!["Deliver Today 10 A St", "FRAGILE"]);
    }

    #[test]
    fn test_paragraphs_empty_text() {
        assert!(paragraphs("  \n\n").is_empty());
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let config = TesseractConfig {
            binary: "definitely-not-a-tesseract-binary".into(),
            ..TesseractConfig::default()
        };
        let err = TesseractRecognizer::new(config).unwrap_err();
        assert!(matches!(err, OcrError::EngineUnavailable(_)));
    }
}
