//! Error types for the routemind pipeline.
//!
//! Every external call returns one of these; none of them is fatal to a
//! session. The caller decides the fallback: a sentinel for OCR, skipping the
//! address for geocoding, the unoptimized list for optimization, and the
//! previous gate codes for the store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    /// The recognition engine could not be started at all.
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("OCR engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The in-process engine could not decode or read the image.
    #[error("OCR inference failed: {0}")]
    Inference(String),

    /// The engine ran but rejected the image.
    #[error("OCR engine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoding response is malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("optimization request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("optimization service returned no route")]
    NoRoute,

    #[error("optimization service reported an error (code {code}): {message}")]
    Service { code: i64, message: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("gate code store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gate code file could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("gate code data is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("not logged in")]
    NotAuthenticated,

    #[error("unknown depot '{0}'")]
    UnknownDepot(String),
}
