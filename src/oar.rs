//! In-process text recognition with ONNX models through `oar-ocr`.
//!
//! Needs a text detection model, a text recognition model and the character
//! dictionary the recognition model was trained with.

use std::path::PathBuf;

use oar_ocr::oarocr::{OAROCR, OAROCRBuilder};
use tracing::{debug, info, warn};

use crate::error::OcrError;
use crate::ocr::region_lines;
use crate::traits::TextRecognizer;

#[derive(Debug, Clone, PartialEq)]
pub struct OarModels {
    pub detection_model: PathBuf,
    pub recognition_model: PathBuf,
    pub character_dict: PathBuf,
}

/// Detection and recognition run in-process; one region is one line.
#[derive(Debug)]
pub struct OarRecognizer {
    ocr: OAROCR,
}

impl OarRecognizer {
    /// Loads the models; an error here means the engine is unavailable.
    pub fn new(models: &OarModels) -> Result<Self, OcrError> {
        for path in [&models.detection_model, &models.recognition_model, &models.character_dict] {
            if !path.is_file() {
                return Err(OcrError::EngineUnavailable(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let ocr = OAROCRBuilder::new(
            models.detection_model.clone(),
            models.recognition_model.clone(),
            models.character_dict.clone(),
        )
        .build()
        .map_err(|err| OcrError::EngineUnavailable(err.to_string()))?;

        info!("OCR models loaded from {}", models.detection_model.display());
        Ok(Self { ocr })
    }

    /// Like [`OarRecognizer::new`], logging and discarding the error.
    pub fn try_init(models: &OarModels) -> Option<Self> {
        match Self::new(models) {
            Ok(recognizer) => Some(recognizer),
            Err(err) => {
                warn!("Failed to initialize OCR engine: {}", err);
                None
            }
        }
    }
}

impl TextRecognizer for OarRecognizer {
    fn recognize(&self, image: &[u8]) -> Result<Vec<String>, OcrError> {
        let decoded = image::load_from_memory(image)
            .map_err(|err| OcrError::Inference(format!("image decode: {err}")))?
            .to_rgb8();

        let results = self
            .ocr
            .predict(vec![decoded])
            .map_err(|err| OcrError::Inference(err.to_string()))?;

        let regions = results.into_iter().flat_map(|result| result.text_regions);
        let lines = region_lines(regions.map(|region| region.text));
        debug!("Recognized {} text regions", lines.len());
        Ok(lines)
    }
}
