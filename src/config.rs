//! # Config
//!
//! Application settings: built-in defaults, then an optional config file,
//! then `ROUTEMIND_*` environment variables (a `.env` file is honored).

use std::collections::HashMap;
use std::path::Path;

use config::{ConfigError, Environment, File};
use dotenv::dotenv;
use serde::Deserialize;

use crate::auth::CredentialTable;
use crate::extract::{ExtractionRules, DEFAULT_PREFIX_MARKERS};
use crate::ocr::TesseractConfig;
use crate::ors::OrsConfig;
use crate::planner::{OptimizerMode, PlanOptions};
use crate::present::DEFAULT_MAPS_BASE;
use crate::session::DEFAULT_DEPOTS;
use crate::store::SupabaseConfig;

/// struct holding configuration options
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// openrouteservice base URL
    pub ors_base_url: String,
    /// openrouteservice API key; the service optimizer needs it
    pub ors_api_key: Option<String>,
    /// vehicle profile for the optimization request
    pub ors_profile: String,
    pub geocode_timeout_secs: u64,
    pub optimize_timeout_secs: u64,

    /// Supabase project URL; gate codes are disabled without it
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub gate_code_table: String,
    pub store_timeout_secs: u64,

    /// base of the directions deep link
    pub maps_base_url: String,

    pub optimizer: OptimizerMode,
    /// assumed speed for straight-line leg estimates
    pub average_speed_kmh: f64,

    pub tesseract_binary: String,
    pub ocr_language: String,
    /// ONNX models for the in-process engine; all three select it
    pub oar_detection_model: Option<String>,
    pub oar_recognition_model: Option<String>,
    pub oar_character_dict: Option<String>,
    /// label boilerplate markers stripped before the address
    pub prefix_markers: Vec<String>,
    /// match street suffixes as whole words only
    pub suffix_whole_words: bool,

    pub depots: Vec<String>,
    /// username to hex SHA-256 of the password
    pub credentials: HashMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let ors = OrsConfig::default();
        Self {
            ors_base_url: ors.base_url,
            ors_api_key: None,
            ors_profile: ors.profile,
            geocode_timeout_secs: ors.geocode_timeout_secs,
            optimize_timeout_secs: ors.optimize_timeout_secs,
            supabase_url: None,
            supabase_key: None,
            gate_code_table: "gate_codes".to_string(),
            store_timeout_secs: 10,
            maps_base_url: DEFAULT_MAPS_BASE.to_string(),
            optimizer: OptimizerMode::default(),
            average_speed_kmh: crate::haversine::DEFAULT_SPEED_KMH,
            tesseract_binary: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            oar_detection_model: None,
            oar_recognition_model: None,
            oar_character_dict: None,
            prefix_markers: DEFAULT_PREFIX_MARKERS.iter().map(|m| m.to_string()).collect(),
            suffix_whole_words: false,
            depots: DEFAULT_DEPOTS.iter().map(|d| d.to_string()).collect(),
            credentials: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Loads defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // read .env file if present
        dotenv().ok();
        let defaults = AppConfig::default();

        let mut builder = config::Config::builder()
            .set_default("ors_base_url", defaults.ors_base_url)?
            .set_default("ors_profile", defaults.ors_profile)?
            .set_default("geocode_timeout_secs", defaults.geocode_timeout_secs)?
            .set_default("optimize_timeout_secs", defaults.optimize_timeout_secs)?
            .set_default("gate_code_table", defaults.gate_code_table)?
            .set_default("store_timeout_secs", defaults.store_timeout_secs)?
            .set_default("maps_base_url", defaults.maps_base_url)?
            .set_default("optimizer", defaults.optimizer.to_string())?
            .set_default("average_speed_kmh", defaults.average_speed_kmh)?
            .set_default("tesseract_binary", defaults.tesseract_binary)?
            .set_default("ocr_language", defaults.ocr_language)?
            .set_default("prefix_markers", defaults.prefix_markers)?
            .set_default("suffix_whole_words", defaults.suffix_whole_words)?
            .set_default("depots", defaults.depots)?
            .set_default("credentials", HashMap::<String, String>::new())?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(Environment::with_prefix("ROUTEMIND"))
            .build()?
            .try_deserialize()
    }

    pub fn ors(&self) -> Option<OrsConfig> {
        let api_key = self.ors_api_key.clone().filter(|key| !key.is_empty())?;
        Some(OrsConfig {
            base_url: self.ors_base_url.clone(),
            api_key,
            profile: self.ors_profile.clone(),
            geocode_timeout_secs: self.geocode_timeout_secs,
            optimize_timeout_secs: self.optimize_timeout_secs,
        })
    }

    pub fn supabase(&self) -> Option<SupabaseConfig> {
        match (&self.supabase_url, &self.supabase_key) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Some(SupabaseConfig {
                table: self.gate_code_table.clone(),
                timeout_secs: self.store_timeout_secs,
                ..SupabaseConfig::new(url.clone(), key.clone())
            }),
            _ => None,
        }
    }

    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            mode: self.optimizer,
            profile: self.ors_profile.clone(),
            speed_kmh: self.average_speed_kmh,
        }
    }

    pub fn tesseract(&self) -> TesseractConfig {
        TesseractConfig {
            binary: self.tesseract_binary.clone(),
            language: self.ocr_language.clone(),
        }
    }

    /// Model paths for the in-process engine, when all three are set.
    #[cfg(feature = "oar")]
    pub fn oar_models(&self) -> Option<crate::oar::OarModels> {
        let path = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(std::path::PathBuf::from)
        };
        Some(crate::oar::OarModels {
            detection_model: path(&self.oar_detection_model)?,
            recognition_model: path(&self.oar_recognition_model)?,
            character_dict: path(&self.oar_character_dict)?,
        })
    }

    pub fn extraction_rules(&self) -> ExtractionRules {
        ExtractionRules::default()
            .with_prefix_markers(self.prefix_markers.clone())
            .with_whole_words(self.suffix_whole_words)
    }

    pub fn credential_table(&self) -> CredentialTable {
        CredentialTable::new(self.credentials.clone())
    }
}
