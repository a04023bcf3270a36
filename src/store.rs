//! Gate code stores.

use std::path::Path;
use std::time::Duration;

use tracing::{error, info};

use crate::error::StoreError;
use crate::model::GateCode;
use crate::traits::GateCodeStore;

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://<project>.supabase.co`.
    pub url: String,
    /// Anonymous API key.
    pub key: String,
    pub table: String,
    pub timeout_secs: u64,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            table: "gate_codes".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Reads gate codes from a Supabase table through its REST endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    config: SupabaseConfig,
    client: reqwest::blocking::Client,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig) -> Result<Self, StoreError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Builds the store and runs a one-row test query against the table.
    pub fn connect(config: SupabaseConfig) -> Result<Self, StoreError> {
        let store = Self::new(config)?;
        store.fetch(Some(1))?;
        info!("Supabase connection test successful");
        Ok(store)
    }

    /// Like [`SupabaseStore::connect`], logging and discarding the error.
    pub fn try_connect(config: SupabaseConfig) -> Option<Self> {
        match Self::connect(config) {
            Ok(store) => Some(store),
            Err(err) => {
                error!("Supabase initialization error: {}", err);
                None
            }
        }
    }

    fn fetch(&self, limit: Option<usize>) -> Result<Vec<GateCode>, StoreError> {
        let url = format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        );

        let mut request = self
            .client
            .get(url)
            .header("apikey", self.config.key.as_str())
            .bearer_auth(&self.config.key)
            .query(&[("select", "*")]);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }

        let rows = request
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<GateCode>>())?;
        Ok(rows)
    }
}

impl GateCodeStore for SupabaseStore {
    fn list_gate_codes(&self) -> Result<Vec<GateCode>, StoreError> {
        self.fetch(None)
    }
}

/// Gate codes held in memory, optionally loaded from a JSON file of rows.
#[derive(Debug, Clone, Default)]
pub struct StaticGateCodes {
    codes: Vec<GateCode>,
}

impl StaticGateCodes {
    pub fn new(codes: Vec<GateCode>) -> Self {
        Self { codes }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&text)?))
    }
}

impl GateCodeStore for StaticGateCodes {
    fn list_gate_codes(&self) -> Result<Vec<GateCode>, StoreError> {
        Ok(self.codes.clone())
    }
}
