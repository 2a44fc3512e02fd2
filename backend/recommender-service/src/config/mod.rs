use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::BusinessWeights;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // HTTP server config
    pub http_host: String,
    pub http_port: u16,

    // Artifacts
    pub artifacts_dir: PathBuf,
    pub model_path: PathBuf,
    pub vector_dim: usize,
    pub allow_heuristic_fallback: bool,

    // Pipeline tuning
    pub top_k_candidates: usize,
    pub final_list_size: usize,
    pub w_model: f32,
    pub w_profit: f32,
    pub w_stock: f32,
    pub scoring_timeout_ms: u64,

    // Observability
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8000)?
            .set_default("artifacts_dir", "model_artifacts")?
            .set_default("model_path", "model_artifacts/hybrid_recommender.onnx")?
            .set_default("vector_dim", 64)?
            .set_default("allow_heuristic_fallback", false)?
            .set_default("top_k_candidates", 500)?
            .set_default("final_list_size", 10)?
            .set_default("w_model", 0.5)?
            .set_default("w_profit", 0.3)?
            .set_default("w_stock", 0.2)?
            .set_default("scoring_timeout_ms", 2000)? // 2 seconds
            .set_default("log_level", "info")?
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP port must be greater than 0"));
        }

        if self.artifacts_dir.as_os_str().is_empty() {
            return Err(anyhow!("Artifacts directory is required"));
        }

        if self.model_path.as_os_str().is_empty() {
            return Err(anyhow!("Model path is required"));
        }

        if self.vector_dim == 0 {
            return Err(anyhow!("Vector dimension must be greater than 0"));
        }

        if self.top_k_candidates == 0 {
            return Err(anyhow!("TOP_K_CANDIDATES must be greater than 0"));
        }

        if self.final_list_size == 0 {
            return Err(anyhow!("FINAL_LIST_SIZE must be greater than 0"));
        }

        if ![self.w_model, self.w_profit, self.w_stock]
            .iter()
            .all(|w| w.is_finite())
        {
            return Err(anyhow!("Business weights must be finite numbers"));
        }

        if self.scoring_timeout_ms == 0 {
            return Err(anyhow!("Scoring timeout must be greater than 0"));
        }

        Ok(())
    }

    pub fn business_weights(&self) -> BusinessWeights {
        BusinessWeights {
            model: self.w_model,
            profit: self.w_profit,
            stock: self.w_stock,
        }
    }

    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_millis(self.scoring_timeout_ms)
    }
}
