//! Configuration management for the resume matcher

use crate::error::{Result, ResumeMatchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub provider: ProviderKind,
    pub endpoint: String,
    /// Deployment name for Azure, model id for OpenAI-compatible endpoints
    pub model: String,
    pub api_version: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Azure,
    OpenAi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub skill_weight: f64,
    pub experience_weight: f64,
    pub required_skill_weight: f64,
    pub preferred_skill_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Azure,
            endpoint: String::new(),
            model: String::new(),
            api_version: "2024-02-01".to_string(),
            api_key_env: "AZURE_OPENAI_API_KEY".to_string(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            skill_weight: 0.6,
            experience_weight: 0.4,
            required_skill_weight: 0.7,
            preferred_skill_weight: 0.3,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl ScoringConfig {
    /// Each weight must lie in [0, 1] and each pair must sum to 1.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("skill_weight", self.skill_weight),
            ("experience_weight", self.experience_weight),
            ("required_skill_weight", self.required_skill_weight),
            ("preferred_skill_weight", self.preferred_skill_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ResumeMatchError::Configuration(format!(
                    "scoring.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        let pairs = [
            ("skill_weight + experience_weight", self.skill_weight + self.experience_weight),
            (
                "required_skill_weight + preferred_skill_weight",
                self.required_skill_weight + self.preferred_skill_weight,
            ),
        ];
        for (name, sum) in pairs {
            if (sum - 1.0).abs() > 1e-6 {
                return Err(ResumeMatchError::Configuration(format!(
                    "scoring {} must equal 1.0, got {:.3}",
                    name, sum
                )));
            }
        }

        Ok(())
    }
}

impl CompletionConfig {
    /// Override file values with the Azure environment variables when present.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("AZURE_OPENAI_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(deployment) = std::env::var("AZURE_OPENAI_DEPLOYMENT") {
            self.model = deployment;
        }
        if let Ok(version) = std::env::var("AZURE_OPENAI_API_VERSION") {
            self.api_version = version;
        }
    }

    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Whether everything needed to reach the service is available. OpenAI
    /// falls back to its public endpoint, Azure needs one configured.
    pub fn is_complete(&self) -> bool {
        let has_endpoint = self.provider == ProviderKind::OpenAi || !self.endpoint.trim().is_empty();
        has_endpoint && !self.model.trim().is_empty() && self.api_key().is_some()
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str::<Config>(&content)
                .map_err(|e| ResumeMatchError::Configuration(format!("Failed to parse config: {}", e)))?
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            config
        };

        config.completion.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeMatchError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-match")
            .join("config.toml")
    }
}
