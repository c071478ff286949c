use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub diarization: DiarizationConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

/// OpenAI-compatible API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub transcription_model: String,
    pub summary_model: String,
}

/// Speaker diarization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiarizationConfig {
    /// Endpoint of the diarization service; absent means diarization is off.
    pub endpoint: Option<String>,
    /// Inputs longer than this are not diarized. Zero disables diarization.
    pub max_duration_secs: u64,
}

/// Transcription pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub workers: usize,
    pub chunk_secs: u64,
    pub max_upload_bytes: u64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            api_key: None,
            transcription_model: defaults::TRANSCRIPTION_MODEL.to_string(),
            summary_model: defaults::SUMMARY_MODEL.to_string(),
        }
    }
}

impl Default for DiarizationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            max_duration_secs: defaults::DIARIZATION_MAX_MS / 1000,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: defaults::WORKER_COUNT,
            chunk_secs: defaults::CHUNK_MS / 1000,
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("recordings"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    // Re-panic on invalid TOML or other errors
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - MINUTIER_API_KEY → api.api_key
    /// - MINUTIER_BASE_URL → api.base_url
    /// - MINUTIER_OUTPUT_DIR → output.dir
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(api_key) = std::env::var("MINUTIER_API_KEY")
            && !api_key.is_empty()
        {
            self.api.api_key = Some(api_key);
        }

        if let Ok(base_url) = std::env::var("MINUTIER_BASE_URL")
            && !base_url.is_empty()
        {
            self.api.base_url = base_url;
        }

        if let Ok(dir) = std::env::var("MINUTIER_OUTPUT_DIR")
            && !dir.is_empty()
        {
            self.output.dir = PathBuf::from(dir);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/minutier/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("minutier")
            .join("config.toml")
    }
}
