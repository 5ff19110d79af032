use crate::error::ConfigError;
use crate::selection::AdmissionLimits;
use crate::upload::{CloudinaryConfig, DEFAULT_MAX_ROUNDS};
use serde::Deserialize;
use std::path::Path;

/// Everything an upload form is constructed with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    pub limits: AdmissionLimits,
    /// Fewest files the form may be submitted with.
    pub min_files: usize,
    pub max_rounds: u32,
    /// Name of the form field that receives the newline-separated URLs.
    pub hidden_field: String,
    pub cloudinary: CloudinaryConfig,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            limits: AdmissionLimits::default(),
            min_files: 2,
            max_rounds: DEFAULT_MAX_ROUNDS,
            hidden_field: "vehicle_images".to_string(),
            cloudinary: CloudinaryConfig::default(),
        }
    }
}

impl UploaderConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_files == 0 {
            return Err(ConfigError::Invalid("max_files must be at least 1".to_string()));
        }
        if self.min_files > self.limits.max_files {
            return Err(ConfigError::Invalid(format!(
                "min_files ({}) exceeds max_files ({})",
                self.min_files, self.limits.max_files
            )));
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::Invalid("max_rounds must be at least 1".to_string()));
        }
        if self.limits.allowed_types.is_empty() {
            return Err(ConfigError::Invalid("allowed_types must not be empty".to_string()));
        }
        if self.hidden_field.trim().is_empty() {
            return Err(ConfigError::Invalid("hidden_field must not be empty".to_string()));
        }
        Ok(())
    }

    /// Checks the settings the Cloudinary transport needs.
    pub fn validate_transport(&self) -> Result<(), ConfigError> {
        if self.cloudinary.cloud_name.trim().is_empty() {
            return Err(ConfigError::Invalid("cloud name is required".to_string()));
        }
        if self.cloudinary.upload_preset.trim().is_empty() {
            return Err(ConfigError::Invalid("upload preset is required".to_string()));
        }
        Ok(())
    }
}
