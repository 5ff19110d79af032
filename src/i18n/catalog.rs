use super::{interpolate, Params, Translator};
use crate::error::I18nError;
use serde_json::Value;
use std::path::Path;

/// Translations loaded from an i18next-style nested JSON resource.
#[derive(Debug, Clone)]
pub struct Catalog {
    resources: Value,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self, I18nError> {
        let resources: Value = serde_json::from_str(json)?;
        if !resources.is_object() {
            return Err(I18nError::NotAnObject);
        }
        Ok(Self { resources })
    }

    pub fn from_file(path: &Path) -> Result<Self, I18nError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Resolves a dotted key such as `form.upload.uploadFailed`.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.resources, |node, part| node.get(part))
            .and_then(Value::as_str)
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str, params: Params<'_>, default_text: &str) -> String {
        match self.lookup(key) {
            Some(template) => interpolate(template, params),
            None => {
                tracing::debug!(key, "missing translation, using default text");
                interpolate(default_text, params)
            }
        }
    }
}
