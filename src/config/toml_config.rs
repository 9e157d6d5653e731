use crate::core::ConfigProvider;
use crate::utils::error::{PredictError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_one_of, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MODEL_PATH: &str = "model_knn.json";
pub const DEFAULT_SCALER_PATH: &str = "scaler_knn.json";
pub const DEFAULT_IMAGE_PATH: &str = "heart.jpg";
pub const DEFAULT_TITLE: &str = "HEART FAILURE PREDICTION";

const LOG_FORMATS: [&str; 2] = ["compact", "json"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub form: FormConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_scaler_path")]
    pub scaler_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Set to an empty string to skip the image check entirely.
    #[serde(default = "default_image_path")]
    pub image_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

fn default_model_path() -> String {
    DEFAULT_MODEL_PATH.to_string()
}

fn default_scaler_path() -> String {
    DEFAULT_SCALER_PATH.to_string()
}

fn default_image_path() -> String {
    DEFAULT_IMAGE_PATH.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            scaler_path: default_scaler_path(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            image_path: default_image_path(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PredictError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PredictError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PredictError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("model.model_path", &self.model.model_path)?;
        validate_path("model.scaler_path", &self.model.scaler_path)?;
        validate_non_empty_string("form.title", &self.form.title)?;

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            validate_one_of("logging.format", format, &LOG_FORMATS)?;
        }
        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }

        Ok(())
    }

    pub fn log_format(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .unwrap_or("compact")
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }
}

impl ConfigProvider for TomlConfig {
    fn model_path(&self) -> &str {
        &self.model.model_path
    }

    fn scaler_path(&self) -> &str {
        &self.model.scaler_path
    }

    fn image_path(&self) -> Option<&str> {
        Some(self.form.image_path.as_str()).filter(|p| !p.trim().is_empty())
    }

    fn title(&self) -> &str {
        &self.form.title
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[model]
model_path = "artifacts/model.json"
scaler_path = "artifacts/scaler.json"

[form]
title = "Cardiology intake"
image_path = ""

[logging]
level = "debug"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.model_path(), "artifacts/model.json");
        assert_eq!(config.scaler_path(), "artifacts/scaler.json");
        assert_eq!(config.title(), "Cardiology intake");
        assert_eq!(config.image_path(), None);
        assert_eq!(config.log_format(), "json");
        assert_eq!(config.log_level(), "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.model_path(), DEFAULT_MODEL_PATH);
        assert_eq!(config.scaler_path(), DEFAULT_SCALER_PATH);
        assert_eq!(config.image_path(), Some(DEFAULT_IMAGE_PATH));
        assert_eq!(config.title(), DEFAULT_TITLE);
        assert_eq!(config.log_format(), "compact");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HEART_PREDICT_TEST_MODEL_DIR", "/opt/models");

        let toml_content = r#"
[model]
model_path = "${HEART_PREDICT_TEST_MODEL_DIR}/model.json"
scaler_path = "${HEART_PREDICT_TEST_UNSET_DIR}/scaler.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.model_path(), "/opt/models/model.json");
        // unknown variables are left as-is
        assert_eq!(config.scaler_path(), "${HEART_PREDICT_TEST_UNSET_DIR}/scaler.json");

        std::env::remove_var("HEART_PREDICT_TEST_MODEL_DIR");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[model]
model_path = ""
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[logging]
format = "xml"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_is_checked() {
        for level in LOG_LEVELS {
            let config =
                TomlConfig::from_toml_str(&format!("[logging]\nlevel = \"{}\"\n", level)).unwrap();
            assert_eq!(config.log_level(), level);
            assert!(config.validate().is_ok());
        }

        let config = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        match config.validate() {
            Err(PredictError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "logging.level");
                assert_eq!(value, "loud");
            }
            other => panic!("expected invalid level, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[model\nmodel_path = 1").unwrap_err();
        assert!(matches!(err, PredictError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[model]\nmodel_path = \"m.json\"\nscaler_path = \"s.json\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.model_path(), "m.json");
        assert_eq!(config.scaler_path(), "s.json");
    }
}
