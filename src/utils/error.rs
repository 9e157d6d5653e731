use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("Artifact corrupt or incompatible: {} ({cause})", path.display())]
    ArtifactCorrupt { path: PathBuf, cause: String },

    #[error("Validation error: all fields must be numeric (field '{field}' got {value:?})")]
    ValidationError { field: String, value: String },

    #[error("Inference error: {message}")]
    InferenceError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value {value:?} for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Artifact,
    Input,
    Inference,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PredictError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PredictError::ArtifactNotFound { .. } | PredictError::ArtifactCorrupt { .. } => {
                ErrorCategory::Artifact
            }
            PredictError::ValidationError { .. } => ErrorCategory::Input,
            PredictError::InferenceError { .. } => ErrorCategory::Inference,
            PredictError::ConfigValidationError { .. }
            | PredictError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PredictError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者修正輸入後可以重新送出
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Artifact | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Inference | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 使用者看得懂的錯誤訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            PredictError::ArtifactNotFound { path } => {
                format!("Model file not found: {}", path.display())
            }
            PredictError::ArtifactCorrupt { path, .. } => {
                format!("Model file could not be read: {}", path.display())
            }
            PredictError::ValidationError { field, value } => format!(
                "Please enter valid numeric values for all fields. '{}' is not a number: {:?}",
                field, value
            ),
            PredictError::InferenceError { .. } => {
                "The model could not produce a prediction.".to_string()
            }
            PredictError::ConfigValidationError { field, .. }
            | PredictError::InvalidConfigValueError { field, .. } => {
                format!("Configuration problem in '{}'", field)
            }
            PredictError::IoError(e) => format!("File system error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PredictError::ArtifactNotFound { .. } => {
                "Place the model and scaler files in the project folder or point [model] in the config at them"
            }
            PredictError::ArtifactCorrupt { .. } => {
                "Re-export the model and scaler from the training process"
            }
            PredictError::ValidationError { .. } => "Correct the field and submit again",
            PredictError::InferenceError { .. } => {
                "Check that the scaler and classifier were fit on the same 13 features"
            }
            PredictError::ConfigValidationError { .. }
            | PredictError::InvalidConfigValueError { .. } => "Fix the configuration file and retry",
            PredictError::IoError(_) => "Check file permissions and contents",
        }
    }

    /// 模型檔案問題會阻擋預測
    pub fn is_blocking(&self) -> bool {
        matches!(self.category(), ErrorCategory::Artifact)
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;
