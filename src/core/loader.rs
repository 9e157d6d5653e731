//! Model store: reads the scaler and classifier once and hands out the cached bundle.

use crate::core::artifacts::{ClassifierArtifact, ScalerArtifact};
use crate::core::ConfigProvider;
use crate::domain::model::{FeatureRecord, RawLabel, ScaledVector};
use crate::domain::ports::{Classifier, Scaler};
use crate::utils::error::{PredictError, Result};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// The fitted scaler and classifier, immutable once loaded.
pub struct ModelBundle {
    scaler: Box<dyn Scaler>,
    classifier: Box<dyn Classifier>,
}

impl ModelBundle {
    pub fn new(scaler: Box<dyn Scaler>, classifier: Box<dyn Classifier>) -> Self {
        Self { scaler, classifier }
    }

    pub fn scale(&self, record: &FeatureRecord) -> Result<ScaledVector> {
        self.scaler.scale(record)
    }

    pub fn predict(&self, scaled: &ScaledVector) -> Result<RawLabel> {
        self.classifier.predict(scaled)
    }
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBundle").finish_non_exhaustive()
    }
}

/// Owns the artifact paths and the process-wide bundle cache.
#[derive(Debug)]
pub struct ModelStore {
    model_path: PathBuf,
    scaler_path: PathBuf,
    bundle: OnceLock<Arc<ModelBundle>>,
}

impl ModelStore {
    pub fn new(model_path: impl Into<PathBuf>, scaler_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            scaler_path: scaler_path.into(),
            bundle: OnceLock::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.model_path(), config.scaler_path())
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    pub fn is_loaded(&self) -> bool {
        self.bundle.get().is_some()
    }

    /// Returns the cached bundle, reading both artifacts on the first successful call.
    ///
    /// Failures are not cached, so a later call after the files appear will succeed.
    pub fn load(&self) -> Result<Arc<ModelBundle>> {
        if let Some(bundle) = self.bundle.get() {
            debug!("Model bundle cache hit");
            return Ok(Arc::clone(bundle));
        }

        // 先確認兩個檔案都存在，再開始反序列化
        for path in [&self.model_path, &self.scaler_path] {
            if !path.exists() {
                warn!(path = %path.display(), "Model artifact not found");
                return Err(PredictError::ArtifactNotFound { path: path.clone() });
            }
        }

        let classifier: ClassifierArtifact = read_artifact(&self.model_path)?;
        classifier
            .check()
            .map_err(|cause| corrupt(&self.model_path, cause))?;
        let scaler: ScalerArtifact = read_artifact(&self.scaler_path)?;
        scaler
            .check()
            .map_err(|cause| corrupt(&self.scaler_path, cause))?;

        let classes = classifier.classes();
        if classes.iter().any(|c| !c.is_binary()) {
            warn!(
                classes = ?classes,
                "Classifier emits labels outside {{0, 1}}; every non-zero label is read as disease"
            );
        }

        info!(
            model = %self.model_path.display(),
            model_kind = classifier.kind(),
            scaler = %self.scaler_path.display(),
            scaler_kind = scaler.kind(),
            "Model bundle loaded"
        );

        let bundle = Arc::new(ModelBundle::new(Box::new(scaler), Box::new(classifier)));
        Ok(Arc::clone(self.bundle.get_or_init(|| bundle)))
    }
}

fn corrupt(path: &Path, cause: impl ToString) -> PredictError {
    PredictError::ArtifactCorrupt {
        path: path.to_path_buf(),
        cause: cause.to_string(),
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read(path).map_err(|e| corrupt(path, e))?;
    serde_json::from_slice(&content).map_err(|e| corrupt(path, e))
}

/// One store per process, created from the first configuration that asks for it.
static GLOBAL_STORE: OnceLock<ModelStore> = OnceLock::new();

pub fn global_store<C: ConfigProvider>(config: &C) -> &'static ModelStore {
    GLOBAL_STORE.get_or_init(|| ModelStore::from_config(config))
}
