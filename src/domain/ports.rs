use crate::domain::model::{FeatureRecord, RawLabel, ScaledVector};
use crate::utils::error::Result;

/// A fitted feature transform.
pub trait Scaler: Send + Sync {
    fn scale(&self, record: &FeatureRecord) -> Result<ScaledVector>;
}

/// A fitted classifier over scaled vectors, predicting one record at a time.
pub trait Classifier: Send + Sync {
    fn predict(&self, scaled: &ScaledVector) -> Result<RawLabel>;
}

pub trait ConfigProvider: Send + Sync {
    fn model_path(&self) -> &str;
    fn scaler_path(&self) -> &str;
    fn image_path(&self) -> Option<&str>;
    fn title(&self) -> &str;
}
