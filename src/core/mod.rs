pub mod artifacts;
pub mod inference;
pub mod loader;

pub use crate::domain::model::{FeatureRecord, FormInput, Label, RawLabel, Verdict};
pub use crate::domain::ports::{Classifier, ConfigProvider, Scaler};
pub use crate::utils::error::Result;
