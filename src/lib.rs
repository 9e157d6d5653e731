pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::TomlConfig;
pub use core::inference::infer;
pub use core::loader::{global_store, ModelBundle, ModelStore};
pub use domain::model::{FeatureRecord, FormInput, Label, RawLabel, Sex, Verdict};
pub use utils::error::{PredictError, Result};
