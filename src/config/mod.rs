#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::Sex;
#[cfg(feature = "cli")]
use clap::Parser;

/// Command-line form. Each free-text flag defaults to an empty box.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "heart-predict")]
#[command(about = "Heart failure prediction from thirteen clinical measurements")]
pub struct CliConfig {
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, help = "Prompt for each field and allow resubmission")]
    pub interactive: bool,

    #[arg(long, default_value = "", help = "Age")]
    pub age: String,

    #[arg(long, value_enum, default_value_t = Sex::Male, help = "Sex")]
    pub sex: Sex,

    #[arg(long, default_value = "", help = "Chest pain type (cp)")]
    pub cp: String,

    #[arg(long, default_value = "", help = "Resting blood pressure (trestbps)")]
    pub trestbps: String,

    #[arg(long, default_value = "", help = "Cholesterol (chol)")]
    pub chol: String,

    #[arg(long, default_value = "", help = "Fasting blood sugar (fbs)")]
    pub fbs: String,

    #[arg(long, default_value = "", help = "Resting ECG (restecg)")]
    pub restecg: String,

    #[arg(long, default_value = "", help = "Max heart rate (thalach)")]
    pub thalach: String,

    #[arg(long, default_value = "", help = "Exercise induced angina (exang)")]
    pub exang: String,

    #[arg(long, default_value = "", allow_hyphen_values = true, help = "ST depression (oldpeak)")]
    pub oldpeak: String,

    #[arg(long, default_value = "", help = "Slope of ST segment (slope)")]
    pub slope: String,

    #[arg(long, default_value = "", help = "Number of major vessels (ca)")]
    pub ca: String,

    #[arg(long, default_value = "", help = "Thalassemia (thal)")]
    pub thal: String,
}
