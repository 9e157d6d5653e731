use crate::config::toml_config::TomlConfig;
use crate::config::CliConfig;
use crate::domain::model::FormInput;
use crate::utils::error::Result;

impl CliConfig {
    /// The flag values as one form submission.
    pub fn form_input(&self) -> FormInput {
        FormInput {
            age: self.age.clone(),
            sex: self.sex,
            cp: self.cp.clone(),
            trestbps: self.trestbps.clone(),
            chol: self.chol.clone(),
            fbs: self.fbs.clone(),
            restecg: self.restecg.clone(),
            thalach: self.thalach.clone(),
            exang: self.exang.clone(),
            oldpeak: self.oldpeak.clone(),
            slope: self.slope.clone(),
            ca: self.ca.clone(),
            thal: self.thal.clone(),
        }
    }

    /// Loads `--config` when given, otherwise the built-in artifact paths.
    pub fn resolve_config(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => TomlConfig::from_file(path),
            None => Ok(TomlConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Sex;
    use crate::domain::ports::ConfigProvider;
    use clap::Parser;

    #[test]
    fn test_flags_become_form_input() {
        let cli = CliConfig::parse_from([
            "heart-predict",
            "--age",
            "63",
            "--sex",
            "female",
            "--oldpeak",
            "-0.5",
            "--thal",
            "1",
        ]);
        let form = cli.form_input();
        assert_eq!(form.age, "63");
        assert_eq!(form.sex, Sex::Female);
        assert_eq!(form.oldpeak, "-0.5");
        assert_eq!(form.thal, "1");
        // untouched boxes stay empty
        assert_eq!(form.chol, "");
    }

    #[test]
    fn test_sex_defaults_to_male() {
        let cli = CliConfig::parse_from(["heart-predict"]);
        assert_eq!(cli.sex, Sex::Male);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_sex_rejects_third_value() {
        assert!(CliConfig::try_parse_from(["heart-predict", "--sex", "other"]).is_err());
    }

    #[test]
    fn test_default_config_without_flag() {
        let cli = CliConfig::parse_from(["heart-predict"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.model_path(), "model_knn.json");
        assert_eq!(config.scaler_path(), "scaler_knn.json");
    }
}
