use crate::utils::error::{PredictError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Number of clinical measurements the model was fit on.
pub const FEATURE_COUNT: usize = 13;

/// Field names in the exact order the scaler and classifier expect.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    pub fn as_feature(self) -> f64 {
        match self {
            Sex::Male => 1.0,
            Sex::Female => 0.0,
        }
    }

    /// Accepts the two form choices, case-insensitively. Anything else is rejected.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

/// Raw form contents: twelve free-text boxes plus the sex choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormInput {
    pub age: String,
    pub sex: Sex,
    pub cp: String,
    pub trestbps: String,
    pub chol: String,
    pub fbs: String,
    pub restecg: String,
    pub thalach: String,
    pub exang: String,
    pub oldpeak: String,
    pub slope: String,
    pub ca: String,
    pub thal: String,
}

impl FormInput {
    /// Every field paired with its raw text, in [`FEATURE_NAMES`] order. Sex has no text.
    fn text_fields(&self) -> [(&'static str, Option<&str>); FEATURE_COUNT] {
        std::array::from_fn(|i| {
            let name = FEATURE_NAMES[i];
            (name, self.text_field(name))
        })
    }

    /// A free-text field by name; `None` for sex and unknown names.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "age" => &self.age,
            "cp" => &self.cp,
            "trestbps" => &self.trestbps,
            "chol" => &self.chol,
            "fbs" => &self.fbs,
            "restecg" => &self.restecg,
            "thalach" => &self.thalach,
            "exang" => &self.exang,
            "oldpeak" => &self.oldpeak,
            "slope" => &self.slope,
            "ca" => &self.ca,
            "thal" => &self.thal,
            _ => return None,
        };
        Some(value)
    }

    /// Mutable access to a free-text field by name, used by the interactive form.
    pub fn text_field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "age" => Some(&mut self.age),
            "cp" => Some(&mut self.cp),
            "trestbps" => Some(&mut self.trestbps),
            "chol" => Some(&mut self.chol),
            "fbs" => Some(&mut self.fbs),
            "restecg" => Some(&mut self.restecg),
            "thalach" => Some(&mut self.thalach),
            "exang" => Some(&mut self.exang),
            "oldpeak" => Some(&mut self.oldpeak),
            "slope" => Some(&mut self.slope),
            "ca" => Some(&mut self.ca),
            "thal" => Some(&mut self.thal),
            _ => None,
        }
    }
}

/// Thirteen parsed measurements in [`FEATURE_NAMES`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord([f64; FEATURE_COUNT]);

impl FeatureRecord {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Parses every free-text field, stopping at the first one that is not a number.
    pub fn parse(input: &FormInput) -> Result<Self> {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, (name, raw)) in values.iter_mut().zip(input.text_fields()) {
            *slot = match raw {
                None => input.sex.as_feature(),
                Some(raw) => {
                    raw.trim()
                        .parse::<f64>()
                        .map_err(|_| PredictError::ValidationError {
                            field: name.to_string(),
                            value: raw.to_string(),
                        })?
                }
            };
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// Output of the scaler, handed straight to the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledVector(pub Vec<f64>);

impl ScaledVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Whatever the classifier emits before it is narrowed to a [`Label`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Numeric(f64),
    Text(String),
}

impl RawLabel {
    /// Numbers before strings; numbers by value, strings lexically.
    pub fn class_order(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RawLabel::Numeric(a), RawLabel::Numeric(b)) => a.total_cmp(b),
            (RawLabel::Numeric(_), RawLabel::Text(_)) => Ordering::Less,
            (RawLabel::Text(_), RawLabel::Numeric(_)) => Ordering::Greater,
            (RawLabel::Text(a), RawLabel::Text(b)) => a.cmp(b),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, RawLabel::Numeric(v) if *v == 0.0 || *v == 1.0)
    }
}

impl fmt::Display for RawLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLabel::Numeric(v) => write!(f, "{}", v),
            RawLabel::Text(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    NoDisease,
    Disease,
}

impl From<&RawLabel> for Label {
    /// Only an exact numeric zero means healthy. Strings never compare equal to 0.
    fn from(raw: &RawLabel) -> Self {
        match raw {
            RawLabel::Numeric(v) if *v == 0.0 => Label::NoDisease,
            _ => Label::Disease,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictStyle {
    Success,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    NotSuffering,
    Suffering,
}

impl Verdict {
    pub const NOT_SUFFERING: &'static str = "not suffering from heart disease";
    pub const SUFFERING: &'static str = "suffering from heart disease";

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::NotSuffering => Self::NOT_SUFFERING,
            Verdict::Suffering => Self::SUFFERING,
        }
    }

    pub fn style(&self) -> VerdictStyle {
        match self {
            Verdict::NotSuffering => VerdictStyle::Success,
            Verdict::Suffering => VerdictStyle::Warning,
        }
    }
}

impl From<Label> for Verdict {
    fn from(label: Label) -> Self {
        match label {
            Label::NoDisease => Verdict::NotSuffering,
            Label::Disease => Verdict::Suffering,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
