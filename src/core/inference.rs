use crate::core::loader::ModelBundle;
use crate::domain::model::{FeatureRecord, FormInput, Label, Verdict};
use crate::utils::error::Result;
use tracing::{debug, warn};

/// Parse, scale, predict, and map the label to a verdict.
///
/// A parse failure returns before the bundle is touched.
pub fn infer(input: &FormInput, bundle: &ModelBundle) -> Result<Verdict> {
    let record = FeatureRecord::parse(input)?;
    debug!(features = ?record.values(), "Parsed feature record");

    let scaled = bundle.scale(&record)?;
    let raw = bundle.predict(&scaled)?;
    if !raw.is_binary() {
        warn!(label = %raw, "Classifier returned a non-binary label, treating it as disease");
    }

    let verdict = Verdict::from(Label::from(&raw));
    debug!(label = %raw, verdict = %verdict, "Inference complete");
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{RawLabel, ScaledVector, Sex};
    use crate::domain::ports::{Classifier, Scaler};
    use crate::utils::error::PredictError;

    struct Identity;

    impl Scaler for Identity {
        fn scale(&self, record: &FeatureRecord) -> Result<ScaledVector> {
            Ok(ScaledVector(record.values().to_vec()))
        }
    }

    struct Fixed(RawLabel);

    impl Classifier for Fixed {
        fn predict(&self, _scaled: &ScaledVector) -> Result<RawLabel> {
            Ok(self.0.clone())
        }
    }

    fn bundle(label: RawLabel) -> ModelBundle {
        ModelBundle::new(Box::new(Identity), Box::new(Fixed(label)))
    }

    fn form() -> FormInput {
        FormInput {
            age: "63".into(),
            sex: Sex::Male,
            cp: "3".into(),
            trestbps: "145".into(),
            chol: "233".into(),
            fbs: "1".into(),
            restecg: "0".into(),
            thalach: "150".into(),
            exang: "0".into(),
            oldpeak: "2.3".into(),
            slope: "0".into(),
            ca: "0".into(),
            thal: "1".into(),
        }
    }

    #[test]
    fn test_zero_label_is_healthy() {
        let verdict = infer(&form(), &bundle(RawLabel::Numeric(0.0))).unwrap();
        assert_eq!(verdict, Verdict::NotSuffering);
    }

    #[test]
    fn test_non_zero_labels_are_disease() {
        for raw in [
            RawLabel::Numeric(1.0),
            RawLabel::Numeric(2.0),
            RawLabel::Numeric(-1.0),
            RawLabel::Text("no".into()),
        ] {
            assert_eq!(infer(&form(), &bundle(raw)).unwrap(), Verdict::Suffering);
        }
    }

    #[test]
    fn test_invalid_field() {
        let mut input = form();
        input.thalach = "fast".into();
        let err = infer(&input, &bundle(RawLabel::Numeric(0.0))).unwrap_err();
        assert!(matches!(err, PredictError::ValidationError { ref field, .. } if field == "thalach"));
    }
}
