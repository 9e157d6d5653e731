use heart_predict::app::form;
use heart_predict::{infer, FormInput, ModelStore, PredictError, Sex, Verdict};
use serde_json::json;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn sample_form() -> FormInput {
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

/// Writes a standard scaler plus a 3-NN classifier whose training set puts
/// high cholesterol on the disease side.
fn write_reference_bundle(dir: &Path) -> (String, String) {
    let mean = vec![54.0, 0.7, 1.0, 131.0, 246.0, 0.15, 0.5, 150.0, 0.3, 1.0, 1.4, 0.7, 2.3];
    let scale = vec![9.0, 0.46, 1.0, 17.5, 51.0, 0.36, 0.5, 22.9, 0.47, 1.16, 0.6, 1.0, 0.6];

    let mut low = vec![0.0; 13];
    let mut high = vec![0.0; 13];
    low[4] = -2.0;
    high[4] = 2.0;
    let mut low2 = low.clone();
    low2[0] = 0.5;
    let mut high2 = high.clone();
    high2[0] = 0.5;

    let model = json!({
        "kind": "knn",
        "n_neighbors": 3,
        "weights": "uniform",
        "p": 2,
        "points": [low, low2, high, high2, vec![0.0; 13]],
        "labels": [0, 0, 1, 1, 1],
    });
    let scaler = json!({ "kind": "standard", "mean": mean, "scale": scale });

    let model_path = dir.join("model_knn.json");
    let scaler_path = dir.join("scaler_knn.json");
    std::fs::write(&model_path, model.to_string()).unwrap();
    std::fs::write(&scaler_path, scaler.to_string()).unwrap();
    (
        model_path.to_string_lossy().into_owned(),
        scaler_path.to_string_lossy().into_owned(),
    )
}

#[test]
fn test_reference_patient_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let (model_path, scaler_path) = write_reference_bundle(temp_dir.path());
    let store = ModelStore::new(model_path, scaler_path);

    let bundle = store.load().unwrap();
    let verdict = infer(&sample_form(), &bundle).unwrap();
    assert!(matches!(verdict, Verdict::NotSuffering | Verdict::Suffering));

    // same bundle, same input, same answer
    for _ in 0..5 {
        assert_eq!(infer(&sample_form(), &bundle).unwrap(), verdict);
    }
}

#[test]
fn test_pinned_verdicts() {
    let temp_dir = TempDir::new().unwrap();
    let (model_path, scaler_path) = write_reference_bundle(temp_dir.path());
    let store = ModelStore::new(model_path, scaler_path);
    let bundle = store.load().unwrap();

    // chol 246 - 2*51 = 144 sits on the healthy cluster
    let mut healthy = sample_form();
    healthy.age = "54".into();
    healthy.chol = "144".into();
    assert_eq!(infer(&healthy, &bundle).unwrap(), Verdict::NotSuffering);

    let mut sick = sample_form();
    sick.age = "54".into();
    sick.chol = "348".into();
    assert_eq!(infer(&sick, &bundle).unwrap(), Verdict::Suffering);
}

#[test]
fn test_non_numeric_age_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (model_path, scaler_path) = write_reference_bundle(temp_dir.path());
    let bundle = ModelStore::new(model_path, scaler_path).load().unwrap();

    let mut form = sample_form();
    form.age = "abc".into();
    match infer(&form, &bundle) {
        Err(PredictError::ValidationError { field, value }) => {
            assert_eq!(field, "age");
            assert_eq!(value, "abc");
        }
        other => panic!("expected ValidationError, got {:?}", other),
    }
}

#[test]
fn test_missing_artifacts_block_prediction() {
    let temp_dir = TempDir::new().unwrap();
    let store = ModelStore::new(
        temp_dir.path().join("model_knn.json"),
        temp_dir.path().join("scaler_knn.json"),
    );

    let mut out = Vec::new();
    let err = form::submit(&mut out, &store, &sample_form()).unwrap_err();
    assert!(matches!(err, PredictError::ArtifactNotFound { .. }));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(form::LOAD_FAILURE_MESSAGE));
    assert!(!text.contains("Prediction:"));
}

#[test]
fn test_missing_scaler_only() {
    let temp_dir = TempDir::new().unwrap();
    let (model_path, _) = write_reference_bundle(temp_dir.path());
    let scaler_path = temp_dir.path().join("elsewhere.json");

    let err = ModelStore::new(model_path, &scaler_path).load().unwrap_err();
    match err {
        PredictError::ArtifactNotFound { path } => assert_eq!(path, scaler_path),
        other => panic!("expected ArtifactNotFound, got {:?}", other),
    }
}

#[test]
fn test_interactive_session_allows_resubmission() {
    let temp_dir = TempDir::new().unwrap();
    let (model_path, scaler_path) = write_reference_bundle(temp_dir.path());
    let store = ModelStore::new(model_path, scaler_path);

    let bad = "abc\nMale\n3\n145\n233\n1\n0\n150\n0\n2.3\n0\n0\n1\n";
    let good = "54\nFemale\n3\n145\n144\n1\n0\n150\n0\n2.3\n0\n0\n1\n";
    let mut input = Cursor::new(format!("{}{}", bad, good));
    let mut out = Vec::new();

    let summary = form::run_interactive(&mut input, &mut out, &store).unwrap();
    assert_eq!(summary.predictions, 1);
    assert_eq!(summary.rejected, 1);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Please enter valid numeric values for all fields."));
    assert!(text.contains("Prediction: Not suffering from heart disease."));
}

#[test]
fn test_non_finite_values_never_yield_a_verdict() {
    let temp_dir = TempDir::new().unwrap();
    let (model_path, scaler_path) = write_reference_bundle(temp_dir.path());
    let store = ModelStore::new(model_path, scaler_path);
    let bundle = store.load().unwrap();

    for age in ["nan", "NaN", "inf", "-inf"] {
        let mut input = sample_form();
        input.age = age.into();
        let result = infer(&input, &bundle);
        assert!(
            matches!(result, Err(PredictError::InferenceError { .. })),
            "age={:?} gave {:?}",
            age,
            result
        );
    }

    let mut input = sample_form();
    input.chol = "inf".into();
    let mut out = Vec::new();
    assert!(form::submit(&mut out, &store, &input).is_err());
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("Prediction:"));
    assert!(text.contains("❌"));
}
