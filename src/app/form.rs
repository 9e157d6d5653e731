//! Terminal rendition of the prediction page: header, field prompts, and the verdict banner.

use crate::core::inference::infer;
use crate::core::loader::ModelStore;
use crate::core::ConfigProvider;
use crate::domain::model::{FormInput, Sex, Verdict, VerdictStyle, FEATURE_COUNT, FEATURE_NAMES};
use crate::utils::error::{PredictError, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{error, info, warn};

/// On-screen labels, aligned with [`FEATURE_NAMES`].
pub const FIELD_LABELS: [&str; FEATURE_COUNT] = [
    "Age",
    "Sex [Male/Female]",
    "Chest pain type (cp)",
    "Resting blood pressure (trestbps)",
    "Cholesterol (chol)",
    "Fasting blood sugar (fbs)",
    "Resting ECG (restecg)",
    "Max heart rate (thalach)",
    "Exercise induced angina (exang)",
    "ST depression (oldpeak)",
    "Slope of ST segment (slope)",
    "Number of major vessels (ca)",
    "Thalassemia (thal)",
];

pub const LOAD_FAILURE_MESSAGE: &str =
    "Model or scaler not loaded. Check files in the project folder.";

/// The notice shown when the optional banner image is missing.
pub fn image_notice(image_path: Option<&str>) -> Option<String> {
    let path = image_path?;
    if Path::new(path).exists() {
        return None;
    }
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    Some(format!(
        "Add a file named '{}' in the same folder to display an image.",
        name
    ))
}

pub fn render_header<W: Write, C: ConfigProvider>(out: &mut W, config: &C) -> Result<()> {
    writeln!(out, "{}", config.title())?;
    writeln!(out, "{}", "=".repeat(config.title().chars().count()))?;

    match (config.image_path(), image_notice(config.image_path())) {
        (_, Some(notice)) => writeln!(out, "ℹ️ {}", notice)?,
        (Some(path), None) => writeln!(out, "🖼️ {}", path)?,
        (None, None) => {}
    }

    writeln!(out)?;
    writeln!(out, "Enter patient details:")?;
    Ok(())
}

pub fn render_verdict<W: Write>(out: &mut W, verdict: Verdict) -> Result<()> {
    let message = verdict.message();
    let mut sentence = message.to_string();
    if let Some(first) = sentence.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    match verdict.style() {
        VerdictStyle::Success => {
            writeln!(out, "✅ Prediction: {}.", sentence)?;
            writeln!(out, "🎈🎈🎈")?;
        }
        VerdictStyle::Warning => writeln!(out, "⚠️ Prediction: {}.", sentence)?,
    }
    Ok(())
}

/// Shows the user-facing message for a failed submission.
pub fn render_error<W: Write>(out: &mut W, err: &PredictError) -> Result<()> {
    if err.is_blocking() {
        writeln!(out, "❌ {}", LOAD_FAILURE_MESSAGE)?;
    }
    writeln!(out, "❌ {}", err.user_friendly_message())?;
    Ok(())
}

fn read_answer<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{}: ", label)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Asks for every field once. Returns `None` when input ends mid-form.
pub fn prompt_form<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<FormInput>> {
    let mut form = FormInput::default();

    for (name, label) in FEATURE_NAMES.into_iter().zip(FIELD_LABELS) {
        if name == "sex" {
            form.sex = loop {
                let Some(answer) = read_answer(input, out, label)? else {
                    return Ok(None);
                };
                if answer.trim().is_empty() {
                    break Sex::default();
                }
                match Sex::from_choice(&answer) {
                    Some(sex) => break sex,
                    None => writeln!(out, "Please choose Male or Female.")?,
                }
            };
            continue;
        }

        let Some(answer) = read_answer(input, out, label)? else {
            return Ok(None);
        };
        if let Some(slot) = form.text_field_mut(name) {
            *slot = answer;
        }
    }

    Ok(Some(form))
}

/// One press of the predict button.
pub fn submit<W: Write>(out: &mut W, store: &ModelStore, form: &FormInput) -> Result<Verdict> {
    let bundle = match store.load() {
        Ok(bundle) => bundle,
        Err(e) => {
            error!(error = %e, "Model bundle unavailable, prediction blocked");
            render_error(out, &e)?;
            return Err(e);
        }
    };

    match infer(form, &bundle) {
        Ok(verdict) => {
            info!(verdict = %verdict, "Prediction rendered");
            render_verdict(out, verdict)?;
            Ok(verdict)
        }
        Err(e) => {
            warn!(error = %e, "Submission rejected");
            render_error(out, &e)?;
            Err(e)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub predictions: usize,
    pub rejected: usize,
}

/// Prompt, submit, repeat until input ends. Every failure is shown and the form reopens.
pub fn run_interactive<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    store: &ModelStore,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    while let Some(form) = prompt_form(input, out)? {
        match submit(out, store, &form) {
            Ok(_) => summary.predictions += 1,
            Err(PredictError::IoError(e)) => return Err(PredictError::IoError(e)),
            Err(_) => summary.rejected += 1,
        }
        writeln!(out)?;
    }

    info!(
        predictions = summary.predictions,
        rejected = summary.rejected,
        "Interactive session finished"
    );
    Ok(summary)
}
