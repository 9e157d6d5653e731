//! On-disk model artifacts.
//!
//! Both files are JSON objects tagged by `kind`. They carry only the fitted
//! numbers (means, neighbours, coefficients), never code, so loading one is a
//! plain `serde_json` read followed by a shape check against [`FEATURE_COUNT`].

use crate::domain::model::{FeatureRecord, RawLabel, ScaledVector, FEATURE_COUNT};
use crate::domain::ports::{Classifier, Scaler};
use crate::utils::error::{PredictError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

fn check_len(name: &str, len: usize) -> std::result::Result<(), String> {
    if len != FEATURE_COUNT {
        return Err(format!(
            "'{}' has {} entries, expected {}",
            name, len, FEATURE_COUNT
        ));
    }
    Ok(())
}

fn check_dims(actual: usize) -> Result<()> {
    if actual != FEATURE_COUNT {
        return Err(PredictError::InferenceError {
            message: format!("expected {} features, got {}", FEATURE_COUNT, actual),
        });
    }
    Ok(())
}

/// NaN and infinities have no place in a fitted distance or dot product.
fn check_finite(stage: &str, values: &[f64]) -> Result<()> {
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(PredictError::InferenceError {
            message: format!("{} value {} at position {} is not finite", stage, values[i], i),
        });
    }
    Ok(())
}

/// Fitted scaler parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    /// z = (x - mean) / scale
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// x * scale + min
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl ScalerArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ScalerArtifact::Standard { .. } => "standard",
            ScalerArtifact::MinMax { .. } => "min_max",
        }
    }

    pub fn check(&self) -> std::result::Result<(), String> {
        match self {
            ScalerArtifact::Standard { mean, scale } => {
                check_len("mean", mean.len())?;
                check_len("scale", scale.len())
            }
            ScalerArtifact::MinMax { min, scale } => {
                check_len("min", min.len())?;
                check_len("scale", scale.len())
            }
        }
    }
}

impl Scaler for ScalerArtifact {
    fn scale(&self, record: &FeatureRecord) -> Result<ScaledVector> {
        let x = record.values();
        check_finite("input", x)?;
        let scaled: Vec<f64> = match self {
            ScalerArtifact::Standard { mean, scale } => {
                check_dims(mean.len().min(scale.len()))?;
                x.iter()
                    .zip(mean.iter().zip(scale))
                    .map(|(v, (m, s))| {
                        // 常數特徵的 scale 為 0，當成 1 處理
                        let s = if *s == 0.0 { 1.0 } else { *s };
                        (v - m) / s
                    })
                    .collect()
            }
            ScalerArtifact::MinMax { min, scale } => {
                check_dims(min.len().min(scale.len()))?;
                x.iter()
                    .zip(min.iter().zip(scale))
                    .map(|(v, (lo, s))| v * s + lo)
                    .collect()
            }
        };
        check_finite("scaled", &scaled)?;
        Ok(ScaledVector(scaled))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborWeights {
    #[default]
    Uniform,
    Distance,
}

fn default_p() -> f64 {
    2.0
}

/// Fitted classifier parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    /// k-nearest-neighbour vote over the (already scaled) training set.
    Knn {
        n_neighbors: usize,
        #[serde(default)]
        weights: NeighborWeights,
        /// Minkowski power; 2 is Euclidean.
        #[serde(default = "default_p")]
        p: f64,
        points: Vec<Vec<f64>>,
        labels: Vec<RawLabel>,
    },
    /// Binary linear decision `coef . x + intercept > 0`.
    Logistic {
        coef: Vec<f64>,
        intercept: f64,
        classes: [RawLabel; 2],
    },
}

impl ClassifierArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierArtifact::Knn { .. } => "knn",
            ClassifierArtifact::Logistic { .. } => "logistic",
        }
    }

    pub fn check(&self) -> std::result::Result<(), String> {
        match self {
            ClassifierArtifact::Knn {
                n_neighbors,
                p,
                points,
                labels,
                ..
            } => {
                if points.is_empty() {
                    return Err("no training points".to_string());
                }
                if labels.len() != points.len() {
                    return Err(format!(
                        "{} labels for {} points",
                        labels.len(),
                        points.len()
                    ));
                }
                if *n_neighbors == 0 || *n_neighbors > points.len() {
                    return Err(format!(
                        "n_neighbors must be between 1 and {}, got {}",
                        points.len(),
                        n_neighbors
                    ));
                }
                if !(*p >= 1.0) {
                    return Err(format!("p must be at least 1, got {}", p));
                }
                for (i, point) in points.iter().enumerate() {
                    check_len(&format!("points[{}]", i), point.len())?;
                }
                Ok(())
            }
            ClassifierArtifact::Logistic { coef, .. } => check_len("coef", coef.len()),
        }
    }

    /// Labels this classifier can emit, in class order.
    pub fn classes(&self) -> Vec<RawLabel> {
        let mut classes: Vec<RawLabel> = match self {
            ClassifierArtifact::Knn { labels, .. } => labels.clone(),
            ClassifierArtifact::Logistic { classes, .. } => classes.to_vec(),
        };
        classes.sort_by(|a, b| a.class_order(b));
        classes.dedup();
        classes
    }
}

fn minkowski(a: &[f64], b: &[f64], p: f64) -> f64 {
    if p == 2.0 {
        return a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt();
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs().powf(p))
        .sum::<f64>()
        .powf(1.0 / p)
}

fn knn_vote(
    n_neighbors: usize,
    weights: NeighborWeights,
    p: f64,
    points: &[Vec<f64>],
    labels: &[RawLabel],
    x: &[f64],
) -> Option<RawLabel> {
    let mut nearest: Vec<(f64, &RawLabel)> = points
        .iter()
        .zip(labels)
        .map(|(point, label)| (minkowski(point, x, p), label))
        .collect();
    nearest.sort_by(|a, b| a.0.total_cmp(&b.0));
    nearest.truncate(n_neighbors);

    let exact_match = nearest.iter().any(|(d, _)| *d == 0.0);
    let weight_of = |d: f64| match weights {
        NeighborWeights::Uniform => 1.0,
        // 距離為 0 的鄰居直接勝出
        NeighborWeights::Distance if exact_match => {
            if d == 0.0 {
                1.0
            } else {
                0.0
            }
        }
        NeighborWeights::Distance => 1.0 / d,
    };

    let mut tally: Vec<(&RawLabel, f64)> = Vec::new();
    for (d, label) in &nearest {
        match tally.iter_mut().find(|(seen, _)| seen == label) {
            Some((_, total)) => *total += weight_of(*d),
            None => tally.push((*label, weight_of(*d))),
        }
    }

    // 票數相同時取較小的類別
    tally.sort_by(|a, b| a.0.class_order(b.0));
    tally
        .into_iter()
        .fold(None, |best: Option<(&RawLabel, f64)>, (label, votes)| match best {
            Some((_, top)) if votes.partial_cmp(&top) != Some(Ordering::Greater) => best,
            _ => Some((label, votes)),
        })
        .map(|(label, _)| label.clone())
}

impl Classifier for ClassifierArtifact {
    fn predict(&self, scaled: &ScaledVector) -> Result<RawLabel> {
        let x = scaled.as_slice();
        check_dims(x.len())?;
        check_finite("scaled", x)?;
        match self {
            ClassifierArtifact::Knn {
                n_neighbors,
                weights,
                p,
                points,
                labels,
            } => knn_vote(*n_neighbors, *weights, *p, points, labels, x).ok_or_else(|| {
                PredictError::InferenceError {
                    message: "no neighbours to vote".to_string(),
                }
            }),
            ClassifierArtifact::Logistic {
                coef,
                intercept,
                classes,
            } => {
                let decision: f64 = coef.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + intercept;
                let [negative, positive] = classes;
                Ok(if decision > 0.0 {
                    positive.clone()
                } else {
                    negative.clone()
                })
            }
        }
    }
}
