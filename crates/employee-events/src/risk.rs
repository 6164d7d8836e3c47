//! Recruitment risk scoring.
//!
//! The classifier is loaded once by process bootstrap and handed to the
//! report assembler; nothing here holds global state.

use crate::entities::{EntityKind, FEATURE_COLUMNS};
use crate::store::{Frame, QueryError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `(positive_events, negative_events)` totals for one employee.
pub type FeatureRow = [f64; 2];

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unable to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model coefficients must be finite")]
    NonFinite,
    #[error("classifier returned {found} rows for {expected} inputs")]
    Shape { expected: usize, found: usize },
}

/// A pre-trained binary classifier over employee event totals.
pub trait RiskClassifier: Send + Sync {
    /// Class probabilities per input row; index 1 is the positive class.
    fn predict_proba(&self, features: &[FeatureRow]) -> Result<Vec<[f64; 2]>, ModelError>;
}

/// Logistic regression exported as JSON: `{"coefficients": [a, b], "intercept": c}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: [f64; 2],
    pub intercept: f64,
}

impl LogisticModel {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(raw)?;
        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::NonFinite);
        }
        Ok(model)
    }
}

impl RiskClassifier for LogisticModel {
    fn predict_proba(&self, features: &[FeatureRow]) -> Result<Vec<[f64; 2]>, ModelError> {
        Ok(features
            .iter()
            .map(|row| {
                let z = self.intercept
                    + self
                        .coefficients
                        .iter()
                        .zip(row.iter())
                        .map(|(weight, value)| weight * value)
                        .sum::<f64>();
                let positive = 1.0 / (1.0 + (-z).exp());
                [1.0 - positive, positive]
            })
            .collect())
    }
}

/// Converts a feature frame into classifier rows. Rows where every feature is
/// NULL carry no events and are dropped; a single NULL is read as zero.
pub fn feature_rows(frame: &Frame) -> Result<Vec<FeatureRow>, QueryError> {
    let [positive_column, negative_column] = FEATURE_COLUMNS;
    let positive = frame.f64_column(positive_column)?;
    let negative = frame.f64_column(negative_column)?;

    Ok(positive
        .into_iter()
        .zip(negative)
        .filter(|(positive, negative)| positive.is_some() || negative.is_some())
        .map(|(positive, negative)| [positive.unwrap_or(0.0), negative.unwrap_or(0.0)])
        .collect())
}

/// Positive-class probability for an entity: the single row for an employee,
/// the mean over members for a team. `None` when there is nothing to score.
pub fn entity_risk(
    kind: EntityKind,
    classifier: &dyn RiskClassifier,
    rows: &[FeatureRow],
) -> Result<Option<f64>, ModelError> {
    if rows.is_empty() {
        return Ok(None);
    }

    let probabilities = classifier.predict_proba(rows)?;
    if probabilities.len() != rows.len() {
        return Err(ModelError::Shape {
            expected: rows.len(),
            found: probabilities.len(),
        });
    }

    let positive: Vec<f64> = probabilities.iter().map(|classes| classes[1]).collect();
    let score = match kind {
        EntityKind::Employee => positive[0],
        EntityKind::Team => positive.iter().sum::<f64>() / positive.len() as f64,
    };
    Ok(Some(score.clamp(0.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Value;

    fn model() -> LogisticModel {
        LogisticModel::from_json(r#"{"coefficients": [-0.5, 0.8], "intercept": 0.1}"#)
            .expect("model parses")
    }

    #[test]
    fn logistic_probabilities_sum_to_one() {
        let probabilities = model()
            .predict_proba(&[[0.0, 0.0], [10.0, 1.0], [1.0, 10.0]])
            .expect("predicts");
        for [negative, positive] in &probabilities {
            assert!((negative + positive - 1.0).abs() < 1e-12);
        }
        assert!(probabilities[1][1] < probabilities[2][1]);
    }

    #[test]
    fn non_finite_artifacts_are_rejected() {
        let err = LogisticModel::from_json(r#"{"coefficients": [1e400, 0.0], "intercept": 0.0}"#)
            .expect_err("overflowing coefficient");
        assert!(matches!(err, ModelError::Parse(_) | ModelError::NonFinite));
    }

    #[test]
    fn null_rows_are_dropped_and_partial_nulls_zeroed() {
        let frame = Frame::new(
            vec!["positive_events".to_string(), "negative_events".to_string()],
            vec![
                vec![Value::Null, Value::Null],
                vec![Value::Integer(3), Value::Null],
            ],
        );
        assert_eq!(feature_rows(&frame).expect("rows"), vec![[3.0, 0.0]]);
    }

    #[derive(Debug)]
    struct Fixed(Vec<f64>);

    impl RiskClassifier for Fixed {
        fn predict_proba(&self, features: &[FeatureRow]) -> Result<Vec<[f64; 2]>, ModelError> {
            Ok(self.0[..features.len()]
                .iter()
                .map(|p| [1.0 - p, *p])
                .collect())
        }
    }

    #[test]
    fn team_risk_is_mean_of_member_probabilities() {
        let classifier = Fixed(vec![0.2, 0.5, 0.8]);
        let rows = [[2.0, 1.0]; 3];
        let team = entity_risk(EntityKind::Team, &classifier, &rows)
            .expect("scores")
            .expect("has rows");
        assert!((team - 0.5).abs() < 1e-12);

        let employee = entity_risk(EntityKind::Employee, &classifier, &rows[..1])
            .expect("scores")
            .expect("has rows");
        assert!((employee - 0.2).abs() < 1e-12);

        assert_eq!(
            entity_risk(EntityKind::Team, &classifier, &[]).expect("empty ok"),
            None
        );
    }
}
