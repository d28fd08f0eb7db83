//! Core types for Macaca

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of ranked predictions returned by the analyze endpoint
pub const TOP_K: usize = 3;

/// A single class prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Class label
    pub label: String,

    /// Probability in the range 0.0-1.0
    pub probability: f32,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }

    /// Probability as a percentage rounded to two decimal places
    pub fn percent(&self) -> f64 {
        (f64::from(self.probability) * 100.0 * 100.0).round() / 100.0
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.label, self.percent())
    }
}

/// Predictions ranked by descending probability
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopPredictions {
    predictions: Vec<Prediction>,
}

impl TopPredictions {
    /// Rank a probability distribution against its label set and keep the best `k`.
    ///
    /// `probabilities[i]` must be the probability of `labels[i]`. Equal
    /// probabilities keep label order.
    pub fn rank(labels: &[String], probabilities: &[f32], k: usize) -> Result<Self> {
        if labels.len() != probabilities.len() {
            return Err(Error::inference(format!(
                "predictor returned {} probabilities for {} labels",
                probabilities.len(),
                labels.len()
            )));
        }

        if let Some(bad) = probabilities.iter().find(|p| !p.is_finite()) {
            return Err(Error::inference(format!(
                "predictor returned a non-finite probability: {}",
                bad
            )));
        }

        let mut ranked: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let predictions = ranked
            .into_iter()
            .take(k)
            .map(|(idx, p)| Prediction::new(labels[idx].clone(), p))
            .collect();

        Ok(Self { predictions })
    }

    /// Ranked predictions, best first
    pub fn as_slice(&self) -> &[Prediction] {
        &self.predictions
    }

    /// Best prediction, if any
    pub fn best(&self) -> Option<&Prediction> {
        self.predictions.first()
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// JSON body returned by `POST /analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub pred_1: String,
    pub pred_2: String,
    pub pred_3: String,
}

impl TryFrom<&TopPredictions> for AnalyzeResponse {
    type Error = Error;

    fn try_from(top: &TopPredictions) -> Result<Self> {
        match top.as_slice() {
            [first, second, third, ..] => Ok(Self {
                pred_1: first.to_string(),
                pred_2: second.to_string(),
                pred_3: third.to_string(),
            }),
            other => Err(Error::inference(format!(
                "expected at least {} predictions, got {}",
                TOP_K,
                other.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prediction_display_two_decimals() {
        assert_eq!(
            Prediction::new("macaca_nigra", 0.912345).to_string(),
            "macaca_nigra (91.23%)"
        );
        assert_eq!(Prediction::new("macaca_nigra", 1.0).to_string(), "macaca_nigra (100.00%)");
        assert_eq!(Prediction::new("macaca_nigra", 0.0).to_string(), "macaca_nigra (0.00%)");
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(Prediction::new("a", 0.12345).percent(), 12.35);
        assert_eq!(Prediction::new("a", 0.5).percent(), 50.0);
    }

    #[test]
    fn test_rank_sorts_descending_and_truncates() {
        let labels = labels(&["a", "b", "c", "d"]);
        let top = TopPredictions::rank(&labels, &[0.1, 0.6, 0.05, 0.25], 3).unwrap();

        let got: Vec<_> = top.as_slice().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(got, vec!["b", "d", "a"]);
        assert_eq!(top.best().unwrap().probability, 0.6);
    }

    #[test]
    fn test_rank_ties_keep_label_order() {
        let labels = labels(&["a", "b", "c"]);
        let top = TopPredictions::rank(&labels, &[0.25, 0.5, 0.25], 3).unwrap();

        let got: Vec<_> = top.as_slice().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(got, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rank_truncates_to_available_labels() {
        let top = TopPredictions::rank(&labels(&["a", "b"]), &[0.3, 0.7], 3).unwrap();
        assert_eq!(top.len(), 2);
        assert!(!top.is_empty());

        let empty = TopPredictions::rank(&[], &[], 3).unwrap();
        assert!(empty.is_empty());
        assert!(empty.best().is_none());
    }

    #[test]
    fn test_rank_rejects_length_mismatch() {
        let labels = labels(&["a", "b", "c"]);
        let err = TopPredictions::rank(&labels, &[0.5, 0.5], 3).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_rank_rejects_nan() {
        let labels = labels(&["a", "b", "c"]);
        assert!(TopPredictions::rank(&labels, &[0.5, f32::NAN, 0.5], 3).is_err());
    }

    #[test]
    fn test_analyze_response_from_top() {
        let labels = labels(&["macaca_fuscata", "macaca_nigra", "macaca_sinica"]);
        let top = TopPredictions::rank(&labels, &[0.9, 0.07, 0.03], 3).unwrap();
        let response = AnalyzeResponse::try_from(&top).unwrap();

        assert_eq!(response.pred_1, "macaca_fuscata (90.00%)");
        assert_eq!(response.pred_2, "macaca_nigra (7.00%)");
        assert_eq!(response.pred_3, "macaca_sinica (3.00%)");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_analyze_response_needs_three() {
        let labels = labels(&["a", "b"]);
        let top = TopPredictions::rank(&labels, &[0.9, 0.1], 3).unwrap();
        assert!(AnalyzeResponse::try_from(&top).is_err());
    }
}
