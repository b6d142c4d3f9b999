//! Output-kind policy: how a raw prediction value is interpreted

use modelserve_core::{Error, Prediction, Result};
use serde::{Deserialize, Serialize};

/// Normalization policy for a model's raw output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Regression value, emitted as a float
    Continuous,
    /// Class label, emitted as an integer
    DiscreteClass,
    /// Cluster index, emitted as an integer
    ClusterLabel,
    /// Fallback for names outside the policy table, emitted as text
    Textual,
}

impl OutputKind {
    /// Look up the static policy for a logical model name
    pub fn for_model(name: &str) -> Self {
        match name {
            "linear_reg" | "decision_tree" | "random_forest" => Self::Continuous,
            "logistic_reg" => Self::DiscreteClass,
            "kmeans" => Self::ClusterLabel,
            _ => Self::Textual,
        }
    }

    /// Convert a raw model output into the response value
    pub fn normalize(self, raw: f64) -> Result<Prediction> {
        match self {
            Self::Continuous => {
                if !raw.is_finite() {
                    return Err(Error::prediction(format!(
                        "model produced a non-finite value: {}",
                        raw
                    )));
                }
                Ok(Prediction::Float(raw))
            }
            Self::DiscreteClass | Self::ClusterLabel => to_label(raw).map(Prediction::Integer),
            Self::Textual => Ok(Prediction::Text(format!("{:?}", raw))),
        }
    }

    /// Name as used in logs and listings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::DiscreteClass => "discrete_class",
            Self::ClusterLabel => "cluster_label",
            Self::Textual => "textual",
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// 2^63 is exactly representable; anything at or above it overflows i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn to_label(raw: f64) -> Result<i64> {
    if !raw.is_finite() || raw.fract() != 0.0 || raw < -I64_BOUND || raw >= I64_BOUND {
        return Err(Error::prediction(format!(
            "model produced {} where an integer label was expected",
            raw
        )));
    }
    Ok(raw as i64)
}
