//! Scoring configuration with hand-tuned defaults.

use serde::Deserialize;

use crate::error::EngineError;

/// Tunable weights and thresholds for the recommendation heuristics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Starting score for every candidate.
  pub base_score: f64,
  /// Empty recipe: bonus for any "Hard Oil" candidate.
  pub empty_hard_oil_bonus: f64,
  /// Empty recipe: bonus for olive oil as a soft-oil base.
  pub empty_olive_oil_bonus: f64,
  /// Empty recipe: suggested percentage for the first oil.
  pub empty_suggested_percentage: f64,
  /// Lower bound for the trial percentage used when simulating an addition.
  pub trial_min_percentage: f64,
  /// Upper bound for the trial percentage used when simulating an addition.
  pub trial_max_percentage: f64,
  /// Pulls an out-of-range quality back toward its range.
  pub range_fix_bonus: f64,
  /// Moves an in-range quality closer to its ideal midpoint.
  pub optimize_bonus: f64,
  /// Supplies at least two acids the recipe is short on.
  pub complement_bonus: f64,
  /// Per unmet need the candidate fulfils.
  pub need_bonus: f64,
  /// Default size of the ranked recommendation list.
  pub max_results: usize,
  /// Oils scoring below this are reported as incompatible.
  pub incompatible_threshold: f64,
  /// Default minimum score for `is_oil_compatible`.
  pub compatible_min_score: f64,
  /// Cap on alternatives attached to one recommendation.
  pub max_alternatives: usize,
  /// Similarity above which a candidate is flagged as duplicating a selected oil.
  pub too_similar_threshold: f64,
  /// Similarity above which the comparative analysis names the closest selected oil.
  pub comparative_similarity_threshold: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      base_score: 50.0,
      empty_hard_oil_bonus: 20.0,
      empty_olive_oil_bonus: 25.0,
      empty_suggested_percentage: 30.0,
      trial_min_percentage: 5.0,
      trial_max_percentage: 30.0,
      range_fix_bonus: 15.0,
      optimize_bonus: 5.0,
      complement_bonus: 10.0,
      need_bonus: 10.0,
      max_results: 5,
      incompatible_threshold: 25.0,
      compatible_min_score: 30.0,
      max_alternatives: 3,
      too_similar_threshold: 0.7,
      comparative_similarity_threshold: 0.5,
    }
  }
}

impl Config {
  /// Reject request overrides the scorer cannot use.
  pub fn validate(&self) -> Result<(), EngineError> {
    let (min, max) = (self.trial_min_percentage, self.trial_max_percentage);
    if !min.is_finite() || !max.is_finite() || min < 0.0 || max < 0.0 {
      return Err(EngineError::validation(
        "config",
        "trial percentages must be non-negative numbers",
      ));
    }
    if min > max {
      return Err(EngineError::validation(
        "config",
        format!("trial_min_percentage ({}) exceeds trial_max_percentage ({})", min, max),
      ));
    }
    Ok(())
  }
}
