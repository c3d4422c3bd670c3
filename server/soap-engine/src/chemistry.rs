//! Saponification chemistry: fatty-acid aggregation, quality formulas, lye and water weights.
//!
//! Every function here is pure. Zero-percentage recipes produce zeroed profiles, never NaN.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{
  FattyAcid, FattyAcidProfile, LyeType, OilProfile, QualityProfile, RecipeOil,
  RecommendationContext, WaterMethod,
};

/// Tolerance for a recipe's percentages to count as summing to 100.
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
  let factor = 10f64.powi(decimals);
  (value * factor).round() / factor
}

fn total_percentage(oils: &[RecipeOil]) -> f64 {
  oils.iter().map(|o| o.percentage).sum()
}

/// Percentage-weighted average of each acid across the oils.
pub fn fatty_acid_profile(oils: &[RecipeOil]) -> FattyAcidProfile {
  let total = total_percentage(oils);
  let mut profile = FattyAcidProfile::default();
  if total == 0.0 {
    return profile;
  }

  for oil in oils {
    let weight = oil.percentage / total;
    for acid in FattyAcid::ALL {
      *profile.get_mut(acid) += oil.oil.fatty_acids.get(acid) * weight;
    }
  }
  profile
}

/// Soap qualities from an aggregate profile. Iodine and INS come from the oils themselves.
pub fn qualities(fatty_acids: &FattyAcidProfile, oils: &[RecipeOil]) -> QualityProfile {
  let fa = fatty_acids;
  let hardness = fa.lauric + fa.myristic + fa.palmitic + fa.stearic;
  let cleansing = fa.lauric + fa.myristic;
  let conditioning = fa.oleic + fa.linoleic + fa.linolenic + fa.ricinoleic;
  let bubbly = fa.lauric + fa.myristic + fa.ricinoleic;
  let creamy = fa.palmitic + fa.stearic + fa.ricinoleic;

  let iodine = weighted_average(oils, |o| o.iodine as f64);
  let ins = weighted_average(oils, |o| o.ins as f64);

  QualityProfile {
    hardness: hardness.round(),
    cleansing: cleansing.round(),
    conditioning: conditioning.round(),
    bubbly: bubbly.round(),
    creamy: creamy.round(),
    iodine: iodine.round(),
    ins: ins.round(),
  }
}

fn weighted_average(oils: &[RecipeOil], value: impl Fn(&OilProfile) -> f64) -> f64 {
  let total = total_percentage(oils);
  if total <= 0.0 {
    return 0.0;
  }
  oils.iter().map(|o| value(&o.oil) * o.percentage / total).sum()
}

/// Lye needed for the oils' weights, discounted by superfat, rounded to 2 decimals.
///
/// Superfat is not validated here; out-of-range values are the caller's concern.
pub fn lye_weight(oils: &[RecipeOil], lye_type: LyeType, superfat_percentage: f64) -> f64 {
  let before_superfat: f64 = oils.iter().map(|o| o.weight * o.oil.sap(lye_type)).sum();
  round_to(before_superfat * (1.0 - superfat_percentage / 100.0), 2)
}

/// Water weight for the chosen method, rounded to 2 decimals.
///
/// Lye concentration must be in (0, 100]; no method accepts a negative or non-finite value.
pub fn water_weight(
  total_oil_weight: f64,
  lye_weight: f64,
  method: WaterMethod,
  value: f64,
) -> Result<f64, EngineError> {
  if !value.is_finite() || value < 0.0 {
    return Err(EngineError::validation(
      "water_value",
      format!("must be a non-negative number, got {}", value),
    ));
  }

  let water = match method {
    WaterMethod::WaterAsPercentOfOils => total_oil_weight * value / 100.0,
    WaterMethod::LyeConcentration => {
      if value == 0.0 || value > 100.0 {
        return Err(EngineError::validation(
          "water_value",
          format!("lye concentration must be in (0, 100], got {}", value),
        ));
      }
      lye_weight * (100.0 / value - 1.0)
    }
    WaterMethod::WaterToLyeRatio => lye_weight * value,
  };
  Ok(round_to(water, 2))
}

/// Result of checking that a recipe's percentages total 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageCheck {
  pub is_valid: bool,
  /// Rounded to 2 decimals.
  pub total_percentage: f64,
}

pub fn validate_percentages(oils: &[RecipeOil]) -> PercentageCheck {
  let total = total_percentage(oils);
  PercentageCheck {
    is_valid: (total - 100.0).abs() <= PERCENTAGE_TOLERANCE + 1e-9,
    total_percentage: round_to(total, 2),
  }
}

/// Distribute the batch's oil weight across oils by percentage.
pub fn oil_weights(oils: &[RecipeOil], total_oil_weight: f64) -> Vec<RecipeOil> {
  oils
    .iter()
    .map(|o| RecipeOil {
      weight: round_to(total_oil_weight * o.percentage / 100.0, 2),
      ..o.clone()
    })
    .collect()
}

/// Qualities of `oils` plus `candidate` at `percentage`, renormalised to 100%.
///
/// The one place a hypothetical mix is built; scoring, projection and impact text all go
/// through here. Nothing passed in is mutated.
pub fn simulate_addition(oils: &[RecipeOil], candidate: &OilProfile, percentage: f64) -> QualityProfile {
  let mut mix: Vec<RecipeOil> = Vec::with_capacity(oils.len() + 1);
  mix.extend(oils.iter().cloned());
  mix.push(RecipeOil::new(candidate.clone(), percentage));

  let total = total_percentage(&mix);
  if total > 0.0 {
    for oil in &mut mix {
      oil.percentage = oil.percentage / total * 100.0;
    }
  }

  let fatty_acids = fatty_acid_profile(&mix);
  qualities(&fatty_acids, &mix)
}

impl RecommendationContext {
  /// Build the context for a recipe from scratch.
  pub fn from_oils(oils: Vec<RecipeOil>) -> Self {
    let current_fatty_acids = fatty_acid_profile(&oils);
    let current_qualities = qualities(&current_fatty_acids, &oils);
    Self {
      current_percentage: total_percentage(&oils),
      current_oils: oils,
      current_qualities,
      current_fatty_acids,
    }
  }
}
