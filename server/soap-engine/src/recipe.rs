//! Whole-batch calculation: weights, lye, water and the resulting profile.

use serde::{Deserialize, Serialize};

use crate::chemistry::{
  fatty_acid_profile, lye_weight, oil_weights, qualities, round_to, water_weight,
};
use crate::error::EngineError;
use crate::types::{FattyAcidProfile, LyeType, QualityProfile, RecipeOil, SoapType, WaterMethod};

/// Batch-level inputs. All weights in grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeInputs {
  pub total_oil_weight: f64,
  pub soap_type: SoapType,
  pub lye_type: LyeType,
  pub superfat_percentage: f64,
  pub water_method: WaterMethod,
  pub water_value: f64,
  pub fragrance_weight: f64,
}

impl Default for RecipeInputs {
  fn default() -> Self {
    Self {
      total_oil_weight: 500.0,
      soap_type: SoapType::Hard,
      lye_type: LyeType::NaOH,
      superfat_percentage: 5.0,
      water_method: WaterMethod::WaterAsPercentOfOils,
      water_value: 38.0,
      fragrance_weight: 0.0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
  pub oils: Vec<RecipeOil>,
  pub total_oil_weight: f64,
  pub lye_weight: f64,
  pub water_weight: f64,
  pub fragrance_weight: f64,
  pub total_batch_weight: f64,
  pub qualities: QualityProfile,
  pub fatty_acids: FattyAcidProfile,
}

/// Weights, lye, water and profile for `oils` at the batch settings in `inputs`.
pub fn calculate_recipe(inputs: &RecipeInputs, oils: &[RecipeOil]) -> Result<CalculationResults, EngineError> {
  validate_inputs(inputs)?;

  let oils = oil_weights(oils, inputs.total_oil_weight);
  let lye = lye_weight(&oils, inputs.lye_type, inputs.superfat_percentage);
  let water = water_weight(inputs.total_oil_weight, lye, inputs.water_method, inputs.water_value)?;
  let fatty_acids = fatty_acid_profile(&oils);
  let qualities = qualities(&fatty_acids, &oils);
  let total_batch_weight = round_to(inputs.total_oil_weight + lye + water + inputs.fragrance_weight, 2);

  Ok(CalculationResults {
    oils,
    total_oil_weight: inputs.total_oil_weight,
    lye_weight: lye,
    water_weight: water,
    fragrance_weight: inputs.fragrance_weight,
    total_batch_weight,
    qualities,
    fatty_acids,
  })
}

fn validate_inputs(inputs: &RecipeInputs) -> Result<(), EngineError> {
  let non_negative = |v: f64| v.is_finite() && v >= 0.0;
  if !non_negative(inputs.total_oil_weight) {
    return Err(EngineError::validation("total_oil_weight", "must be a non-negative number"));
  }
  if !(non_negative(inputs.superfat_percentage) && inputs.superfat_percentage < 100.0) {
    return Err(EngineError::validation("superfat_percentage", "must be in [0, 100)"));
  }
  if !non_negative(inputs.fragrance_weight) {
    return Err(EngineError::validation("fragrance_weight", "must be a non-negative number"));
  }
  Ok(())
}
