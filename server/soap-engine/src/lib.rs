//! Soap formulation engine: saponification chemistry plus a heuristic oil recommender.
//!
//! Given a partial recipe, scores every unselected catalogue oil, projects how it would
//! shift the recipe's qualities, explains the result and flags incompatibilities with
//! concrete alternatives. Pure computation: no DB, no network, no shared state.
//! Used by the binary for stdin/stdout; can also be called as a library.

pub mod catalogue;
pub mod chemistry;
pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod needs;
pub mod projection;
pub mod ranges;
pub mod recipe;
pub mod score;
pub mod similarity;
pub mod types;

use std::collections::BTreeSet;

use tracing::debug;

pub use catalogue::Catalogue;
pub use config::Config;
pub use engine::{
  get_incompatible_oils, get_oil_recommendation_detail, get_recommended_oils,
  get_suggested_percentage_for_oil, Engine,
};
pub use error::EngineError;
pub use recipe::{calculate_recipe, CalculationResults, RecipeInputs};
pub use types::{Input, Output};

use chemistry::validate_percentages;
use types::{RecipeOil, RecommendationContext};

/// Recommendations stop once the recipe is full.
const RECOMMEND_BELOW_PERCENTAGE: f64 = 100.0;
/// Tiles are only disabled while the recipe is still being shaped.
const FLAG_INCOMPATIBLE_BELOW_PERCENTAGE: f64 = 50.0;

/// Run the engine on a parsed request and return the response (no I/O).
pub fn run(input: &Input) -> Result<Output, EngineError> {
  input.config.validate()?;
  let catalogue = match &input.catalogue {
    Some(oils) => Catalogue::new(oils.clone())?,
    None => Catalogue::bundled()?,
  };

  let oils = input
    .oils
    .iter()
    .map(|sel| {
      if !sel.percentage.is_finite() || sel.percentage < 0.0 {
        return Err(EngineError::validation(
          "oils",
          format!("{}: percentage must be a non-negative number", sel.id),
        ));
      }
      let oil = catalogue.require(&sel.id)?;
      Ok(RecipeOil::new(oil.clone(), sel.percentage))
    })
    .collect::<Result<Vec<_>, _>>()?;

  let results = calculate_recipe(&input.inputs, &oils)?;
  let validation = validate_percentages(&results.oils);
  let context = RecommendationContext::from_oils(results.oils.clone());

  let engine = Engine::new(input.config.clone());
  let soap_type = input.inputs.soap_type;
  let max_results = input.max_results.unwrap_or(engine.config().max_results);

  let recommendations = if context.current_percentage < RECOMMEND_BELOW_PERCENTAGE {
    engine.recommended_oils(catalogue.oils(), &context, soap_type, max_results)
  } else {
    Vec::new()
  };

  let incompatible_oil_ids = if context.current_percentage < FLAG_INCOMPATIBLE_BELOW_PERCENTAGE {
    engine.incompatible_oils(
      catalogue.oils(),
      &context,
      soap_type,
      engine.config().incompatible_threshold,
    )
  } else {
    BTreeSet::new()
  };

  debug!(
    oils = oils.len(),
    total = validation.total_percentage,
    recommendations = recommendations.len(),
    "request complete"
  );

  Ok(Output {
    results,
    validation,
    recommendations,
    incompatible_oil_ids,
  })
}
