//! Public entry points: rank, flag, explain and size candidate oils for a recipe.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::config::Config;
use crate::explain::generate_detail;
use crate::score::{calculate_compatibility_score, suggested_percentage};
use crate::types::{
  OilProfile, RecipeOil, RecommendationContext, RecommendationDetail, RecommendationResult,
  SoapType,
};

/// The recommendation engine. Stateless apart from its configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
  config: Config,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Top `max_results` unselected oils, highest score first.
  ///
  /// Each oil id appears at most once; ties keep catalogue order.
  pub fn recommended_oils(
    &self,
    catalogue: &[OilProfile],
    context: &RecommendationContext,
    soap_type: SoapType,
    max_results: usize,
  ) -> Vec<RecommendationResult> {
    if context.current_oils.is_empty() {
      debug!("empty recipe, first-oil scoring");
    }

    let mut seen = HashSet::new();
    let mut results: Vec<RecommendationResult> = catalogue
      .iter()
      .filter(|oil| !context.contains(&oil.id))
      .filter(|oil| seen.insert(oil.id.as_str()))
      .map(|oil| self.recommend(catalogue, oil, context, soap_type))
      .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    debug!(
      candidates = results.len(),
      selected = context.current_oils.len(),
      "scored recommendation pass"
    );
    results.truncate(max_results);
    results
  }

  fn recommend(
    &self,
    catalogue: &[OilProfile],
    oil: &OilProfile,
    context: &RecommendationContext,
    soap_type: SoapType,
  ) -> RecommendationResult {
    let scored = calculate_compatibility_score(oil, context, soap_type, &self.config);
    let detail = generate_detail(
      catalogue,
      oil,
      context,
      scored.score,
      scored.suggested_percentage,
      soap_type,
      &self.config,
    );
    RecommendationResult {
      oil: oil.clone(),
      score: scored.score,
      reason: scored.reason,
      suggested_percentage: scored.suggested_percentage,
      predicted_impact: scored.predicted_impact,
      compatibility_factors: scored.factors,
      detail,
    }
  }

  /// Ids of unselected oils scoring below `threshold`.
  pub fn incompatible_oils(
    &self,
    catalogue: &[OilProfile],
    context: &RecommendationContext,
    soap_type: SoapType,
    threshold: f64,
  ) -> BTreeSet<String> {
    let ids: BTreeSet<String> = catalogue
      .iter()
      .filter(|oil| !context.contains(&oil.id))
      .filter(|oil| calculate_compatibility_score(oil, context, soap_type, &self.config).score < threshold)
      .map(|oil| oil.id.clone())
      .collect();
    debug!(incompatible = ids.len(), threshold, "incompatibility pass");
    ids
  }

  /// Detail record for any oil, selected or not.
  pub fn oil_recommendation_detail(
    &self,
    catalogue: &[OilProfile],
    oil: &OilProfile,
    context: &RecommendationContext,
    soap_type: SoapType,
  ) -> RecommendationDetail {
    let scored = calculate_compatibility_score(oil, context, soap_type, &self.config);
    generate_detail(
      catalogue,
      oil,
      context,
      scored.score,
      scored.suggested_percentage,
      soap_type,
      &self.config,
    )
  }

  /// Suggested share for `oil` as if it were not yet in the recipe.
  ///
  /// The only oil in a recipe is suggested at 100.
  pub fn suggested_percentage_for_oil(
    &self,
    oil: &OilProfile,
    context: &RecommendationContext,
    soap_type: SoapType,
  ) -> f64 {
    let others: Vec<RecipeOil> = context
      .current_oils
      .iter()
      .filter(|o| o.oil.id != oil.id)
      .cloned()
      .collect();
    if others.is_empty() {
      return 100.0;
    }
    let without = RecommendationContext::from_oils(others);
    suggested_percentage(oil, &without, soap_type)
  }

  pub fn is_oil_compatible(
    &self,
    oil: &OilProfile,
    context: &RecommendationContext,
    soap_type: SoapType,
    min_score: f64,
  ) -> bool {
    calculate_compatibility_score(oil, context, soap_type, &self.config).score >= min_score
  }

  /// Why a tile is disabled, for tooltip text.
  pub fn disabled_reason(
    &self,
    oil: &OilProfile,
    context: &RecommendationContext,
    soap_type: SoapType,
  ) -> String {
    let scored = calculate_compatibility_score(oil, context, soap_type, &self.config);
    if scored.factors.improves_quality.is_empty() && scored.factors.fills_needs.is_empty() {
      return "Cannot achieve ideal ranges with this oil".to_string();
    }
    format!("Low compatibility: {}", scored.reason)
  }
}

/// `Engine::recommended_oils` with default configuration.
pub fn get_recommended_oils(
  catalogue: &[OilProfile],
  context: &RecommendationContext,
  soap_type: SoapType,
  max_results: usize,
) -> Vec<RecommendationResult> {
  Engine::with_defaults().recommended_oils(catalogue, context, soap_type, max_results)
}

pub fn get_incompatible_oils(
  catalogue: &[OilProfile],
  context: &RecommendationContext,
  soap_type: SoapType,
  threshold: f64,
) -> BTreeSet<String> {
  Engine::with_defaults().incompatible_oils(catalogue, context, soap_type, threshold)
}

pub fn get_oil_recommendation_detail(
  catalogue: &[OilProfile],
  oil: &OilProfile,
  context: &RecommendationContext,
  soap_type: SoapType,
) -> RecommendationDetail {
  Engine::with_defaults().oil_recommendation_detail(catalogue, oil, context, soap_type)
}

pub fn get_suggested_percentage_for_oil(
  oil: &OilProfile,
  context: &RecommendationContext,
  soap_type: SoapType,
) -> f64 {
  Engine::with_defaults().suggested_percentage_for_oil(oil, context, soap_type)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::chemistry::tests::{castor, coconut, oil, olive};
  use crate::types::OilCategory;

  fn ctx(oils: Vec<(OilProfile, f64)>) -> RecommendationContext {
    RecommendationContext::from_oils(oils.into_iter().map(|(o, p)| RecipeOil::new(o, p)).collect())
  }

  fn palm() -> OilProfile {
    oil("palm-oil", OilCategory::HardOil, [0.0, 1.0, 44.0, 5.0, 0.0, 39.0, 10.0, 0.0], 53, 145)
  }

  fn catalogue() -> Vec<OilProfile> {
    vec![olive(), coconut(), castor(), palm()]
  }

  #[test]
  fn empty_recipe_ranks_olive_then_hard_oils() {
    let results = get_recommended_oils(&catalogue(), &ctx(vec![]), SoapType::Hard, 5);
    let ids: Vec<&str> = results.iter().map(|r| r.oil.id.as_str()).collect();
    assert_eq!(ids, vec!["olive-oil", "coconut-oil-76", "palm-oil", "castor-oil"]);
    assert_eq!(results[0].score, 75.0);
    assert_eq!(results[1].score, 70.0);
    assert_eq!(results[1].detail.score_category, crate::types::ScoreCategory::HighlyRecommended);
  }

  #[test]
  fn selected_oils_are_excluded_and_results_capped() {
    let context = ctx(vec![(olive(), 40.0)]);
    let results = get_recommended_oils(&catalogue(), &context, SoapType::Hard, 2);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.oil.id != "olive-oil"));
    assert!(results[0].score >= results[1].score);
  }

  #[test]
  fn duplicate_catalogue_entries_are_scored_once() {
    let mut oils = catalogue();
    oils.push(coconut());
    let results = get_recommended_oils(&oils, &ctx(vec![(olive(), 40.0)]), SoapType::Hard, 10);
    assert_eq!(results.iter().filter(|r| r.oil.id == "coconut-oil-76").count(), 1);
  }

  #[test]
  fn incompatible_ids_respect_threshold() {
    let context = ctx(vec![(olive(), 40.0)]);
    assert!(get_incompatible_oils(&catalogue(), &context, SoapType::Hard, 0.0).is_empty());
    let all = get_incompatible_oils(&catalogue(), &context, SoapType::Hard, 101.0);
    let expected: BTreeSet<String> = ["castor-oil", "coconut-oil-76", "palm-oil"]
      .iter()
      .map(|s| s.to_string())
      .collect();
    assert_eq!(all, expected);
  }

  #[test]
  fn suggested_percentage_ignores_the_oil_itself() {
    let context = ctx(vec![(olive(), 60.0), (coconut(), 40.0)]);
    // Without coconut the olive-only recipe needs hardness: hard oil gets 25.
    assert_eq!(get_suggested_percentage_for_oil(&coconut(), &context, SoapType::Hard), 25.0);

    let only = ctx(vec![(olive(), 100.0)]);
    assert_eq!(get_suggested_percentage_for_oil(&olive(), &only, SoapType::Hard), 100.0);
  }

  #[test]
  fn compatibility_and_disabled_reason() {
    let engine = Engine::with_defaults();
    let context = ctx(vec![(olive(), 40.0)]);
    assert!(engine.is_oil_compatible(&coconut(), &context, SoapType::Hard, 30.0));
    assert!(!engine.is_oil_compatible(&coconut(), &context, SoapType::Hard, 101.0));

    assert_eq!(
      engine.disabled_reason(&coconut(), &context, SoapType::Hard),
      "Low compatibility: Improves increases hardness"
    );
    let hazelnut = oil("hazelnut-oil", OilCategory::LiquidOil, [0.0, 0.0, 5.0, 2.0, 0.0, 78.0, 10.0, 0.0], 94, 94);
    assert_eq!(
      engine.disabled_reason(&hazelnut, &context, SoapType::Hard),
      "Cannot achieve ideal ranges with this oil"
    );
  }

  #[test]
  fn detail_matches_ranked_entry() {
    let context = ctx(vec![(olive(), 40.0)]);
    let ranked = get_recommended_oils(&catalogue(), &context, SoapType::Hard, 5);
    let top = &ranked[0];
    let detail = get_oil_recommendation_detail(&catalogue(), &top.oil, &context, SoapType::Hard);
    assert_eq!(&detail, &top.detail);
  }
}
