//! Compatibility scoring: base score, simulated addition, bonuses, similarity penalty.

use tracing::trace;

use crate::chemistry::simulate_addition;
use crate::config::Config;
use crate::needs::{identify_needs, is_castor, oil_fulfills_need};
use crate::ranges::QualityRanges;
use crate::similarity::similarity_penalty;
use crate::types::{
  CompatibilityFactors, CompatibilityScore, FattyAcid, FattyAcidProfile, Need, OilCategory,
  OilProfile, Quality, RecommendationContext, SoapType,
};

/// Score `oil` as the next addition to the recipe in `context`.
///
/// Total over its inputs: an empty context takes the first-oil path, anything else is
/// simulated at a trial percentage and scored against the soap type's ranges.
pub fn calculate_compatibility_score(
  oil: &OilProfile,
  context: &RecommendationContext,
  soap_type: SoapType,
  config: &Config,
) -> CompatibilityScore {
  if context.current_oils.is_empty() {
    return score_first_oil(oil, config);
  }

  let mut score = config.base_score;
  let mut improves_quality = Vec::new();
  let mut fills_needs = Vec::new();
  let ranges = QualityRanges::for_soap_type(soap_type);

  let trial = context
    .remaining_percentage()
    .max(config.trial_min_percentage)
    .min(config.trial_max_percentage);
  let projected = simulate_addition(&context.current_oils, oil, trial);

  for quality in Quality::PRIMARY {
    let current = context.current_qualities.get(quality);
    let after = projected.get(quality);
    let range = ranges.get(quality);

    if current < range.min && after > current {
      score += config.range_fix_bonus;
      improves_quality.push(format!("increases_{}", quality));
    } else if current > range.max && after < current {
      score += config.range_fix_bonus;
      improves_quality.push(format!("decreases_{}", quality));
    } else if let Some(ideal) = range.ideal {
      let mid = ideal.midpoint();
      if (after - mid).abs() < (current - mid).abs() {
        score += config.optimize_bonus;
        improves_quality.push(format!("optimizes_{}", quality));
      }
    }
  }

  let complements_fatty_acids = complements(&oil.fatty_acids, &context.current_fatty_acids);
  if complements_fatty_acids {
    score += config.complement_bonus;
  }

  let needs = identify_needs(&context.current_qualities, soap_type);
  for need in &needs {
    if oil_fulfills_need(oil, *need, soap_type) {
      score += config.need_bonus;
      fills_needs.push(need.tag().to_string());
    }
  }

  score -= similarity_penalty(oil, &context.current_oils);
  let score = score.clamp(0.0, 100.0);

  let suggested_percentage = suggested_percentage_with_needs(oil, context, &needs);
  let predicted_impact = predicted_impact(oil, suggested_percentage, context, soap_type);

  let reason = if let Some(first) = improves_quality.first() {
    format!("Improves {}", first.replacen('_', " ", 1))
  } else if let Some(first) = fills_needs.first() {
    format!("Provides {}", first.replacen('_', " ", 1))
  } else {
    "Complements your current selection".to_string()
  };

  trace!(oil = %oil.id, score, trial, "scored candidate");

  CompatibilityScore {
    score,
    reason,
    suggested_percentage,
    predicted_impact,
    factors: CompatibilityFactors {
      complements_fatty_acids,
      improves_quality,
      fills_needs,
    },
  }
}

/// Nothing to compare against yet: favour base oils and stop.
fn score_first_oil(oil: &OilProfile, config: &Config) -> CompatibilityScore {
  let mut score = config.base_score;
  let mut fills_needs = Vec::new();

  if oil.is_category(OilCategory::HardOil) {
    score += config.empty_hard_oil_bonus;
    fills_needs.push("base_hard_oil".to_string());
  }
  if oil.is_category(OilCategory::SoftOil) && oil.id == "olive-oil" {
    score += config.empty_olive_oil_bonus;
    fills_needs.push("base_soft_oil".to_string());
  }

  CompatibilityScore {
    score: score.clamp(0.0, 100.0),
    reason: "Good starting oil for your recipe".to_string(),
    suggested_percentage: config.empty_suggested_percentage,
    predicted_impact: "Great base for your soap recipe".to_string(),
    factors: CompatibilityFactors {
      complements_fatty_acids: true,
      improves_quality: Vec::new(),
      fills_needs,
    },
  }
}

/// At least two acids the recipe is short on (< 10%) that the oil is rich in (> 20%).
pub fn complements(oil: &FattyAcidProfile, current: &FattyAcidProfile) -> bool {
  FattyAcid::ALL
    .iter()
    .filter(|&&acid| current.get(acid) < 10.0 && oil.get(acid) > 20.0)
    .count()
    >= 2
}

/// Rule-table percentage for adding `oil` to the recipe, capped by the room left.
pub fn suggested_percentage(oil: &OilProfile, context: &RecommendationContext, soap_type: SoapType) -> f64 {
  let needs = identify_needs(&context.current_qualities, soap_type);
  suggested_percentage_with_needs(oil, context, &needs)
}

fn suggested_percentage_with_needs(oil: &OilProfile, context: &RecommendationContext, needs: &[Need]) -> f64 {
  let remaining = context.remaining_percentage();
  if remaining < 10.0 {
    return remaining.max(5.0);
  }

  let fa = &oil.fatty_acids;
  let target: f64 = if oil.is_category(OilCategory::HardOil) && needs.contains(&Need::Hardness) {
    25.0
  } else if fa.oleic > 50.0 && needs.contains(&Need::Conditioning) {
    20.0
  } else if is_castor(oil) || fa.ricinoleic > 80.0 {
    8.0
  } else if fa.lauric > 40.0 && needs.contains(&Need::Cleansing) {
    20.0
  } else {
    15.0
  };
  target.min(remaining)
}

/// One-line description of the most useful quality shift at `percentage`.
///
/// Picks the largest change that moves a quality toward its ideal band; otherwise names the
/// first meaningful change; empty when nothing moves by more than one point.
pub fn predicted_impact(
  oil: &OilProfile,
  percentage: f64,
  context: &RecommendationContext,
  soap_type: SoapType,
) -> String {
  let projected = simulate_addition(&context.current_oils, oil, percentage);
  let ranges = QualityRanges::for_soap_type(soap_type);

  let mut best: Option<(Quality, f64, f64)> = None;
  let mut first_change: Option<(Quality, f64)> = None;

  for quality in Quality::ALL {
    let current = context.current_qualities.get(quality);
    let after = projected.get(quality);
    let change = after - current;
    if change.abs() <= 1.0 {
      continue;
    }
    first_change.get_or_insert((quality, change));

    let Some(ideal) = ranges.get(quality).ideal else {
      continue;
    };
    let improves = ideal.distance(after) < ideal.distance(current);
    if improves && best.map_or(true, |(_, c, _)| change.abs() > c.abs()) {
      best = Some((quality, change, after));
    }
  }

  match (best, first_change) {
    (Some((quality, _, after)), _) => format!("This will bring {} to {}", quality, after),
    (None, Some((quality, change))) => {
      let direction = if change > 0.0 { "increase" } else { "decrease" };
      format!("Will {} {}", direction, quality)
    }
    (None, None) => String::new(),
  }
}
