//! Explanation layer: score tiers, fatty-acid contributions, problem detection, alternatives
//! and display copy for one candidate oil.

use crate::chemistry::simulate_addition;
use crate::config::Config;
use crate::needs::{identify_needs, is_castor};
use crate::projection::project_qualities;
use crate::ranges::QualityRanges;
use crate::similarity::{find_most_similar, similarity};
use crate::types::{
  Advantage, BetterAlternative, CardColor, ComparativeAnalysis, FattyAcidContribution,
  IncompatibilityProblem, Need, OilCategory, OilProfile, ProblemKind, Quality, QualityProjection,
  RecommendationContext, RecommendationDetail, ScoreCategory, SoapType,
};

/// Lower bound of each tier, highest first. Anything below the last is incompatible.
const SCORE_BANDS: [(f64, ScoreCategory); 4] = [
  (70.0, ScoreCategory::HighlyRecommended),
  (50.0, ScoreCategory::GoodMatch),
  (30.0, ScoreCategory::Neutral),
  (25.0, ScoreCategory::Caution),
];

const SEPARATOR: &str = " • ";

impl ScoreCategory {
  /// Bands are inclusive at their lower bound.
  pub fn from_score(score: f64) -> Self {
    SCORE_BANDS
      .iter()
      .find(|(min, _)| score >= *min)
      .map(|(_, category)| *category)
      .unwrap_or(ScoreCategory::Incompatible)
  }

  pub fn card_color(self) -> CardColor {
    match self {
      Self::HighlyRecommended => CardColor::Green,
      Self::GoodMatch => CardColor::Blue,
      Self::Neutral => CardColor::Yellow,
      Self::Caution => CardColor::Orange,
      Self::Incompatible => CardColor::Red,
    }
  }
}

/// Full detail record for `oil` at an already computed score and suggested percentage.
pub fn generate_detail(
  catalogue: &[OilProfile],
  oil: &OilProfile,
  context: &RecommendationContext,
  score: f64,
  suggested_percentage: f64,
  soap_type: SoapType,
  config: &Config,
) -> RecommendationDetail {
  let score_category = ScoreCategory::from_score(score);
  let contributions = fatty_acid_contributions(oil, context, soap_type);
  let projections = project_qualities(oil, suggested_percentage, context, soap_type);
  let comparative_analysis = comparative_analysis(oil, context, config);
  let problems = identify_problems(oil, context, &projections, soap_type, config);
  let better_alternatives = if problems.is_empty() {
    Vec::new()
  } else {
    find_better_alternatives(
      catalogue,
      oil,
      context,
      &problems,
      suggested_percentage,
      soap_type,
      config,
    )
  };

  let display_copy = display_copy(
    catalogue,
    score_category,
    &contributions,
    &projections,
    &problems,
    &better_alternatives,
    suggested_percentage,
  );

  RecommendationDetail {
    score,
    score_category,
    card_color: score_category.card_color(),
    fatty_acid_contributions: contributions,
    quality_projections: projections,
    comparative_analysis,
    problems,
    better_alternatives,
    display_copy,
    suggested_percentage,
    usage_tip: usage_tip(oil, score),
  }
}

/// Acids in `oil` that address one of the recipe's current needs.
pub fn fatty_acid_contributions(
  oil: &OilProfile,
  context: &RecommendationContext,
  soap_type: SoapType,
) -> Vec<FattyAcidContribution> {
  let needs = identify_needs(&context.current_qualities, soap_type);
  let fa = &oil.fatty_acids;
  let mut out = Vec::new();
  let mut push = |acid: &str, percentage: f64, why: &str| {
    out.push(FattyAcidContribution {
      acid: acid.to_string(),
      percentage,
      why_helpful: why.to_string(),
    });
  };

  if soap_type == SoapType::Hard && (fa.palmitic > 20.0 || fa.stearic > 5.0) && needs.contains(&Need::Hardness) {
    push(
      "Palmitic + Stearic",
      fa.hardening_saturates(),
      "Saturated fats crystallize to form solid bar structure",
    );
  }

  if fa.oleic > 50.0 {
    if soap_type == SoapType::Liquid {
      push(
        "Oleic",
        fa.oleic,
        "Unsaturated fats remain liquid at room temperature, perfect for liquid soap",
      );
    } else if needs.contains(&Need::Conditioning) {
      push(
        "Oleic",
        fa.oleic,
        "Moisturizes skin without stripping natural oils, similar to skin's sebum",
      );
    }
  }

  if (fa.lauric > 30.0 || fa.myristic > 5.0) && needs.contains(&Need::Cleansing) {
    push(
      "Lauric + Myristic",
      fa.lauric + fa.myristic,
      "Short-chain fatty acids cut through oils effectively, creating cleansing lather",
    );
  }

  if fa.linoleic > 30.0 && needs.contains(&Need::Conditioning) {
    push(
      "Linoleic",
      fa.linoleic,
      "Polyunsaturated fat provides lightweight moisturizing properties",
    );
  }

  if fa.ricinoleic > 80.0 {
    if needs.contains(&Need::BubblyLather) {
      push(
        "Ricinoleic",
        fa.ricinoleic,
        "Creates stable bubbles and helps other oils lather better",
      );
    }
    if needs.contains(&Need::CreamyLather) {
      push("Ricinoleic", fa.ricinoleic, "Produces dense, long-lasting foam structure");
    }
  }

  out
}

/// Concrete reasons adding `oil` would hurt the recipe, in a fixed order:
/// soap-type conflict, out-of-range pushes, rancidity risk, redundancy.
pub fn identify_problems(
  oil: &OilProfile,
  context: &RecommendationContext,
  projections: &[QualityProjection],
  soap_type: SoapType,
  config: &Config,
) -> Vec<IncompatibilityProblem> {
  let fa = &oil.fatty_acids;
  let mut problems = Vec::new();

  match soap_type {
    SoapType::Liquid => {
      let saturates = fa.hardening_saturates();
      if saturates > 30.0 {
        problems.push(problem(
          ProblemKind::WrongSoapType,
          None,
          format!("{:.0}% palmitic + stearic will solidify in KOH liquid soap", saturates),
          "Saturated fats crystallize in potassium hydroxide solutions".to_string(),
          "Creates waxy chunks or thick paste requiring heat to remain fluid",
        ));
      }
    }
    SoapType::Hard => {
      let min = QualityRanges::for_soap_type(soap_type).hardness.min;
      let hardness = projections.iter().find(|p| p.quality == Quality::Hardness);
      if let Some(hardness) = hardness.filter(|p| p.projected < min) {
        problems.push(problem(
          ProblemKind::WrongSoapType,
          None,
          format!("Only {} hardness contribution (need {}+)", hardness.projected, min),
          format!(
            "{:.0}% linoleic + linolenic makes bars soft and slow-curing",
            fa.linoleic + fa.linolenic
          ),
          "Bars stay soft, deform easily, short shelf life",
        ));
      }
    }
  }

  for projection in projections {
    let range = projection.range;
    if projection.projected > range.max {
      problems.push(problem(
        ProblemKind::PushesOutOfRange,
        Some(projection.quality),
        format!("Would bring {} to {} (max: {})", projection.quality, projection.projected, range.max),
        format!("Exceeds acceptable range by {} points", (projection.projected - range.max).round()),
        out_of_range_result(projection.quality, true),
      ));
    } else if projection.projected < range.min {
      problems.push(problem(
        ProblemKind::PushesOutOfRange,
        Some(projection.quality),
        format!("Would bring {} to {} (min: {})", projection.quality, projection.projected, range.min),
        format!("Below acceptable range by {} points", (range.min - projection.projected).round()),
        out_of_range_result(projection.quality, false),
      ));
    }
  }

  if fa.linolenic > 10.0 {
    problems.push(problem(
      ProblemKind::DosRisk,
      None,
      format!("{:.0}% linolenic acid oxidizes rapidly", fa.linolenic),
      "Polyunsaturated fats develop rancidity (dreaded orange spots)".to_string(),
      "Orange spots appear within weeks to months",
    ));
  }

  if let Some((closest, s)) = find_most_similar(oil, &context.current_oils) {
    if s > config.too_similar_threshold {
      let dominant = fa.dominant();
      problems.push(problem(
        ProblemKind::TooSimilar,
        None,
        format!("Already have {} with {}% similar profile", closest.oil.name, (s * 100.0).round()),
        format!("Both high in {} ({:.0}%)", dominant, fa.get(dominant)),
        "Duplicates properties without adding variety to recipe balance",
      ));
    }
  }

  problems
}

fn problem(
  kind: ProblemKind,
  quality: Option<Quality>,
  details: String,
  numeric_issue: String,
  visual_result: &str,
) -> IncompatibilityProblem {
  IncompatibilityProblem {
    kind,
    quality,
    details,
    numeric_issue,
    visual_result: visual_result.to_string(),
  }
}

/// What the user would see in the finished soap when `quality` leaves its band.
fn out_of_range_result(quality: Quality, high: bool) -> &'static str {
  match (quality, high) {
    (Quality::Cleansing, true) => "Drying, tight feeling, disrupts skin barrier",
    (Quality::Cleansing, false) => "Doesn't clean effectively, leaves oily residue",
    (Quality::Hardness, true) => "Brittle bars that crack, harsh feel",
    (Quality::Hardness, false) => "Soap won't unmold, stays mushy, dissolves quickly",
    (Quality::Conditioning, true) => "May leave greasy residue on skin",
    (Quality::Conditioning, false) => "Strips natural oils, leaves skin feeling tight",
    (Quality::Bubbly, true) => "Excessive foam, may be irritating",
    (Quality::Bubbly, false) => "Minimal lather, poor cleansing experience",
    (Quality::Creamy, true) => "Too dense, doesn't rinse clean",
    (Quality::Creamy, false) => "Thin lather, lacks luxurious feel",
    _ => "May affect soap performance",
  }
}

/// Unselected catalogue oils that avoid each problem, at most two per problem.
///
/// Never returns `oil` itself or an oil already in the recipe; each oil appears once and
/// the list is capped at `config.max_alternatives`.
pub fn find_better_alternatives(
  catalogue: &[OilProfile],
  oil: &OilProfile,
  context: &RecommendationContext,
  problems: &[IncompatibilityProblem],
  percentage: f64,
  soap_type: SoapType,
  config: &Config,
) -> Vec<BetterAlternative> {
  const PER_PROBLEM: usize = 2;

  let ranges = QualityRanges::for_soap_type(soap_type);
  let mut out: Vec<BetterAlternative> = Vec::new();

  for p in problems {
    let candidates = catalogue
      .iter()
      .filter(|alt| alt.id != oil.id && !context.contains(&alt.id))
      .filter(|alt| !out.iter().any(|a| a.oil_id == alt.id));

    let found: Vec<BetterAlternative> = match (p.kind, soap_type) {
      (ProblemKind::WrongSoapType, SoapType::Liquid) => candidates
        .filter(|alt| alt.fatty_acids.oleic > 60.0 && alt.fatty_acids.hardening_saturates() < 20.0)
        .take(PER_PROBLEM)
        .map(|alt| alternative(
          alt,
          format!("{:.0}% oleic acid stays liquid in KOH soap", alt.fatty_acids.oleic),
          "No crystallization or thickening issues".to_string(),
        ))
        .collect(),
      (ProblemKind::WrongSoapType, SoapType::Hard) => candidates
        .filter(|alt| alt.fatty_acids.palmitic > 25.0 || alt.fatty_acids.stearic > 20.0)
        .take(PER_PROBLEM)
        .map(|alt| alternative(
          alt,
          format!("{:.0}% palmitic + stearic for bar structure", alt.fatty_acids.hardening_saturates()),
          "Creates firm bars that unmold quickly and last longer".to_string(),
        ))
        .collect(),
      (ProblemKind::TooSimilar, _) => candidates
        .filter(|alt| similarity(oil, alt) < config.comparative_similarity_threshold)
        .take(PER_PROBLEM)
        .map(|alt| alternative(
          alt,
          "Provides different fatty acid balance for variety".to_string(),
          format!(
            "Adds {} instead of duplicating {}",
            alt.fatty_acids.dominant(),
            oil.fatty_acids.dominant()
          ),
        ))
        .collect(),
      (ProblemKind::DosRisk, _) => candidates
        .filter(|alt| alt.fatty_acids.linolenic <= 1.0 && alt.fatty_acids.linoleic < 20.0)
        .take(PER_PROBLEM)
        .map(|alt| alternative(
          alt,
          format!("Only {:.0}% linolenic, resists oxidation", alt.fatty_acids.linolenic),
          "Longer shelf life without orange spots".to_string(),
        ))
        .collect(),
      (ProblemKind::PushesOutOfRange, _) => {
        let Some(quality) = p.quality else {
          continue;
        };
        let range = ranges.get(quality).band();
        candidates
          .filter_map(|alt| {
            let value = simulate_addition(&context.current_oils, alt, percentage).get(quality);
            range.contains(value).then_some((alt, value))
          })
          .take(PER_PROBLEM)
          .map(|(alt, value)| alternative(
            alt,
            format!("Keeps {} at {} ({}-{})", quality, value, range.min, range.max),
            format!("Adds variety without pushing {} out of range", quality),
          ))
          .collect()
      }
    };
    out.extend(found);
  }

  out.truncate(config.max_alternatives);
  out
}

fn alternative(alt: &OilProfile, why_better: String, specific_advantage: String) -> BetterAlternative {
  BetterAlternative {
    oil_id: alt.id.clone(),
    why_better,
    specific_advantage,
  }
}

/// Closest selected oil (when similar enough) and any hardness advantage over the selection.
pub fn comparative_analysis(
  oil: &OilProfile,
  context: &RecommendationContext,
  config: &Config,
) -> ComparativeAnalysis {
  let mut analysis = ComparativeAnalysis::default();

  if let Some((closest, s)) = find_most_similar(oil, &context.current_oils) {
    if s > config.comparative_similarity_threshold {
      analysis.similar_to = Some(closest.oil.id.clone());
      analysis.overlap_percentage = Some((s * 100.0).round());
    }
  }

  if !context.current_oils.is_empty() {
    let avg_hardness = context
      .current_oils
      .iter()
      .map(|o| o.oil.fatty_acids.hardening_saturates())
      .sum::<f64>()
      / context.current_oils.len() as f64;
    let this_hardness = oil.fatty_acids.hardening_saturates();
    if this_hardness > avg_hardness + 10.0 {
      analysis.advantage_over = Some(Advantage {
        oil_id: "current_average".to_string(),
        metric: "hardness".to_string(),
        improvement: (this_hardness - avg_hardness).round(),
      });
    }
  }

  analysis
}

fn display_copy(
  catalogue: &[OilProfile],
  category: ScoreCategory,
  contributions: &[FattyAcidContribution],
  projections: &[QualityProjection],
  problems: &[IncompatibilityProblem],
  alternatives: &[BetterAlternative],
  suggested_percentage: f64,
) -> String {
  let mut parts = Vec::new();
  let first_fa = contributions.first();

  match category {
    ScoreCategory::HighlyRecommended => {
      // Ties keep the earlier entry.
      let main = projections
        .iter()
        .filter(|p| p.moves_toward_ideal)
        .rev()
        .max_by(|a, b| (a.projected - a.current).abs().total_cmp(&(b.projected - b.current).abs()));
      if let Some(main) = main {
        parts.push(format!("Brings {} to {} (ideal range)", main.quality, main.projected));
      }
      let dominant_fa = contributions
        .iter()
        .rev()
        .max_by(|a, b| a.percentage.total_cmp(&b.percentage));
      if let Some(fa) = dominant_fa {
        parts.push(format!(
          "{:.0}% {}{}{}",
          fa.percentage,
          fa.acid.to_lowercase(),
          SEPARATOR,
          fa.why_helpful
        ));
      }
      if main.is_some_and(|p| p.quality == Quality::Hardness) {
        parts.push("Bars will unmold faster and last 3-4 weeks of daily use".to_string());
      }
      if parts.is_empty() {
        parts.push("Strong fit for this recipe".to_string());
      }
    }
    ScoreCategory::GoodMatch => {
      if let Some(fa) = first_fa {
        parts.push(format!(
          "Adds {:.0}% {} for {}",
          fa.percentage,
          fa.acid.to_lowercase(),
          fa.why_helpful.to_lowercase()
        ));
      }
      if let Some(p) = projections.first().filter(|p| !p.moves_toward_ideal) {
        parts.push(format!("However, {} moves to {}", p.quality, p.projected));
      }
      parts.push(format!("Best at {}% of recipe", suggested_percentage));
    }
    ScoreCategory::Neutral => {
      if let Some(fa) = first_fa {
        parts.push(format!("Provides {:.0}% {}", fa.percentage, fa.acid.to_lowercase()));
      }
      if let Some(p) = projections.iter().find(|p| !p.moves_toward_ideal) {
        parts.push(format!(
          "But {} becomes {} (want {}-{})",
          p.quality, p.projected, p.range.min, p.range.max
        ));
      }
      parts.push(format!("Use sparingly, max {}%", suggested_percentage));
    }
    ScoreCategory::Caution | ScoreCategory::Incompatible => {
      let Some(problem) = problems.first() else {
        return "Not recommended for this recipe".to_string();
      };
      parts.push(format!("⚠️ {}", problem.details));
      parts.push(problem.visual_result.clone());
      let alt = alternatives
        .first()
        .and_then(|a| catalogue.iter().find(|o| o.id == a.oil_id).map(|o| (o, a)));
      if let Some((alt_oil, alt)) = alt {
        parts.push(format!("Try {} instead: {}", alt_oil.name, alt.why_better));
      }
    }
  }

  parts.join(SEPARATOR)
}

/// Practical dosing advice for well-scoring oils.
pub fn usage_tip(oil: &OilProfile, score: f64) -> Option<String> {
  if score < 50.0 {
    return None;
  }
  let fa = &oil.fatty_acids;
  let tip = if is_castor(oil) {
    "Keep under 10% - higher amounts make soap sticky"
  } else if fa.lauric > 40.0 {
    "15-25% range provides cleansing without being too drying"
  } else if oil.is_category(OilCategory::HardOil) || oil.is_category(OilCategory::Butter) {
    "Use as base oil at 25-40% for bar structure"
  } else if fa.oleic > 60.0 {
    "Excellent as main conditioning oil up to 50%"
  } else {
    return None;
  };
  Some(tip.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::chemistry::tests::{castor, coconut, oil, olive};
  use crate::types::RecipeOil;

  fn ctx(oils: Vec<(OilProfile, f64)>) -> RecommendationContext {
    RecommendationContext::from_oils(oils.into_iter().map(|(o, p)| RecipeOil::new(o, p)).collect())
  }

  fn palm() -> OilProfile {
    oil("palm-oil", OilCategory::HardOil, [0.0, 1.0, 44.0, 5.0, 0.0, 39.0, 10.0, 0.0], 53, 145)
  }

  fn hazelnut() -> OilProfile {
    oil("hazelnut-oil", OilCategory::LiquidOil, [0.0, 0.0, 5.0, 2.0, 0.0, 78.0, 10.0, 0.0], 94, 94)
  }

  fn shea() -> OilProfile {
    oil("shea-butter", OilCategory::Butter, [0.0, 0.0, 4.0, 43.0, 0.0, 45.0, 6.0, 0.0], 59, 116)
  }

  fn hemp() -> OilProfile {
    oil("hemp-seed-oil", OilCategory::LiquidOil, [0.0, 0.0, 6.0, 2.0, 0.0, 12.0, 57.0, 21.0], 165, 39)
  }

  fn catalogue() -> Vec<OilProfile> {
    vec![olive(), coconut(), castor(), palm(), hazelnut(), shea(), hemp()]
  }

  #[test]
  fn score_bands_are_inclusive_at_lower_bound() {
    let cases = [
      (100.0, ScoreCategory::HighlyRecommended, CardColor::Green),
      (70.0, ScoreCategory::HighlyRecommended, CardColor::Green),
      (69.9, ScoreCategory::GoodMatch, CardColor::Blue),
      (69.0, ScoreCategory::GoodMatch, CardColor::Blue),
      (50.0, ScoreCategory::GoodMatch, CardColor::Blue),
      (49.99, ScoreCategory::Neutral, CardColor::Yellow),
      (30.0, ScoreCategory::Neutral, CardColor::Yellow),
      (29.0, ScoreCategory::Caution, CardColor::Orange),
      (25.0, ScoreCategory::Caution, CardColor::Orange),
      (24.9, ScoreCategory::Incompatible, CardColor::Red),
      (24.0, ScoreCategory::Incompatible, CardColor::Red),
      (0.0, ScoreCategory::Incompatible, CardColor::Red),
    ];
    for (score, category, color) in cases {
      assert_eq!(ScoreCategory::from_score(score), category, "score {}", score);
      assert_eq!(category.card_color(), color);
    }
  }

  #[test]
  fn contributions_follow_recipe_needs() {
    // Olive-only bar lacks hardness, cleansing, bubbly and creamy.
    let context = ctx(vec![(olive(), 40.0)]);

    let coconut_fa = fatty_acid_contributions(&coconut(), &context, SoapType::Hard);
    assert_eq!(coconut_fa.len(), 1);
    assert_eq!(coconut_fa[0].acid, "Lauric + Myristic");
    assert_eq!(coconut_fa[0].percentage, 67.0);

    let palm_fa = fatty_acid_contributions(&palm(), &context, SoapType::Hard);
    assert_eq!(palm_fa[0].acid, "Palmitic + Stearic");
    assert_eq!(palm_fa[0].percentage, 49.0);

    let castor_fa = fatty_acid_contributions(&castor(), &context, SoapType::Hard);
    let acids: Vec<&str> = castor_fa.iter().map(|c| c.acid.as_str()).collect();
    assert_eq!(acids, vec!["Ricinoleic", "Ricinoleic"]);

    // Olive already covers conditioning.
    assert!(fatty_acid_contributions(&hazelnut(), &context, SoapType::Hard).is_empty());
  }

  #[test]
  fn liquid_soap_credits_oleic() {
    let context = ctx(vec![(castor(), 40.0)]);
    let contributions = fatty_acid_contributions(&olive(), &context, SoapType::Liquid);
    assert!(contributions
      .iter()
      .any(|c| c.acid == "Oleic" && c.why_helpful.contains("liquid soap")));
  }

  #[test]
  fn saturated_oil_is_wrong_for_liquid_soap() {
    let context = ctx(vec![(castor(), 40.0)]);
    let problems = identify_problems(&palm(), &context, &[], SoapType::Liquid, &Config::default());
    assert_eq!(problems[0].kind, ProblemKind::WrongSoapType);
    assert_eq!(problems[0].details, "49% palmitic + stearic will solidify in KOH liquid soap");
  }

  #[test]
  fn soft_oil_in_soft_bar_raises_every_problem_kind_but_dos() {
    let context = ctx(vec![(olive(), 40.0)]);
    let projections = project_qualities(&hazelnut(), 30.0, &context, SoapType::Hard);
    let problems = identify_problems(&hazelnut(), &context, &projections, SoapType::Hard, &Config::default());

    assert_eq!(problems[0].kind, ProblemKind::WrongSoapType);
    assert_eq!(problems[0].details, "Only 12 hardness contribution (need 29+)");
    assert_eq!(problems[0].numeric_issue, "10% linoleic + linolenic makes bars soft and slow-curing");

    let hardness = problems
      .iter()
      .find(|p| p.kind == ProblemKind::PushesOutOfRange && p.quality == Some(Quality::Hardness))
      .unwrap();
    assert_eq!(hardness.details, "Would bring hardness to 12 (min: 29)");
    assert_eq!(hardness.numeric_issue, "Below acceptable range by 17 points");
    assert_eq!(hardness.visual_result, "Soap won't unmold, stays mushy, dissolves quickly");

    let conditioning = problems
      .iter()
      .find(|p| p.quality == Some(Quality::Conditioning))
      .unwrap();
    assert_eq!(conditioning.details, "Would bring conditioning to 85 (max: 69)");

    let similar = problems.last().unwrap();
    assert_eq!(similar.kind, ProblemKind::TooSimilar);
    assert_eq!(similar.details, "Already have olive oil with 98% similar profile");
    assert_eq!(similar.numeric_issue, "Both high in oleic (78%)");
    assert!(problems.iter().all(|p| p.kind != ProblemKind::DosRisk));
  }

  #[test]
  fn high_linolenic_is_a_rancidity_risk() {
    let problems = identify_problems(&hemp(), &ctx(vec![]), &[], SoapType::Hard, &Config::default());
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].kind, ProblemKind::DosRisk);
    assert_eq!(problems[0].details, "21% linolenic acid oxidizes rapidly");
  }

  #[test]
  fn cleansing_overshoot_is_reported_high() {
    let context = ctx(vec![(olive(), 40.0)]);
    let projections = project_qualities(&coconut(), 30.0, &context, SoapType::Hard);
    let problems = identify_problems(&coconut(), &context, &projections, SoapType::Hard, &Config::default());
    let cleansing = problems
      .iter()
      .find(|p| p.quality == Some(Quality::Cleansing))
      .unwrap();
    assert_eq!(cleansing.details, "Would bring cleansing to 29 (max: 22)");
    assert_eq!(cleansing.numeric_issue, "Exceeds acceptable range by 7 points");
    assert_eq!(cleansing.visual_result, "Drying, tight feeling, disrupts skin barrier");
  }

  fn bare(kind: ProblemKind, quality: Option<Quality>) -> IncompatibilityProblem {
    problem(kind, quality, String::new(), String::new(), "")
  }

  #[test]
  fn liquid_alternatives_are_high_oleic_and_unselected() {
    let context = ctx(vec![(castor(), 40.0)]);
    let problems = [bare(ProblemKind::WrongSoapType, None)];
    let alts = find_better_alternatives(
      &catalogue(),
      &palm(),
      &context,
      &problems,
      15.0,
      SoapType::Liquid,
      &Config::default(),
    );
    let ids: Vec<&str> = alts.iter().map(|a| a.oil_id.as_str()).collect();
    assert_eq!(ids, vec!["olive-oil", "hazelnut-oil"]);
    assert_eq!(alts[0].why_better, "72% oleic acid stays liquid in KOH soap");
  }

  #[test]
  fn bar_alternatives_are_hardeners() {
    let context = ctx(vec![(olive(), 40.0)]);
    let problems = [bare(ProblemKind::WrongSoapType, None)];
    let alts = find_better_alternatives(
      &catalogue(),
      &hazelnut(),
      &context,
      &problems,
      15.0,
      SoapType::Hard,
      &Config::default(),
    );
    let ids: Vec<&str> = alts.iter().map(|a| a.oil_id.as_str()).collect();
    assert_eq!(ids, vec!["palm-oil", "shea-butter"]);
    assert_eq!(alts[1].why_better, "47% palmitic + stearic for bar structure");
  }

  #[test]
  fn alternatives_are_deduplicated_and_capped() {
    let context = ctx(vec![(olive(), 40.0)]);
    let problems = [
      bare(ProblemKind::WrongSoapType, None),
      bare(ProblemKind::WrongSoapType, None),
      bare(ProblemKind::DosRisk, None),
    ];
    let alts = find_better_alternatives(
      &catalogue(),
      &hemp(),
      &context,
      &problems,
      15.0,
      SoapType::Hard,
      &Config::default(),
    );
    let ids: Vec<&str> = alts.iter().map(|a| a.oil_id.as_str()).collect();
    // Palm and shea first; the repeat finds nothing new; DOS picks coconut next.
    assert_eq!(ids, vec!["palm-oil", "shea-butter", "coconut-oil-76"]);
  }

  #[test]
  fn too_similar_alternatives_need_a_different_profile() {
    let candidate = oil("candidate", OilCategory::HardOil, [100.0; 8], 0, 0);
    let far = oil("far", OilCategory::LiquidOil, [0.0; 8], 0, 0);
    let near = oil("near", OilCategory::LiquidOil, [90.0; 8], 0, 0);
    let problems = [bare(ProblemKind::TooSimilar, None)];
    let alts = find_better_alternatives(
      &[candidate.clone(), near, far],
      &candidate,
      &ctx(vec![(olive(), 40.0)]),
      &problems,
      15.0,
      SoapType::Hard,
      &Config::default(),
    );
    assert_eq!(alts.len(), 1);
    assert_eq!(alts[0].oil_id, "far");
  }

  #[test]
  fn out_of_range_alternatives_keep_the_quality_in_band() {
    let context = ctx(vec![(olive(), 40.0)]);
    let problems = [bare(ProblemKind::PushesOutOfRange, Some(Quality::Cleansing))];
    let alts = find_better_alternatives(
      &catalogue(),
      &coconut(),
      &context,
      &problems,
      30.0,
      SoapType::Hard,
      &Config::default(),
    );
    // Nothing but coconut carries lauric or myristic, so no oil lifts cleansing into 12-22.
    assert!(alts.is_empty());

    let problems = [bare(ProblemKind::PushesOutOfRange, Some(Quality::Hardness))];
    let alts = find_better_alternatives(
      &catalogue(),
      &hazelnut(),
      &context,
      &problems,
      30.0,
      SoapType::Hard,
      &Config::default(),
    );
    let ids: Vec<&str> = alts.iter().map(|a| a.oil_id.as_str()).collect();
    assert_eq!(ids, vec!["coconut-oil-76", "palm-oil"]);
  }

  #[test]
  fn comparative_analysis_names_overlap_and_hardness_gain() {
    let context = ctx(vec![(olive(), 40.0)]);
    let analysis = comparative_analysis(&palm(), &context, &Config::default());
    assert_eq!(analysis.similar_to.as_deref(), Some("olive-oil"));
    // 1 + 33 + 1 + 33 + 1 = 69 over 8 acids = 8.625
    assert_eq!(analysis.overlap_percentage, Some(91.0));
    let advantage = analysis.advantage_over.unwrap();
    assert_eq!(advantage.metric, "hardness");
    assert_eq!(advantage.improvement, 34.0);

    assert_eq!(comparative_analysis(&palm(), &ctx(vec![]), &Config::default()), ComparativeAnalysis::default());
  }

  #[test]
  fn usage_tips_for_good_scores_only() {
    assert_eq!(usage_tip(&castor(), 60.0).as_deref(), Some("Keep under 10% - higher amounts make soap sticky"));
    assert_eq!(
      usage_tip(&coconut(), 60.0).as_deref(),
      Some("15-25% range provides cleansing without being too drying")
    );
    assert_eq!(usage_tip(&palm(), 60.0).as_deref(), Some("Use as base oil at 25-40% for bar structure"));
    assert_eq!(usage_tip(&olive(), 60.0).as_deref(), Some("Excellent as main conditioning oil up to 50%"));
    assert_eq!(usage_tip(&olive(), 49.0), None);
  }

  #[test]
  fn detail_for_incompatible_oil_suggests_an_alternative() {
    let context = ctx(vec![(olive(), 40.0)]);
    let detail = generate_detail(
      &catalogue(),
      &hazelnut(),
      &context,
      20.0,
      30.0,
      SoapType::Hard,
      &Config::default(),
    );
    assert_eq!(detail.score_category, ScoreCategory::Incompatible);
    assert_eq!(detail.card_color, CardColor::Red);
    assert!(!detail.better_alternatives.is_empty());
    assert!(detail.better_alternatives.len() <= 3);
    assert_eq!(
      detail.display_copy,
      "⚠️ Only 12 hardness contribution (need 29+) • Bars stay soft, deform easily, short shelf life \
       • Try palm oil instead: 49% palmitic + stearic for bar structure"
    );
    assert_eq!(detail.usage_tip, None);
  }

  #[test]
  fn detail_copy_per_tier() {
    let context = ctx(vec![(olive(), 40.0)]);
    let high = generate_detail(&catalogue(), &palm(), &context, 80.0, 25.0, SoapType::Hard, &Config::default());
    assert!(high.display_copy.starts_with("Brings hardness to "), "{}", high.display_copy);
    assert!(high.display_copy.contains("49% palmitic + stearic • Saturated fats"));
    assert!(high.display_copy.ends_with("Bars will unmold faster and last 3-4 weeks of daily use"));

    let good = generate_detail(&catalogue(), &palm(), &context, 60.0, 25.0, SoapType::Hard, &Config::default());
    assert!(good.display_copy.starts_with("Adds 49% palmitic + stearic for saturated fats"));
    assert!(good.display_copy.ends_with("Best at 25% of recipe"));

    let neutral = generate_detail(&catalogue(), &palm(), &context, 40.0, 25.0, SoapType::Hard, &Config::default());
    assert!(neutral.display_copy.ends_with("Use sparingly, max 25%"));

    // Palm moves hardness, conditioning and creamy by 13 each; the tie keeps hardness.
    let creamy = high.quality_projections.iter().find(|p| p.quality == Quality::Creamy).unwrap();
    assert_eq!((creamy.current, creamy.projected), (15.0, 28.0));

    // Every projected quality lands inside its bar-soap range.
    let balanced = oil("balanced", OilCategory::SoftOil, [12.0, 4.0, 14.0, 5.0, 0.0, 45.0, 15.0, 0.0], 60, 150);
    let none = generate_detail(&catalogue(), &balanced, &ctx(vec![]), 10.0, 30.0, SoapType::Hard, &Config::default());
    assert!(none.problems.is_empty());
    assert_eq!(none.display_copy, "Not recommended for this recipe");
  }

  #[test]
  fn top_tier_copy_leads_with_the_largest_move() {
    // Olive 40% plus coconut 25%: hardness 15 -> 40, cleansing 0 -> 26,
    // conditioning 83 -> 55, bubbly 0 -> 26. Conditioning moves furthest.
    let context = ctx(vec![(olive(), 40.0)]);
    let detail = generate_detail(&catalogue(), &coconut(), &context, 85.0, 25.0, SoapType::Hard, &Config::default());
    assert_eq!(detail.quality_projections[0].quality, Quality::Hardness);
    assert!(
      detail.display_copy.starts_with("Brings conditioning to 55 (ideal range)"),
      "{}",
      detail.display_copy
    );
    assert!(!detail.display_copy.contains("unmold"));
  }

  #[test]
  fn top_tier_copy_names_the_largest_contribution() {
    let context = ctx(vec![(olive(), 40.0)]);
    let projections = project_qualities(&castor(), 8.0, &context, SoapType::Hard);
    let contribution = |acid: &str, percentage: f64| FattyAcidContribution {
      acid: acid.to_string(),
      percentage,
      why_helpful: format!("{} helps", acid),
    };
    let contributions = [contribution("Linoleic", 35.0), contribution("Ricinoleic", 90.0)];
    let copy = display_copy(
      &catalogue(),
      ScoreCategory::HighlyRecommended,
      &contributions,
      &projections,
      &[],
      &[],
      8.0,
    );
    assert!(copy.contains("90% ricinoleic • Ricinoleic helps"), "{}", copy);
    assert!(!copy.contains("linoleic"), "{}", copy);
  }
}
