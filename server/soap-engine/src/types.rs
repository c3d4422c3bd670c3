//! Core types for the soap engine (oil data, recipe state, recommendation records).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::chemistry::PercentageCheck;
use crate::config::Config;
use crate::recipe::{CalculationResults, RecipeInputs};

// ---------------------------------------------------------------------------
// Fatty acids
// ---------------------------------------------------------------------------

/// The eight fatty acids tracked per oil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FattyAcid {
  Lauric,
  Myristic,
  Palmitic,
  Stearic,
  Ricinoleic,
  Oleic,
  Linoleic,
  Linolenic,
}

impl FattyAcid {
  pub const ALL: [FattyAcid; 8] = [
    Self::Lauric,
    Self::Myristic,
    Self::Palmitic,
    Self::Stearic,
    Self::Ricinoleic,
    Self::Oleic,
    Self::Linoleic,
    Self::Linolenic,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::Lauric => "lauric",
      Self::Myristic => "myristic",
      Self::Palmitic => "palmitic",
      Self::Stearic => "stearic",
      Self::Ricinoleic => "ricinoleic",
      Self::Oleic => "oleic",
      Self::Linoleic => "linoleic",
      Self::Linolenic => "linolenic",
    }
  }
}

impl fmt::Display for FattyAcid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Percentages (0-100) of each fatty acid. Need not sum to exactly 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FattyAcidProfile {
  #[serde(default)]
  pub lauric: f64,
  #[serde(default)]
  pub myristic: f64,
  #[serde(default)]
  pub palmitic: f64,
  #[serde(default)]
  pub stearic: f64,
  #[serde(default)]
  pub ricinoleic: f64,
  #[serde(default)]
  pub oleic: f64,
  #[serde(default)]
  pub linoleic: f64,
  #[serde(default)]
  pub linolenic: f64,
}

impl FattyAcidProfile {
  pub fn get(&self, acid: FattyAcid) -> f64 {
    match acid {
      FattyAcid::Lauric => self.lauric,
      FattyAcid::Myristic => self.myristic,
      FattyAcid::Palmitic => self.palmitic,
      FattyAcid::Stearic => self.stearic,
      FattyAcid::Ricinoleic => self.ricinoleic,
      FattyAcid::Oleic => self.oleic,
      FattyAcid::Linoleic => self.linoleic,
      FattyAcid::Linolenic => self.linolenic,
    }
  }

  pub fn get_mut(&mut self, acid: FattyAcid) -> &mut f64 {
    match acid {
      FattyAcid::Lauric => &mut self.lauric,
      FattyAcid::Myristic => &mut self.myristic,
      FattyAcid::Palmitic => &mut self.palmitic,
      FattyAcid::Stearic => &mut self.stearic,
      FattyAcid::Ricinoleic => &mut self.ricinoleic,
      FattyAcid::Oleic => &mut self.oleic,
      FattyAcid::Linoleic => &mut self.linoleic,
      FattyAcid::Linolenic => &mut self.linolenic,
    }
  }

  /// Acid with the highest percentage; ties resolve to the earlier acid in `FattyAcid::ALL`.
  pub fn dominant(&self) -> FattyAcid {
    let mut best = FattyAcid::Lauric;
    for acid in FattyAcid::ALL {
      if self.get(acid) > self.get(best) {
        best = acid;
      }
    }
    best
  }

  /// Palmitic + stearic: the saturates that give bars their structure.
  pub fn hardening_saturates(&self) -> f64 {
    self.palmitic + self.stearic
  }
}

// ---------------------------------------------------------------------------
// Oils
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OilCategory {
  #[serde(rename = "Hard Oil")]
  HardOil,
  #[serde(rename = "Soft Oil")]
  SoftOil,
  #[serde(rename = "Liquid Oil")]
  LiquidOil,
  #[serde(rename = "Butter")]
  Butter,
  #[serde(rename = "Animal Fat")]
  AnimalFat,
  #[serde(rename = "Fatty Acid")]
  FattyAcid,
}

impl OilCategory {
  pub fn label(self) -> &'static str {
    match self {
      Self::HardOil => "Hard Oil",
      Self::SoftOil => "Soft Oil",
      Self::LiquidOil => "Liquid Oil",
      Self::Butter => "Butter",
      Self::AnimalFat => "Animal Fat",
      Self::FattyAcid => "Fatty Acid",
    }
  }
}

/// One catalogue oil. Immutable, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OilProfile {
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<OilCategory>,
  pub sap_naoh: f64,
  pub sap_koh: f64,
  pub iodine: u32,
  pub ins: u32,
  pub fatty_acids: FattyAcidProfile,
}

impl OilProfile {
  pub fn is_category(&self, category: OilCategory) -> bool {
    self.category == Some(category)
  }

  pub fn sap(&self, lye: LyeType) -> f64 {
    match lye {
      LyeType::NaOH => self.sap_naoh,
      LyeType::KOH => self.sap_koh,
    }
  }
}

/// An oil in the recipe being edited, with its share of the total oil weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeOil {
  #[serde(flatten)]
  pub oil: OilProfile,
  pub percentage: f64,
  /// Derived from `percentage` and the batch's oil weight.
  #[serde(default)]
  pub weight: f64,
}

impl RecipeOil {
  pub fn new(oil: OilProfile, percentage: f64) -> Self {
    Self {
      oil,
      percentage,
      weight: 0.0,
    }
  }

  pub fn id(&self) -> &str {
    &self.oil.id
  }
}

// ---------------------------------------------------------------------------
// Recipe enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoapType {
  #[default]
  Hard,
  Liquid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LyeType {
  #[default]
  NaOH,
  KOH,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterMethod {
  #[default]
  WaterAsPercentOfOils,
  LyeConcentration,
  WaterToLyeRatio,
}

// ---------------------------------------------------------------------------
// Qualities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
  Hardness,
  Cleansing,
  Conditioning,
  Bubbly,
  Creamy,
  Iodine,
  Ins,
}

impl Quality {
  /// Qualities derived from the fatty-acid profile; the ones scoring and projection act on.
  pub const PRIMARY: [Quality; 5] = [
    Self::Hardness,
    Self::Cleansing,
    Self::Conditioning,
    Self::Bubbly,
    Self::Creamy,
  ];

  pub const ALL: [Quality; 7] = [
    Self::Hardness,
    Self::Cleansing,
    Self::Conditioning,
    Self::Bubbly,
    Self::Creamy,
    Self::Iodine,
    Self::Ins,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::Hardness => "hardness",
      Self::Cleansing => "cleansing",
      Self::Conditioning => "conditioning",
      Self::Bubbly => "bubbly",
      Self::Creamy => "creamy",
      Self::Iodine => "iodine",
      Self::Ins => "ins",
    }
  }
}

impl fmt::Display for Quality {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// The seven derived soap metrics, each rounded to the nearest integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityProfile {
  pub hardness: f64,
  pub cleansing: f64,
  pub conditioning: f64,
  pub bubbly: f64,
  pub creamy: f64,
  pub iodine: f64,
  pub ins: f64,
}

impl QualityProfile {
  pub fn get(&self, quality: Quality) -> f64 {
    match quality {
      Quality::Hardness => self.hardness,
      Quality::Cleansing => self.cleansing,
      Quality::Conditioning => self.conditioning,
      Quality::Bubbly => self.bubbly,
      Quality::Creamy => self.creamy,
      Quality::Iodine => self.iodine,
      Quality::Ins => self.ins,
    }
  }
}

/// Closed numeric band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
  pub min: f64,
  pub max: f64,
}

impl Band {
  pub const fn new(min: f64, max: f64) -> Self {
    Self { min, max }
  }

  pub fn midpoint(&self) -> f64 {
    (self.min + self.max) / 2.0
  }

  pub fn contains(&self, value: f64) -> bool {
    value >= self.min && value <= self.max
  }

  /// Zero inside the band, else the distance to the nearer edge.
  pub fn distance(&self, value: f64) -> f64 {
    if value < self.min {
      self.min - value
    } else if value > self.max {
      value - self.max
    } else {
      0.0
    }
  }
}

/// Acceptable band for one quality, with an optional tighter ideal band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityRange {
  pub min: f64,
  pub max: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ideal: Option<Band>,
}

impl QualityRange {
  pub fn band(&self) -> Band {
    Band::new(self.min, self.max)
  }
}

// ---------------------------------------------------------------------------
// Needs
// ---------------------------------------------------------------------------

/// A quality dimension the recipe is currently below minimum on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Need {
  Hardness,
  Cleansing,
  Conditioning,
  BubblyLather,
  CreamyLather,
}

impl Need {
  /// Fixed enumeration order; also the order needs are reported in.
  pub const ALL: [Need; 5] = [
    Self::Hardness,
    Self::Cleansing,
    Self::Conditioning,
    Self::BubblyLather,
    Self::CreamyLather,
  ];

  pub fn tag(self) -> &'static str {
    match self {
      Self::Hardness => "hardness",
      Self::Cleansing => "cleansing",
      Self::Conditioning => "conditioning",
      Self::BubblyLather => "bubbly_lather",
      Self::CreamyLather => "creamy_lather",
    }
  }

  pub fn quality(self) -> Quality {
    match self {
      Self::Hardness => Quality::Hardness,
      Self::Cleansing => Quality::Cleansing,
      Self::Conditioning => Quality::Conditioning,
      Self::BubblyLather => Quality::Bubbly,
      Self::CreamyLather => Quality::Creamy,
    }
  }
}

// ---------------------------------------------------------------------------
// Recommendation context (input)
// ---------------------------------------------------------------------------

/// Transient view of the recipe being edited. Rebuilt on every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationContext {
  pub current_oils: Vec<RecipeOil>,
  pub current_percentage: f64,
  pub current_qualities: QualityProfile,
  pub current_fatty_acids: FattyAcidProfile,
}

impl RecommendationContext {
  pub fn contains(&self, oil_id: &str) -> bool {
    self.current_oils.iter().any(|o| o.oil.id == oil_id)
  }

  pub fn remaining_percentage(&self) -> f64 {
    100.0 - self.current_percentage
  }
}

// ---------------------------------------------------------------------------
// Scoring output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityFactors {
  pub complements_fatty_acids: bool,
  /// Tags like `increases_hardness`, `decreases_cleansing`, `optimizes_creamy`.
  pub improves_quality: Vec<String>,
  /// Need tags the oil fulfils, plus `base_hard_oil` / `base_soft_oil` for a first oil.
  pub fills_needs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityScore {
  pub score: f64,
  pub reason: String,
  pub suggested_percentage: f64,
  pub predicted_impact: String,
  pub factors: CompatibilityFactors,
}

// ---------------------------------------------------------------------------
// Explanation output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
  HighlyRecommended,
  GoodMatch,
  Neutral,
  Caution,
  Incompatible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
  Green,
  Blue,
  Yellow,
  Orange,
  Red,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FattyAcidContribution {
  pub acid: String,
  pub percentage: f64,
  pub why_helpful: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityProjection {
  pub quality: Quality,
  pub current: f64,
  pub projected: f64,
  pub range: Band,
  pub moves_toward_ideal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
  WrongSoapType,
  TooSimilar,
  PushesOutOfRange,
  DosRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncompatibilityProblem {
  #[serde(rename = "type")]
  pub kind: ProblemKind,
  /// Set for `PushesOutOfRange`: the quality that leaves its band.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub quality: Option<Quality>,
  pub details: String,
  pub numeric_issue: String,
  pub visual_result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetterAlternative {
  pub oil_id: String,
  pub why_better: String,
  pub specific_advantage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advantage {
  pub oil_id: String,
  pub metric: String,
  pub improvement: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparativeAnalysis {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub similar_to: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub overlap_percentage: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub advantage_over: Option<Advantage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationDetail {
  pub score: f64,
  pub score_category: ScoreCategory,
  pub card_color: CardColor,
  pub fatty_acid_contributions: Vec<FattyAcidContribution>,
  pub quality_projections: Vec<QualityProjection>,
  pub comparative_analysis: ComparativeAnalysis,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub problems: Vec<IncompatibilityProblem>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub better_alternatives: Vec<BetterAlternative>,
  pub display_copy: String,
  pub suggested_percentage: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub usage_tip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
  pub oil: OilProfile,
  pub score: f64,
  pub reason: String,
  pub suggested_percentage: f64,
  pub predicted_impact: String,
  pub compatibility_factors: CompatibilityFactors,
  pub detail: RecommendationDetail,
}

// ---------------------------------------------------------------------------
// Binary contract (stdin request, stdout response)
// ---------------------------------------------------------------------------

/// One recipe line in a request: a catalogue id and its share of total oil weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OilSelection {
  pub id: String,
  pub percentage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Input {
  /// Replaces the bundled catalogue when present.
  #[serde(default)]
  pub catalogue: Option<Vec<OilProfile>>,
  #[serde(default)]
  pub oils: Vec<OilSelection>,
  #[serde(default)]
  pub inputs: RecipeInputs,
  #[serde(default)]
  pub max_results: Option<usize>,
  #[serde(default)]
  pub config: Config,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub results: CalculationResults,
  pub validation: PercentageCheck,
  pub recommendations: Vec<RecommendationResult>,
  pub incompatible_oil_ids: BTreeSet<String>,
}

/// Error line written by the binary in place of an `Output`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}
