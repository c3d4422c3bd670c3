//! Oil catalogue: parsed once, read-only for the rest of a scoring pass.

use std::collections::HashSet;

use tracing::warn;

use crate::error::EngineError;
use crate::types::{FattyAcid, OilCategory, OilProfile};

/// SoapCalc reference values for 20 common oils.
const BUNDLED: &str = include_str!("../data/oils.json");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
  oils: Vec<OilProfile>,
}

impl Catalogue {
  /// Validate and index `oils`. Duplicate ids keep their first occurrence.
  pub fn new(oils: Vec<OilProfile>) -> Result<Self, EngineError> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(oils.len());
    for oil in oils {
      validate(&oil)?;
      if !seen.insert(oil.id.clone()) {
        warn!(oil = %oil.id, "duplicate catalogue id skipped");
        continue;
      }
      kept.push(oil);
    }
    Ok(Self { oils: kept })
  }

  /// Parse a JSON array of oil profiles.
  pub fn from_json(raw: &str) -> Result<Self, EngineError> {
    let oils: Vec<OilProfile> = serde_json::from_str(raw)?;
    Self::new(oils)
  }

  pub fn bundled() -> Result<Self, EngineError> {
    Self::from_json(BUNDLED)
  }

  pub fn oils(&self) -> &[OilProfile] {
    &self.oils
  }

  pub fn len(&self) -> usize {
    self.oils.len()
  }

  pub fn is_empty(&self) -> bool {
    self.oils.is_empty()
  }

  pub fn get(&self, id: &str) -> Option<&OilProfile> {
    self.oils.iter().find(|o| o.id == id)
  }

  /// Like `get`, but a missing id is an error.
  pub fn require(&self, id: &str) -> Result<&OilProfile, EngineError> {
    self.get(id).ok_or_else(|| EngineError::UnknownOil(id.to_string()))
  }

  pub fn by_category(&self, category: OilCategory) -> Vec<&OilProfile> {
    self.oils.iter().filter(|o| o.is_category(category)).collect()
  }

  /// Case-insensitive substring match on the oil name.
  pub fn search(&self, query: &str) -> Vec<&OilProfile> {
    let query = query.trim().to_lowercase();
    self
      .oils
      .iter()
      .filter(|o| o.name.to_lowercase().contains(&query))
      .collect()
  }

  /// Distinct categories present, sorted.
  pub fn categories(&self) -> Vec<OilCategory> {
    let mut categories: Vec<OilCategory> = self.oils.iter().filter_map(|o| o.category).collect();
    categories.sort();
    categories.dedup();
    categories
  }
}

fn validate(oil: &OilProfile) -> Result<(), EngineError> {
  if oil.id.trim().is_empty() {
    return Err(EngineError::validation("id", "oil id must not be empty"));
  }
  let positive = |v: f64| v.is_finite() && v > 0.0;
  if !positive(oil.sap_naoh) || !positive(oil.sap_koh) {
    return Err(EngineError::validation(
      "sap",
      format!("{}: SAP values must be positive", oil.id),
    ));
  }
  for acid in FattyAcid::ALL {
    let value = oil.fatty_acids.get(acid);
    if !(0.0..=100.0).contains(&value) {
      return Err(EngineError::validation(
        "fatty_acids",
        format!("{}: {} must be within 0-100, got {}", oil.id, acid, value),
      ));
    }
  }
  Ok(())
}
