//! Pairwise oil similarity over fatty-acid vectors.

use crate::types::{FattyAcid, OilProfile, RecipeOil};

/// Largest penalty a single too-similar selected oil can impose.
pub const MAX_SIMILARITY_PENALTY: f64 = 20.0;

/// Similarity in [0, 1]: 1 for the same id, else 1 - mean absolute acid difference / 100.
pub fn similarity(a: &OilProfile, b: &OilProfile) -> f64 {
  if a.id == b.id {
    return 1.0;
  }
  let total_diff: f64 = FattyAcid::ALL
    .iter()
    .map(|&acid| (a.fatty_acids.get(acid) - b.fatty_acids.get(acid)).abs())
    .sum();
  let avg_diff = total_diff / FattyAcid::ALL.len() as f64;
  (1.0 - avg_diff / 100.0).max(0.0)
}

/// Selected oil most similar to `candidate`, with its similarity. First wins on ties.
pub fn find_most_similar<'a>(
  candidate: &OilProfile,
  selected: &'a [RecipeOil],
) -> Option<(&'a RecipeOil, f64)> {
  let mut best: Option<(&RecipeOil, f64)> = None;
  for oil in selected {
    let s = similarity(candidate, &oil.oil);
    if best.map_or(true, |(_, b)| s > b) {
      best = Some((oil, s));
    }
  }
  best
}

/// 0-20 points, driven by the single most similar selected oil.
pub fn similarity_penalty(candidate: &OilProfile, selected: &[RecipeOil]) -> f64 {
  find_most_similar(candidate, selected)
    .map(|(_, s)| s * MAX_SIMILARITY_PENALTY)
    .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::chemistry::tests::{castor, coconut, oil, olive};
  use crate::types::OilCategory;
  use approx::assert_abs_diff_eq;
  use proptest::prelude::*;

  #[test]
  fn same_id_is_identical() {
    assert_eq!(similarity(&olive(), &olive()), 1.0);
  }

  #[test]
  fn similarity_from_mean_difference() {
    // |48|+|19|+|2|+|1|+0+|64|+|8|+|1| = 143 over 8 acids = 17.875
    assert_abs_diff_eq!(similarity(&coconut(), &olive()), 1.0 - 17.875 / 100.0, epsilon = 1e-12);
  }

  #[test]
  fn penalty_uses_most_similar_selected_oil() {
    let selected = vec![RecipeOil::new(coconut(), 30.0), RecipeOil::new(castor(), 10.0)];
    let avocado = oil("avocado-oil", OilCategory::LiquidOil, [0.0, 0.0, 12.0, 2.0, 0.0, 68.0, 13.0, 1.0], 86, 99);
    let (most, s) = find_most_similar(&avocado, &selected).unwrap();
    assert_eq!(most.id(), "coconut-oil-76");
    assert_abs_diff_eq!(similarity_penalty(&avocado, &selected), s * 20.0, epsilon = 1e-12);
  }

  #[test]
  fn empty_selection_has_no_penalty() {
    assert!(find_most_similar(&olive(), &[]).is_none());
    assert_eq!(similarity_penalty(&olive(), &[]), 0.0);
  }

  fn acids() -> impl Strategy<Value = [f64; 8]> {
    prop::array::uniform8(0.0f64..100.0)
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_similarity_symmetric_and_bounded(a in acids(), b in acids()) {
      let x = oil("x", OilCategory::LiquidOil, a, 0, 0);
      let y = oil("y", OilCategory::LiquidOil, b, 0, 0);
      let s = similarity(&x, &y);
      prop_assert_eq!(s, similarity(&y, &x));
      prop_assert!((0.0..=1.0).contains(&s));
      prop_assert_eq!(similarity(&x, &x), 1.0);
    }
  }
}
