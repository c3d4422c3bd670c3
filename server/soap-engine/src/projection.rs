//! Impact projection: how adding one oil moves each primary quality.

use crate::chemistry::simulate_addition;
use crate::ranges::QualityRanges;
use crate::types::{Band, OilProfile, Quality, QualityProjection, RecommendationContext, SoapType};

/// Changes of one point or less are rounding noise.
const MIN_MEANINGFUL_CHANGE: f64 = 1.0;

/// Per-quality before/after for `oil` added at `percentage`, skipping noise-level changes.
pub fn project_qualities(
  oil: &OilProfile,
  percentage: f64,
  context: &RecommendationContext,
  soap_type: SoapType,
) -> Vec<QualityProjection> {
  let projected = simulate_addition(&context.current_oils, oil, percentage);
  let ranges = QualityRanges::for_soap_type(soap_type);

  Quality::PRIMARY
    .into_iter()
    .filter_map(|quality| {
      let current = context.current_qualities.get(quality);
      let after = projected.get(quality);
      if (after - current).abs() <= MIN_MEANINGFUL_CHANGE {
        return None;
      }
      let range = ranges.get(quality);
      let moves_toward_ideal = match range.ideal {
        Some(ideal) => moves_toward_midpoint(current, after, ideal),
        None => moves_toward_range(current, after, range.band()),
      };
      Some(QualityProjection {
        quality,
        current: current.round(),
        projected: after.round(),
        range: range.band(),
        moves_toward_ideal,
      })
    })
    .collect()
}

pub(crate) fn moves_toward_midpoint(current: f64, projected: f64, band: Band) -> bool {
  let mid = band.midpoint();
  (projected - mid).abs() < (current - mid).abs()
}

/// Below the band any increase improves, above it any decrease; inside, closer to centre.
pub(crate) fn moves_toward_range(current: f64, projected: f64, band: Band) -> bool {
  if band.contains(current) {
    moves_toward_midpoint(current, projected, band)
  } else if current < band.min {
    projected > current
  } else {
    projected < current
  }
}
