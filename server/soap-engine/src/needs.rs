//! Recipe needs: which quality minimums are unmet, and which oils can fill them.

use crate::ranges::QualityRanges;
use crate::types::{Need, OilCategory, OilProfile, QualityProfile, SoapType};

/// Needs for every primary quality below its soap-type minimum, in `Need::ALL` order.
pub fn identify_needs(qualities: &QualityProfile, soap_type: SoapType) -> Vec<Need> {
  let ranges = QualityRanges::for_soap_type(soap_type);
  Need::ALL
    .into_iter()
    .filter(|need| {
      let quality = need.quality();
      qualities.get(quality) < ranges.get(quality).min
    })
    .collect()
}

/// Category and acid-threshold rules for whether `oil` addresses `need`.
pub fn oil_fulfills_need(oil: &OilProfile, need: Need, soap_type: SoapType) -> bool {
  let fa = &oil.fatty_acids;
  match need {
    // Liquid soap never wants hardness-boosting oils.
    Need::Hardness => {
      soap_type == SoapType::Hard
        && (fa.palmitic > 20.0
          || fa.stearic > 20.0
          || oil.is_category(OilCategory::HardOil)
          || oil.is_category(OilCategory::Butter))
    }
    Need::Cleansing => fa.lauric > 30.0 || fa.myristic > 10.0,
    Need::Conditioning => fa.oleic > 40.0 || fa.linoleic > 30.0 || fa.ricinoleic > 50.0,
    Need::BubblyLather => fa.lauric > 30.0 || fa.ricinoleic > 50.0 || is_castor(oil),
    Need::CreamyLather => fa.palmitic > 20.0 || fa.stearic > 20.0 || fa.ricinoleic > 50.0,
  }
}

pub(crate) fn is_castor(oil: &OilProfile) -> bool {
  oil.id == "castor-oil"
}
