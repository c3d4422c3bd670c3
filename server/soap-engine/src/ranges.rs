//! Acceptable and ideal quality ranges per soap type (SoapCalc-style bands).

use serde::Serialize;

use crate::types::{Band, Quality, QualityRange, SoapType};

/// One complete set of ranges, indexed by quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityRanges {
  pub hardness: QualityRange,
  pub cleansing: QualityRange,
  pub conditioning: QualityRange,
  pub bubbly: QualityRange,
  pub creamy: QualityRange,
  pub iodine: QualityRange,
  pub ins: QualityRange,
}

const fn range(min: f64, max: f64, ideal_min: f64, ideal_max: f64) -> QualityRange {
  QualityRange {
    min,
    max,
    ideal: Some(Band::new(ideal_min, ideal_max)),
  }
}

/// Bar soap: the ideal band is the whole acceptable band.
pub const HARD_SOAP_RANGES: QualityRanges = QualityRanges {
  hardness: range(29.0, 54.0, 29.0, 54.0),
  cleansing: range(12.0, 22.0, 12.0, 22.0),
  conditioning: range(44.0, 69.0, 44.0, 69.0),
  bubbly: range(14.0, 46.0, 14.0, 46.0),
  creamy: range(16.0, 48.0, 16.0, 48.0),
  iodine: range(41.0, 70.0, 41.0, 70.0),
  ins: range(136.0, 165.0, 136.0, 165.0),
};

/// Liquid (KOH) soap: soft, highly conditioning, with tighter ideal bands.
pub const LIQUID_SOAP_RANGES: QualityRanges = QualityRanges {
  hardness: range(5.0, 15.0, 8.0, 12.0),
  cleansing: range(10.0, 20.0, 12.0, 16.0),
  conditioning: range(65.0, 80.0, 72.0, 77.0),
  bubbly: range(5.0, 12.0, 7.0, 10.0),
  creamy: range(50.0, 70.0, 58.0, 65.0),
  iodine: range(65.0, 85.0, 72.0, 78.0),
  ins: range(70.0, 90.0, 78.0, 85.0),
};

impl QualityRanges {
  pub fn for_soap_type(soap_type: SoapType) -> &'static QualityRanges {
    match soap_type {
      SoapType::Hard => &HARD_SOAP_RANGES,
      SoapType::Liquid => &LIQUID_SOAP_RANGES,
    }
  }

  pub fn get(&self, quality: Quality) -> &QualityRange {
    match quality {
      Quality::Hardness => &self.hardness,
      Quality::Cleansing => &self.cleansing,
      Quality::Conditioning => &self.conditioning,
      Quality::Bubbly => &self.bubbly,
      Quality::Creamy => &self.creamy,
      Quality::Iodine => &self.iodine,
      Quality::Ins => &self.ins,
    }
  }
}

/// Where a value sits relative to its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityStatus {
  Below,
  InRange,
  Above,
  Ideal,
}

/// Ideal takes precedence over in-range.
pub fn quality_status(quality: Quality, value: f64, soap_type: SoapType) -> QualityStatus {
  let range = QualityRanges::for_soap_type(soap_type).get(quality);
  if range.ideal.is_some_and(|ideal| ideal.contains(value)) {
    return QualityStatus::Ideal;
  }
  if value < range.min {
    QualityStatus::Below
  } else if value > range.max {
    QualityStatus::Above
  } else {
    QualityStatus::InRange
  }
}

/// Position of `value` inside its range as 0-100 (clamped).
pub fn quality_percentage(quality: Quality, value: f64, soap_type: SoapType) -> f64 {
  let range = QualityRanges::for_soap_type(soap_type).get(quality);
  let pct = (value - range.min) / (range.max - range.min) * 100.0;
  pct.clamp(0.0, 100.0)
}
