//! Structured error types for the soap engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("unknown oil: {0}")]
  UnknownOil(String),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}

impl EngineError {
  pub fn validation(field: &str, reason: impl Into<String>) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.into(),
    }
  }

  /// Field name for validation errors, used by the binary's error output.
  pub fn field(&self) -> Option<&str> {
    match self {
      Self::Validation { field, .. } => Some(field),
      Self::UnknownOil(_) => Some("oils"),
      Self::Json(_) | Self::Io(_) => None,
    }
  }
}
