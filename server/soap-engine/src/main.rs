//! Binary entrypoint: read one JSON request from stdin, write one JSON response to stdout.
//!
//! On failure the response is an ErrorOutput and the process exits non-zero.
//! Logs go to stderr (`RUST_LOG` overrides the default filter).

use soap_engine::types::ErrorOutput;
use soap_engine::{run, EngineError, Input};
use std::io::{self, Read, Write};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "soap_engine=info,warn".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();

  if let Err(e) = run_binary() {
    error!(error = %e, "request failed");
    let mut err = match &e {
      EngineError::Validation { reason, .. } => ErrorOutput::new(reason.clone()),
      _ => ErrorOutput::new(e.to_string()),
    };
    if let Some(field) = e.field() {
      err = err.with_field(field);
    }
    let mut out = io::stdout().lock();
    let _ = serde_json::to_writer(&mut out, &err);
    let _ = writeln!(out);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), EngineError> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let input: Input = serde_json::from_str(&raw)?;

  let out = run(&input)?;
  info!(
    oils = input.oils.len(),
    total = out.validation.total_percentage,
    recommendations = out.recommendations.len(),
    incompatible = out.incompatible_oil_ids.len(),
    "request served"
  );

  let json = serde_json::to_vec(&out)?;
  let mut stdout = io::stdout().lock();
  stdout.write_all(&json)?;
  writeln!(stdout)?;
  Ok(())
}
