use crate::error::AppError;
use compliance_engine::config::AppConfig;
use compliance_engine::engine::{RuleRegistry, ValidationOrchestrator};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads rule documents from the configured directory when one is set,
/// falling back to the compiled-in rule sets.
pub(crate) fn build_orchestrator(config: &AppConfig) -> Result<ValidationOrchestrator, AppError> {
    let registry = match config.rules.rule_set_dir.as_deref() {
        Some(dir) => RuleRegistry::from_dir(dir)?,
        None => RuleRegistry::builtin()?,
    };
    Ok(ValidationOrchestrator::new(registry))
}

pub(crate) fn parse_date(raw: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
