use crate::config::ConfigError;
use crate::engine::rules::RegistryError;
use crate::telemetry::TelemetryError;

/// Failures that can stop the engine from being hosted at all. Case-level
/// compliance problems are never errors; they travel inside
/// [`crate::engine::DecisionResult`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("rule registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}
