//! The multi-jurisdiction compliance decision engine.
//!
//! Control flow per call: orchestrator → fact normalizer → route analyzer
//! (delegating arithmetic to the compliance evaluator) → merged decision.
//! The whole pipeline is pure: identical inputs, including the passed-in
//! reference date, always produce an identical `DecisionResult`.

pub mod analyzer;
pub mod compliance;
pub mod decision;
pub mod domain;
pub mod facts;
pub mod orchestrator;
pub mod rules;

pub use decision::{DecisionResult, GroundRecommendation, Issue, UnsupportedCombination};
pub use domain::{GroundKind, Jurisdiction, Product, RouteId, Severity, Stage};
pub use orchestrator::{ValidationOrchestrator, ValidationRequest};
pub use rules::{RegistryError, RuleRegistry};
