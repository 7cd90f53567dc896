//! Declarative rule sets.
//!
//! Statutory rules are data, not code: one JSON document per
//! (jurisdiction, product) holds the routes, their grounds, and their rules.
//! The engine interprets a small tagged condition tree over canonical facts,
//! so new statutory rules ship as configuration without touching evaluation
//! logic.

mod condition;
mod registry;

use serde::{Deserialize, Serialize};

use super::compliance::{DepositCapPolicy, NoticePeriod};
use super::domain::{GroundKind, Jurisdiction, Product, RouteId, Severity, Stage};

pub use condition::{BuiltinCheck, Condition, ConditionOutcome};
pub(crate) use condition::{evaluate, CheckContext};
pub use registry::{RegistryError, RuleRegistry, RuleSet};

/// One declarative rule-set document, as loaded from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetDocument {
    pub jurisdiction: Jurisdiction,
    pub product: Product,
    pub routes: Vec<RouteSpec>,
}

/// A legal route (notice type or claim pathway) and everything needed to
/// assess it: its grounds, its rules, and the arithmetic policies the
/// builtin checks delegate to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub id: RouteId,
    pub name: String,
    pub citation: String,
    /// One-line explanation shown when the route is available.
    pub summary: String,
    /// Default minimum notice period for the route, where one applies.
    #[serde(default)]
    pub notice_period: Option<NoticePeriod>,
    /// Deposit cap applicable when drafting or serving under this route.
    #[serde(default)]
    pub deposit_cap: Option<DepositCapPolicy>,
    #[serde(default)]
    pub grounds: Vec<GroundSpec>,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// A statutory ground underlying a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundSpec {
    pub id: String,
    pub name: String,
    pub kind: GroundKind,
    pub citation: String,
    /// Facts that must be made out for the ground to be available.
    pub requires: Condition,
    /// Numeric fact used to rank evidentiary strength, with the threshold the
    /// statute sets. A ground comfortably over its threshold outranks one
    /// barely meeting it.
    #[serde(default)]
    pub strength_fact: Option<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Ground-specific minimum notice period overriding the route default.
    #[serde(default)]
    pub notice_period: Option<NoticePeriod>,
}

/// A declarative compliance rule.
///
/// `warn_from`/`block_from` give the stage at which a triggered rule starts
/// to warn or block. Severity is monotone in stage by construction: once a
/// rule blocks it keeps blocking at every later stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub code: String,
    /// Canonical fact keys this rule is about, for issue tagging.
    #[serde(default)]
    pub facts: Vec<String>,
    pub condition: Condition,
    #[serde(default)]
    pub warn_from: Option<Stage>,
    #[serde(default)]
    pub block_from: Option<Stage>,
    pub message: String,
    pub citation: String,
    #[serde(default)]
    pub hint: Option<String>,
    /// Confirmation fact that, when answered `true`, records the user has
    /// resolved the underlying problem. A confirmed rule is reported as an
    /// advisory note and never blocks; severity is never downgraded any
    /// other way.
    #[serde(default)]
    pub resolved_by: Option<String>,
}

impl RuleSpec {
    /// Severity of this rule when triggered at `stage`; `None` means the
    /// rule stays silent this early in the flow.
    pub fn severity_at(&self, stage: Stage) -> Option<Severity> {
        if let Some(from) = self.block_from {
            if stage >= from {
                return Some(Severity::Block);
            }
        }
        if let Some(from) = self.warn_from {
            if stage >= from {
                return Some(Severity::Warn);
            }
        }
        None
    }
}
