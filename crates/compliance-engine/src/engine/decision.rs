//! The engine's sole output: a freshly-computed decision per call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{GroundKind, Jurisdiction, Product, RouteId, Severity, Stage};

/// A triggered rule, tagged with the facts and stage that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub code: String,
    pub route: RouteId,
    pub facts: Vec<String>,
    pub message: String,
    pub citation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub stage: Stage,
    pub severity: Severity,
    /// True when the rule's confirmation fact records the user has already
    /// resolved the underlying problem; the issue is retained as a note.
    #[serde(default)]
    pub acknowledged: bool,
}

/// A ground the facts currently support, with its ranking rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundRecommendation {
    pub route: RouteId,
    pub ground: String,
    pub name: String,
    pub kind: GroundKind,
    pub citation: String,
    pub rationale: String,
    /// Headroom over the ground's numeric threshold, where one applies.
    /// Larger margins rank higher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
}

/// Marker for a jurisdiction/product pair with no configured rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedCombination {
    pub jurisdiction: Jurisdiction,
    pub product: Product,
    pub message: String,
}

/// Complete decision for one validation call. Recomputed fresh every time;
/// nothing is cached between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub jurisdiction: Jurisdiction,
    pub product: Product,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsupported: Option<UnsupportedCombination>,
    pub allowed_routes: Vec<RouteId>,
    pub blocked_routes: Vec<RouteId>,
    pub recommended_routes: Vec<RouteId>,
    pub recommended_grounds: Vec<GroundRecommendation>,
    pub blocking_issues: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub route_explanations: BTreeMap<RouteId, String>,
    /// Best available route to fall back to when the selected route is
    /// blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_alternative: Option<RouteId>,
}

impl DecisionResult {
    pub(crate) fn empty(jurisdiction: Jurisdiction, product: Product, stage: Stage) -> Self {
        Self {
            jurisdiction,
            product,
            stage,
            unsupported: None,
            allowed_routes: Vec::new(),
            blocked_routes: Vec::new(),
            recommended_routes: Vec::new(),
            recommended_grounds: Vec::new(),
            blocking_issues: Vec::new(),
            warnings: Vec::new(),
            route_explanations: BTreeMap::new(),
            suggested_alternative: None,
        }
    }

    pub(crate) fn unsupported(jurisdiction: Jurisdiction, product: Product, stage: Stage) -> Self {
        let mut result = Self::empty(jurisdiction, product, stage);
        result.unsupported = Some(UnsupportedCombination {
            jurisdiction,
            product,
            message: format!(
                "{} products are not currently supported in {}",
                capitalise(product.label()),
                jurisdiction.label()
            ),
        });
        result
    }

    pub fn is_route_blocked(&self, route: &RouteId) -> bool {
        self.blocked_routes.contains(route)
    }

    /// Issues for one route, blocking first.
    pub fn issues_for_route(&self, route: &RouteId) -> Vec<&Issue> {
        self.blocking_issues
            .iter()
            .chain(self.warnings.iter())
            .filter(|issue| &issue.route == route)
            .collect()
    }
}

fn capitalise(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
