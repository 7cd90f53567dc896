//! Validation orchestrator: the engine's single entry point.
//!
//! Stateless and side-effect-free. Every call normalizes the raw answers,
//! dispatches to the jurisdiction's analyzer, and merges route assessments
//! into one `DecisionResult`. The unsupported-combination check runs first,
//! before any rule evaluation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::analyzer::{
    AnalysisContext, EnglandAnalyzer, RouteAnalyzer, RouteAssessment, ScotlandAnalyzer,
    WalesAnalyzer,
};
use super::decision::DecisionResult;
use super::domain::{Jurisdiction, Product, RouteId, Stage};
use super::facts;
use super::rules::RuleRegistry;

/// One validation call. `today` is the explicit reference date for all
/// notice-period arithmetic; the engine never reads the system clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub answers: BTreeMap<String, Value>,
    pub jurisdiction: Jurisdiction,
    pub product: Product,
    pub stage: Stage,
    #[serde(default)]
    pub selected_route: Option<RouteId>,
    pub today: NaiveDate,
}

pub struct ValidationOrchestrator {
    registry: RuleRegistry,
    analyzers: Vec<Box<dyn RouteAnalyzer>>,
}

impl ValidationOrchestrator {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            analyzers: vec![
                Box::new(EnglandAnalyzer),
                Box::new(WalesAnalyzer),
                Box::new(ScotlandAnalyzer),
            ],
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Evaluate the case. Compliance problems come back as data inside the
    /// `DecisionResult`; this never fails for a case that merely has issues.
    pub fn validate(&self, request: &ValidationRequest) -> DecisionResult {
        // Unsupported combinations short-circuit before any rule evaluation.
        let Some(rule_set) = self
            .registry
            .rule_set(request.jurisdiction, request.product)
        else {
            return DecisionResult::unsupported(request.jurisdiction, request.product, request.stage);
        };
        let Some(analyzer) = self
            .analyzers
            .iter()
            .find(|analyzer| analyzer.jurisdiction() == request.jurisdiction)
        else {
            return DecisionResult::unsupported(request.jurisdiction, request.product, request.stage);
        };

        let case_facts = facts::normalize(&request.answers, request.today);
        let ctx = AnalysisContext {
            facts: &case_facts,
            stage: request.stage,
            today: request.today,
        };
        let assessments = analyzer.analyze(rule_set, &ctx);
        debug!(
            jurisdiction = ?request.jurisdiction,
            product = ?request.product,
            stage = ?request.stage,
            routes = assessments.len(),
            "assessed candidate routes"
        );

        merge(request, assessments)
    }
}

fn merge(request: &ValidationRequest, assessments: Vec<RouteAssessment>) -> DecisionResult {
    let mut result = DecisionResult::empty(request.jurisdiction, request.product, request.stage);

    for assessment in &assessments {
        if assessment.is_blocked() {
            result.blocked_routes.push(assessment.route.clone());
        } else {
            result.allowed_routes.push(assessment.route.clone());
        }
        result.blocking_issues.extend(assessment.blocking.clone());
        result.warnings.extend(assessment.warnings.clone());
        result.recommended_grounds.extend(assessment.grounds.clone());
        result
            .route_explanations
            .insert(assessment.route.clone(), explain(assessment));
    }

    result.recommended_routes = recommend(&assessments);

    if let Some(selected) = &request.selected_route {
        if result.is_route_blocked(selected) {
            result.suggested_alternative = result
                .recommended_routes
                .iter()
                .chain(result.allowed_routes.iter())
                .find(|route| *route != selected)
                .cloned();
        }
    }

    result
}

fn explain(assessment: &RouteAssessment) -> String {
    if let Some(first) = assessment.blocking.first() {
        return format!(
            "{} is blocked: {} ({})",
            assessment.name, first.message, first.citation
        );
    }
    let mut explanation = format!("{} is available: {}", assessment.name, assessment.summary);
    if let Some(best) = assessment.grounds.first() {
        explanation.push_str(&format!("; strongest ground is {}", best.name));
    }
    if !assessment.warnings.is_empty() {
        explanation.push_str(&format!(
            " ({} warning{} outstanding)",
            assessment.warnings.len(),
            if assessment.warnings.len() == 1 { "" } else { "s" }
        ));
    }
    explanation
}

/// Score allowed routes: a made-out mandatory ground beats discretionary
/// support, which beats no grounds at all; a clean run with no warnings
/// breaks ties. Every route sharing the top score is recommended, in
/// document order.
fn recommend(assessments: &[RouteAssessment]) -> Vec<RouteId> {
    let scored: Vec<(i32, &RouteAssessment)> = assessments
        .iter()
        .filter(|assessment| !assessment.is_blocked())
        .map(|assessment| {
            let mut score = 0;
            if assessment.has_mandatory_ground() {
                score += 2;
            }
            if !assessment.grounds.is_empty() {
                score += 1;
            }
            if assessment.warnings.is_empty() {
                score += 1;
            }
            (score, assessment)
        })
        .collect();

    let Some(top) = scored.iter().map(|(score, _)| *score).max() else {
        return Vec::new();
    };
    scored
        .into_iter()
        .filter(|(score, _)| *score == top)
        .map(|(_, assessment)| assessment.route.clone())
        .collect()
}
