//! Per-jurisdiction route analysis.
//!
//! The declarative rules carry most of the law; the jurisdiction analyzers
//! add the arithmetic that cannot be expressed as a static predicate, such
//! as ground-dependent notice periods. Dispatch is by jurisdiction tag via
//! the [`RouteAnalyzer`] trait rather than string branching in shared code.

mod england;
mod scotland;
mod wales;

use chrono::NaiveDate;

use super::decision::{GroundRecommendation, Issue};
use super::domain::{GroundKind, Jurisdiction, RouteId, Severity, Stage};
use super::facts::{self, CaseFacts};
use super::rules::{evaluate, CheckContext, ConditionOutcome, RouteSpec, RuleSet, RuleSpec};

pub use england::EnglandAnalyzer;
pub use scotland::ScotlandAnalyzer;
pub use wales::WalesAnalyzer;

/// Inputs shared by every route assessment in one call.
pub struct AnalysisContext<'a> {
    pub facts: &'a CaseFacts,
    pub stage: Stage,
    pub today: NaiveDate,
}

/// Outcome for a single route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAssessment {
    pub route: RouteId,
    pub name: String,
    pub summary: String,
    pub blocking: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub grounds: Vec<GroundRecommendation>,
}

impl RouteAssessment {
    pub fn is_blocked(&self) -> bool {
        !self.blocking.is_empty()
    }

    pub fn has_mandatory_ground(&self) -> bool {
        self.grounds
            .iter()
            .any(|ground| ground.kind == GroundKind::Mandatory)
    }
}

pub trait RouteAnalyzer: Send + Sync {
    fn jurisdiction(&self) -> Jurisdiction;

    /// Assess every route in the rule set against the facts. The default
    /// runs the shared declarative pass and then appends the jurisdiction's
    /// arithmetic extras.
    fn analyze(&self, rule_set: &RuleSet, ctx: &AnalysisContext<'_>) -> Vec<RouteAssessment> {
        rule_set
            .routes
            .iter()
            .map(|route| {
                let mut assessment = assess_route(route, ctx);
                for issue in self.route_extras(route, &assessment, ctx) {
                    match issue.severity {
                        Severity::Block => assessment.blocking.push(issue),
                        Severity::Warn => assessment.warnings.push(issue),
                    }
                }
                assessment
            })
            .collect()
    }

    /// Jurisdiction-specific checks beyond the declarative rules. The
    /// shared assessment is passed in so extras can depend on which grounds
    /// are currently made out.
    fn route_extras(
        &self,
        _route: &RouteSpec,
        _assessment: &RouteAssessment,
        _ctx: &AnalysisContext<'_>,
    ) -> Vec<Issue> {
        Vec::new()
    }
}

/// Declarative pass: evaluate each rule tri-state, keep only `Met`, and
/// classify by the rule's severity at the current stage. A rule whose facts
/// are still unanswered is simply not yet triggered.
pub(crate) fn assess_route(route: &RouteSpec, ctx: &AnalysisContext<'_>) -> RouteAssessment {
    let check_ctx = CheckContext {
        facts: ctx.facts,
        today: ctx.today,
        route,
    };

    let mut blocking = Vec::new();
    let mut warnings = Vec::new();

    for rule in &route.rules {
        if evaluate(&rule.condition, &check_ctx) != ConditionOutcome::Met {
            continue;
        }
        let Some(severity) = rule.severity_at(ctx.stage) else {
            continue;
        };
        let acknowledged = rule
            .resolved_by
            .as_deref()
            .and_then(|key| facts::bool_fact(ctx.facts, key))
            .unwrap_or(false);

        if acknowledged {
            // Confirmed resolved: keep an advisory note, never block.
            warnings.push(issue_from_rule(rule, route, ctx.stage, Severity::Warn, true));
        } else {
            match severity {
                Severity::Block => {
                    blocking.push(issue_from_rule(rule, route, ctx.stage, severity, false))
                }
                Severity::Warn => {
                    warnings.push(issue_from_rule(rule, route, ctx.stage, severity, false))
                }
            }
        }
    }

    let grounds = recommend_grounds(route, &check_ctx);

    RouteAssessment {
        route: route.id.clone(),
        name: route.name.clone(),
        summary: route.summary.clone(),
        blocking,
        warnings,
        grounds,
    }
}

fn issue_from_rule(
    rule: &RuleSpec,
    route: &RouteSpec,
    stage: Stage,
    severity: Severity,
    acknowledged: bool,
) -> Issue {
    Issue {
        code: rule.code.clone(),
        route: route.id.clone(),
        facts: rule.facts.clone(),
        message: rule.message.clone(),
        citation: rule.citation.clone(),
        hint: rule.hint.clone(),
        stage,
        severity,
        acknowledged,
    }
}

/// Grounds whose requirements are made out on the facts, ranked: mandatory
/// before discretionary, then larger threshold margin, then document order.
/// An `Unknown` requirement means the ground is not yet recommendable.
fn recommend_grounds(route: &RouteSpec, ctx: &CheckContext<'_>) -> Vec<GroundRecommendation> {
    let mut recommendations: Vec<(usize, GroundRecommendation)> = Vec::new();

    for (position, ground) in route.grounds.iter().enumerate() {
        if evaluate(&ground.requires, ctx) != ConditionOutcome::Met {
            continue;
        }

        let margin = match (&ground.strength_fact, ground.threshold) {
            (Some(fact), Some(threshold)) => {
                facts::number_fact(ctx.facts, fact).map(|actual| actual - threshold)
            }
            _ => None,
        };

        let rationale = match (&ground.strength_fact, ground.threshold, margin) {
            (Some(fact), Some(threshold), Some(margin)) => format!(
                "{} at {:.1} meets the {:.1} threshold with {:.1} to spare",
                fact,
                threshold + margin,
                threshold,
                margin
            ),
            _ => "requirements are made out on the facts provided".to_string(),
        };

        recommendations.push((
            position,
            GroundRecommendation {
                route: route.id.clone(),
                ground: ground.id.clone(),
                name: ground.name.clone(),
                kind: ground.kind,
                citation: ground.citation.clone(),
                rationale,
                margin,
            },
        ));
    }

    recommendations.sort_by(|(pos_a, a), (pos_b, b)| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| {
                b.margin
                    .unwrap_or(f64::MIN)
                    .partial_cmp(&a.margin.unwrap_or(f64::MIN))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| pos_a.cmp(pos_b))
    });

    recommendations
        .into_iter()
        .map(|(_, recommendation)| recommendation)
        .collect()
}

/// Notice periods in play for a route given the grounds currently made out:
/// the route default plus any ground-specific overrides.
pub(crate) fn applicable_notice_periods(
    route: &RouteSpec,
    assessment: &RouteAssessment,
) -> Vec<super::compliance::NoticePeriod> {
    let mut periods: Vec<_> = route.notice_period.into_iter().collect();
    for recommendation in &assessment.grounds {
        if let Some(ground) = route
            .grounds
            .iter()
            .find(|ground| ground.id == recommendation.ground)
        {
            if let Some(period) = ground.notice_period {
                periods.push(period);
            }
        }
    }
    periods
}
