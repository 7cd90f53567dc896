//! England-specific arithmetic checks.

use super::{applicable_notice_periods, AnalysisContext, RouteAnalyzer, RouteAssessment};
use crate::engine::compliance;
use crate::engine::decision::Issue;
use crate::engine::domain::{Jurisdiction, Severity, Stage};
use crate::engine::facts::{self, keys};
use crate::engine::rules::RouteSpec;

pub struct EnglandAnalyzer;

impl RouteAnalyzer for EnglandAnalyzer {
    fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::England
    }

    /// Ground-dependent notice arithmetic for fault-based routes: where
    /// several grounds are relied on together the longest minimum period
    /// governs, which a static rule predicate cannot express.
    fn route_extras(
        &self,
        route: &RouteSpec,
        assessment: &RouteAssessment,
        ctx: &AnalysisContext<'_>,
    ) -> Vec<Issue> {
        if route.grounds.is_empty() || assessment.grounds.is_empty() {
            return Vec::new();
        }
        let service = facts::date_fact(ctx.facts, keys::NOTICE_SERVICE_DATE);
        let expiry = facts::date_fact(ctx.facts, keys::NOTICE_EXPIRY_DATE);
        let (Some(service), Some(expiry)) = (service, expiry) else {
            return Vec::new();
        };

        let periods = applicable_notice_periods(route, assessment);
        let Some(required) = compliance::required_expiry(service, &periods) else {
            return Vec::new();
        };
        if expiry >= required {
            return Vec::new();
        }

        let severity = if ctx.stage >= Stage::Preview {
            Severity::Block
        } else {
            Severity::Warn
        };
        vec![Issue {
            code: "E-GROUND-NOTICE-SHORT".to_string(),
            route: route.id.clone(),
            facts: vec![
                keys::NOTICE_SERVICE_DATE.to_string(),
                keys::NOTICE_EXPIRY_DATE.to_string(),
            ],
            message: format!(
                "the notice expires before the minimum period for the grounds relied on; \
                 the earliest lawful expiry is {required}"
            ),
            citation: "Housing Act 1988 s.8(3)-(4B)".to_string(),
            hint: Some(format!(
                "set the expiry date to {required} or later, or drop the ground requiring the longer period"
            )),
            stage: ctx.stage,
            severity,
            acknowledged: false,
        }]
    }
}
