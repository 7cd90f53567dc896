//! Wales-specific arithmetic checks.

use super::{AnalysisContext, RouteAnalyzer, RouteAssessment};
use crate::engine::compliance::{self, NoticePeriod};
use crate::engine::decision::Issue;
use crate::engine::domain::{Jurisdiction, Severity, Stage};
use crate::engine::facts::{self, keys};
use crate::engine::rules::RouteSpec;

/// Occupation contracts under the Renting Homes (Wales) Act 2016. A s.173
/// notice may not be *given* during the first six months of occupation —
/// distinct from the six-month notice period itself, and measured from the
/// actual service date rather than the reference date.
pub struct WalesAnalyzer;

const SECTION_173: &str = "section_173";

impl RouteAnalyzer for WalesAnalyzer {
    fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::Wales
    }

    fn route_extras(
        &self,
        route: &RouteSpec,
        _assessment: &RouteAssessment,
        ctx: &AnalysisContext<'_>,
    ) -> Vec<Issue> {
        if route.id.as_str() != SECTION_173 {
            return Vec::new();
        }
        let start = facts::date_fact(ctx.facts, keys::TENANCY_START_DATE);
        let service = facts::date_fact(ctx.facts, keys::NOTICE_SERVICE_DATE);
        let (Some(start), Some(service)) = (start, service) else {
            return Vec::new();
        };

        let earliest_service = compliance::earliest_expiry(start, &NoticePeriod::months(6));
        if service >= earliest_service {
            return Vec::new();
        }

        let severity = if ctx.stage >= Stage::Preview {
            Severity::Block
        } else {
            Severity::Warn
        };
        vec![Issue {
            code: "W173-SERVED-TOO-EARLY".to_string(),
            route: route.id.clone(),
            facts: vec![
                keys::TENANCY_START_DATE.to_string(),
                keys::NOTICE_SERVICE_DATE.to_string(),
            ],
            message: format!(
                "a section 173 notice cannot be given during the first six months of \
                 occupation; the earliest service date is {earliest_service}"
            ),
            citation: "Renting Homes (Wales) Act 2016 s.175".to_string(),
            hint: Some(format!("date the notice {earliest_service} or later")),
            stage: ctx.stage,
            severity,
            acknowledged: false,
        }]
    }
}
