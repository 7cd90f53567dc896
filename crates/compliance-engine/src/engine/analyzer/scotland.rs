//! Scotland-specific arithmetic checks.

use super::{AnalysisContext, RouteAnalyzer, RouteAssessment};
use crate::engine::compliance::{self, NoticePeriod};
use crate::engine::decision::Issue;
use crate::engine::domain::{Jurisdiction, Severity, Stage};
use crate::engine::facts::{self, keys};
use crate::engine::rules::RouteSpec;

/// Private residential tenancies under the Private Housing (Tenancies)
/// (Scotland) Act 2016. The Notice to Leave period is 28 days when the
/// tenant has lived in the let property for six months or less (or where a
/// conduct ground is relied on) and 84 days otherwise — a function of both
/// tenancy length and the grounds made out, so it lives here rather than in
/// the declarative rules.
pub struct ScotlandAnalyzer;

const CONDUCT_GROUNDS: &[&str] = &["ground_14", "ground_15"];

impl RouteAnalyzer for ScotlandAnalyzer {
    fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::Scotland
    }

    fn route_extras(
        &self,
        route: &RouteSpec,
        assessment: &RouteAssessment,
        ctx: &AnalysisContext<'_>,
    ) -> Vec<Issue> {
        if route.grounds.is_empty() {
            return Vec::new();
        }
        let service = facts::date_fact(ctx.facts, keys::NOTICE_SERVICE_DATE);
        let expiry = facts::date_fact(ctx.facts, keys::NOTICE_EXPIRY_DATE);
        let (Some(service), Some(expiry)) = (service, expiry) else {
            return Vec::new();
        };
        let Some(tenancy_months) = facts::number_fact(ctx.facts, keys::TENANCY_MONTHS) else {
            return Vec::new();
        };

        let conduct_only = !assessment.grounds.is_empty()
            && assessment
                .grounds
                .iter()
                .all(|ground| CONDUCT_GROUNDS.contains(&ground.ground.as_str()));
        let required_days = if tenancy_months <= 6.0 || conduct_only {
            28
        } else {
            84
        };
        let required = compliance::earliest_expiry(service, &NoticePeriod::days(required_days));
        if expiry >= required {
            return Vec::new();
        }

        let severity = if ctx.stage >= Stage::Preview {
            Severity::Block
        } else {
            Severity::Warn
        };
        vec![Issue {
            code: "S-NTL-PERIOD-SHORT".to_string(),
            route: route.id.clone(),
            facts: vec![
                keys::NOTICE_SERVICE_DATE.to_string(),
                keys::NOTICE_EXPIRY_DATE.to_string(),
                keys::TENANCY_MONTHS.to_string(),
            ],
            message: format!(
                "a Notice to Leave for this tenancy needs {required_days} days' notice; \
                 the earliest lawful expiry is {required}"
            ),
            citation: "Private Housing (Tenancies) (Scotland) Act 2016 s.54".to_string(),
            hint: Some(format!("set the leave date to {required} or later")),
            stage: ctx.stage,
            severity,
            acknowledged: false,
        }]
    }
}
