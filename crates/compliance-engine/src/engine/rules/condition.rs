//! Tri-state condition interpreter.
//!
//! Conditions evaluate to `Met`, `NotMet`, or `Unknown`. A fact the case has
//! not answered yet yields `Unknown`, and `Unknown` never triggers a rule —
//! an unanswered deposit question must not be read as "deposit unprotected".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RouteSpec;
use crate::engine::compliance::{self, Computation, RentFrequency};
use crate::engine::facts::{self, keys, CaseFacts, FactValue};

/// Expression tree over canonical fact keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    Equals { fact: String, value: FactValue },
    NotEquals { fact: String, value: FactValue },
    Present { fact: String },
    Absent { fact: String },
    AtLeast { fact: String, value: f64 },
    AtMost { fact: String, value: f64 },
    OneOf { fact: String, values: Vec<FactValue> },
    AllOf { all: Vec<Condition> },
    AnyOf { any: Vec<Condition> },
    Not { not: Box<Condition> },
    Check {
        #[serde(flatten)]
        check: BuiltinCheck,
    },
}

/// Checks whose arithmetic is too error-prone to express as plain
/// predicates; these delegate to the compliance evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum BuiltinCheck {
    /// Deposit held exceeds the route's configured cap.
    DepositExceedsCap,
    /// Notice expiry date falls before the earliest lawful expiry for the
    /// route's default notice period.
    NoticePeriodTooShort,
    /// Arrears reach the given number of months of rent.
    ArrearsAtLeast { months: f64 },
    /// Arrears have persisted for at least this many consecutive months.
    ConsecutiveArrearsAtLeast { months: f64 },
    /// The tenancy is younger than the given number of whole months.
    TenancyShorterThanMonths { months: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOutcome {
    Met,
    NotMet,
    Unknown,
}

/// Everything a condition may need besides the facts themselves.
pub(crate) struct CheckContext<'a> {
    pub facts: &'a CaseFacts,
    pub today: NaiveDate,
    pub route: &'a RouteSpec,
}

pub(crate) fn evaluate(condition: &Condition, ctx: &CheckContext<'_>) -> ConditionOutcome {
    match condition {
        Condition::Equals { fact, value } => match ctx.facts.get(fact) {
            None => ConditionOutcome::Unknown,
            Some(actual) if actual == value => ConditionOutcome::Met,
            Some(_) => ConditionOutcome::NotMet,
        },
        Condition::NotEquals { fact, value } => match ctx.facts.get(fact) {
            None => ConditionOutcome::Unknown,
            Some(actual) if actual != value => ConditionOutcome::Met,
            Some(_) => ConditionOutcome::NotMet,
        },
        Condition::Present { fact } => {
            if ctx.facts.contains_key(fact) {
                ConditionOutcome::Met
            } else {
                ConditionOutcome::NotMet
            }
        }
        Condition::Absent { fact } => {
            if ctx.facts.contains_key(fact) {
                ConditionOutcome::NotMet
            } else {
                ConditionOutcome::Met
            }
        }
        Condition::AtLeast { fact, value } => compare_number(ctx.facts, fact, |n| n >= *value),
        Condition::AtMost { fact, value } => compare_number(ctx.facts, fact, |n| n <= *value),
        Condition::OneOf { fact, values } => match ctx.facts.get(fact) {
            None => ConditionOutcome::Unknown,
            Some(actual) if values.contains(actual) => ConditionOutcome::Met,
            Some(_) => ConditionOutcome::NotMet,
        },
        Condition::AllOf { all } => {
            let mut unknown = false;
            for nested in all {
                match evaluate(nested, ctx) {
                    ConditionOutcome::NotMet => return ConditionOutcome::NotMet,
                    ConditionOutcome::Unknown => unknown = true,
                    ConditionOutcome::Met => {}
                }
            }
            if unknown {
                ConditionOutcome::Unknown
            } else {
                ConditionOutcome::Met
            }
        }
        Condition::AnyOf { any } => {
            let mut unknown = false;
            for nested in any {
                match evaluate(nested, ctx) {
                    ConditionOutcome::Met => return ConditionOutcome::Met,
                    ConditionOutcome::Unknown => unknown = true,
                    ConditionOutcome::NotMet => {}
                }
            }
            if unknown {
                ConditionOutcome::Unknown
            } else {
                ConditionOutcome::NotMet
            }
        }
        Condition::Not { not } => match evaluate(not, ctx) {
            ConditionOutcome::Met => ConditionOutcome::NotMet,
            ConditionOutcome::NotMet => ConditionOutcome::Met,
            ConditionOutcome::Unknown => ConditionOutcome::Unknown,
        },
        Condition::Check { check } => evaluate_check(check, ctx),
    }
}

fn compare_number(
    facts: &CaseFacts,
    fact: &str,
    predicate: impl Fn(f64) -> bool,
) -> ConditionOutcome {
    match facts.get(fact) {
        None => ConditionOutcome::Unknown,
        Some(value) => match value.as_number() {
            // Wrong type reads as unanswered, not as a failed comparison.
            None => ConditionOutcome::Unknown,
            Some(number) if predicate(number) => ConditionOutcome::Met,
            Some(_) => ConditionOutcome::NotMet,
        },
    }
}

fn evaluate_check(check: &BuiltinCheck, ctx: &CheckContext<'_>) -> ConditionOutcome {
    match check {
        BuiltinCheck::DepositExceedsCap => {
            let Some(policy) = &ctx.route.deposit_cap else {
                return ConditionOutcome::Unknown;
            };
            let Some(deposit) = facts::number_fact(ctx.facts, keys::DEPOSIT_AMOUNT) else {
                return ConditionOutcome::Unknown;
            };
            let cap = compliance::deposit_cap(
                facts::number_fact(ctx.facts, keys::RENT_AMOUNT),
                rent_frequency(ctx.facts),
                policy,
            );
            match cap {
                Computation::Value(cap) if deposit > cap => ConditionOutcome::Met,
                Computation::Value(_) => ConditionOutcome::NotMet,
                Computation::InsufficientData { .. } => ConditionOutcome::Unknown,
            }
        }
        BuiltinCheck::NoticePeriodTooShort => {
            let Some(period) = &ctx.route.notice_period else {
                return ConditionOutcome::Unknown;
            };
            let service = facts::date_fact(ctx.facts, keys::NOTICE_SERVICE_DATE);
            let expiry = facts::date_fact(ctx.facts, keys::NOTICE_EXPIRY_DATE);
            match (service, expiry) {
                (Some(service), Some(expiry)) => {
                    if expiry < compliance::earliest_expiry(service, period) {
                        ConditionOutcome::Met
                    } else {
                        ConditionOutcome::NotMet
                    }
                }
                _ => ConditionOutcome::Unknown,
            }
        }
        BuiltinCheck::ArrearsAtLeast { months } => match arrears_months(ctx.facts) {
            Some(actual) if actual >= *months => ConditionOutcome::Met,
            Some(_) => ConditionOutcome::NotMet,
            None => ConditionOutcome::Unknown,
        },
        BuiltinCheck::ConsecutiveArrearsAtLeast { months } => {
            compare_number(ctx.facts, keys::ARREARS_CONSECUTIVE_MONTHS, |n| n >= *months)
        }
        BuiltinCheck::TenancyShorterThanMonths { months } => {
            match tenancy_months(ctx.facts, ctx.today) {
                Some(actual) if actual < *months => ConditionOutcome::Met,
                Some(_) => ConditionOutcome::NotMet,
                None => ConditionOutcome::Unknown,
            }
        }
    }
}

fn rent_frequency(facts: &CaseFacts) -> Option<RentFrequency> {
    facts
        .get(keys::RENT_FREQUENCY)
        .and_then(FactValue::as_text)
        .and_then(RentFrequency::parse)
}

/// Arrears in months: prefer the (possibly derived) canonical fact, fall
/// back to recomputing from amount and rent.
fn arrears_months(facts: &CaseFacts) -> Option<f64> {
    facts::number_fact(facts, keys::ARREARS_MONTHS).or_else(|| {
        compliance::arrears_in_months(
            facts::number_fact(facts, keys::ARREARS_AMOUNT),
            facts::number_fact(facts, keys::RENT_AMOUNT),
            rent_frequency(facts),
        )
        .value()
    })
}

fn tenancy_months(facts: &CaseFacts, today: NaiveDate) -> Option<f64> {
    facts::number_fact(facts, keys::TENANCY_MONTHS).or_else(|| {
        facts::date_fact(facts, keys::TENANCY_START_DATE)
            .map(|start| f64::from(compliance::whole_months_between(start, today)))
    })
}

impl Condition {
    /// Collect every canonical fact key this condition reads, for load-time
    /// validation. Builtin checks read well-known keys and need no listing.
    pub fn referenced_facts<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::Equals { fact, .. }
            | Condition::NotEquals { fact, .. }
            | Condition::Present { fact }
            | Condition::Absent { fact }
            | Condition::AtLeast { fact, .. }
            | Condition::AtMost { fact, .. }
            | Condition::OneOf { fact, .. } => out.push(fact),
            Condition::AllOf { all } => {
                for nested in all {
                    nested.referenced_facts(out);
                }
            }
            Condition::AnyOf { any } => {
                for nested in any {
                    nested.referenced_facts(out);
                }
            }
            Condition::Not { not } => not.referenced_facts(out),
            Condition::Check { .. } => {}
        }
    }
}
