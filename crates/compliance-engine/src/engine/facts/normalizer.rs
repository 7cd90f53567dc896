//! Reshapes raw wizard answers into canonical [`CaseFacts`].
//!
//! Purely structural: key aliasing, fail-soft type coercion, and derived
//! values. No statutory logic lives here.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use super::keys::{self, known_fact, FactKind};
use super::{CaseFacts, FactValue};
use crate::engine::compliance::{self, Computation, RentFrequency};

/// Legacy and jurisdiction-specific answer keys mapped to canonical names.
/// Older wizard flows used camelCase; the Wales and Scotland flows named the
/// start date after their own tenancy regimes.
const ALIASES: &[(&str, &str)] = &[
    ("depositReceived", keys::DEPOSIT_TAKEN),
    ("deposit_received", keys::DEPOSIT_TAKEN),
    ("depositAmount", keys::DEPOSIT_AMOUNT),
    ("depositProtected", keys::DEPOSIT_PROTECTED),
    ("is_deposit_protected", keys::DEPOSIT_PROTECTED),
    ("depositScheme", keys::DEPOSIT_SCHEME),
    ("prescribedInfoServed", keys::PRESCRIBED_INFO_SERVED),
    ("rentAmount", keys::RENT_AMOUNT),
    ("rentFrequency", keys::RENT_FREQUENCY),
    ("rent_period", keys::RENT_FREQUENCY),
    ("tenancyStartDate", keys::TENANCY_START_DATE),
    ("contract_start_date", keys::TENANCY_START_DATE),
    ("occupation_date", keys::TENANCY_START_DATE),
    ("prt_start_date", keys::TENANCY_START_DATE),
    ("rentArrears", keys::ARREARS_AMOUNT),
    ("arrears_total", keys::ARREARS_AMOUNT),
    ("rent_arrears_total", keys::ARREARS_AMOUNT),
    ("noticeServiceDate", keys::NOTICE_SERVICE_DATE),
    ("date_notice_served", keys::NOTICE_SERVICE_DATE),
    ("noticeExpiryDate", keys::NOTICE_EXPIRY_DATE),
    ("date_notice_expires", keys::NOTICE_EXPIRY_DATE),
    ("gasCertificateServed", keys::GAS_SAFETY_CERT_SERVED),
    ("epcProvided", keys::EPC_SERVED),
    ("howToRentProvided", keys::HOW_TO_RENT_SERVED),
    ("asbReported", keys::ANTISOCIAL_BEHAVIOUR),
    ("claimAmount", keys::CLAIM_AMOUNT),
    ("letterBeforeClaimSent", keys::LETTER_BEFORE_CLAIM_SENT),
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Normalize raw answers into canonical facts.
///
/// Unknown keys and uncoercible values are dropped (logged at debug), never
/// errors: a half-answered wizard must still produce a usable fact set. The
/// reference date is used only for derived duration facts.
pub fn normalize(raw: &BTreeMap<String, Value>, today: NaiveDate) -> CaseFacts {
    let mut facts = CaseFacts::new();

    for (key, value) in raw {
        let canonical = canonical_key(key);
        let Some(spec) = known_fact(canonical) else {
            debug!(key = %key, "dropping unrecognised answer key");
            continue;
        };
        match coerce(value, spec.kind) {
            Some(fact) => {
                facts.insert(canonical.to_string(), fact);
            }
            None => {
                debug!(key = %canonical, "dropping uncoercible answer value");
            }
        }

        // The legacy single-field rent question implied calendar-monthly rent.
        if key == "monthly_rent" {
            facts
                .entry(keys::RENT_FREQUENCY.to_string())
                .or_insert_with(|| FactValue::Text("monthly".to_string()));
        }
    }

    derive_facts(&mut facts, today);
    facts
}

fn canonical_key(key: &str) -> &str {
    if key == "monthly_rent" {
        return keys::RENT_AMOUNT;
    }
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(key)
}

fn coerce(value: &Value, kind: FactKind) -> Option<FactValue> {
    match kind {
        FactKind::Bool => coerce_bool(value).map(FactValue::Bool),
        FactKind::Number => coerce_number(value).map(FactValue::Number),
        FactKind::Date => coerce_date(value).map(FactValue::Date),
        FactKind::Text => match value {
            Value::String(text) => Some(FactValue::Text(text.trim().to_string())),
            _ => None,
        },
        FactKind::List => match value {
            Value::Array(items) => {
                let coerced: Vec<FactValue> = items.iter().filter_map(coerce_any).collect();
                Some(FactValue::List(coerced))
            }
            _ => None,
        },
    }
}

fn coerce_any(value: &Value) -> Option<FactValue> {
    match value {
        Value::Bool(flag) => Some(FactValue::Bool(*flag)),
        Value::Number(number) => number.as_f64().map(FactValue::Number),
        Value::String(text) => coerce_date(value)
            .map(FactValue::Date)
            .or_else(|| Some(FactValue::Text(text.trim().to_string()))),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" => Some(true),
            "no" | "n" | "false" => Some(false),
            _ => None,
        },
        Value::Number(number) => match number.as_f64() {
            Some(n) if n == 0.0 => Some(false),
            Some(n) if n == 1.0 => Some(true),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let cleaned: String = text
                .trim()
                .trim_start_matches('£')
                .chars()
                .filter(|c| !c.is_whitespace() && *c != ',')
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }
}

fn coerce_date(value: &Value) -> Option<NaiveDate> {
    let Value::String(text) = value else {
        return None;
    };
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Compute derived facts that rules reference directly. Each is only added
/// when its inputs are present and it was not supplied explicitly.
fn derive_facts(facts: &mut CaseFacts, today: NaiveDate) {
    let rent = super::number_fact(facts, keys::RENT_AMOUNT);
    let frequency = facts
        .get(keys::RENT_FREQUENCY)
        .and_then(FactValue::as_text)
        .and_then(RentFrequency::parse);

    if !facts.contains_key(keys::ANNUAL_RENT) {
        if let (Some(rent), Some(frequency)) = (rent, frequency) {
            facts.insert(
                keys::ANNUAL_RENT.to_string(),
                FactValue::Number(compliance::annualised_rent(rent, frequency)),
            );
        }
    }

    if !facts.contains_key(keys::ARREARS_MONTHS) {
        let arrears = super::number_fact(facts, keys::ARREARS_AMOUNT);
        if let Computation::Value(months) = compliance::arrears_in_months(arrears, rent, frequency)
        {
            facts.insert(keys::ARREARS_MONTHS.to_string(), FactValue::Number(months));
        }
    }

    if !facts.contains_key(keys::TENANCY_MONTHS) {
        if let Some(start) = super::date_fact(facts, keys::TENANCY_START_DATE) {
            facts.insert(
                keys::TENANCY_MONTHS.to_string(),
                FactValue::Number(f64::from(compliance::whole_months_between(start, today))),
            );
        }
    }
}
