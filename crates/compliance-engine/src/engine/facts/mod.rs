//! Canonical case facts.
//!
//! Facts arrive from the wizard as loosely-typed key/value answers; the
//! normalizer reshapes them into `CaseFacts` keyed by the canonical names in
//! [`keys`]. A fact that is absent means "unknown" — downstream rule
//! evaluation must never read absence as `false`.

pub mod keys;
mod normalizer;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use normalizer::normalize;

/// A single typed answer. Serialized untagged so rule-set documents can write
/// literals naturally (`true`, `2.5`, `"2025-01-01"`, `"monthly"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
    List(Vec<FactValue>),
}

impl FactValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FactValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FactValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FactValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// The canonical fact set for one case. `BTreeMap` keeps iteration order
/// stable so identical inputs always produce identical decision output.
pub type CaseFacts = BTreeMap<String, FactValue>;

/// Convenience lookups used by the condition interpreter and analyzers.
pub fn bool_fact(facts: &CaseFacts, key: &str) -> Option<bool> {
    facts.get(key).and_then(FactValue::as_bool)
}

pub fn number_fact(facts: &CaseFacts, key: &str) -> Option<f64> {
    facts.get(key).and_then(FactValue::as_number)
}

pub fn date_fact(facts: &CaseFacts, key: &str) -> Option<NaiveDate> {
    facts.get(key).and_then(FactValue::as_date)
}
