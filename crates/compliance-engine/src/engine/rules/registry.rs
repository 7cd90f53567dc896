//! Rule-set loading and load-time validation.
//!
//! The registry performs no evaluation; it hands rule sets to the analyzers.
//! Documents referencing unknown fact keys, duplicating rule codes, or
//! declaring rules with no severity stage are rejected here, loudly, so a
//! broken rule set can never fail silently mid-evaluation.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use super::{Condition, RouteSpec, RuleSetDocument};
use crate::engine::domain::{Jurisdiction, Product};
use crate::engine::facts::keys::known_fact;

/// Built-in declarative rule sets shipped with the engine. A deployment can
/// replace these with documents from a configured directory.
const BUILTIN_DOCUMENTS: &[&str] = &[
    include_str!("../../../rules/england-notice-only.json"),
    include_str!("../../../rules/england-eviction-bundle.json"),
    include_str!("../../../rules/england-money-claim.json"),
    include_str!("../../../rules/england-tenancy-agreement.json"),
    include_str!("../../../rules/wales-notice-only.json"),
    include_str!("../../../rules/scotland-notice-only.json"),
];

/// Validated rules for one (jurisdiction, product) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub jurisdiction: Jurisdiction,
    pub product: Product,
    pub routes: Vec<RouteSpec>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unable to read rule-set document: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed rule-set document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("duplicate rule set for {jurisdiction:?}/{product:?}")]
    DuplicateRuleSet {
        jurisdiction: Jurisdiction,
        product: Product,
    },
    #[error("rule set for {jurisdiction:?}/{product:?} defines no routes")]
    EmptyRuleSet {
        jurisdiction: Jurisdiction,
        product: Product,
    },
    #[error("duplicate rule code '{code}' in route '{route}'")]
    DuplicateRuleCode { route: String, code: String },
    #[error("'{owner}' references unknown fact key '{key}'")]
    UnknownFactKey { owner: String, key: String },
    #[error("rule '{code}' declares neither warn_from nor block_from")]
    NoSeverity { code: String },
}

/// Read-only configuration shared across concurrent validation calls.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    sets: BTreeMap<(Jurisdiction, Product), RuleSet>,
}

impl RuleRegistry {
    /// Load the rule sets embedded in the engine.
    pub fn builtin() -> Result<Self, RegistryError> {
        let documents = BUILTIN_DOCUMENTS
            .iter()
            .map(|raw| serde_json::from_str::<RuleSetDocument>(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_documents(documents)
    }

    /// Load every `*.json` document in a directory. Used when a deployment
    /// overrides the built-in rule sets.
    pub fn from_dir(path: &Path) -> Result<Self, RegistryError> {
        let mut documents = Vec::new();
        let mut entries: Vec<_> = std::fs::read_dir(path)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        entries.sort();
        for entry in entries {
            let raw = std::fs::read_to_string(&entry)?;
            documents.push(serde_json::from_str::<RuleSetDocument>(&raw)?);
        }
        Self::from_documents(documents)
    }

    pub fn from_documents(documents: Vec<RuleSetDocument>) -> Result<Self, RegistryError> {
        let mut sets = BTreeMap::new();
        for document in documents {
            validate_document(&document)?;
            let key = (document.jurisdiction, document.product);
            let set = RuleSet {
                jurisdiction: document.jurisdiction,
                product: document.product,
                routes: document.routes,
            };
            if sets.insert(key, set).is_some() {
                return Err(RegistryError::DuplicateRuleSet {
                    jurisdiction: key.0,
                    product: key.1,
                });
            }
        }
        info!(rule_sets = sets.len(), "loaded compliance rule sets");
        Ok(Self { sets })
    }

    /// Rules for one jurisdiction/product pair, if configured.
    pub fn rule_set(&self, jurisdiction: Jurisdiction, product: Product) -> Option<&RuleSet> {
        self.sets.get(&(jurisdiction, product))
    }

    /// Every configured (jurisdiction, product) combination, in stable order.
    pub fn configured(&self) -> Vec<(Jurisdiction, Product)> {
        self.sets.keys().copied().collect()
    }
}

fn validate_document(document: &RuleSetDocument) -> Result<(), RegistryError> {
    if document.routes.is_empty() {
        return Err(RegistryError::EmptyRuleSet {
            jurisdiction: document.jurisdiction,
            product: document.product,
        });
    }

    for route in &document.routes {
        let mut seen_codes: Vec<&str> = Vec::new();
        for rule in &route.rules {
            if seen_codes.contains(&rule.code.as_str()) {
                return Err(RegistryError::DuplicateRuleCode {
                    route: route.id.to_string(),
                    code: rule.code.clone(),
                });
            }
            seen_codes.push(&rule.code);

            if rule.warn_from.is_none() && rule.block_from.is_none() {
                return Err(RegistryError::NoSeverity {
                    code: rule.code.clone(),
                });
            }

            check_condition_keys(&rule.condition, &rule.code)?;
            for key in &rule.facts {
                check_key(key, &rule.code)?;
            }
            if let Some(key) = &rule.resolved_by {
                check_key(key, &rule.code)?;
            }
        }

        for ground in &route.grounds {
            check_condition_keys(&ground.requires, &ground.id)?;
            if let Some(key) = &ground.strength_fact {
                check_key(key, &ground.id)?;
            }
        }
    }
    Ok(())
}

fn check_condition_keys(condition: &Condition, owner: &str) -> Result<(), RegistryError> {
    let mut referenced = Vec::new();
    condition.referenced_facts(&mut referenced);
    for key in referenced {
        check_key(key, owner)?;
    }
    Ok(())
}

fn check_key(key: &str, owner: &str) -> Result<(), RegistryError> {
    if known_fact(key).is_none() {
        return Err(RegistryError::UnknownFactKey {
            owner: owner.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::domain::{RouteId, Stage};
    use crate::engine::rules::RuleSpec;

    fn document_with_rule(rule: RuleSpec) -> RuleSetDocument {
        RuleSetDocument {
            jurisdiction: Jurisdiction::England,
            product: Product::NoticeOnly,
            routes: vec![RouteSpec {
                id: RouteId::new("section_21"),
                name: "Section 21".to_string(),
                citation: "Housing Act 1988 s.21".to_string(),
                summary: "No-fault notice".to_string(),
                notice_period: None,
                deposit_cap: None,
                grounds: Vec::new(),
                rules: vec![rule],
            }],
        }
    }

    fn rule(code: &str, fact: &str) -> RuleSpec {
        RuleSpec {
            code: code.to_string(),
            facts: Vec::new(),
            condition: Condition::Equals {
                fact: fact.to_string(),
                value: crate::engine::facts::FactValue::Bool(false),
            },
            warn_from: Some(Stage::Draft),
            block_from: Some(Stage::Generate),
            message: "m".to_string(),
            citation: "c".to_string(),
            hint: None,
            resolved_by: None,
        }
    }

    #[test]
    fn builtin_rule_sets_load_and_validate() {
        let registry = RuleRegistry::builtin().expect("builtin rule sets must be valid");
        assert!(registry
            .rule_set(Jurisdiction::England, Product::NoticeOnly)
            .is_some());
        assert!(registry
            .rule_set(Jurisdiction::Scotland, Product::NoticeOnly)
            .is_some());
        assert!(registry
            .rule_set(Jurisdiction::NorthernIreland, Product::NoticeOnly)
            .is_none());
    }

    #[test]
    fn unknown_fact_key_is_rejected_at_load_time() {
        let document = document_with_rule(rule("X-1", "deposit_protcted"));
        match RuleRegistry::from_documents(vec![document]) {
            Err(RegistryError::UnknownFactKey { owner, key }) => {
                assert_eq!(owner, "X-1");
                assert_eq!(key, "deposit_protcted");
            }
            other => panic!("expected unknown fact key error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_rule_codes_are_rejected() {
        let mut document = document_with_rule(rule("X-1", "deposit_protected"));
        document.routes[0]
            .rules
            .push(rule("X-1", "deposit_protected"));
        assert!(matches!(
            RuleRegistry::from_documents(vec![document]),
            Err(RegistryError::DuplicateRuleCode { .. })
        ));
    }

    #[test]
    fn rule_with_no_severity_stage_is_rejected() {
        let mut bad = rule("X-2", "deposit_protected");
        bad.warn_from = None;
        bad.block_from = None;
        assert!(matches!(
            RuleRegistry::from_documents(vec![document_with_rule(bad)]),
            Err(RegistryError::NoSeverity { .. })
        ));
    }
}
