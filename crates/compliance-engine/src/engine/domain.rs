use std::fmt;

use serde::{Deserialize, Serialize};

/// UK legal systems the engine can be configured for.
///
/// A jurisdiction may be deliberately unconfigured for a product (Northern
/// Ireland currently has no rule sets at all); the orchestrator reports those
/// combinations as unsupported before any rule evaluation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    England,
    Wales,
    Scotland,
    NorthernIreland,
}

impl Jurisdiction {
    pub fn label(&self) -> &'static str {
        match self {
            Jurisdiction::England => "England",
            Jurisdiction::Wales => "Wales",
            Jurisdiction::Scotland => "Scotland",
            Jurisdiction::NorthernIreland => "Northern Ireland",
        }
    }
}

/// Category of output the customer is assembling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    NoticeOnly,
    EvictionBundle,
    MoneyClaim,
    TenancyAgreement,
}

impl Product {
    pub fn label(&self) -> &'static str {
        match self {
            Product::NoticeOnly => "notice",
            Product::EvictionBundle => "eviction bundle",
            Product::MoneyClaim => "money claim",
            Product::TenancyAgreement => "tenancy agreement",
        }
    }
}

/// Progress marker supplied by the caller on every validation call.
///
/// Ordering matters: severity rules compare stages with `>=`, so enforcement
/// can only tighten as the user advances through the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Draft,
    Checkpoint,
    Preview,
    Generate,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Draft, Stage::Checkpoint, Stage::Preview, Stage::Generate];
}

/// Severity of a triggered rule at a particular stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warn,
    Block,
}

/// Identifier for a legal route (a statutory notice type or claim pathway)
/// scoped to one jurisdiction and product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub String);

impl RouteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a ground obliges the court/tribunal to grant possession once made
/// out, or merely permits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundKind {
    Mandatory,
    Discretionary,
}
