//! Canonical fact key registry.
//!
//! Every fact key a rule set may reference must be listed here; the rule
//! registry rejects documents referencing anything else at load time.

/// Expected shape of a canonical fact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactKind {
    Bool,
    Number,
    Text,
    Date,
    List,
}

#[derive(Debug, Clone, Copy)]
pub struct FactKeySpec {
    pub key: &'static str,
    pub kind: FactKind,
}

const fn spec(key: &'static str, kind: FactKind) -> FactKeySpec {
    FactKeySpec { key, kind }
}

// Tenancy shape
pub const TENANCY_TYPE: &str = "tenancy_type";
pub const TENANCY_START_DATE: &str = "tenancy_start_date";
pub const TENANCY_MONTHS: &str = "tenancy_months";
pub const RENT_AMOUNT: &str = "rent_amount";
pub const RENT_FREQUENCY: &str = "rent_frequency";
pub const ANNUAL_RENT: &str = "annual_rent";

// Deposit
pub const DEPOSIT_TAKEN: &str = "deposit_taken";
pub const DEPOSIT_AMOUNT: &str = "deposit_amount";
pub const DEPOSIT_PROTECTED: &str = "deposit_protected";
pub const DEPOSIT_SCHEME: &str = "deposit_scheme";
pub const PRESCRIBED_INFO_SERVED: &str = "prescribed_info_served";
pub const DEPOSIT_CAP_CONFIRMED: &str = "deposit_cap_confirmed";

// Statutory prerequisites
pub const GAS_SAFETY_CERT_SERVED: &str = "gas_safety_cert_served";
pub const EPC_SERVED: &str = "epc_served";
pub const HOW_TO_RENT_SERVED: &str = "how_to_rent_served";
pub const LICENSING_REQUIRED: &str = "licensing_required";
pub const PROPERTY_LICENSED: &str = "property_licensed";
pub const IMPROVEMENT_NOTICE_ACTIVE: &str = "improvement_notice_active";
pub const WRITTEN_STATEMENT_PROVIDED: &str = "written_statement_provided";

// Arrears and conduct
pub const ARREARS_AMOUNT: &str = "arrears_amount";
pub const ARREARS_MONTHS: &str = "arrears_months";
pub const ARREARS_CONSECUTIVE_MONTHS: &str = "arrears_consecutive_months";
pub const PERSISTENT_DELAY: &str = "persistent_delay";
pub const ANTISOCIAL_BEHAVIOUR: &str = "antisocial_behaviour";
pub const BREACH_OF_TENANCY: &str = "breach_of_tenancy";
pub const PRE_ACTION_CONTACT_MADE: &str = "pre_action_contact_made";

// Landlord intentions (Scotland grounds)
pub const LANDLORD_INTENDS_TO_SELL: &str = "landlord_intends_to_sell";
pub const LANDLORD_INTENDS_TO_OCCUPY: &str = "landlord_intends_to_occupy";

// Notice service
pub const NOTICE_SERVICE_DATE: &str = "notice_service_date";
pub const NOTICE_EXPIRY_DATE: &str = "notice_expiry_date";

// Money claims
pub const CLAIM_AMOUNT: &str = "claim_amount";
pub const LETTER_BEFORE_CLAIM_SENT: &str = "letter_before_claim_sent";
pub const INTEREST_CLAIMED: &str = "interest_claimed";

// Tenancy agreements
pub const PROHIBITED_FEES_CHARGED: &str = "prohibited_fees_charged";

pub const KNOWN_FACTS: &[FactKeySpec] = &[
    spec(TENANCY_TYPE, FactKind::Text),
    spec(TENANCY_START_DATE, FactKind::Date),
    spec(TENANCY_MONTHS, FactKind::Number),
    spec(RENT_AMOUNT, FactKind::Number),
    spec(RENT_FREQUENCY, FactKind::Text),
    spec(ANNUAL_RENT, FactKind::Number),
    spec(DEPOSIT_TAKEN, FactKind::Bool),
    spec(DEPOSIT_AMOUNT, FactKind::Number),
    spec(DEPOSIT_PROTECTED, FactKind::Bool),
    spec(DEPOSIT_SCHEME, FactKind::Text),
    spec(PRESCRIBED_INFO_SERVED, FactKind::Bool),
    spec(DEPOSIT_CAP_CONFIRMED, FactKind::Bool),
    spec(GAS_SAFETY_CERT_SERVED, FactKind::Bool),
    spec(EPC_SERVED, FactKind::Bool),
    spec(HOW_TO_RENT_SERVED, FactKind::Bool),
    spec(LICENSING_REQUIRED, FactKind::Bool),
    spec(PROPERTY_LICENSED, FactKind::Bool),
    spec(IMPROVEMENT_NOTICE_ACTIVE, FactKind::Bool),
    spec(WRITTEN_STATEMENT_PROVIDED, FactKind::Bool),
    spec(ARREARS_AMOUNT, FactKind::Number),
    spec(ARREARS_MONTHS, FactKind::Number),
    spec(ARREARS_CONSECUTIVE_MONTHS, FactKind::Number),
    spec(PERSISTENT_DELAY, FactKind::Bool),
    spec(ANTISOCIAL_BEHAVIOUR, FactKind::Bool),
    spec(BREACH_OF_TENANCY, FactKind::Bool),
    spec(PRE_ACTION_CONTACT_MADE, FactKind::Bool),
    spec(LANDLORD_INTENDS_TO_SELL, FactKind::Bool),
    spec(LANDLORD_INTENDS_TO_OCCUPY, FactKind::Bool),
    spec(NOTICE_SERVICE_DATE, FactKind::Date),
    spec(NOTICE_EXPIRY_DATE, FactKind::Date),
    spec(CLAIM_AMOUNT, FactKind::Number),
    spec(LETTER_BEFORE_CLAIM_SENT, FactKind::Bool),
    spec(INTEREST_CLAIMED, FactKind::Bool),
    spec(PROHIBITED_FEES_CHARGED, FactKind::Bool),
];

pub fn known_fact(key: &str) -> Option<&'static FactKeySpec> {
    KNOWN_FACTS.iter().find(|spec| spec.key == key)
}
