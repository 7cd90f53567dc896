use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{json, Value};

use compliance_engine::engine::{
    Jurisdiction, Product, RouteId, RuleRegistry, Severity, Stage, ValidationOrchestrator,
    ValidationRequest,
};

fn orchestrator() -> ValidationOrchestrator {
    ValidationOrchestrator::new(RuleRegistry::builtin().expect("builtin rule sets load"))
}

fn answers(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn request(
    entries: &[(&str, Value)],
    jurisdiction: Jurisdiction,
    product: Product,
    stage: Stage,
) -> ValidationRequest {
    ValidationRequest {
        answers: answers(entries),
        jurisdiction,
        product,
        stage,
        selected_route: None,
        today: NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date"),
    }
}

#[test]
fn unprotected_deposit_blocks_section_21_at_generate() {
    let engine = orchestrator();
    let mut req = request(
        &[
            ("deposit_taken", json!(true)),
            ("deposit_protected", json!(false)),
        ],
        Jurisdiction::England,
        Product::NoticeOnly,
        Stage::Generate,
    );
    req.selected_route = Some(RouteId::new("section_21"));

    let result = engine.validate(&req);

    assert!(result.is_route_blocked(&RouteId::new("section_21")));
    let issue = result
        .blocking_issues
        .iter()
        .find(|issue| issue.code == "E21-DEPOSIT-UNPROTECTED")
        .expect("deposit protection issue present");
    assert_eq!(issue.citation, "Housing Act 2004 ss.213-215");
    assert!(issue.facts.contains(&"deposit_protected".to_string()));
    // A blocked selection comes with a fallback.
    assert_eq!(
        result.suggested_alternative,
        Some(RouteId::new("section_8"))
    );
}

#[test]
fn fault_route_has_no_deposit_protection_rule() {
    let engine = orchestrator();
    let result = engine.validate(&request(
        &[
            ("deposit_taken", json!(true)),
            ("deposit_protected", json!(false)),
        ],
        Jurisdiction::England,
        Product::NoticeOnly,
        Stage::Generate,
    ));

    let section_8 = RouteId::new("section_8");
    assert!(result.allowed_routes.contains(&section_8));
    assert!(!result
        .blocking_issues
        .iter()
        .any(|issue| issue.route == section_8));
}

#[test]
fn grounds_rank_by_threshold_margin() {
    let engine = orchestrator();
    let result = engine.validate(&request(
        &[("arrears_months", json!(1.5))],
        Jurisdiction::England,
        Product::NoticeOnly,
        Stage::Checkpoint,
    ));

    let ids: Vec<&str> = result
        .recommended_grounds
        .iter()
        .map(|ground| ground.ground.as_str())
        .collect();
    assert!(ids.contains(&"ground_10"), "1.5 months meets the 1-month ground");
    assert!(
        !ids.contains(&"ground_8"),
        "1.5 months must not satisfy the 2-month ground"
    );
}

#[test]
fn comfortably_met_ground_outranks_barely_met() {
    let engine = orchestrator();
    let result = engine.validate(&request(
        &[("arrears_months", json!(2.1))],
        Jurisdiction::England,
        Product::NoticeOnly,
        Stage::Checkpoint,
    ));

    let ids: Vec<&str> = result
        .recommended_grounds
        .iter()
        .map(|ground| ground.ground.as_str())
        .collect();
    // Ground 8 is mandatory and ranks first even though ground 10 has the
    // larger margin; mandatory beats discretionary before margin applies.
    let pos_8 = ids.iter().position(|id| *id == "ground_8").expect("ground 8");
    let pos_10 = ids.iter().position(|id| *id == "ground_10").expect("ground 10");
    assert!(pos_8 < pos_10);
}

#[test]
fn severity_escalates_from_draft_warning_to_generate_block() {
    let engine = orchestrator();
    let facts = [
        ("deposit_amount", json!(2500)),
        ("rent_amount", json!(1000)),
        ("rent_frequency", json!("monthly")),
    ];

    let at_draft = engine.validate(&request(
        &facts,
        Jurisdiction::England,
        Product::TenancyAgreement,
        Stage::Draft,
    ));
    assert!(at_draft
        .warnings
        .iter()
        .any(|issue| issue.code == "TA-DEPOSIT-OVER-CAP"));
    assert!(at_draft.blocking_issues.is_empty());

    let at_generate = engine.validate(&request(
        &facts,
        Jurisdiction::England,
        Product::TenancyAgreement,
        Stage::Generate,
    ));
    assert!(at_generate
        .blocking_issues
        .iter()
        .any(|issue| issue.code == "TA-DEPOSIT-OVER-CAP"));
}

#[test]
fn severity_never_decreases_across_stages() {
    let engine = orchestrator();
    let facts = [
        ("deposit_taken", json!(true)),
        ("deposit_protected", json!(false)),
    ];

    let mut seen_block = false;
    for stage in Stage::ALL {
        let result = engine.validate(&request(
            &facts,
            Jurisdiction::England,
            Product::NoticeOnly,
            stage,
        ));
        let severity = result
            .blocking_issues
            .iter()
            .chain(result.warnings.iter())
            .find(|issue| issue.code == "E21-DEPOSIT-UNPROTECTED")
            .map(|issue| issue.severity);
        match severity {
            Some(Severity::Block) => seen_block = true,
            Some(Severity::Warn) => {
                assert!(!seen_block, "severity dropped back from block to warn")
            }
            None => assert!(!seen_block, "issue vanished after blocking"),
        }
    }
    assert!(seen_block);
}

#[test]
fn unset_facts_never_trigger_rules() {
    let engine = orchestrator();
    let result = engine.validate(&request(
        &[],
        Jurisdiction::England,
        Product::NoticeOnly,
        Stage::Generate,
    ));

    assert!(result.blocking_issues.is_empty());
    // The only warning allowed on an empty case is the data-completeness
    // prompt, which explicitly tests for absence.
    for issue in &result.warnings {
        assert_eq!(issue.code, "E8-ARREARS-DATA");
    }
}

#[test]
fn identical_requests_yield_byte_identical_results() {
    let engine = orchestrator();
    let req = request(
        &[
            ("deposit_taken", json!(true)),
            ("deposit_protected", json!(false)),
            ("arrears_months", json!(2.5)),
            ("notice_service_date", json!("2025-12-22")),
            ("notice_expiry_date", json!("2026-01-05")),
        ],
        Jurisdiction::England,
        Product::NoticeOnly,
        Stage::Preview,
    );

    let first = serde_json::to_string(&engine.validate(&req)).expect("serialize");
    let second = serde_json::to_string(&engine.validate(&req)).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn unsupported_combination_short_circuits() {
    let engine = orchestrator();
    let result = engine.validate(&request(
        &[
            ("deposit_taken", json!(true)),
            ("deposit_protected", json!(false)),
        ],
        Jurisdiction::NorthernIreland,
        Product::NoticeOnly,
        Stage::Generate,
    ));

    let unsupported = result.unsupported.expect("combination is unsupported");
    assert_eq!(unsupported.jurisdiction, Jurisdiction::NorthernIreland);
    assert!(result.allowed_routes.is_empty());
    assert!(result.blocked_routes.is_empty());
    assert!(result.blocking_issues.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn rules_stay_inside_their_jurisdiction() {
    let engine = orchestrator();
    let facts = [
        ("deposit_taken", json!(true)),
        ("deposit_protected", json!(false)),
        ("gas_safety_cert_served", json!(false)),
    ];

    let scotland = engine.validate(&request(
        &facts,
        Jurisdiction::Scotland,
        Product::NoticeOnly,
        Stage::Generate,
    ));
    for issue in scotland
        .blocking_issues
        .iter()
        .chain(scotland.warnings.iter())
    {
        assert!(
            issue.code.starts_with("S-"),
            "English rule {} leaked into Scotland",
            issue.code
        );
    }
    assert!(scotland
        .blocking_issues
        .iter()
        .any(|issue| issue.code == "S-DEPOSIT-UNPROTECTED"));
}

#[test]
fn confirmation_fact_demotes_resolved_cap_issue() {
    let engine = orchestrator();
    let facts = [
        ("deposit_amount", json!(2500)),
        ("rent_amount", json!(1000)),
        ("rent_frequency", json!("monthly")),
        ("deposit_cap_confirmed", json!(true)),
    ];

    let result = engine.validate(&request(
        &facts,
        Jurisdiction::England,
        Product::TenancyAgreement,
        Stage::Generate,
    ));

    assert!(!result
        .blocking_issues
        .iter()
        .any(|issue| issue.code == "TA-DEPOSIT-OVER-CAP"));
    let note = result
        .warnings
        .iter()
        .find(|issue| issue.code == "TA-DEPOSIT-OVER-CAP")
        .expect("resolved issue kept as a note");
    assert!(note.acknowledged);
}

#[test]
fn section_21_notice_arithmetic_blocks_short_notice_at_preview() {
    let engine = orchestrator();
    let result = engine.validate(&request(
        &[
            ("notice_service_date", json!("22/12/2025")),
            ("notice_expiry_date", json!("2026-01-22")),
        ],
        Jurisdiction::England,
        Product::NoticeOnly,
        Stage::Preview,
    ));

    let issue = result
        .blocking_issues
        .iter()
        .find(|issue| issue.code == "E21-NOTICE-SHORT")
        .expect("short notice blocks at preview");
    assert_eq!(issue.citation, "Housing Act 1988 s.21(1)");
}

#[test]
fn scotland_notice_period_depends_on_tenancy_length() {
    let engine = orchestrator();
    // Three-year tenancy with a sale ground: 84 days required, 30 given.
    let result = engine.validate(&request(
        &[
            ("tenancy_start_date", json!("2023-01-01")),
            ("landlord_intends_to_sell", json!(true)),
            ("notice_service_date", json!("2026-01-01")),
            ("notice_expiry_date", json!("2026-01-31")),
        ],
        Jurisdiction::Scotland,
        Product::NoticeOnly,
        Stage::Preview,
    ));
    assert!(result
        .blocking_issues
        .iter()
        .any(|issue| issue.code == "S-NTL-PERIOD-SHORT"));

    // Same dates but a tenancy under six months: 28 days suffice.
    let young = engine.validate(&request(
        &[
            ("tenancy_start_date", json!("2025-10-01")),
            ("landlord_intends_to_sell", json!(true)),
            ("notice_service_date", json!("2026-01-01")),
            ("notice_expiry_date", json!("2026-01-31")),
        ],
        Jurisdiction::Scotland,
        Product::NoticeOnly,
        Stage::Preview,
    ));
    assert!(!young
        .blocking_issues
        .iter()
        .any(|issue| issue.code == "S-NTL-PERIOD-SHORT"));
}

#[test]
fn wales_notice_cannot_be_served_in_first_six_months() {
    let engine = orchestrator();
    let result = engine.validate(&request(
        &[
            ("contract_start_date", json!("2025-11-01")),
            ("notice_service_date", json!("2026-01-10")),
            ("written_statement_provided", json!(true)),
        ],
        Jurisdiction::Wales,
        Product::NoticeOnly,
        Stage::Preview,
    ));

    assert!(result.is_route_blocked(&RouteId::new("section_173")));
    assert!(result
        .blocking_issues
        .iter()
        .any(|issue| issue.code == "W173-SERVED-TOO-EARLY"));
}

#[test]
fn clean_section_21_case_is_recommended() {
    let engine = orchestrator();
    let result = engine.validate(&request(
        &[
            ("deposit_taken", json!(true)),
            ("deposit_protected", json!(true)),
            ("prescribed_info_served", json!(true)),
            ("gas_safety_cert_served", json!(true)),
            ("epc_served", json!(true)),
            ("how_to_rent_served", json!(true)),
            ("licensing_required", json!(false)),
            ("improvement_notice_active", json!(false)),
            ("tenancy_start_date", json!("2024-06-01")),
            ("arrears_months", json!(2.5)),
        ],
        Jurisdiction::England,
        Product::NoticeOnly,
        Stage::Checkpoint,
    ));

    // Both routes are open; section 8 carries a made-out mandatory ground
    // so it is the recommendation.
    assert!(result.allowed_routes.contains(&RouteId::new("section_21")));
    assert!(result.allowed_routes.contains(&RouteId::new("section_8")));
    assert_eq!(result.recommended_routes, vec![RouteId::new("section_8")]);
    assert!(result
        .route_explanations
        .get(&RouteId::new("section_8"))
        .expect("explanation")
        .contains("Ground 8"));
}
