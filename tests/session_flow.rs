//! Session lifecycle: login, ingest, optimize, present, logout.

mod fixtures;

use routemind::auth::CredentialTable;
use routemind::error::SessionError;
use routemind::extract::{AddressExtractor, ExtractionRules};
use routemind::model::GateCode;
use routemind::planner::{OptimizerMode, PlanOptions, RoutePlanner};
use routemind::present::{DEFAULT_MAPS_BASE, NO_GATE_CODE};
use routemind::session::{Session, DEFAULT_DEPOTS};

use fixtures::{FixedLines, MemoryStore, Script, ScriptedRouter, TableGeocoder};

fn credentials() -> CredentialTable {
    CredentialTable::default().with_user("driver", "s3cret")
}

fn approximate_planner() -> RoutePlanner<TableGeocoder, ScriptedRouter> {
    RoutePlanner::new(
        TableGeocoder::empty(),
        ScriptedRouter::new(Script::Fail),
        PlanOptions::default(),
    )
}

fn label_extractor() -> AddressExtractor<FixedLines> {
    AddressExtractor::new(
        Some(FixedLines(vec![
            "AMAZON",
            "Today 50 B St",
            "10 a st",
            "Fragile",
        ])),
        ExtractionRules::default(),
    )
}

#[test]
fn new_session_starts_logged_out_at_first_depot() {
    let session = Session::default();

    assert!(!session.authenticated);
    assert_eq!(session.depot, DEFAULT_DEPOTS[0]);
    assert_eq!(session.depots().len(), 3);
    assert!(session.addresses.is_empty());
}

#[test]
fn login_rejects_wrong_password_and_unknown_user() {
    let mut session = Session::default();

    assert!(!session.login(&credentials(), "driver", "wrong"));
    assert!(!session.login(&credentials(), "someone", "s3cret"));
    assert!(!session.authenticated);
    assert!(session.login(&credentials(), "driver", "s3cret"));
    assert!(session.authenticated);
}

#[test]
fn optimize_requires_login() {
    let mut session = Session::default();
    session.add_addresses(vec!["10 A St".to_string(), "50 B St".to_string()]);

    let err = session.optimize(&approximate_planner()).unwrap_err();

    assert_eq!(err, SessionError::NotAuthenticated);
    assert!(session.optimized_route.is_empty());
    assert!(session.route_details.is_empty());
}

#[test]
fn depot_is_selected_by_number_or_name() {
    let mut session = Session::default();

    assert_eq!(session.select_depot("2").unwrap(), DEFAULT_DEPOTS[1]);
    assert_eq!(session.select_depot(DEFAULT_DEPOTS[2]).unwrap(), DEFAULT_DEPOTS[2]);
    assert_eq!(
        session.select_depot("4"),
        Err(SessionError::UnknownDepot("4".to_string()))
    );
    assert!(session.select_depot("0").is_err());
    assert_eq!(session.depot, DEFAULT_DEPOTS[2], "failed selection keeps the depot");
}

#[test]
fn custom_depots_replace_the_defaults() {
    let session = Session::new(vec!["1 Yard Rd, Tucson, AZ".to_string()]);
    assert_eq!(session.depots(), ["1 Yard Rd, Tucson, AZ".to_string()]);
    assert_eq!(session.depot, "1 Yard Rd, Tucson, AZ");
}

#[test]
fn ingest_collects_addresses_from_every_image() {
    let mut session = Session::default();

    let found = session.ingest_images(&label_extractor(), [&b"label-1"[..], &b"label-2"[..]]);

    assert_eq!(found, 4);
    assert_eq!(
        session.addresses,
        vec!["50 B St", "10 a st", "50 B St", "10 a st"]
    );
}

#[test]
fn ingest_skips_sentinels_and_keeps_previous_list_when_nothing_found() {
    let mut session = Session::default();
    session.add_addresses(vec!["  10 A St  ".to_string(), String::new()]);
    assert_eq!(session.addresses, vec!["10 A St"]);

    let unreadable = session.ingest_images(&label_extractor(), [b"corrupt".to_vec()]);
    assert_eq!(unreadable, 0);

    let no_engine: AddressExtractor<FixedLines> = AddressExtractor::new(None, ExtractionRules::default());
    assert_eq!(session.ingest_images(&no_engine, [b"label".to_vec()]), 0);

    let nothing = AddressExtractor::new(Some(FixedLines(vec!["AMAZON"])), ExtractionRules::default());
    assert_eq!(session.ingest_images(&nothing, [b"label".to_vec()]), 0);

    assert_eq!(session.addresses, vec!["10 A St"]);
}

#[test]
fn ingest_replaces_previous_addresses() {
    let mut session = Session::default();
    session.add_addresses(vec!["1 Old Rd".to_string()]);

    let found = session.ingest_images(&label_extractor(), [b"corrupt".to_vec(), b"label".to_vec()]);

    assert_eq!(found, 2);
    assert_eq!(session.addresses, vec!["50 B St", "10 a st"]);
}

#[test]
fn failed_gate_code_refresh_keeps_previous_codes() {
    let mut session = Session::default();
    let store = MemoryStore::new(vec![GateCode::new("10 A St", "1234#")]);

    assert_eq!(session.refresh_gate_codes(&store).unwrap(), 1);
    store.set_down(true);
    assert!(session.refresh_gate_codes(&store).is_err());
    assert_eq!(session.gate_codes, vec![GateCode::new("10 A St", "1234#")]);
}

#[test]
fn approximate_flow_end_to_end() {
    let mut session = Session::default();
    assert!(session.login(&credentials(), "driver", "s3cret"));
    session.ingest_images(&label_extractor(), [b"label".to_vec()]);
    session
        .refresh_gate_codes(&MemoryStore::new(vec![GateCode::new("10 A St", "1234#")]))
        .unwrap();

    let plan = session.optimize(&approximate_planner()).unwrap();

    assert_eq!(plan.mode, OptimizerMode::Approximate);
    assert_eq!(session.optimized_route, vec!["10 a st", "50 B St"]);
    assert_eq!(session.route_details.len(), 2);

    let summary = session.summary();
    assert_eq!(summary.rows[0].gate_code, "1234#");
    assert_eq!(summary.rows[1].gate_code, NO_GATE_CODE);
    let total: f64 = session.route_details.iter().map(|s| s.distance_km).sum();
    assert!((summary.total_distance_km - total).abs() < 1e-9);

    let table = summary.to_string();
    assert!(table.contains("Total Distance:"));
    assert!(table.contains("Total Time:"));

    let url = session.directions_url(DEFAULT_MAPS_BASE).unwrap();
    assert!(url.starts_with("https://www.google.com/maps/dir/?api=1&origin=7300+N+Silverbell+Rd"));
    assert!(url.ends_with("&destination=50+B+St&waypoints=10+a+st"));
}

#[test]
fn service_flow_uses_selected_depot() {
    let geocoder = TableGeocoder::tucson()
        .with("10 A St", -110.97, 32.22)
        .with("50 B St", -110.95, 32.23);
    let planner = RoutePlanner::new(
        &geocoder,
        ScriptedRouter::new(Script::Order(vec![2, 1])),
        PlanOptions {
            mode: OptimizerMode::Service,
            ..PlanOptions::default()
        },
    );
    let mut session = Session::default();
    session.login(&credentials(), "driver", "s3cret");
    session.select_depot("3").unwrap();
    session.add_addresses(vec!["10 A St".to_string(), "50 B St".to_string()]);

    let plan = session.optimize(&planner).unwrap();

    assert_eq!(plan.order, vec!["50 B St", "10 A St"]);
    assert!(geocoder.calls().iter().any(|call| call == DEFAULT_DEPOTS[2]));
}

#[test]
fn logout_resets_everything() {
    let mut session = Session::new(vec!["1 Yard Rd".to_string(), "2 Yard Rd".to_string()]);
    session.login(&credentials(), "driver", "s3cret");
    session.select_depot("2").unwrap();
    session.add_addresses(vec!["10 A St".to_string(), "50 B St".to_string()]);
    session
        .refresh_gate_codes(&MemoryStore::new(vec![GateCode::new("10 A St", "1")]))
        .unwrap();
    session.optimize(&approximate_planner()).unwrap();

    session.logout();

    assert!(!session.authenticated);
    assert_eq!(session.depot, "1 Yard Rd");
    assert_eq!(session.depots().len(), 2);
    assert!(session.addresses.is_empty());
    assert!(session.optimized_route.is_empty());
    assert!(session.route_details.is_empty());
    assert!(session.gate_codes.is_empty());
}
