use std::sync::Arc;

use chrono::{Duration, Utc};
use proptest::prelude::*;

use bizdash_auth::{
    AccessRequirement, Actor, InMemorySession, PersistedSession, Role, SessionProvider,
    SessionState,
};
use bizdash_core::ActorId;
use bizdash_dashboard::{
    GateConfig, GuardView, MemoryHistory, PermissionGuard, ProtectedRegion, RecordingNotifier,
    RouteOutcome, RouteTable, Visibility, route_gate, visibility,
};

fn authenticated(role: Role, perms: &[&'static str]) -> SessionState {
    SessionState::Authenticated(Actor::new(ActorId::new(), role).with_permissions(perms.iter().copied()))
}

/// Decision of each adapter reduced to allow/deny, for one session and path.
fn adapter_verdicts(session: &SessionState, region: &ProtectedRegion) -> (bool, bool, bool) {
    let config = GateConfig::default();

    let route = route_gate::resolve(session, region, &config) == RouteOutcome::Render;

    let history = MemoryHistory::new("/start");
    let notifier = RecordingNotifier::new();
    let mut guard = PermissionGuard::new(&history, &notifier, config);
    let guarded = guard.render(session, region) == GuardView::Children;

    let shown = visibility::visibility(session, &region.requirement) == Visibility::Children;

    (route, guarded, shown)
}

#[test]
fn employee_without_permission_is_sent_to_dashboard_with_one_notification() {
    let table = RouteTable::dashboard_default();
    let region = table.region_for("/employees").unwrap();
    let session = authenticated(Role::EMPLOYEE, &["view_orders"]);

    let history = MemoryHistory::new("/dashboard");
    history.visit("/employees");
    let notifier = RecordingNotifier::new();
    let mut guard = PermissionGuard::new(&history, &notifier, GateConfig::default());

    assert_eq!(guard.render(&session, region), GuardView::Nothing);
    assert_eq!(history.current(), "/dashboard");

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].description.contains("manage_employees"));
}

#[test]
fn manager_reaches_analytics_through_every_adapter() {
    let table = RouteTable::dashboard_default();
    let region = table.region_for("/analytics").unwrap();
    let session = authenticated(Role::MANAGER, &[]);

    assert_eq!(adapter_verdicts(&session, region), (true, true, true));
}

#[test]
fn anonymous_visitor_is_redirected_to_login_without_notification() {
    let region = ProtectedRegion::new(AccessRequirement::roles(["admin"])).with_fallback_path("/orders");

    let history = MemoryHistory::new("/settings");
    let outcome = route_gate::enforce(&history, &SessionState::Anonymous, &region, &GateConfig::default());
    assert_eq!(outcome, RouteOutcome::Redirect { to: "/login".to_string() });

    let notifier = RecordingNotifier::new();
    let mut guard = PermissionGuard::new(&history, &notifier, GateConfig::default());
    guard.render(&SessionState::Anonymous, &region);
    assert!(notifier.sent().is_empty());
}

#[test]
fn guard_follows_session_provider_transitions() {
    let provider = Arc::new(InMemorySession::new());
    let changes = provider.subscribe();

    let table = RouteTable::dashboard_default();
    let region = table.region_for("/orders/17").unwrap();

    let history = MemoryHistory::new("/orders/17");
    let notifier = RecordingNotifier::new();
    let mut guard = PermissionGuard::new(&history, &notifier, GateConfig::default());

    // Storage not read yet: nothing rendered, nothing navigated.
    assert_eq!(guard.render(&provider.current(), region), GuardView::Pending);

    // Persisted session resolves to a clerk allowed to view orders.
    let clerk = Actor::new(ActorId::new(), Role::EMPLOYEE).with_permission("view_orders");
    let raw = serde_json::to_string(&PersistedSession::from_actor(&clerk, Some(Utc::now() + Duration::hours(8)))).unwrap();
    provider.restore(Some(&raw), Utc::now());

    let state = changes.latest().expect("restore publishes");
    assert_eq!(guard.render(&state, region), GuardView::Children);

    provider.logout();
    let state = changes.latest().expect("logout publishes");
    assert_eq!(guard.render(&state, region), GuardView::Nothing);

    assert_eq!(history.entries(), vec!["/orders/17", "/login"]);
    assert!(notifier.sent().is_empty());
}

#[test]
fn corrupted_storage_never_grants_access() {
    let provider = InMemorySession::new();
    provider.restore(Some(r#"{"user":{"id":"42"},"role":"admin"}"#), Utc::now());
    assert_eq!(provider.current(), SessionState::Anonymous);

    let table = RouteTable::dashboard_default();
    let region = table.region_for("/settings").unwrap();
    assert_eq!(
        route_gate::resolve(&provider.current(), region, &GateConfig::default()),
        RouteOutcome::Redirect { to: "/login".to_string() }
    );
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::ADMIN),
        Just(Role::SUPER_ADMIN),
        Just(Role::MANAGER),
        Just(Role::EMPLOYEE),
        Just(Role::new("accountant")),
    ]
}

fn arb_perm() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("manage_employees"),
        Just("view_orders"),
        Just("view_messages"),
        Just("edit_settings"),
    ]
}

fn arb_session() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        1 => Just(SessionState::Anonymous),
        4 => (arb_role(), prop::collection::vec(arb_perm(), 0..4)).prop_map(|(role, perms)| {
            SessionState::Authenticated(Actor::new(ActorId::new(), role).with_permissions(perms))
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Property: all adapters agree for identical (session, requirement) pairs.
    #[test]
    fn adapters_converge_on_the_same_decision(
        session in arb_session(),
        path in prop_oneof![
            Just("/employees"),
            Just("/orders"),
            Just("/analytics"),
            Just("/settings"),
            Just("/messages"),
        ],
    ) {
        let table = RouteTable::dashboard_default();
        let region = table.region_for(path).unwrap();
        let (route, guarded, shown) = adapter_verdicts(&session, region);
        prop_assert_eq!(route, guarded);
        prop_assert_eq!(guarded, shown);
    }
}
