//! Gate components: `RoleRoute`, `PermissionGuard`, `RoleBasedAccess`.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::*;
use leptos_router::{NavigateOptions, Redirect};

use bizdash_auth::{AccessRequirement, SessionState};

use crate::config::GateConfig;
use crate::frontend::browser::{AlertNotifier, RouterNavigator};
use crate::guard::{self, GuardView};
use crate::route_gate::{self, RouteOutcome};
use crate::routes::{ProtectedRegion, RouteTable};
use crate::visibility::gated;

/// Current session from context. Without a provider nobody is signed in.
pub fn use_session() -> Signal<SessionState> {
    match use_context::<RwSignal<SessionState>>() {
        Some(session) => session.into(),
        None => Signal::derive(|| SessionState::Anonymous),
    }
}

fn use_gate_config() -> GateConfig {
    use_context::<GateConfig>().unwrap_or_default()
}

/// Route wrapper: renders the page or replaces the history entry.
#[component]
pub fn RoleRoute(
    requirement: AccessRequirement,
    #[prop(optional_no_strip)] fallback_path: Option<String>,
    children: ChildrenFn,
) -> impl IntoView {
    let session = use_session();
    let config = use_gate_config();
    let region = ProtectedRegion {
        requirement,
        fallback_path,
    };

    move || match route_gate::resolve(&session.get(), &region, &config) {
        RouteOutcome::Pending => ().into_view(),
        RouteOutcome::Render => children().into_view(),
        RouteOutcome::Redirect { to } => view! {
            <Redirect
                path=to
                options=NavigateOptions { replace: true, ..Default::default() }
            />
        }
        .into_view(),
    }
}

/// Imperative guard: on denial, alerts and navigates away.
#[component]
pub fn PermissionGuard(
    requirement: AccessRequirement,
    #[prop(optional, into)] fallback_path: Option<String>,
    children: ChildrenFn,
) -> impl IntoView {
    let session = use_session();
    let region = ProtectedRegion {
        requirement,
        fallback_path,
    };
    let guard = Rc::new(RefCell::new(guard::PermissionGuard::new(
        RouterNavigator::new(),
        AlertNotifier,
        use_gate_config(),
    )));
    let rendered = create_rw_signal(GuardView::Pending);

    {
        let guard = Rc::clone(&guard);
        create_effect(move |_| {
            let state = session.get();
            let next = guard.borrow_mut().render(&state, &region);
            rendered.set(next);
        });
    }
    on_cleanup(move || guard.borrow_mut().unmount());

    move || rendered.get().renders_children().then(|| children())
}

/// Inline gate: children when allowed, `fallback` (default nothing) otherwise.
#[component]
pub fn RoleBasedAccess(
    requirement: AccessRequirement,
    #[prop(optional, into)] fallback: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let session = use_session();

    move || {
        gated(
            &session.get(),
            &requirement,
            || children().into_view(),
            Some(|| fallback.run()),
        )
    }
}

/// Page wrapper that looks its protection up in the route table.
#[component]
pub fn ProtectedPage(path: &'static str, children: ChildrenFn) -> impl IntoView {
    let table = use_context::<RouteTable>().unwrap_or_else(RouteTable::dashboard_default);

    match table.region_for(path).cloned() {
        Some(region) => view! {
            <RoleRoute requirement=region.requirement fallback_path=region.fallback_path>
                {children()}
            </RoleRoute>
        }
        .into_view(),
        None => children().into_view(),
    }
}
