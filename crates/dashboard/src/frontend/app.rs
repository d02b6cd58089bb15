//! Leptos application with routing.

use leptos::*;
use leptos_router::*;

use bizdash_auth::{AccessRequirement, SessionState};

use crate::config::GateConfig;
use crate::frontend::browser;
use crate::frontend::components::{PermissionGuard, ProtectedPage, RoleBasedAccess};
use crate::routes::RouteTable;

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
    // Loading until storage has been read, so guards never flash a denial.
    let session = create_rw_signal(SessionState::Loading);
    create_effect(move |_| session.set(browser::load_persisted_session()));

    let config = GateConfig::default();
    let table = RouteTable::dashboard_default();
    if let Err(e) = table.validate_with(&config) {
        tracing::error!(error = %e, "route table conflicts with gate configuration");
    }

    provide_context(session);
    provide_context(config);
    provide_context(table);

    view! {
        <Router>
            <Header/>
            <main>
                <Routes>
                    <Route path="/login" view=LoginPage/>
                    <Route path="/dashboard" view=DashboardPage/>
                    <Route path="/employees" view=|| view! {
                        <ProtectedPage path="/employees"><Page title="Employees"/></ProtectedPage>
                    }/>
                    <Route path="/orders" view=|| view! {
                        <ProtectedPage path="/orders"><Page title="Orders"/></ProtectedPage>
                    }/>
                    <Route path="/analytics" view=|| view! {
                        <ProtectedPage path="/analytics"><Page title="Analytics"/></ProtectedPage>
                    }/>
                    <Route path="/settings" view=|| view! {
                        <PermissionGuard requirement=AccessRequirement::roles(["admin", "super_admin"])>
                            <Page title="Settings"/>
                        </PermissionGuard>
                    }/>
                    <Route path="/messages" view=|| view! {
                        <ProtectedPage path="/messages"><Page title="Messages"/></ProtectedPage>
                    }/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn Header() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();

    view! {
        <header>
            <h1>"Business Dashboard"</h1>
            <nav>
                <A href="/dashboard">"Dashboard"</A>
                <RoleBasedAccess requirement=AccessRequirement::permission("manage_employees")>
                    <A href="/employees">"Employees"</A>
                </RoleBasedAccess>
                <RoleBasedAccess requirement=AccessRequirement::permission("view_orders")>
                    <A href="/orders">"Orders"</A>
                </RoleBasedAccess>
                <RoleBasedAccess requirement=AccessRequirement::roles(["admin", "manager"])>
                    <A href="/analytics">"Analytics"</A>
                </RoleBasedAccess>
                <RoleBasedAccess requirement=AccessRequirement::permission("view_messages")>
                    <A href="/messages">"Messages"</A>
                </RoleBasedAccess>
                <RoleBasedAccess requirement=AccessRequirement::roles(["admin", "super_admin"])>
                    <A href="/settings">"Settings"</A>
                </RoleBasedAccess>
            </nav>
            {move || session.get().is_authenticated().then(|| view! {
                <button on:click=move |_| browser::logout(session)>"Sign out"</button>
            })}
        </header>
    }
}

#[component]
fn LoginPage() -> impl IntoView {
    view! { <p>"Please sign in to continue."</p> }
}

#[component]
fn DashboardPage() -> impl IntoView {
    view! { <h2>"Dashboard"</h2> }
}

#[component]
fn Page(title: &'static str) -> impl IntoView {
    view! { <h2>{title}</h2> }
}
