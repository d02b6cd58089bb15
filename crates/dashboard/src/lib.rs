//! `bizdash-dashboard`
//!
//! **Responsibility:** turn access decisions into UI behaviour.
//!
//! This crate provides:
//! - Navigation/notification service traits (plus in-memory doubles)
//! - The three gate adapters: imperative guard, route redirect, conditional visibility
//! - The protected route table and gate configuration
//! - Leptos components for the browser build (wasm32)
//!
//! The evaluator itself lives in `bizdash-auth`; every adapter goes through it.

pub mod config;
pub mod guard;
pub mod route_gate;
pub mod routes;
pub mod services;
pub mod visibility;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use config::{ConfigError, GateConfig};
pub use guard::{GuardView, PermissionGuard};
pub use route_gate::RouteOutcome;
pub use routes::{ProtectedRegion, RouteEntry, RouteTable};
pub use services::{
    MemoryHistory, Navigator, Notification, Notifier, RecordingNotifier, RedirectOptions, Severity,
    TracingNotifier,
};
pub use visibility::{Visibility, gated, visibility};
