//! `bizdash-core` — shared building blocks for the dashboard crates.
//!
//! This crate holds identifiers and the common error model only (no UI, no IO).

pub mod error;
pub mod id;

pub use error::{CoreError, CoreResult};
pub use id::ActorId;
