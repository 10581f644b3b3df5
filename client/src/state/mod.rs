//! Shared reactive state types.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root component wraps these in `RwSignal`s and provides them via
//! context; pages and components read and update them from there.

pub mod auth;
pub mod reviews;
pub mod ui;
