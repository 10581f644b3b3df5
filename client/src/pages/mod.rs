//! Route-level pages.
//!
//! ARCHITECTURE
//! ============
//! Each page owns its data loading through the shared services and delegates
//! rendering details to `components`.

pub mod home;
pub mod login;
pub mod reviews;
pub mod subjects;
