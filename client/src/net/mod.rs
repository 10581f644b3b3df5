//! Backend access: GoTrue auth and the PostgREST review table.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` describes and sends requests, `auth` owns the persisted session and
//! auth notifications, `reviews` wraps the `comments` table, and `types`
//! defines the shared wire schema. Every operation returns `ApiResult`.

pub mod auth;
pub mod error;
pub mod http;
pub mod reviews;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
