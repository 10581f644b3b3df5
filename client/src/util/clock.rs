//! Wall-clock access.
//!
//! `time::OffsetDateTime::now_utc` is unusable on `wasm32-unknown-unknown`,
//! so the browser build reads `Date.now()` instead. Session logic takes a
//! `Clock` so tests can pin or advance time.

use time::OffsetDateTime;

/// Source of the current UTC time.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// The real clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        #[cfg(feature = "hydrate")]
        {
            #[allow(clippy::cast_possible_truncation)]
            let millis = js_sys::Date::now() as i128;
            OffsetDateTime::from_unix_timestamp_nanos(millis * 1_000_000).unwrap_or(OffsetDateTime::UNIX_EPOCH)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            OffsetDateTime::now_utc()
        }
    }
}
