//! Last-activity stamp and the inactivity expiry rule.
//!
//! The stamp is an RFC 3339 string under `lastActivity`, the same shape JS
//! `Date.toISOString()` produces, so sessions stamped by earlier builds of
//! the site keep working.

#[cfg(test)]
#[path = "activity_test.rs"]
mod activity_test;

use std::rc::Rc;

use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::util::clock::Clock;
use crate::util::storage::KeyValueStore;

/// Storage key for the last-activity stamp.
pub const LAST_ACTIVITY_KEY: &str = "lastActivity";

/// `true` when no stamp exists or at least `window` has passed since it.
pub fn is_expired_at(last_activity: Option<OffsetDateTime>, now: OffsetDateTime, window: Duration) -> bool {
    match last_activity {
        Some(at) => now - at >= window,
        None => true,
    }
}

/// Reads and writes the persisted last-activity stamp.
#[derive(Clone)]
pub struct ActivityTracker {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    window: Duration,
}

impl ActivityTracker {
    pub fn new(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>, window: Duration) -> Self {
        Self { store, clock, window }
    }

    /// Overwrite the stamp with the current time.
    pub fn record_activity(&self) {
        match self.clock.now().format(&Rfc3339) {
            Ok(stamp) => self.store.set(LAST_ACTIVITY_KEY, &stamp),
            Err(e) => log::warn!("could not format activity timestamp: {e}"),
        }
    }

    /// The stored stamp; a value that does not parse counts as missing.
    pub fn last_activity_at(&self) -> Option<OffsetDateTime> {
        let raw = self.store.get(LAST_ACTIVITY_KEY)?;
        OffsetDateTime::parse(raw.trim(), &Rfc3339).ok()
    }

    pub fn is_expired(&self) -> bool {
        is_expired_at(self.last_activity_at(), self.clock.now(), self.window)
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
