//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (clock, storage, dialogs) and
//! display formatting from page, component and session logic.

pub mod clock;
pub mod dom;
pub mod format;
pub mod storage;
