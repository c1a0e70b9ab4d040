//! Utility helpers shared across pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (navigation, redirects) from page
//! logic so the session core stays testable off the browser.

pub mod auth;
pub mod navigation;
