//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration: it reads the session signal,
//! calls the typed APIs from `Services`, and keeps input parsing in small pure
//! helpers that are unit tested.

pub mod dashboard;
pub mod error;
pub mod history;
pub mod login;
pub mod mood_entry;
