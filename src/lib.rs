//! # moodlog
//!
//! Leptos + WASM frontend for the mood-tracking application.
//!
//! This crate contains the session core (credential storage, token decoding,
//! session state, the HTTP gateway and route guarding), the typed REST
//! clients for mood entries, emotions and suggested activities, and the thin
//! page layer that renders them.

pub mod app;
pub mod auth;
pub mod config;
pub mod net;
pub mod pages;
pub mod services;
pub mod state;
pub mod storage;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

/// Browser entry point: installs console logging and hydrates the SSR shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
