//! Latest user-visible notice (toast).
//!
//! Written by the auth interceptor and by pages after failed actions; read by
//! the toast in the app shell.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use std::cell::Cell;
use std::rc::Rc;

use super::observable::{Observable, Subscription};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Increases with every post, so repeating the same text still
    /// re-renders.
    pub id: u64,
    pub message: String,
}

/// Shared notice slot.
#[derive(Clone)]
pub struct Notices {
    slot: Observable<Option<Notice>>,
    next_id: Rc<Cell<u64>>,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

impl Notices {
    pub fn new() -> Self {
        Self { slot: Observable::new(None), next_id: Rc::new(Cell::new(1)) }
    }

    pub fn post(&self, message: &str) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        log::debug!("notice: {message}");
        self.slot.set(Some(Notice { id, message: message.to_owned() }));
    }

    pub fn current(&self) -> Option<Notice> {
        self.slot.get()
    }

    /// Clear the notice if it is still the one with `id`.
    pub fn dismiss(&self, id: u64) {
        if self.slot.with(|current| current.as_ref().is_some_and(|n| n.id == id)) {
            self.slot.set(None);
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&Option<Notice>) + 'static) -> Subscription {
        self.slot.subscribe(callback)
    }
}

impl std::fmt::Debug for Notices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notices").field("current", &self.current()).finish()
    }
}
