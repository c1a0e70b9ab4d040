//! Navigation seam shared by the session manager and route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Session transitions redirect (login → dashboard, logout → login) from code
//! that runs outside any component. `BrowserNavigator` forwards to the
//! `leptos_router` navigate hook once the router has mounted and falls back
//! to a full `window.location` change before that.

use std::cell::RefCell;
use std::rc::Rc;

/// Login / registration view.
pub const LOGIN_PATH: &str = "/auth";
/// Main authenticated view.
pub const HOME_PATH: &str = "/dashboard";
pub const HISTORY_PATH: &str = "/history";
pub const MOOD_ENTRY_PATH: &str = "/mood-entry";
pub const ERROR_PATH: &str = "/error";

pub trait Navigator {
    fn navigate(&self, path: &str);
    fn current_path(&self) -> String;
}

type RouterNavigate = Rc<dyn Fn(&str)>;

#[derive(Default)]
pub struct BrowserNavigator {
    router: RefCell<Option<RouterNavigate>>,
}

impl BrowserNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route future navigations through the client-side router.
    pub fn attach_router(&self, navigate: impl Fn(&str) + 'static) {
        *self.router.borrow_mut() = Some(Rc::new(navigate));
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        let router = self.router.borrow().clone();
        if let Some(navigate) = router {
            navigate(path);
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(path);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            log::debug!("navigation to {path} ignored outside the browser");
        }
    }

    fn current_path(&self) -> String {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| "/".to_owned())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            "/".to_owned()
        }
    }
}
