//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Builds the service graph once, mirrors the session and notice observables
//! into Leptos signals, and mounts the router. Services are not `Send`, so
//! they travel through context as a local `StoredValue`.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::hooks::use_navigate;
use leptos_router::{
    NavigateOptions, ParamSegment, StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::pages::{
    dashboard::DashboardPage, error::ErrorPage, history::HistoryPage, login::LoginPage, mood_entry::MoodEntryPage,
};
use crate::services::Services;
use crate::state::notice::Notice;
use crate::state::session::SessionState;
use crate::util::navigation::{BrowserNavigator, ERROR_PATH, HOME_PATH};

/// Context handle for the service graph.
pub type ServicesContext = StoredValue<Services, LocalStorage>;

type NavigatorContext = StoredValue<Rc<BrowserNavigator>, LocalStorage>;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let navigator = Rc::new(BrowserNavigator::new());
    let services = Services::browser(Rc::clone(&navigator));

    let session = RwSignal::new(services.session.state());
    services.session.subscribe(move |state| session.set(state.clone())).detach();
    let notice = RwSignal::new(None::<Notice>);
    services.notices.subscribe(move |current| notice.set(current.clone())).detach();

    let services: ServicesContext = StoredValue::new_local(services);
    let navigator: NavigatorContext = StoredValue::new_local(navigator);
    provide_context(services);
    provide_context(navigator);
    provide_context(session);
    provide_context(notice);

    // Effects only run in the browser, so SSR renders the resolving state.
    Effect::new(move || services.with_value(|s| s.session.initialize()));

    view! {
        <Stylesheet id="leptos" href="/pkg/moodlog.css"/>
        <Title text="Moodlog"/>

        <Router>
            <NavigatorBridge/>
            <NoticeToast/>
            <Routes fallback=|| view! { <Redirect path=ERROR_PATH/> }>
                <Route path=StaticSegment("") view=|| view! { <Redirect path=HOME_PATH/> }/>
                <Route path=StaticSegment("auth") view=LoginPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
                <Route path=StaticSegment("history") view=HistoryPage/>
                <Route path=StaticSegment("mood-entry") view=MoodEntryPage/>
                <Route path=(StaticSegment("mood-entry"), ParamSegment("id")) view=MoodEntryPage/>
                <Route path=StaticSegment("error") view=ErrorPage/>
            </Routes>
        </Router>
    }
}

/// Routes session redirects through the client-side router once mounted.
#[component]
fn NavigatorBridge() -> impl IntoView {
    let navigator = expect_context::<NavigatorContext>();
    let navigate = use_navigate();
    navigator.with_value(|nav| nav.attach_router(move |path| navigate(path, NavigateOptions::default())));
}

#[component]
fn NoticeToast() -> impl IntoView {
    let services = expect_context::<ServicesContext>();
    let notice = expect_context::<RwSignal<Option<Notice>>>();

    let dismiss = move |_| {
        if let Some(current) = notice.get_untracked() {
            services.with_value(|s| s.notices.dismiss(current.id));
        }
    };

    view! {
        <Show when=move || notice.get().is_some()>
            <div class="toast" role="status" on:click=dismiss>
                {move || notice.get().map(|n| n.message).unwrap_or_default()}
            </div>
        </Show>
    }
}

/// Session signal provided by [`App`].
pub fn use_session() -> RwSignal<SessionState> {
    expect_context::<RwSignal<SessionState>>()
}

/// Service graph provided by [`App`].
pub fn use_services() -> ServicesContext {
    expect_context::<ServicesContext>()
}
