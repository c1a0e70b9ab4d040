//! Fallback page for unknown routes and unrecoverable failures.

use leptos::prelude::*;

use crate::util::navigation::HOME_PATH;

#[component]
pub fn ErrorPage() -> impl IntoView {
    view! {
        <div class="error-page">
            <h1>"Something went wrong"</h1>
            <p>"The page you were looking for could not be shown."</p>
            <a href=HOME_PATH class="btn">"Back to dashboard"</a>
        </div>
    }
}
