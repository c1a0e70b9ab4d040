//! Login and registration page.
//!
//! Successful login navigates to the dashboard from inside the session
//! manager; this page only collects input and shows the outcome.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::app::use_services;
use crate::net::types::{LoginRequest, RegisterRequest};

const MIN_PASSWORD_LEN: usize = 6;

/// Trim and require both fields.
pub fn validate_login_input(identity: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let identity = identity.trim();
    if identity.is_empty() || password.is_empty() {
        return Err("Enter your username or email and password.");
    }
    Ok(LoginRequest { username_or_email: identity.to_owned(), password: password.to_owned() })
}

pub fn validate_register_input(username: &str, email: &str, password: &str) -> Result<RegisterRequest, &'static str> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err("Fill in username, email and password.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    Ok(RegisterRequest { username: username.to_owned(), email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let services = use_services();
    let register_mode = RwSignal::new(false);
    let identity = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_login = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match validate_login_input(&identity.get(), &password.get()) {
            Ok(request) => request,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());
        let session = services.with_value(|s| s.session.clone());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match session.login(request).await {
                Ok(_) if session.is_authenticated() => info.set(String::new()),
                Ok(response) => {
                    info.set(response.message.unwrap_or_else(|| "Login failed. Please try again.".to_owned()));
                }
                Err(e) => info.set(e.notice().to_owned()),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (session, request);
    };

    let on_register = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match validate_register_input(&username.get(), &identity.get(), &password.get()) {
            Ok(request) => request,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating account...".to_owned());
        let session = services.with_value(|s| s.session.clone());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match session.register(request).await {
                Ok(_) => {
                    register_mode.set(false);
                    info.set("Account created. You can sign in now.".to_owned());
                }
                Err(e) => info.set(e.notice().to_owned()),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (session, request);
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Moodlog"</h1>
                <Show
                    when=move || register_mode.get()
                    fallback=move || {
                        view! {
                            <form class="login-form" on:submit=on_login>
                                <input
                                    class="login-input"
                                    type="text"
                                    placeholder="Username or email"
                                    prop:value=move || identity.get()
                                    on:input=move |ev| identity.set(event_target_value(&ev))
                                />
                                <input
                                    class="login-input"
                                    type="password"
                                    placeholder="Password"
                                    prop:value=move || password.get()
                                    on:input=move |ev| password.set(event_target_value(&ev))
                                />
                                <button class="login-button" type="submit" disabled=move || busy.get()>
                                    "Sign In"
                                </button>
                            </form>
                        }
                    }
                >
                    <form class="login-form" on:submit=on_register>
                        <input
                            class="login-input"
                            type="text"
                            placeholder="Username"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="email"
                            placeholder="you@example.com"
                            prop:value=move || identity.get()
                            on:input=move |ev| identity.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <button class="login-button" type="submit" disabled=move || busy.get()>
                            "Create Account"
                        </button>
                    </form>
                </Show>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <button
                    class="login-toggle"
                    type="button"
                    on:click=move |_| {
                        register_mode.update(|m| *m = !*m);
                        info.set(String::new());
                    }
                >
                    {move || if register_mode.get() { "Have an account? Sign in" } else { "New here? Create an account" }}
                </button>
            </div>
        </div>
    }
}
