//! Mood entry form: create at `/mood-entry`, edit at `/mood-entry/:id`.

#[cfg(test)]
#[path = "mood_entry_test.rs"]
mod mood_entry_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::app::{use_services, use_session};
use crate::net::types::{Emotion, MoodEntryCreateRequest, MoodEnvironment};
use crate::util::auth::install_route_guard;
use crate::util::navigation::{HOME_PATH, MOOD_ENTRY_PATH};

pub const MIN_ENERGY: u8 = 1;
pub const MAX_ENERGY: u8 = 5;

/// Add `key` if absent, remove it if present.
pub fn toggle_key(keys: &mut Vec<String>, key: &str) {
    if let Some(pos) = keys.iter().position(|k| k == key) {
        keys.remove(pos);
    } else {
        keys.push(key.to_owned());
    }
}

/// Assemble the request body; blank text fields are omitted.
pub fn build_entry_request(
    emotion_keys: &[String],
    environment: MoodEnvironment,
    energy_level: u8,
    location: &str,
    description: &str,
) -> Result<MoodEntryCreateRequest, &'static str> {
    if emotion_keys.is_empty() {
        return Err("Pick at least one emotion.");
    }
    if !(MIN_ENERGY..=MAX_ENERGY).contains(&energy_level) {
        return Err("Energy level must be between 1 and 5.");
    }
    let optional = |s: &str| Some(s.trim().to_owned()).filter(|s| !s.is_empty());
    Ok(MoodEntryCreateRequest {
        emotion_keys: emotion_keys.to_vec(),
        location: optional(location),
        environment,
        description: optional(description),
        energy_level,
        is_voice_input: false,
    })
}

#[component]
pub fn MoodEntryPage() -> impl IntoView {
    let services = use_services();
    let session = use_session();
    let navigate = use_navigate();
    install_route_guard(session, services.with_value(|s| s.guard.clone()), MOOD_ENTRY_PATH);

    let params = use_params_map();
    let editing_id = move || params.read().get("id").and_then(|id| id.parse::<i64>().ok());

    let emotions = RwSignal::new(Vec::<Emotion>::new());
    let selected = RwSignal::new(Vec::<String>::new());
    let environment = RwSignal::new(MoodEnvironment::Alone);
    let energy = RwSignal::new(3_u8);
    let location = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let requested = RwSignal::new(false);

    Effect::new(move || {
        if requested.get_untracked() || !session.get().is_authenticated() {
            return;
        }
        requested.set(true);
        let (emotion_api, mood_api) = services.with_value(|s| (s.emotions.clone(), s.moods.clone()));
        let id = editing_id();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Ok(list) = emotion_api.root().await {
                emotions.set(list);
            }
            if let Some(id) = id
                && let Ok(entry) = mood_api.by_id(id).await
            {
                selected.set(entry.emotion_keys);
                environment.set(entry.environment);
                energy.set(entry.energy_level);
                location.set(entry.location.unwrap_or_default());
                description.set(entry.description.unwrap_or_default());
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (emotion_api, mood_api, id);
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match build_entry_request(
            &selected.get(),
            environment.get(),
            energy.get(),
            &location.get(),
            &description.get(),
        ) {
            Ok(request) => request,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        let api = services.with_value(|s| s.moods.clone());
        let id = editing_id();
        let navigate = navigate.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let saved = match id {
                Some(id) => api.update(id, &request).await,
                None => api.create(&request).await,
            };
            match saved {
                Ok(_) => navigate(HOME_PATH, NavigateOptions::default()),
                Err(e) => info.set(e.notice().to_owned()),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (api, id, request, navigate);
    };

    view! {
        <div class="mood-entry-page">
            <h1>{move || if editing_id().is_some() { "Edit mood" } else { "How are you feeling?" }}</h1>
            <form class="mood-form" on:submit=on_submit>
                <div class="emotion-chips">
                    <For
                        each=move || emotions.get()
                        key=|e| e.key.clone()
                        children=move |emotion| {
                            let key = emotion.key.clone();
                            let key_for_class = key.clone();
                            view! {
                                <button
                                    type="button"
                                    class="chip"
                                    class:chip--active=move || selected.get().contains(&key_for_class)
                                    on:click=move |_| selected.update(|keys| toggle_key(keys, &key))
                                >
                                    {emotion.label}
                                </button>
                            }
                        }
                    />
                </div>
                <label>
                    "Energy "
                    <input
                        type="range"
                        min=MIN_ENERGY
                        max=MAX_ENERGY
                        prop:value=move || energy.get().to_string()
                        on:input=move |ev| {
                            if let Ok(value) = event_target_value(&ev).parse() {
                                energy.set(value);
                            }
                        }
                    />
                    {move || energy.get()}
                </label>
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || environment.get() == MoodEnvironment::InGroup
                        on:change=move |ev| {
                            environment
                                .set(if event_target_checked(&ev) { MoodEnvironment::InGroup } else { MoodEnvironment::Alone });
                        }
                    />
                    " With others"
                </label>
                <input
                    type="text"
                    placeholder="Where are you?"
                    prop:value=move || location.get()
                    on:input=move |ev| location.set(event_target_value(&ev))
                />
                <textarea
                    placeholder="Anything on your mind?"
                    prop:value=move || description.get()
                    on:input=move |ev| description.set(event_target_value(&ev))
                ></textarea>
                <button class="btn" type="submit" disabled=move || busy.get()>"Save"</button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="mood-form__message">{move || info.get()}</p>
            </Show>
        </div>
    }
}
