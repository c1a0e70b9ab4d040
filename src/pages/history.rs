//! Mood history grouped by day, newest first.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use chrono::NaiveDate;
use leptos::prelude::*;

use crate::app::{use_services, use_session};
use crate::net::types::{MoodEntry, MoodEnvironment};
use crate::util::auth::install_route_guard;
use crate::util::navigation::HISTORY_PATH;

pub const LOAD_ATTEMPTS: u32 = 3;

/// Group entries by calendar day (UTC), newest day first and newest entry
/// first within a day.
pub fn group_by_day(mut entries: Vec<MoodEntry>) -> Vec<(NaiveDate, Vec<MoodEntry>)> {
    entries.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
    let mut groups: Vec<(NaiveDate, Vec<MoodEntry>)> = Vec::new();
    for entry in entries {
        let day = entry.entry_date.date_naive();
        match groups.last_mut() {
            Some((current, list)) if *current == day => list.push(entry),
            _ => groups.push((day, vec![entry])),
        }
    }
    groups
}

pub fn describe_entry(entry: &MoodEntry) -> String {
    let company = match entry.environment {
        MoodEnvironment::Alone => "alone",
        MoodEnvironment::InGroup => "with others",
    };
    format!("{} · energy {}/5 · {company}", entry.emotion_keys.join(", "), entry.energy_level)
}

#[component]
pub fn HistoryPage() -> impl IntoView {
    let services = use_services();
    let session = use_session();
    install_route_guard(session, services.with_value(|s| s.guard.clone()), HISTORY_PATH);

    let groups = RwSignal::new(Vec::<(NaiveDate, Vec<MoodEntry>)>::new());
    let status = RwSignal::new("Loading...".to_owned());
    let requested = RwSignal::new(false);

    Effect::new(move || {
        if requested.get_untracked() || !session.get().is_authenticated() {
            return;
        }
        requested.set(true);
        let (moods, timer) = services.with_value(|s| (s.moods.clone(), s.gateway.timer()));

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let loaded = crate::net::retry::with_backoff(
                timer.as_ref(),
                LOAD_ATTEMPTS,
                crate::net::retry::random_jitter,
                || moods.all(),
            )
            .await;
            match loaded {
                Ok(entries) if entries.is_empty() => status.set("No entries yet.".to_owned()),
                Ok(entries) => {
                    status.set(String::new());
                    groups.set(group_by_day(entries));
                }
                Err(e) => status.set(e.notice().to_owned()),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (moods, timer);
    });

    view! {
        <div class="history-page">
            <h1>"History"</h1>
            <Show when=move || !status.get().is_empty()>
                <p class="history-status">{move || status.get()}</p>
            </Show>
            <For
                each=move || groups.get()
                key=|(day, entries)| (*day, entries.len())
                children=move |(day, entries)| {
                    view! {
                        <section class="history-day">
                            <h2>{day.format("%A, %B %-d, %Y").to_string()}</h2>
                            <ul>
                                {entries
                                    .iter()
                                    .map(|entry| {
                                        let href = format!("/mood-entry/{}", entry.id);
                                        view! {
                                            <li>
                                                <a href=href>{describe_entry(entry)}</a>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        </section>
                    }
                }
            />
        </div>
    }
}
