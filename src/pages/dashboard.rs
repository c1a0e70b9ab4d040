//! Dashboard: today's suggested activities and mood statistics.
//!
//! SYSTEM CONTEXT
//! ==============
//! Authenticated landing route. Loads today's activities and statistics once
//! the session has resolved, lets the user tick activities off, and links to
//! the mood-entry form and history through the route guard.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::{use_services, use_session};
use crate::net::types::{MoodStatistics, SuggestedActivity};
use crate::util::auth::install_route_guard;
use crate::util::navigation::{HISTORY_PATH, HOME_PATH, MOOD_ENTRY_PATH};

/// `"{done} of {total} done"`, or a prompt when nothing is suggested.
pub fn completion_summary(activities: &[SuggestedActivity]) -> String {
    if activities.is_empty() {
        return "No activities yet. Log a mood to get suggestions.".to_owned();
    }
    let done = activities.iter().filter(|a| a.is_completed).count();
    format!("{done} of {} done", activities.len())
}

/// Replace the activity with the same id, keeping order.
pub fn replace_activity(activities: &mut [SuggestedActivity], updated: SuggestedActivity) {
    if let Some(slot) = activities.iter_mut().find(|a| a.id == updated.id) {
        *slot = updated;
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let services = use_services();
    let session = use_session();
    let navigate = use_navigate();
    install_route_guard(session, services.with_value(|s| s.guard.clone()), HOME_PATH);

    let activities = RwSignal::new(Vec::<SuggestedActivity>::new());
    let stats = RwSignal::new(None::<MoodStatistics>);
    let requested = RwSignal::new(false);

    Effect::new(move || {
        if requested.get_untracked() || !session.get().is_authenticated() {
            return;
        }
        requested.set(true);
        let (activity_api, mood_api) = services.with_value(|s| (s.activities.clone(), s.moods.clone()));

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Ok(list) = activity_api.today().await {
                activities.set(list);
            }
            if let Ok(summary) = mood_api.statistics().await {
                stats.set(Some(summary));
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (activity_api, mood_api);
    });

    let toggle = move |activity: SuggestedActivity| {
        let api = services.with_value(|s| s.activities.clone());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let result = if activity.is_completed {
                api.uncomplete(activity.id).await
            } else {
                api.complete(activity.id).await
            };
            if let Ok(updated) = result {
                activities.update(|list| replace_activity(list, updated));
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (api, activity);
    };

    let go = move |path: &'static str| {
        let navigate = navigate.clone();
        move |_| {
            if services.with_value(|s| s.guard.can_activate(path)) {
                navigate(path, NavigateOptions::default());
            }
        }
    };

    let on_sign_out = move |_| {
        let session = services.with_value(|s| s.session.clone());
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move { session.sign_out().await });
        #[cfg(not(feature = "hydrate"))]
        session.logout();
    };

    let greeting = move || {
        session
            .get()
            .user()
            .map(|user| format!("Hi, {}", user.label()))
            .unwrap_or_default()
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <h1>{greeting}</h1>
                <button class="btn" on:click=go(MOOD_ENTRY_PATH)>"Log mood"</button>
                <button class="btn" on:click=go(HISTORY_PATH)>"History"</button>
                <button class="btn btn--ghost" on:click=on_sign_out>"Sign out"</button>
            </header>
            <Show when=move || stats.get().is_some()>
                <p class="dashboard-stats">
                    {move || {
                        stats
                            .get()
                            .map(|s| {
                                format!(
                                    "{} entries today, energy {:.1} this week, {:.1} this month",
                                    s.today_entries,
                                    s.average_energy_level_week,
                                    s.average_energy_level_month,
                                )
                            })
                            .unwrap_or_default()
                    }}
                </p>
            </Show>
            <section class="dashboard-activities">
                <h2>"Today's activities"</h2>
                <p class="dashboard-summary">{move || completion_summary(&activities.get())}</p>
                <ul>
                    <For
                        each=move || activities.get()
                        key=|a| (a.id, a.is_completed)
                        children=move |activity| {
                            let label = format!("{} ({})", activity.title, activity.category.display_name());
                            let checked = activity.is_completed;
                            view! {
                                <li class="activity">
                                    <label>
                                        <input
                                            type="checkbox"
                                            prop:checked=checked
                                            on:change=move |_| toggle(activity.clone())
                                        />
                                        {label}
                                    </label>
                                </li>
                            }
                        }
                    />
                </ul>
            </section>
        </div>
    }
}
