use chrono::{DateTime, Local, TimeZone};
use leptos::{component, view, IntoView, ReadSignal, SignalWith};

use crate::poller::PollSummary;

/// Status line text; `updated_at` is rendered in the viewer's timezone
#[must_use]
pub fn status_text<Tz: TimeZone>(total: usize, updated_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let noun = if total == 1 { "vehicle" } else { "vehicles" };
    format!("{total} {noun} in service · updated {}", updated_at.format("%H:%M:%S"))
}

#[component]
pub fn StatusBar(summary: ReadSignal<Option<PollSummary>>) -> impl IntoView {
    let text = move || {
        summary.with(|latest| match latest {
            Some(latest) => status_text(latest.total, &latest.updated_at.with_timezone(&Local)),
            None => "Waiting for live vehicles…".to_string(),
        })
    };

    view! {
        <footer class="status-bar">{text}</footer>
    }
}
