use leptos::*;

use crate::models::{LineKind, TransitLine, VisibilityState};
use crate::poller::PollSummary;

const SECTIONS: [LineKind; 3] = [LineKind::Subway, LineKind::LightRail, LineKind::CommuterRail];

#[component]
pub fn LineToggles(
    lines: Vec<TransitLine>,
    visibility: ReadSignal<VisibilityState>,
    set_visibility: WriteSignal<VisibilityState>,
    summary: ReadSignal<Option<PollSummary>>,
) -> impl IntoView {
    let hidden_count = Signal::derive(move || visibility.with(VisibilityState::hidden_count));

    let sections = SECTIONS
        .into_iter()
        .filter_map(|kind| {
            let members: Vec<_> = lines.iter().filter(|line| line.kind == kind).cloned().collect();
            if members.is_empty() {
                return None;
            }
            Some(view! {
                <div class="line-group">
                    <h4>{kind.label()}</h4>
                    {members.into_iter().map(|line| {
                        view! {
                            <LineToggle
                                line=line
                                visibility=visibility
                                set_visibility=set_visibility
                                summary=summary
                            />
                        }
                    }).collect::<Vec<_>>()}
                </div>
            })
        })
        .collect::<Vec<_>>();

    view! {
        <div class="controls">
            <div class="controls-header">
                <h3>"Lines"</h3>
                <button
                    class="show-all"
                    disabled=move || hidden_count.get() == 0
                    on:click=move |_| set_visibility.set(VisibilityState::new())
                >
                    "Show all"
                </button>
            </div>
            <div class="line-controls">
                {sections}
            </div>
        </div>
    }
}

#[component]
pub fn LineToggle(
    line: TransitLine,
    visibility: ReadSignal<VisibilityState>,
    set_visibility: WriteSignal<VisibilityState>,
    summary: ReadSignal<Option<PollSummary>>,
) -> impl IntoView {
    let is_visible = Signal::derive({
        let id = line.id.clone();
        move || visibility.with(|state| state.is_visible(&id))
    });

    let vehicle_count = Signal::derive({
        let id = line.id.clone();
        move || {
            summary.with(|latest| {
                latest
                    .as_ref()
                    .and_then(|latest| latest.counts.get(&id).copied())
                    .unwrap_or(0)
            })
        }
    });

    let id = line.id.clone();

    view! {
        <div
            class="line-control"
            class:dimmed=move || !is_visible.get()
            style=format!("border-left: 4px solid {}", line.color)
        >
            <div class="line-header">
                <strong>{line.name.clone()}</strong>
                <div class="line-header-controls">
                    <span class="vehicle-count" title="Vehicles in service">
                        {move || vehicle_count.get()}
                    </span>
                    <button
                        class="visibility-toggle"
                        on:click=move |_| set_visibility.update(|state| state.toggle(&id))
                        title=move || if is_visible.get() { "Hide line" } else { "Show line" }
                    >
                        <i class=move || if is_visible.get() { "fa-solid fa-eye" } else { "fa-solid fa-eye-slash" }></i>
                    </button>
                </div>
            </div>
        </div>
    }
}
