use leptos::*;
use leptos_meta::*;

use crate::components::line_toggles::LineToggles;
use crate::components::map_view::MapView;
use crate::components::recenter_button::RecenterButton;
use crate::components::status_bar::StatusBar;
use crate::config::ViewerConfig;
use crate::models::VisibilityState;
use crate::poller::PollSummary;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ViewerConfig::default();
    let (visibility, set_visibility) = create_signal(VisibilityState::new());
    let (summary, set_summary) = create_signal(None::<PollSummary>);
    let (recenter, set_recenter) = create_signal(0u32);

    view! {
        <Stylesheet id="leptos" href="/pkg/transit_live_map.css"/>
        <Title text="Live Transit Map"/>

        <div class="app">
            <header class="app-header">
                <h1>"Live Transit Map"</h1>
                <RecenterButton on_recenter=move || set_recenter.update(|n| *n += 1) />
            </header>
            <div class="app-body">
                <LineToggles
                    lines=config.lines.clone()
                    visibility=visibility
                    set_visibility=set_visibility
                    summary=summary
                />
                <MapView
                    config=config
                    visibility=visibility
                    recenter=recenter
                    on_summary=move |latest| set_summary.set(Some(latest))
                />
            </div>
            <StatusBar summary=summary />
        </div>
    }
}
