use std::rc::Rc;

use leptos::*;

use crate::api::HttpTransitApi;
use crate::config::ViewerConfig;
use crate::constants::MAP_CONTAINER_ID;
use crate::event_loop::BrowserEventLoop;
use crate::loader::RouteShapeLoader;
use crate::logging::log;
use crate::map::{MapLibreMap, MapSurface};
use crate::models::VisibilityState;
use crate::poller::{PollSummary, VehiclePoller};
use crate::session::LiveSession;
use crate::visibility::{VisibilityController, VisibilitySource};

/// Everything tied to one mounted map
struct Session {
    map: MapLibreMap,
    live: Rc<LiveSession<HttpTransitApi, MapLibreMap, BrowserEventLoop>>,
}

impl Session {
    fn teardown(&self) {
        if self.live.teardown() {
            self.map.remove();
        }
    }
}

fn start_session(
    config: &ViewerConfig,
    visibility: ReadSignal<VisibilityState>,
    on_summary: Rc<dyn Fn(PollSummary)>,
) -> Result<Session, String> {
    let map = MapLibreMap::new(MAP_CONTAINER_ID, &config.style_url, config.camera())?;
    let api = Rc::new(HttpTransitApi::new(&config.api_base));
    let read_visibility: VisibilitySource =
        Rc::new(move || visibility.try_get_untracked().unwrap_or_default());

    let poller = VehiclePoller::new(
        Rc::clone(&api),
        map.clone(),
        BrowserEventLoop,
        &config.lines,
        config.poll_interval(),
        Rc::clone(&read_visibility),
    )
    .with_on_update(move |summary| on_summary(summary.clone()));

    let controller = VisibilityController::new(
        map.clone(),
        config.line_ids(),
        poller.registry(),
        config.dim_hidden_lines,
    );
    let live = LiveSession::new(BrowserEventLoop, poller, controller);

    let loader = RouteShapeLoader::new(
        api,
        map.clone(),
        BrowserEventLoop,
        config.retry_policy(),
        read_visibility,
        config.dim_hidden_lines,
    );
    let lines = config.line_ids();
    let ready = Rc::clone(&live);
    map.on_load(move || ready.launch(loader, lines));

    Ok(Session { map, live })
}

#[component]
pub fn MapView(
    config: ViewerConfig,
    visibility: ReadSignal<VisibilityState>,
    recenter: ReadSignal<u32>,
    on_summary: impl Fn(PollSummary) + 'static,
) -> impl IntoView {
    let session = store_value(None::<Session>);
    let container = create_node_ref::<html::Div>();
    let camera = config.camera();
    let on_summary: Rc<dyn Fn(PollSummary)> = Rc::new(on_summary);

    container.on_load(move |_| {
        // Wait a frame so the container is attached and has a size
        request_animation_frame(move || match start_session(&config, visibility, on_summary) {
            Ok(started) => {
                log!("Map session started");
                session.set_value(Some(started));
            }
            Err(e) => leptos::logging::error!("Failed to start map: {e}"),
        });
    });

    create_effect(move |_| {
        let state = visibility.get();
        session.with_value(|current| {
            if let Some(current) = current {
                current.live.apply_visibility(&state);
            }
        });
    });

    create_effect(move |previous: Option<u32>| {
        let presses = recenter.get();
        if previous.is_some() {
            session.with_value(|current| {
                if let Some(current) = current {
                    current.map.jump_to(camera);
                }
            });
        }
        presses
    });

    on_cleanup(move || {
        session.try_with_value(|current| {
            if let Some(current) = current {
                current.teardown();
            }
        });
    });

    view! {
        <div id=MAP_CONTAINER_ID class="map-container" node_ref=container></div>
    }
}
