use leptos::wasm_bindgen;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::{Camera, LayerState, LineLayer, MapSurface, MarkerSpec};

// Bindings to the global `maplibregl` namespace loaded by index.html
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = maplibregl, js_name = Map)]
    #[derive(Debug, Clone)]
    type JsMap;

    #[wasm_bindgen(catch, constructor, js_namespace = maplibregl, js_class = "Map")]
    fn new(options: &JsValue) -> Result<JsMap, JsValue>;

    #[wasm_bindgen(method, js_name = getSource)]
    fn get_source(this: &JsMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = addSource)]
    fn add_source(this: &JsMap, id: &str, source: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getLayer)]
    fn get_layer(this: &JsMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = addLayer)]
    fn add_layer(this: &JsMap, layer: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setLayoutProperty)]
    fn set_layout_property(this: &JsMap, layer: &str, name: &str, value: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setPaintProperty)]
    fn set_paint_property(this: &JsMap, layer: &str, name: &str, value: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = jumpTo)]
    fn jump_to(this: &JsMap, options: &JsValue);

    #[wasm_bindgen(method)]
    fn once(this: &JsMap, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn remove(this: &JsMap);

    #[wasm_bindgen(js_namespace = maplibregl, js_name = Marker)]
    #[derive(Debug, Clone)]
    type JsMarker;

    #[wasm_bindgen(constructor, js_namespace = maplibregl, js_class = "Marker")]
    fn new(options: &JsValue) -> JsMarker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &JsMarker, lng_lat: &JsValue);

    #[wasm_bindgen(method, js_name = setRotation)]
    fn set_rotation(this: &JsMarker, degrees: f64);

    #[wasm_bindgen(method, js_name = setPopup)]
    fn set_popup(this: &JsMarker, popup: &JsPopup);

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &JsMarker, map: &JsMap);

    #[wasm_bindgen(method)]
    fn remove(this: &JsMarker);

    #[wasm_bindgen(method, js_name = getElement)]
    fn get_element(this: &JsMarker) -> web_sys::HtmlElement;

    #[wasm_bindgen(js_namespace = maplibregl, js_name = Popup)]
    type JsPopup;

    #[wasm_bindgen(constructor, js_namespace = maplibregl, js_class = "Popup")]
    fn new(options: &JsValue) -> JsPopup;

    #[wasm_bindgen(method, js_name = setText)]
    fn set_text(this: &JsPopup, text: &str);
}

/// Convert a JSON value into a plain JS object
fn to_js(value: &Value) -> Result<JsValue, String> {
    js_sys::JSON::parse(&value.to_string()).map_err(|e| format!("Invalid map option: {e:?}"))
}

fn lng_lat(position: [f64; 2]) -> JsValue {
    js_sys::Array::of2(&position[0].into(), &position[1].into()).into()
}

/// Handle to a marker placed on a [`MapLibreMap`]
#[derive(Debug, Clone)]
pub struct MarkerHandle(JsMarker);

/// A MapLibre GL JS map instance
#[derive(Debug, Clone)]
pub struct MapLibreMap {
    inner: JsMap,
}

impl MapLibreMap {
    /// Create a map inside the element with id `container_id`
    ///
    /// # Errors
    ///
    /// Returns an error if MapLibre is not loaded or rejects the options
    pub fn new(container_id: &str, style_url: &str, camera: Camera) -> Result<Self, String> {
        let options = to_js(&json!({
            "container": container_id,
            "style": style_url,
            "center": camera.center,
            "zoom": camera.zoom,
        }))?;

        let inner = JsMap::new(&options).map_err(|e| format!("Failed to create map: {e:?}"))?;
        Ok(Self { inner })
    }

    /// Run `f` once the style has finished loading and sources can be added
    pub fn on_load(&self, f: impl FnOnce() + 'static) {
        let callback = Closure::once_into_js(f);
        self.inner.once("load", callback.unchecked_ref());
    }

    pub fn remove(&self) {
        self.inner.remove();
    }
}

impl MapSurface for MapLibreMap {
    type Marker = MarkerHandle;

    fn has_source(&self, id: &str) -> bool {
        !self.inner.get_source(id).is_undefined()
    }

    fn add_geojson_source(&self, id: &str, data: &Value) -> Result<(), String> {
        let source = to_js(&json!({ "type": "geojson", "data": data }))?;
        self.inner
            .add_source(id, &source)
            .map_err(|e| format!("Failed to add source {id}: {e:?}"))
    }

    fn has_layer(&self, id: &str) -> bool {
        !self.inner.get_layer(id).is_undefined()
    }

    fn add_line_layer(&self, layer: &LineLayer) -> Result<(), String> {
        let spec = to_js(&json!({
            "id": layer.id,
            "type": "line",
            "source": layer.source,
            "layout": {
                "line-join": "round",
                "line-cap": "round",
                "visibility": "visible",
            },
            "paint": {
                "line-color": ["get", "color"],
                "line-width": layer.width,
                "line-opacity": 1.0,
            },
        }))?;
        self.inner
            .add_layer(&spec)
            .map_err(|e| format!("Failed to add layer {}: {e:?}", layer.id))
    }

    fn set_layer_state(&self, layer_id: &str, state: LayerState) {
        let visibility = JsValue::from_str(if state.visible { "visible" } else { "none" });
        if let Err(e) = self.inner.set_layout_property(layer_id, "visibility", &visibility) {
            leptos::logging::warn!("Failed to set visibility of {layer_id}: {e:?}");
        }
        if let Err(e) = self
            .inner
            .set_paint_property(layer_id, "line-opacity", &JsValue::from_f64(state.opacity))
        {
            leptos::logging::warn!("Failed to set opacity of {layer_id}: {e:?}");
        }
    }

    fn add_marker(&self, spec: &MarkerSpec) -> Result<MarkerHandle, String> {
        let marker = JsMarker::new(&to_js(&json!({
            "color": spec.color,
            "rotationAlignment": "map",
        }))?);
        marker.set_lng_lat(&lng_lat(spec.position));
        marker.set_rotation(spec.bearing);

        let popup = JsPopup::new(&to_js(&json!({ "offset": 16, "closeButton": false }))?);
        popup.set_text(&spec.popup_text);
        marker.set_popup(&popup);

        let handle = MarkerHandle(marker);
        if !spec.visible {
            self.set_marker_visible(&handle, false);
        }
        handle.0.add_to(&self.inner);
        Ok(handle)
    }

    fn move_marker(&self, marker: &MarkerHandle, position: [f64; 2], bearing: f64) {
        marker.0.set_lng_lat(&lng_lat(position));
        marker.0.set_rotation(bearing);
    }

    fn set_marker_visible(&self, marker: &MarkerHandle, visible: bool) {
        let display = if visible { "" } else { "none" };
        if let Err(e) = marker.0.get_element().style().set_property("display", display) {
            leptos::logging::warn!("Failed to toggle marker: {e:?}");
        }
    }

    fn remove_marker(&self, marker: &MarkerHandle) {
        marker.0.remove();
    }

    fn jump_to(&self, camera: Camera) {
        match to_js(&json!({ "center": camera.center, "zoom": camera.zoom })) {
            Ok(options) => self.inner.jump_to(&options),
            Err(e) => leptos::logging::warn!("{e}"),
        }
    }
}
