use leptos::{component, view, IntoView};

#[component]
pub fn RecenterButton(on_recenter: impl Fn() + 'static) -> impl IntoView {
    view! {
        <button class="recenter-button" on:click=move |_| on_recenter() title="Recenter map">
            <i class="fa-solid fa-crosshairs"></i>
        </button>
    }
}
