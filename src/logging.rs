/// Conditional logging for development builds
///
/// The `log!` macro reports informational messages (shape loads, poll cycles)
/// and is compiled out of release builds unless the `console_logging` feature
/// is enabled. Warnings and errors go through `leptos::logging::warn!` and
/// `leptos::logging::error!` directly so they are never dropped.
///
/// Output is routed through `leptos::logging`, which writes to the browser
/// console on wasm and to stdout in native test runs.
///
/// # Examples
///
/// ```rust
/// use transit_live_map::logging::log;
///
/// log!("Loaded shape for {}", "Red");
/// ```
#[macro_export]
macro_rules! log {
    ($($arg:tt)+) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            leptos::logging::log!($($arg)+);
        }
    };
}

pub use log;
