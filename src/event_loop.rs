use std::future::Future;
use std::time::Duration;

/// Scheduling primitives of the single-threaded host event loop
pub trait EventLoop: Clone + 'static {
    /// Dropping the handle cancels the interval
    type Interval;

    fn spawn(&self, future: impl Future<Output = ()> + 'static);

    fn interval(&self, period: Duration, tick: Box<dyn FnMut()>) -> Self::Interval;

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// Browser event loop: futures on the microtask queue, timers via `setInterval`/`setTimeout`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserEventLoop;

impl EventLoop for BrowserEventLoop {
    type Interval = gloo_timers::callback::Interval;

    fn spawn(&self, future: impl Future<Output = ()> + 'static) {
        wasm_bindgen_futures::spawn_local(future);
    }

    fn interval(&self, period: Duration, mut tick: Box<dyn FnMut()>) -> Self::Interval {
        gloo_timers::callback::Interval::new(millis(period), move || tick())
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        gloo_timers::future::sleep(duration)
    }
}
