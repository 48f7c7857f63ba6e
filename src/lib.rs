#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

pub mod api;
pub mod components;
pub mod config;
pub mod constants;
pub mod event_loop;
pub mod loader;
pub mod logging;
pub mod map;
pub mod models;
pub mod poller;
pub mod polyline;
pub mod session;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use components::app::App;
