#![allow(clippy::needless_pass_by_value)]

pub mod app;
pub mod line_toggles;
pub mod map_view;
pub mod recenter_button;
pub mod status_bar;
