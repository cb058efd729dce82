pub mod app;
pub mod controls_panel;
pub mod farm_view;
pub mod stats_panel;
