mod components;
mod config;
mod logger;
mod model;
mod persistence;
mod render;
mod util;

use components::app::App;

fn main() {
    logger::init();
    log::info!("crop tycoon starting");
    yew::Renderer::<App>::new().render();
}
