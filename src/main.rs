//! Task Chain UI Entry Point

mod app;
mod dom;
mod editor;
mod http;
mod logging;
mod notify;

use app::App;
use chain_reorder::EditorConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let page_config = dom::read_config();
    let config = match &page_config {
        Some(Ok(config)) => config.clone(),
        _ => EditorConfig::default(),
    };
    logging::init(config.level_filter());
    if let Some(Err(err)) = page_config {
        log::warn!("page configuration ignored: {}", err);
    }

    mount_to_body(move || view! { <App config=config /> });
}
