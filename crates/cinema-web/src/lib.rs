#[macro_use]
extern crate log;

mod common;
mod config;
mod favorites;
mod query;
mod utils;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    config::initialize();

    favorites::bind_when_ready();

    let theme = common::browser_theme_manager().load();
    info!("applied {} theme", theme);

    Ok(())
}

/// Switches between light and dark, called from the page's markup.
#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() {
    common::browser_theme_manager().toggle();
}
