use std::{cell::RefCell, rc::Rc};

use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::utils::window;

/// Global object the host page may define to override defaults.
const CONFIG_GLOBAL: &str = "__CINEMA_CONFIG__";

thread_local! {
    static CONFIG: RefCell<Rc<Config>> = RefCell::new(Rc::new(Config::default()));
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme_storage_key: String,
    /// Path fragment identifying the favorites list page.
    pub favorites_path: String,
    pub messages: Messages,
    pub notification: NotificationTiming,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme_storage_key: "cinema-theme".to_string(),
            favorites_path: "favorites".to_string(),
            messages: Messages::default(),
            notification: NotificationTiming::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub added: String,
    pub removed: String,
    pub failed: String,
    pub empty_favorites: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            added: "Добавлено в избранное".to_string(),
            removed: "Убрано из избранного".to_string(),
            failed: "Ошибка при обновлении избранного".to_string(),
            empty_favorites: "У вас пока нет избранных фильмов.".to_string(),
        }
    }
}

/// Durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationTiming {
    pub enter_delay: u32,
    pub display: u32,
    pub exit: u32,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            enter_delay: 10,
            display: 3000,
            exit: 300,
        }
    }
}

impl NotificationTiming {
    /// Time from creation until the element is gone.
    pub fn lifetime(&self) -> u32 {
        self.display.saturating_add(self.exit)
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

pub fn get() -> Rc<Config> {
    CONFIG.with(|c| c.borrow().clone())
}

pub fn set(config: Config) {
    CONFIG.with(|c| *c.borrow_mut() = Rc::new(config));
}

pub fn initialize() {
    let value = match js_sys::Reflect::get(&window(), &JsValue::from_str(CONFIG_GLOBAL)) {
        Ok(val) if !val.is_undefined() && !val.is_null() => val,
        _ => return,
    };

    let json = match js_sys::JSON::stringify(&value) {
        Ok(json) => String::from(json),
        Err(e) => {
            warn!("error stringify {}: {:?}", CONFIG_GLOBAL, e);
            return;
        }
    };

    match Config::from_json(&json) {
        Ok(config) => {
            debug!("loaded config from {}", CONFIG_GLOBAL);
            set(config);
        }
        Err(e) => warn!("invalid {}, using defaults: {}", CONFIG_GLOBAL, e),
    }
}
