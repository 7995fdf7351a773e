use crate::config;
use crate::utils::{document, js_error, local_storage, root};

const THEME_ATTRIBUTE: &str = "data-theme";
const TOGGLE_SELECTOR: &str = ".theme-toggle";

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label of the toggle button, which names the theme a click switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "☀ Светлая",
            Theme::Light => "🌙 Тёмная",
        }
    }
}

/// Durable storage of the preferred theme.
pub trait ThemeStore {
    fn get(&self) -> Option<Theme>;
    fn set(&self, theme: Theme);
}

/// Whatever displays the theme, normally the document.
pub trait ThemeTarget {
    fn applied(&self) -> Theme;
    fn apply(&self, theme: Theme);
}

pub struct ThemeManager<S, T> {
    store: S,
    target: T,
}

impl<S: ThemeStore, T: ThemeTarget> ThemeManager<S, T> {
    pub fn new(store: S, target: T) -> Self {
        Self { store, target }
    }

    /// Applies the stored preference, light when nothing is stored.
    pub fn load(&self) -> Theme {
        let theme = self.store.get().unwrap_or_default();
        self.target.apply(theme);
        theme
    }

    pub fn toggle(&self) -> Theme {
        let next = self.target.applied().opposite();
        self.store.set(next);
        self.target.apply(next);
        debug!("theme switched to {}", next);
        next
    }
}

pub struct LocalStorageThemeStore {
    key: String,
}

impl LocalStorageThemeStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for LocalStorageThemeStore {
    fn default() -> Self {
        Self::new(config::get().theme_storage_key.clone())
    }
}

impl ThemeStore for LocalStorageThemeStore {
    fn get(&self) -> Option<Theme> {
        let Some(storage) = local_storage() else {
            warn!("local storage unavailable, using default theme");
            return None;
        };

        match storage.get_item(&self.key) {
            Ok(value) => value.as_deref().and_then(Theme::parse),
            Err(e) => {
                warn!("{}", js_error("error read theme", e));
                None
            }
        }
    }

    fn set(&self, theme: Theme) {
        let Some(storage) = local_storage() else {
            warn!("local storage unavailable, {} theme not saved", theme);
            return;
        };

        if let Err(e) = storage.set_item(&self.key, &theme.to_string()) {
            warn!("{}", js_error("error save theme", e));
        }
    }
}

/// Marks the `<html>` element and relabels the `.theme-toggle` button.
#[derive(Default)]
pub struct DocumentTheme;

impl DocumentTheme {
    fn apply_marker(theme: Theme) -> Result<(), anyhow::Error> {
        match theme {
            Theme::Dark => root()
                .set_attribute(THEME_ATTRIBUTE, "dark")
                .map_err(|e| js_error("error set theme attribute", e))?,
            Theme::Light => root()
                .remove_attribute(THEME_ATTRIBUTE)
                .map_err(|e| js_error("error remove theme attribute", e))?,
        }

        if let Some(toggle) = document()
            .query_selector(TOGGLE_SELECTOR)
            .map_err(|e| js_error("error query theme toggle", e))?
        {
            toggle.set_text_content(Some(theme.toggle_label()));
        }

        Ok(())
    }
}

impl ThemeTarget for DocumentTheme {
    fn applied(&self) -> Theme {
        match root().get_attribute(THEME_ATTRIBUTE).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    fn apply(&self, theme: Theme) {
        if let Err(e) = Self::apply_marker(theme) {
            error!("{}", e);
        }
    }
}

pub type BrowserThemeManager = ThemeManager<LocalStorageThemeStore, DocumentTheme>;

pub fn browser_theme_manager() -> BrowserThemeManager {
    ThemeManager::new(LocalStorageThemeStore::default(), DocumentTheme)
}
