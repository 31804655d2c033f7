//! Light/dark theme: persisted choice, application to the document, change subscribers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::app;
use crate::core::document::{Document, HeaderButton};
use crate::core::storage::{Storage, StorageError};

/// Id of the header toggle button.
pub const THEME_TOGGLE_ID: &str = "theme-toggle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown theme '{0}' (expected light or dark)")]
pub struct ThemeParseError(String);

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// `theme-color` meta value for mobile browsers.
    pub fn meta_color(self) -> &'static str {
        match self {
            Theme::Light => "#3498db",
            Theme::Dark => "#1a1a2e",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ThemeParseError(other.to_string())),
        }
    }
}

/// Label of the toggle button while `theme` is shown.
pub fn toggle_label(theme: Theme) -> String {
    format!("Toggle {} mode", theme.toggled())
}

/// Called after a theme is applied, in registration order.
pub type ThemeSubscriber = Box<dyn FnMut(Theme, &mut dyn Document)>;

/// Theme switching backed by `S`.
pub struct ThemeService<S: Storage> {
    storage: S,
    key: String,
    subscribers: Vec<ThemeSubscriber>,
}

impl<S: Storage> ThemeService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: format!("{}-theme", app::NAME),
            subscribers: Vec::new(),
        }
    }

    /// Stored theme, or light. Unreadable or unknown values fall back to light.
    pub fn current(&self) -> Theme {
        match self.storage.get_item(&self.key) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
                log::warn!("Ignoring stored theme: {}", e);
                Theme::Light
            }),
            Ok(None) => Theme::Light,
            Err(e) => {
                log::warn!("Failed to read theme: {}", e);
                Theme::Light
            }
        }
    }

    /// Persist and apply `theme`.
    pub fn set_theme(&mut self, doc: &mut dyn Document, theme: Theme) -> Result<(), StorageError> {
        self.storage.set_item(&self.key, theme.as_str())?;
        self.apply(doc, theme);
        Ok(())
    }

    /// Switch to the other theme. Returns the new one.
    pub fn toggle(&mut self, doc: &mut dyn Document) -> Result<Theme, StorageError> {
        let theme = self.current().toggled();
        self.set_theme(doc, theme)?;
        Ok(theme)
    }

    /// Show `theme` on the document and notify subscribers. Does not persist.
    pub fn apply(&mut self, doc: &mut dyn Document, theme: Theme) {
        doc.set_body_class(Theme::Light.as_str(), theme == Theme::Light);
        doc.set_body_class(Theme::Dark.as_str(), theme == Theme::Dark);
        doc.set_meta("theme-color", theme.meta_color());
        log::debug!("Theme applied: {}", theme);
        for subscriber in self.subscribers.iter_mut() {
            subscriber(theme, &mut *doc);
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(Theme, &mut dyn Document) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Apply the saved theme and add the header toggle if the page has none.
    pub fn init(&mut self, doc: &mut dyn Document) {
        let theme = self.current();
        self.apply(doc, theme);
        if !doc.has_element(THEME_TOGGLE_ID) {
            doc.add_header_button(HeaderButton {
                id: THEME_TOGGLE_ID.to_string(),
                class: Some("theme-toggle".to_string()),
                icon: "🌓".to_string(),
                label: toggle_label(theme),
            });
        }
    }

    /// Toggle button handler: switch theme and relabel the button.
    pub fn on_toggle_clicked(&mut self, doc: &mut dyn Document) -> Result<Theme, StorageError> {
        let theme = self.toggle(doc)?;
        doc.set_button_label(THEME_TOGGLE_ID, &toggle_label(theme));
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::page::Page;
    use crate::core::storage::MemoryStorage;

    #[test]
    fn default_theme_is_light() {
        let service = ThemeService::new(MemoryStorage::new());
        assert_eq!(service.current(), Theme::Light);
    }

    #[test]
    fn unknown_stored_value_falls_back_to_light() {
        let storage = MemoryStorage::new();
        storage.set_item("chat-enhance-theme", "sepia").unwrap();
        assert_eq!(ThemeService::new(storage).current(), Theme::Light);
    }

    #[test]
    fn toggle_persists_and_switches_body_class() {
        let storage = MemoryStorage::new();
        let mut service = ThemeService::new(storage.clone());
        let mut page = Page::new();
        service.init(&mut page);
        assert!(page.has_body_class("light"));

        assert_eq!(service.toggle(&mut page).unwrap(), Theme::Dark);
        assert!(page.has_body_class("dark"));
        assert!(!page.has_body_class("light"));
        assert_eq!(page.meta("theme-color"), Some("#1a1a2e"));
        assert_eq!(
            storage.get_item("chat-enhance-theme").unwrap().as_deref(),
            Some("dark")
        );
        assert_eq!(ThemeService::new(storage).current(), Theme::Dark);
    }

    #[test]
    fn subscribers_run_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut service = ThemeService::new(MemoryStorage::new());
        let first = seen.clone();
        service.subscribe(move |theme, _| first.borrow_mut().push(format!("a:{theme}")));
        let second = seen.clone();
        service.subscribe(move |theme, _| second.borrow_mut().push(format!("b:{theme}")));

        let mut page = Page::new();
        service.set_theme(&mut page, Theme::Dark).unwrap();
        assert_eq!(*seen.borrow(), vec!["a:dark", "b:dark"]);
    }

    #[test]
    fn toggle_button_added_once_and_relabelled() {
        let mut service = ThemeService::new(MemoryStorage::new());
        let mut page = Page::new();
        service.init(&mut page);
        service.init(&mut page);
        assert_eq!(page.header_buttons().len(), 1);
        assert_eq!(page.header_buttons()[0].label, "Toggle dark mode");

        service.on_toggle_clicked(&mut page).unwrap();
        assert_eq!(page.header_buttons()[0].label, "Toggle light mode");
    }

    #[test]
    fn parse_theme() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }
}
