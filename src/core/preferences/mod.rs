//! User preferences: persisted blob, validation of single updates, application to the page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::app;
use crate::core::document::{Document, HeaderButton};
use crate::core::storage::{Storage, StorageError};
use crate::core::styles;
use crate::core::theme::{Theme, ThemeService};

/// Id of the header preferences button.
pub const PREFERENCES_BUTTON_ID: &str = "preferences-button";

pub const TIMESTAMPS_CLASS: &str = "timestamps-enabled";
pub const CODE_HIGHLIGHTING_CLASS: &str = "code-highlighting-enabled";
pub const SPEECH_RECOGNITION_CLASS: &str = "speech-recognition-enabled";
pub const NOTIFICATION_SOUNDS_CLASS: &str = "notification-sounds-enabled";
pub const AUTO_SCROLL_CLASS: &str = "auto-scroll-enabled";

/// Root custom property scaled by [`FontSize::factor`].
pub const FONT_SIZE_PROPERTY: &str = "--font-size-factor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    XLarge,
}

impl FontSize {
    pub const ALL: [FontSize; 4] = [
        FontSize::Small,
        FontSize::Medium,
        FontSize::Large,
        FontSize::XLarge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
            FontSize::XLarge => "x-large",
        }
    }

    /// Value of [`FONT_SIZE_PROPERTY`].
    pub fn factor(self) -> &'static str {
        match self {
            FontSize::Small => "0.9",
            FontSize::Medium => "1",
            FontSize::Large => "1.1",
            FontSize::XLarge => "1.2",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontSize::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or(())
    }
}

/// All preferences. Fields missing from a stored blob take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    pub font_size: FontSize,
    pub message_timestamps: bool,
    pub code_highlighting: bool,
    pub speech_recognition: bool,
    pub notification_sounds: bool,
    pub auto_scroll: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            font_size: FontSize::Medium,
            message_timestamps: true,
            code_highlighting: true,
            speech_recognition: true,
            notification_sounds: true,
            auto_scroll: true,
        }
    }
}

impl Preferences {
    /// Value of `key` as it appears in the stored JSON.
    pub fn get(&self, key: PreferenceKey) -> Value {
        match key {
            PreferenceKey::Theme => Value::from(self.theme.as_str()),
            PreferenceKey::FontSize => Value::from(self.font_size.as_str()),
            PreferenceKey::MessageTimestamps => Value::from(self.message_timestamps),
            PreferenceKey::CodeHighlighting => Value::from(self.code_highlighting),
            PreferenceKey::SpeechRecognition => Value::from(self.speech_recognition),
            PreferenceKey::NotificationSounds => Value::from(self.notification_sounds),
            PreferenceKey::AutoScroll => Value::from(self.auto_scroll),
        }
    }

    pub fn apply_update(&mut self, update: PreferenceUpdate) {
        match update {
            PreferenceUpdate::Theme(theme) => self.theme = theme,
            PreferenceUpdate::FontSize(size) => self.font_size = size,
            PreferenceUpdate::Flag(flag, enabled) => *self.flag_mut(flag) = enabled,
        }
    }

    pub fn flag(&self, flag: PreferenceFlag) -> bool {
        match flag {
            PreferenceFlag::MessageTimestamps => self.message_timestamps,
            PreferenceFlag::CodeHighlighting => self.code_highlighting,
            PreferenceFlag::SpeechRecognition => self.speech_recognition,
            PreferenceFlag::NotificationSounds => self.notification_sounds,
            PreferenceFlag::AutoScroll => self.auto_scroll,
        }
    }

    fn flag_mut(&mut self, flag: PreferenceFlag) -> &mut bool {
        match flag {
            PreferenceFlag::MessageTimestamps => &mut self.message_timestamps,
            PreferenceFlag::CodeHighlighting => &mut self.code_highlighting,
            PreferenceFlag::SpeechRecognition => &mut self.speech_recognition,
            PreferenceFlag::NotificationSounds => &mut self.notification_sounds,
            PreferenceFlag::AutoScroll => &mut self.auto_scroll,
        }
    }

    /// Body classes toggled by the boolean preferences, with their state.
    pub fn body_classes(&self) -> [(&'static str, bool); 5] {
        [
            (TIMESTAMPS_CLASS, self.message_timestamps),
            (CODE_HIGHLIGHTING_CLASS, self.code_highlighting),
            (SPEECH_RECOGNITION_CLASS, self.speech_recognition),
            (NOTIFICATION_SOUNDS_CLASS, self.notification_sounds),
            (AUTO_SCROLL_CLASS, self.auto_scroll),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Theme,
    FontSize,
    MessageTimestamps,
    CodeHighlighting,
    SpeechRecognition,
    NotificationSounds,
    AutoScroll,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 7] = [
        PreferenceKey::Theme,
        PreferenceKey::FontSize,
        PreferenceKey::MessageTimestamps,
        PreferenceKey::CodeHighlighting,
        PreferenceKey::SpeechRecognition,
        PreferenceKey::NotificationSounds,
        PreferenceKey::AutoScroll,
    ];

    /// Name of the key in the stored JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::Theme => "theme",
            PreferenceKey::FontSize => "fontSize",
            PreferenceKey::MessageTimestamps => "messageTimestamps",
            PreferenceKey::CodeHighlighting => "codeHighlighting",
            PreferenceKey::SpeechRecognition => "speechRecognition",
            PreferenceKey::NotificationSounds => "notificationSounds",
            PreferenceKey::AutoScroll => "autoScroll",
        }
    }

    /// The boolean preference behind this key, if it is one.
    pub fn flag(self) -> Option<PreferenceFlag> {
        match self {
            PreferenceKey::Theme | PreferenceKey::FontSize => None,
            PreferenceKey::MessageTimestamps => Some(PreferenceFlag::MessageTimestamps),
            PreferenceKey::CodeHighlighting => Some(PreferenceFlag::CodeHighlighting),
            PreferenceKey::SpeechRecognition => Some(PreferenceFlag::SpeechRecognition),
            PreferenceKey::NotificationSounds => Some(PreferenceFlag::NotificationSounds),
            PreferenceKey::AutoScroll => Some(PreferenceFlag::AutoScroll),
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = PreferencesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreferenceKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| PreferencesError::UnknownKey(s.to_string()))
    }
}

/// A boolean preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceFlag {
    MessageTimestamps,
    CodeHighlighting,
    SpeechRecognition,
    NotificationSounds,
    AutoScroll,
}

impl PreferenceFlag {
    pub fn key(self) -> PreferenceKey {
        match self {
            PreferenceFlag::MessageTimestamps => PreferenceKey::MessageTimestamps,
            PreferenceFlag::CodeHighlighting => PreferenceKey::CodeHighlighting,
            PreferenceFlag::SpeechRecognition => PreferenceKey::SpeechRecognition,
            PreferenceFlag::NotificationSounds => PreferenceKey::NotificationSounds,
            PreferenceFlag::AutoScroll => PreferenceKey::AutoScroll,
        }
    }
}

/// One validated preference change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceUpdate {
    Theme(Theme),
    FontSize(FontSize),
    Flag(PreferenceFlag, bool),
}

impl PreferenceUpdate {
    /// Validate `value` for the preference named `key`.
    pub fn parse(key: &str, value: &str) -> Result<Self, PreferencesError> {
        let key: PreferenceKey = key.parse()?;
        let invalid = |expected: &'static str| PreferencesError::InvalidValue {
            key,
            value: value.to_string(),
            expected,
        };
        let value = value.trim();
        if let Some(flag) = key.flag() {
            return value
                .parse::<bool>()
                .map(|enabled| PreferenceUpdate::Flag(flag, enabled))
                .map_err(|_| invalid("true or false"));
        }
        match key {
            PreferenceKey::Theme => value
                .parse()
                .map(PreferenceUpdate::Theme)
                .map_err(|_| invalid("light or dark")),
            _ => value
                .parse()
                .map(PreferenceUpdate::FontSize)
                .map_err(|_| invalid("small, medium, large or x-large")),
        }
    }

    pub fn key(&self) -> PreferenceKey {
        match self {
            PreferenceUpdate::Theme(_) => PreferenceKey::Theme,
            PreferenceUpdate::FontSize(_) => PreferenceKey::FontSize,
            PreferenceUpdate::Flag(flag, _) => flag.key(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to encode preferences: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown preference '{0}'")]
    UnknownKey(String),
    #[error("Invalid value '{value}' for {key} (expected {expected})")]
    InvalidValue {
        key: PreferenceKey,
        value: String,
        expected: &'static str,
    },
}

/// Notification sent to subscribers after preferences are persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferencesEvent {
    Changed {
        key: PreferenceKey,
        value: Value,
        preferences: Preferences,
    },
    Reset {
        preferences: Preferences,
    },
}

pub type PreferencesSubscriber = Box<dyn FnMut(&PreferencesEvent)>;

/// Preferences persisted as one JSON blob in `S`.
pub struct PreferencesService<S: Storage> {
    storage: S,
    key: String,
    subscribers: Vec<PreferencesSubscriber>,
}

impl<S: Storage> PreferencesService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: format!("{}-preferences", app::NAME),
            subscribers: Vec::new(),
        }
    }

    /// Stored preferences, or defaults. A corrupt or unreadable blob is logged
    /// and replaced by defaults; it never surfaces as an error.
    pub fn preferences(&self) -> Preferences {
        let blob = match self.storage.get_item(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Preferences::default(),
            Err(e) => {
                log::error!("Error reading preferences: {}", e);
                return Preferences::default();
            }
        };
        serde_json::from_str(&blob).unwrap_or_else(|e| {
            log::error!("Error parsing preferences: {}", e);
            Preferences::default()
        })
    }

    pub fn get(&self, key: PreferenceKey) -> Value {
        self.preferences().get(key)
    }

    /// Persist one change and notify subscribers. Returns the new preferences.
    pub fn set(&mut self, update: PreferenceUpdate) -> Result<Preferences, PreferencesError> {
        let mut prefs = self.preferences();
        prefs.apply_update(update);
        self.store(&prefs)?;
        let key = update.key();
        log::info!("Preference {} set to {}", key, prefs.get(key));
        self.notify(&PreferencesEvent::Changed {
            key,
            value: prefs.get(key),
            preferences: prefs.clone(),
        });
        Ok(prefs)
    }

    /// Persist a full set of preferences and notify one change per key that differs.
    pub fn save_all(&mut self, prefs: &Preferences) -> Result<(), PreferencesError> {
        let previous = self.preferences();
        self.store(prefs)?;
        for key in PreferenceKey::ALL {
            let value = prefs.get(key);
            if previous.get(key) != value {
                self.notify(&PreferencesEvent::Changed {
                    key,
                    value,
                    preferences: prefs.clone(),
                });
            }
        }
        Ok(())
    }

    /// Persist the defaults and notify subscribers.
    pub fn reset(&mut self) -> Result<Preferences, PreferencesError> {
        let prefs = Preferences::default();
        self.store(&prefs)?;
        log::info!("Preferences reset to defaults");
        self.notify(&PreferencesEvent::Reset {
            preferences: prefs.clone(),
        });
        Ok(prefs)
    }

    /// Show the stored preferences on the page. The theme goes through `themes`
    /// so it is persisted and theme subscribers run.
    pub fn apply<T: Storage>(
        &self,
        doc: &mut dyn Document,
        themes: &mut ThemeService<T>,
    ) -> Result<Preferences, PreferencesError> {
        let prefs = self.preferences();
        themes.set_theme(doc, prefs.theme)?;
        doc.set_root_property(FONT_SIZE_PROPERTY, prefs.font_size.factor());
        for (class, enabled) in prefs.body_classes() {
            doc.set_body_class(class, enabled);
        }
        Ok(prefs)
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&PreferencesEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Apply the preferences, add the header button if absent and install the font-size styles.
    pub fn init<T: Storage>(
        &self,
        doc: &mut dyn Document,
        themes: &mut ThemeService<T>,
    ) -> Result<Preferences, PreferencesError> {
        let prefs = self.apply(doc, themes)?;
        if !doc.has_element(PREFERENCES_BUTTON_ID) {
            doc.add_header_button(HeaderButton {
                id: PREFERENCES_BUTTON_ID.to_string(),
                class: Some("preferences-button".to_string()),
                icon: "⚙️".to_string(),
                label: "Preferences".to_string(),
            });
            doc.upsert_style(
                styles::PREFERENCES_BUTTON_STYLE_ID,
                styles::PREFERENCES_BUTTON_CSS,
            );
        }
        doc.upsert_style(styles::FONT_SIZE_STYLE_ID, styles::FONT_SIZE_CSS);
        Ok(prefs)
    }

    fn store(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        let json = serde_json::to_string(prefs)?;
        self.storage.set_item(&self.key, &json)?;
        Ok(())
    }

    fn notify(&mut self, event: &PreferencesEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(event);
        }
    }
}

#[cfg(test)]
mod tests;
