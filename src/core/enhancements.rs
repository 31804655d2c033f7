//! All enhancement services, wired together and initialised in load order:
//! theme, code highlight styles, messages, export, preferences.

use chrono::NaiveDateTime;

use crate::core::codeblock;
use crate::core::document::Document;
use crate::core::export::ExportService;
use crate::core::messages::MessageEnhancer;
use crate::core::preferences::{
    PreferenceUpdate, Preferences, PreferencesError, PreferencesService,
};
use crate::core::storage::Storage;
use crate::core::theme::{Theme, ThemeService};

pub struct Enhancements<S: Storage + Clone> {
    pub theme: ThemeService<S>,
    pub messages: MessageEnhancer,
    pub export: ExportService,
    pub preferences: PreferencesService<S>,
}

impl<S: Storage + Clone> Enhancements<S> {
    pub fn new(storage: S, export: ExportService) -> Self {
        let mut theme = ThemeService::new(storage.clone());
        theme.subscribe(|theme, doc| codeblock::apply_theme_colors(doc, theme));
        let preferences = PreferencesService::new(storage);
        Self {
            messages: MessageEnhancer::new(&preferences.preferences()),
            theme,
            export,
            preferences,
        }
    }

    /// Initialise every service on `doc`. Returns the applied preferences.
    pub fn init(
        &mut self,
        doc: &mut dyn Document,
        now: NaiveDateTime,
    ) -> Result<Preferences, PreferencesError> {
        self.theme.init(doc);
        let theme = codeblock::document_theme(doc);
        codeblock::install_styles(doc, theme);
        self.messages.configure(&self.preferences.preferences());
        self.messages.init(doc, now);
        self.export.init(doc);
        let prefs = self.preferences.init(doc, &mut self.theme)?;
        log::debug!("Enhancements initialised ({} theme)", prefs.theme);
        Ok(prefs)
    }

    /// Persist one preference and re-apply all of them.
    pub fn set_preference(
        &mut self,
        doc: &mut dyn Document,
        update: PreferenceUpdate,
    ) -> Result<Preferences, PreferencesError> {
        self.preferences.set(update)?;
        self.reapply(doc)
    }

    pub fn reset_preferences(
        &mut self,
        doc: &mut dyn Document,
    ) -> Result<Preferences, PreferencesError> {
        self.preferences.reset()?;
        self.reapply(doc)
    }

    /// Theme toggle button. The theme preference follows, so the next
    /// [`Enhancements::init`] keeps the toggled theme.
    pub fn toggle_theme(&mut self, doc: &mut dyn Document) -> Result<Theme, PreferencesError> {
        let theme = self.theme.on_toggle_clicked(doc)?;
        self.preferences.set(PreferenceUpdate::Theme(theme))?;
        Ok(theme)
    }

    fn reapply(&mut self, doc: &mut dyn Document) -> Result<Preferences, PreferencesError> {
        let prefs = self.preferences.apply(doc, &mut self.theme)?;
        self.messages.configure(&prefs);
        Ok(prefs)
    }
}
