use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use super::*;
use crate::core::page::Page;
use crate::core::storage::MemoryStorage;

const KEY: &str = "chat-enhance-preferences";

#[test]
fn defaults_when_nothing_stored() {
    let service = PreferencesService::new(MemoryStorage::new());
    assert_eq!(service.preferences(), Preferences::default());
    assert_eq!(service.get(PreferenceKey::FontSize), json!("medium"));
    assert_eq!(service.get(PreferenceKey::AutoScroll), json!(true));
}

#[test]
fn corrupt_blob_falls_back_to_defaults() {
    let storage = MemoryStorage::new();
    storage.set_item(KEY, "{not json").unwrap();
    let service = PreferencesService::new(storage);
    assert_eq!(service.preferences(), Preferences::default());
}

#[test]
fn partial_blob_fills_defaults() {
    let storage = MemoryStorage::new();
    storage
        .set_item(KEY, r#"{"theme":"dark","fontSize":"x-large","autoScroll":false}"#)
        .unwrap();
    let prefs = PreferencesService::new(storage).preferences();
    assert_eq!(prefs.theme, Theme::Dark);
    assert_eq!(prefs.font_size, FontSize::XLarge);
    assert!(!prefs.auto_scroll);
    assert!(prefs.message_timestamps);
    assert!(prefs.code_highlighting);
}

#[test]
fn set_persists_camel_case_blob_and_notifies() {
    let storage = MemoryStorage::new();
    let mut service = PreferencesService::new(storage.clone());
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    service.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    let update = PreferenceUpdate::parse("codeHighlighting", "false").unwrap();
    let prefs = service.set(update).unwrap();
    assert!(!prefs.code_highlighting);

    let blob: Value = serde_json::from_str(&storage.get_item(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(blob["codeHighlighting"], json!(false));
    assert_eq!(blob["fontSize"], json!("medium"));

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    match &events[0] {
        PreferencesEvent::Changed { key, value, preferences } => {
            assert_eq!(*key, PreferenceKey::CodeHighlighting);
            assert_eq!(*value, json!(false));
            assert_eq!(preferences, &prefs);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn save_all_notifies_only_changed_keys() {
    let mut service = PreferencesService::new(MemoryStorage::new());
    let keys = Rc::new(RefCell::new(Vec::new()));
    let sink = keys.clone();
    service.subscribe(move |event| {
        if let PreferencesEvent::Changed { key, .. } = event {
            sink.borrow_mut().push(*key);
        }
    });

    let prefs = Preferences {
        font_size: FontSize::Large,
        notification_sounds: false,
        ..Preferences::default()
    };
    service.save_all(&prefs).unwrap();
    assert_eq!(
        *keys.borrow(),
        vec![PreferenceKey::FontSize, PreferenceKey::NotificationSounds]
    );
    assert_eq!(service.preferences(), prefs);
}

#[test]
fn reset_restores_defaults_and_notifies() {
    let mut service = PreferencesService::new(MemoryStorage::new());
    service
        .set(PreferenceUpdate::FontSize(FontSize::Small))
        .unwrap();
    let reset = Rc::new(RefCell::new(false));
    let sink = reset.clone();
    service.subscribe(move |event| {
        if matches!(event, PreferencesEvent::Reset { .. }) {
            *sink.borrow_mut() = true;
        }
    });
    assert_eq!(service.reset().unwrap(), Preferences::default());
    assert!(*reset.borrow());
    assert_eq!(service.preferences().font_size, FontSize::Medium);
}

#[test]
fn parse_rejects_unknown_keys_and_bad_values() {
    assert!(matches!(
        PreferenceUpdate::parse("volume", "11"),
        Err(PreferencesError::UnknownKey(k)) if k == "volume"
    ));
    let err = PreferenceUpdate::parse("fontSize", "huge").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value 'huge' for fontSize (expected small, medium, large or x-large)"
    );
    assert!(PreferenceUpdate::parse("autoScroll", "yes").is_err());
    assert_eq!(
        PreferenceUpdate::parse("theme", "dark").unwrap(),
        PreferenceUpdate::Theme(Theme::Dark)
    );
}

#[test]
fn boolean_keys_map_to_flags() {
    let flags: Vec<_> = PreferenceKey::ALL.into_iter().filter_map(PreferenceKey::flag).collect();
    assert_eq!(flags.len(), 5);
    for flag in flags {
        assert_eq!(flag.key().flag(), Some(flag));
    }
    assert_eq!(PreferenceKey::Theme.flag(), None);
    assert_eq!(PreferenceKey::FontSize.flag(), None);

    let update = PreferenceUpdate::parse("messageTimestamps", " false ").unwrap();
    assert_eq!(
        update,
        PreferenceUpdate::Flag(PreferenceFlag::MessageTimestamps, false)
    );
    assert_eq!(update.key(), PreferenceKey::MessageTimestamps);

    let mut prefs = Preferences::default();
    prefs.apply_update(update);
    assert!(!prefs.flag(PreferenceFlag::MessageTimestamps));
    assert!(prefs.flag(PreferenceFlag::AutoScroll));
}

#[test]
fn apply_sets_theme_font_factor_and_body_classes() {
    let storage = MemoryStorage::new();
    let mut service = PreferencesService::new(storage.clone());
    service.set(PreferenceUpdate::Theme(Theme::Dark)).unwrap();
    service.set(PreferenceUpdate::FontSize(FontSize::Large)).unwrap();
    service
        .set(PreferenceUpdate::Flag(PreferenceFlag::SpeechRecognition, false))
        .unwrap();

    let mut themes = ThemeService::new(storage);
    let mut page = Page::new();
    service.apply(&mut page, &mut themes).unwrap();

    assert!(page.has_body_class("dark"));
    assert_eq!(themes.current(), Theme::Dark);
    assert_eq!(page.root_property(FONT_SIZE_PROPERTY), Some("1.1"));
    assert!(page.has_body_class(TIMESTAMPS_CLASS));
    assert!(page.has_body_class(AUTO_SCROLL_CLASS));
    assert!(!page.has_body_class(SPEECH_RECOGNITION_CLASS));
}

#[test]
fn init_adds_button_once() {
    let storage = MemoryStorage::new();
    let service = PreferencesService::new(storage.clone());
    let mut themes = ThemeService::new(storage);
    let mut page = Page::new();
    service.init(&mut page, &mut themes).unwrap();
    service.init(&mut page, &mut themes).unwrap();

    let buttons: Vec<_> = page
        .header_buttons()
        .iter()
        .filter(|b| b.id == PREFERENCES_BUTTON_ID)
        .collect();
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0].label, "Preferences");
    assert!(page.style(crate::core::styles::FONT_SIZE_STYLE_ID).is_some());
    assert_eq!(page.root_property(FONT_SIZE_PROPERTY), Some("1"));
}

#[test]
fn font_size_factors() {
    let factors: Vec<_> = FontSize::ALL.iter().map(|s| s.factor()).collect();
    assert_eq!(factors, vec!["0.9", "1", "1.1", "1.2"]);
    assert_eq!(
        serde_json::to_string(&FontSize::XLarge).unwrap(),
        "\"x-large\""
    );
}
