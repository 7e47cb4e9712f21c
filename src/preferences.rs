//! Theme and language preferences.
//!
//! Resolution at startup:
//! - language: location `lang` parameter, then the persisted `lang`, then English
//! - theme: persisted `theme`, then the terminal's background hint, then light
//!
//! Every change is written back to the store immediately; a language change
//! also rewrites the location's `lang` parameter.

use crate::i18n::Language;
use crate::location::{Location, LANG_PARAM};
use crate::storage::KeyValueStore;
use crate::theme::ThemeMode;
use anyhow::Result;

pub const THEME_KEY: &str = "theme";
pub const LANG_KEY: &str = "lang";

/// The two persisted user choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub theme: ThemeMode,
    pub language: Language,
}

/// Single writer for preferences and the location that mirrors them
pub struct PreferenceStore {
    store: Box<dyn KeyValueStore>,
    prefs: Preferences,
    location: Location,
}

impl PreferenceStore {
    /// Resolve preferences from the launch location, persisted values and the
    /// OS theme hint. Unknown values fall through to the next source.
    pub fn resolve(
        store: Box<dyn KeyValueStore>,
        location: Location,
        os_theme: Option<ThemeMode>,
    ) -> Self {
        let language = location
            .get(LANG_PARAM)
            .and_then(Language::from_code)
            .or_else(|| store.get(LANG_KEY).as_deref().and_then(Language::from_code))
            .unwrap_or_default();

        let theme = store
            .get(THEME_KEY)
            .as_deref()
            .and_then(ThemeMode::parse)
            .or(os_theme)
            .unwrap_or_default();

        tracing::info!("Resolved preferences: theme={}, language={}", theme, language);

        Self {
            store,
            prefs: Preferences { theme, language },
            location,
        }
    }

    pub fn theme(&self) -> ThemeMode {
        self.prefs.theme
    }

    pub fn language(&self) -> Language {
        self.prefs.language
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Change the theme. The in-memory value updates even if persisting fails.
    pub fn set_theme(&mut self, theme: ThemeMode) -> Result<()> {
        self.prefs.theme = theme;
        self.store.set(THEME_KEY, theme.as_str())
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeMode> {
        let next = self.prefs.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    /// Change the language and mirror it into the location
    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.prefs.language = language;
        self.location.set(LANG_PARAM, language.code());
        tracing::debug!("Location rewritten to {}", self.location);
        self.store.set(LANG_KEY, language.code())
    }
}

/// Theme hint from the terminal's `COLORFGBG` variable
pub fn os_theme_hint() -> Option<ThemeMode> {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| theme_from_colorfgbg(&value))
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`). Background colors 0-6
/// and 8 are the dark half of the 16-color palette.
pub fn theme_from_colorfgbg(value: &str) -> Option<ThemeMode> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(ThemeMode::Dark),
        7 | 9..=15 => Some(ThemeMode::Light),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, TomlFileStore};

    fn memory_with(entries: &[(&str, &str)]) -> Box<dyn KeyValueStore> {
        let mut store = MemoryStore::new();
        for (k, v) in entries {
            store.set(k, v).unwrap();
        }
        Box::new(store)
    }

    #[test]
    fn test_defaults_when_nothing_is_known() {
        let prefs = PreferenceStore::resolve(memory_with(&[]), Location::default(), None);
        assert_eq!(prefs.theme(), ThemeMode::Light);
        assert_eq!(prefs.language(), Language::En);
    }

    #[test]
    fn test_location_beats_persisted_language() {
        let prefs = PreferenceStore::resolve(
            memory_with(&[(LANG_KEY, "de")]),
            Location::parse("?lang=fr"),
            None,
        );
        assert_eq!(prefs.language(), Language::Fr);
    }

    #[test]
    fn test_unknown_location_language_falls_through() {
        let prefs = PreferenceStore::resolve(
            memory_with(&[(LANG_KEY, "ja")]),
            Location::parse("?lang=klingon"),
            None,
        );
        assert_eq!(prefs.language(), Language::Ja);
    }

    #[test]
    fn test_persisted_theme_beats_os_hint() {
        let prefs = PreferenceStore::resolve(
            memory_with(&[(THEME_KEY, "light")]),
            Location::default(),
            Some(ThemeMode::Dark),
        );
        assert_eq!(prefs.theme(), ThemeMode::Light);

        let hinted =
            PreferenceStore::resolve(memory_with(&[]), Location::default(), Some(ThemeMode::Dark));
        assert_eq!(hinted.theme(), ThemeMode::Dark);
    }

    #[test]
    fn test_language_change_rewrites_location() {
        let mut prefs = PreferenceStore::resolve(
            memory_with(&[]),
            Location::parse("?ref=home&lang=en"),
            None,
        );
        prefs.set_language(Language::Ar).unwrap();
        assert_eq!(prefs.location().to_query_string(), "?ref=home&lang=ar");
    }

    #[test]
    fn test_preferences_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let mut prefs =
            PreferenceStore::resolve(Box::new(TomlFileStore::open(&path)), Location::default(), None);
        prefs.set_theme(ThemeMode::Dark).unwrap();
        prefs.set_language(Language::Nl).unwrap();
        drop(prefs);

        let reloaded =
            PreferenceStore::resolve(Box::new(TomlFileStore::open(&path)), Location::default(), None);
        assert_eq!(reloaded.theme(), ThemeMode::Dark);
        assert_eq!(reloaded.language(), Language::Nl);
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut prefs = PreferenceStore::resolve(memory_with(&[]), Location::default(), None);
        assert_eq!(prefs.toggle_theme().unwrap(), ThemeMode::Dark);
        assert_eq!(prefs.store.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_colorfgbg_hint() {
        assert_eq!(theme_from_colorfgbg("15;0"), Some(ThemeMode::Dark));
        assert_eq!(theme_from_colorfgbg("0;15"), Some(ThemeMode::Light));
        assert_eq!(theme_from_colorfgbg("12;default;8"), Some(ThemeMode::Dark));
        assert_eq!(theme_from_colorfgbg("garbage"), None);
    }
}
