//! Localized string tables and lookup.
//!
//! Every supported language ships as a flat `key = "value"` TOML table under
//! `locales/`, embedded at compile time. Lookups fall back to English and then
//! to the key itself, so a missing translation never renders as a blank.

use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

static LOCALES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/locales");

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
    Fr,
    Es,
    El,
    Pt,
    De,
    Zh,
    Ja,
    Nl,
}

impl Language {
    /// Every language, in picker order
    pub const ALL: [Language; 10] = [
        Language::En,
        Language::Ar,
        Language::Fr,
        Language::Es,
        Language::El,
        Language::Pt,
        Language::De,
        Language::Zh,
        Language::Ja,
        Language::Nl,
    ];

    /// Language used when a key is missing from the active table
    pub const FALLBACK: Language = Language::En;

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::El => "el",
            Language::Pt => "pt",
            Language::De => "de",
            Language::Zh => "zh",
            Language::Ja => "ja",
            Language::Nl => "nl",
        }
    }

    /// Parse a language code. Region tags (`pt-BR`, `zh_CN`) are accepted.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_lowercase();
        let primary = normalized.split(['-', '_']).next().unwrap_or("");
        Self::ALL.into_iter().find(|lang| lang.code() == primary)
    }

    /// Name of the language written in that language
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ar => "العربية",
            Language::Fr => "Français",
            Language::Es => "Español",
            Language::El => "Ελληνικά",
            Language::Pt => "Português",
            Language::De => "Deutsch",
            Language::Zh => "中文",
            Language::Ja => "日本語",
            Language::Nl => "Nederlands",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Ar)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::FALLBACK
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Read-only translation catalog for all languages
#[derive(Debug, Default)]
pub struct Translator {
    tables: HashMap<Language, HashMap<String, String>>,
}

impl Translator {
    /// Catalog built from the embedded `locales/` directory
    pub fn embedded() -> &'static Translator {
        static CATALOG: OnceLock<Translator> = OnceLock::new();
        CATALOG.get_or_init(|| {
            let mut translator = Translator::default();
            for lang in Language::ALL {
                let file_name = format!("{}.toml", lang.code());
                let Some(file) = LOCALES_DIR.get_file(&file_name) else {
                    tracing::warn!("No locale table for {}", lang);
                    continue;
                };
                let contents = file.contents_utf8().unwrap_or_default();
                match Self::parse_table(contents) {
                    Ok(table) => {
                        translator.tables.insert(lang, table);
                    }
                    Err(e) => tracing::error!("Failed to parse {}: {}", file_name, e),
                }
            }
            translator
        })
    }

    fn parse_table(contents: &str) -> Result<HashMap<String, String>, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Build a catalog from in-memory tables
    #[cfg(test)]
    pub fn from_tables(tables: HashMap<Language, HashMap<String, String>>) -> Self {
        Self { tables }
    }

    /// Localized string for `key`, falling back to English, then the key
    pub fn lookup<'a>(&'a self, lang: Language, key: &'a str) -> &'a str {
        self.get(lang, key)
            .or_else(|| self.get(Language::FALLBACK, key))
            .unwrap_or(key)
    }

    fn get(&self, lang: Language, key: &str) -> Option<&str> {
        self.tables
            .get(&lang)
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Keys present in the fallback table
    #[cfg(test)]
    pub fn fallback_keys(&self) -> impl Iterator<Item = &str> {
        self.tables
            .get(&Language::FALLBACK)
            .into_iter()
            .flat_map(|table| table.keys().map(String::as_str))
    }
}

/// Translation handle bound to the active language
#[derive(Debug, Clone, Copy)]
pub struct Tr {
    lang: Language,
    catalog: &'static Translator,
}

impl Tr {
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            catalog: Translator::embedded(),
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        self.catalog.lookup(self.lang, key)
    }

    /// `|`-separated step list
    pub fn steps(&self, key: &str) -> Vec<String> {
        self.t(key)
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Lookup with `{name}` placeholders substituted
    pub fn fmt(&self, key: &str, args: &[(&str, &str)]) -> String {
        fill(self.t(key), args)
    }
}

/// Substitute `{name}` placeholders in a template
pub fn fill(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}
