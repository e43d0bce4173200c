//! # Process-wide language preference.
//!
//! The channel layer depends on locale for exactly one thing: the spelling of
//! the inbound message-notification event key ([`Language::message_key`]).
//! Everything else about localization (string tables, UI direction) is out of
//! scope and belongs to the host application.
//!
//! Persistence goes through the narrow [`SettingsStore`] seam so hosts can
//! plug in whatever settings backend they already use; [`MemoryStore`] is
//! provided for tests and simple embedders.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Settings key under which the language tag is persisted.
const LANGUAGE_SETTING: &str = "ud_language";

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// English (default).
    #[default]
    English,
    /// Arabic.
    Arabic,
}

impl Language {
    /// Returns the persisted language tag.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    /// Parses a persisted language tag. Unknown tags are `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "en" => Some(Language::English),
            "ar" => Some(Language::Arabic),
            _ => None,
        }
    }

    /// Returns the inbound message-notification event key for this language.
    ///
    /// This is the single locale-dependent string the channel layer consults:
    /// the server pushes message notifications under a locale-specific key.
    pub fn message_key(&self) -> &'static str {
        match self {
            Language::Arabic => "arabic_message",
            Language::English => "message",
        }
    }
}

/// Narrow persistence seam for the language preference.
pub trait SettingsStore: Send + Sync + 'static {
    /// Reads a stored string value, if present.
    fn get(&self, key: &str) -> Option<String>;
    /// Writes a string value.
    fn set(&self, key: &str, value: &str);
}

/// In-memory [`SettingsStore`] for tests and simple embedders.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.values.write() {
            map.insert(key.to_string(), value.to_string());
        }
    }
}

/// Current-language state with load/save against a [`SettingsStore`].
///
/// Reads are cheap and lock-free in practice (short `RwLock` critical
/// sections); writes happen only on explicit preference changes.
pub struct LocalePreference {
    language: RwLock<Language>,
    store: Arc<dyn SettingsStore>,
}

impl LocalePreference {
    /// Creates a preference backed by `store`, defaulting to English until
    /// [`LocalePreference::fetch`] loads a persisted value.
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            language: RwLock::new(Language::default()),
            store,
        }
    }

    /// Loads the persisted language. Missing or unknown values fall back to
    /// English.
    pub fn fetch(&self) {
        let loaded = self
            .store
            .get(LANGUAGE_SETTING)
            .and_then(|tag| Language::from_tag(&tag))
            .unwrap_or_default();
        if let Ok(mut lang) = self.language.write() {
            *lang = loaded;
        }
    }

    /// Persists the current language.
    pub fn save(&self) {
        self.store.set(LANGUAGE_SETTING, self.language().as_tag());
    }

    /// Sets and persists the language.
    pub fn set_language(&self, language: Language) {
        if let Ok(mut lang) = self.language.write() {
            *lang = language;
        }
        self.save();
    }

    /// Returns the current language.
    pub fn language(&self) -> Language {
        self.language.read().map(|l| *l).unwrap_or_default()
    }

    /// Returns the locale-dependent message-notification event key.
    pub fn message_key(&self) -> &'static str {
        self.language().message_key()
    }
}
