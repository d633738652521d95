//! Language catalog.
//!
//! Static, read-only configuration: per-language greetings, intent
//! responses, quick actions, and UI strings, plus the shared intent table.
//! The built-in catalog is embedded JSON parsed once per process.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use sikkim_core::SikkimError;
use tracing::info;

use crate::detector::IntentDetector;
use crate::error::ChatError;
use crate::intents::{IntentTable, FALLBACK_QUICK_ACTION_INTENT};

/// Response key used when no intent matched.
pub const DEFAULT_RESPONSE: &str = "default";

static BUILTIN_CATALOG_JSON: &str = include_str!("../data/catalog.json");

static BUILTIN_CATALOG: LazyLock<Arc<LanguageCatalog>> = LazyLock::new(|| {
    Arc::new(
        LanguageCatalog::from_json_str(BUILTIN_CATALOG_JSON)
            .expect("Invalid built-in language catalog"),
    )
});

// =============================================================================
// Language entry
// =============================================================================

/// Greetings shown outside the intent flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greetings {
    pub hello: String,
    pub welcome: String,
    pub goodbye: String,
}

/// Chrome strings for the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiStrings {
    pub input_placeholder: String,
    pub send_button: String,
    pub select_language: String,
    pub bot_name: String,
    pub status: String,
}

/// A localized quick-action button and the intent it submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    pub intent: String,
}

/// All localized strings for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub id: String,
    pub name: String,
    pub code: String,
    pub flag: String,
    #[serde(default)]
    pub font_class: String,
    pub greetings: Greetings,
    pub responses: HashMap<String, String>,
    pub quick_actions: Vec<QuickAction>,
    pub ui: UiStrings,
}

impl LanguageEntry {
    /// Localized response for `intent`, or the default response.
    pub fn response(&self, intent: Option<&str>) -> &str {
        intent
            .and_then(|i| self.responses.get(i))
            .or_else(|| self.responses.get(DEFAULT_RESPONSE))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Intent bound to a quick-action label in this language.
    pub fn quick_action_intent(&self, label: &str) -> Option<&str> {
        self.quick_actions
            .iter()
            .find(|qa| qa.label == label)
            .map(|qa| qa.intent.as_str())
    }

    /// Quick-action labels in display order.
    pub fn quick_action_labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.quick_actions.iter().map(|qa| qa.label.as_str())
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Deserialize)]
struct RawCatalog {
    languages: Vec<LanguageEntry>,
    intents: IntentTable,
}

/// Process-wide language catalog and intent table.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    languages: Vec<LanguageEntry>,
    intents: IntentTable,
    detector: IntentDetector,
}

impl LanguageCatalog {
    /// Shared handle to the embedded catalog.
    pub fn builtin() -> Arc<LanguageCatalog> {
        Arc::clone(&BUILTIN_CATALOG)
    }

    /// Build a catalog, rejecting it if any invariant is violated.
    pub fn new(languages: Vec<LanguageEntry>, intents: IntentTable) -> Result<Self, ChatError> {
        validate(&languages, &intents)?;
        let detector = IntentDetector::new(&intents);
        Ok(Self {
            languages,
            intents,
            detector,
        })
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ChatError> {
        let raw: RawCatalog = serde_json::from_str(json).map_err(SikkimError::from)?;
        Self::new(raw.languages, raw.intents)
    }

    /// Load and validate a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ChatError> {
        let content = std::fs::read_to_string(path).map_err(SikkimError::from)?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            languages = catalog.languages.len(),
            intents = catalog.intents.len(),
            "Language catalog loaded from {}",
            path.display()
        );
        Ok(catalog)
    }

    pub fn get_language(&self, id: &str) -> Result<&LanguageEntry, ChatError> {
        self.languages
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| ChatError::UnknownLanguage(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.languages.iter().any(|l| l.id == id)
    }

    /// Languages in declaration order.
    pub fn languages(&self) -> &[LanguageEntry] {
        &self.languages
    }

    pub fn intents(&self) -> &IntentTable {
        &self.intents
    }

    pub fn detector(&self) -> &IntentDetector {
        &self.detector
    }

    /// Resolve the intent a quick-action label submits.
    ///
    /// Looks in `current` first, then in every other language, and finally
    /// falls back to the destinations intent.
    pub fn quick_action_intent<'a>(&'a self, current: &'a LanguageEntry, label: &str) -> &'a str {
        current
            .quick_action_intent(label)
            .or_else(|| {
                self.languages
                    .iter()
                    .find_map(|l| l.quick_action_intent(label))
            })
            .unwrap_or(FALLBACK_QUICK_ACTION_INTENT)
    }
}

fn validate(languages: &[LanguageEntry], intents: &IntentTable) -> Result<(), ChatError> {
    let invalid = |msg: String| -> Result<(), ChatError> { Err(ChatError::InvalidCatalog(msg)) };

    if languages.is_empty() {
        return invalid("catalog defines no languages".to_string());
    }
    if intents.is_empty() {
        return invalid("catalog defines no intents".to_string());
    }

    let mut seen = HashSet::new();
    for intent in intents.iter() {
        if !seen.insert(intent.name.as_str()) {
            return invalid(format!("duplicate intent '{}'", intent.name));
        }
        if intent.keywords.iter().any(|k| k.trim().is_empty()) {
            return invalid(format!("intent '{}' has an empty keyword", intent.name));
        }
    }

    let mut seen = HashSet::new();
    for lang in languages {
        if !seen.insert(lang.id.as_str()) {
            return invalid(format!("duplicate language '{}'", lang.id));
        }
        if !lang.responses.contains_key(DEFAULT_RESPONSE) {
            return invalid(format!("language '{}' has no default response", lang.id));
        }
        if let Some(missing) = intents.all_intents().find(|i| !lang.responses.contains_key(*i)) {
            return invalid(format!(
                "language '{}' has no response for intent '{}'",
                lang.id, missing
            ));
        }
        if let Some(qa) = lang.quick_actions.iter().find(|qa| !intents.contains(&qa.intent)) {
            return invalid(format!(
                "language '{}' quick action '{}' targets unknown intent '{}'",
                lang.id, qa.label, qa.intent
            ));
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
