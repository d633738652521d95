//! Intent keyword table.
//!
//! Maps each intent to its trigger keywords. Keywords are language-mixed so
//! that detection works regardless of the language the widget is shown in.
//! Declaration order matters: the detector returns the first intent with a
//! matching keyword.

use serde::{Deserialize, Serialize};

/// Name of the intent whose reply leaves the quick-action set untouched.
pub const GREETINGS_INTENT: &str = "greetings";

/// Intent submitted by a quick-action label nobody recognizes.
pub const FALLBACK_QUICK_ACTION_INTENT: &str = "destinations";

/// A canonical conversation topic and its trigger keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered, read-only table of intents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntentTable {
    intents: Vec<Intent>,
}

impl IntentTable {
    pub fn new(intents: Vec<Intent>) -> Self {
        Self { intents }
    }

    /// Keywords registered for `intent`, in declaration order.
    pub fn keywords_for(&self, intent: &str) -> Option<&[String]> {
        self.intents
            .iter()
            .find(|i| i.name == intent)
            .map(|i| i.keywords.as_slice())
    }

    /// Intent names in declaration order.
    pub fn all_intents(&self) -> impl Iterator<Item = &str> + '_ {
        self.intents.iter().map(|i| i.name.as_str())
    }

    pub fn contains(&self, intent: &str) -> bool {
        self.intents.iter().any(|i| i.name == intent)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intent> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}
