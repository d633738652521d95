//! Keyword intent detector.
//!
//! Matching is plain substring containment on the lower-cased input, so a
//! keyword embedded in a longer word still matches ("snowmobile" hits
//! "snow"). The first intent in table order with any matching keyword wins;
//! there is no scoring.

use tracing::debug;

use crate::intents::IntentTable;

/// Detects intents from free text against a fixed keyword table.
#[derive(Debug, Clone)]
pub struct IntentDetector {
    /// (intent, lower-cased keywords) in declaration order.
    entries: Vec<(String, Vec<String>)>,
}

impl IntentDetector {
    /// Build a detector, lower-casing every keyword once.
    pub fn new(table: &IntentTable) -> Self {
        let entries = table
            .iter()
            .map(|intent| {
                let keywords = intent
                    .keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.trim().is_empty())
                    .collect();
                (intent.name.clone(), keywords)
            })
            .collect();
        Self { entries }
    }

    /// Return the first matching intent, or `None` when nothing matches.
    pub fn detect(&self, text: &str) -> Option<&str> {
        if text.trim().is_empty() {
            return None;
        }
        let normalized = text.to_lowercase();

        for (intent, keywords) in &self.entries {
            if let Some(keyword) = keywords.iter().find(|k| normalized.contains(k.as_str())) {
                debug!(intent = %intent, keyword = %keyword, "Intent detected");
                return Some(intent.as_str());
            }
        }

        None
    }
}
