//! Conversation engine for the Sikkim travel assistant.
//!
//! Provides the multilingual language catalog, keyword intent detection,
//! the chat widget state machine, and a tokio driver that paces replies.

pub mod catalog;
pub mod detector;
pub mod driver;
pub mod error;
pub mod intents;
pub mod session;
pub mod types;

pub use catalog::{Greetings, LanguageCatalog, LanguageEntry, QuickAction, UiStrings, DEFAULT_RESPONSE};
pub use detector::IntentDetector;
pub use driver::ChatDriver;
pub use error::ChatError;
pub use intents::{Intent, IntentTable};
pub use session::ConversationSession;
pub use types::{
    ConversationMessage, PendingReply, Role, SessionEvent, SessionSnapshot, UiEffect, WidgetState,
};
