//! Shared types for the conversation engine.

use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single entry in the conversation log. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Epoch milliseconds (UTC).
    pub created_at: i64,
    /// Language active when the message was created.
    pub language: String,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            created_at: Utc::now().timestamp_millis(),
            language: language.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Local wall-clock time as `HH:MM`.
    pub fn display_time(&self) -> String {
        Local
            .timestamp_millis_opt(self.created_at)
            .single()
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Widget visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    #[default]
    Closed,
    Open,
    OpenMinimized,
}

impl WidgetState {
    pub fn is_open(self) -> bool {
        !matches!(self, WidgetState::Closed)
    }
}

/// One-shot instruction for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEffect {
    /// Move keyboard focus to the input box.
    FocusInput,
    /// Redraw the quick-action buttons for the current language.
    RenderQuickActions,
    /// Refresh placeholder, bot name, status, flag and font class.
    ChromeUpdated { language: String },
}

/// Assistant reply owed for a submission. The text is resolved in the
/// language active at delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    /// Detected (or quick-action) intent; `None` means the default response.
    pub intent: Option<String>,
    /// Quick-action replies leave the button row as it is.
    pub from_quick_action: bool,
}

/// Observable widget state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub state: WidgetState,
    pub open: bool,
    pub minimized: bool,
    pub language_panel_open: bool,
    pub unread: bool,
    pub typing: bool,
    pub language: String,
    pub message_count: usize,
}

/// Everything the driver publishes to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    MessageAppended { message: ConversationMessage },
    Effect { effect: UiEffect },
    StateChanged { snapshot: SessionSnapshot },
}
