//! Conversation state machine.
//!
//! One `ConversationSession` per widget. It owns the message log, the widget
//! visibility state, the active language and the pending UI effects. All
//! handlers are synchronous; pacing of assistant replies is left to the
//! caller (see [`crate::driver::ChatDriver`]).

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::catalog::{LanguageCatalog, LanguageEntry, QuickAction, UiStrings};
use crate::error::ChatError;
use crate::intents::GREETINGS_INTENT;
use crate::types::{
    ConversationMessage, PendingReply, Role, SessionSnapshot, UiEffect, WidgetState,
};

/// Upper bound on undrained effects; the oldest are dropped first.
pub const MAX_QUEUED_EFFECTS: usize = 64;

// =============================================================================
// ConversationSession
// =============================================================================

/// State of a single chat widget for the lifetime of a page.
#[derive(Debug)]
pub struct ConversationSession {
    id: Uuid,
    catalog: Arc<LanguageCatalog>,
    language: String,
    messages: Vec<ConversationMessage>,
    state: WidgetState,
    language_panel_open: bool,
    unread: bool,
    has_interacted: bool,
    replies_in_flight: usize,
    effects: Vec<UiEffect>,
}

impl ConversationSession {
    /// Create a closed session showing `language`.
    pub fn new(catalog: Arc<LanguageCatalog>, language: &str) -> Result<Self, ChatError> {
        catalog.get_language(language)?;
        Ok(Self {
            id: Uuid::new_v4(),
            catalog,
            language: language.to_string(),
            messages: Vec::new(),
            state: WidgetState::Closed,
            language_panel_open: false,
            unread: false,
            has_interacted: false,
            replies_in_flight: 0,
            effects: Vec::new(),
        })
    }

    // -----------------------------------------------------------------
    // Widget visibility
    // -----------------------------------------------------------------

    /// Open a closed widget, or close an open one.
    pub fn toggle_widget(&mut self) -> WidgetState {
        self.has_interacted = true;
        self.state = match self.state {
            WidgetState::Closed => {
                self.unread = false;
                self.queue_effect(UiEffect::FocusInput);
                WidgetState::Open
            }
            WidgetState::Open | WidgetState::OpenMinimized => {
                self.language_panel_open = false;
                WidgetState::Closed
            }
        };
        debug!(session = %self.id, state = ?self.state, "Widget toggled");
        self.state
    }

    /// Flip between open and minimized. Ignored while closed.
    pub fn minimize(&mut self) -> WidgetState {
        self.has_interacted = true;
        self.state = match self.state {
            WidgetState::Open => WidgetState::OpenMinimized,
            WidgetState::OpenMinimized => {
                self.unread = false;
                WidgetState::Open
            }
            WidgetState::Closed => WidgetState::Closed,
        };
        self.state
    }

    pub fn toggle_language_panel(&mut self) -> bool {
        self.has_interacted = true;
        self.language_panel_open = !self.language_panel_open;
        self.language_panel_open
    }

    /// Close the language panel (e.g. click outside the widget).
    pub fn dismiss_language_panel(&mut self) {
        self.language_panel_open = false;
    }

    // -----------------------------------------------------------------
    // Language selection
    // -----------------------------------------------------------------

    /// Switch the active language.
    ///
    /// Returns whether the language actually changed. Reselecting the
    /// active language only refreshes the chrome.
    pub fn select_language(&mut self, id: &str) -> Result<bool, ChatError> {
        if !self.catalog.contains(id) {
            debug!(session = %self.id, language = %id, "Ignoring unknown language");
            return Err(ChatError::UnknownLanguage(id.to_string()));
        }

        self.has_interacted = true;
        let changed = self.language != id;
        self.language = id.to_string();
        self.language_panel_open = false;
        self.queue_effect(UiEffect::ChromeUpdated {
            language: id.to_string(),
        });

        if changed {
            let welcome = self.language_entry().greetings.welcome.clone();
            self.push_assistant(welcome);
            self.queue_effect(UiEffect::RenderQuickActions);
        }

        Ok(changed)
    }

    // -----------------------------------------------------------------
    // Messaging
    // -----------------------------------------------------------------

    /// Record a user message and compute the reply to deliver later.
    pub fn submit(&mut self, text: &str) -> Result<PendingReply, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptySubmission);
        }

        self.has_interacted = true;
        self.push_message(Role::User, text.to_string());

        let intent = self.catalog.detector().detect(text).map(str::to_string);
        Ok(self.pending_reply(intent, false))
    }

    /// Record a quick-action label as the user message and compute the
    /// reply for its intent, skipping keyword detection.
    pub fn quick_action(&mut self, label: &str) -> Result<PendingReply, ChatError> {
        if label.trim().is_empty() {
            return Err(ChatError::EmptySubmission);
        }

        self.has_interacted = true;
        let intent = self
            .catalog
            .quick_action_intent(self.language_entry(), label)
            .to_string();
        self.push_message(Role::User, label.to_string());

        Ok(self.pending_reply(Some(intent), true))
    }

    /// Append the assistant half of an exchange in the current language.
    pub fn deliver(&mut self, reply: PendingReply) -> &ConversationMessage {
        self.replies_in_flight = self.replies_in_flight.saturating_sub(1);
        let intent = reply.intent.as_deref();
        if !reply.from_quick_action && intent.is_some_and(|i| i != GREETINGS_INTENT) {
            self.queue_effect(UiEffect::RenderQuickActions);
        }
        let text = self.language_entry().response(intent).to_string();
        self.push_assistant(text)
    }

    /// Submit and deliver immediately.
    pub fn exchange(&mut self, text: &str) -> Result<ConversationMessage, ChatError> {
        let reply = self.submit(text)?;
        Ok(self.deliver(reply).clone())
    }

    /// Quick action and delivery in one step.
    pub fn exchange_quick_action(&mut self, label: &str) -> Result<ConversationMessage, ChatError> {
        let reply = self.quick_action(label)?;
        Ok(self.deliver(reply).clone())
    }

    // -----------------------------------------------------------------
    // Welcome sequence
    // -----------------------------------------------------------------

    /// Append the hello greeting unless the user already interacted.
    pub fn greet(&mut self) -> bool {
        if self.has_interacted {
            return false;
        }
        let hello = self.language_entry().greetings.hello.clone();
        self.push_assistant(hello);
        true
    }

    /// Append the default introduction and offer the quick actions.
    pub fn introduce(&mut self) {
        let intro = self.language_entry().response(None).to_string();
        self.push_assistant(intro);
        self.queue_effect(UiEffect::RenderQuickActions);
    }

    /// Greet and introduce in one step. No-op after any interaction.
    pub fn show_welcome(&mut self) -> bool {
        if !self.greet() {
            return false;
        }
        self.introduce();
        true
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &Arc<LanguageCatalog> {
        &self.catalog
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn is_minimized(&self) -> bool {
        self.state == WidgetState::OpenMinimized
    }

    pub fn is_language_panel_open(&self) -> bool {
        self.language_panel_open
    }

    pub fn has_unread(&self) -> bool {
        self.unread
    }

    pub fn has_interacted(&self) -> bool {
        self.has_interacted
    }

    /// Whether at least one reply has been submitted but not delivered.
    pub fn is_typing(&self) -> bool {
        self.replies_in_flight > 0
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn language_entry(&self) -> &LanguageEntry {
        self.catalog
            .languages()
            .iter()
            .find(|l| l.id == self.language)
            .unwrap_or(&self.catalog.languages()[0])
    }

    pub fn ui(&self) -> &UiStrings {
        &self.language_entry().ui
    }

    pub fn quick_actions(&self) -> &[QuickAction] {
        &self.language_entry().quick_actions
    }

    /// Take all effects queued since the last call.
    ///
    /// [`ChatDriver`](crate::driver::ChatDriver) drains after every handler.
    /// Standalone callers should do the same; past [`MAX_QUEUED_EFFECTS`]
    /// the oldest effects are discarded.
    pub fn drain_effects(&mut self) -> Vec<UiEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            state: self.state,
            open: self.is_open(),
            minimized: self.is_minimized(),
            language_panel_open: self.language_panel_open,
            unread: self.unread,
            typing: self.is_typing(),
            language: self.language.clone(),
            message_count: self.messages.len(),
        }
    }

    // -- Private helpers --

    fn pending_reply(&mut self, intent: Option<String>, from_quick_action: bool) -> PendingReply {
        self.replies_in_flight += 1;
        PendingReply {
            intent,
            from_quick_action,
        }
    }

    fn queue_effect(&mut self, effect: UiEffect) {
        if self.effects.len() >= MAX_QUEUED_EFFECTS {
            self.effects.remove(0);
        }
        self.effects.push(effect);
    }

    fn push_assistant(&mut self, text: String) -> &ConversationMessage {
        self.push_message(Role::Assistant, text)
    }

    fn push_message(&mut self, role: Role, content: String) -> &ConversationMessage {
        if role == Role::Assistant && self.state != WidgetState::Open {
            self.unread = true;
        }
        let language = self.language.clone();
        self.messages
            .push(ConversationMessage::new(role, content, language));
        &self.messages[self.messages.len() - 1]
    }
}

// =============================================================================
// Tests
// =============================================================================
