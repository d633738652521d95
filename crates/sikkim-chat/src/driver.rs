//! Chat driver: paces a session on the tokio runtime.
//!
//! Wraps a [`ConversationSession`] behind a mutex, delivers assistant replies
//! after a simulated typing delay, runs the unsolicited welcome sequence, and
//! broadcasts every change as a [`SessionEvent`].

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use sikkim_core::ChatConfig;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::catalog::LanguageCatalog;
use crate::error::ChatError;
use crate::session::ConversationSession;
use crate::types::{ConversationMessage, PendingReply, SessionEvent, SessionSnapshot, WidgetState};

/// Largest broadcast buffer a driver will allocate.
pub const MAX_EVENT_CAPACITY: usize = 65_536;

struct Shared {
    session: Mutex<ConversationSession>,
    config: ChatConfig,
    events: broadcast::Sender<SessionEvent>,
}

/// Cloneable handle driving a single conversation session.
#[derive(Clone)]
pub struct ChatDriver {
    shared: Arc<Shared>,
}

impl ChatDriver {
    /// Create a driver over `catalog`, starting in `config.default_language`.
    pub fn new(catalog: Arc<LanguageCatalog>, config: ChatConfig) -> Result<Self, ChatError> {
        let session = ConversationSession::new(catalog, &config.default_language)?;
        let (events, _) = broadcast::channel(config.event_capacity.clamp(1, MAX_EVENT_CAPACITY));
        Ok(Self {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                config,
                events,
            }),
        })
    }

    /// Create a driver using the catalog named in the config, or the
    /// built-in one.
    pub fn from_config(config: ChatConfig) -> Result<Self, ChatError> {
        let catalog = match config.catalog_path.as_deref() {
            Some(path) => Arc::new(LanguageCatalog::load(Path::new(path))?),
            None => LanguageCatalog::builtin(),
        };
        Self::new(catalog, config)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    pub fn config(&self) -> &ChatConfig {
        &self.shared.config
    }

    // -----------------------------------------------------------------
    // Inbound surface
    // -----------------------------------------------------------------

    /// Record the user message now and deliver the reply after the typing
    /// delay. The returned handle completes once the reply is appended.
    pub fn submit(&self, text: &str) -> Result<JoinHandle<()>, ChatError> {
        let reply = self
            .apply(|s| s.submit(text))
            .and_then(|r| r)
            .inspect_err(log_rejected)?;
        Ok(self.schedule_reply(reply))
    }

    /// Like [`submit`](Self::submit) for a quick-action label.
    pub fn quick_action(&self, label: &str) -> Result<JoinHandle<()>, ChatError> {
        let reply = self
            .apply(|s| s.quick_action(label))
            .and_then(|r| r)
            .inspect_err(log_rejected)?;
        Ok(self.schedule_reply(reply))
    }

    pub fn toggle_widget(&self) -> Result<WidgetState, ChatError> {
        self.apply(ConversationSession::toggle_widget)
    }

    pub fn minimize(&self) -> Result<WidgetState, ChatError> {
        self.apply(ConversationSession::minimize)
    }

    pub fn toggle_language_panel(&self) -> Result<bool, ChatError> {
        self.apply(ConversationSession::toggle_language_panel)
    }

    pub fn dismiss_language_panel(&self) -> Result<(), ChatError> {
        self.apply(ConversationSession::dismiss_language_panel)
    }

    pub fn select_language(&self, id: &str) -> Result<bool, ChatError> {
        self.apply(|s| s.select_language(id))
            .and_then(|r| r)
            .inspect_err(log_rejected)
    }

    /// Spawn the welcome sequence. It does nothing if the user interacts
    /// before the delay elapses.
    pub fn start(&self) -> JoinHandle<()> {
        let driver = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(driver.shared.config.welcome_delay()).await;
            match driver.apply(ConversationSession::greet) {
                Ok(true) => {}
                Ok(false) => {
                    debug!("Welcome skipped: user already interacted");
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "Welcome greeting failed");
                    return;
                }
            }

            tokio::time::sleep(driver.shared.config.welcome_followup_delay()).await;
            if let Err(e) = driver.apply(ConversationSession::introduce) {
                warn!(error = %e, "Welcome introduction failed");
            }
        })
    }

    // -----------------------------------------------------------------
    // Outbound surface
    // -----------------------------------------------------------------

    pub fn snapshot(&self) -> Result<SessionSnapshot, ChatError> {
        self.inspect(ConversationSession::snapshot)
    }

    pub fn messages(&self) -> Result<Vec<ConversationMessage>, ChatError> {
        self.inspect(|s| s.messages().to_vec())
    }

    /// Run a read-only closure against the session.
    pub fn inspect<R>(&self, f: impl FnOnce(&ConversationSession) -> R) -> Result<R, ChatError> {
        let session = self.lock()?;
        Ok(f(&*session))
    }

    // -- Private helpers --

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ConversationSession>, ChatError> {
        self.shared
            .session
            .lock()
            .map_err(|e| ChatError::SessionUnavailable(format!("session lock poisoned: {}", e)))
    }

    /// Mutate the session and publish whatever changed.
    fn apply<R>(&self, f: impl FnOnce(&mut ConversationSession) -> R) -> Result<R, ChatError> {
        let mut session = self.lock()?;
        let before = session.messages().len();
        let snapshot_before = session.snapshot();

        let result = f(&mut *session);

        let events = &self.shared.events;
        for message in &session.messages()[before..] {
            let _ = events.send(SessionEvent::MessageAppended {
                message: message.clone(),
            });
        }
        for effect in session.drain_effects() {
            let _ = events.send(SessionEvent::Effect { effect });
        }
        let snapshot = session.snapshot();
        if snapshot != snapshot_before {
            let _ = events.send(SessionEvent::StateChanged { snapshot });
        }

        Ok(result)
    }

    fn reply_delay(&self) -> Duration {
        let config = &self.shared.config;
        let jitter = if config.typing_jitter_ms > 0 {
            rand::rng().random_range(0..=config.typing_jitter_ms)
        } else {
            0
        };
        config.base_reply_delay() + Duration::from_millis(jitter)
    }

    fn schedule_reply(&self, reply: PendingReply) -> JoinHandle<()> {
        let driver = self.clone();
        let delay = self.reply_delay();
        debug!(intent = ?reply.intent, delay_ms = delay.as_millis() as u64, "Reply scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = driver.apply(|s| {
                s.deliver(reply);
            }) {
                warn!(error = %e, "Failed to deliver reply");
            }
        })
    }
}

fn log_rejected(err: &ChatError) {
    if err.is_ignorable() {
        debug!(error = %err, "Input ignored");
    } else {
        warn!(error = %err, "Chat operation failed");
    }
}

// =============================================================================
// Tests
// =============================================================================
