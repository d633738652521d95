//! End-to-end tests for the conversation engine.
//!
//! Each test builds its own session or driver over the built-in catalog.

use std::sync::Arc;
use std::time::Duration;

use sikkim_chat::{
    ChatDriver, ChatError, ConversationSession, LanguageCatalog, Role, SessionEvent, WidgetState,
    DEFAULT_RESPONSE,
};
use sikkim_core::ChatConfig;

// =============================================================================
// Helpers
// =============================================================================

fn catalog() -> Arc<LanguageCatalog> {
    LanguageCatalog::builtin()
}

fn response(language: &str, intent: &str) -> String {
    catalog().get_language(language).unwrap().responses[intent].clone()
}

fn quiet_config() -> ChatConfig {
    ChatConfig {
        typing_jitter_ms: 0,
        ..ChatConfig::default()
    }
}

// =============================================================================
// Catalog invariants
// =============================================================================

#[test]
fn every_language_answers_every_intent() {
    let catalog = catalog();
    for lang in catalog.languages() {
        assert!(lang.responses.contains_key(DEFAULT_RESPONSE));
        for intent in catalog.intents().all_intents() {
            assert!(lang.responses.contains_key(intent), "{} / {}", lang.id, intent);
        }
    }
}

#[test]
fn every_quick_action_resolves_to_its_declared_intent() {
    let catalog = catalog();
    for lang in catalog.languages() {
        for qa in &lang.quick_actions {
            assert_eq!(catalog.quick_action_intent(lang, &qa.label), qa.intent);
        }
    }
}

// =============================================================================
// Detection through the catalog
// =============================================================================

#[test]
fn detection_properties_on_builtin_table() {
    let detector = catalog().detector().clone();
    assert_eq!(detector.detect(""), None);
    assert_eq!(detector.detect("   "), None);
    assert_eq!(detector.detect("WEATHER"), detector.detect("weather"));
    assert_eq!(detector.detect("snowmobile"), Some("weather"));
    assert_eq!(detector.detect("Tell me about Gangtok"), Some("destinations"));
    assert_eq!(detector.detect("I need a visa"), Some("permits"));
    assert_eq!(detector.detect("अच्छा भोजन"), Some("food"));
    // "स्थानीय" (local) embeds "स्थान" (place).
    assert_eq!(detector.detect("स्थानीय भोजन"), Some("destinations"));
}

#[test]
fn weather_outranks_destinations_on_overlap() {
    let detector = catalog().detector().clone();
    assert_eq!(detector.detect("What is the best time to visit?"), Some("weather"));
    assert_eq!(detector.detect("Best time to visit Pelling"), Some("weather"));
    // "photos" embeds "hot".
    assert_eq!(detector.detect("photos of pelling"), Some("weather"));
    assert_eq!(detector.detect("pelling"), Some("destinations"));
}

#[test]
fn detection_is_independent_of_active_language() {
    let mut session = ConversationSession::new(catalog(), "lepcha").unwrap();
    let reply = session.exchange("permit for Nathula").unwrap();
    assert_eq!(reply.content, response("lepcha", "permits"));
}

// =============================================================================
// Session walkthrough
// =============================================================================

#[test]
fn full_widget_walkthrough() {
    let mut s = ConversationSession::new(catalog(), "english").unwrap();

    s.toggle_widget();
    assert_eq!(s.state(), WidgetState::Open);

    let reply = s.exchange("What is the best time to visit?").unwrap();
    assert_eq!(reply.content, response("english", "weather"));

    s.toggle_language_panel();
    s.select_language("hindi").unwrap();
    assert!(!s.is_language_panel_open());
    assert_eq!(s.ui().send_button, "भेजें");

    let reply = s.exchange_quick_action("होटल").unwrap();
    assert_eq!(reply.content, response("hindi", "hotels"));

    s.minimize();
    let reply = s.exchange("taxi").unwrap();
    assert_eq!(reply.content, response("hindi", "transport"));
    assert!(s.has_unread());

    s.toggle_widget();
    assert_eq!(s.state(), WidgetState::Closed);

    // 2 + welcome + 2 + 2
    assert_eq!(s.messages().len(), 7);
    let roles: Vec<Role> = s.messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::User,
            Role::Assistant,
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
        ]
    );
}

#[test]
fn ignorable_errors_do_not_change_state() {
    let mut s = ConversationSession::new(catalog(), "english").unwrap();
    let before = s.snapshot();

    let err = s.select_language("elvish").unwrap_err();
    assert!(err.is_ignorable());
    let err = s.submit("  ").unwrap_err();
    assert!(matches!(err, ChatError::EmptySubmission));

    assert_eq!(s.snapshot(), before);
}

// =============================================================================
// Driver
// =============================================================================

#[tokio::test(start_paused = true)]
async fn driver_streams_conversation_events() {
    let driver = ChatDriver::new(catalog(), quiet_config()).unwrap();
    let mut rx = driver.subscribe();

    driver.toggle_widget().unwrap();
    driver.submit("momo").unwrap().await.unwrap();
    driver.quick_action("Culture").unwrap().await.unwrap();

    let mut contents = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::MessageAppended { message } = event {
            contents.push(message.content);
        }
    }
    assert_eq!(
        contents,
        vec![
            "momo".to_string(),
            response("english", "food"),
            "Culture".to_string(),
            response("english", "culture"),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn driver_reply_respects_configured_delay() {
    let config = ChatConfig {
        reply_delay_ms: 100,
        typing_delay_ms: 200,
        typing_jitter_ms: 0,
        ..ChatConfig::default()
    };
    let driver = ChatDriver::new(catalog(), config).unwrap();
    driver.toggle_widget().unwrap();

    let start = tokio::time::Instant::now();
    driver.submit("hello").unwrap().await.unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(400));
    assert_eq!(driver.messages().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn driver_loads_catalog_from_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, include_str!("../data/catalog.json")).unwrap();

    let config = ChatConfig {
        default_language: "bhutia".to_string(),
        catalog_path: Some(path.to_string_lossy().to_string()),
        ..quiet_config()
    };
    let driver = ChatDriver::from_config(config).unwrap();
    assert_eq!(driver.snapshot().unwrap().language, "bhutia");
}
