//! Sikkim travel assistant binary - terminal front-end.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Build the chat driver over the language catalog
//! 3. Render session events to stdout on a background task
//! 4. Read commands and free text from stdin until `/quit` or EOF

mod cli;
mod commands;

use std::sync::Arc;

use clap::Parser;
use sikkim_chat::{
    ChatDriver, ChatError, ConversationMessage, LanguageCatalog, Role, SessionEvent, UiEffect,
};
use sikkim_core::SikkimConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use cli::CliArgs;
use commands::{parse_command, Command, HELP};

/// Print every event the driver publishes until the channel closes.
async fn render_loop(
    driver: ChatDriver,
    catalog: Arc<LanguageCatalog>,
    mut events: broadcast::Receiver<SessionEvent>,
) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::MessageAppended { message }) => {
                println!("{}", format_message(&catalog, &message));
            }
            Ok(SessionEvent::Effect { effect }) => render_effect(&driver, &catalog, &effect),
            Ok(SessionEvent::StateChanged { snapshot }) => {
                tracing::debug!(
                    state = ?snapshot.state,
                    unread = snapshot.unread,
                    typing = snapshot.typing,
                    "Widget state changed"
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Renderer fell behind; events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn format_message(catalog: &LanguageCatalog, message: &ConversationMessage) -> String {
    let author = match message.role {
        Role::User => "You".to_string(),
        Role::Assistant => catalog
            .get_language(&message.language)
            .map(|lang| lang.ui.bot_name.clone())
            .unwrap_or_else(|_| "Assistant".to_string()),
    };
    format!("[{}] {}: {}", message.display_time(), author, message.content)
}

fn render_effect(driver: &ChatDriver, catalog: &LanguageCatalog, effect: &UiEffect) {
    match effect {
        UiEffect::FocusInput => {
            if let Ok(placeholder) = driver.inspect(|s| s.ui().input_placeholder.clone()) {
                println!("  ({})", placeholder);
            }
        }
        UiEffect::RenderQuickActions => {
            if let Ok(labels) = driver.inspect(|s| {
                s.language_entry()
                    .quick_action_labels()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            }) {
                println!("  [{}]", labels.join("] ["));
            }
        }
        UiEffect::ChromeUpdated { language } => {
            if let Ok(lang) = catalog.get_language(language) {
                println!(
                    "== {} {} ({}) ==",
                    lang.flag, lang.ui.bot_name, lang.ui.status
                );
            }
        }
    }
}

fn print_languages(driver: &ChatDriver, catalog: &LanguageCatalog) {
    let current = driver.inspect(|s| s.language().to_string()).unwrap_or_default();
    for lang in catalog.languages() {
        let marker = if lang.id == current { "*" } else { " " };
        println!(" {} {:<8} {} {}", marker, lang.id, lang.flag, lang.name);
    }
}

fn report(err: &ChatError) {
    match err {
        ChatError::EmptySubmission => {}
        ChatError::UnknownLanguage(id) => {
            println!("Unknown language '{}'. Type /langs to list them.", id)
        }
        other => {
            tracing::error!(error = %other, "Command failed");
            eprintln!("error: {}", other);
        }
    }
}

/// Apply one parsed command. Returns `false` when the session should end.
fn dispatch(driver: &ChatDriver, catalog: &LanguageCatalog, command: Command) -> bool {
    let result: Result<(), ChatError> = match command {
        Command::Submit(text) => driver.submit(&text).map(drop),
        Command::Quick(label) => driver.quick_action(&label).map(drop),
        Command::Toggle => driver.toggle_widget().map(|state| println!("  widget: {:?}", state)),
        Command::Minimize => driver.minimize().map(|state| println!("  widget: {:?}", state)),
        Command::Panel => driver.toggle_language_panel().map(|open| {
            if open {
                print_languages(driver, catalog);
            }
        }),
        Command::Language(id) => driver.select_language(&id).map(drop),
        Command::Languages => {
            print_languages(driver, catalog);
            Ok(())
        }
        Command::Actions => driver
            .inspect(|s| {
                s.quick_actions()
                    .iter()
                    .map(|qa| format!("{} -> {}", qa.label, qa.intent))
                    .collect::<Vec<_>>()
            })
            .map(|lines| lines.iter().for_each(|l| println!("  {}", l))),
        Command::Status => driver.snapshot().map(|snap| {
            println!(
                "  state={:?} language={} panel={} unread={} typing={} messages={}",
                snap.state,
                snap.language,
                snap.language_panel_open,
                snap.unread,
                snap.typing,
                snap.message_count
            )
        }),
        Command::History => driver.messages().map(|messages| {
            for message in &messages {
                println!("{}", format_message(catalog, message));
            }
        }),
        Command::Help => {
            println!("{}", HELP);
            Ok(())
        }
        Command::Unknown(name) => {
            println!("Unknown command '/{}'. Type /help for the list.", name);
            Ok(())
        }
        Command::Quit => return false,
    };

    if let Err(e) = result {
        report(&e);
    }
    true
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = SikkimConfig::load_or_default(&config_file);
    config.chat.default_language = args.resolve_language(&config.chat.default_language);

    // Tracing goes to stderr so it never interleaves with the transcript.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Sikkim travel assistant v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    let driver = ChatDriver::from_config(config.chat)?;
    let catalog = driver.inspect(|s| Arc::clone(s.catalog()))?;
    tracing::info!(
        languages = catalog.languages().len(),
        intents = catalog.intents().len(),
        "Language catalog ready"
    );

    let renderer = tokio::spawn(render_loop(driver.clone(), Arc::clone(&catalog), driver.subscribe()));

    if args.no_welcome {
        tracing::debug!("Welcome sequence disabled");
    } else {
        driver.start();
    }

    println!("Type /help for commands, /toggle to open the chat.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(&line) else {
            continue;
        };
        if !dispatch(&driver, &catalog, command) {
            break;
        }
    }

    let goodbye = driver.inspect(|s| s.language_entry().greetings.goodbye.clone())?;
    println!("{}", goodbye);

    renderer.abort();
    tracing::info!("Session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_uses_localized_bot_name() {
        let catalog = LanguageCatalog::builtin();
        let message = ConversationMessage::new(Role::Assistant, "नमस्ते", "hindi");
        let line = format_message(&catalog, &message);
        assert!(line.contains("सिक्किम यात्रा सहायक: नमस्ते"));
        assert!(line.starts_with('['));
    }

    #[test]
    fn test_format_message_user() {
        let catalog = LanguageCatalog::builtin();
        let message = ConversationMessage::new(Role::User, "permit", "english");
        assert!(format_message(&catalog, &message).ends_with("You: permit"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_quit_and_continue() {
        let driver = ChatDriver::new(LanguageCatalog::builtin(), Default::default()).unwrap();
        let catalog = LanguageCatalog::builtin();
        assert!(dispatch(&driver, &catalog, Command::Toggle));
        assert!(dispatch(&driver, &catalog, Command::Language("klingon".into())));
        assert!(dispatch(&driver, &catalog, Command::Language("nepali".into())));
        assert_eq!(driver.snapshot().unwrap().language, "nepali");
        assert!(!dispatch(&driver, &catalog, Command::Quit));
    }
}
