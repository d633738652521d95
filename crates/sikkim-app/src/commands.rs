//! Parsing of terminal input lines into widget events.

/// A single line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text for the assistant.
    Submit(String),
    Toggle,
    Minimize,
    Panel,
    Language(String),
    Languages,
    Quick(String),
    Actions,
    Status,
    History,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  /toggle          open or close the chat widget
  /min             minimize or restore the widget
  /panel           show or hide the language panel
  /lang <id>       switch language
  /langs           list languages
  /quick <label>   press a quick-action button
  /actions         list quick actions
  /status          show widget state
  /history         print the conversation
  /quit            exit
Anything else is sent to the assistant.";

/// Parse a line. Returns `None` for blank input.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::Submit(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let cmd = match (name, arg.is_empty()) {
        ("toggle" | "open" | "close", _) => Command::Toggle,
        ("min" | "minimize", _) => Command::Minimize,
        ("panel", _) => Command::Panel,
        ("lang" | "language", false) => Command::Language(arg.to_string()),
        ("lang" | "language" | "langs" | "languages", _) => Command::Languages,
        ("quick" | "q", false) => Command::Quick(arg.to_string()),
        ("quick" | "q" | "actions", _) => Command::Actions,
        ("status", _) => Command::Status,
        ("history", _) => Command::History,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        _ => Command::Unknown(name.to_string()),
    };
    Some(cmd)
}
