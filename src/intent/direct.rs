use super::types::{Action, VolumeMode, DEFAULT_VOLUME};

pub const VOLUME_USAGE: &str = "Uso: !vol up|down [0-100] | !vol set <0-100>";

/// Result of parsing the `!`-prefixed shortcut syntax of the text driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectCommand {
    Action(Action),
    /// Recognized prefix, malformed arguments.
    Usage(&'static str),
}

/// `!exec <cmd>`, `!open <path>`, `!vol ...`, `!sendmail`.
/// Returns `None` for anything else so the text goes to the classifier.
pub fn parse_direct(text: &str) -> Option<DirectCommand> {
    let text = text.trim();
    let rest = text.strip_prefix('!')?;
    let (verb, args) = match rest.split_once(char::is_whitespace) {
        Some((verb, args)) => (verb, args.trim()),
        None => (rest, ""),
    };

    let cmd = match verb.to_lowercase().as_str() {
        "exec" if !args.is_empty() => DirectCommand::Action(Action::Exec {
            command: args.to_string(),
        }),
        "open" if !args.is_empty() => DirectCommand::Action(Action::Open {
            path: args.to_string(),
        }),
        "sendmail" => DirectCommand::Action(Action::SendMail),
        "vol" => parse_volume_args(args),
        _ => return None,
    };
    Some(cmd)
}

fn parse_volume_args(args: &str) -> DirectCommand {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let value = parts.get(1).map(|v| v.parse::<i64>());

    let action = match (parts.first().copied(), value, parts.len()) {
        (Some("up"), None, 1) => Action::volume(VolumeMode::Up, i64::from(DEFAULT_VOLUME)),
        (Some("down"), None, 1) => Action::volume(VolumeMode::Down, i64::from(DEFAULT_VOLUME)),
        (Some("up"), Some(Ok(v)), 2) => Action::volume(VolumeMode::Up, v),
        (Some("down"), Some(Ok(v)), 2) => Action::volume(VolumeMode::Down, v),
        (Some("set"), Some(Ok(v)), 2) => Action::volume(VolumeMode::Set, v),
        _ => return DirectCommand::Usage(VOLUME_USAGE),
    };
    DirectCommand::Action(action)
}
