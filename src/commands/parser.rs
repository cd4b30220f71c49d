use super::types::{Command, Toggle};
use crate::error::CommandError;
use crate::store::{CompactAction, Timestamp};

const READ_USAGE: &str = "read <key> [r|ru|ra] [cutoff]";
const DELETE_USAGE: &str = "delete <key> [cutoff]";
const TOGGLE_USAGE: &str = "mentions|pms on|off";

/// Parse a command line the host has already split into tokens.
pub fn parse_command<S: AsRef<str>>(tokens: &[S]) -> Result<Command, CommandError> {
    let tokens: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
    let (name, rest) = tokens.split_first().ok_or(CommandError::Empty)?;
    let name = name.to_lowercase();

    match name.as_str() {
        "read" | "r" => parse_read(rest),
        "delete" | "del" | "d" => parse_delete(rest),
        "pending" => Ok(Command::Pending),
        "keys" | "list" => Ok(Command::Keys),
        "mentions" => parse_toggle(Toggle::Mentions, rest),
        "pms" => parse_toggle(Toggle::Pms, rest),
        "help" | "?" => Ok(Command::Help),
        _ => Err(CommandError::Unknown(name)),
    }
}

fn parse_read(args: &[&str]) -> Result<Command, CommandError> {
    let (key, tail) = args.split_first().ok_or(CommandError::Usage(READ_USAGE))?;

    let (action, cutoff) = match tail {
        [] => (CompactAction::MarkReadAndReport, None),
        [one] => match one.parse::<CompactAction>() {
            Ok(action) => (action, None),
            Err(_) => (CompactAction::MarkReadAndReport, Some(parse_cutoff(one)?)),
        },
        [action, cutoff] => (parse_report_action(action)?, Some(parse_cutoff(cutoff)?)),
        _ => return Err(CommandError::Usage(READ_USAGE)),
    };

    if !action.reports() {
        return Err(CommandError::InvalidArgument {
            what: "read action",
            value: action.to_string(),
        });
    }

    Ok(Command::Read {
        key: (*key).to_string(),
        action,
        cutoff,
    })
}

fn parse_delete(args: &[&str]) -> Result<Command, CommandError> {
    match args {
        [key] => Ok(Command::Delete {
            key: (*key).to_string(),
            cutoff: None,
        }),
        [key, cutoff] => Ok(Command::Delete {
            key: (*key).to_string(),
            cutoff: Some(parse_cutoff(cutoff)?),
        }),
        _ => Err(CommandError::Usage(DELETE_USAGE)),
    }
}

fn parse_toggle(target: Toggle, args: &[&str]) -> Result<Command, CommandError> {
    let [state] = args else {
        return Err(CommandError::Usage(TOGGLE_USAGE));
    };
    let enabled = match state.to_lowercase().as_str() {
        "on" | "true" | "1" => true,
        "off" | "false" | "0" => false,
        _ => {
            return Err(CommandError::InvalidArgument {
                what: "toggle state",
                value: (*state).to_string(),
            });
        }
    };
    Ok(Command::Toggle { target, enabled })
}

fn parse_report_action(raw: &str) -> Result<CompactAction, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidArgument {
        what: "read action",
        value: raw.to_string(),
    })
}

fn parse_cutoff(raw: &str) -> Result<Timestamp, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidArgument {
        what: "cutoff",
        value: raw.to_string(),
    })
}
