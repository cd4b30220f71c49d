use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// `gossip` - IRC mention logger.
#[derive(Parser, Debug)]
#[command(name = "gossip")]
#[command(author = "Mika Wu")]
#[command(version = "0.1.0")]
#[command(about = "Stores highlights and private messages for later reading.", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.gossip/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append a mention to a conversation's log
    Append {
        /// Channel name or nick
        key: String,
        /// Rendered message, e.g. "<nick> text"
        text: String,
    },

    /// Show mentions for a conversation (default: unread, then mark read)
    Read {
        key: String,

        /// r = unread only, ru = unread then mark read, ra = everything
        #[arg(short, long, default_value = "ru")]
        action: String,

        /// Only records at or before this time (YYYY-MM-DD[-HH-MM-SS])
        #[arg(long)]
        cutoff: Option<String>,
    },

    /// Run one compaction pass with any action (d, r, ru, ra)
    Compact {
        key: String,

        #[arg(short, long)]
        action: String,

        #[arg(long)]
        cutoff: Option<String>,
    },

    /// Delete mentions at or before the cutoff (default: everything)
    Delete {
        key: String,

        #[arg(long)]
        cutoff: Option<String>,
    },

    /// Print every stored record without touching read flags
    Show { key: String },

    /// List conversations with unread mentions
    Pending,

    /// List conversations that have a mention log
    Keys,

    /// Show resolved paths, toggles and pending conversations
    Status,

    /// Switch logging of highlights or private messages on or off
    Toggle {
        #[arg(value_enum)]
        target: ToggleTarget,
        #[arg(value_enum)]
        state: ToggleState,
    },

    /// Read raw IRC lines from stdin, logging highlights and private messages.
    /// Lines starting with `/gossip` are run as commands.
    Watch {
        /// Our nick (overrides config)
        #[arg(long)]
        nick: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToggleTarget {
    Mentions,
    Pms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToggleState {
    On,
    Off,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn read_defaults_to_ru() {
        let cli = Cli::parse_from(["gossip", "read", "#rust"]);
        match cli.command {
            Commands::Read { key, action, cutoff } => {
                assert_eq!(key, "#rust");
                assert_eq!(action, "ru");
                assert!(cutoff.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["gossip", "pending", "--verbose", "--config", "/tmp/c.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn toggle_parses_value_enums() {
        let cli = Cli::parse_from(["gossip", "toggle", "pms", "off"]);
        assert!(matches!(
            cli.command,
            Commands::Toggle {
                target: ToggleTarget::Pms,
                state: ToggleState::Off
            }
        ));
    }
}
