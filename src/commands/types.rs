use crate::store::{CompactAction, Timestamp};

/// A parsed `gossip` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Report mentions for a conversation, optionally flipping them to read.
    Read {
        key: String,
        action: CompactAction,
        cutoff: Option<Timestamp>,
    },
    /// Drop mentions at or before the cutoff.
    Delete {
        key: String,
        cutoff: Option<Timestamp>,
    },
    Pending,
    Keys,
    Toggle {
        target: Toggle,
        enabled: bool,
    },
    Help,
}

/// Which kind of traffic a toggle controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Toggle {
    Mentions,
    Pms,
}

pub const HELP: &str = "\
read <key> [r|ru|ra] [cutoff]  -- show mentions (default ru: unread, then mark read)
delete <key> [cutoff]          -- delete mentions at or before cutoff (default now)
pending                        -- conversations with unread mentions
keys                           -- conversations with a mention log
mentions on|off                -- log channel highlights
pms on|off                     -- log private messages
help                           -- show this help message
cutoff: YYYY-MM-DD-HH-MM-SS or YYYY-MM-DD";
