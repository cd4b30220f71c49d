#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod plugin;
pub mod prefs;
pub mod store;

pub use config::Config;
pub use error::{GossipError, Result};
pub use plugin::Gossip;
pub use store::{CompactAction, CompactOutcome, CorruptPolicy, MentionLogStore, Timestamp};
