#[path = "support/log_harness.rs"]
mod log_harness;

#[path = "mention_log/compaction_properties.rs"]
mod compaction_properties;
#[path = "mention_log/conversation_scenarios.rs"]
mod conversation_scenarios;
#[path = "mention_log/irc_session.rs"]
mod irc_session;
