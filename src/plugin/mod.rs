//! The mention logger itself: reacts to chat events and command invocations,
//! backed by a [`MentionLogStore`] and a [`PreferenceStore`].

use crate::commands::{Command, HELP, Toggle, parse_command};
use crate::error::Result;
use crate::events::{ChatEvent, EventKind, EventSource};
use crate::prefs::{PreferenceStore, Preferences};
use crate::store::{CompactAction, CompactOutcome, MentionLogStore, Timestamp};
use std::cell::RefCell;
use std::rc::Rc;

/// What [`Gossip::handle_event`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Appended to the log for this conversation key.
    Logged(String),
    /// Not something we log, or logging is switched off.
    Ignored,
    /// Locally emitted event, never acted on.
    Suppressed,
}

pub struct Gossip {
    store: MentionLogStore,
    prefs_store: Box<dyn PreferenceStore>,
    prefs: Preferences,
}

impl Gossip {
    /// Load preferences from `prefs_store`, falling back to `defaults` when
    /// nothing has been saved yet.
    pub fn new(
        store: MentionLogStore,
        prefs_store: Box<dyn PreferenceStore>,
        defaults: Preferences,
    ) -> Result<Self> {
        let prefs = prefs_store.load()?.unwrap_or(defaults);
        Ok(Self {
            store,
            prefs_store,
            prefs,
        })
    }

    pub fn store(&self) -> &MentionLogStore {
        &self.store
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Log highlights and private messages, subject to the toggles.
    pub fn handle_event(&mut self, event: &ChatEvent, now: Timestamp) -> Result<EventOutcome> {
        if event.is_synthetic() {
            return Ok(EventOutcome::Suppressed);
        }

        let enabled = match event.kind {
            EventKind::Highlight => self.prefs.mentions_enabled,
            EventKind::PrivateMessage => self.prefs.pms_enabled,
            EventKind::ChannelMessage => false,
        };
        if !enabled {
            return Ok(EventOutcome::Ignored);
        }

        let key = event.conversation_key();
        self.record(key, &event.render(), now)?;
        tracing::debug!(key, kind = %event.kind, "logged mention");
        Ok(EventOutcome::Logged(key.to_string()))
    }

    /// Append `text` to the log for `key` and flag the key as pending.
    pub fn record(&mut self, key: &str, text: &str, now: Timestamp) -> Result<()> {
        self.store.append(key, text, now)?;
        if self.prefs.pending.insert(key) {
            self.save_prefs()?;
        }
        Ok(())
    }

    /// Parse and run a tokenized command line, returning lines to display.
    pub fn handle_command<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<Vec<String>> {
        let command = parse_command(tokens)?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: Command) -> Result<Vec<String>> {
        match command {
            Command::Read {
                key,
                action,
                cutoff,
            } => {
                let outcome = self.read(&key, action, cutoff)?;
                if outcome.reported.is_empty() {
                    return Ok(vec![format!("no mentions in {key}")]);
                }
                Ok(outcome.reported)
            }
            Command::Delete { key, cutoff } => {
                let outcome = self.delete(&key, cutoff)?;
                Ok(vec![format!(
                    "deleted {} mention(s) from {key}",
                    outcome.dropped
                )])
            }
            Command::Pending => Ok(vec![self.prefs.pending.summary()]),
            Command::Keys => {
                let keys = self.store.keys()?;
                if keys.is_empty() {
                    return Ok(vec!["no mention logs".to_string()]);
                }
                Ok(keys)
            }
            Command::Toggle { target, enabled } => {
                self.set_toggle(target, enabled)?;
                let state = if enabled { "on" } else { "off" };
                Ok(vec![format!("{target} logging {state}")])
            }
            Command::Help => Ok(HELP.lines().map(str::to_string).collect()),
        }
    }

    /// Report mentions for `key`; the pending flag clears once nothing unread
    /// is left in its log.
    pub fn read(
        &mut self,
        key: &str,
        action: CompactAction,
        cutoff: Option<Timestamp>,
    ) -> Result<CompactOutcome> {
        let outcome = self.store.compact(key, action, cutoff)?;
        if action.reports() && outcome.all_read() && self.prefs.pending.remove(key) {
            self.save_prefs()?;
        }
        Ok(outcome)
    }

    /// Delete mentions for `key` at or before `cutoff`.
    pub fn delete(&mut self, key: &str, cutoff: Option<Timestamp>) -> Result<CompactOutcome> {
        let outcome = self.store.compact(key, CompactAction::Delete, cutoff)?;
        if outcome.all_read() && self.prefs.pending.remove(key) {
            self.save_prefs()?;
        }
        Ok(outcome)
    }

    pub fn set_toggle(&mut self, target: Toggle, enabled: bool) -> Result<()> {
        let slot = match target {
            Toggle::Mentions => &mut self.prefs.mentions_enabled,
            Toggle::Pms => &mut self.prefs.pms_enabled,
        };
        if *slot != enabled {
            *slot = enabled;
            self.save_prefs()?;
        }
        tracing::info!(%target, enabled, "toggle updated");
        Ok(())
    }

    fn save_prefs(&self) -> Result<()> {
        self.prefs_store.save(&self.prefs)?;
        Ok(())
    }
}

/// Register a shared [`Gossip`] with an event source: events are logged at
/// wall-clock time, commands are parsed and executed.
pub fn register<S: EventSource + ?Sized>(source: &mut S, gossip: &Rc<RefCell<Gossip>>) {
    let on_event = Rc::clone(gossip);
    source.on_event(Box::new(move |event: &ChatEvent| -> Result<()> {
        on_event
            .borrow_mut()
            .handle_event(event, Timestamp::now())
            .map(|_| ())
    }));

    let on_command = Rc::clone(gossip);
    source.on_command(Box::new(move |tokens: &[String]| -> Result<Vec<String>> {
        on_command.borrow_mut().handle_command(tokens)
    }));
}
