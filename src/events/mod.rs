pub mod irc;
pub mod source;

pub use irc::IrcMessage;
pub use source::IrcLineSource;

use crate::error::Result;

/// What kind of chat traffic an event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    /// Ordinary channel traffic not addressed to us.
    ChannelMessage,
    /// Channel message that mentions our nick.
    Highlight,
    /// Message sent straight to us.
    PrivateMessage,
}

/// Where an event came from.
///
/// `Synthetic` marks anything printed or emitted locally; handlers must not
/// act on it, which keeps an emitted event from re-triggering the handler
/// that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventOrigin {
    #[default]
    Wire,
    Synthetic,
}

/// One chat event delivered by an [`EventSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    /// Nick of the sender.
    pub actor: String,
    /// Channel name, or our own nick for private messages.
    pub target: String,
    pub text: String,
    pub kind: EventKind,
    pub origin: EventOrigin,
}

impl ChatEvent {
    pub fn new(actor: &str, target: &str, text: &str, kind: EventKind) -> Self {
        Self {
            actor: actor.to_string(),
            target: target.to_string(),
            text: text.to_string(),
            kind,
            origin: EventOrigin::Wire,
        }
    }

    /// A locally emitted event that handlers will ignore.
    pub fn synthetic(actor: &str, target: &str, text: &str, kind: EventKind) -> Self {
        Self {
            origin: EventOrigin::Synthetic,
            ..Self::new(actor, target, text, kind)
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == EventOrigin::Synthetic
    }

    /// Conversation the event belongs to: the channel, or the sender for
    /// private messages.
    pub fn conversation_key(&self) -> &str {
        match self.kind {
            EventKind::PrivateMessage => &self.actor,
            EventKind::ChannelMessage | EventKind::Highlight => &self.target,
        }
    }

    /// `<nick> message`, the form stored in the mention log.
    pub fn render(&self) -> String {
        format!("<{}> {}", self.actor, self.text)
    }
}

pub type EventHandler = Box<dyn FnMut(&ChatEvent) -> Result<()>>;

/// Receives a tokenized command line, returns lines to show the user.
pub type CommandHandler = Box<dyn FnMut(&[String]) -> Result<Vec<String>>>;

/// Anything that delivers chat events and command invocations: an IRC
/// connection, a CLI loop, a test harness.
pub trait EventSource {
    fn on_event(&mut self, handler: EventHandler);

    fn on_command(&mut self, handler: CommandHandler);
}
