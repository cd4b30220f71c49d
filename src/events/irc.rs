use super::{ChatEvent, EventKind};

/// A parsed IRC message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMessage {
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
}

impl IrcMessage {
    /// Parse a raw IRC line: `[:<prefix>] <command> [<params>] [:<trailing>]`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']);
        let prefix = match rest.strip_prefix(':') {
            Some(tagged) => {
                let (prefix, tail) = tagged.split_once(' ')?;
                rest = tail;
                Some(prefix.to_string())
            }
            None => None,
        };

        let (middle, trailing) = match rest.split_once(" :") {
            Some((middle, trailing)) => (middle, Some(trailing)),
            None => (rest, None),
        };

        let mut words = middle.split_whitespace();
        let command = words.next()?.to_ascii_uppercase();
        let params = words.chain(trailing).map(str::to_string).collect();
        Some(Self {
            prefix,
            command,
            params,
        })
    }

    /// Sender nick: the prefix up to `!` or `@`. Server prefixes have neither
    /// and come back whole.
    pub fn nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        let nick = prefix.split(['!', '@']).next().unwrap_or_default();
        (!nick.is_empty()).then_some(nick)
    }

    /// Turn a `PRIVMSG` into a chat event as seen by `own_nick`.
    pub fn to_chat_event(&self, own_nick: &str) -> Option<ChatEvent> {
        if self.command != "PRIVMSG" {
            return None;
        }
        let actor = self.nick()?;
        let target = self.params.first()?;
        let text = self.params.get(1).map_or("", String::as_str);

        let kind = if target.eq_ignore_ascii_case(own_nick) {
            EventKind::PrivateMessage
        } else if is_channel(target) && mentions_nick(text, own_nick) {
            EventKind::Highlight
        } else if is_channel(target) {
            EventKind::ChannelMessage
        } else {
            return None;
        };

        Some(ChatEvent::new(actor, target, text, kind))
    }
}

fn is_channel(target: &str) -> bool {
    target.starts_with(['#', '&', '+', '!'])
}

/// Case-insensitive match of `nick` as a whole word in `text`.
pub fn mentions_nick(text: &str, nick: &str) -> bool {
    if nick.is_empty() {
        return false;
    }
    let is_nick_char = |c: char| c.is_alphanumeric() || "-_[]\\`^{}|".contains(c);
    text.split(|c: char| !is_nick_char(c))
        .any(|word| word.eq_ignore_ascii_case(nick))
}
