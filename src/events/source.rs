use super::{ChatEvent, CommandHandler, EventHandler, EventKind, EventSource, IrcMessage};
use crate::error::Result;
use anyhow::Context;
use std::borrow::Cow;
use std::io::{BufRead, Write};

/// Prefix marking a local command line rather than IRC traffic.
pub const COMMAND_PREFIX: &str = "/gossip";

/// Actor name on echoed command output.
const ECHO_ACTOR: &str = "gossip";

/// Counters from one [`IrcLineSource::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub events: usize,
    pub commands: usize,
    pub ignored: usize,
    pub failed: usize,
}

/// Event source over a stream of raw IRC lines.
///
/// Lines starting with `/gossip` are local command invocations: the rest of
/// the line is split on whitespace and handed to the command handlers. Their
/// output is written to `output` and echoed back to the event handlers as
/// synthetic events, the way a chat client prints into the buffer it hooks.
pub struct IrcLineSource<R, W> {
    input: R,
    output: W,
    own_nick: String,
    event_handlers: Vec<EventHandler>,
    command_handlers: Vec<CommandHandler>,
}

impl<R: BufRead, W: Write> IrcLineSource<R, W> {
    pub fn new(input: R, output: W, own_nick: &str) -> Self {
        Self {
            input,
            output,
            own_nick: own_nick.to_string(),
            event_handlers: Vec::new(),
            command_handlers: Vec::new(),
        }
    }

    /// Consume the input until EOF. Handler failures are logged and counted;
    /// only I/O on the streams themselves ends the loop early.
    /// Lines that are not valid UTF-8 are decoded lossily.
    pub fn run(&mut self) -> Result<LineStats> {
        let mut stats = LineStats::default();
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let read = self
                .input
                .read_until(b'\n', &mut raw)
                .context("failed reading input line")?;
            if read == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&raw);
            if matches!(line, Cow::Owned(_)) {
                tracing::debug!(bytes = raw.len(), "decoded non-UTF-8 input line lossily");
            }

            if let Some(rest) = strip_command_prefix(&line) {
                let tokens: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
                stats.commands += 1;
                self.dispatch_command(&tokens, &mut stats)?;
                continue;
            }

            let Some(event) =
                IrcMessage::parse(&line).and_then(|msg| msg.to_chat_event(&self.own_nick))
            else {
                stats.ignored += 1;
                continue;
            };
            stats.events += 1;
            self.dispatch_event(&event, &mut stats);
        }

        self.output.flush().context("failed flushing output")?;
        Ok(stats)
    }

    fn dispatch_event(&mut self, event: &ChatEvent, stats: &mut LineStats) {
        for handler in &mut self.event_handlers {
            if let Err(err) = handler(event) {
                stats.failed += 1;
                tracing::warn!(kind = %event.kind, target = %event.target, "event handler failed: {err}");
            }
        }
    }

    fn dispatch_command(&mut self, tokens: &[String], stats: &mut LineStats) -> Result<()> {
        let mut printed = Vec::new();
        for handler in &mut self.command_handlers {
            match handler(tokens) {
                Ok(lines) => printed.extend(lines),
                Err(err) => {
                    stats.failed += 1;
                    printed.push(format!("error: {err}"));
                }
            }
        }

        for text in printed {
            writeln!(self.output, "{text}").context("failed writing command output")?;
            let echo =
                ChatEvent::synthetic(ECHO_ACTOR, &self.own_nick, &text, EventKind::PrivateMessage);
            self.dispatch_event(&echo, stats);
        }
        Ok(())
    }
}

impl<R, W> EventSource for IrcLineSource<R, W> {
    fn on_event(&mut self, handler: EventHandler) {
        self.event_handlers.push(handler);
    }

    fn on_command(&mut self, handler: CommandHandler) {
        self.command_handlers.push(handler);
    }
}

fn strip_command_prefix(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(COMMAND_PREFIX)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}
