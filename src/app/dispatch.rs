use crate::app::status::render_status;
use crate::cli::{Cli, Commands, ToggleState, ToggleTarget};
use anyhow::{Context, Result, bail};
use gossip::commands::Toggle;
use gossip::events::IrcLineSource;
use gossip::plugin::{self, Gossip};
use gossip::prefs::JsonFilePreferenceStore;
use gossip::{CompactAction, Config, Timestamp};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use tracing::info;

fn parse_cutoff(raw: Option<&str>) -> Result<Option<Timestamp>> {
    raw.map(|raw| {
        raw.parse::<Timestamp>()
            .with_context(|| format!("invalid cutoff `{raw}`"))
    })
    .transpose()
}

fn print_lines(lines: &[String]) -> Result<()> {
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Run `tokens` through the same command grammar a chat host would use.
fn run_command(gossip: &mut Gossip, tokens: &[&str]) -> Result<()> {
    let lines = gossip.handle_command(tokens)?;
    print_lines(&lines)
}

fn run_watch(gossip: Gossip, nick: &str) -> Result<()> {
    let gossip = Rc::new(RefCell::new(gossip));
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    let mut source = IrcLineSource::new(stdin, stdout, nick);
    plugin::register(&mut source, &gossip);

    info!(nick, "watching stdin for IRC traffic");
    let stats = source.run()?;
    info!(
        events = stats.events,
        commands = stats.commands,
        ignored = stats.ignored,
        failed = stats.failed,
        "input closed"
    );
    Ok(())
}

pub fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let prefs_store = JsonFilePreferenceStore::new(config.preferences_path());
    let mut gossip = Gossip::new(
        config.open_store(),
        Box::new(prefs_store),
        config.default_preferences(),
    )?;

    match cli.command {
        Commands::Append { key, text } => {
            gossip.record(&key, &text, Timestamp::now())?;
            Ok(())
        }

        Commands::Read {
            key,
            action,
            cutoff,
        } => {
            let mut tokens = vec!["read", key.as_str(), action.as_str()];
            tokens.extend(cutoff.as_deref());
            run_command(&mut gossip, &tokens)
        }

        Commands::Compact {
            key,
            action,
            cutoff,
        } => {
            let action: CompactAction = action
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown action `{action}`, expected d, r, ru or ra"))?;
            let cutoff = parse_cutoff(cutoff.as_deref())?;
            let outcome = if action == CompactAction::Delete {
                gossip.delete(&key, cutoff)?
            } else {
                gossip.read(&key, action, cutoff)?
            };
            print_lines(&outcome.reported)?;
            info!(
                retained = outcome.retained,
                dropped = outcome.dropped,
                marked_read = outcome.marked_read,
                skipped_corrupt = outcome.skipped_corrupt,
                "compaction finished"
            );
            Ok(())
        }

        Commands::Delete { key, cutoff } => {
            let mut tokens = vec!["delete", key.as_str()];
            tokens.extend(cutoff.as_deref());
            run_command(&mut gossip, &tokens)
        }

        Commands::Show { key } => {
            let lines: Vec<String> = gossip
                .store()
                .read(&key)?
                .into_iter()
                .map(|record| {
                    let flag = if record.read { "read" } else { "unread" };
                    format!("{} [{flag}] {}", record.timestamp, record.text)
                })
                .collect();
            print_lines(&lines)
        }

        Commands::Pending => run_command(&mut gossip, &["pending"]),

        Commands::Keys => run_command(&mut gossip, &["keys"]),

        Commands::Status => {
            println!("{}", render_status(&config, gossip.preferences()));
            Ok(())
        }

        Commands::Toggle { target, state } => {
            let target = match target {
                ToggleTarget::Mentions => Toggle::Mentions,
                ToggleTarget::Pms => Toggle::Pms,
            };
            let enabled = state == ToggleState::On;
            gossip.set_toggle(target, enabled)?;
            println!("{target} logging {}", if enabled { "on" } else { "off" });
            Ok(())
        }

        Commands::Watch { nick } => {
            let Some(nick) = nick.or_else(|| config.nick.clone()) else {
                bail!("no nick configured; pass --nick or set `nick` in config.toml");
            };
            run_watch(gossip, &nick)
        }
    }
}
