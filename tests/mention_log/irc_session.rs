use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use gossip::events::IrcLineSource;
use gossip::plugin::{self, Gossip};
use gossip::prefs::{JsonFilePreferenceStore, PreferenceStore, Preferences};
use gossip::{CorruptPolicy, MentionLogStore};

#[test]
fn watch_session_logs_reads_and_persists_pending() {
    let dir = tempfile::tempdir().unwrap();
    let prefs_path = dir.path().join("prefs.json");
    let store = MentionLogStore::new(dir.path().join("hlogs"), CorruptPolicy::Abort);
    let gossip = Gossip::new(
        store,
        Box::new(JsonFilePreferenceStore::new(&prefs_path)),
        Preferences::default(),
    )
    .unwrap();
    let gossip = Rc::new(RefCell::new(gossip));

    let input = concat!(
        ":bob!b@host PRIVMSG #rust :mika: ping\r\n",
        ":carol!c@host PRIVMSG mika :psst\r\n",
        ":dave!d@host PRIVMSG #rust :unrelated chatter\r\n",
        "/gossip pending\n",
    );
    let mut output = Vec::new();
    let mut source = IrcLineSource::new(Cursor::new(input), &mut output, "mika");
    plugin::register(&mut source, &gossip);
    let stats = source.run().unwrap();
    drop(source);

    assert_eq!(stats.commands, 1);
    assert_eq!(stats.failed, 0);
    let printed = String::from_utf8(output).unwrap();
    assert_eq!(printed, "unread mentions in: #rust, carol\n");

    let reloaded = JsonFilePreferenceStore::new(&prefs_path);
    let saved = reloaded.load().unwrap().unwrap();
    assert!(saved.pending.contains("#rust"));
    assert!(saved.pending.contains("carol"));

    let keys = gossip.borrow().store().keys().unwrap();
    assert_eq!(keys, vec!["#rust", "carol"]);
}
