pub mod compaction;
pub mod key;
pub mod log;
pub mod record;

pub use compaction::{CompactAction, CompactOutcome, CorruptPolicy};
pub use key::ConversationKey;
pub use log::MentionLogStore;
pub use record::{MentionRecord, Timestamp};
