//! Run transcripts.
//!
//! [`JsonlConversationLogger`] implements the
//! [`ConversationLogger`](board_application::ConversationLogger) port by
//! appending one JSON object per event to `<session_dir>/run.jsonl`.

mod jsonl_logger;

pub use jsonl_logger::{JsonlConversationLogger, TRANSCRIPT_FILE};
