// Events that flow from the send task back to the TUI event loop
//
// The network call runs on a spawned tokio task; its outcome is posted back
// onto the single-threaded event loop as a SessionEvent over an mpsc channel.
// The busy flag is raised synchronously before the task is spawned and only
// cleared when the loop processes one of these events, so no other mutation
// interleaves with an exchange.

use crate::client::ChatReply;

/// Outcome of one chat exchange.
///
/// The epoch tags the session generation the exchange belonged to; the
/// conversation drops settlements from superseded sessions (see
/// `Conversation::reset`).
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The backend answered
    Reply { epoch: u64, reply: ChatReply },

    /// The exchange failed: non-success status or transport failure.
    /// `message` is the raw error text; the conversation maps it to what
    /// the user sees.
    Failed { epoch: u64, message: String },
}
