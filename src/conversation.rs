// Conversation state for a chat session
//
// This is the behavioral core of the client: an ordered, append-only list of
// turns plus the busy gate that allows exactly one outstanding request at a
// time. The TUI renders this state; the send task mutates it through the
// three operations below (send, settle, reset).
//
// Mutations notify a registered change listener so the event loop knows a
// redraw is needed without polling.

use crate::client::ChatReply;
use serde::Deserialize;

/// Fixed message shown when the backend demands authentication.
/// Selected by substring match on the raw error text (see `friendly_error`).
pub const AUTH_REQUIRED_MESSAGE: &str =
    "Authentication Required\n\nPlease log in first before using the AI agent.";

/// Fixed message shown when the backend cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network Error\n\nCould not connect to the server. Check if the backend is running.";

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single conversational turn. Immutable once appended; the sequence is
/// only ever replaced wholesale by `reset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One step of the agent's reasoning trace, as reported by the backend.
/// Both fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReasoningStep {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
}

/// Everything the send task needs to perform one exchange.
/// Captured synchronously by `begin_send`, before the request is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    /// The message text, verbatim as typed
    pub message: String,
    /// Session identifier held at dispatch time (None on the first turn)
    pub conversation_id: Option<String>,
    /// Session generation this exchange belongs to (see `reset`)
    pub epoch: u64,
}

/// Conversation state container.
///
/// Invariants:
/// - `busy` is true for the entire span between `begin_send` and the matching
///   `apply_reply`/`apply_failure`; a second send while busy is a no-op.
/// - `conversation_id` is adopted at most once per session (first-write-wins)
///   and only cleared by `reset`.
/// - Every state mutation fires the change listener exactly once; rejected
///   operations (blank draft, send-while-busy) fire nothing.
pub struct Conversation {
    turns: Vec<Turn>,
    reasoning: Vec<ReasoningStep>,
    conversation_id: Option<String>,
    busy: bool,
    epoch: u64,
    on_change: Option<Box<dyn FnMut() + Send>>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            reasoning: Vec::new(),
            conversation_id: None,
            busy: false,
            epoch: 0,
            on_change: None,
        }
    }

    /// Register the change listener. The TUI uses this to raise its
    /// redraw flag; tests use it to count notifications.
    pub fn set_on_change(&mut self, listener: Box<dyn FnMut() + Send>) {
        self.on_change = Some(listener);
    }

    fn touch(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener();
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn reasoning(&self) -> &[ReasoningStep] {
        &self.reasoning
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start one exchange.
    ///
    /// Returns `None` (and changes nothing) when the draft is blank or a
    /// request is already outstanding. Otherwise appends the user turn,
    /// raises the busy gate, and hands back the ticket for the send task.
    pub fn begin_send(&mut self, draft: &str) -> Option<SendTicket> {
        if self.busy || draft.trim().is_empty() {
            return None;
        }

        self.turns.push(Turn::user(draft));
        self.busy = true;
        self.touch();

        Some(SendTicket {
            message: draft.to_string(),
            conversation_id: self.conversation_id.clone(),
            epoch: self.epoch,
        })
    }

    /// Settle an exchange that succeeded.
    ///
    /// Appends the assistant turn, replaces the reasoning trace (empty when
    /// the backend sent none), and adopts the conversation id if none is held
    /// yet. A reply from a superseded session (stale epoch, i.e. the user hit
    /// "new chat" while the request was in flight) only clears the busy gate;
    /// its content is discarded.
    pub fn apply_reply(&mut self, epoch: u64, reply: ChatReply) {
        self.busy = false;

        if epoch == self.epoch {
            self.turns.push(Turn::assistant(reply.response));
            self.reasoning = reply.reasoning_steps.unwrap_or_default();

            if self.conversation_id.is_none() {
                self.conversation_id = reply.conversation_id;
            }
        } else {
            tracing::debug!(epoch, current = self.epoch, "dropping stale reply");
        }

        self.touch();
    }

    /// Settle an exchange that failed (non-success status or transport
    /// error). The error is rendered as a regular assistant turn so the user
    /// can read it in place and simply try again. Stale epochs are handled
    /// like in `apply_reply`.
    pub fn apply_failure(&mut self, epoch: u64, error_text: &str) {
        self.busy = false;

        if epoch == self.epoch {
            self.turns.push(Turn::assistant(friendly_error(error_text)));
        } else {
            tracing::debug!(epoch, current = self.epoch, "dropping stale failure");
        }

        self.touch();
    }

    /// Start a fresh session: drop all turns, the reasoning trace, and the
    /// conversation id. Does not cancel an in-flight request - the busy gate
    /// stays up until that request settles, and its late result is discarded
    /// via the epoch bump.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.reasoning.clear();
        self.conversation_id = None;
        self.epoch += 1;
        self.touch();
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a raw error text to what the user sees.
///
/// The substring matches are case-sensitive and deliberate: "log in" is the
/// marker the backend puts in authentication errors, "Failed to fetch" is the
/// marker our client puts on transport failures. Anything else is surfaced
/// verbatim.
pub fn friendly_error(raw: &str) -> String {
    if raw.contains("log in") {
        AUTH_REQUIRED_MESSAGE.to_string()
    } else if raw.contains("Failed to fetch") {
        NETWORK_ERROR_MESSAGE.to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn reply(text: &str) -> ChatReply {
        ChatReply {
            response: text.to_string(),
            conversation_id: None,
            reasoning_steps: None,
        }
    }

    #[test]
    fn send_appends_user_turn_and_raises_busy() {
        let mut convo = Conversation::new();

        let ticket = convo.begin_send("hello").expect("send should start");

        assert_eq!(convo.turns(), &[Turn::user("hello")]);
        assert!(convo.is_busy());
        assert_eq!(ticket.message, "hello");
        assert_eq!(ticket.conversation_id, None);
    }

    #[test]
    fn reply_appends_assistant_turn_and_clears_busy() {
        let mut convo = Conversation::new();
        let ticket = convo.begin_send("hello").unwrap();

        convo.apply_reply(ticket.epoch, reply("hi there"));

        assert_eq!(
            convo.turns(),
            &[Turn::user("hello"), Turn::assistant("hi there")]
        );
        assert!(!convo.is_busy());
    }

    #[test]
    fn blank_or_whitespace_draft_is_a_noop() {
        let mut convo = Conversation::new();

        assert!(convo.begin_send("").is_none());
        assert!(convo.begin_send("   \t\n").is_none());
        assert!(convo.turns().is_empty());
        assert!(!convo.is_busy());
    }

    #[test]
    fn send_while_busy_is_a_noop() {
        let mut convo = Conversation::new();
        convo.begin_send("first").unwrap();

        assert!(convo.begin_send("second").is_none());
        assert_eq!(convo.turns().len(), 1);
        assert!(convo.is_busy());
    }

    #[test]
    fn conversation_id_is_adopted_once() {
        let mut convo = Conversation::new();

        let t1 = convo.begin_send("one").unwrap();
        convo.apply_reply(
            t1.epoch,
            ChatReply {
                response: "a".to_string(),
                conversation_id: Some("abc123".to_string()),
                reasoning_steps: None,
            },
        );
        assert_eq!(convo.conversation_id(), Some("abc123"));

        // A later response carrying a different id must not overwrite
        let t2 = convo.begin_send("two").unwrap();
        assert_eq!(t2.conversation_id.as_deref(), Some("abc123"));
        convo.apply_reply(
            t2.epoch,
            ChatReply {
                response: "b".to_string(),
                conversation_id: Some("other".to_string()),
                reasoning_steps: None,
            },
        );
        assert_eq!(convo.conversation_id(), Some("abc123"));
    }

    #[test]
    fn reasoning_trace_replaced_wholesale_per_reply() {
        let mut convo = Conversation::new();

        let t1 = convo.begin_send("one").unwrap();
        convo.apply_reply(
            t1.epoch,
            ChatReply {
                response: "a".to_string(),
                conversation_id: None,
                reasoning_steps: Some(vec![ReasoningStep {
                    kind: Some("retrieval".to_string()),
                    status: Some("success".to_string()),
                }]),
            },
        );
        assert_eq!(convo.reasoning().len(), 1);

        // Next reply without steps clears the trace
        let t2 = convo.begin_send("two").unwrap();
        convo.apply_reply(t2.epoch, reply("b"));
        assert!(convo.reasoning().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut convo = Conversation::new();
        let t = convo.begin_send("hello").unwrap();
        convo.apply_reply(
            t.epoch,
            ChatReply {
                response: "hi".to_string(),
                conversation_id: Some("abc123".to_string()),
                reasoning_steps: Some(vec![ReasoningStep::default()]),
            },
        );

        convo.reset();

        assert!(convo.turns().is_empty());
        assert!(convo.reasoning().is_empty());
        assert_eq!(convo.conversation_id(), None);
    }

    #[test]
    fn reset_does_not_clear_busy_but_discards_late_reply() {
        let mut convo = Conversation::new();
        let ticket = convo.begin_send("hello").unwrap();

        convo.reset();
        // The request is still in flight: next send stays blocked
        assert!(convo.is_busy());
        assert!(convo.begin_send("too soon").is_none());

        // Late settlement from the cleared session: content discarded,
        // busy gate released
        convo.apply_reply(ticket.epoch, reply("late answer"));
        assert!(convo.turns().is_empty());
        assert_eq!(convo.conversation_id(), None);
        assert!(!convo.is_busy());

        // And sends work again
        assert!(convo.begin_send("fresh start").is_some());
    }

    #[test]
    fn stale_failure_is_discarded_too() {
        let mut convo = Conversation::new();
        let ticket = convo.begin_send("hello").unwrap();

        convo.reset();
        convo.apply_failure(ticket.epoch, "connection refused");

        assert!(convo.turns().is_empty());
        assert!(!convo.is_busy());
    }

    #[test]
    fn auth_error_substitutes_fixed_message() {
        let mut convo = Conversation::new();
        let ticket = convo.begin_send("hello").unwrap();

        convo.apply_failure(ticket.epoch, "log in required");

        assert_eq!(convo.turns()[1].content, AUTH_REQUIRED_MESSAGE);
        assert!(!convo.is_busy());
    }

    #[test]
    fn friendly_error_substring_policy() {
        assert_eq!(friendly_error("log in required"), AUTH_REQUIRED_MESSAGE);
        assert_eq!(
            friendly_error("Failed to fetch: connection refused"),
            NETWORK_ERROR_MESSAGE
        );
        // Anything else passes through verbatim
        assert_eq!(friendly_error("internal error"), "internal error");
        // Matching is case-sensitive
        assert_eq!(friendly_error("Log In required"), "Log In required");
        assert_eq!(friendly_error("failed to fetch"), "failed to fetch");
    }

    #[test]
    fn full_exchange_scenario() {
        let mut convo = Conversation::new();

        let ticket = convo
            .begin_send("I've been feeling tired lately")
            .expect("idle + non-blank draft must dispatch");
        assert_eq!(ticket.message, "I've been feeling tired lately");
        assert_eq!(ticket.conversation_id, None);

        convo.apply_reply(
            ticket.epoch,
            ChatReply {
                response: "Try resting more.".to_string(),
                conversation_id: Some("abc123".to_string()),
                reasoning_steps: None,
            },
        );

        assert_eq!(
            convo.turns(),
            &[
                Turn::user("I've been feeling tired lately"),
                Turn::assistant("Try resting more."),
            ]
        );
        assert_eq!(convo.conversation_id(), Some("abc123"));
        assert!(!convo.is_busy());
    }

    #[test]
    fn listener_fires_on_mutations_only() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut convo = Conversation::new();
        let counter = count.clone();
        convo.set_on_change(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        // Rejected sends fire nothing
        convo.begin_send("");
        assert_eq!(count.load(Ordering::SeqCst), 0);

        let ticket = convo.begin_send("hello").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        convo.begin_send("blocked while busy");
        assert_eq!(count.load(Ordering::SeqCst), 1);

        convo.apply_reply(ticket.epoch, reply("hi"));
        assert_eq!(count.load(Ordering::SeqCst), 2);

        convo.reset();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
