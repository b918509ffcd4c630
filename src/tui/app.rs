// TUI application state
//
// Owns the conversation, the draft input, and the UI flags, and bridges the
// event loop to the async send task. Redraws are driven by the conversation's
// change listener: every state mutation raises a flag the loop checks before
// drawing.

use super::input::InputState;
use super::scroll::ScrollState;
use super::theme::Theme;
use crate::client::ApiClient;
use crate::conversation::Conversation;
use crate::events::SessionEvent;
use crate::logging::LogBuffer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Braille spinner shown on the busy indicator row
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main application state for the TUI
pub struct App {
    /// Conversation state (turns, busy gate, reasoning trace, session id)
    pub conversation: Conversation,

    /// Draft input line
    pub input: InputState,

    /// Whether the reasoning panel is visible when a trace exists
    pub show_reasoning: bool,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Scroll state for the transcript panel
    pub transcript_scroll: ScrollState,

    /// Active color theme
    pub theme: Theme,

    /// Captured system logs for the logs strip
    pub log_buffer: LogBuffer,

    /// Current spinner frame index
    spinner_frame: usize,

    /// Raised by the conversation's change listener (and by input handling);
    /// the event loop draws when set
    redraw: Arc<AtomicBool>,

    client: ApiClient,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl App {
    pub fn new(
        client: ApiClient,
        event_tx: mpsc::Sender<SessionEvent>,
        log_buffer: LogBuffer,
        theme: Theme,
    ) -> Self {
        let redraw = Arc::new(AtomicBool::new(true));

        let mut conversation = Conversation::new();
        let flag = redraw.clone();
        conversation.set_on_change(Box::new(move || {
            flag.store(true, Ordering::Relaxed);
        }));

        Self {
            conversation,
            input: InputState::new(),
            show_reasoning: false,
            should_quit: false,
            transcript_scroll: ScrollState::new(),
            theme,
            log_buffer,
            spinner_frame: 0,
            redraw,
            client,
            event_tx,
        }
    }

    /// Consume the redraw flag. Returns true when a draw is due.
    pub fn take_redraw(&self) -> bool {
        self.redraw.swap(false, Ordering::Relaxed)
    }

    /// Raise the redraw flag (input handling, scrolling, toggles)
    pub fn request_redraw(&self) {
        self.redraw.store(true, Ordering::Relaxed);
    }

    /// Dispatch the current draft, if the conversation accepts it.
    ///
    /// `begin_send` raises the busy gate synchronously before the task is
    /// spawned; the gate drops only when the task's completion event is
    /// processed back on the event loop. The draft is cleared only when the
    /// send actually dispatches - a blocked send leaves the text in place.
    pub fn send_current(&mut self) {
        let Some(ticket) = self.conversation.begin_send(self.input.as_str()) else {
            return;
        };
        self.input.clear();
        self.transcript_scroll.auto_follow = true;

        let client = self.client.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match client
                .send_message(&ticket.message, ticket.conversation_id)
                .await
            {
                Ok(reply) => SessionEvent::Reply {
                    epoch: ticket.epoch,
                    reply,
                },
                Err(err) => SessionEvent::Failed {
                    epoch: ticket.epoch,
                    message: format!("{:#}", err),
                },
            };
            // Receiver only drops on shutdown; nothing left to deliver to
            let _ = tx.send(event).await;
        });
    }

    /// Apply a completion event from the send task
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Reply { epoch, reply } => {
                self.conversation.apply_reply(epoch, reply);
            }
            SessionEvent::Failed { epoch, message } => {
                tracing::warn!("chat request failed: {}", message);
                self.conversation.apply_failure(epoch, &message);
            }
        }
    }

    /// Start a new conversation. An in-flight request is not cancelled; its
    /// late result is discarded by the conversation's epoch check.
    pub fn new_conversation(&mut self) {
        self.conversation.reset();
        self.transcript_scroll.auto_follow = true;
    }

    pub fn toggle_reasoning(&mut self) {
        self.show_reasoning = !self.show_reasoning;
        self.request_redraw();
    }

    /// Advance the spinner while a request is outstanding
    pub fn tick_animation(&mut self) {
        if self.conversation.is_busy() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
            self.request_redraw();
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatReply;

    fn test_app() -> App {
        let (tx, _rx) = mpsc::channel(16);
        App::new(
            ApiClient::new("http://127.0.0.1:3000", "test-user".to_string()),
            tx,
            LogBuffer::new(),
            Theme::dark(),
        )
    }

    #[tokio::test]
    async fn send_clears_draft_only_on_dispatch() {
        let mut app = test_app();

        // Blank draft: nothing dispatched, nothing cleared
        app.send_current();
        assert!(app.conversation.turns().is_empty());

        for c in "hello".chars() {
            app.input.insert_char(c);
        }
        app.send_current();
        assert!(app.input.is_empty());
        assert!(app.conversation.is_busy());

        // Busy: the new draft survives the blocked send
        app.input.insert_char('x');
        app.send_current();
        assert_eq!(app.input.as_str(), "x");
        assert_eq!(app.conversation.turns().len(), 1);
    }

    #[tokio::test]
    async fn completion_event_settles_the_exchange() {
        let mut app = test_app();
        for c in "hi".chars() {
            app.input.insert_char(c);
        }
        app.send_current();
        let epoch = app.conversation.epoch();

        app.handle_session_event(SessionEvent::Reply {
            epoch,
            reply: ChatReply {
                response: "hello!".to_string(),
                conversation_id: Some("abc123".to_string()),
                reasoning_steps: None,
            },
        });

        assert!(!app.conversation.is_busy());
        assert_eq!(app.conversation.turns().len(), 2);
        assert_eq!(app.conversation.conversation_id(), Some("abc123"));
    }

    #[tokio::test]
    async fn redraw_flag_follows_mutations() {
        let mut app = test_app();
        assert!(app.take_redraw()); // initial draw
        assert!(!app.take_redraw());

        for c in "hey".chars() {
            app.input.insert_char(c);
        }
        app.send_current();
        assert!(app.take_redraw());
    }
}
