use std::path::PathBuf;
use std::time::Instant;

use ratatui::text::Line;

use crate::core::config::Config;
use crate::core::message::Message;
use crate::core::session::{SendError, SessionManager};
use crate::core::transcript::Transcript;
use crate::utils::logging::LoggingState;
use crate::utils::scroll::ScrollCalculator;

pub const STATUS_READY: &str = "Ready";
pub const STATUS_THINKING: &str = "Thinking...";

/// Where the one outbound exchange currently is.
///
/// The phase guard is the mutual-exclusion mechanism: while a message is in
/// flight the input affordance is disabled, so a second send can never start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    Idle,
    Sending,
    AwaitingReply,
}

/// Top-level application state: settings, session manager, transcript, and
/// the input/scroll/status fields the renderer reads.
///
/// Single-writer rule: the UI task owns this struct exclusively. Worker
/// tasks receive owned snapshots and report back over the reply channel;
/// they never touch `App`.
pub struct App {
    pub config: Config,
    pub session: SessionManager,
    pub transcript: Transcript,
    pub logging: LoggingState,
    pub input: String,
    pub status: String,
    pub phase: ExchangePhase,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub pulse_start: Instant,
    pub exit_requested: bool,
    pending_user: Option<String>,
    config_path: PathBuf,
}

impl App {
    pub fn new(config: Config, session: SessionManager, logging: LoggingState) -> Self {
        Self {
            config,
            session,
            transcript: Transcript::new(),
            logging,
            input: String::new(),
            status: STATUS_READY.to_string(),
            phase: ExchangePhase::Idle,
            scroll_offset: 0,
            auto_scroll: true,
            pulse_start: Instant::now(),
            exit_requested: false,
            pending_user: None,
            config_path: Config::config_path(),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_config_path_for_test(&mut self, path: PathBuf) {
        self.config_path = path;
    }

    pub fn input_enabled(&self) -> bool {
        self.phase == ExchangePhase::Idle
    }

    pub fn set_status<S: Into<String>>(&mut self, status: S) {
        self.status = status.into();
    }

    /// `Idle -> Sending`: accept one outbound message.
    ///
    /// Returns the trimmed text to dispatch, appending it to the transcript
    /// immediately. Whitespace-only input and input arriving outside `Idle`
    /// are no-ops: transcript and session state stay unchanged.
    pub fn begin_exchange(&mut self, text: &str) -> Option<String> {
        if self.phase != ExchangePhase::Idle {
            return None;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let outbound = trimmed.to_string();

        if let Err(e) = self.logging.log_message(&format!("You: {outbound}")) {
            tracing::warn!("failed to log message: {e}");
        }

        self.transcript.append(Message::user(outbound.clone()));
        self.pending_user = Some(outbound.clone());
        self.phase = ExchangePhase::Sending;
        self.pulse_start = Instant::now();
        self.auto_scroll = true;
        self.set_status(STATUS_THINKING);
        Some(outbound)
    }

    /// `Sending -> AwaitingReply`: the worker task has been spawned.
    pub fn mark_awaiting_reply(&mut self) {
        if self.phase == ExchangePhase::Sending {
            self.phase = ExchangePhase::AwaitingReply;
        }
    }

    /// `-> Idle`: the reply event arrived.
    ///
    /// A success is recorded into the session context and appended as a bot
    /// entry. A failure is downgraded to its in-band text and appended the
    /// same way; the session context is left unchanged. Either way the input
    /// affordance is re-enabled.
    pub fn finish_exchange(&mut self, result: Result<String, SendError>) {
        let user_text = self.pending_user.take();
        let reply = match result {
            Ok(reply) => {
                if let Some(user_text) = user_text {
                    self.session.record_exchange(&user_text, &reply);
                }
                reply
            }
            Err(err) => err.in_band_text(),
        };

        if let Err(e) = self.logging.log_message(&reply) {
            tracing::warn!("failed to log response: {e}");
        }

        self.transcript.append(Message::bot(reply));
        self.phase = ExchangePhase::Idle;
        self.set_status(STATUS_READY);
    }

    /// Empty the transcript and seed a fresh session, together: a cleared
    /// transcript never coexists with a stale provider context.
    pub fn clear_conversation(&mut self) {
        self.transcript.clear();
        self.session.reset_session();
        self.scroll_offset = 0;
        self.auto_scroll = true;
    }

    /// Append a client-authored notice (command feedback, help text).
    pub fn add_app_message(&mut self, content: impl Into<String>) {
        self.transcript.append(Message::app(content));
        self.auto_scroll = true;
    }

    pub fn set_bot_name(&mut self, name: &str) {
        self.config.name = name.to_string();
        self.persist_config();
    }

    /// Replace the persona instructions and reseed the session, so the edit
    /// applies to future exchanges only.
    pub fn set_persona(&mut self, persona: &str) {
        self.config.persona = persona.to_string();
        self.session.set_persona(persona.to_string());
        self.session.reset_session();
        self.persist_config();
    }

    /// Save failures are logged to the diagnostic stream and otherwise
    /// ignored; settings keep their in-memory values.
    pub fn persist_config(&self) {
        if let Err(e) = self.config.save_to_path(&self.config_path) {
            tracing::warn!("could not save config: {e}");
        }
    }

    pub fn build_display_lines(&self) -> Vec<Line<'static>> {
        ScrollCalculator::build_display_lines(self.transcript.entries(), &self.config.name)
    }

    pub fn calculate_wrapped_line_count(&self, terminal_width: u16) -> u16 {
        let lines = self.build_display_lines();
        ScrollCalculator::calculate_wrapped_line_count(&lines, terminal_width)
    }

    pub fn calculate_max_scroll_offset(&self, available_height: u16, terminal_width: u16) -> u16 {
        ScrollCalculator::calculate_max_scroll_offset(
            self.transcript.entries(),
            &self.config.name,
            terminal_width,
            available_height,
        )
    }

    /// Auto-scroll to the bottom when new content arrives, unless the user
    /// has scrolled away.
    pub fn update_scroll_position(&mut self, available_height: u16, terminal_width: u16) {
        if self.auto_scroll {
            let total_wrapped_lines = self.calculate_wrapped_line_count(terminal_width);
            if total_wrapped_lines > available_height {
                self.scroll_offset = total_wrapped_lines.saturating_sub(available_height);
            } else {
                self.scroll_offset = 0;
            }
        }
    }

    pub fn get_logging_status(&self) -> String {
        self.logging.get_status_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::TranscriptRole;
    use crate::utils::test_utils::{create_connected_test_app, create_test_app};

    #[test]
    fn whitespace_only_input_is_a_no_op() {
        let mut app = create_connected_test_app();
        let before_turns = app.session.session().unwrap().turns().len();

        for input in ["", "   ", "\t", " \n "] {
            assert!(app.begin_exchange(input).is_none());
        }

        assert_eq!(app.transcript.len(), 0);
        assert_eq!(app.phase, ExchangePhase::Idle);
        assert_eq!(app.session.session().unwrap().turns().len(), before_turns);
    }

    #[test]
    fn begin_exchange_appends_user_entry_and_disables_input() {
        let mut app = create_connected_test_app();
        let outbound = app.begin_exchange("  hello  ").unwrap();

        assert_eq!(outbound, "hello");
        assert_eq!(app.transcript.len(), 1);
        let entry = app.transcript.last().unwrap();
        assert_eq!(entry.role, TranscriptRole::User);
        assert_eq!(entry.content, "hello");
        assert_eq!(app.phase, ExchangePhase::Sending);
        assert!(!app.input_enabled());
        assert_eq!(app.status, STATUS_THINKING);
    }

    #[test]
    fn no_second_exchange_while_one_is_in_flight() {
        let mut app = create_connected_test_app();
        app.begin_exchange("first").unwrap();
        app.mark_awaiting_reply();

        assert!(app.begin_exchange("second").is_none());
        assert_eq!(app.transcript.len(), 1);
    }

    #[test]
    fn successful_exchange_grows_transcript_by_two_in_order() {
        let mut app = create_connected_test_app();
        app.begin_exchange("hello").unwrap();
        app.mark_awaiting_reply();
        app.finish_exchange(Ok("Hi there.".to_string()));

        assert_eq!(app.transcript.len(), 2);
        let entries: Vec<_> = app.transcript.entries().iter().collect();
        assert_eq!(entries[0].role, TranscriptRole::User);
        assert_eq!(entries[0].content, "hello");
        assert_eq!(entries[1].role, TranscriptRole::Bot);
        assert_eq!(entries[1].content, "Hi there.");
        assert_eq!(app.phase, ExchangePhase::Idle);
        assert!(app.input_enabled());
        assert_eq!(app.status, STATUS_READY);
    }

    #[test]
    fn successful_exchange_is_recorded_into_the_session() {
        let mut app = create_connected_test_app();
        app.begin_exchange("hello").unwrap();
        app.finish_exchange(Ok("Hi there.".to_string()));

        let turns = app.session.session().unwrap().turns();
        assert_eq!(turns.len(), 4); // seed pair + recorded exchange
        assert_eq!(turns[2].content, "hello");
        assert_eq!(turns[3].content, "Hi there.");
    }

    #[test]
    fn failed_exchange_appends_in_band_error_and_reenables_input() {
        let mut app = create_connected_test_app();
        app.begin_exchange("hello").unwrap();
        app.mark_awaiting_reply();
        app.finish_exchange(Err(SendError::Api {
            message: "timeout".to_string(),
        }));

        assert_eq!(app.transcript.len(), 2);
        let entry = app.transcript.last().unwrap();
        assert_eq!(entry.role, TranscriptRole::Bot);
        assert_eq!(entry.content, "Error getting response: timeout");
        assert!(app.input_enabled());

        // The failed call is not part of the provider context.
        assert_eq!(app.session.session().unwrap().turns().len(), 2);
    }

    #[test]
    fn unauthenticated_exchange_reports_in_band_notice() {
        let mut app = create_test_app();
        app.begin_exchange("hello").unwrap();
        let err = app.session.prepare_send("hello").unwrap_err();
        app.finish_exchange(Err(err));

        assert_eq!(app.transcript.len(), 2);
        assert!(app
            .transcript
            .last()
            .unwrap()
            .content
            .starts_with("Error: not connected"));
        assert!(app.input_enabled());
    }

    #[test]
    fn clear_conversation_pairs_transcript_clear_with_session_reset() {
        let mut app = create_connected_test_app();
        app.begin_exchange("hello").unwrap();
        app.finish_exchange(Ok("Hi there.".to_string()));

        app.clear_conversation();

        assert!(app.transcript.is_empty());
        assert_eq!(app.session.session().unwrap().turns().len(), 2);
    }

    #[test]
    fn clear_on_fresh_app_is_equivalent_to_initial_state() {
        let mut app = create_connected_test_app();
        app.clear_conversation();
        app.session.reset_session();

        assert!(app.transcript.is_empty());
        assert_eq!(app.session.session().unwrap().turns().len(), 2);
        assert_eq!(app.phase, ExchangePhase::Idle);
    }

    #[test]
    fn app_messages_do_not_reach_the_session_context() {
        let mut app = create_connected_test_app();
        app.add_app_message("Conversation cleared");

        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.session.session().unwrap().turns().len(), 2);
    }
}
