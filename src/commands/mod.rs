//! Slash-command parsing for the chat loop.
//!
//! Commands cover the settings surface (name, persona, credential) and
//! conversation lifecycle (new conversation, logging, quit). Anything that
//! does not start with `/` is an ordinary outbound message.

use crate::core::app::App;
use crate::core::config::{path_display, Config};

pub enum CommandResult {
    /// Command handled; nothing else to do.
    Continue,
    /// Not a command: forward as an outbound message.
    ProcessAsMessage(String),
    /// Clear the transcript and reseed the session.
    NewConversation,
    /// Run the (network-touching) authentication flow with this credential.
    Authenticate(String),
    /// Leave the chat loop.
    Quit,
}

const HELP_TEXT: &str = "Commands:
  /help             Show this help
  /new              Start a new conversation (clears transcript and context)
  /name <name>      Set the bot display name
  /persona <text>   Set the persona instructions (applies to new messages)
  /key <api-key>    Set and verify the API credential
  /log [filename]   Enable logging to file, or toggle pause/resume
  /quit             Exit";

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let rest = parts.next().map(str::trim).unwrap_or("");

    match command {
        "/help" => {
            app.add_app_message(format!(
                "{HELP_TEXT}\n\nSettings file: {}",
                path_display(Config::config_path())
            ));
            CommandResult::Continue
        }
        "/new" | "/clear" => CommandResult::NewConversation,
        "/name" => {
            if rest.is_empty() {
                app.add_app_message("Usage: /name <display name>");
            } else {
                app.set_bot_name(rest);
                app.set_status("Settings saved");
            }
            CommandResult::Continue
        }
        "/persona" => {
            if rest.is_empty() {
                app.add_app_message("Usage: /persona <instructions>");
            } else {
                app.set_persona(rest);
                app.set_status("Persona updated; applies to new messages");
            }
            CommandResult::Continue
        }
        "/key" => {
            if rest.is_empty() {
                app.add_app_message("Usage: /key <api-key>");
                CommandResult::Continue
            } else {
                CommandResult::Authenticate(rest.to_string())
            }
        }
        "/log" => {
            let result = if rest.is_empty() {
                app.logging.toggle_logging()
            } else {
                app.logging.set_log_file(rest.to_string())
            };
            match result {
                Ok(message) => app.add_app_message(message),
                Err(e) => app.add_app_message(format!("Error: {e}")),
            }
            CommandResult::Continue
        }
        "/quit" | "/exit" => CommandResult::Quit,
        _ => {
            app.add_app_message(format!("Unknown command: {command} (try /help)"));
            CommandResult::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::TranscriptRole;
    use crate::utils::test_utils::create_connected_test_app;

    #[test]
    fn plain_text_falls_through_as_message() {
        let mut app = create_connected_test_app();
        match process_input(&mut app, "hello there") {
            CommandResult::ProcessAsMessage(text) => assert_eq!(text, "hello there"),
            _ => panic!("expected ProcessAsMessage"),
        }
        assert_eq!(app.transcript.len(), 0);
    }

    #[test]
    fn new_and_clear_request_a_fresh_conversation() {
        let mut app = create_connected_test_app();
        assert!(matches!(
            process_input(&mut app, "/new"),
            CommandResult::NewConversation
        ));
        assert!(matches!(
            process_input(&mut app, "/clear"),
            CommandResult::NewConversation
        ));
    }

    #[test]
    fn name_command_updates_config() {
        let mut app = create_connected_test_app();
        process_input(&mut app, "/name Night Archivist");
        assert_eq!(app.config.name, "Night Archivist");
    }

    #[test]
    fn name_without_argument_prints_usage() {
        let mut app = create_connected_test_app();
        process_input(&mut app, "/name");
        let entry = app.transcript.last().unwrap();
        assert_eq!(entry.role, TranscriptRole::App);
        assert!(entry.content.starts_with("Usage:"));
    }

    #[test]
    fn persona_command_reseeds_the_session() {
        let mut app = create_connected_test_app();
        process_input(&mut app, "/persona Answer in one sentence.");

        assert_eq!(app.config.persona, "Answer in one sentence.");
        assert_eq!(
            app.session.session().unwrap().turns()[0].content,
            "Answer in one sentence."
        );
    }

    #[test]
    fn key_command_routes_to_authentication() {
        let mut app = create_connected_test_app();
        match process_input(&mut app, "/key sk-new") {
            CommandResult::Authenticate(credential) => assert_eq!(credential, "sk-new"),
            _ => panic!("expected Authenticate"),
        }
    }

    #[test]
    fn unknown_slash_command_yields_a_notice() {
        let mut app = create_connected_test_app();
        assert!(matches!(
            process_input(&mut app, "/frobnicate"),
            CommandResult::Continue
        ));
        let entry = app.transcript.last().unwrap();
        assert!(entry.content.starts_with("Unknown command: /frobnicate"));
    }

    #[test]
    fn quit_command_requests_exit() {
        let mut app = create_connected_test_app();
        assert!(matches!(process_input(&mut app, "/quit"), CommandResult::Quit));
    }
}
