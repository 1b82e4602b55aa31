use crate::core::message::{Message, TranscriptRole};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::collections::VecDeque;

/// Handles transcript line building and scroll-related calculations.
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Build display lines for all transcript entries. `bot_name` is the
    /// configured display name used to prefix bot replies.
    pub fn build_display_lines(messages: &VecDeque<Message>, bot_name: &str) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for msg in messages {
            Self::add_message_lines(&mut lines, msg, bot_name);
        }

        lines
    }

    fn add_message_lines(lines: &mut Vec<Line<'static>>, msg: &Message, bot_name: &str) {
        match msg.role {
            TranscriptRole::User => {
                lines.push(Line::from(vec![
                    Span::styled(
                        "You: ",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(msg.content.clone(), Style::default().fg(Color::Cyan)),
                ]));
                lines.push(Line::from(""));
            }
            TranscriptRole::App => {
                for content_line in msg.content.lines() {
                    lines.push(Line::from(Span::styled(
                        content_line.to_string(),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                lines.push(Line::from(""));
            }
            TranscriptRole::Bot => {
                if msg.content.is_empty() {
                    return;
                }
                // Name prefix on the first line, continuation lines bare.
                let mut content_lines = msg.content.lines();
                if let Some(first) = content_lines.next() {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("{bot_name}: "),
                            Style::default()
                                .fg(Color::Magenta)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(first.to_string(), Style::default().fg(Color::White)),
                    ]));
                }
                for content_line in content_lines {
                    if content_line.trim().is_empty() {
                        lines.push(Line::from(""));
                    } else {
                        lines.push(Line::from(Span::styled(
                            content_line.to_string(),
                            Style::default().fg(Color::White),
                        )));
                    }
                }
                lines.push(Line::from(""));
            }
        }
    }

    /// Calculate how many wrapped lines the given lines will take
    pub fn calculate_wrapped_line_count(lines: &[Line], terminal_width: u16) -> u16 {
        let mut total_wrapped_lines = 0u16;

        for line in lines {
            let line_text = line.to_string();
            // Trim whitespace to match ratatui's Wrap { trim: true } behavior
            let trimmed_text = line_text.trim();

            if trimmed_text.is_empty() || terminal_width == 0 {
                total_wrapped_lines = total_wrapped_lines.saturating_add(1);
            } else {
                let wrapped_count = Self::calculate_word_wrapped_lines(trimmed_text, terminal_width);
                total_wrapped_lines = total_wrapped_lines.saturating_add(wrapped_count);
            }
        }

        total_wrapped_lines
    }

    /// Calculate how many lines a single text string will wrap to
    fn calculate_word_wrapped_lines(text: &str, terminal_width: u16) -> u16 {
        let mut current_line_len = 0;
        let mut line_count = 1u16;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();

            // Start new line if adding this word would exceed width
            if current_line_len > 0 && current_line_len + 1 + word_len > terminal_width as usize {
                line_count = line_count.saturating_add(1);
                current_line_len = word_len;
            } else {
                if current_line_len > 0 {
                    current_line_len += 1; // Add space
                }
                current_line_len += word_len;
            }
        }

        line_count
    }

    /// Calculate scroll offset to show the bottom of all messages
    pub fn calculate_scroll_to_bottom(
        messages: &VecDeque<Message>,
        bot_name: &str,
        terminal_width: u16,
        available_height: u16,
    ) -> u16 {
        let lines = Self::build_display_lines(messages, bot_name);
        let total_wrapped_lines = Self::calculate_wrapped_line_count(&lines, terminal_width);

        if total_wrapped_lines > available_height {
            total_wrapped_lines.saturating_sub(available_height)
        } else {
            0
        }
    }

    /// Calculate maximum scroll offset
    pub fn calculate_max_scroll_offset(
        messages: &VecDeque<Message>,
        bot_name: &str,
        terminal_width: u16,
        available_height: u16,
    ) -> u16 {
        Self::calculate_scroll_to_bottom(messages, bot_name, terminal_width, available_height)
    }
}
