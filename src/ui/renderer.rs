use crate::core::app::App;
use crate::utils::scroll::ScrollCalculator;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub(crate) const INPUT_AREA_HEIGHT: u16 = 3;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;

/// Shown in the transcript pane while the transcript is empty. Render-only:
/// never a transcript entry, never sent to the provider.
const WELCOME_MESSAGE: &str = "A forgotten Echo, I am the Shadow Scribe. Speak your truths, \
and I shall weave them into the fabric of this world's dark legacy.";

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(INPUT_AREA_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(f.area());

    let lines = if app.transcript.is_empty() {
        vec![
            Line::from(Span::styled(
                WELCOME_MESSAGE,
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
        ]
    } else {
        app.build_display_lines()
    };

    // Account for the title row, then clamp the scroll offset into range.
    let available_height = chunks[0].height.saturating_sub(1);
    let total_wrapped_lines = ScrollCalculator::calculate_wrapped_line_count(&lines, chunks[0].width);
    let max_offset = if total_wrapped_lines > available_height {
        total_wrapped_lines.saturating_sub(available_height)
    } else {
        0
    };
    let scroll_offset = app.scroll_offset.min(max_offset);

    let title = format!(
        "Scrive v{} - {} ({}) • Logging: {}",
        env!("CARGO_PKG_VERSION"),
        app.config.name,
        app.session.model(),
        app.get_logging_status()
    );

    let messages_paragraph = Paragraph::new(lines)
        .block(Block::default().title(title))
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));

    f.render_widget(messages_paragraph, chunks[0]);

    let input_style = if app.input_enabled() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input_title = if app.input_enabled() {
        "Type your message (Enter to send, /help for help, Ctrl+C to quit)"
    } else {
        "Waiting for reply... (Ctrl+C to quit)"
    };

    let input_text = if app.input_enabled() {
        app.input.clone()
    } else {
        thinking_indicator_line(app, chunks[1].width)
    };

    let input = Paragraph::new(input_text)
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Reset))
                .title(input_title),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(input, chunks[1]);

    let status = Paragraph::new(app.status.as_str()).style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, chunks[2]);

    if app.input_enabled() {
        let max_cursor_pos = chunks[1].width.saturating_sub(2);
        let cursor_x = (app.input.width() as u16 + 1).min(max_cursor_pos);
        f.set_cursor_position((chunks[1].x + cursor_x, chunks[1].y + 1));
    }
}

/// Pulsing indicator rendered in the disabled input box while a reply is in
/// flight, pinned one cell from the right border.
fn thinking_indicator_line(app: &App, input_area_width: u16) -> String {
    let elapsed = app.pulse_start.elapsed().as_millis() as f32 / 1000.0;
    let pulse_phase = (elapsed * 2.0) % 2.0;
    let pulse_intensity = if pulse_phase < 1.0 {
        pulse_phase
    } else {
        2.0 - pulse_phase
    };

    let symbol = if pulse_intensity < 0.33 {
        '○'
    } else if pulse_intensity < 0.66 {
        '◐'
    } else {
        '●'
    };

    let inner_width = input_area_width.saturating_sub(2) as usize;
    let mut result = vec![' '; inner_width];
    if inner_width > 1 {
        result[inner_width - 2] = symbol;
    }
    result.into_iter().collect()
}
