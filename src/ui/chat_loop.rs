//! Main chat event loop.
//!
//! The UI task owns the [`App`] state and drives three things from one loop:
//! drawing frames, routing terminal events, and draining reply events from
//! worker tasks. Exactly one outbound message is in flight at a time; the
//! exchange phase guard in [`App`] enforces that by disabling input until
//! the reply event lands.

use std::{error::Error, io, time::Duration};

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::commands::{process_input, CommandResult};
use crate::core::app::App;
use crate::core::config::Config;
use crate::core::session::{SendError, SessionManager};
use crate::ui::renderer::{ui, INPUT_AREA_HEIGHT, STATUS_BAR_HEIGHT};
use crate::utils::logging::LoggingState;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// One worker task sends exactly one reply event, so the channel never holds
/// more than one message in practice; the bound is slack, not backpressure.
const REPLY_CHANNEL_CAPACITY: usize = 8;

type ReplyEvent = Result<String, SendError>;

pub async fn run_chat(
    model_override: Option<String>,
    log_file: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load();
    if let Some(model) = model_override {
        config.model = model;
    }

    let mut session = SessionManager::new(
        config.base_url.clone(),
        config.model.clone(),
        config.persona.clone(),
    );

    if let Some(credential) = config.api_key.clone() {
        if let Err(e) = session.authenticate(&credential).await {
            eprintln!("⚠️  Stored API key was rejected: {e}");
            eprintln!("   Use /key <api-key> inside the chat, or run 'scrive auth'.");
        }
    } else {
        eprintln!("No API key configured. Run 'scrive auth', or use /key inside the chat.");
    }

    eprintln!("🚀 Starting Scrive - Terminal Persona Chat");
    eprintln!("📡 Using model: {}", config.model);
    eprintln!("🌐 API endpoint: {}", config.base_url);
    if let Some(ref log_path) = log_file {
        eprintln!("📝 Logging to: {log_path}");
    }
    eprintln!("💡 Press Ctrl+C to quit, Enter to send messages");

    let logging = LoggingState::new(log_file)?;
    let mut app = App::new(config, session, logging);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).inspect_err(|_| {
        let _ = disable_raw_mode();
    })?;

    let result = run_event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<(), Box<dyn Error>> {
    let (reply_tx, mut reply_rx) = mpsc::channel::<ReplyEvent>(REPLY_CHANNEL_CAPACITY);

    loop {
        terminal.draw(|f| ui(f, app))?;

        if app.exit_requested {
            return Ok(());
        }

        let viewport = transcript_viewport(terminal);

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(app, key, viewport, &reply_tx).await? {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(app, mouse, viewport),
                _ => {}
            }
        }

        // Drain reply events. At most one is ever outstanding, but draining
        // in a loop keeps the channel empty if that invariant ever changes.
        while let Ok(result) = reply_rx.try_recv() {
            app.finish_exchange(result);
            app.update_scroll_position(viewport.1, viewport.0);
        }
    }
}

/// Returns true when the user asked to quit.
async fn handle_key_event(
    app: &mut App,
    key: KeyEvent,
    viewport: (u16, u16),
    reply_tx: &mpsc::Sender<ReplyEvent>,
) -> Result<bool, Box<dyn Error>> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Ok(true);
        }
        KeyCode::Enter if app.input_enabled() => {
            let raw = app.input.clone();
            if raw.trim().is_empty() {
                return Ok(false);
            }
            app.input.clear();

            match process_input(app, &raw) {
                CommandResult::Continue => {}
                CommandResult::Quit => app.exit_requested = true,
                CommandResult::NewConversation => {
                    app.clear_conversation();
                    app.set_status("Conversation cleared");
                }
                CommandResult::Authenticate(credential) => {
                    authenticate_credential(app, &credential).await;
                }
                CommandResult::ProcessAsMessage(text) => {
                    dispatch_message(app, &text, viewport, reply_tx);
                }
            }
        }
        KeyCode::Char(c)
            if app.input_enabled() && !key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.input.push(c)
        }
        KeyCode::Backspace if app.input_enabled() => {
            app.input.pop();
        }
        KeyCode::Up => scroll_by(app, -1, viewport),
        KeyCode::Down => scroll_by(app, 1, viewport),
        KeyCode::PageUp => scroll_by(app, -(viewport.1 as i32), viewport),
        KeyCode::PageDown => scroll_by(app, viewport.1 as i32, viewport),
        _ => {}
    }
    Ok(false)
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent, viewport: (u16, u16)) {
    match mouse.kind {
        MouseEventKind::ScrollUp => scroll_by(app, -3, viewport),
        MouseEventKind::ScrollDown => scroll_by(app, 3, viewport),
        _ => {}
    }
}

/// Manual scrolling disables auto-scroll; reaching the bottom re-enables it.
fn scroll_by(app: &mut App, delta: i32, viewport: (u16, u16)) {
    let (width, height) = viewport;
    let max_scroll = app.calculate_max_scroll_offset(height, width);

    if delta < 0 {
        app.auto_scroll = false;
        app.scroll_offset = app.scroll_offset.saturating_sub(delta.unsigned_abs() as u16);
    } else {
        app.scroll_offset = app
            .scroll_offset
            .saturating_add(delta as u16)
            .min(max_scroll);
        if app.scroll_offset >= max_scroll {
            app.auto_scroll = true;
        }
    }
}

/// `Sending -> AwaitingReply`: snapshot the exchange and hand it to a worker
/// task. The worker performs one blocking provider call and reports back
/// over the reply channel; it never touches `App`.
fn dispatch_message(
    app: &mut App,
    text: &str,
    viewport: (u16, u16),
    reply_tx: &mpsc::Sender<ReplyEvent>,
) {
    let Some(outbound) = app.begin_exchange(text) else {
        return;
    };
    app.update_scroll_position(viewport.1, viewport.0);

    match app.session.prepare_send(&outbound) {
        Ok(request) => {
            app.mark_awaiting_reply();
            let tx = reply_tx.clone();
            tokio::spawn(async move {
                let result = request.dispatch().await;
                // The receiver only disappears when the loop is shutting down.
                let _ = tx.send(result).await;
            });
        }
        Err(err) => {
            // No live session: resolve the exchange immediately with the
            // in-band notice, through the same path a reply would take.
            app.finish_exchange(Err(err));
            app.update_scroll_position(viewport.1, viewport.0);
        }
    }
}

/// The `/key` flow: validate, then persist and start a fresh conversation.
/// On failure nothing changes and the error lands in the status line.
async fn authenticate_credential(app: &mut App, credential: &str) {
    match app.session.authenticate(credential).await {
        Ok(()) => {
            app.config.api_key = Some(credential.to_string());
            app.persist_config();
            app.clear_conversation();
            app.set_status("API key verified; new conversation started");
        }
        Err(e) => {
            app.set_status(format!("Authentication failed: {e}"));
        }
    }
}

/// Width and height of the transcript viewport: the full terminal minus the
/// input box, the status bar, and the title row.
fn transcript_viewport(terminal: &Tui) -> (u16, u16) {
    let size = terminal.size().unwrap_or_default();
    let height = size
        .height
        .saturating_sub(INPUT_AREA_HEIGHT + STATUS_BAR_HEIGHT)
        .saturating_sub(1);
    (size.width, height)
}
