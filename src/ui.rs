//! Terminal chat surface
//!
//! Presentation only: renders session snapshots and translates key presses
//! into session events. All conversation state lives in the runtime.

use crate::backend::EvaluationRecord;
use crate::runtime::SessionHandle;
use crate::state_machine::{Author, Event, SessionState};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

const HEADER_TITLE: &str = "🌙 Sleep & Soul Companion";
const HEADER_SUBTITLE: &str = "Emotion-focused CBT guidance for peaceful evenings";
const KEY_HINTS: &str = "Enter send · Alt+Enter newline · Ctrl+R reset · Ctrl+C quit";

/// Run the chat surface until the user quits.
pub async fn run(mut handle: SessionHandle) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut handle).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// Forward terminal key presses into the async loop. Raw-mode reads block,
/// so they live on their own thread.
fn spawn_input_thread() -> mpsc::Receiver<KeyEvent> {
    let (tx, rx) = mpsc::channel(32);
    std::thread::spawn(move || loop {
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => {
                if let Ok(TermEvent::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press && tx.blocking_send(key).is_err() {
                        break;
                    }
                }
            }
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
    rx
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: &mut SessionHandle,
) -> io::Result<()> {
    let mut keys = spawn_input_thread();
    // The draft is authoritative here and mirrored into the session via
    // DraftChanged events; snapshot echoes are never folded back, so a
    // late echo cannot clobber newer keystrokes.
    let mut draft = String::new();

    loop {
        let snapshot = handle.snapshot_rx.borrow().clone();
        terminal.draw(|frame| draw(frame, &snapshot, &draft))?;

        tokio::select! {
            changed = handle.snapshot_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            key = keys.recv() => {
                let Some(key) = key else { break };
                let busy = handle.snapshot_rx.borrow().awaiting_response();
                match on_key(key, busy, &mut draft) {
                    KeyAction::Quit => break,
                    KeyAction::Send(event) => {
                        if handle.event_tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    KeyAction::Submit => {
                        let text = std::mem::take(&mut draft);
                        let sent = handle.event_tx.send(Event::draft_changed(text)).await;
                        if sent.is_err()
                            || handle.event_tx.send(Event::submit_pressed()).await.is_err()
                        {
                            break;
                        }
                    }
                    KeyAction::None => {}
                }
            }
        }
    }

    Ok(())
}

enum KeyAction {
    None,
    Quit,
    Send(Event),
    Submit,
}

fn on_key(key: KeyEvent, busy: bool, draft: &mut String) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => KeyAction::Quit,
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        (KeyCode::Char('r'), m) if m.contains(KeyModifiers::CONTROL) => {
            KeyAction::Send(Event::reset_requested())
        }

        // Alt+Enter composes; plain Enter commits. (Shift+Enter is not
        // distinguishable from Enter in most terminals.)
        (KeyCode::Enter, m) if m.contains(KeyModifiers::ALT) => {
            draft.push('\n');
            KeyAction::Send(Event::draft_changed(draft.clone()))
        }
        // The single-flight and non-empty guards mirror the session's own
        // submit rules; this is the only event source, so an observed idle
        // phase cannot flip to sending before the submit lands.
        (KeyCode::Enter, _) => {
            if busy || draft.trim().is_empty() {
                KeyAction::None
            } else {
                KeyAction::Submit
            }
        }

        (KeyCode::Backspace, _) => {
            draft.pop();
            KeyAction::Send(Event::draft_changed(draft.clone()))
        }
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
            draft.push(c);
            KeyAction::Send(Event::draft_changed(draft.clone()))
        }

        _ => KeyAction::None,
    }
}

fn draw(frame: &mut Frame, state: &SessionState, draft: &str) {
    let [header_area, log_area, status_area, input_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(4),
    ])
    .areas(frame.area());

    draw_header(frame, header_area);
    draw_log(frame, log_area, state);
    draw_status(frame, status_area, state);
    draw_input(frame, input_area, draft);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            HEADER_TITLE,
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(HEADER_SUBTITLE, Style::default().dim())),
    ])
    .centered()
    .block(Block::bordered());
    frame.render_widget(header, area);
}

fn draw_log(frame: &mut Frame, area: Rect, state: &SessionState) {
    let block = Block::bordered().title("Conversation");
    let inner = block.inner(area);
    let lines = message_lines(state);

    // Pin the view to the newest message.
    let rows = estimated_rows(&lines, inner.width);
    let scroll = rows.saturating_sub(inner.height);

    let log = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(block);
    frame.render_widget(log, area);
}

fn draw_status(frame: &mut Frame, area: Rect, state: &SessionState) {
    let status = if state.awaiting_response() {
        Line::from(Span::styled(
            "Companion is thinking…",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(KEY_HINTS, Style::default().dim()))
    };
    frame.render_widget(Paragraph::new(status), area);
}

fn draw_input(frame: &mut Frame, area: Rect, draft: &str) {
    let block = Block::bordered().title("Message");
    let inner = block.inner(area);

    let lines: Vec<Line> = if draft.is_empty() {
        vec![Line::from(Span::styled(
            "Share what's on your mind…",
            Style::default().dim(),
        ))]
    } else {
        draft.split('\n').map(|l| Line::from(l.to_string())).collect()
    };

    let line_count = lines.len() as u16;
    let scroll = line_count.saturating_sub(inner.height);
    frame.render_widget(
        Paragraph::new(lines).scroll((scroll, 0)).block(block),
        area,
    );

    // Cursor sits at the end of the draft.
    if inner.width > 0 {
        let last = draft.split('\n').next_back().unwrap_or("");
        let x = inner.x + (Line::from(last).width() as u16).min(inner.width - 1);
        let y = inner.y + (line_count - scroll).saturating_sub(1).min(inner.height.saturating_sub(1));
        frame.set_cursor_position((x, y));
    }
}

fn message_lines(state: &SessionState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for message in &state.messages {
        let (label, style) = match (message.author, message.is_error) {
            (Author::User, _) => (
                "You",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            (Author::Companion, false) => (
                "Companion",
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            (Author::Companion, true) => (
                "Companion",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        };

        let stamp = message.timestamp.format("%H:%M").to_string();
        lines.push(Line::from(vec![
            Span::styled(label, style),
            Span::raw("  "),
            Span::styled(stamp, Style::default().dim()),
        ]));

        for content_line in message.content.lines() {
            lines.push(Line::from(content_line.to_string()));
        }

        if let Some(evaluation) = &message.evaluation {
            lines.push(badge_line(evaluation));
        }

        lines.push(Line::default());
    }

    lines
}

/// One ✓/✗ badge per evaluation dimension, mirroring the backend's four
/// self-assessment checks.
fn badge_line(evaluation: &EvaluationRecord) -> Line<'static> {
    let badges = [
        ("Questions", evaluation.asks_questions),
        ("Thoughts", evaluation.explores_thoughts),
        ("Reflection", evaluation.encourages_reflection),
        ("CBT Techniques", evaluation.uses_cbt_language),
    ];

    let mut spans = Vec::with_capacity(badges.len() * 2);
    for (label, value) in badges {
        let (mark, style) = if value {
            ("✓", Style::default().fg(Color::Green))
        } else {
            ("✗", Style::default().dim())
        };
        spans.push(Span::styled(format!("{mark} {label}"), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

/// Rows the paragraph will occupy once wrapped to `width`. An estimate:
/// wrapping is word-aware, this is not, but it only has to keep the newest
/// message in view.
fn estimated_rows(lines: &[Line], width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    lines
        .iter()
        .map(|line| (line.width() as u16) / width + 1)
        .sum()
}
