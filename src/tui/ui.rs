// UI rendering logic
//
// All the rendering code for the TUI. The draw function is a pure projection
// of App state into widgets; the only state it touches is the transcript
// scroll geometry, which has to know the viewport size chosen here.

use super::app::App;
use crate::conversation::Role;
use crate::logging::LogLevel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Suggestion prompts shown in the empty state
const SUGGESTIONS: &[&str] = &[
    "I've been feeling tired lately",
    "Help me plan a healthy week",
    "Check my medication schedule",
    "Analyze my fitness progress",
];

/// Main UI render function - called whenever the redraw flag is set
pub fn draw(f: &mut Frame, app: &mut App) {
    // Vertical sections: title, transcript, optional reasoning panel,
    // input bar, system logs, status line
    let reasoning_visible =
        app.show_reasoning && !app.conversation.reasoning().is_empty();

    let mut constraints = vec![
        Constraint::Length(3), // Title bar
        Constraint::Min(5),    // Transcript - takes remaining space
    ];
    if reasoning_visible {
        constraints.push(Constraint::Length(6)); // Reasoning panel
    }
    constraints.push(Constraint::Length(3)); // Input bar
    constraints.push(Constraint::Length(4)); // System logs
    constraints.push(Constraint::Length(1)); // Status line

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0;
    render_title(f, chunks[idx], app);
    idx += 1;
    render_transcript(f, chunks[idx], app);
    idx += 1;
    if reasoning_visible {
        render_reasoning(f, chunks[idx], app);
        idx += 1;
    }
    render_input(f, chunks[idx], app);
    idx += 1;
    render_logs(f, chunks[idx], app);
    idx += 1;
    render_status(f, chunks[idx], app);
}

fn render_title(f: &mut Frame, area: Rect, app: &App) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "Sana",
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" · your AI health companion", Style::default().fg(app.theme.muted)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );

    f.render_widget(title, area);
}

/// Render the conversation transcript: empty-state prompt, turns tagged by
/// role, and the busy indicator row while a request is outstanding.
fn render_transcript(f: &mut Frame, area: Rect, app: &mut App) {
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let inner_height = area.height.saturating_sub(2).max(1) as usize;

    let lines = if app.conversation.turns().is_empty() && !app.conversation.is_busy() {
        empty_state_lines(app)
    } else {
        transcript_lines(app, inner_width)
    };

    app.transcript_scroll
        .update_dimensions(lines.len(), inner_height);

    let transcript = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border))
                .title(" Conversation "),
        )
        .scroll((app.transcript_scroll.offset() as u16, 0));

    f.render_widget(transcript, area);
}

fn empty_state_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "  Welcome to your AI Health Agent",
            Style::default()
                .fg(app.theme.fg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "  Ask about symptoms, medications, fitness, or nutrition",
            Style::default().fg(app.theme.muted),
        )),
        Line::default(),
        Line::from(Span::styled(
            "  For example:",
            Style::default().fg(app.theme.muted),
        )),
    ];

    for suggestion in SUGGESTIONS {
        lines.push(Line::from(Span::styled(
            format!("    · {}", suggestion),
            Style::default().fg(app.theme.muted),
        )));
    }

    lines
}

fn transcript_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    for turn in app.conversation.turns() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }

        let (tag, color) = match turn.role {
            Role::User => ("You", app.theme.user),
            Role::Assistant => ("AI Agent", app.theme.assistant),
        };
        lines.push(Line::from(Span::styled(
            tag.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));

        for wrapped in wrap_text(&turn.content, width.saturating_sub(2).max(1)) {
            lines.push(Line::from(Span::styled(
                format!("  {}", wrapped),
                Style::default().fg(app.theme.fg),
            )));
        }
    }

    if app.conversation.is_busy() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            format!("{} AI is analyzing...", app.spinner()),
            Style::default().fg(app.theme.busy),
        )));
    }

    lines
}

/// Render the reasoning trace of the latest reply. Only called when the
/// panel is toggled on and the trace is non-empty.
fn render_reasoning(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();

    for step in app.conversation.reasoning() {
        let kind = step
            .kind
            .as_deref()
            .unwrap_or("step")
            .to_uppercase();
        let icon = if step.status.as_deref() == Some("success") {
            "✓"
        } else {
            "⚡"
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} ", icon),
                Style::default().fg(app.theme.reasoning),
            ),
            Span::styled(kind, Style::default().fg(app.theme.fg)),
            Span::styled(
                step.status
                    .as_deref()
                    .map(|s| format!("  ({})", s))
                    .unwrap_or_default(),
                Style::default().fg(app.theme.muted),
            ),
        ]));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.reasoning))
            .title(" Agent Reasoning "),
    );

    f.render_widget(panel, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(" Message ");

    let content = if app.input.is_empty() {
        Line::from(Span::styled(
            "Ask about your health...",
            Style::default().fg(app.theme.muted),
        ))
    } else {
        Line::from(Span::styled(
            app.input.as_str().to_string(),
            Style::default().fg(app.theme.fg),
        ))
    };

    f.render_widget(Paragraph::new(content).block(block), area);

    // Place the terminal cursor after the character the edit cursor is on
    let cursor_x: usize = app
        .input
        .as_str()
        .chars()
        .take(app.input.cursor())
        .map(|c| c.width().unwrap_or(0))
        .sum();
    let max_x = area.width.saturating_sub(2) as usize;
    f.set_cursor_position(Position::new(
        area.x + 1 + cursor_x.min(max_x) as u16,
        area.y + 1,
    ));
}

fn render_logs(f: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let entries = app.log_buffer.latest(visible);

    let lines: Vec<Line> = entries
        .iter()
        .map(|entry| {
            let color = match entry.level {
                LogLevel::Error => app.theme.log_error,
                LogLevel::Warn => app.theme.log_warn,
                LogLevel::Info => app.theme.log_info,
                LogLevel::Debug | LogLevel::Trace => app.theme.log_debug,
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(app.theme.muted),
                ),
                Span::styled(format!("{:<5} ", entry.level.as_str()), Style::default().fg(color)),
                Span::styled(entry.message.clone(), Style::default().fg(app.theme.fg)),
            ])
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border))
            .title(" System Logs "),
    );

    f.render_widget(panel, area);
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let session = match app.conversation.conversation_id() {
        Some(id) => format!("session {}", id),
        None => "new session".to_string(),
    };
    let state = if app.conversation.is_busy() {
        "waiting for reply"
    } else {
        "ready"
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            "Enter send · ↑/↓ scroll · Ctrl+R reasoning · Ctrl+N new chat · Esc quit",
            Style::default().fg(app.theme.muted),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[{} · {}]", session, state),
            Style::default().fg(app.theme.status_bar),
        ),
    ]));

    f.render_widget(status, area);
}

/// Word-wrap `text` to `width` display columns. Newlines in the input are
/// preserved; words wider than the width are hard-split so nothing is lost.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        if raw.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0;

        for word in raw.split_whitespace() {
            let word_width = word.width();

            if current_width > 0 && current_width + 1 + word_width <= width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
                continue;
            }

            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
            } else {
                // Hard-split an over-long word across lines
                for c in word.chars() {
                    let cw = c.width().unwrap_or(0);
                    if current_width + cw > width {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push(c);
                    current_width += cw;
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
