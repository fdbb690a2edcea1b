// UI rendering logic
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::App;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Quote display
            Constraint::Length(1), // Status / notices
            Constraint::Length(1), // Error surface
            Constraint::Length(1), // Key help
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_quote(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);
    render_error_surface(frame, app, chunks[3]);
    render_help(frame, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bookmark_count = app.bookmarks.len();
    let title = Line::from(vec![
        Span::styled(
            " quotedeck ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {} bookmarked", bookmark_count)),
    ]);

    let header = Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_quote(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    let text = app.visible_text();
    let typing = app.engine.is_typing();
    let complete = app
        .engine
        .session()
        .map(|s| s.is_complete)
        .unwrap_or(false);

    let mut quote_spans = vec![Span::styled(text, Style::default().fg(Color::White))];
    if typing {
        // Block cursor at the reveal point while the animation runs.
        quote_spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }
    lines.push(Line::from(quote_spans));

    // Author only once the quote is fully on screen; mid-reveal it would
    // spoil where the text is going.
    if complete && !app.author_line.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            app.author_line.clone(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(" quote ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();

    if app.engine.is_paused() && !app.engine.is_typing() {
        spans.push(Span::styled(
            " PAUSED ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
        spans.push(Span::raw(" "));
    }

    if let Some(status) = &app.status_message {
        spans.push(Span::styled(
            status.clone(),
            Style::default().fg(Color::Green),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_error_surface(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(error) = &app.error_message {
        let line = Paragraph::new(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(line, area);
    }
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(Span::styled(
        " space finish/pause │ n next │ b bookmark │ v/←→ cycle saved │ c copy │ s share │ u case │ p hold │ q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(help, area);
}
