// src/ui/tui.rs

use std::io;

use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Terminal,
};

use crate::state::{LogLevel, Phase, WizardState};

const BG_MAIN: Color = Color::Rgb(22, 22, 22);
const BG_PANEL: Color = Color::Rgb(28, 28, 28);
const BG_INPUT: Color = Color::Rgb(40, 40, 40);

const GREEN: Color = Color::Rgb(0, 220, 140);
const DIM: Color = Color::Rgb(140, 140, 140);

const HEADER: [&str; 2] = [
    "▀█▀ █▀▀ █▀ ▀█▀ █▀▀ █▀█ █▀█ █▀▀ █▀▀",
    " █  ██▄ ▄█  █  █▀  █▄█ █▀▄ █▄█ ██▄",
];

pub fn draw_ui<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &WizardState,
) -> io::Result<()> {
    terminal.draw(|f| {
        let area = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // header
                Constraint::Min(5),    // tree + logs
                Constraint::Length(3), // input
                Constraint::Length(1), // status
            ])
            .split(area);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(20)])
            .split(chunks[1]);

        render_header(f, chunks[0]);
        render_tree(f, middle[0], state);
        render_logs(f, middle[1], state);
        render_input(f, chunks[2], state);
        render_status(f, chunks[3], state);
    })?;

    Ok(())
}

fn render_header(f: &mut ratatui::Frame, area: Rect) {
    let lines = HEADER.iter().map(|l| {
        Line::from(Span::styled(
            *l,
            Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
        ))
    });

    f.render_widget(
        Paragraph::new(lines.collect::<Vec<_>>())
            .alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

fn render_tree(f: &mut ratatui::Frame, area: Rect, state: &WizardState) {
    f.render_widget(Block::default().style(Style::default().bg(BG_PANEL)), area);

    let padded = pad(area);
    let mut lines: Vec<Line> = Vec::new();

    if let Some(repo) = &state.repo {
        lines.push(Line::from(Span::styled(
            format!("{}/{}", repo.owner, repo.name),
            Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());
    }

    let rows = state.explorer.visible_rows();

    if !state.explorer.has_roots() {
        lines.push(Line::from(Span::styled(
            "connect <owner>/<repo> to load files",
            Style::default().fg(DIM),
        )));
    }

    for (i, row) in rows.iter().enumerate() {
        let marker = if row.node.is_dir() {
            if state.explorer.is_expanded(&row.node.path) {
                "▾ "
            } else {
                "▸ "
            }
        } else if state.explorer.is_selected(&row.node.path) {
            "✓ "
        } else {
            "· "
        };

        let style = if state.explorer.is_selected(&row.node.path) {
            Style::default().fg(GREEN)
        } else if row.node.is_dir() {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:>3} ", i + 1), Style::default().fg(DIM)),
            Span::raw("  ".repeat(row.depth)),
            Span::styled(format!("{marker}{}", row.node.name), style),
        ]));
    }

    let height = padded.height.max(1) as usize;
    let scroll = state.tree_scroll.min(lines.len().saturating_sub(height));

    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), padded);
}

fn render_logs(f: &mut ratatui::Frame, area: Rect, state: &WizardState) {
    f.render_widget(Block::default().style(Style::default().bg(BG_MAIN)), area);

    let padded = pad(area);
    let height = padded.height.max(1) as usize;

    let lines: Vec<Line> = state
        .logs
        .iter()
        .map(|log| {
            let color = match log.level {
                LogLevel::Success => Color::Green,
                LogLevel::Warn => Color::Yellow,
                LogLevel::Error => Color::Red,
                LogLevel::Info => Color::Gray,
            };
            Line::from(Span::styled(&log.text, Style::default().fg(color)))
        })
        .collect();

    let max_scroll = lines.len().saturating_sub(height);
    let scroll = if state.log_scroll == usize::MAX {
        max_scroll
    } else {
        state.log_scroll.min(max_scroll)
    };

    f.render_widget(
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false }),
        padded,
    );
}

fn render_input(f: &mut ratatui::Frame, area: Rect, state: &WizardState) {
    f.render_widget(Block::default().style(Style::default().bg(BG_INPUT)), area);

    let input_area = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: 1,
    };

    let mut spans = vec![
        Span::styled(">_ ", Style::default().fg(GREEN)),
        Span::styled(&state.input, Style::default().fg(Color::White)),
    ];

    if state.input.is_empty() {
        if let Some(hint) = &state.hint {
            spans.push(Span::styled(hint.as_str(), Style::default().fg(DIM)));
        }
    }

    let line = Line::from(spans);

    f.render_widget(Paragraph::new(line), input_area);

    let cursor_x = input_area.x + 3 + state.input.len() as u16;
    f.set_cursor(cursor_x, input_area.y);
}

fn render_status(f: &mut ratatui::Frame, area: Rect, state: &WizardState) {
    const STEPS: [Phase; 5] = [
        Phase::Connect,
        Phase::Select,
        Phase::Generate,
        Phase::Code,
        Phase::Complete,
    ];

    let mut spans = Vec::new();
    for (i, step) in STEPS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(DIM)));
        }
        let style = if *step == state.phase {
            Style::default().fg(GREEN).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DIM)
        };
        spans.push(Span::styled(step.label(), style));
    }

    let right = vec![
        Span::styled("[enter]", Style::default().fg(GREEN)),
        Span::styled(" run  ", Style::default().fg(DIM)),
        Span::styled("[pgup/pgdn]", Style::default().fg(GREEN)),
        Span::styled(" scroll  ", Style::default().fg(DIM)),
        Span::styled("[esc]", Style::default().fg(GREEN)),
        Span::styled(" exit", Style::default().fg(DIM)),
    ];

    let left_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let right_width: usize = right.iter().map(|s| s.content.chars().count()).sum();
    let spacing = (area.width as usize)
        .saturating_sub(left_width + right_width)
        .max(1);

    spans.push(Span::raw(" ".repeat(spacing)));
    spans.extend(right);

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(BG_MAIN)),
        area,
    );
}

fn pad(area: Rect) -> Rect {
    Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    }
}
