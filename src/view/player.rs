//! Full-screen player and the one-row controls bar shown while it is closed

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, LineGauge, Paragraph},
    Frame,
};

use crate::model::PlayerState;
use super::utils::format_duration;

pub fn render_player(frame: &mut Frame, area: Rect, player: &PlayerState) {
    frame.render_widget(Clear, area);

    let Some(now_playing) = &player.now_playing else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Picture area
            Constraint::Length(3), // Progress bar
        ])
        .split(area);

    let picture = Paragraph::new(vec![
        Line::from(""),
        Line::from(now_playing.title.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(now_playing.author.clone()).style(Style::default().fg(Color::Cyan)),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" ▶ Now Playing ")
            .title_bottom(Line::from(" Esc to close ").right_aligned())
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(picture, chunks[0]);

    let (ratio, time_str) = progress(player);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(time_str);
    frame.render_widget(gauge, chunks[1]);
}

pub fn render_controls_bar(frame: &mut Frame, area: Rect, player: &PlayerState) {
    let Some(now_playing) = &player.now_playing else {
        return;
    };
    let (ratio, time_str) = progress(player);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Title
            Constraint::Length(24), // Progress
        ])
        .split(area);

    let title = Line::from(vec![
        Span::styled(" ▶ ", Style::default().fg(Color::Green)),
        Span::styled(now_playing.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" | {}", now_playing.author), Style::default().fg(Color::Cyan)),
        Span::styled("  P open · X stop", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let gauge = LineGauge::default()
        .filled_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(time_str);
    frame.render_widget(gauge, chunks[1]);
}

fn progress(player: &PlayerState) -> (f64, String) {
    let Some(now_playing) = &player.now_playing else {
        return (0.0, String::new());
    };
    let elapsed = player.elapsed_seconds();
    if now_playing.length_seconds > 0 {
        (
            (elapsed as f64 / now_playing.length_seconds as f64).clamp(0.0, 1.0),
            format!("{} / {}", format_duration(elapsed), format_duration(now_playing.length_seconds)),
        )
    } else {
        (0.0, "Local file".to_string())
    }
}
