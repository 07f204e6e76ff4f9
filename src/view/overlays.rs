//! Overlay rendering: detail overlays (channel, playlist) and modal popups

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{LoadState, OverlayKind, OverlayView, Preferences, SettingsRow, UiState};
use super::content::{header_style, video_columns};
use super::layout::render_toolbar;
use super::utils::{centered_rect, render_scrollable_list, row_style};

/// Draw a detail overlay sliding up from the bottom of `area`
pub fn render_detail_overlay(frame: &mut Frame, area: Rect, view: &OverlayView, is_focused: bool) {
    let elapsed = view.descriptor.presented_at.elapsed();
    let offset = view.descriptor.transition.slide_offset(elapsed, area.height);
    let area = Rect {
        y: area.y + offset,
        height: area.height.saturating_sub(offset),
        ..area
    };
    frame.render_widget(Clear, area);

    let (accent, icon) = match view.descriptor.kind() {
        OverlayKind::Channel => (Color::Magenta, "👤"),
        OverlayKind::Playlist => (Color::Blue, "☰"),
    };
    let border_style = if is_focused {
        Style::default().fg(accent)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let toolbar_height = if view.chrome.items.is_empty() { 0 } else { 1 };
    let header_height = if view.chrome.inline_header { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(0),
            Constraint::Length(toolbar_height),
        ])
        .split(area);

    let mut title = format!(" {} {} ", icon, view.title);
    if !view.chrome.inline_header {
        if let Some(subscribers) = subscriber_text(view) {
            title.push_str(&format!("· {} ", subscribers));
        }
    }

    if view.chrome.inline_header {
        render_inline_header(frame, chunks[0], view);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(1))
        .border_style(border_style)
        .style(Style::default().bg(Color::Black));

    match &view.videos {
        LoadState::Loaded(videos) if !videos.is_empty() => {
            let width = chunks[1].width.saturating_sub(4) as usize;
            let now = Utc::now();
            let items: Vec<ListItem> = videos
                .iter()
                .enumerate()
                .map(|(i, video)| {
                    ListItem::new(video_columns(video, width, now)).style(row_style(i == view.selected, is_focused))
                })
                .collect();
            render_scrollable_list(frame, chunks[1], items, view.selected, block);
        }
        state => {
            let text = match state {
                LoadState::Failed(error) => format!("Could not load: {}", error),
                LoadState::Loaded(_) => "No videos.".to_string(),
                _ => "Loading...".to_string(),
            };
            frame.render_widget(Paragraph::new(text).block(block), chunks[1]);
        }
    }

    if toolbar_height > 0 {
        render_toolbar(frame, chunks[2], &view.chrome.items, view.subscribed);
    }
}

fn subscriber_text(view: &OverlayView) -> Option<String> {
    match view.descriptor.kind() {
        OverlayKind::Channel => Some(
            view.subscribers
                .as_ref()
                .map(|s| format!("{} subscribers", s))
                .unwrap_or_else(|| "loading".to_string()),
        ),
        OverlayKind::Playlist => None,
    }
}

fn render_inline_header(frame: &mut Frame, area: Rect, view: &OverlayView) {
    let mut spans = vec![Span::styled(view.title.clone(), header_style())];
    if let Some(subscribers) = subscriber_text(view) {
        spans.push(Span::raw(format!("   {}", subscribers)));
    }
    if view.chrome.show_subscription_toggle {
        let label = if view.subscribed { "[s] Unsubscribe" } else { "[s] Subscribe" };
        spans.push(Span::styled(format!("   {}", label), Style::default().fg(Color::Green)));
    }
    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM).style(Style::default().bg(Color::Black)));
    frame.render_widget(header, area);
}

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        // Fixed width popup (responsive to screen size)
        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4).max(1) as usize;
        let error_line_count = ((error_msg.chars().count() as f32) / (inner_width as f32)).ceil() as u16;
        let popup_area = centered_rect(area, popup_width, 2 + error_line_count.max(1));

        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

fn popup_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black))
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = vec![
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle tabs"),
        ("1 - 7", "Jump to tab"),
        ("↑ / ↓", "Move selection"),
        ("Enter", "Open / Play"),
        ("C", "Open channel"),
        ("Esc / Backspace", "Close player or overlay"),
        ("/", "Search"),
        ("", ""),
        ("", "── Actions ──"),
        ("S", "Subscribe / Unsubscribe"),
        ("Y", "Share"),
        ("A", "Switch account"),
        (",", "Settings"),
        ("O", "Open videos by id"),
        ("R", "Reload tab"),
        ("P", "Reopen player"),
        ("X", "Stop playback"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_area = centered_rect(area, 62, keybindings.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines).block(popup_block(" Help (H or Esc to close) ", Color::Cyan));
    frame.render_widget(help_text, popup_area);
}

pub fn render_settings_popup(frame: &mut Frame, preferences: &Preferences, selected: usize) {
    let rows = SettingsRow::all();
    let popup_area = centered_rect(frame.area(), 48, rows.len() as u16 + 4);
    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let (label, on) = match row {
                SettingsRow::ShowHome => ("Show Home".to_string(), preferences.show_home),
                SettingsRow::ShowDocuments => ("Show Documents".to_string(), preferences.show_documents),
                SettingsRow::ShowOpenActions => {
                    ("Show Open Videos".to_string(), preferences.show_open_actions_toolbar_item)
                }
                SettingsRow::Section(section) => (
                    format!("Section: {}", section.label()),
                    preferences.visible_sections.contains(section),
                ),
            };
            let mark = if on { "[x]" } else { "[ ]" };
            ListItem::new(format!("{} {}", mark, label)).style(row_style(i == selected, true))
        })
        .collect();

    render_scrollable_list(
        frame,
        popup_area,
        items,
        selected,
        popup_block(" Settings (Enter toggles, Esc closes) ", Color::Cyan),
    );
}

pub fn render_share_popup(frame: &mut Frame, title: &str, url: &str) {
    let popup_area = centered_rect(frame.area(), (url.chars().count() as u16 + 6).max(40), 6);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(title.to_string(), header_style())),
        Line::from(""),
        Line::from(Span::styled(url.to_string(), Style::default().fg(Color::Green))),
    ];
    let share = Paragraph::new(lines).block(popup_block(" Share (Esc to close) ", Color::Cyan));
    frame.render_widget(share, popup_area);
}

pub fn render_unsubscribe_alert(frame: &mut Frame, channel_name: &str) {
    let popup_area = centered_rect(frame.area(), 50, 6);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(format!("Unsubscribe from {}?", channel_name)),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Enter] ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw("Unsubscribe   "),
            Span::styled("[Esc] ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Cancel"),
        ]),
    ];
    let alert = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(popup_block(" Unsubscribe ", Color::Red));
    frame.render_widget(alert, popup_area);
}

pub fn render_open_videos_popup(frame: &mut Frame, input: &str) {
    let popup_area = centered_rect(frame.area(), 56, 5);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(format!("{}▏", input), Style::default().fg(Color::Green))),
        Line::from(Span::styled(
            "Video ids separated by spaces",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let open = Paragraph::new(lines).block(popup_block(" Open Videos (Enter to play) ", Color::Cyan));
    frame.render_widget(open, popup_area);
}
