//! Main content area rendering (tab lists and their load states)

use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{ContentItem, ListEntry, LoadState, TabSelection, TabView, Video, abbreviate_count};
use super::utils::{
    calculate_num_width, format_duration, format_relative, format_size, render_scrollable_list,
    row_style, truncate_string,
};

pub fn render_tab_content(frame: &mut Frame, area: Rect, view: &TabView, is_focused: bool) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let title = format!(" {} ", view.selected.label());

    let entries = match &view.content {
        LoadState::Loaded(entries) => entries,
        other => {
            let (text, color) = match other {
                LoadState::Failed(error) => (format!("Could not load: {}\n\nPress R to retry", error), Color::Red),
                _ if view.selected == TabSelection::Search && view.search_query.is_empty() => {
                    ("Press / and type to search channels, playlists and videos".to_string(), Color::DarkGray)
                }
                _ => ("Loading...".to_string(), Color::Yellow),
            };
            let placeholder = Paragraph::new(text).style(Style::default().fg(color)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .padding(Padding::horizontal(1))
                    .border_style(border_style),
            );
            frame.render_widget(placeholder, area);
            return;
        }
    };

    if entries.is_empty() {
        let empty = Paragraph::new(empty_message(view.selected))
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .padding(Padding::horizontal(1))
                    .border_style(border_style),
            );
        frame.render_widget(empty, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let now = Utc::now();
    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = row_style(i == view.list_selected, is_focused);
            ListItem::new(entry_line(entry, i, entries.len(), content_width, now)).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(border_style);
    render_scrollable_list(frame, area, items, view.list_selected, block);
}

fn empty_message(tab: TabSelection) -> &'static str {
    match tab {
        TabSelection::Subscriptions => "No subscriptions yet. Open a channel and press S to subscribe.",
        TabSelection::Documents => "No video files found in the documents folder.",
        TabSelection::Playlists => "This account has no playlists.",
        TabSelection::Search => "No results.",
        _ => "Nothing to show.",
    }
}

fn entry_line(entry: &ListEntry, index: usize, total: usize, width: usize, now: DateTime<Utc>) -> String {
    let num_width = calculate_num_width(total);
    let num = format!("{:<num_width$}", index + 1, num_width = num_width);
    let remaining = width.saturating_sub(num_width + 3);

    match entry {
        ListEntry::Content(ContentItem::Video(video)) => {
            format!("{} {}", num, video_columns(video, remaining, now))
        }
        ListEntry::Content(ContentItem::Channel(channel)) => {
            let subscribers = channel.subscriptions_string().unwrap_or_default();
            format!(
                "{} {}  {}",
                num,
                truncate_string(&format!("👤 {}", channel.name), remaining.saturating_sub(16)),
                subscribers
            )
        }
        ListEntry::Content(ContentItem::Playlist(playlist)) => {
            format!(
                "{} {}  {} videos",
                num,
                truncate_string(&format!("☰ {}", playlist.title), remaining.saturating_sub(12)),
                playlist.videos.len()
            )
        }
        ListEntry::Document(doc) => {
            format!(
                "{} {}  {}",
                num,
                truncate_string(&doc.name, remaining.saturating_sub(12)),
                format_size(doc.size_bytes)
            )
        }
    }
}

/// Title, author, duration and age columns of a video row
pub fn video_columns(video: &Video, width: usize, now: DateTime<Utc>) -> String {
    let meta = format!(
        "{:>8}  {:>6} views  {}",
        format_duration(video.length_seconds),
        abbreviate_count(video.views),
        format_relative(video.published, now)
    );
    let remaining = width.saturating_sub(meta.chars().count() + 2);
    let title_width = (remaining * 60) / 100;
    let author_width = remaining.saturating_sub(title_width);
    format!(
        "{} {}  {}",
        truncate_string(&video.title, title_width),
        truncate_string(&video.author, author_width),
        meta
    )
}

pub fn header_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}
