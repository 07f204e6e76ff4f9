//! Layout rendering (tab strip, toolbar, status line)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Tabs},
    Frame,
};

use crate::model::{Placement, TabView, ToolbarAction, ToolbarItem};

pub fn render_tab_strip(frame: &mut Frame, area: Rect, view: &TabView) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Tabs
            Constraint::Length(30), // Account
        ])
        .split(area);

    let titles: Vec<Line> = view
        .tabs
        .tabs
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {} {}", i + 1, tab.icon, tab.label)))
        .collect();
    let selected = view.tabs.position(view.selected).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .divider("│")
        .block(Block::default().borders(Borders::ALL).title(" vidtabs "));
    frame.render_widget(tabs, chunks[0]);

    let account_text = match &view.account {
        Some(account) if account.anonymous => format!("{} (anonymous)", account.name),
        Some(account) => format!("{} · {}", account.name, account.service),
        None => "No account".to_string(),
    };
    let account = Paragraph::new(account_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Account "));
    frame.render_widget(account, chunks[1]);
}

/// Toolbar hints: leading items left, trailing items right
pub fn render_toolbar(frame: &mut Frame, area: Rect, items: &[ToolbarItem], subscribed: bool) {
    let hint = |item: &ToolbarItem| {
        let label = match item.action {
            ToolbarAction::SubscriptionToggle if subscribed => "Unsubscribe",
            action => action.label(),
        };
        vec![
            Span::styled(
                format!("[{}]", item.action.key_hint()),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}  ", label)),
        ]
    };

    let leading: Vec<Span> = items
        .iter()
        .filter(|i| !matches!(i.placement, Placement::Trailing | Placement::Cancellation))
        .flat_map(hint)
        .collect();
    let trailing: Vec<Span> = items
        .iter()
        .filter(|i| matches!(i.placement, Placement::Trailing | Placement::Cancellation))
        .flat_map(hint)
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(leading)), chunks[0]);
    frame.render_widget(Paragraph::new(Line::from(trailing).right_aligned()), chunks[1]);
}

pub fn render_search_bar(frame: &mut Frame, area: Rect, query: &str, editing: bool) {
    let style = if editing {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };
    let text = if query.is_empty() && !editing {
        "Press / to search..."
    } else {
        query
    };

    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(style),
    );
    frame.render_widget(search, area);
}

pub fn render_status_line(frame: &mut Frame, area: Rect, text: &str) {
    let status = Paragraph::new(text.to_string()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}
