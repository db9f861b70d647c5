use ratatui::{prelude::*, widgets::*};

use crate::app::state::{Notice, NoticeLevel};
use crate::models::{Background, Story, UserProfile};

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Renders a selectable list of user profiles
pub fn render_user_list<'a>(
    users: &'a [UserProfile],
    title: String,
    selected: usize,
    is_loading: bool,
) -> List<'a> {
    let items: Vec<ListItem> = if is_loading {
        vec![ListItem::new("Loading...").style(Style::default().fg(Color::DarkGray))]
    } else if users.is_empty() {
        vec![ListItem::new("Nothing here yet").style(Style::default().fg(Color::DarkGray))]
    } else {
        users
            .iter()
            .enumerate()
            .map(|(i, user)| {
                let style = if i == selected {
                    Style::default().fg(Color::Yellow).bold()
                } else {
                    Style::default()
                };
                ListItem::new(user.display_line()).style(style)
            })
            .collect()
    };

    List::new(items).block(Block::default().borders(Borders::ALL).title(title))
}

/// One feed line per story
pub fn story_line(story: &Story) -> Line<'static> {
    let author = story
        .user
        .as_ref()
        .map(|u| format!("@{}", u.username))
        .unwrap_or_else(|| String::from("@someone"));

    let summary = match story.media_type {
        crate::models::MediaType::Text => story.content.clone(),
        other => {
            let label = other.as_str();
            if story.content.is_empty() {
                format!("[{}]", label)
            } else {
                format!("[{}] {}", label, story.content)
            }
        }
    };

    Line::from(vec![
        Span::styled(
            format!("{} ", story.created_at.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("{} ", author), Style::default().fg(Color::Cyan).bold()),
        Span::raw(summary),
    ])
}

/// Terminal stand-in for a background gradient
pub fn background_color(bg: Background) -> Color {
    match bg {
        Background::PurplePink => Color::Magenta,
        Background::CyanBlue => Color::Cyan,
        Background::OrangeRed => Color::Red,
        Background::EmeraldLime => Color::Green,
        Background::PinkYellow => Color::LightMagenta,
        Background::IndigoPurple => Color::Blue,
    }
}

/// Notice severity color
pub fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
    }
}

/// Status-area line for a notice
pub fn notice_line(notice: &Notice) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{} ", notice.timestamp.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            notice.text.clone(),
            Style::default().fg(notice_color(notice.level)),
        ),
    ])
}
