//! Axora TUI - Actor-based terminal client for the Axora social network
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async API execution

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use axora_tui::constants::DEFAULT_API_URL;
use axora_tui::messages::ui_events::{
    key_to_ui_event, AppTab, ComposerFocus, ConnectionTab, InputMode,
};
use axora_tui::messages::{ApiCommand, ApiResponse, RenderState, UiEvent};
use axora_tui::models::Background;
use axora_tui::session::SessionStore;
use axora_tui::ui::{background_color, notice_line, render_tabs, render_user_list, story_line};
use axora_tui::{AppActor, AppState, ComposeMode, NetworkActor};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "axora.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let base_url =
        std::env::var("AXORA_API_URL").unwrap_or_else(|_| String::from(DEFAULT_API_URL));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<ApiCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<ApiResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx, &base_url);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(SessionStore::new()), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let composer_focus = current_state
                    .composer
                    .as_ref()
                    .map(|c| c.focus)
                    .unwrap_or(ComposerFocus::Text);
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.signed_in,
                    current_state.active_tab,
                    current_state.input_mode,
                    current_state.composer.is_some(),
                    composer_focus,
                    current_state.show_help,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    if !state.signed_in {
        draw_login_screen(f, state, area);
        if state.show_help {
            draw_help_popup(f, area);
        }
        return;
    }

    // Main layout with tab bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(4), // Notices
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);

    match state.active_tab {
        AppTab::Feed => draw_feed_tab(f, state, main_chunks[1]),
        AppTab::Connections => draw_connections_tab(f, state, main_chunks[1]),
        AppTab::Discover => draw_discover_tab(f, state, main_chunks[1]),
    }

    draw_notices(f, state, main_chunks[2]);

    // Popups
    if let Some(composer) = &state.composer {
        draw_composer_modal(f, state, composer, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_login_screen(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Banner
            Constraint::Length(3), // Session key input
            Constraint::Length(4), // Notices
        ])
        .split(area);

    let banner = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "AXORA",
            Style::default().fg(Color::Magenta).bold(),
        )),
        Line::from("Stay Close!"),
        Line::from(""),
        Line::from(Span::styled(
            "Paste your session key below, then press Enter.",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(banner, chunks[0]);

    let editing = state.input_mode == InputMode::Editing;
    let title = if state.signing_in {
        " Session Key [signing in...] "
    } else {
        " Session Key (e=edit, Enter=sign in) "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
        .title(title);

    // Mask the key; only its length is shown
    let masked = "*".repeat(state.session_key_input.len());
    f.render_widget(Paragraph::new(masked).block(block), chunks[1]);

    draw_notices(f, state, chunks[2]);
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let profile = state
        .profile
        .as_ref()
        .map(|p| format!(" @{}", p.username))
        .unwrap_or_default();

    let tabs = vec![
        Span::styled(
            " 1:Feed ",
            if state.active_tab == AppTab::Feed {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            },
        ),
        Span::raw(" "),
        Span::styled(
            " 2:Connections ",
            if state.active_tab == AppTab::Connections {
                Style::default().fg(Color::Black).bg(Color::Magenta).bold()
            } else {
                Style::default().fg(Color::Gray)
            },
        ),
        Span::raw(" "),
        Span::styled(
            " 3:Discover ",
            if state.active_tab == AppTab::Discover {
                Style::default().fg(Color::Black).bg(Color::Green).bold()
            } else {
                Style::default().fg(Color::Gray)
            },
        ),
        Span::styled(profile, Style::default().fg(Color::DarkGray)),
    ];

    f.render_widget(Paragraph::new(Line::from(tabs)), area);
}

fn draw_feed_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = if state.stories_loading {
        " Stories [...] (n=new, r=refresh) "
    } else {
        " Stories (n=new, r=refresh) "
    };

    let mut lines: Vec<Line> = state.stories.iter().map(story_line).collect();
    if lines.is_empty() && !state.stories_loading {
        lines.push(Line::from(Span::styled(
            "No stories yet. Press 'n' to share your moment!",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let feed = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((state.feed_scroll, 0));
    f.render_widget(feed, area);
}

fn draw_connections_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Sub-tabs
            Constraint::Min(3),    // List
        ])
        .split(area);

    let labels = [
        ConnectionTab::Followers,
        ConnectionTab::Following,
        ConnectionTab::Pending,
        ConnectionTab::Connections,
    ];
    let selected = labels
        .iter()
        .position(|t| *t == state.connection_tab)
        .unwrap_or(0);
    let counts = [
        state.connections.followers.len(),
        state.connections.following.len(),
        state.connections.pending.len(),
        state.connections.connections.len(),
    ];
    let titles: Vec<String> = labels
        .iter()
        .zip(counts)
        .map(|(t, n)| format!("{} ({})", t.label(), n))
        .collect();
    let title_refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    f.render_widget(render_tabs(&title_refs, selected), chunks[0]);

    let users = match state.connection_tab {
        ConnectionTab::Followers => &state.connections.followers,
        ConnectionTab::Following => &state.connections.following,
        ConnectionTab::Pending => &state.connections.pending,
        ConnectionTab::Connections => &state.connections.connections,
    };
    let hint = match state.connection_tab {
        ConnectionTab::Pending => "a=accept",
        ConnectionTab::Following | ConnectionTab::Connections => "u=unfollow",
        ConnectionTab::Followers => "Tab=next list",
    };
    let list = render_user_list(
        users,
        format!(" {} ({}) ", state.connection_tab.label(), hint),
        state.selected_connection,
        state.connections_loading,
    );
    f.render_widget(list, chunks[1]);
}

fn draw_discover_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(3),    // Results
        ])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
        .title(" Discover People (e=edit, Enter=search) ");
    f.render_widget(
        Paragraph::new(state.discover_input.as_str()).block(block),
        chunks[0],
    );

    let list = render_user_list(
        &state.discover_results,
        String::from(" Results (f=follow) "),
        state.selected_discover,
        state.discover_loading,
    );
    f.render_widget(list, chunks[1]);
}

fn draw_composer_modal(
    f: &mut Frame,
    state: &RenderState,
    composer: &axora_tui::messages::render::ComposerRender,
    area: Rect,
) {
    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);

    let bg = Background::from_index(composer.background_index).unwrap_or_default();
    let title = if composer.submitting {
        " Share Your Moment! [saving...] "
    } else {
        " Share Your Moment! (t=text, m=media, b=background, s=create, Esc=close) "
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(background_color(bg)))
        .title(title);
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),    // Preview box
            Constraint::Length(3), // Media path input
            Constraint::Length(1), // Background selector
        ])
        .split(inner);

    // Preview: the draft text, or a description of the attached media
    let editing_text =
        state.input_mode == InputMode::Editing && composer.focus == ComposerFocus::Text;
    let preview_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing_text {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(background_color(bg))
        })
        .title(match composer.mode {
            ComposeMode::Text => " Text (e=edit) ",
            ComposeMode::Media => " Media ",
        });
    let preview_text = match composer.mode {
        ComposeMode::Text => {
            if composer.text.is_empty() && !editing_text {
                String::from("Say it loud without saying a word...")
            } else {
                composer.text.clone()
            }
        }
        ComposeMode::Media => composer
            .media_description
            .clone()
            .unwrap_or_else(|| String::from("No media attached yet")),
    };
    f.render_widget(
        Paragraph::new(preview_text)
            .wrap(Wrap { trim: false })
            .block(preview_block),
        chunks[0],
    );

    // Media path input
    let editing_path =
        state.input_mode == InputMode::Editing && composer.focus == ComposerFocus::MediaPath;
    let path_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing_path {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
        .title(" Photo/Video path (m=edit, Enter=attach) ");
    f.render_widget(
        Paragraph::new(composer.media_path_input.as_str()).block(path_block),
        chunks[1],
    );

    // Background selector
    let mut spans: Vec<Span> = Vec::new();
    for (i, entry) in Background::PALETTE.iter().enumerate() {
        let style = if i == composer.background_index {
            Style::default()
                .fg(Color::Black)
                .bg(background_color(*entry))
                .bold()
        } else {
            Style::default().fg(background_color(*entry))
        };
        spans.push(Span::styled(format!(" {} ", entry.label()), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[2]);
}

fn draw_notices(f: &mut Frame, state: &RenderState, area: Rect) {
    let lines: Vec<Line> = state.notices.iter().map(notice_line).collect();
    let block = Block::default().borders(Borders::TOP);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 60, area);
    f.render_widget(Clear, popup);

    let help_text = vec![
        Line::from(Span::styled("Axora TUI", Style::default().bold())),
        Line::from(""),
        Line::from("1/2/3      Switch tab (Feed / Connections / Discover)"),
        Line::from("n          New story (Feed)"),
        Line::from("r          Refresh current list"),
        Line::from("Tab        Next connections sub-tab"),
        Line::from("Up/Down    Select / scroll"),
        Line::from("u          Unfollow selected"),
        Line::from("a          Accept pending request"),
        Line::from("f          Follow selected (Discover)"),
        Line::from("e /        Edit input"),
        Line::from("o          Sign out (Feed)"),
        Line::from("q          Quit"),
        Line::from(""),
        Line::from("Composer: t=text m=media b=background s=create Esc=close"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(help, popup);
}

/// Helper to create a centered rect using a percentage of the available area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
