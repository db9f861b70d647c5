//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application tabs
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AppTab {
    #[default]
    Feed,
    Connections,
    Discover,
}

/// Sub-tabs of the connections screen
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum ConnectionTab {
    #[default]
    Followers,
    Following,
    Pending,
    Connections,
}

impl ConnectionTab {
    pub fn next(&self) -> ConnectionTab {
        match self {
            ConnectionTab::Followers => ConnectionTab::Following,
            ConnectionTab::Following => ConnectionTab::Pending,
            ConnectionTab::Pending => ConnectionTab::Connections,
            ConnectionTab::Connections => ConnectionTab::Followers,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionTab::Followers => "Followers",
            ConnectionTab::Following => "Following",
            ConnectionTab::Pending => "Pending",
            ConnectionTab::Connections => "Connections",
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Which composer field receives text input
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum ComposerFocus {
    #[default]
    Text,
    MediaPath,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Tab navigation
    SwitchTab(AppTab),

    // List navigation / scrolling
    SelectPrev,
    SelectNext,
    ScrollUp,
    ScrollDown,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,

    // Sign-in screen
    SignIn,
    SignOut,

    // Connections actions
    NextConnectionTab,
    Unfollow,
    AcceptConnection,
    RefreshConnections,

    // Discover actions
    Search,
    Follow,

    // Feed actions
    RefreshStories,

    // Story composer
    OpenComposer,
    CloseComposer,
    ComposerTextMode,
    ComposerMediaMode,
    ComposerEditText,
    ComposerCycleBackground,
    ComposerAttach,
    ComposerSubmit,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    signed_in: bool,
    active_tab: AppTab,
    input_mode: InputMode,
    composer_open: bool,
    composer_focus: ComposerFocus,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    // Sign-in screen captures everything until a session exists
    if !signed_in {
        return match (input_mode, key.code) {
            (InputMode::Normal, KeyCode::Char('q')) => Some(UiEvent::Quit),
            (InputMode::Normal, KeyCode::Char('e') | KeyCode::Enter) => {
                Some(UiEvent::StartEditing)
            }
            (InputMode::Editing, KeyCode::Esc) => Some(UiEvent::StopEditing),
            (InputMode::Editing, KeyCode::Enter) => Some(UiEvent::SignIn),
            (InputMode::Editing, KeyCode::Backspace) => Some(UiEvent::Backspace),
            (InputMode::Editing, KeyCode::Char(c)) => Some(UiEvent::CharInput(c)),
            _ => None,
        };
    }

    // Composer modal takes precedence over the tabs underneath it
    if composer_open {
        return handle_composer_keys(key, input_mode, composer_focus);
    }

    // Tab switching (normal mode only)
    if input_mode == InputMode::Normal {
        match key.code {
            KeyCode::Char('1') => return Some(UiEvent::SwitchTab(AppTab::Feed)),
            KeyCode::Char('2') => return Some(UiEvent::SwitchTab(AppTab::Connections)),
            KeyCode::Char('3') => return Some(UiEvent::SwitchTab(AppTab::Discover)),
            _ => {}
        }
    }

    match active_tab {
        AppTab::Feed => handle_feed_keys(key, input_mode),
        AppTab::Connections => handle_connections_keys(key, input_mode),
        AppTab::Discover => handle_discover_keys(key, input_mode),
    }
}

/// Keys for the story feed tab
fn handle_feed_keys(key: KeyEvent, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('n') => Some(UiEvent::OpenComposer),
            KeyCode::Char('r') => Some(UiEvent::RefreshStories),
            KeyCode::Char('o') => Some(UiEvent::SignOut),
            KeyCode::Up => Some(UiEvent::ScrollUp),
            KeyCode::Down => Some(UiEvent::ScrollDown),
            _ => None,
        },
        InputMode::Editing => None,
    }
}

/// Keys for the connections tab
fn handle_connections_keys(key: KeyEvent, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Tab => Some(UiEvent::NextConnectionTab),
            KeyCode::Up => Some(UiEvent::SelectPrev),
            KeyCode::Down => Some(UiEvent::SelectNext),
            KeyCode::Char('u') => Some(UiEvent::Unfollow),
            KeyCode::Char('a') => Some(UiEvent::AcceptConnection),
            KeyCode::Char('r') => Some(UiEvent::RefreshConnections),
            _ => None,
        },
        InputMode::Editing => None,
    }
}

/// Keys for the discover tab
fn handle_discover_keys(key: KeyEvent, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('e') | KeyCode::Char('/') => Some(UiEvent::StartEditing),
            KeyCode::Up => Some(UiEvent::SelectPrev),
            KeyCode::Down => Some(UiEvent::SelectNext),
            KeyCode::Char('f') => Some(UiEvent::Follow),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::Search),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

/// Keys inside the composer modal
fn handle_composer_keys(
    key: KeyEvent,
    input_mode: InputMode,
    focus: ComposerFocus,
) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Esc => Some(UiEvent::CloseComposer),
            KeyCode::Char('t') => Some(UiEvent::ComposerTextMode),
            KeyCode::Char('m') => Some(UiEvent::ComposerMediaMode),
            KeyCode::Char('e') => Some(UiEvent::ComposerEditText),
            KeyCode::Char('b') => Some(UiEvent::ComposerCycleBackground),
            KeyCode::Char('s') => Some(UiEvent::ComposerSubmit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => match focus {
                ComposerFocus::MediaPath => Some(UiEvent::ComposerAttach),
                ComposerFocus::Text => Some(UiEvent::StopEditing),
            },
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}
