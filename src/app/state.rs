//! App state - pure data structure with no I/O logic

use crate::composer::Draft;
use crate::messages::render::ComposerRender;
use crate::messages::ui_events::{AppTab, ComposerFocus, ConnectionTab, InputMode};
use crate::messages::RenderState;
use crate::models::{ConnectionLists, Story, UserProfile};
use crate::preview::{InMemoryPreviews, PreviewRegistry};
use crate::session::SessionStore;

/// Severity of a toast-style notice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A non-blocking notification shown in the status area
#[derive(Clone, Debug)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Keep the status area short; older notices scroll away
const MAX_NOTICES: usize = 4;

/// State of the open story composer modal
pub struct ComposerState {
    pub draft: Draft,
    pub media_path_input: String,
    pub focus: ComposerFocus,
    pub pending_submit_id: Option<u64>,
}

impl ComposerState {
    pub fn new() -> Self {
        ComposerState {
            draft: Draft::new(),
            media_path_input: String::new(),
            focus: ComposerFocus::Text,
            pending_submit_id: None,
        }
    }
}

impl Default for ComposerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Session
    pub signed_in: bool,
    pub session_key_input: String,
    pub pending_session_key: Option<String>,
    pub profile: Option<UserProfile>,
    pub signing_in: bool,
    pub session_store: SessionStore,

    // Tab navigation
    pub active_tab: AppTab,
    pub input_mode: InputMode,

    // Feed
    pub stories: Vec<Story>,
    pub stories_loading: bool,
    pub feed_scroll: u16,

    // Connections
    pub connection_tab: ConnectionTab,
    pub connections: ConnectionLists,
    pub connections_loading: bool,
    pub selected_connection: usize,

    // Discover
    pub discover_input: String,
    pub discover_results: Vec<UserProfile>,
    pub discover_loading: bool,
    pub selected_discover: usize,

    // Composer
    pub composer: Option<ComposerState>,
    pub previews: InMemoryPreviews,

    // Request bookkeeping
    pub next_request_id: u64,
    pub pending_signin_id: Option<u64>,
    pub pending_connections_id: Option<u64>,
    pub pending_stories_id: Option<u64>,
    pub pending_discover_id: Option<u64>,
    pub pending_action_id: Option<u64>,

    // Notices
    pub notices: Vec<Notice>,

    // Popups
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SessionStore::new())
    }
}

impl AppState {
    pub fn new(session_store: SessionStore) -> Self {
        AppState {
            signed_in: false,
            session_key_input: String::new(),
            pending_session_key: None,
            profile: None,
            signing_in: false,
            session_store,
            active_tab: AppTab::Feed,
            input_mode: InputMode::Normal,
            stories: Vec::new(),
            stories_loading: false,
            feed_scroll: 0,
            connection_tab: ConnectionTab::Followers,
            connections: ConnectionLists::default(),
            connections_loading: false,
            selected_connection: 0,
            discover_input: String::new(),
            discover_results: Vec::new(),
            discover_loading: false,
            selected_discover: 0,
            composer: None,
            previews: InMemoryPreviews::new(),
            next_request_id: 1,
            pending_signin_id: None,
            pending_connections_id: None,
            pending_stories_id: None,
            pending_discover_id: None,
            pending_action_id: None,
            notices: Vec::new(),
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
            timestamp: chrono::Utc::now(),
        });
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    /// The list shown by the active connections sub-tab
    pub fn visible_connections(&self) -> &[UserProfile] {
        match self.connection_tab {
            ConnectionTab::Followers => &self.connections.followers,
            ConnectionTab::Following => &self.connections.following,
            ConnectionTab::Pending => &self.connections.pending,
            ConnectionTab::Connections => &self.connections.connections,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let composer = self.composer.as_ref().map(|c| ComposerRender {
            mode: c.draft.mode(),
            text: c.draft.text().to_string(),
            media_description: c
                .draft
                .preview()
                .and_then(|handle| self.previews.describe(handle)),
            media_path_input: c.media_path_input.clone(),
            focus: c.focus,
            background_index: c.draft.background().index(),
            background_label: c.draft.background().label(),
            submitting: c.draft.is_submitting(),
        });

        RenderState {
            signed_in: self.signed_in,
            session_key_input: self.session_key_input.clone(),
            profile: self.profile.clone(),
            signing_in: self.signing_in,
            active_tab: self.active_tab,
            input_mode: self.input_mode,
            stories: self.stories.clone(),
            stories_loading: self.stories_loading,
            feed_scroll: self.feed_scroll,
            connection_tab: self.connection_tab,
            connections: self.connections.clone(),
            connections_loading: self.connections_loading,
            selected_connection: self.selected_connection,
            discover_input: self.discover_input.clone(),
            discover_results: self.discover_results.clone(),
            discover_loading: self.discover_loading,
            selected_discover: self.selected_discover,
            composer,
            notices: self.notices.clone(),
            show_help: self.show_help,
        }
    }
}
