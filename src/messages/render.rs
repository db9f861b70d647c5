//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::Notice;
use crate::composer::ComposeMode;
use crate::messages::ui_events::{AppTab, ComposerFocus, ConnectionTab, InputMode};
use crate::models::{ConnectionLists, Story, UserProfile};

/// Snapshot of the open composer for the UI
#[derive(Debug, Clone)]
pub struct ComposerRender {
    pub mode: ComposeMode,
    pub text: String,
    pub media_description: Option<String>,
    pub media_path_input: String,
    pub focus: ComposerFocus,
    pub background_index: usize,
    pub background_label: &'static str,
    pub submitting: bool,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Session
    pub signed_in: bool,
    pub session_key_input: String,
    pub profile: Option<UserProfile>,
    pub signing_in: bool,

    // Tab / input
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

    // Composer modal
    pub composer: Option<ComposerRender>,

    // Notices (toast-style, newest last)
    pub notices: Vec<Notice>,

    // Popups
    pub show_help: bool,
}
