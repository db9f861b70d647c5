//! Command handlers - business logic for processing UI events

use crate::app::state::{AppState, ComposerState, NoticeLevel};
use crate::composer::ComposeMode;
use crate::media::{DurationProbe, MediaFile};
use crate::messages::ui_events::{AppTab, ComposerFocus, InputMode};
use crate::messages::{ApiCommand, ApiResponse};
use crate::session::StoredSession;

impl AppState {
    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Route a typed character to whichever field is being edited
    pub fn enter_char(&mut self, c: char) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        if !self.signed_in {
            self.session_key_input.push(c);
            return;
        }
        if let Some(composer) = self.composer.as_mut() {
            match composer.focus {
                ComposerFocus::Text => composer.draft.push_char(c),
                ComposerFocus::MediaPath => composer.media_path_input.push(c),
            }
            return;
        }
        if self.active_tab == AppTab::Discover {
            self.discover_input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        if !self.signed_in {
            self.session_key_input.pop();
            return;
        }
        if let Some(composer) = self.composer.as_mut() {
            match composer.focus {
                ComposerFocus::Text => composer.draft.pop_char(),
                ComposerFocus::MediaPath => {
                    composer.media_path_input.pop();
                }
            }
            return;
        }
        if self.active_tab == AppTab::Discover {
            self.discover_input.pop();
        }
    }

    // ========================
    // Session
    // ========================

    pub fn sign_in(&mut self) -> Option<ApiCommand> {
        let key = self.session_key_input.trim().to_string();
        if key.is_empty() || self.signing_in {
            return None;
        }
        self.stop_editing();
        self.signing_in = true;
        self.pending_session_key = Some(key.clone());
        let id = self.next_id();
        self.pending_signin_id = Some(id);
        Some(ApiCommand::SignIn {
            id,
            session_key: key,
        })
    }

    pub fn sign_out(&mut self) {
        if let Err(e) = self.session_store.clear() {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        self.signed_in = false;
        self.profile = None;
        self.session_key_input.clear();
        self.connections = Default::default();
        self.stories.clear();
        self.discover_results.clear();
        self.close_composer();
        self.push_notice(NoticeLevel::Info, "Signed out");
    }

    // ========================
    // Tab navigation
    // ========================

    pub fn switch_tab(&mut self, tab: AppTab) {
        self.active_tab = tab;
        self.input_mode = InputMode::Normal;
    }

    pub fn next_connection_tab(&mut self) {
        self.connection_tab = self.connection_tab.next();
        self.selected_connection = 0;
    }

    // ========================
    // List navigation / scrolling
    // ========================

    pub fn select_prev(&mut self) {
        match self.active_tab {
            AppTab::Connections => {
                self.selected_connection = self.selected_connection.saturating_sub(1);
            }
            AppTab::Discover => {
                self.selected_discover = self.selected_discover.saturating_sub(1);
            }
            AppTab::Feed => {}
        }
    }

    pub fn select_next(&mut self) {
        match self.active_tab {
            AppTab::Connections => {
                let len = self.visible_connections().len();
                if len > 0 && self.selected_connection + 1 < len {
                    self.selected_connection += 1;
                }
            }
            AppTab::Discover => {
                let len = self.discover_results.len();
                if len > 0 && self.selected_discover + 1 < len {
                    self.selected_discover += 1;
                }
            }
            AppTab::Feed => {}
        }
    }

    pub fn scroll_up(&mut self) {
        self.feed_scroll = self.feed_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.feed_scroll = self.feed_scroll.saturating_add(1);
    }

    // ========================
    // Connections actions
    // ========================

    pub fn refresh_connections(&mut self) -> Option<ApiCommand> {
        if self.connections_loading {
            return None;
        }
        self.connections_loading = true;
        let id = self.next_id();
        self.pending_connections_id = Some(id);
        Some(ApiCommand::FetchConnections { id })
    }

    pub fn unfollow_selected(&mut self) -> Option<ApiCommand> {
        use crate::messages::ui_events::ConnectionTab;
        if !matches!(
            self.connection_tab,
            ConnectionTab::Following | ConnectionTab::Connections
        ) {
            return None;
        }
        let user = self.visible_connections().get(self.selected_connection)?;
        let user_id = user.id.clone();
        let id = self.next_id();
        self.pending_action_id = Some(id);
        Some(ApiCommand::Unfollow { id, user_id })
    }

    pub fn accept_selected(&mut self) -> Option<ApiCommand> {
        use crate::messages::ui_events::ConnectionTab;
        if self.connection_tab != ConnectionTab::Pending {
            return None;
        }
        let user = self.connections.pending.get(self.selected_connection)?;
        let user_id = user.id.clone();
        let id = self.next_id();
        self.pending_action_id = Some(id);
        Some(ApiCommand::AcceptConnection { id, user_id })
    }

    // ========================
    // Discover actions
    // ========================

    pub fn search(&mut self) -> Option<ApiCommand> {
        let input = self.discover_input.trim().to_string();
        if input.is_empty() || self.discover_loading {
            return None;
        }
        self.stop_editing();
        // Clear previous results while the search is in flight
        self.discover_results.clear();
        self.selected_discover = 0;
        self.discover_loading = true;
        let id = self.next_id();
        self.pending_discover_id = Some(id);
        Some(ApiCommand::Discover { id, input })
    }

    pub fn follow_selected(&mut self) -> Option<ApiCommand> {
        let user = self.discover_results.get(self.selected_discover)?;
        let user_id = user.id.clone();
        let id = self.next_id();
        self.pending_action_id = Some(id);
        Some(ApiCommand::Follow { id, user_id })
    }

    // ========================
    // Feed actions
    // ========================

    pub fn refresh_stories(&mut self) -> Option<ApiCommand> {
        if self.stories_loading {
            return None;
        }
        self.stories_loading = true;
        let id = self.next_id();
        self.pending_stories_id = Some(id);
        Some(ApiCommand::FetchStories { id })
    }

    // ========================
    // Story composer
    // ========================

    pub fn open_composer(&mut self) {
        if self.composer.is_none() {
            self.composer = Some(ComposerState::new());
        }
    }

    /// Discard the draft, revoking its preview. A response to an in-flight
    /// submission arriving after this is ignored.
    pub fn close_composer(&mut self) {
        if let Some(composer) = self.composer.take() {
            composer.draft.discard(&mut self.previews);
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn composer_text_mode(&mut self) {
        if let Some(composer) = self.composer.as_mut() {
            composer.draft.set_mode(ComposeMode::Text, &mut self.previews);
            composer.focus = ComposerFocus::Text;
        }
    }

    /// Switch to media mode and start editing the file path
    pub fn composer_media_mode(&mut self) {
        if let Some(composer) = self.composer.as_mut() {
            composer.draft.set_mode(ComposeMode::Media, &mut self.previews);
            composer.focus = ComposerFocus::MediaPath;
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn composer_edit_text(&mut self) {
        if let Some(composer) = self.composer.as_mut() {
            if composer.draft.mode() == ComposeMode::Text {
                composer.focus = ComposerFocus::Text;
                self.input_mode = InputMode::Editing;
            }
        }
    }

    pub fn composer_cycle_background(&mut self) {
        if let Some(composer) = self.composer.as_mut() {
            composer.draft.cycle_background();
        }
    }

    /// Validate and attach the file named in the path input
    pub async fn composer_attach(&mut self, file: MediaFile, probe: &dyn DurationProbe) {
        let Some(composer) = self.composer.as_mut() else {
            return;
        };
        let name = file.file_name.clone();
        match composer
            .draft
            .select_media(file, probe, &mut self.previews)
            .await
        {
            Ok(()) => {
                composer.media_path_input.clear();
                self.input_mode = InputMode::Normal;
                self.push_notice(NoticeLevel::Success, format!("Attached {}", name));
            }
            Err(e) => {
                let text = e.to_string();
                self.push_notice(NoticeLevel::Error, text);
            }
        }
    }

    pub fn composer_submit(&mut self) -> Option<ApiCommand> {
        let result = self.composer.as_mut()?.draft.begin_submission();
        match result {
            Ok(submission) => {
                let id = self.next_id();
                if let Some(composer) = self.composer.as_mut() {
                    composer.pending_submit_id = Some(id);
                }
                Some(ApiCommand::CreateStory { id, submission })
            }
            Err(e) => {
                self.push_notice(NoticeLevel::Error, e.to_string());
                None
            }
        }
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a network response; returned commands are follow-up fetches
    pub fn handle_response(&mut self, response: ApiResponse) -> Vec<ApiCommand> {
        match response {
            ApiResponse::SignedIn { id, profile } => {
                if self.pending_signin_id != Some(id) {
                    return Vec::new();
                }
                self.pending_signin_id = None;
                self.signing_in = false;
                self.signed_in = true;
                self.session_key_input.clear();

                if let Some(key) = self.pending_session_key.take() {
                    let session = StoredSession {
                        session_key: key,
                        username: profile.username.clone(),
                        signed_in_at: chrono::Utc::now(),
                    };
                    if let Err(e) = self.session_store.save(&session) {
                        tracing::warn!(error = %e, "Failed to persist session");
                    }
                }

                self.push_notice(
                    NoticeLevel::Success,
                    format!("Welcome back, {}!", profile.full_name),
                );
                self.profile = Some(profile);

                let mut follow_ups = Vec::new();
                follow_ups.extend(self.refresh_stories());
                follow_ups.extend(self.refresh_connections());
                follow_ups
            }

            ApiResponse::Connections { id, lists } => {
                if self.pending_connections_id == Some(id) {
                    self.pending_connections_id = None;
                    self.connections_loading = false;
                    self.connections = lists;
                    let len = self.visible_connections().len();
                    if self.selected_connection >= len {
                        self.selected_connection = len.saturating_sub(1);
                    }
                }
                Vec::new()
            }

            ApiResponse::Stories { id, stories } => {
                if self.pending_stories_id == Some(id) {
                    self.pending_stories_id = None;
                    self.stories_loading = false;
                    self.stories = stories;
                    self.feed_scroll = 0;
                }
                Vec::new()
            }

            ApiResponse::DiscoverResults { id, users } => {
                if self.pending_discover_id == Some(id) {
                    self.pending_discover_id = None;
                    self.discover_loading = false;
                    self.push_notice(
                        NoticeLevel::Info,
                        format!("Found {} people", users.len()),
                    );
                    self.discover_results = users;
                    self.selected_discover = 0;
                    self.discover_input.clear();
                }
                Vec::new()
            }

            ApiResponse::ActionDone { id, message } => {
                if self.pending_action_id != Some(id) {
                    return Vec::new();
                }
                self.pending_action_id = None;
                self.push_notice(NoticeLevel::Success, message);
                // The connection lists changed server-side; refetch once
                self.refresh_connections().into_iter().collect()
            }

            ApiResponse::StoryCreated { id, .. } => {
                let matched = self
                    .composer
                    .as_ref()
                    .map(|c| c.pending_submit_id == Some(id))
                    .unwrap_or(false);
                if !matched {
                    // Late response after the composer was closed
                    return Vec::new();
                }
                self.close_composer();
                self.push_notice(NoticeLevel::Success, "Story was created successfully");
                self.refresh_stories().into_iter().collect()
            }

            ApiResponse::Error { id, message } => {
                self.handle_error(id, message);
                Vec::new()
            }
        }
    }

    fn handle_error(&mut self, id: u64, message: String) {
        if self.pending_signin_id == Some(id) {
            self.pending_signin_id = None;
            self.signing_in = false;
            self.pending_session_key = None;
        } else if self.pending_connections_id == Some(id) {
            self.pending_connections_id = None;
            self.connections_loading = false;
        } else if self.pending_stories_id == Some(id) {
            self.pending_stories_id = None;
            self.stories_loading = false;
        } else if self.pending_discover_id == Some(id) {
            self.pending_discover_id = None;
            self.discover_loading = false;
        } else if self.pending_action_id == Some(id) {
            self.pending_action_id = None;
        } else if let Some(composer) = self.composer.as_mut() {
            if composer.pending_submit_id == Some(id) {
                // Keep the draft so the user can correct and retry
                composer.pending_submit_id = None;
                composer.draft.submission_failed();
            } else {
                return; // stale response, nothing to reset
            }
        } else {
            return;
        }
        self.push_notice(NoticeLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConnectionLists, UserProfile};
    use crate::session::SessionStore;

    fn state() -> AppState {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(SessionStore::with_dir(dir.path().to_path_buf()));
        state.signed_in = true;
        state
    }

    fn user(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            username: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_submit_text_story_then_success_refreshes_feed_once() {
        let mut state = state();
        state.open_composer();
        state.composer.as_mut().unwrap().draft.set_text("hello");

        let cmd = state.composer_submit().expect("submission command");
        let ApiCommand::CreateStory { id, submission } = cmd else {
            panic!("expected CreateStory");
        };
        assert_eq!(submission.content, "hello");

        let follow_ups = state.handle_response(ApiResponse::StoryCreated {
            id,
            message: String::new(),
        });
        assert!(state.composer.is_none(), "draft discarded on success");
        assert_eq!(follow_ups.len(), 1);
        assert!(matches!(follow_ups[0], ApiCommand::FetchStories { .. }));
    }

    #[test]
    fn test_empty_draft_produces_no_command() {
        let mut state = state();
        state.open_composer();
        assert!(state.composer_submit().is_none());
        assert!(state.composer.is_some(), "draft preserved");
    }

    #[test]
    fn test_second_submit_while_in_flight_rejected() {
        let mut state = state();
        state.open_composer();
        state.composer.as_mut().unwrap().draft.set_text("once");
        assert!(state.composer_submit().is_some());
        assert!(state.composer_submit().is_none());
        // Still in flight, so a retry is only possible after failure
        assert!(state.composer.as_ref().unwrap().draft.is_submitting());
    }

    #[test]
    fn test_failed_submission_preserves_draft_for_retry() {
        let mut state = state();
        state.open_composer();
        state.composer.as_mut().unwrap().draft.set_text("retry me");
        let Some(ApiCommand::CreateStory { id, .. }) = state.composer_submit() else {
            panic!("expected CreateStory");
        };
        state.handle_response(ApiResponse::Error {
            id,
            message: String::from("upload failed"),
        });
        let composer = state.composer.as_ref().unwrap();
        assert_eq!(composer.draft.text(), "retry me");
        assert!(!composer.draft.is_submitting());
        assert!(state.composer_submit().is_some());
    }

    #[test]
    fn test_late_story_response_after_close_is_ignored() {
        let mut state = state();
        state.open_composer();
        state.composer.as_mut().unwrap().draft.set_text("gone");
        let Some(ApiCommand::CreateStory { id, .. }) = state.composer_submit() else {
            panic!("expected CreateStory");
        };
        state.close_composer();
        let follow_ups = state.handle_response(ApiResponse::StoryCreated {
            id,
            message: String::new(),
        });
        assert!(follow_ups.is_empty());
    }

    #[test]
    fn test_action_done_refetches_connections() {
        let mut state = state();
        state.connections.following.push(user("u1"));
        state.connection_tab = crate::messages::ui_events::ConnectionTab::Following;

        let Some(ApiCommand::Unfollow { id, user_id }) = state.unfollow_selected() else {
            panic!("expected Unfollow");
        };
        assert_eq!(user_id, "u1");

        let follow_ups = state.handle_response(ApiResponse::ActionDone {
            id,
            message: String::from("Unfollowed"),
        });
        assert_eq!(follow_ups.len(), 1);
        assert!(matches!(follow_ups[0], ApiCommand::FetchConnections { .. }));
    }

    #[test]
    fn test_accept_only_from_pending_tab() {
        let mut state = state();
        state.connections.pending.push(user("u2"));
        assert!(state.accept_selected().is_none());
        state.connection_tab = crate::messages::ui_events::ConnectionTab::Pending;
        assert!(state.accept_selected().is_some());
    }

    #[test]
    fn test_search_clears_previous_results_and_input_on_success() {
        let mut state = state();
        state.active_tab = AppTab::Discover;
        state.discover_results.push(user("old"));
        state.discover_input = String::from("ana");

        let Some(ApiCommand::Discover { id, input }) = state.search() else {
            panic!("expected Discover");
        };
        assert_eq!(input, "ana");
        assert!(state.discover_results.is_empty());
        assert!(state.discover_loading);

        state.handle_response(ApiResponse::DiscoverResults {
            id,
            users: vec![user("ana")],
        });
        assert_eq!(state.discover_results.len(), 1);
        assert!(state.discover_input.is_empty());
        assert!(!state.discover_loading);
    }

    #[test]
    fn test_stale_connections_response_ignored() {
        let mut state = state();
        let cmd = state.refresh_connections().unwrap();
        let ApiCommand::FetchConnections { id } = cmd else {
            panic!("expected FetchConnections");
        };
        // A response for some other request must not clear the loading flag
        state.handle_response(ApiResponse::Connections {
            id: id + 100,
            lists: ConnectionLists::default(),
        });
        assert!(state.connections_loading);

        state.handle_response(ApiResponse::Connections {
            id,
            lists: ConnectionLists::default(),
        });
        assert!(!state.connections_loading);
    }

    #[test]
    fn test_sign_in_success_persists_session_and_fetches() {
        let mut state = state();
        state.signed_in = false;
        state.session_key_input = String::from("sk_123");
        state.input_mode = InputMode::Editing;

        let Some(ApiCommand::SignIn { id, session_key }) = state.sign_in() else {
            panic!("expected SignIn");
        };
        assert_eq!(session_key, "sk_123");

        let follow_ups = state.handle_response(ApiResponse::SignedIn {
            id,
            profile: user("ana"),
        });
        assert!(state.signed_in);
        assert_eq!(follow_ups.len(), 2);
        let stored = state.session_store.load().unwrap().unwrap();
        assert_eq!(stored.session_key, "sk_123");
    }

    #[test]
    fn test_sign_in_failure_resets_flag() {
        let mut state = state();
        state.signed_in = false;
        state.session_key_input = String::from("bad");
        let Some(ApiCommand::SignIn { id, .. }) = state.sign_in() else {
            panic!("expected SignIn");
        };
        state.handle_response(ApiResponse::Error {
            id,
            message: String::from("invalid key"),
        });
        assert!(!state.signed_in);
        assert!(!state.signing_in);
    }
}
