//! App actor - message loop processing UI events and network responses

use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::app::state::{AppState, NoticeLevel};
use crate::media::{DurationProbe, MediaFile, Mp4MetadataProbe};
use crate::messages::{ApiCommand, ApiResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    probe: Box<dyn DurationProbe>,
    network_tx: mpsc::UnboundedSender<ApiCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<ApiCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            probe: Box::new(Mp4MetadataProbe),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<ApiResponse>,
    ) {
        // Resume a stored session, if any
        match self.state.session_store.load() {
            Ok(Some(session)) => {
                self.state.session_key_input = session.session_key;
                if let Some(cmd) = self.state.sign_in() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to load stored session"),
        }

        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event).await {
                        // Quit signal received
                        let _ = self.network_tx.send(ApiCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    for cmd in self.state.handle_response(response) {
                        let _ = self.network_tx.send(cmd);
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: Option<ApiCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    async fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Tab navigation
            UiEvent::SwitchTab(tab) => self.state.switch_tab(tab),
            UiEvent::NextConnectionTab => self.state.next_connection_tab(),

            // List navigation / scrolling
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),

            // Session
            UiEvent::SignIn => {
                let cmd = self.state.sign_in();
                self.send(cmd);
            }
            UiEvent::SignOut => self.state.sign_out(),

            // Connections
            UiEvent::RefreshConnections => {
                let cmd = self.state.refresh_connections();
                self.send(cmd);
            }
            UiEvent::Unfollow => {
                let cmd = self.state.unfollow_selected();
                self.send(cmd);
            }
            UiEvent::AcceptConnection => {
                let cmd = self.state.accept_selected();
                self.send(cmd);
            }

            // Discover
            UiEvent::Search => {
                let cmd = self.state.search();
                self.send(cmd);
            }
            UiEvent::Follow => {
                let cmd = self.state.follow_selected();
                self.send(cmd);
            }

            // Feed
            UiEvent::RefreshStories => {
                let cmd = self.state.refresh_stories();
                self.send(cmd);
            }

            // Story composer
            UiEvent::OpenComposer => self.state.open_composer(),
            UiEvent::CloseComposer => self.state.close_composer(),
            UiEvent::ComposerTextMode => self.state.composer_text_mode(),
            UiEvent::ComposerMediaMode => self.state.composer_media_mode(),
            UiEvent::ComposerEditText => self.state.composer_edit_text(),
            UiEvent::ComposerCycleBackground => self.state.composer_cycle_background(),
            UiEvent::ComposerAttach => self.attach_media().await,
            UiEvent::ComposerSubmit => {
                let cmd = self.state.composer_submit();
                self.send(cmd);
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }

    /// Load the file named in the composer's path input and validate it
    async fn attach_media(&mut self) {
        let Some(path) = self
            .state
            .composer
            .as_ref()
            .map(|c| c.media_path_input.trim().to_string())
        else {
            return;
        };
        if path.is_empty() {
            return;
        }

        // Expand ~ to home directory
        let expanded = if path.starts_with('~') {
            if let Some(home) = dirs::home_dir() {
                path.replacen('~', &home.to_string_lossy(), 1)
            } else {
                path
            }
        } else {
            path
        };

        match MediaFile::load(&PathBuf::from(&expanded)).await {
            Ok(file) => {
                self.state.composer_attach(file, self.probe.as_ref()).await;
            }
            Err(e) => {
                self.state
                    .push_notice(NoticeLevel::Error, format!("Cannot read file: {}", e));
            }
        }
    }
}
