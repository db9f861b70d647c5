//! # Axora TUI
//!
//! A terminal client for the Axora social network.
//!
//! ## Features
//! - Story feed with a text/media composer
//! - Client-side media validation (video size and duration limits)
//! - Connections screen (followers, following, pending, connections)
//! - People discovery search
//! - Session sign-in with short-lived bearer tokens
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod constants;
pub mod models;
pub mod media;
pub mod preview;
pub mod composer;
pub mod session;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{Background, ConnectionLists, MediaType, Story, UserProfile};
pub use media::{DurationProbe, MediaFile, MediaKind, Mp4MetadataProbe};
pub use composer::{ComposeError, ComposeMode, Draft, StorySubmission};
pub use messages::{ApiCommand, ApiResponse, RenderState, UiEvent};
pub use app::{AppActor, AppState};
pub use network::NetworkActor;
