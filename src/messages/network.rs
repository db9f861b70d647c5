//! API messages - communication between App and Network layers

use crate::composer::StorySubmission;
use crate::models::{ConnectionLists, Story, UserProfile};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum ApiCommand {
    /// Validate a session key against the API and adopt it for future requests
    SignIn { id: u64, session_key: String },
    /// Fetch all four connection lists
    FetchConnections { id: u64 },
    /// Fetch the story feed
    FetchStories { id: u64 },
    /// People search
    Discover { id: u64, input: String },
    /// Follow a user
    Follow { id: u64, user_id: String },
    /// Unfollow a user
    Unfollow { id: u64, user_id: String },
    /// Accept a pending connection request
    AcceptConnection { id: u64, user_id: String },
    /// Submit a composed story (multipart upload)
    CreateStory {
        id: u64,
        submission: StorySubmission,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum ApiResponse {
    /// Session key accepted; the signed-in profile
    SignedIn { id: u64, profile: UserProfile },
    /// Connection lists fetched
    Connections { id: u64, lists: ConnectionLists },
    /// Story feed fetched
    Stories { id: u64, stories: Vec<Story> },
    /// Discover search results
    DiscoverResults { id: u64, users: Vec<UserProfile> },
    /// Follow/unfollow/accept acknowledged by the server
    ActionDone { id: u64, message: String },
    /// Story accepted by the server
    StoryCreated { id: u64, message: String },
    /// Transport failure or a `success:false` envelope
    Error { id: u64, message: String },
}
