use serde::{Deserialize, Serialize};

/// A user profile as returned by the Axora API
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub followers: Vec<String>,
    #[serde(default)]
    pub following: Vec<String>,
}

impl UserProfile {
    /// One-line label for list rendering
    pub fn display_line(&self) -> String {
        if self.bio.is_empty() {
            format!("{} (@{})", self.full_name, self.username)
        } else {
            format!("{} (@{}) - {}", self.full_name, self.username, self.bio)
        }
    }
}

/// The four connection lists, fetched together
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConnectionLists {
    #[serde(default)]
    pub followers: Vec<UserProfile>,
    #[serde(default)]
    pub following: Vec<UserProfile>,
    #[serde(default, rename = "pendingConnections")]
    pub pending: Vec<UserProfile>,
    #[serde(default)]
    pub connections: Vec<UserProfile>,
}

/// Wire tag for a story's media kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Text,
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Text => "text",
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

/// A published story
#[derive(Clone, Debug, Deserialize)]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Fixed palette of story backgrounds. The wire identifiers must match the
/// gradient classes the web client sends, since the server stores them verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    PurplePink,
    CyanBlue,
    OrangeRed,
    EmeraldLime,
    PinkYellow,
    IndigoPurple,
}

impl Background {
    pub const PALETTE: [Background; 6] = [
        Background::PurplePink,
        Background::CyanBlue,
        Background::OrangeRed,
        Background::EmeraldLime,
        Background::PinkYellow,
        Background::IndigoPurple,
    ];

    /// Palette entry at `index`, or `None` when out of bounds
    pub fn from_index(index: usize) -> Option<Background> {
        Self::PALETTE.get(index).copied()
    }

    pub fn index(&self) -> usize {
        Self::PALETTE.iter().position(|b| b == self).unwrap_or(0)
    }

    /// Wire identifier sent as `background_color`
    pub fn as_str(&self) -> &'static str {
        match self {
            Background::PurplePink => "bg-gradient-to-tr from-purple-500 to-pink-500",
            Background::CyanBlue => "bg-gradient-to-tr from-cyan-500 to-blue-500",
            Background::OrangeRed => "bg-gradient-to-tr from-orange-500 to-red-600",
            Background::EmeraldLime => "bg-gradient-to-tr from-emerald-500 to-lime-500",
            Background::PinkYellow => "bg-gradient-to-tr from-pink-500 to-yellow-400",
            Background::IndigoPurple => "bg-gradient-to-tr from-indigo-600 to-purple-700",
        }
    }

    /// Short label for the palette selector
    pub fn label(&self) -> &'static str {
        match self {
            Background::PurplePink => "purple/pink",
            Background::CyanBlue => "cyan/blue",
            Background::OrangeRed => "orange/red",
            Background::EmeraldLime => "emerald/lime",
            Background::PinkYellow => "pink/yellow",
            Background::IndigoPurple => "indigo/purple",
        }
    }
}

/// Common `{success, message}` envelope returned by every endpoint
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Envelope for `GET /api/user/connections`
#[derive(Clone, Debug, Deserialize)]
pub struct ConnectionsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub lists: ConnectionLists,
}

/// Envelope for `POST /api/user/discover`
#[derive(Clone, Debug, Deserialize)]
pub struct DiscoverEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub users: Vec<UserProfile>,
}

/// Envelope for `GET /api/story/get`
#[derive(Clone, Debug, Deserialize)]
pub struct StoriesEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stories: Vec<Story>,
}

/// Envelope for `GET /api/user/data`
#[derive(Clone, Debug, Deserialize)]
pub struct ProfileEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub user: Option<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_palette_round_trip() {
        for (i, bg) in Background::PALETTE.iter().enumerate() {
            assert_eq!(Background::from_index(i), Some(*bg));
            assert_eq!(bg.index(), i);
        }
        assert_eq!(Background::from_index(Background::PALETTE.len()), None);
    }

    #[test]
    fn test_media_type_wire_tags() {
        assert_eq!(MediaType::Text.as_str(), "text");
        assert_eq!(MediaType::Image.as_str(), "image");
        assert_eq!(MediaType::Video.as_str(), "video");
    }

    #[test]
    fn test_connections_envelope_deserializes_flattened_lists() {
        let json = r#"{
            "success": true,
            "followers": [{"_id": "u1", "full_name": "Ana", "username": "ana"}],
            "following": [],
            "pendingConnections": [{"_id": "u2", "username": "bo"}],
            "connections": []
        }"#;
        let env: ConnectionsEnvelope = serde_json::from_str(json).unwrap();
        assert!(env.success);
        assert_eq!(env.lists.followers.len(), 1);
        assert_eq!(env.lists.followers[0].id, "u1");
        assert_eq!(env.lists.pending.len(), 1);
    }

    #[test]
    fn test_story_deserializes_with_optional_media() {
        let json = r#"{
            "_id": "s1",
            "content": "hello",
            "media_type": "text",
            "background_color": "bg-gradient-to-tr from-purple-500 to-pink-500",
            "createdAt": "2024-05-01T12:00:00Z"
        }"#;
        let story: Story = serde_json::from_str(json).unwrap();
        assert_eq!(story.media_type, MediaType::Text);
        assert!(story.media_url.is_none());
    }
}
