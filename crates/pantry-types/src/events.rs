use serde::{Deserialize, Serialize};

use crate::models::{GroupId, Message, Notification, Post, Profile};

/// Events pushed over the gateway socket.
///
/// The wire names are the backend's and are not uniform (kebab, camel and
/// snake case all appear). Do not normalize them here — the serde renames
/// are the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum PushEvent {
    /// Someone posted a message to a group the user belongs to.
    #[serde(rename = "new-message")]
    NewMessage(Message),

    /// A notification was created for this user. Always arrives unread.
    #[serde(rename = "new-notification")]
    NewNotification(Notification),

    /// A group's avatar changed.
    #[serde(rename = "chatGroupAvatarUpdated")]
    GroupAvatarUpdated {
        #[serde(rename = "chatGroupId")]
        group_id: GroupId,
        #[serde(rename = "newAvatarUrl")]
        avatar_url: String,
    },

    /// A post was published or edited.
    #[serde(rename = "made-update")]
    MadeUpdate(Post),

    /// An account changed its display name or avatar.
    #[serde(rename = "user_profile_updated")]
    ProfileUpdated(Profile),

    /// A batch of food uploads finished server-side processing.
    #[serde(rename = "food-uploads-complete")]
    UploadsComplete { count: u32 },
}

impl PushEvent {
    /// Wire name of the event, for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "new-message",
            Self::NewNotification(_) => "new-notification",
            Self::GroupAvatarUpdated { .. } => "chatGroupAvatarUpdated",
            Self::MadeUpdate(_) => "made-update",
            Self::ProfileUpdated(_) => "user_profile_updated",
            Self::UploadsComplete { .. } => "food-uploads-complete",
        }
    }
}
