use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many characters of a text message end up in a group's last-message
/// preview before it is cut off.
const PREVIEW_LEN: usize = 80;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

// Every id is an opaque string assigned by the backend. The client never
// mints one — even optimistic flows wait for the created entity to come back.
string_id!(GroupId);
string_id!(MessageId);
string_id!(NotificationId);
string_id!(PostId);
string_id!(UserId);

/// Account snapshot embedded in notifications and posts. The canonical copy
/// of a profile lives in the client's profile directory; these snapshots are
/// whatever the backend knew when it wrote the parent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A messaging group as returned by the group list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatGroup {
    pub id: GroupId,
    pub name: String,
    pub members: Vec<UserId>,
    pub private: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub last_message: Option<MessagePreview>,
}

/// What a message carries. Exactly one variant per message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MessageBody {
    Text { text: String },
    Image { url: String },
    Emoji { emoji: String },
    /// A product card linking one of the commerce posts.
    Product { post_id: PostId, label: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub group_id: GroupId,
    pub sender_id: UserId,
    #[serde(flatten)]
    pub body: MessageBody,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Summary used for the owning group's last-message line.
    pub fn preview(&self) -> MessagePreview {
        let excerpt = match &self.body {
            MessageBody::Text { text } => {
                let mut s: String = text.chars().take(PREVIEW_LEN).collect();
                if text.chars().count() > PREVIEW_LEN {
                    s.push('…');
                }
                s
            }
            MessageBody::Image { .. } => "[photo]".to_owned(),
            MessageBody::Emoji { emoji } => emoji.clone(),
            MessageBody::Product { label, .. } => label.clone(),
        };
        MessagePreview {
            id: self.id.clone(),
            sender_id: self.sender_id.clone(),
            excerpt,
        }
    }
}

/// Last-message line shown on a group entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePreview {
    pub id: MessageId,
    pub sender_id: UserId,
    pub excerpt: String,
}

/// Closed set of notification tags. The backend really does send `other`
/// for anything outside the first four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    NewContent,
    Liked,
    Saved,
    Commented,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub author: Profile,
    #[serde(default)]
    pub post: Option<PostPreview>,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A feed entry: a recipe or a product card.
///
/// Liked / saved / in-shopping-list are deliberately not fields here — the
/// list endpoint is not authoritative for them. They are derived client-side
/// from separate id-list fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author: Profile,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Present on commerce posts only.
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub comment_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Related-post summary carried by notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPreview {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: MessageBody) -> Message {
        Message {
            id: "m1".into(),
            group_id: "g1".into(),
            sender_id: "u1".into(),
            body,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn text_preview_truncates() {
        let long = "x".repeat(200);
        let p = message(MessageBody::Text { text: long }).preview();
        assert_eq!(p.excerpt.chars().count(), PREVIEW_LEN + 1);
        assert!(p.excerpt.ends_with('…'));
    }

    #[test]
    fn non_text_previews() {
        let p = message(MessageBody::Image { url: "http://x/y.jpg".into() }).preview();
        assert_eq!(p.excerpt, "[photo]");

        let p = message(MessageBody::Product {
            post_id: "p9".into(),
            label: "Sourdough starter kit".into(),
        })
        .preview();
        assert_eq!(p.excerpt, "Sourdough starter kit");
    }

    #[test]
    fn notification_kind_wire_tags() {
        let kind: NotificationKind = serde_json::from_str("\"new-content\"").unwrap();
        assert_eq!(kind, NotificationKind::NewContent);
        let kind: NotificationKind = serde_json::from_str("\"other\"").unwrap();
        assert_eq!(kind, NotificationKind::Other);
        // Tags outside the enumerated set are a decode error, not a silent
        // fallback — callers drop the whole record.
        assert!(serde_json::from_str::<NotificationKind>("\"mystery-tag\"").is_err());
    }

    #[test]
    fn message_body_flattens_into_wire_shape() {
        let m = message(MessageBody::Text { text: "hi".into() });
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["kind"], "text");
        assert_eq!(v["text"], "hi");
        assert_eq!(v["groupId"], "g1");
    }
}
