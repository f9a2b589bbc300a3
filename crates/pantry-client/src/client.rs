use std::sync::Arc;

use pantry_sync::ProfileDirectory;
use pantry_types::events::PushEvent;

use crate::chats::ChatsContext;
use crate::feed::FeedContext;
use crate::gateway::Gateway;
use crate::notifications::NotificationsContext;
use crate::rest::Backend;

/// The whole client state: one context per surface plus the canonical
/// profile directory.
///
/// Contexts are public fields — the embedding UI drives their load and
/// mutation calls directly. Push traffic goes through [`apply`](Self::apply)
/// so every event is reconciled by exactly one owner, in arrival order.
pub struct Client {
    pub chats: ChatsContext,
    pub notifications: NotificationsContext,
    pub feed: FeedContext,
    pub profiles: ProfileDirectory,
}

impl Client {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            chats: ChatsContext::new(backend.clone()),
            notifications: NotificationsContext::new(backend.clone()),
            feed: FeedContext::new(backend),
            profiles: ProfileDirectory::new(),
        }
    }

    /// Route one push event to its context.
    ///
    /// Synchronous and infallible: two rapid events for the same entity
    /// land sequentially (last write wins), and a push never surfaces an
    /// error — unknown targets degrade to badge-only updates or no-ops.
    pub fn apply(&mut self, event: PushEvent) {
        match event {
            PushEvent::NewMessage(message) => self.chats.push_message(message),
            PushEvent::NewNotification(notification) => {
                self.notifications.push_notification(notification);
            }
            PushEvent::GroupAvatarUpdated {
                group_id,
                avatar_url,
            } => self.chats.update_avatar(&group_id, &avatar_url),
            PushEvent::MadeUpdate(post) => self.feed.push_post(post),
            PushEvent::ProfileUpdated(profile) => {
                self.profiles.upsert(profile);
            }
            PushEvent::UploadsComplete { count } => self.feed.uploads_complete(count),
        }
    }

    /// Drain the gateway into [`apply`](Self::apply) until the peer closes.
    pub async fn run(&mut self, gateway: &mut Gateway) {
        while let Some(event) = gateway.next_event().await {
            self.apply(event);
        }
    }
}
