use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use pantry_sync::{CounterMap, EntityStore, LoadOutcome, PageCursor, PushPlacement};
use pantry_types::models::{ChatGroup, GroupId, Message, MessageBody};

use crate::error::ClientError;
use crate::rest::Backend;

/// Loaded message history for one group.
///
/// Messages run oldest to newest; page 1 is the most recent slice and every
/// further page is older history prepended as a block.
pub struct Conversation {
    messages: EntityStore<Message>,
    cursor: PageCursor,
}

impl Default for Conversation {
    fn default() -> Self {
        Self {
            messages: EntityStore::new(PushPlacement::Tail),
            cursor: PageCursor::new(),
        }
    }
}

impl Conversation {
    pub fn messages(&self) -> &[Message] {
        self.messages.as_slice()
    }

    /// Whether an older history page is still available.
    pub fn has_older(&self) -> bool {
        self.cursor.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.cursor.is_loading()
    }
}

/// Group messaging state: the group list, per-group conversations, and the
/// per-group unread badges.
pub struct ChatsContext {
    backend: Arc<dyn Backend>,
    groups: EntityStore<ChatGroup>,
    group_cursor: PageCursor,
    conversations: HashMap<GroupId, Conversation>,
    unread: CounterMap<GroupId>,
    open: Option<GroupId>,
}

impl ChatsContext {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            groups: EntityStore::new(PushPlacement::Head),
            group_cursor: PageCursor::new(),
            conversations: HashMap::new(),
            unread: CounterMap::new(),
            open: None,
        }
    }

    /// Fetch the next page of groups. Returns how many new groups appeared;
    /// 0 when a load is already running or the list is exhausted.
    pub async fn load_groups(&mut self) -> Result<usize, ClientError> {
        let Some(ticket) = self.group_cursor.try_begin() else {
            return Ok(0);
        };
        match self.backend.chat_groups(ticket.page()).await {
            Ok(page) => {
                let received = page.items.len();
                match self
                    .group_cursor
                    .complete(ticket, received, self.backend.page_size())
                {
                    LoadOutcome::Stale => Ok(0),
                    LoadOutcome::Applied => {
                        if !page.has_more {
                            self.group_cursor.exhaust();
                        }
                        Ok(self.groups.merge_next(page.items))
                    }
                }
            }
            Err(e) => {
                self.group_cursor.fail(ticket);
                Err(e)
            }
        }
    }

    /// Select a group: its unread badge clears and, if nothing is loaded
    /// yet, the most recent message page comes in.
    pub async fn open_group(&mut self, id: &GroupId) -> Result<(), ClientError> {
        self.open = Some(id.clone());
        self.unread.clear(id);
        let loaded = self
            .conversations
            .get(id)
            .is_some_and(|c| !c.messages.is_empty());
        if !loaded {
            self.load_older(id).await?;
        }
        Ok(())
    }

    pub fn close_group(&mut self) {
        self.open = None;
    }

    /// Fetch the next (older) history page for a group and prepend it.
    /// Also serves the first page for a conversation that has none yet.
    pub async fn load_older(&mut self, id: &GroupId) -> Result<usize, ClientError> {
        let convo = self.conversations.entry(id.clone()).or_default();
        let Some(ticket) = convo.cursor.try_begin() else {
            return Ok(0);
        };
        match self.backend.messages(id, ticket.page()).await {
            Ok(page) => {
                let received = page.items.len();
                match convo
                    .cursor
                    .complete(ticket, received, self.backend.page_size())
                {
                    LoadOutcome::Stale => Ok(0),
                    LoadOutcome::Applied => {
                        if !page.has_more {
                            convo.cursor.exhaust();
                        }
                        Ok(convo.messages.merge_older(page.items))
                    }
                }
            }
            Err(e) => {
                convo.cursor.fail(ticket);
                Err(e)
            }
        }
    }

    /// Post a message and merge the backend's confirmed copy. There is no
    /// locally-fabricated echo: ids are backend-assigned, so the message
    /// appears once the reply (or the gateway, whichever is first) carries
    /// it back.
    pub async fn send_message(
        &mut self,
        id: &GroupId,
        body: MessageBody,
    ) -> Result<(), ClientError> {
        let message = self.backend.send_message(id, &body).await?;
        let preview = message.preview();
        if let Some(convo) = self.conversations.get_mut(id) {
            convo.messages.upsert(message);
        }
        self.groups
            .update(id.as_str(), |g| g.last_message = Some(preview));
        Ok(())
    }

    /// Gateway: someone posted to a group.
    ///
    /// Unloaded conversation: the entity is dropped (history loads fresh on
    /// open) but the badge still ticks. Open group: no badge, the user is
    /// looking at it.
    pub fn push_message(&mut self, message: Message) {
        let group_id = message.group_id.clone();
        let preview = message.preview();
        let is_open = self.open.as_ref() == Some(&group_id);

        match self.conversations.get_mut(&group_id) {
            Some(convo) => {
                convo.messages.upsert(message);
            }
            None => {
                debug!("message for unloaded group {}, badge only", group_id);
            }
        }
        if !is_open {
            self.unread.increment(group_id.clone());
        }
        self.groups
            .update(group_id.as_str(), |g| g.last_message = Some(preview));
    }

    /// Gateway: a group's avatar changed. No-op when the group list page
    /// carrying it was never loaded.
    pub fn update_avatar(&mut self, id: &GroupId, url: &str) {
        let hit = self
            .groups
            .update(id.as_str(), |g| g.avatar_url = Some(url.to_owned()));
        if !hit {
            debug!("avatar update for unloaded group {}", id);
        }
    }

    pub fn groups(&self) -> &[ChatGroup] {
        self.groups.as_slice()
    }

    pub fn has_more_groups(&self) -> bool {
        self.group_cursor.has_more()
    }

    pub fn open(&self) -> Option<&GroupId> {
        self.open.as_ref()
    }

    pub fn conversation(&self, id: &GroupId) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    /// Unread badge for one group.
    pub fn unread(&self, id: &GroupId) -> u32 {
        self.unread.get(id)
    }

    /// Sum of all group badges, for the chats tab itself.
    pub fn unread_total(&self) -> u64 {
        self.unread.total()
    }
}
