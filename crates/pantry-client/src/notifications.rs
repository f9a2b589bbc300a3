use std::sync::Arc;

use pantry_sync::{Applied, Counter, EntityStore, LoadOutcome, PageCursor, PushPlacement};
use pantry_types::models::{Notification, NotificationId};

use crate::error::ClientError;
use crate::rest::Backend;

/// Notification inbox: newest first, plus the global unread badge.
///
/// The badge is kept apart from the list so it can be current before any
/// page has loaded, and so a badge tick never touches the entities. The
/// server's `unread_count` is authoritative; local increments and
/// decrements only track it between refreshes.
pub struct NotificationsContext {
    backend: Arc<dyn Backend>,
    store: EntityStore<Notification>,
    cursor: PageCursor,
    unread: Counter,
}

impl NotificationsContext {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            store: EntityStore::new(PushPlacement::Head),
            cursor: PageCursor::new(),
            unread: Counter::new(),
        }
    }

    /// Pull the authoritative unread count, overriding any local drift.
    pub async fn refresh_unread(&mut self) -> Result<u32, ClientError> {
        let count = self.backend.unread_count().await?;
        self.unread.set(count);
        Ok(count)
    }

    /// Fetch the next page and append it. Returns how many notifications
    /// were new; 0 when a load is already running or the list is exhausted.
    pub async fn load_more(&mut self) -> Result<usize, ClientError> {
        let Some(ticket) = self.cursor.try_begin() else {
            return Ok(0);
        };
        match self.backend.notifications(ticket.page()).await {
            Ok(page) => {
                let received = page.items.len();
                match self
                    .cursor
                    .complete(ticket, received, self.backend.page_size())
                {
                    LoadOutcome::Stale => Ok(0),
                    LoadOutcome::Applied => {
                        if !page.has_more {
                            self.cursor.exhaust();
                        }
                        Ok(self.store.merge_next(page.items))
                    }
                }
            }
            Err(e) => {
                self.cursor.fail(ticket);
                Err(e)
            }
        }
    }

    /// Mark one notification read. The badge drops only when the flag
    /// actually flipped, so repeat calls cannot drive it below the truth.
    pub async fn mark_read(&mut self, id: &NotificationId) -> Result<(), ClientError> {
        self.backend.mark_read(id).await?;
        let mut flipped = false;
        self.store.update(id.as_str(), |n| {
            if !n.read {
                n.read = true;
                flipped = true;
            }
        });
        if flipped {
            self.unread.decrement();
        }
        Ok(())
    }

    /// Mark everything read and zero the badge. A push landing right after
    /// stays unread and counts exactly one.
    pub async fn mark_all_read(&mut self) -> Result<(), ClientError> {
        self.backend.mark_all_read().await?;
        self.store.update_all(|n| n.read = true);
        self.unread.clear();
        Ok(())
    }

    /// Gateway: a notification was created. Push arrivals are unread no
    /// matter what the payload claims.
    pub fn push_notification(&mut self, mut notification: Notification) {
        notification.read = false;
        if self.store.upsert(notification) == Applied::Inserted {
            self.unread.increment();
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        self.store.as_slice()
    }

    pub fn unread(&self) -> u32 {
        self.unread.get()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }
}
