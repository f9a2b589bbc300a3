use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use pantry_sync::{
    Adjustments, Counter, CounterMap, EntityStore, LoadOutcome, PageCursor, PushPlacement,
};
use pantry_types::api::FeedQuery;
use pantry_types::models::{Post, PostId};

use crate::error::ClientError;
use crate::rest::Backend;

/// The post feed and everything the viewer has done to it.
///
/// Liked / saved / shopping-list are not fields on [`Post`]; they live here
/// as id sets filled by dedicated fetches. Comment counts live in their own
/// counter map so an optimistic bump re-renders one badge, not the list.
pub struct FeedContext {
    backend: Arc<dyn Backend>,
    posts: EntityStore<Post>,
    cursor: PageCursor,
    query: FeedQuery,
    liked: HashSet<PostId>,
    saved: HashSet<PostId>,
    listed: HashSet<PostId>,
    comment_counts: CounterMap<PostId>,
    adjustments: Adjustments<PostId>,
    stale: bool,
    fresh_uploads: Counter,
}

impl FeedContext {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            posts: EntityStore::new(PushPlacement::Head),
            cursor: PageCursor::new(),
            query: FeedQuery::default(),
            liked: HashSet::new(),
            saved: HashSet::new(),
            listed: HashSet::new(),
            comment_counts: CounterMap::new(),
            adjustments: Adjustments::new(),
            stale: false,
            fresh_uploads: Counter::new(),
        }
    }

    /// Fetch the next page under the current query. New posts seed their
    /// comment badge from the payload; posts already on screen keep their
    /// local count.
    pub async fn load_posts(&mut self) -> Result<usize, ClientError> {
        let Some(ticket) = self.cursor.try_begin() else {
            return Ok(0);
        };
        match self.backend.posts(ticket.page(), &self.query).await {
            Ok(page) => {
                let received = page.items.len();
                match self
                    .cursor
                    .complete(ticket, received, self.backend.page_size())
                {
                    LoadOutcome::Stale => {
                        debug!("discarding post page for a superseded query");
                        Ok(0)
                    }
                    LoadOutcome::Applied => {
                        if !page.has_more {
                            self.cursor.exhaust();
                        }
                        for post in &page.items {
                            if !self.posts.contains(post.id.as_str()) {
                                self.comment_counts.set(post.id.clone(), post.comment_count);
                            }
                        }
                        Ok(self.posts.merge_next(page.items))
                    }
                }
            }
            Err(e) => {
                self.cursor.fail(ticket);
                Err(e)
            }
        }
    }

    /// Throw the loaded feed away and reload page 1 of the current query.
    /// This is the answer to the staleness signal.
    pub async fn refresh(&mut self) -> Result<usize, ClientError> {
        self.cursor.reset();
        self.posts.clear();
        self.comment_counts.clear_all();
        self.stale = false;
        self.fresh_uploads.clear();
        self.load_posts().await
    }

    /// Fetch the viewer's liked / saved / shopping-list id sets. All three
    /// or nothing: a failure leaves the current sets standing.
    pub async fn load_flags(&mut self) -> Result<(), ClientError> {
        let liked = self.backend.liked_ids().await?;
        let saved = self.backend.saved_ids().await?;
        let listed = self.backend.shopping_list_ids().await?;
        self.liked = liked.into_iter().collect();
        self.saved = saved.into_iter().collect();
        self.listed = listed.into_iter().collect();
        Ok(())
    }

    /// Switch search / author filter. The cursor generation moves on, so a
    /// page still in flight for the old query will be discarded when it
    /// lands. Comment badges die with the discarded feed; returning posts
    /// re-seed theirs from the payload.
    pub fn set_query(&mut self, query: FeedQuery) {
        if self.query == query {
            return;
        }
        self.query = query;
        self.cursor.reset();
        self.posts.clear();
        self.comment_counts.clear_all();
    }

    /// Flip the like flag: confirmed first, then reflected. Returns the new
    /// state.
    pub async fn toggle_liked(&mut self, id: &PostId) -> Result<bool, ClientError> {
        let active = !self.liked.contains(id);
        self.backend.set_liked(id, active).await?;
        if active {
            self.liked.insert(id.clone());
        } else {
            self.liked.remove(id);
        }
        Ok(active)
    }

    pub async fn toggle_saved(&mut self, id: &PostId) -> Result<bool, ClientError> {
        let active = !self.saved.contains(id);
        self.backend.set_saved(id, active).await?;
        if active {
            self.saved.insert(id.clone());
        } else {
            self.saved.remove(id);
        }
        Ok(active)
    }

    pub async fn toggle_listed(&mut self, id: &PostId) -> Result<bool, ClientError> {
        let active = !self.listed.contains(id);
        self.backend.set_listed(id, active).await?;
        if active {
            self.listed.insert(id.clone());
        } else {
            self.listed.remove(id);
        }
        Ok(active)
    }

    /// Comment on a post. The badge bumps before the request goes out and
    /// is rolled back exactly if the backend refuses.
    pub async fn add_comment(&mut self, id: &PostId, text: &str) -> Result<(), ClientError> {
        let adjustment = self
            .adjustments
            .begin(&mut self.comment_counts, id.clone(), 1);
        match self.backend.add_comment(id, text).await {
            Ok(()) => {
                self.adjustments.commit(adjustment);
                Ok(())
            }
            Err(e) => {
                self.adjustments
                    .rollback(&mut self.comment_counts, adjustment);
                Err(e)
            }
        }
    }

    /// Gateway: a post was published or edited. Present id: replaced in
    /// place, local comment badge kept. New id: prepended, badge seeded
    /// from the payload.
    pub fn push_post(&mut self, post: Post) {
        if !self.posts.contains(post.id.as_str()) {
            self.comment_counts.set(post.id.clone(), post.comment_count);
        }
        self.posts.upsert(post);
    }

    /// Gateway: a batch of uploads finished processing server-side. The
    /// loaded feed keeps rendering; it is just flagged stale until the next
    /// [`refresh`](Self::refresh).
    pub fn uploads_complete(&mut self, count: u32) {
        self.stale = true;
        self.fresh_uploads
            .set(self.fresh_uploads.get().saturating_add(count));
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.as_slice()
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    pub fn is_liked(&self, id: &PostId) -> bool {
        self.liked.contains(id)
    }

    pub fn is_saved(&self, id: &PostId) -> bool {
        self.saved.contains(id)
    }

    pub fn is_listed(&self, id: &PostId) -> bool {
        self.listed.contains(id)
    }

    pub fn comment_count(&self, id: &PostId) -> u32 {
        self.comment_counts.get(id)
    }

    /// True when the server signalled new content since the last refresh.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// How many fresh uploads the "new posts" pill should advertise.
    pub fn fresh_uploads(&self) -> u32 {
        self.fresh_uploads.get()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }
}
