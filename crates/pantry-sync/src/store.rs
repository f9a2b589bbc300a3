use std::collections::HashSet;

use pantry_types::models::{ChatGroup, Message, Notification, Post};

/// Anything an [`EntityStore`] can hold: a record with a backend-assigned
/// string id.
pub trait Record {
    fn id(&self) -> &str;
}

impl Record for ChatGroup {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Message {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Notification {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Post {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

/// Where a pushed entity with an unseen id lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushPlacement {
    /// Newest-first collections: notifications, the post feed.
    Head,
    /// Chronological collections: message lists.
    Tail,
}

/// What [`EntityStore::upsert`] did with a pushed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Inserted,
    Replaced,
}

/// De-duplicated, ordered collection for one entity type.
///
/// One owner mutates the store; views read between mutations. After any
/// merge no two entries share an id — fetch results and push events may
/// overlap freely (a push can land before the page that would have carried
/// the same entity resolves).
#[derive(Debug)]
pub struct EntityStore<T> {
    items: Vec<T>,
    seen: HashSet<String>,
    push_placement: PushPlacement,
}

impl<T: Record> EntityStore<T> {
    pub fn new(push_placement: PushPlacement) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            push_placement,
        }
    }

    /// Append a fetched page, skipping ids already present. Returns how many
    /// entities were actually added.
    pub fn merge_next(&mut self, page: Vec<T>) -> usize {
        let mut added = 0;
        for item in page {
            if self.seen.insert(item.id().to_owned()) {
                self.items.push(item);
                added += 1;
            }
        }
        added
    }

    /// Prepend an older history page as one block: the block keeps its own
    /// internal order, duplicates are dropped, nothing already stored moves.
    pub fn merge_older(&mut self, page: Vec<T>) -> usize {
        let mut block: Vec<T> = Vec::with_capacity(page.len());
        for item in page {
            if self.seen.insert(item.id().to_owned()) {
                block.push(item);
            }
        }
        let added = block.len();
        if added > 0 {
            block.append(&mut self.items);
            self.items = block;
        }
        added
    }

    /// Push-event merge. A present id is replaced in place — position
    /// untouched, last write wins; an absent id is inserted at this store's
    /// push placement.
    pub fn upsert(&mut self, item: T) -> Applied {
        if let Some(slot) = self.items.iter_mut().find(|e| e.id() == item.id()) {
            *slot = item;
            return Applied::Replaced;
        }
        self.seen.insert(item.id().to_owned());
        match self.push_placement {
            PushPlacement::Head => self.items.insert(0, item),
            PushPlacement::Tail => self.items.push(item),
        }
        Applied::Inserted
    }

    /// Swap a backend-confirmed update into place. `false` when the entity
    /// was never loaded (the caller decides whether that matters).
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|e| e.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Field-merge on a loaded entity without moving it. `false` when absent.
    pub fn update<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.items.iter_mut().find(|e| e.id() == id) {
            Some(slot) => {
                f(slot);
                true
            }
            None => false,
        }
    }

    /// Flip every entry through `f` (bulk status changes, e.g. read flags).
    pub fn update_all<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        for item in &mut self.items {
            f(item);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        id: String,
        val: u32,
    }

    impl Rec {
        fn new(id: &str, val: u32) -> Self {
            Self { id: id.to_owned(), val }
        }
    }

    impl Record for Rec {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn ids<T: Record>(store: &EntityStore<T>) -> Vec<&str> {
        store.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn merge_is_idempotent() {
        let mut store = EntityStore::new(PushPlacement::Head);
        let page = vec![Rec::new("a", 1), Rec::new("b", 2), Rec::new("c", 3)];
        assert_eq!(store.merge_next(page.clone()), 3);
        assert_eq!(store.merge_next(page), 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn merge_next_skips_only_duplicates() {
        let mut store = EntityStore::new(PushPlacement::Head);
        store.merge_next(vec![Rec::new("a", 1), Rec::new("b", 2)]);
        // Server offset drift: page 2 re-serves "b".
        let added = store.merge_next(vec![Rec::new("b", 9), Rec::new("c", 3)]);
        assert_eq!(added, 1);
        assert_eq!(ids(&store), ["a", "b", "c"]);
        // The duplicate did not overwrite the stored entity.
        assert_eq!(store.get("b").unwrap().val, 2);
    }

    #[test]
    fn merge_older_prepends_block_in_order() {
        let mut store = EntityStore::new(PushPlacement::Tail);
        store.merge_next(vec![Rec::new("m3", 0), Rec::new("m4", 0)]);
        let added = store.merge_older(vec![Rec::new("m1", 0), Rec::new("m2", 0), Rec::new("m3", 0)]);
        assert_eq!(added, 2);
        assert_eq!(ids(&store), ["m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn upsert_is_last_write_wins_in_place() {
        let mut store = EntityStore::new(PushPlacement::Tail);
        store.merge_next(vec![Rec::new("a", 1), Rec::new("b", 1), Rec::new("c", 1)]);
        assert_eq!(store.upsert(Rec::new("b", 7)), Applied::Replaced);
        assert_eq!(store.upsert(Rec::new("b", 8)), Applied::Replaced);
        assert_eq!(ids(&store), ["a", "b", "c"]);
        assert_eq!(store.get("b").unwrap().val, 8);
    }

    #[test]
    fn upsert_inserts_at_placement() {
        let mut head = EntityStore::new(PushPlacement::Head);
        head.merge_next(vec![Rec::new("a", 0)]);
        head.upsert(Rec::new("new", 0));
        assert_eq!(ids(&head), ["new", "a"]);

        let mut tail = EntityStore::new(PushPlacement::Tail);
        tail.merge_next(vec![Rec::new("a", 0)]);
        tail.upsert(Rec::new("new", 0));
        assert_eq!(ids(&tail), ["a", "new"]);
    }

    #[test]
    fn replace_misses_unloaded_entities() {
        let mut store = EntityStore::new(PushPlacement::Head);
        store.merge_next(vec![Rec::new("a", 1)]);
        assert!(store.replace(Rec::new("a", 2)));
        assert!(!store.replace(Rec::new("zz", 2)));
        assert_eq!(store.get("a").unwrap().val, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_edits_in_place() {
        let mut store = EntityStore::new(PushPlacement::Head);
        store.merge_next(vec![Rec::new("a", 1), Rec::new("b", 1)]);
        assert!(store.update("b", |r| r.val = 42));
        assert!(!store.update("nope", |r| r.val = 42));
        assert_eq!(ids(&store), ["a", "b"]);
        assert_eq!(store.get("b").unwrap().val, 42);
    }

    #[test]
    fn clear_forgets_seen_ids() {
        let mut store = EntityStore::new(PushPlacement::Head);
        store.merge_next(vec![Rec::new("a", 1)]);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.merge_next(vec![Rec::new("a", 5)]), 1);
        assert_eq!(store.get("a").unwrap().val, 5);
    }
}
