use tracing::debug;

/// Claim on one page fetch, handed out by [`PageCursor::try_begin`]. The
/// generation inside it is what lets a later `reset` invalidate the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    page: u32,
    generation: u64,
}

impl LoadTicket {
    /// 1-based page number to request.
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// What [`PageCursor::complete`] decided about a resolved load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum LoadOutcome {
    /// The response belongs to the current query; merge it.
    Applied,
    /// The cursor was reset while the request was in flight. Drop the
    /// response on the floor.
    Stale,
}

/// Page / has-more bookkeeping for one collection's infinite scroll.
///
/// Two rules hold at all times: at most one page request is in flight per
/// collection, and a response that resolves after a `reset` is discarded by
/// generation mismatch instead of being merged into the wrong query's
/// results.
#[derive(Debug)]
pub struct PageCursor {
    page: u32,
    has_more: bool,
    in_flight: bool,
    generation: u64,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    pub fn new() -> Self {
        Self {
            page: 1,
            has_more: true,
            in_flight: false,
            generation: 0,
        }
    }

    /// Claim the next page. `None` while a load is already in flight or when
    /// the collection is exhausted — callers treat `None` as "nothing to do".
    pub fn try_begin(&mut self) -> Option<LoadTicket> {
        if self.in_flight || !self.has_more {
            return None;
        }
        self.in_flight = true;
        Some(LoadTicket {
            page: self.page,
            generation: self.generation,
        })
    }

    /// Settle a resolved load of `received` items against the page size.
    /// A short page means the collection is exhausted.
    pub fn complete(&mut self, ticket: LoadTicket, received: usize, page_size: usize) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(page = ticket.page, "discarding stale page response");
            return LoadOutcome::Stale;
        }
        self.in_flight = false;
        self.page += 1;
        if received < page_size {
            self.has_more = false;
        }
        LoadOutcome::Applied
    }

    /// A load failed: re-arm without advancing. Already-loaded pages stay
    /// valid and the same page can be retried.
    pub fn fail(&mut self, ticket: LoadTicket) {
        if ticket.generation == self.generation {
            self.in_flight = false;
        }
    }

    /// The server said there is nothing further even though the page was
    /// full (`hasMore: false` on a full page).
    pub fn exhaust(&mut self) {
        self.has_more = false;
    }

    /// Start over for a new query (changed filters, switched profile). Any
    /// in-flight response becomes stale.
    pub fn reset(&mut self) {
        self.page = 1;
        self.has_more = true;
        self.in_flight = false;
        self.generation += 1;
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }
}
