//! Page cursor for paginated and historical crawls.
//!
//! Routine runs fetch only the first page. Full-list runs keep going while
//! the previous page produced at least one new record and the site has not
//! reported its last page.
//!
//! ```ignore
//! let mut pages = Pagination::new(ctx.full_list, 1);
//! while let Some(page) = pages.next_page() {
//!     let before = acc.len();
//!     // fetch + submit ...
//!     pages.record(acc.len() - before);
//! }
//! ```

use tracing::debug;

#[derive(Debug, Clone)]
pub struct Pagination {
    full_list: bool,
    next: i64,
    step: i64,
    started: bool,
    last_added: usize,
    finished: bool,
}

impl Pagination {
    /// Ascending cursor starting at `first` (page numbers, offsets, ...).
    pub fn new(full_list: bool, first: i64) -> Self {
        Self::with_step(full_list, first, 1)
    }

    /// Cursor advancing by `step`; a negative step walks backwards (years).
    pub fn with_step(full_list: bool, first: i64, step: i64) -> Self {
        Pagination {
            full_list,
            next: first,
            step,
            started: false,
            last_added: 0,
            finished: false,
        }
    }

    /// The next page to fetch, or `None` when the crawl is over.
    pub fn next_page(&mut self) -> Option<i64> {
        if self.started {
            if self.finished || !self.full_list || self.last_added == 0 {
                debug!(
                    full_list = self.full_list,
                    last_added = self.last_added,
                    finished = self.finished,
                    "Pagination done"
                );
                return None;
            }
            self.next += self.step;
        }
        self.started = true;
        self.last_added = 0;
        Some(self.next)
    }

    /// How many new records the page just fetched produced.
    pub fn record(&mut self, added: usize) {
        self.last_added = added;
    }

    /// The site reported there is nothing after the current page.
    pub fn finish(&mut self) {
        self.finished = true;
    }
}
