//! Shared visited set
//!
//! The visited set is the only state shared between the coordinator and
//! anything observing the crawl. Its insert-if-absent is atomic, which is
//! what keeps two workers from ever processing the same URL.

use dashmap::DashSet;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Outcome of trying to admit a URL into the visited set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The URL was not present and has been inserted
    Admitted,
    /// The URL was already present
    AlreadyVisited,
    /// The set is at its page limit; nothing was inserted
    LimitReached,
}

#[derive(Debug, Default)]
struct Inner {
    urls: DashSet<String>,
    // Slots reserved against the page limit
    reserved: AtomicUsize,
}

/// Set of canonical URLs already admitted to the crawl
///
/// Cloning is cheap and yields a handle to the same set.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    inner: Arc<Inner>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `url` if it is absent and fewer than `limit` URLs were admitted
    ///
    /// This is the crawl's insert-if-absent. A slot is reserved against the
    /// limit before the insert and given back if another caller won the
    /// race for the same URL, so the set never holds more than `limit` URLs.
    pub fn admit(&self, url: &str, limit: Option<usize>) -> Admission {
        if self.inner.urls.contains(url) {
            return Admission::AlreadyVisited;
        }

        let reserved = match limit {
            Some(max) => self
                .inner
                .reserved
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                    (n < max).then_some(n + 1)
                })
                .is_ok(),
            None => {
                self.inner.reserved.fetch_add(1, Ordering::AcqRel);
                true
            }
        };
        if !reserved {
            return Admission::LimitReached;
        }

        if self.inner.urls.insert(url.to_string()) {
            Admission::Admitted
        } else {
            self.inner.reserved.fetch_sub(1, Ordering::AcqRel);
            Admission::AlreadyVisited
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.inner.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.inner.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.urls.is_empty()
    }

    /// Copies the current members into a sorted set
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.inner.urls.iter().map(|url| url.key().clone()).collect()
    }
}
