//! Crawl frontier
//!
//! A FIFO queue of canonical URLs waiting to be admitted. Popping in FIFO
//! order is what makes the crawl breadth-first: pages come out in
//! non-decreasing link distance from the seed, and pages at the same
//! distance in the document order of the page that found them.

use crate::state::{PageState, VisitedSet};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// Canonical absolute URL
    pub url: Url,

    /// Link hops from the seed
    pub depth: u32,
}

impl QueuedUrl {
    pub fn seed(url: Url) -> Self {
        Self { url, depth: 0 }
    }
}

/// FIFO frontier that refuses URLs already queued or visited
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    queued: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state of `url` as seen by this frontier
    pub fn state_of(&self, url: &str, visited: &VisitedSet) -> PageState {
        if visited.contains(url) {
            PageState::Visited
        } else if self.queued.contains(url) {
            PageState::Queued
        } else {
            PageState::Unseen
        }
    }

    /// Appends a URL to the tail if it is still unseen
    ///
    /// Returns true if the URL was queued.
    pub fn enqueue(&mut self, entry: QueuedUrl, visited: &VisitedSet) -> bool {
        let state = self.state_of(entry.url.as_str(), visited);
        if let Err(e) = state.transition(PageState::Queued) {
            tracing::trace!("Not queueing {}: {}", entry.url, e);
            return false;
        }

        self.queued.insert(entry.url.as_str().to_string());
        self.queue.push_back(entry);
        true
    }

    /// Removes and returns the head of the queue
    pub fn pop(&mut self) -> Option<QueuedUrl> {
        let entry = self.queue.pop_front()?;
        self.queued.remove(entry.url.as_str());
        Some(entry)
    }

    /// Drops every queued URL
    pub fn clear(&mut self) {
        self.queue.clear();
        self.queued.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
