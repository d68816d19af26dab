//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the lifecycle of a single URL (unseen, queued, visited)
//! - `VisitedSet`: the shared set of admitted URLs with atomic insert-if-absent

mod page_state;
mod visited;

// Re-export main types
pub use page_state::PageState;
pub use visited::{Admission, VisitedSet};
