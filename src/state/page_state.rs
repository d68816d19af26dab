/// Page state definitions for tracking crawl progress
///
/// A URL moves `Unseen -> Queued -> Visited` and never leaves `Visited`.
use crate::SitemapError;
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Not yet encountered on any page
    Unseen,

    /// Sitting in the frontier, waiting to be admitted
    Queued,

    /// Admitted to the visited set; fetched (or attempted) and expanded
    Visited,
}

impl PageState {
    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// A seed goes straight from `Unseen` to `Visited` when the frontier is
    /// drained in the same step it is filled, so that edge is allowed too.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::Queued)
                | (Self::Unseen, Self::Visited)
                | (Self::Queued, Self::Visited)
        )
    }

    /// Performs a checked transition
    ///
    /// # Errors
    ///
    /// `SitemapError::InvalidTransition` if the move is not allowed, such as
    /// queueing a URL that is already queued or visited.
    pub fn transition(self, next: PageState) -> Result<PageState, SitemapError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(SitemapError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Queued => "queued",
            Self::Visited => "visited",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(PageState::Unseen.can_transition_to(PageState::Queued));
        assert!(PageState::Queued.can_transition_to(PageState::Visited));
        assert!(PageState::Unseen.can_transition_to(PageState::Visited));
    }

    #[test]
    fn test_visited_never_regresses() {
        assert!(!PageState::Visited.can_transition_to(PageState::Queued));
        assert!(!PageState::Visited.can_transition_to(PageState::Unseen));
        assert!(!PageState::Visited.can_transition_to(PageState::Visited));
    }

    #[test]
    fn test_queued_cannot_requeue() {
        assert!(!PageState::Queued.can_transition_to(PageState::Queued));
        assert!(!PageState::Queued.can_transition_to(PageState::Unseen));
    }

    #[test]
    fn test_checked_transition_error() {
        let err = PageState::Visited.transition(PageState::Queued).unwrap_err();
        assert!(matches!(
            err,
            SitemapError::InvalidTransition {
                from: PageState::Visited,
                to: PageState::Queued
            }
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(PageState::Queued.to_string(), "queued");
    }
}
