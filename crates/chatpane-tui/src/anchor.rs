//! Scroll target that sits after the last transcript row

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Invisible trailing anchor. The transcript asks it to scroll into view
/// whenever its inputs change; the request is picked up once the frame's
/// layout is known.
#[derive(Debug, Default)]
pub struct ScrollAnchor {
    requests: u64,
    pending: Option<ScrollBehavior>,
}

impl ScrollAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_into_view(&mut self, behavior: ScrollBehavior) {
        self.requests += 1;
        self.pending = Some(behavior);
    }

    pub fn take_pending(&mut self) -> Option<ScrollBehavior> {
        self.pending.take()
    }

    /// Number of scroll-into-view calls received so far
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_counted_and_taken_once() {
        let mut anchor = ScrollAnchor::new();
        anchor.scroll_into_view(ScrollBehavior::Smooth);
        assert_eq!(anchor.requests(), 1);
        assert_eq!(anchor.take_pending(), Some(ScrollBehavior::Smooth));
        assert_eq!(anchor.take_pending(), None);
        assert_eq!(anchor.requests(), 1);
    }

    #[test]
    fn test_latest_behavior_wins() {
        let mut anchor = ScrollAnchor::new();
        anchor.scroll_into_view(ScrollBehavior::Smooth);
        anchor.scroll_into_view(ScrollBehavior::Instant);
        assert_eq!(anchor.requests(), 2);
        assert_eq!(anchor.take_pending(), Some(ScrollBehavior::Instant));
    }
}
