// Scroll state for the transcript panel
//
// Auto-follow keeps the view pinned to the newest turn, exactly like a chat
// window that scrolls to the bottom when a message arrives. Scrolling up
// hands control to the user; scrolling back to the bottom re-enables
// auto-follow.

/// Scroll state: position, content size, viewport size.
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Line index at the top of the viewport
    offset: usize,

    /// Total number of content lines
    total: usize,

    /// Number of lines visible in the viewport
    viewport: usize,

    /// Whether new content keeps the view at the bottom
    pub auto_follow: bool,
}

impl ScrollState {
    /// New scroll state with auto-follow enabled
    pub fn new() -> Self {
        Self {
            offset: 0,
            total: 0,
            viewport: 0,
            auto_follow: true,
        }
    }

    /// Update content and viewport dimensions.
    /// Call this each render frame with current sizes.
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;

        if self.auto_follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Scroll up one line. Disables auto-follow (user took control).
    pub fn scroll_up(&mut self) {
        if self.offset > 0 {
            self.offset -= 1;
            self.auto_follow = false;
        }
    }

    /// Scroll down one line. Re-enables auto-follow at the bottom.
    pub fn scroll_down(&mut self) {
        if self.offset < self.max_offset() {
            self.offset += 1;
        }
        if self.offset >= self.max_offset() {
            self.auto_follow = true;
        }
    }

    /// Scroll up by one viewport
    pub fn page_up(&mut self) {
        let page = self.viewport.max(1);
        self.offset = self.offset.saturating_sub(page);
        self.auto_follow = false;
    }

    /// Scroll down by one viewport
    pub fn page_down(&mut self) {
        let page = self.viewport.max(1);
        self.offset = (self.offset + page).min(self.max_offset());
        if self.offset >= self.max_offset() {
            self.auto_follow = true;
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_follow_snaps_to_bottom() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(100, 20);
        assert_eq!(scroll.offset(), 80);

        // More content arrives, still following
        scroll.update_dimensions(110, 20);
        assert_eq!(scroll.offset(), 90);
    }

    #[test]
    fn scrolling_up_takes_control() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(100, 20);

        scroll.scroll_up();
        assert!(!scroll.auto_follow);
        assert_eq!(scroll.offset(), 79);

        // New content no longer drags the view down
        scroll.update_dimensions(120, 20);
        assert_eq!(scroll.offset(), 79);
    }

    #[test]
    fn reaching_bottom_reenables_follow() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(25, 20);
        scroll.scroll_up();
        assert!(!scroll.auto_follow);

        scroll.scroll_down();
        assert!(scroll.auto_follow);
    }

    #[test]
    fn paging_clamps_to_content() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(50, 20);

        scroll.page_up();
        scroll.page_up();
        assert_eq!(scroll.offset(), 0);

        scroll.page_down();
        scroll.page_down();
        assert_eq!(scroll.offset(), 30);
        assert!(scroll.auto_follow);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(5, 20);
        assert_eq!(scroll.offset(), 0);

        scroll.scroll_up();
        assert_eq!(scroll.offset(), 0);
    }
}
