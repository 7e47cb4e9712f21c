//! Scroll position of the main content area and the reading progress it
//! implies.

/// Offset into content that is `content_height` rows tall, seen through a
/// viewport of `viewport_height` rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: u16,
    content_height: u16,
    viewport_height: u16,
}

impl ScrollState {
    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Update sizes after a layout pass, keeping the offset in range
    pub fn set_dimensions(&mut self, content_height: u16, viewport_height: u16) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = (self.offset as i32 + delta).clamp(0, self.max_offset() as i32);
        self.offset = next as u16;
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.viewport_height.saturating_sub(1).max(1) as i32);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.viewport_height.saturating_sub(1).max(1) as i32));
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
    }

    pub fn to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Keep rows `top..top + height` visible
    pub fn reveal(&mut self, top: u16, height: u16) {
        if top < self.offset {
            self.offset = top;
        } else if top + height > self.offset + self.viewport_height {
            self.offset = (top + height).saturating_sub(self.viewport_height);
        }
        self.offset = self.offset.min(self.max_offset());
    }

    /// Percentage read, 0 when everything fits
    pub fn progress(&self) -> f64 {
        let max = self.max_offset();
        if max == 0 {
            return 0.0;
        }
        (self.offset as f64 / max as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_zero_when_content_fits() {
        let mut scroll = ScrollState::default();
        scroll.set_dimensions(10, 20);
        scroll.scroll_by(5);
        assert_eq!(scroll.offset(), 0);
        assert_eq!(scroll.progress(), 0.0);
    }

    #[test]
    fn test_progress_tracks_offset() {
        let mut scroll = ScrollState::default();
        scroll.set_dimensions(120, 20);
        scroll.scroll_by(50);
        assert_eq!(scroll.progress(), 50.0);
        scroll.to_bottom();
        assert_eq!(scroll.progress(), 100.0);
        scroll.page_up();
        assert_eq!(scroll.offset(), 81);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut scroll = ScrollState::default();
        scroll.set_dimensions(100, 10);
        scroll.to_bottom();
        scroll.set_dimensions(30, 10);
        assert_eq!(scroll.offset(), 20);
    }

    #[test]
    fn test_reveal() {
        let mut scroll = ScrollState::default();
        scroll.set_dimensions(100, 10);
        scroll.reveal(40, 3);
        assert_eq!(scroll.offset(), 33);
        scroll.reveal(5, 2);
        assert_eq!(scroll.offset(), 5);
    }
}
