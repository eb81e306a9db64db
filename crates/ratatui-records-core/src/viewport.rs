/// Scroll offsets of a viewport over a larger content area, in terminal cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportState {
    pub x: u32,
    pub y: u32,
    pub viewport_w: u16,
    pub viewport_h: u16,
    pub content_w: u32,
    pub content_h: u32,
}

impl ViewportState {
    pub fn set_viewport(&mut self, w: u16, h: u16) {
        (self.viewport_w, self.viewport_h) = (w, h);
        self.clamp();
    }

    pub fn set_content(&mut self, w: u32, h: u32) {
        (self.content_w, self.content_h) = (w, h);
        self.clamp();
    }

    /// Largest `(x, y)` offsets that still keep the viewport filled.
    pub fn max_offset(&self) -> (u32, u32) {
        (
            self.content_w.saturating_sub(self.viewport_w.into()),
            self.content_h.saturating_sub(self.viewport_h.into()),
        )
    }

    pub fn clamp(&mut self) {
        let (max_x, max_y) = self.max_offset();
        self.x = self.x.min(max_x);
        self.y = self.y.min(max_y);
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        self.y = self.y.saturating_add_signed(delta).min(self.max_offset().1);
    }

    pub fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
    }
}
