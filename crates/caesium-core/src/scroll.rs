//! Scroll position and scrollbar thumb geometry.

/// Scroll state of a view over `content` rows, `view` of them visible.
///
/// The position is always kept inside `0..=content - view`.
///
/// ```rust
/// use caesium_core::ScrollCalc;
///
/// let mut scroll = ScrollCalc::new(100, 10);
/// scroll.ensure_visible(42, false);
/// assert_eq!(scroll.pos(), 33);
/// assert!(scroll.is_scrollable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCalc {
    content: usize,
    view: usize,
    track: usize,
    thumb_size: usize,
    pos: usize,
    thumb_pos: usize,
}

impl ScrollCalc {
    /// A view at the top; the track spans the whole view.
    pub fn new(content: usize, view: usize) -> Self {
        Self::with_track(content, view, view)
    }

    /// A view whose scrollbar track is `track` cells long.
    pub fn with_track(content: usize, view: usize, track: usize) -> Self {
        let thumb_size = if content == 0 {
            view.max(1)
        } else {
            let ratio = (view * view) as f64 / content as f64;
            (ratio.round() as usize).min(view).max(1)
        };
        let mut calc = Self {
            content,
            view,
            track: if track == 0 { view } else { track },
            thumb_size,
            pos: 0,
            thumb_pos: 0,
        };
        calc.calc();
        calc
    }

    /// Builder-style initial position.
    pub fn at(mut self, pos: usize) -> Self {
        self.set_pos(pos);
        self
    }

    #[inline]
    pub fn content(&self) -> usize {
        self.content
    }

    #[inline]
    pub fn view(&self) -> usize {
        self.view
    }

    #[inline]
    pub fn track(&self) -> usize {
        self.track
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn thumb_size(&self) -> usize {
        self.thumb_size
    }

    #[inline]
    pub fn thumb_pos(&self) -> usize {
        self.thumb_pos
    }

    /// Whether the content is taller than the view.
    #[inline]
    pub fn is_scrollable(&self) -> bool {
        self.content > self.view
    }

    fn max_pos(&self) -> usize {
        self.content.saturating_sub(self.view)
    }

    /// Move to `pos`, clamped to the scrollable range.
    pub fn set_pos(&mut self, pos: usize) {
        let pos = pos.min(self.max_pos());
        if pos != self.pos {
            self.pos = pos;
            self.calc();
        }
    }

    /// Scroll by a signed number of rows.
    pub fn scroll_by(&mut self, delta: isize) {
        self.set_pos(self.pos.saturating_add_signed(delta));
    }

    /// Last content row in view.
    pub fn pos_bottom(&self) -> usize {
        (self.pos + self.view).min(self.content).saturating_sub(1)
    }

    /// Scroll the least amount that brings row `pos` into view, or centre it
    /// when `center` is set and scrolling is needed.
    pub fn ensure_visible(&mut self, pos: usize, center: bool) {
        let half = if center { self.view / 2 } else { 0 };
        if pos < self.pos {
            self.set_pos(pos.saturating_sub(half));
        } else if pos >= self.pos + self.view {
            self.set_pos(pos + 1 - self.view + half);
        }
    }

    fn calc(&mut self) {
        let available = self.track.saturating_sub(self.thumb_size);
        let thumb_pos = if self.is_scrollable() {
            let fraction = self.pos as f64 / self.max_pos() as f64;
            (fraction * available as f64).round() as usize
        } else {
            0
        };
        self.thumb_pos = thumb_pos.min(available);
    }
}
