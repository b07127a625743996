//! Selection and scroll over a list that is shown through a fixed-height window.

/// Selected row and first visible row of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListCursor {
    pub selection: usize,
    pub scroll: usize,
}

impl ListCursor {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clamps the selection into `0..len` and scrolls the least amount that
    /// keeps it inside a window of `height` rows.
    pub fn clamp(&mut self, len: usize, height: usize) {
        let height = height.max(1);
        self.selection = self.selection.min(len.saturating_sub(1));

        if self.selection < self.scroll {
            self.scroll = self.selection;
        }
        if self.selection >= self.scroll + height {
            self.scroll = self.selection + 1 - height;
        }
    }

    pub fn down(&mut self, len: usize) {
        self.selection = (self.selection + 1).min(len.saturating_sub(1));
    }

    pub fn up(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    pub fn page_down(&mut self, len: usize, page: usize) {
        self.selection = (self.selection + page).min(len.saturating_sub(1));
    }

    pub fn page_up(&mut self, page: usize) {
        self.selection = self.selection.saturating_sub(page);
    }

    /// Indices visible in a window of `height` rows over `len` items.
    pub fn visible(&self, len: usize, height: usize) -> std::ops::Range<usize> {
        let start = self.scroll.min(len);
        start..(start + height).min(len)
    }
}
