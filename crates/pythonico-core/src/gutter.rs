//! Line-number gutter.
//!
//! Tracks the block count of the buffer and derives a right-aligned column of line numbers
//! `1..=N`, sized to the number of decimal digits in `N`.

use std::ops::Range;

/// Default margin added to the gutter width, in glyph-width units of the host.
pub const DEFAULT_GUTTER_PADDING: usize = 1;

/// Number of decimal digits needed to print `n` (at least 1).
pub fn digit_count(n: usize) -> usize {
    let mut digits = 1;
    let mut rest = n / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    digits
}

/// Derived line-number display state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNumberGutter {
    line_count: usize,
    digit_width: usize,
    padding: usize,
    visible: Range<usize>,
}

impl LineNumberGutter {
    /// Create a gutter for a buffer with `block_count` blocks.
    pub fn new(block_count: usize) -> Self {
        let mut gutter = Self {
            line_count: 0,
            digit_width: 1,
            padding: DEFAULT_GUTTER_PADDING,
            visible: 0..0,
        };
        gutter.on_block_count_changed(block_count);
        gutter
    }

    /// Override the fixed margin added to the gutter width.
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Recompute the digit width for a new block count.
    ///
    /// Returns `true` if the digit width changed (the host should relayout).
    pub fn on_block_count_changed(&mut self, new_count: usize) -> bool {
        let new_count = new_count.max(1);
        self.line_count = new_count;
        let digit_width = digit_count(new_count);
        if digit_width != self.digit_width {
            tracing::debug!(
                from = self.digit_width,
                to = digit_width,
                lines = new_count,
                "gutter digit width changed"
            );
            self.digit_width = digit_width;
            return true;
        }
        false
    }

    /// Record the visible block range (zero-based, inclusive bounds).
    ///
    /// The gutter does not depend on this for correctness; it only narrows
    /// [`visible_labels`](Self::visible_labels).
    pub fn on_viewport_scroll(&mut self, first_visible_block: usize, last_visible_block: usize) {
        let end = last_visible_block
            .saturating_add(1)
            .min(self.line_count);
        let start = first_visible_block.min(end);
        self.visible = start..end;
    }

    /// Number of lines shown (always equal to the buffer's block count).
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Number of digit cells in the widest line number.
    pub fn digit_width(&self) -> usize {
        self.digit_width
    }

    /// Gutter width given the width of the glyph `'9'` in the host's gutter font.
    pub fn width(&self, glyph_width: usize) -> usize {
        self.digit_width * glyph_width + self.padding
    }

    /// Right-aligned label for a zero-based block index.
    pub fn label(&self, line: usize) -> String {
        format!("{:>width$}", line + 1, width = self.digit_width)
    }

    /// Labels for the range recorded by [`on_viewport_scroll`](Self::on_viewport_scroll).
    pub fn visible_labels(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        self.visible.clone().map(|line| (line, self.label(line)))
    }

    /// The full gutter text: `"1\n2\n...\nN\n"`, each number right-aligned.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.line_count * (self.digit_width + 1));
        for line in 0..self.line_count {
            text.push_str(&self.label(line));
            text.push('\n');
        }
        text
    }
}

impl Default for LineNumberGutter {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(1), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(99), 2);
        assert_eq!(digit_count(100), 3);
        assert_eq!(digit_count(1000), 4);
    }

    #[test]
    fn test_digit_width_matches_log10_bound() {
        // digits >= ceil(log10(count + 1))  <=>  10^digits >= count + 1
        for count in 1..5000usize {
            let digits = digit_count(count) as u32;
            assert!(10usize.pow(digits) > count, "count={count}");
        }
    }

    #[test]
    fn test_empty_document_shows_one() {
        let gutter = LineNumberGutter::new(1);
        assert_eq!(gutter.text(), "1\n");
        assert_eq!(gutter.digit_width(), 1);
    }

    #[test]
    fn test_labels_are_right_aligned() {
        let gutter = LineNumberGutter::new(120);
        assert_eq!(gutter.digit_width(), 3);
        assert_eq!(gutter.label(0), "  1");
        assert_eq!(gutter.label(9), " 10");
        assert_eq!(gutter.label(119), "120");

        let text = gutter.text();
        assert_eq!(text.lines().count(), 120);
        assert_eq!(text.lines().last().map(str::trim), Some("120"));
    }

    #[test]
    fn test_width_uses_glyph_width_and_padding() {
        let gutter = LineNumberGutter::new(1000).with_padding(6);
        assert_eq!(gutter.width(8), 4 * 8 + 6);
    }

    #[test]
    fn test_count_change_reports_width_change() {
        let mut gutter = LineNumberGutter::new(9);
        assert!(!gutter.on_block_count_changed(9));
        assert!(gutter.on_block_count_changed(10));
        assert!(!gutter.on_block_count_changed(11));
        assert!(gutter.on_block_count_changed(9));
        assert_eq!(gutter.digit_width(), 1);
    }

    #[test]
    fn test_visible_labels_clamp_to_line_count() {
        let mut gutter = LineNumberGutter::new(12);
        gutter.on_viewport_scroll(9, 40);
        let labels: Vec<_> = gutter.visible_labels().collect();
        assert_eq!(
            labels,
            vec![(9, "10".to_string()), (10, "11".to_string()), (11, "12".to_string())]
        );
    }
}
