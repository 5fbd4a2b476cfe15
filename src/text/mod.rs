//! # Text Fitting
//!
//! Greedy word wrapping and shrink-to-fit font sizing for fixed boxes.
//!
//! Words are never split. A word wider than the box is placed on a line of
//! its own and allowed to overflow, so identifiers and house numbers are
//! never mangled. Likewise, a block that still does not fit at the minimum
//! font size is returned at that size rather than rejected.

use crate::font::{StandardFont, TextMeasure};

/// Line height as a multiple of the font size, used when checking fit.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Wrapped lines plus the font size they were wrapped at.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub wrapped_lines: Vec<String>,
    pub font_size: f64,
}

impl FitResult {
    /// Height of the block at [`LINE_HEIGHT_FACTOR`] leading.
    pub fn height(&self) -> f64 {
        self.wrapped_lines.len() as f64 * self.font_size * LINE_HEIGHT_FACTOR
    }
}

pub struct TextFitter<'a> {
    measure: &'a dyn TextMeasure,
}

impl<'a> TextFitter<'a> {
    pub fn new(measure: &'a dyn TextMeasure) -> Self {
        Self { measure }
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Splits on whitespace and accumulates words greedily. The first word
    /// that would overflow the current line starts the next one. Blank input
    /// produces no lines.
    pub fn wrap(&self, text: &str, font: StandardFont, font_size: f64, max_width: f64) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if self.measure.measure(&candidate, font, font_size) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Find the largest size in `[min_size, start_size]` at which `lines`,
    /// wrapped to `max_width`, stack no taller than `max_height`.
    ///
    /// Steps down one point at a time from `start_size`, re-wrapping at each
    /// size, since line counts do not shrink monotonically with the size.
    /// If nothing fits, the result is wrapped at `min_size`.
    pub fn fit<S: AsRef<str>>(
        &self,
        lines: &[S],
        font: StandardFont,
        max_width: f64,
        max_height: f64,
        start_size: f64,
        min_size: f64,
    ) -> FitResult {
        let min_size = min_size.min(start_size);
        let max_steps = (start_size - min_size).ceil() as usize + 1;

        let mut font_size = start_size;
        let mut wrapped_lines = Vec::new();

        for _ in 0..max_steps {
            wrapped_lines = self.wrap_all(lines, font, font_size, max_width);
            let total_height = wrapped_lines.len() as f64 * font_size * LINE_HEIGHT_FACTOR;
            if total_height <= max_height {
                break;
            }
            if font_size <= min_size {
                log::debug!(
                    "text block of {} lines overflows {:.1}pt box at floor size {}",
                    wrapped_lines.len(),
                    max_height,
                    font_size
                );
                break;
            }
            font_size = (font_size - 1.0).max(min_size);
        }

        FitResult {
            wrapped_lines,
            font_size,
        }
    }

    fn wrap_all<S: AsRef<str>>(
        &self,
        lines: &[S],
        font: StandardFont,
        font_size: f64,
        max_width: f64,
    ) -> Vec<String> {
        lines
            .iter()
            .flat_map(|line| self.wrap(line.as_ref(), font, font_size, max_width))
            .collect()
    }
}
