//! # Cover Page
//!
//! Centers each title line on the page and steps its size down until it
//! clears the side margins or reaches the floor size. A line still too wide
//! at the floor is drawn as-is.

use crate::config::Typography;
use crate::font::{StandardFont, TextMeasure};
use crate::layout::grid::GeometrySpec;
use crate::model::TitleInfo;

/// A line of title text before centering.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleLine {
    pub text: String,
    pub target_y: f64,
    pub base_font_size: f64,
}

/// A centered title line.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTitle {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

/// Box the cover logo is scaled into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub struct CoverPageComposer<'a> {
    geometry: &'a GeometrySpec,
    typography: &'a Typography,
    measure: &'a dyn TextMeasure,
}

impl<'a> CoverPageComposer<'a> {
    pub fn new(
        geometry: &'a GeometrySpec,
        typography: &'a Typography,
        measure: &'a dyn TextMeasure,
    ) -> Self {
        Self {
            geometry,
            typography,
            measure,
        }
    }

    pub fn font(&self) -> StandardFont {
        self.typography.cover_font
    }

    /// The title block: sheet heading, organization code, organization name
    /// and record count, top to bottom. Empty lines are left out.
    pub fn title_lines(&self, info: &TitleInfo, record_count: usize) -> Vec<TitleLine> {
        let g = self.geometry;
        let cover = &g.cover;
        let base = self.typography.cover_base_size;
        [
            (info.sheet_label.clone(), g.from_top(cover.sheet_label_from_top), base),
            (info.organization_code.clone(), g.from_top(cover.code_from_top), base),
            (info.organization_name.clone(), g.from_top(cover.name_from_top), base),
            (
                format!("{} Records", format_count(record_count)),
                g.from_top(cover.count_from_top),
                self.typography.cover_count_size,
            ),
        ]
        .into_iter()
        .filter(|(text, _, _)| !text.trim().is_empty())
        .map(|(text, target_y, base_font_size)| TitleLine {
            text,
            target_y,
            base_font_size,
        })
        .collect()
    }

    /// Center every line on a page `page_width` wide, shrinking lines that
    /// would cross the side margins.
    pub fn layout(&self, title_lines: &[TitleLine], page_width: f64) -> Vec<PlacedTitle> {
        let font = self.typography.cover_font;
        let floor = self.typography.cover_floor_size;
        let step = self.typography.cover_shrink_step;
        let available = page_width - 2.0 * self.geometry.cover.margin;
        let center = page_width / 2.0;

        title_lines
            .iter()
            .map(|line| {
                let mut font_size = line.base_font_size;
                let mut width = self.measure.measure(&line.text, font, font_size);
                while width > available && font_size > floor {
                    font_size = (font_size - step).max(floor);
                    width = self.measure.measure(&line.text, font, font_size);
                }
                if width > available {
                    log::debug!(
                        "cover line {:?} overflows at floor size {}",
                        line.text,
                        font_size
                    );
                }
                PlacedTitle {
                    text: line.text.clone(),
                    x: center - width / 2.0,
                    y: line.target_y,
                    font_size,
                }
            })
            .collect()
    }

    /// Logo box, horizontally centered on the page.
    pub fn logo_box(&self) -> LogoBox {
        let g = self.geometry;
        let width = g.page_width - g.cover.logo_side_inset;
        LogoBox {
            x: g.page_width / 2.0 - width / 2.0,
            y: g.from_top(g.cover.logo_from_top),
            width,
            height: g.cover.logo_height,
        }
    }
}

/// `1234567` → `"1,234,567"`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
