//! # Sheet Driver
//!
//! Drives one complete sheet into a [`RenderSurface`]: the cover page, then
//! every record's row of label copies in record order, with a page break
//! each time the grid fills. Draw plans are computed per record and
//! submitted immediately, so the surface sees calls in document order.

use crate::config::SheetConfig;
use crate::error::LabelError;
use crate::font::TextMeasure;
use crate::layout::{CoverPageComposer, DrawPlan, GridLayout, LabelComposer};
use crate::model::{Record, TitleInfo};
use crate::surface::RenderSurface;

/// What one pass put on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetSummary {
    pub records: usize,
    pub cover_pages: usize,
    pub label_pages: usize,
    pub barcodes: usize,
    /// Label cells whose text did not fit even at the minimum size.
    pub overflowing_labels: usize,
    pub logo_drawn: bool,
}

impl SheetSummary {
    pub fn total_pages(&self) -> usize {
        self.cover_pages + self.label_pages
    }
}

/// Render `records` as a cover page (when `title_info` is given) followed by
/// label pages, then finalize the surface.
///
/// Configuration is validated before the first draw call, so an invalid
/// config leaves the surface untouched. Surface errors propagate as soon as
/// they occur and `finalize` is not called in that case.
pub fn render_sheet(
    records: &[Record],
    config: &SheetConfig,
    title_info: Option<&TitleInfo>,
    measure: &dyn TextMeasure,
    surface: &mut dyn RenderSurface,
) -> Result<SheetSummary, LabelError> {
    config.validate()?;
    let geometry = &config.geometry;
    let grid = GridLayout::new(geometry)?;
    let composer = LabelComposer::new(grid, &config.typography, measure)?;

    let mut summary = SheetSummary {
        records: records.len(),
        ..Default::default()
    };

    if let Some(info) = title_info {
        let cover = CoverPageComposer::new(geometry, &config.typography, measure);
        summary.logo_drawn = draw_cover(&cover, info, records.len(), geometry.page_width, surface)?;
        summary.cover_pages = 1;
    }

    for (record_index, record) in records.iter().enumerate() {
        let grid = composer.grid();
        let first_label = record_index == 0;
        if first_label || grid.starts_new_page(record_index) {
            if !first_label || title_info.is_some() {
                surface.new_page()?;
            }
            summary.label_pages += 1;
            log::debug!(
                "label page {} starts at record {}",
                summary.label_pages,
                record_index
            );
        }

        for plan in composer.compose_row(record, record_index) {
            if draw_label(&plan, config, surface)? {
                summary.barcodes += 1;
            }
            if plan.fitted.height() > geometry.text_area_height() {
                summary.overflowing_labels += 1;
            }
        }
    }

    surface.finalize()?;

    log::info!(
        "rendered {} record(s) on {} page(s) with {} barcode(s)",
        summary.records,
        summary.total_pages(),
        summary.barcodes
    );
    if summary.overflowing_labels > 0 {
        log::info!(
            "{} label(s) overflow their text area at the minimum size",
            summary.overflowing_labels
        );
    }
    Ok(summary)
}

/// Logo first, then the title block. Returns whether the logo was drawn.
fn draw_cover(
    cover: &CoverPageComposer<'_>,
    info: &TitleInfo,
    record_count: usize,
    page_width: f64,
    surface: &mut dyn RenderSurface,
) -> Result<bool, LabelError> {
    let mut logo_drawn = false;
    if let Some(source) = info.logo.as_deref().filter(|s| !s.trim().is_empty()) {
        let b = cover.logo_box();
        match surface.draw_image(source, b.x, b.y, b.width, b.height) {
            Ok(()) => logo_drawn = true,
            Err(LabelError::ImageError(msg)) => {
                log::warn!("cover logo skipped: {}", msg);
            }
            Err(e) => return Err(e),
        }
    }

    let lines = cover.title_lines(info, record_count);
    for title in cover.layout(&lines, page_width) {
        surface.draw_text(title.x, title.y, &title.text, cover.font(), title.font_size)?;
    }
    Ok(logo_drawn)
}

/// Submit one label copy. Returns whether a barcode was drawn.
fn draw_label(
    plan: &DrawPlan,
    config: &SheetConfig,
    surface: &mut dyn RenderSurface,
) -> Result<bool, LabelError> {
    let font = plan.font;
    let size = plan.fitted.font_size;
    let drew_barcode = match &plan.barcode {
        Some(b) => {
            surface.draw_barcode(&b.payload, b.x, b.y, b.height, &config.barcode)?;
            true
        }
        None => false,
    };
    for text in &plan.texts {
        surface.draw_text(text.x, text.y, &text.text, font, size)?;
    }
    Ok(drew_barcode)
}
