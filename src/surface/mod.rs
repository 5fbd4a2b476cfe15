//! # Render Surfaces
//!
//! The sequential document sink the sheet driver draws into. Calls arrive in
//! document order: a page is open from the first draw call until
//! [`RenderSurface::new_page`] closes it, and [`RenderSurface::finalize`]
//! closes the last page and emits the document.
//!
//! [`crate::pdf::PdfSurface`] writes a PDF. [`RecordingSurface`] keeps the
//! calls in memory for inspection and dry runs.

use crate::barcode::BarcodeOptions;
use crate::error::LabelError;
use crate::font::StandardFont;

pub trait RenderSurface {
    /// Draw `text` with its baseline starting at (`x`, `y`).
    fn draw_text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        font: StandardFont,
        font_size: f64,
    ) -> Result<(), LabelError>;

    /// Draw a Code 39 symbol for `payload` with its bottom-left at (`x`, `y`).
    fn draw_barcode(
        &mut self,
        payload: &str,
        x: f64,
        y: f64,
        height: f64,
        options: &BarcodeOptions,
    ) -> Result<(), LabelError>;

    /// Draw the image at `source` scaled into the given box, keeping its
    /// aspect ratio and centering it in the box. Fails with
    /// [`LabelError::ImageError`] when the image cannot be loaded.
    fn draw_image(
        &mut self,
        source: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), LabelError>;

    /// Close the current page and start the next one.
    fn new_page(&mut self) -> Result<(), LabelError>;

    /// Close the last page and emit the document.
    fn finalize(&mut self) -> Result<(), LabelError>;
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Text {
        x: f64,
        y: f64,
        text: String,
        font: StandardFont,
        font_size: f64,
    },
    Barcode {
        payload: String,
        x: f64,
        y: f64,
        height: f64,
    },
    Image {
        source: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    NewPage,
    Finalize,
}

/// A surface that records every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    /// Treat every image as unloadable.
    pub reject_images: bool,
    /// Fail with [`LabelError::RenderSurfaceError`] once this many calls
    /// have been recorded, as an unwritable output would.
    pub fail_after: Option<usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages the recorded calls describe, counting the page open at the
    /// first call.
    pub fn page_count(&self) -> usize {
        let breaks = self.count(|c| matches!(c, SurfaceCall::NewPage));
        let drew = self
            .calls
            .iter()
            .any(|c| !matches!(c, SurfaceCall::NewPage | SurfaceCall::Finalize));
        if breaks == 0 && !drew {
            0
        } else {
            breaks + 1
        }
    }

    pub fn barcode_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Barcode { .. }))
    }

    pub fn finalize_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Finalize))
    }

    /// Text runs in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Calls grouped by page, page breaks and finalize left out.
    pub fn pages(&self) -> Vec<Vec<&SurfaceCall>> {
        let mut pages = vec![Vec::new()];
        for call in &self.calls {
            match call {
                SurfaceCall::NewPage => pages.push(Vec::new()),
                SurfaceCall::Finalize => {}
                other => {
                    if let Some(page) = pages.last_mut() {
                        page.push(other);
                    }
                }
            }
        }
        pages
    }

    fn accept(&self) -> Result<(), LabelError> {
        match self.fail_after {
            Some(limit) if self.calls.len() >= limit => Err(LabelError::RenderSurfaceError(
                format!("surface stopped accepting calls after {}", limit),
            )),
            _ => Ok(()),
        }
    }

    fn count(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl RenderSurface for RecordingSurface {
    fn draw_text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        font: StandardFont,
        font_size: f64,
    ) -> Result<(), LabelError> {
        self.accept()?;
        self.calls.push(SurfaceCall::Text {
            x,
            y,
            text: text.to_string(),
            font,
            font_size,
        });
        Ok(())
    }

    fn draw_barcode(
        &mut self,
        payload: &str,
        x: f64,
        y: f64,
        height: f64,
        _options: &BarcodeOptions,
    ) -> Result<(), LabelError> {
        self.accept()?;
        self.calls.push(SurfaceCall::Barcode {
            payload: payload.to_string(),
            x,
            y,
            height,
        });
        Ok(())
    }

    fn draw_image(
        &mut self,
        source: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), LabelError> {
        self.accept()?;
        if self.reject_images {
            return Err(LabelError::ImageError(format!("cannot load '{}'", source)));
        }
        self.calls.push(SurfaceCall::Image {
            source: source.to_string(),
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn new_page(&mut self) -> Result<(), LabelError> {
        self.accept()?;
        self.calls.push(SurfaceCall::NewPage);
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), LabelError> {
        self.accept()?;
        self.calls.push(SurfaceCall::Finalize);
        Ok(())
    }
}
