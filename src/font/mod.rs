//! # Font Management
//!
//! Text measurement for the standard PDF fonts (Times, Helvetica, Courier),
//! which PDF viewers supply themselves and therefore never need embedding.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use serde::{Deserialize, Serialize};

/// The standard PDF fonts labelsheet can draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StandardFont {
    #[serde(rename = "Times-Roman")]
    TimesRoman,
    #[serde(rename = "Times-Bold")]
    TimesBold,
    #[serde(rename = "Helvetica")]
    Helvetica,
    #[serde(rename = "Helvetica-Bold")]
    HelveticaBold,
    #[serde(rename = "Courier")]
    Courier,
    #[serde(rename = "Courier-Bold")]
    CourierBold,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
        }
    }
}

/// Text-measurement capability used by the fitting and centering code.
///
/// Implementations must be deterministic: the same text, font and size
/// always measure the same.
pub trait TextMeasure {
    /// Width of `text` in points when set in `font` at `font_size`.
    fn measure(&self, text: &str, font: StandardFont, font_size: f64) -> f64;
}

/// Shared font context backed by the standard-font AFM widths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontContext;

impl FontContext {
    pub fn new() -> Self {
        Self
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, font: StandardFont, font_size: f64) -> f64 {
        font.metrics().char_width(ch, font_size)
    }
}

impl TextMeasure for FontContext {
    fn measure(&self, text: &str, font: StandardFont, font_size: f64) -> f64 {
        font.metrics().measure_string(text, font_size)
    }
}
