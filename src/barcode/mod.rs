//! # Code 39 Barcodes
//!
//! Turns a label id into the bar rectangles a render surface fills. Each
//! character is nine elements (five bars, four spaces), three of them wide,
//! framed by `*` start/stop characters. No check digit is added.

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Character set in table order; `*` is reserved for start/stop.
const ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%*";

/// Nine-bit element patterns, most significant bit first, 1 = wide.
#[rustfmt::skip]
const PATTERNS: [u16; 44] = [
    0x034, 0x121, 0x061, 0x160, 0x031, 0x130, 0x070, 0x025, 0x124, 0x064,
    0x109, 0x049, 0x148, 0x019, 0x118, 0x058, 0x00D, 0x10C, 0x04C, 0x01C,
    0x103, 0x043, 0x142, 0x013, 0x112, 0x052, 0x007, 0x106, 0x046, 0x016,
    0x181, 0x0C1, 0x1C0, 0x091, 0x190, 0x0D0, 0x085, 0x184, 0x0C4, 0x0A8,
    0x0A2, 0x08A, 0x02A, 0x094,
];

const START_STOP: char = '*';

/// Proportions of the printed symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarcodeOptions {
    /// Narrow element width in points.
    pub narrow_width: f64,
    /// Wide element width as a multiple of the narrow width.
    pub wide_ratio: f64,
    /// Leave a blank margin on both sides of the symbol.
    pub quiet_zone: bool,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            narrow_width: 0.54,
            wide_ratio: 2.2,
            quiet_zone: false,
        }
    }
}

impl BarcodeOptions {
    pub fn validate(&self) -> Result<(), LabelError> {
        if !(self.narrow_width.is_finite() && self.narrow_width > 0.0) {
            return Err(LabelError::ConfigurationError(format!(
                "barcode narrowWidth must be positive, got {}",
                self.narrow_width
            )));
        }
        if !(self.wide_ratio.is_finite() && self.wide_ratio > 1.0) {
            return Err(LabelError::ConfigurationError(format!(
                "barcode wideRatio must be greater than 1, got {}",
                self.wide_ratio
            )));
        }
        Ok(())
    }

    /// Blank margin on each side, zero unless `quiet_zone` is set.
    fn quiet_width(&self) -> f64 {
        if self.quiet_zone {
            (10.0 * self.narrow_width).max(18.0)
        } else {
            0.0
        }
    }
}

/// One filled bar, offset from the symbol's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub width: f64,
}

/// A laid-out Code 39 symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Code39 {
    /// The characters actually encoded (uppercased, unsupported ones removed).
    pub text: String,
    pub bars: Vec<Bar>,
    /// Total width including quiet zones.
    pub width: f64,
}

impl Code39 {
    /// Encode `payload`. Lowercase letters are uppercased; characters outside
    /// the Code 39 set are dropped with a warning. Returns `None` when
    /// nothing encodable is left.
    pub fn encode(payload: &str, options: &BarcodeOptions) -> Option<Code39> {
        let text = normalize(payload);
        if text.is_empty() {
            return None;
        }

        let narrow = options.narrow_width;
        let wide = narrow * options.wide_ratio;
        let quiet = options.quiet_width();

        let mut bars = Vec::new();
        let mut x = quiet;
        let framed: Vec<char> = std::iter::once(START_STOP)
            .chain(text.chars())
            .chain(std::iter::once(START_STOP))
            .collect();

        for (i, ch) in framed.iter().enumerate() {
            let pattern = pattern_for(*ch)?;
            for element in 0..9 {
                let is_wide = pattern & (1 << (8 - element)) != 0;
                let width = if is_wide { wide } else { narrow };
                if element % 2 == 0 {
                    bars.push(Bar { x, width });
                }
                x += width;
            }
            if i + 1 < framed.len() {
                x += narrow;
            }
        }

        Some(Code39 {
            text,
            bars,
            width: x + quiet,
        })
    }
}

fn pattern_for(ch: char) -> Option<u16> {
    ALPHABET.find(ch).map(|idx| PATTERNS[idx])
}

fn normalize(payload: &str) -> String {
    let mut text = String::with_capacity(payload.len());
    let mut dropped = Vec::new();
    for ch in payload.chars() {
        let upper = ch.to_ascii_uppercase();
        if upper != START_STOP && ALPHABET.contains(upper) {
            text.push(upper);
        } else {
            dropped.push(ch);
        }
    }
    if !dropped.is_empty() {
        log::warn!(
            "barcode payload {:?}: dropped characters Code 39 cannot encode: {:?}",
            payload,
            dropped
        );
    }
    text
}
