//! # Label Composition
//!
//! Turns one record into the draw plans for its physical copies. The copy in
//! the first column is the PRIMARY label: it pairs the id with the amount on
//! the first line. The remaining copies are PLAIN and never show the amount.

use crate::config::Typography;
use crate::error::LabelError;
use crate::font::{StandardFont, TextMeasure};
use crate::layout::grid::{CellPosition, GridLayout};
use crate::model::Record;
use crate::text::{FitResult, TextFitter};

/// Which content arrangement a label copy uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutRule {
    /// Id and amount share the first line.
    Primary,
    /// Id and address only.
    Plain,
}

impl LayoutRule {
    pub fn for_column(column_index: usize) -> Self {
        if column_index == 0 {
            LayoutRule::Primary
        } else {
            LayoutRule::Plain
        }
    }
}

/// The display lines of a record for one layout rule.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelContent {
    pub rule: LayoutRule,
    /// Id (when present) followed by the non-empty address lines.
    pub lines: Vec<String>,
    /// Amount to print beside the id. Only ever set for PRIMARY content
    /// with a non-empty id.
    pub amount: Option<String>,
    pub barcode_payload: Option<String>,
}

impl LabelContent {
    pub fn from_record(record: &Record, rule: LayoutRule) -> Self {
        let has_id = !record.id.is_empty();
        let mut lines = Vec::new();
        if has_id {
            lines.push(record.id.clone());
        }
        lines.extend(record.address_block());

        let amount = match rule {
            LayoutRule::Primary if has_id && !record.amount.is_empty() => {
                Some(record.amount.clone())
            }
            _ => None,
        };

        LabelContent {
            rule,
            lines,
            amount,
            barcode_payload: has_id.then(|| record.id.clone()),
        }
    }
}

/// A run of text at an absolute baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Where and how tall the barcode is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodePlacement {
    pub payload: String,
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

/// Everything needed to draw one physical label.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPlan {
    pub barcode: Option<BarcodePlacement>,
    pub anchor: CellPosition,
    pub fitted: FitResult,
    pub layout_rule: LayoutRule,
    pub font: StandardFont,
    pub texts: Vec<PlacedText>,
}

impl DrawPlan {
    /// Whether any text run on the label equals `text`.
    pub fn shows(&self, text: &str) -> bool {
        self.texts.iter().any(|t| t.text == text)
    }
}

pub struct LabelComposer<'a> {
    grid: GridLayout<'a>,
    typography: &'a Typography,
    measure: &'a dyn TextMeasure,
}

impl<'a> LabelComposer<'a> {
    pub fn new(
        grid: GridLayout<'a>,
        typography: &'a Typography,
        measure: &'a dyn TextMeasure,
    ) -> Result<Self, LabelError> {
        typography.validate()?;
        Ok(Self {
            grid,
            typography,
            measure,
        })
    }

    pub fn grid(&self) -> &GridLayout<'a> {
        &self.grid
    }

    /// Plans for every column copy of the record at `record_index`.
    pub fn compose_row(&self, record: &Record, record_index: usize) -> Vec<DrawPlan> {
        (0..self.grid.columns())
            .map(|column| self.compose(record, record_index, column))
            .collect()
    }

    /// Plan for copy `column_index` of the record at `record_index`.
    pub fn compose(&self, record: &Record, record_index: usize, column_index: usize) -> DrawPlan {
        let geometry = self.grid.geometry();
        let t = self.typography;
        let anchor = self.grid.anchor(record_index, column_index);
        let layout_rule = LayoutRule::for_column(column_index);
        let content = LabelContent::from_record(record, layout_rule);

        let fitter = TextFitter::new(self.measure);
        let text_area_height = geometry.text_area_height();
        let fitted = fitter.fit(
            &content.lines,
            t.label_font,
            geometry.text_width(),
            text_area_height,
            t.label_start_size,
            t.label_min_size,
        );

        let x = anchor.anchor_x + geometry.text_inset_left;
        let top = anchor.anchor_y + text_area_height;
        let leading = fitted.font_size * t.label_leading;

        let mut texts = Vec::with_capacity(fitted.wrapped_lines.len() + 1);
        for (i, line) in fitted.wrapped_lines.iter().enumerate() {
            let y = top - i as f64 * leading;
            texts.push(PlacedText {
                text: line.clone(),
                x,
                y,
            });
            // The first wrapped line always starts with the id.
            if i == 0 {
                if let Some(amount) = &content.amount {
                    let width = self.measure.measure(line, t.label_font, fitted.font_size);
                    texts.push(PlacedText {
                        text: amount.clone(),
                        x: x + width + t.amount_gap,
                        y,
                    });
                }
            }
        }

        let barcode = content.barcode_payload.map(|payload| BarcodePlacement {
            payload,
            x: anchor.anchor_x,
            y: anchor.anchor_y + geometry.label_height - geometry.barcode_offset,
            height: geometry.barcode_height,
        });

        DrawPlan {
            barcode,
            anchor,
            fitted,
            layout_rule,
            font: t.label_font,
            texts,
        }
    }
}
