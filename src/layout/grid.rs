//! # Label Grid
//!
//! Fixed-cell geometry for a sheet of labels and the mapping from a record's
//! position in the input to its page, row and cell anchor.
//!
//! One record fills one row: every column on that row is a copy of the same
//! record. A page therefore holds `rows` records and `rows × columns`
//! physical labels. Coordinates are PDF user space (points, origin at the
//! bottom-left of the page), and a cell's anchor is its bottom-left corner.

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

const INCH: f64 = 72.0;

/// Physical layout of the sheet. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometrySpec {
    pub page_width: f64,
    pub page_height: f64,
    pub top_margin: f64,
    pub left_margin: f64,
    pub bottom_margin: f64,
    pub label_width: f64,
    pub label_height: f64,
    pub columns: usize,
    pub rows: usize,
    /// Share of the label height kept clear of text for the barcode.
    pub reserved_barcode_fraction: f64,
    /// Extra vertical space taken off the text area after the barcode share.
    pub text_padding: f64,
    /// Horizontal offset of text from the cell's left edge.
    pub text_inset_left: f64,
    /// Total width taken off the label width before wrapping.
    pub text_inset_total: f64,
    /// Distance from the label's top edge down to the barcode's baseline.
    pub barcode_offset: f64,
    pub barcode_height: f64,
    pub cover: CoverGeometry,
}

/// Title and logo positions on the cover page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverGeometry {
    /// Horizontal margin a title line must stay inside before it shrinks.
    pub margin: f64,
    /// Baseline distances below the top of the page.
    pub sheet_label_from_top: f64,
    pub code_from_top: f64,
    pub name_from_top: f64,
    pub count_from_top: f64,
    /// Bottom edge of the logo box, below the top of the page.
    pub logo_from_top: f64,
    pub logo_height: f64,
    /// Total horizontal space left beside the logo box.
    pub logo_side_inset: f64,
}

impl Default for GeometrySpec {
    /// US Letter, 2.625in × 1in labels, 3 columns × 10 rows.
    fn default() -> Self {
        Self {
            page_width: 8.5 * INCH,
            page_height: 11.0 * INCH,
            top_margin: 0.4 * INCH,
            left_margin: 0.3 * INCH,
            bottom_margin: 0.5 * INCH,
            label_width: 2.625 * INCH,
            label_height: INCH,
            columns: 3,
            rows: 10,
            reserved_barcode_fraction: 0.3,
            text_padding: 10.0,
            text_inset_left: 2.0,
            text_inset_total: 14.0,
            barcode_offset: 22.0,
            barcode_height: 12.0,
            cover: CoverGeometry::default(),
        }
    }
}

impl Default for CoverGeometry {
    fn default() -> Self {
        Self {
            margin: INCH,
            sheet_label_from_top: 4.0 * INCH,
            code_from_top: 5.0 * INCH,
            name_from_top: 6.0 * INCH,
            count_from_top: 7.0 * INCH,
            logo_from_top: 4.0 * INCH,
            logo_height: 3.0 * INCH,
            logo_side_inset: INCH,
        }
    }
}

impl GeometrySpec {
    /// Check that every dimension is usable and the grid fits on the page.
    pub fn validate(&self) -> Result<(), LabelError> {
        let positive = [
            ("pageWidth", self.page_width),
            ("pageHeight", self.page_height),
            ("labelWidth", self.label_width),
            ("labelHeight", self.label_height),
            ("barcodeHeight", self.barcode_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(config_error(format!("{} must be positive, got {}", name, value)));
            }
        }

        let non_negative = [
            ("topMargin", self.top_margin),
            ("leftMargin", self.left_margin),
            ("bottomMargin", self.bottom_margin),
            ("textPadding", self.text_padding),
            ("textInsetLeft", self.text_inset_left),
            ("textInsetTotal", self.text_inset_total),
            ("barcodeOffset", self.barcode_offset),
            ("cover.margin", self.cover.margin),
            ("cover.sheetLabelFromTop", self.cover.sheet_label_from_top),
            ("cover.codeFromTop", self.cover.code_from_top),
            ("cover.nameFromTop", self.cover.name_from_top),
            ("cover.countFromTop", self.cover.count_from_top),
            ("cover.logoFromTop", self.cover.logo_from_top),
            ("cover.logoHeight", self.cover.logo_height),
            ("cover.logoSideInset", self.cover.logo_side_inset),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(config_error(format!("{} must not be negative, got {}", name, value)));
            }
        }

        if self.columns == 0 {
            return Err(config_error("columns must be positive".to_string()));
        }
        if self.rows == 0 {
            return Err(config_error("rows must be positive".to_string()));
        }
        if !(0.0..1.0).contains(&self.reserved_barcode_fraction) {
            return Err(config_error(format!(
                "reservedBarcodeFraction must be in [0, 1), got {}",
                self.reserved_barcode_fraction
            )));
        }
        if self.text_area_height() <= 0.0 {
            return Err(config_error(format!(
                "label height {} leaves no room for text",
                self.label_height
            )));
        }
        if self.text_width() <= 0.0 {
            return Err(config_error(format!(
                "label width {} leaves no room for text",
                self.label_width
            )));
        }

        let grid_width = self.left_margin + self.columns as f64 * self.label_width;
        if grid_width > self.page_width + 1e-6 {
            return Err(config_error(format!(
                "{} columns of {}pt labels need {:.2}pt, page is {}pt wide",
                self.columns, self.label_width, grid_width, self.page_width
            )));
        }
        let grid_height =
            self.top_margin + self.rows as f64 * self.label_height + self.bottom_margin;
        if grid_height > self.page_height + 1e-6 {
            return Err(config_error(format!(
                "{} rows of {}pt labels need {:.2}pt, page is {}pt tall",
                self.rows, self.label_height, grid_height, self.page_height
            )));
        }
        Ok(())
    }

    /// Vertical space available for text inside one label.
    pub fn text_area_height(&self) -> f64 {
        self.label_height - self.label_height * self.reserved_barcode_fraction - self.text_padding
    }

    /// Width text is wrapped to inside one label.
    pub fn text_width(&self) -> f64 {
        self.label_width - self.text_inset_total
    }

    /// Page y coordinate for a distance measured down from the top edge.
    pub fn from_top(&self, distance: f64) -> f64 {
        self.page_height - distance
    }

    /// Bottom edge of the first row.
    pub fn page_top(&self) -> f64 {
        self.page_height - self.top_margin - self.label_height
    }
}

fn config_error(msg: String) -> LabelError {
    LabelError::ConfigurationError(msg)
}

/// Where one physical label lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPosition {
    pub page_index: usize,
    pub column_index: usize,
    pub row_index: usize,
    pub anchor_x: f64,
    pub anchor_y: f64,
}

/// Maps record indices onto the label grid of a validated geometry.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout<'a> {
    geometry: &'a GeometrySpec,
}

impl<'a> GridLayout<'a> {
    pub fn new(geometry: &'a GeometrySpec) -> Result<Self, LabelError> {
        geometry.validate()?;
        Ok(Self { geometry })
    }

    pub fn geometry(&self) -> &'a GeometrySpec {
        self.geometry
    }

    pub fn records_per_page(&self) -> usize {
        self.geometry.rows
    }

    pub fn columns(&self) -> usize {
        self.geometry.columns
    }

    /// Cell for copy `column_index` of record `record_index`.
    pub fn anchor(&self, record_index: usize, column_index: usize) -> CellPosition {
        let g = self.geometry;
        let row_index = record_index % g.rows;
        CellPosition {
            page_index: record_index / g.rows,
            column_index,
            row_index,
            anchor_x: g.left_margin + column_index as f64 * g.label_width,
            anchor_y: g.page_top() - row_index as f64 * g.label_height,
        }
    }

    /// True when `record_index` is the first record of a page other than the
    /// first one, i.e. a page break must be emitted before drawing it.
    pub fn starts_new_page(&self, record_index: usize) -> bool {
        record_index > 0 && record_index % self.geometry.rows == 0
    }

    /// Number of label pages needed for `record_count` records.
    pub fn page_count(&self, record_count: usize) -> usize {
        record_count.div_ceil(self.geometry.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_geometry_is_valid() {
        let g = GeometrySpec::default();
        assert!(g.validate().is_ok());
        assert!(approx(g.page_width, 612.0));
        assert!(approx(g.label_width, 189.0));
        assert!(approx(g.text_area_height(), 40.4));
    }

    #[test]
    fn test_first_cell_position() {
        let g = GeometrySpec::default();
        let grid = GridLayout::new(&g).unwrap();
        let cell = grid.anchor(0, 0);
        assert_eq!(cell.page_index, 0);
        assert_eq!(cell.row_index, 0);
        assert!(approx(cell.anchor_x, 21.6));
        // 792 - 28.8 - 72
        assert!(approx(cell.anchor_y, 691.2));
    }

    #[test]
    fn test_columns_step_by_label_width() {
        let g = GeometrySpec::default();
        let grid = GridLayout::new(&g).unwrap();
        assert!(approx(grid.anchor(0, 1).anchor_x, 21.6 + 189.0));
        assert!(approx(grid.anchor(0, 2).anchor_x, 21.6 + 378.0));
    }

    #[test]
    fn test_rows_stack_downward() {
        let g = GeometrySpec::default();
        let grid = GridLayout::new(&g).unwrap();
        let first = grid.anchor(0, 0);
        let last = grid.anchor(9, 0);
        assert_eq!(last.row_index, 9);
        assert!(approx(first.anchor_y - last.anchor_y, 9.0 * 72.0));
        assert!(last.anchor_y >= g.bottom_margin);
    }

    #[test]
    fn test_pagination_boundaries() {
        let g = GeometrySpec::default();
        let grid = GridLayout::new(&g).unwrap();
        assert_eq!(grid.anchor(9, 0).page_index, 0);
        assert_eq!(grid.anchor(10, 0).page_index, 1);
        assert_eq!(grid.anchor(10, 0).row_index, 0);
        for i in 0..95 {
            assert_eq!(grid.anchor(i, 2).page_index, i / 10);
        }
    }

    #[test]
    fn test_page_break_signal() {
        let g = GeometrySpec::default();
        let grid = GridLayout::new(&g).unwrap();
        assert!(!grid.starts_new_page(0));
        assert!(!grid.starts_new_page(9));
        assert!(grid.starts_new_page(10));
        assert!(!grid.starts_new_page(11));
        assert!(grid.starts_new_page(20));
    }

    #[test]
    fn test_page_count() {
        let g = GeometrySpec::default();
        let grid = GridLayout::new(&g).unwrap();
        assert_eq!(grid.page_count(0), 0);
        assert_eq!(grid.page_count(10), 1);
        assert_eq!(grid.page_count(23), 3);
    }

    #[test]
    fn test_custom_grid_dimensions() {
        let g = GeometrySpec {
            columns: 2,
            rows: 4,
            label_width: 250.0,
            label_height: 150.0,
            ..Default::default()
        };
        let grid = GridLayout::new(&g).unwrap();
        assert_eq!(grid.records_per_page(), 4);
        assert_eq!(grid.anchor(5, 1).page_index, 1);
        assert_eq!(grid.anchor(5, 1).row_index, 1);
        assert!(approx(grid.anchor(5, 1).anchor_x, 21.6 + 250.0));
    }

    #[test]
    fn test_rejects_zero_rows() {
        let g = GeometrySpec {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(
            GridLayout::new(&g),
            Err(LabelError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_rejects_negative_label_width() {
        let g = GeometrySpec {
            label_width: -189.0,
            ..Default::default()
        };
        assert!(matches!(g.validate(), Err(LabelError::ConfigurationError(_))));
    }

    #[test]
    fn test_rejects_grid_wider_than_page() {
        let g = GeometrySpec {
            columns: 4,
            ..Default::default()
        };
        let err = g.validate().unwrap_err();
        assert!(err.to_string().contains("columns"), "got: {}", err);
    }

    #[test]
    fn test_rejects_label_without_text_room() {
        let g = GeometrySpec {
            label_height: 12.0,
            ..Default::default()
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_geometry_from_partial_json() {
        let g: GeometrySpec = serde_json::from_str(r#"{ "rows": 8, "labelHeight": 90 }"#).unwrap();
        assert_eq!(g.rows, 8);
        assert_eq!(g.columns, 3);
        assert!(approx(g.label_height, 90.0));
        assert!(g.validate().is_ok());
    }
}
