//! Sheet configuration.
//!
//! Everything that shapes the output but is not record data: page geometry,
//! fonts and sizes, barcode proportions, the cover heading and logo, and the
//! organization name table. Every field has a default, so `{}` is a valid
//! configuration that reproduces the standard 30-up Letter sheet.

use serde::{Deserialize, Serialize};

use crate::barcode::BarcodeOptions;
use crate::error::LabelError;
use crate::font::StandardFont;
use crate::layout::grid::GeometrySpec;
use crate::model::{OrganizationDirectory, OrganizationMap, TitleInfo};

/// Fonts and font sizes for labels and the cover page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Typography {
    pub label_font: StandardFont,
    /// Size label text is first tried at.
    pub label_start_size: f64,
    /// Floor for label text; overflow is accepted below this.
    pub label_min_size: f64,
    /// Baseline-to-baseline distance when drawing, as a multiple of the size.
    pub label_leading: f64,
    /// Space between the end of the id and the amount on the first label.
    pub amount_gap: f64,
    pub cover_font: StandardFont,
    pub cover_base_size: f64,
    pub cover_count_size: f64,
    pub cover_floor_size: f64,
    pub cover_shrink_step: f64,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            label_font: StandardFont::TimesRoman,
            label_start_size: 14.0,
            label_min_size: 11.0,
            label_leading: 0.9,
            amount_gap: 30.0,
            cover_font: StandardFont::TimesRoman,
            cover_base_size: 32.0,
            cover_count_size: 26.0,
            cover_floor_size: 16.0,
            cover_shrink_step: 2.0,
        }
    }
}

impl Typography {
    pub fn validate(&self) -> Result<(), LabelError> {
        let positive = [
            ("labelMinSize", self.label_min_size),
            ("labelLeading", self.label_leading),
            ("coverBaseSize", self.cover_base_size),
            ("coverCountSize", self.cover_count_size),
            ("coverFloorSize", self.cover_floor_size),
            ("coverShrinkStep", self.cover_shrink_step),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LabelError::ConfigurationError(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(self.label_start_size.is_finite() && self.label_start_size >= self.label_min_size) {
            return Err(LabelError::ConfigurationError(format!(
                "labelStartSize {} must be at least labelMinSize {}",
                self.label_start_size, self.label_min_size
            )));
        }
        if !(self.amount_gap.is_finite() && self.amount_gap >= 0.0) {
            return Err(LabelError::ConfigurationError(format!(
                "amountGap must not be negative, got {}",
                self.amount_gap
            )));
        }
        Ok(())
    }
}

/// Complete configuration for one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetConfig {
    pub geometry: GeometrySpec,
    pub typography: Typography,
    pub barcode: BarcodeOptions,
    /// Heading printed on the cover page.
    pub sheet_label: String,
    /// Cover logo source. `None` disables the logo.
    pub logo: Option<String>,
    /// Organization code → display name.
    pub organizations: OrganizationMap,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            geometry: GeometrySpec::default(),
            typography: Typography::default(),
            barcode: BarcodeOptions::default(),
            sheet_label: "2025 Labels".to_string(),
            logo: Some("Untitled.png".to_string()),
            organizations: OrganizationMap::default(),
        }
    }
}

impl SheetConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, LabelError> {
        let config: SheetConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LabelError> {
        self.geometry.validate()?;
        self.typography.validate()?;
        self.barcode.validate()
    }

    /// Cover title for `organization_code`, with the name looked up in the
    /// configured organization table.
    pub fn title_info(&self, organization_code: &str) -> TitleInfo {
        TitleInfo {
            organization_code: organization_code.to_string(),
            organization_name: self.organizations.display_name(organization_code),
            sheet_label: self.sheet_label.clone(),
            logo: self.logo.clone(),
        }
    }
}
