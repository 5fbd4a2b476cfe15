//! # labelsheet
//!
//! Lays mailing-address records out as a printable sheet of adhesive labels:
//! a cover page naming the organization and record count, followed by pages
//! of 2.625in × 1in labels, 30 to a US Letter page. Every record is printed
//! once per column; the first copy carries the amount next to the id.
//!
//! Label text lives in a fixed box, so there is no flowing layout. Each
//! label's text is wrapped and shrunk from 14 pt toward 11 pt until it fits,
//! and is allowed to overflow only once the floor is reached.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON records + config)
//!       ↓
//!   [model]  Records, filtering, cover title info
//!       ↓
//!   [layout]  Grid cells, label draw plans, cover title block
//!       ↓         (uses [text] for wrap-and-shrink fitting)
//!   [sheet]  Drives plans into a RenderSurface in document order
//!       ↓
//!   [pdf]  Serialize to PDF bytes
//! ```

pub mod barcode;
pub mod config;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod sheet;
pub mod surface;
pub mod text;

pub use config::SheetConfig;
pub use error::LabelError;
pub use model::{Record, RecordSet, TitleInfo};
pub use sheet::{render_sheet, SheetSummary};

use font::FontContext;
use pdf::{Metadata, PdfSurface};

/// Render a sheet to PDF bytes.
///
/// This is the primary entry point. Records are used as given; call
/// [`RecordSet::printable`] first to apply the usual filtering.
pub fn render_pdf(
    records: &[Record],
    config: &SheetConfig,
    title_info: Option<&TitleInfo>,
) -> Result<Vec<u8>, LabelError> {
    let metadata = Metadata {
        title: title_info.map(|t| format!("{} {}", t.organization_code, t.sheet_label)),
        author: title_info
            .map(|t| t.organization_name.clone())
            .filter(|name| !name.is_empty()),
        subject: Some(format!("{} mailing labels", records.len())),
    };
    let mut surface = PdfSurface::new(
        Vec::new(),
        config.geometry.page_width,
        config.geometry.page_height,
    )
    .with_metadata(metadata);

    render_sheet(records, config, title_info, &FontContext::new(), &mut surface)?;
    surface
        .into_inner()
        .ok_or_else(|| LabelError::RenderSurfaceError("PDF output missing".to_string()))
}

/// Render records given as a JSON array to PDF bytes, with a cover page for
/// `organization_code`.
pub fn render_json(
    records_json: &str,
    config: &SheetConfig,
    organization_code: &str,
) -> Result<Vec<u8>, LabelError> {
    let records = RecordSet::from_json(records_json)?.printable();
    let title = config.title_info(organization_code);
    render_pdf(&records, config, Some(&title))
}
