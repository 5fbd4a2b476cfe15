//! Integration tests for the labelsheet pipeline.
//!
//! These tests drive complete sheets from records to surface calls and PDF
//! bytes. They verify:
//! - Records land on the right page, row and column
//! - Every copy gets a barcode and only the first copy shows the amount
//! - Cover page content and logo handling
//! - PDF output is structurally valid
//! - Configuration errors stop rendering before anything is drawn

use labelsheet::font::FontContext;
use labelsheet::model::{Record, RecordSet, TitleInfo};
use labelsheet::pdf::PdfSurface;
use labelsheet::surface::{RecordingSurface, SurfaceCall};
use labelsheet::{render_json, render_pdf, render_sheet, LabelError, SheetConfig};

// ─── Helpers ────────────────────────────────────────────────────

fn make_record(i: usize) -> Record {
    Record {
        id: format!("C-{:05}", 10000 + i),
        primary_address: format!("Household {}", i),
        address_lines: format!("{} Elm St", 100 + i),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62704".to_string(),
        amount: format!("${}.00", 10 + i),
    }
}

fn make_records(n: usize) -> Vec<Record> {
    (0..n).map(make_record).collect()
}

fn title() -> TitleInfo {
    TitleInfo {
        organization_code: "0412".to_string(),
        organization_name: "St. Brigid Parish".to_string(),
        sheet_label: "2025 Labels".to_string(),
        logo: None,
    }
}

fn record_sheet(records: &[Record], config: &SheetConfig) -> RecordingSurface {
    let mut surface = RecordingSurface::new();
    render_sheet(
        records,
        config,
        Some(&title()),
        &FontContext::new(),
        &mut surface,
    )
    .unwrap();
    surface
}

fn barcodes_on(page: &[&SurfaceCall]) -> Vec<(String, f64, f64)> {
    page.iter()
        .filter_map(|c| match c {
            SurfaceCall::Barcode { payload, x, y, .. } => Some((payload.clone(), *x, *y)),
            _ => None,
        })
        .collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ─── End-to-end ─────────────────────────────────────────────────

#[test]
fn test_twenty_three_records() {
    let surface = record_sheet(&make_records(23), &SheetConfig::default());

    assert_eq!(surface.page_count(), 4, "1 cover + 10 + 10 + 3");
    assert_eq!(surface.barcode_count(), 69);
    assert_eq!(surface.finalize_count(), 1);
    assert_eq!(surface.calls.last(), Some(&SurfaceCall::Finalize));

    let pages = surface.pages();
    assert_eq!(barcodes_on(&pages[0]).len(), 0);
    assert_eq!(barcodes_on(&pages[1]).len(), 30);
    assert_eq!(barcodes_on(&pages[2]).len(), 30);
    assert_eq!(barcodes_on(&pages[3]).len(), 9);
}

#[test]
fn test_summary_matches_surface() {
    let mut surface = RecordingSurface::new();
    let summary = render_sheet(
        &make_records(23),
        &SheetConfig::default(),
        Some(&title()),
        &FontContext::new(),
        &mut surface,
    )
    .unwrap();
    assert_eq!(summary.records, 23);
    assert_eq!(summary.cover_pages, 1);
    assert_eq!(summary.label_pages, 3);
    assert_eq!(summary.total_pages(), surface.page_count());
    assert_eq!(summary.barcodes, surface.barcode_count());
}

#[test]
fn test_exactly_full_page_has_no_trailing_break() {
    let surface = record_sheet(&make_records(10), &SheetConfig::default());
    assert_eq!(surface.page_count(), 2);
    assert_eq!(
        surface
            .calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::NewPage))
            .count(),
        1
    );
}

// ─── Pagination ─────────────────────────────────────────────────

#[test]
fn test_page_boundary_positions() {
    let surface = record_sheet(&make_records(11), &SheetConfig::default());
    let pages = surface.pages();

    // Index 9 is the bottom row of the first label page.
    let first = barcodes_on(&pages[1]);
    let (payload, x, y) = &first[27];
    assert_eq!(payload, "C-10009");
    assert!(approx(*x, 21.6));
    assert!(approx(*y, 43.2 + 50.0));

    // Index 10 starts the next page at the top row.
    let second = barcodes_on(&pages[2]);
    assert_eq!(second.len(), 3);
    let columns: Vec<f64> = second.iter().map(|(_, x, _)| *x).collect();
    assert!(approx(columns[0], 21.6));
    assert!(approx(columns[1], 21.6 + 189.0));
    assert!(approx(columns[2], 21.6 + 378.0));
    assert!(second.iter().all(|(p, _, y)| p == "C-10010" && approx(*y, 741.2)));
}

#[test]
fn test_record_order_is_preserved() {
    let surface = record_sheet(&make_records(23), &SheetConfig::default());
    let payloads: Vec<String> = surface
        .calls
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::Barcode { payload, .. } => Some(payload.clone()),
            _ => None,
        })
        .collect();
    let expected: Vec<String> = (0..23)
        .flat_map(|i| std::iter::repeat(format!("C-{:05}", 10000 + i)).take(3))
        .collect();
    assert_eq!(payloads, expected);
}

// ─── Label content ──────────────────────────────────────────────

#[test]
fn test_amount_only_on_first_copy() {
    let records = make_records(3);
    let surface = record_sheet(&records, &SheetConfig::default());
    let texts = surface.texts();

    for record in &records {
        assert_eq!(texts.iter().filter(|t| **t == record.id).count(), 3);
        assert_eq!(texts.iter().filter(|t| **t == record.amount).count(), 1);
    }

    let amount_x = surface.calls.iter().find_map(|c| match c {
        SurfaceCall::Text { text, x, .. } if text == "$10.00" => Some(*x),
        _ => None,
    });
    let amount_x = amount_x.unwrap();
    assert!(amount_x > 23.6 && amount_x < 21.6 + 189.0);
}

#[test]
fn test_label_font_stays_in_range() {
    let mut long = make_record(0);
    long.primary_address = "Mr. and Mrs. Bartholomew Fitzgerald-Montgomery III".to_string();
    long.address_lines = "18 Larkspur Meadow Lane Apartment 4B Building C".to_string();
    let records = vec![make_record(1), long];
    let surface = record_sheet(&records, &SheetConfig::default());

    let sizes: Vec<f64> = surface
        .pages()[1]
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::Text { font_size, .. } => Some(*font_size),
            _ => None,
        })
        .collect();
    assert!(!sizes.is_empty());
    assert!(sizes.iter().all(|s| (11.0..=14.0).contains(s)));
}

#[test]
fn test_cover_lists_organization_and_count() {
    let surface = record_sheet(&make_records(1234), &SheetConfig::default());
    let cover: Vec<String> = surface.pages()[0]
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        cover,
        vec!["2025 Labels", "0412", "St. Brigid Parish", "1,234 Records"]
    );
}

#[test]
fn test_cover_lines_are_centered() {
    let surface = record_sheet(&make_records(1), &SheetConfig::default());
    let measure = FontContext::new();
    for call in &surface.pages()[0] {
        if let SurfaceCall::Text {
            text,
            x,
            font,
            font_size,
            ..
        } = call
        {
            use labelsheet::font::TextMeasure;
            let width = measure.measure(text, *font, *font_size);
            assert!(approx(*x, 306.0 - width / 2.0));
        }
    }
}

// ─── Logo ───────────────────────────────────────────────────────

#[test]
fn test_missing_logo_still_renders_pdf() {
    let mut info = title();
    info.logo = Some("./no-such-dir/Untitled.png".to_string());
    let pdf = render_pdf(&make_records(2), &SheetConfig::default(), Some(&info)).unwrap();
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.starts_with("%PDF-1.7"));
    assert!(!text.contains("/XObject"));
    assert!(text.contains("/Count 2"));
}

// ─── PDF output ─────────────────────────────────────────────────

#[test]
fn test_pdf_structure() {
    let mut surface = PdfSurface::new(Vec::new(), 612.0, 792.0).with_compression(false);
    render_sheet(
        &make_records(23),
        &SheetConfig::default(),
        Some(&title()),
        &FontContext::new(),
        &mut surface,
    )
    .unwrap();
    let bytes = surface.into_inner().unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.starts_with("%PDF-1.7"));
    assert!(text.contains("/Type /Catalog"));
    assert!(text.contains("/Count 4"));
    assert!(text.contains("/MediaBox [0 0 612.00 792.00]"));
    assert!(text.contains("/BaseFont /Times-Roman"));
    assert!(text.contains("(St. Brigid Parish) Tj"));
    assert!(text.contains("(C-10022) Tj"));
    assert!(text.contains("startxref"));
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[test]
fn test_render_json_filters_and_names() {
    let config = SheetConfig::from_json(
        r#"{ "logo": null, "organizations": { "0412": "St. Brigid Parish" } }"#,
    )
    .unwrap();
    let records = r#"[
        { "ConsID": "C-1", "AddrLines": "1 Oak St", "AddrCity": "Peoria", "AddrState": "IL" },
        { "ConsID": "C-2*", "AddrLines": "2 Oak St" },
        { "ConsID": "C-3", "AddrLines": "" }
    ]"#;

    assert_eq!(RecordSet::from_json(records).unwrap().printable().len(), 1);

    let pdf = render_json(records, &config, "0412").unwrap();
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("/Title (0412 2025 Labels)"));
    assert!(text.contains("/Author (St. Brigid Parish)"));
    assert!(text.contains("/Count 2"));
}

// ─── Errors ─────────────────────────────────────────────────────

#[test]
fn test_invalid_geometry_renders_nothing() {
    let config = SheetConfig::default();
    let mut bad = config.clone();
    bad.geometry.rows = 0;

    let mut surface = RecordingSurface::new();
    let err = render_sheet(
        &make_records(3),
        &bad,
        Some(&title()),
        &FontContext::new(),
        &mut surface,
    )
    .unwrap_err();
    assert!(matches!(err, LabelError::ConfigurationError(_)));
    assert!(surface.calls.is_empty());

    assert!(matches!(
        render_pdf(&make_records(3), &bad, None),
        Err(LabelError::ConfigurationError(_))
    ));
}

#[test]
fn test_grid_taller_than_page_is_rejected() {
    let mut config = SheetConfig::default();
    config.geometry.rows = 11;
    assert!(matches!(
        config.validate(),
        Err(LabelError::ConfigurationError(_))
    ));
}

#[test]
fn test_malformed_records_are_parse_errors() {
    let config = SheetConfig::default();
    let err = render_json("[{ \"id\": ", &config, "0412").unwrap_err();
    assert!(matches!(err, LabelError::ParseError { .. }));
}

#[test]
fn test_failed_barcode_aborts_sheet() {
    // cover: 4 title lines, then the page break; the first barcode is call 6
    let mut surface = RecordingSurface {
        fail_after: Some(5),
        ..Default::default()
    };
    let err = render_sheet(
        &make_records(3),
        &SheetConfig::default(),
        Some(&title()),
        &FontContext::new(),
        &mut surface,
    )
    .unwrap_err();
    assert!(matches!(err, LabelError::RenderSurfaceError(_)));
    assert_eq!(surface.barcode_count(), 0);
    assert_eq!(surface.finalize_count(), 0);
}
