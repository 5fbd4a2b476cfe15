//! # labelsheet CLI
//!
//! Usage:
//!   labelsheet export_0412.json -o labels.pdf
//!   cat records.json | labelsheet --org 0412 -o labels.pdf
//!   labelsheet records.json --config sheet.json --summary
//!   labelsheet --example > records.json
//!
//! Without `--org`, the organization code is taken from the input file name.
//! Set `RUST_LOG=debug` for page-by-page output.

use std::env;
use std::fs;
use std::io::{self, Read};

use labelsheet::font::FontContext;
use labelsheet::model::organization_code_from_file_name;
use labelsheet::surface::RecordingSurface;
use labelsheet::{render_pdf, render_sheet, LabelError, RecordSet, SheetConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_records_json());
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), LabelError> {
    let input_path = args
        .get(1)
        .filter(|a| !a.starts_with('-'))
        .map(String::as_str);

    let input = match input_path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let config = match flag_value(args, "--config") {
        Some(path) => SheetConfig::from_json(&fs::read_to_string(path)?)?,
        None => SheetConfig::default(),
    };

    let organization_code = flag_value(args, "--org")
        .map(str::to_string)
        .unwrap_or_else(|| organization_code_from_file_name(input_path.unwrap_or("")));

    let records = RecordSet::from_json(&input)?.printable();
    let title = config.title_info(&organization_code);

    if args.iter().any(|a| a == "--summary") {
        let mut surface = RecordingSurface::new();
        let summary = render_sheet(
            &records,
            &config,
            Some(&title),
            &FontContext::new(),
            &mut surface,
        )?;
        println!(
            "{}: {} record(s), {} page(s), {} barcode(s), {} overflowing label(s)",
            organization_code,
            summary.records,
            surface.page_count(),
            surface.barcode_count(),
            summary.overflowing_labels
        );
        return Ok(());
    }

    let output_path = flag_value(args, "-o")
        .map(str::to_string)
        .unwrap_or_else(|| default_output_path(input_path));

    let pdf_bytes = render_pdf(&records, &config, Some(&title))?;
    fs::write(&output_path, &pdf_bytes)?;
    eprintln!(
        "✓ Written {} labels ({} bytes) to {}",
        records.len(),
        pdf_bytes.len(),
        output_path
    );
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// `export_0412.json` → `export_0412_labels.pdf`.
fn default_output_path(input_path: Option<&str>) -> String {
    match input_path {
        Some(path) => {
            let stem = path.strip_suffix(".json").unwrap_or(path);
            format!("{}_labels.pdf", stem)
        }
        None => "labels.pdf".to_string(),
    }
}

fn example_records_json() -> &'static str {
    r##"[
  {
    "id": "C-10442",
    "primaryAddress": "Mr. and Mrs. Thomas A. Whitfield",
    "addressLines": "1187 Larkspur Meadow Lane, Apt 4B",
    "city": "Springfield",
    "state": "IL",
    "postalCode": "62704",
    "amount": "$250.00"
  },
  {
    "id": "C-10443",
    "primaryAddress": "Ms. Dolores Ramirez",
    "addressLines": "22 Oak St",
    "city": "Springfield",
    "state": "IL",
    "postalCode": "62701",
    "amount": "$40.00"
  },
  {
    "id": "C-10444*",
    "primaryAddress": "Provisional record, skipped",
    "addressLines": "1 Main St",
    "city": "Springfield",
    "state": "IL",
    "postalCode": "62701",
    "amount": "$10.00"
  },
  {
    "ConsID": "C-10445",
    "PrimAddText": "The Okafor Family",
    "AddrLines": "9 Harbor View Rd",
    "AddrCity": "Chatham",
    "AddrState": "IL",
    "AddrZIP": "62629",
    "amount": "$1,200.00"
  }
]
"##
}
