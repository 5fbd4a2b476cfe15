//! # Record Model
//!
//! The input representation: one [`Record`] per mailing address, already
//! cleaned upstream, plus the title information shown on the cover page.
//! Records deserialize from JSON with camelCase keys; the column names of
//! the donor export (`ConsID`, `PrimAddText`, ...) are accepted as aliases.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// One mailing address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Record {
    /// Constituent identifier. Also the barcode payload. May be empty.
    #[serde(alias = "ConsID")]
    pub id: String,
    /// Addressee line (name or household).
    #[serde(alias = "PrimAddText")]
    pub primary_address: String,
    /// Street lines.
    #[serde(alias = "AddrLines")]
    pub address_lines: String,
    #[serde(alias = "AddrCity")]
    pub city: String,
    #[serde(alias = "AddrState")]
    pub state: String,
    #[serde(alias = "AddrZIP")]
    pub postal_code: String,
    /// Pre-formatted currency string, e.g. `"$1,250.00"`. The export names
    /// this column after the giving year.
    #[serde(alias = "Year_2024")]
    pub amount: String,
}

impl Record {
    /// `"City, ST"` or `"City, ST 12345"`; `None` unless both city and state
    /// are present.
    pub fn city_state_postal(&self) -> Option<String> {
        if self.city.is_empty() || self.state.is_empty() {
            return None;
        }
        let mut line = format!("{}, {}", self.city, self.state);
        if !self.postal_code.is_empty() {
            line.push(' ');
            line.push_str(&self.postal_code);
        }
        Some(line)
    }

    /// Non-empty address lines in print order: addressee, street, locality.
    pub fn address_block(&self) -> Vec<String> {
        [
            Some(self.primary_address.clone()),
            Some(self.address_lines.clone()),
            self.city_state_postal(),
        ]
        .into_iter()
        .flatten()
        .filter(|line| !line.is_empty())
        .collect()
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Record {
        Record {
            id: self.id.trim().to_string(),
            primary_address: self.primary_address.trim().to_string(),
            address_lines: self.address_lines.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            amount: self.amount.trim().to_string(),
        }
    }

    /// Whether the record should be printed at all. Provisional ids carry a
    /// `*` and records without street lines cannot be mailed.
    pub fn is_printable(&self) -> bool {
        !self.id.contains('*') && !self.address_lines.trim().is_empty()
    }
}

/// An ordered batch of records as read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    pub records: Vec<Record>,
}

impl RecordSet {
    /// Parse a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self, LabelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Trimmed records that pass [`Record::is_printable`], in input order.
    pub fn printable(&self) -> Vec<Record> {
        let kept: Vec<Record> = self
            .records
            .iter()
            .map(Record::trimmed)
            .filter(Record::is_printable)
            .collect();
        let dropped = self.records.len() - kept.len();
        if dropped > 0 {
            log::info!("skipped {} record(s) without a printable address", dropped);
        }
        kept
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Text for the cover page title block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TitleInfo {
    pub organization_code: String,
    pub organization_name: String,
    /// Heading such as `"2025 Labels"`.
    pub sheet_label: String,
    /// Logo image source (file path or data URI). Drawn when it loads.
    pub logo: Option<String>,
}

/// Resolves an organization code to its display name.
pub trait OrganizationDirectory {
    fn display_name(&self, code: &str) -> String;
}

/// Directory backed by a code → name map. Unknown codes display as
/// themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationMap(pub HashMap<String, String>);

impl OrganizationDirectory for OrganizationMap {
    fn display_name(&self, code: &str) -> String {
        self.0
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}

/// Organization code embedded in an export file name such as
/// `export_0412_2025.json`: the second `_`-separated part of the stem.
/// `"Unknown"` when the name has no such part.
pub fn organization_code_from_file_name(file_name: &str) -> String {
    let stem = std::path::Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    stem.split('_')
        .nth(1)
        .filter(|code| !code.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, state: &str, postal: &str) -> Record {
        Record {
            city: city.to_string(),
            state: state.to_string(),
            postal_code: postal.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_city_state_without_postal() {
        let line = record("Springfield", "IL", "").city_state_postal();
        assert_eq!(line.as_deref(), Some("Springfield, IL"));
    }

    #[test]
    fn test_city_state_with_postal() {
        let line = record("Springfield", "IL", "62704").city_state_postal();
        assert_eq!(line.as_deref(), Some("Springfield, IL 62704"));
    }

    #[test]
    fn test_missing_city_drops_line() {
        assert_eq!(record("", "IL", "62704").city_state_postal(), None);
        assert_eq!(record("Springfield", "", "62704").city_state_postal(), None);
    }

    #[test]
    fn test_address_block_skips_empty_lines() {
        let r = Record {
            primary_address: "".to_string(),
            address_lines: "742 Evergreen Terrace".to_string(),
            ..record("", "IL", "")
        };
        assert_eq!(r.address_block(), vec!["742 Evergreen Terrace"]);
    }

    #[test]
    fn test_printable_filter() {
        let json = r#"[
            { "id": "1001", "addressLines": "12 Oak St" },
            { "id": "1002*", "addressLines": "14 Oak St" },
            { "id": "1003", "addressLines": "   " },
            { "id": " 1004 ", "addressLines": " 16 Oak St " }
        ]"#;
        let set = RecordSet::from_json(json).unwrap();
        assert_eq!(set.len(), 4);
        let kept = set.printable();
        let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1001", "1004"]);
        assert_eq!(kept[1].address_lines, "16 Oak St");
    }

    #[test]
    fn test_export_column_aliases() {
        let json = r#"[{
            "ConsID": "C-77", "PrimAddText": "Mr. and Mrs. Flanders",
            "AddrLines": "744 Evergreen Terrace", "AddrCity": "Springfield",
            "AddrState": "IL", "AddrZIP": "62704", "Year_2024": "$125.00"
        }]"#;
        let set = RecordSet::from_json(json).unwrap();
        let r = &set.records[0];
        assert_eq!(r.id, "C-77");
        assert_eq!(r.primary_address, "Mr. and Mrs. Flanders");
        assert_eq!(r.postal_code, "62704");
        assert_eq!(r.amount, "$125.00");
    }

    #[test]
    fn test_bad_json_reports_parse_error() {
        let err = RecordSet::from_json(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, LabelError::ParseError { .. }));
    }

    #[test]
    fn test_organization_map_falls_back_to_code() {
        let mut names = HashMap::new();
        names.insert("0412".to_string(), "St. Brigid Parish".to_string());
        let dir = OrganizationMap(names);
        assert_eq!(dir.display_name("0412"), "St. Brigid Parish");
        assert_eq!(dir.display_name("9999"), "9999");
    }

    #[test]
    fn test_organization_code_from_file_name() {
        assert_eq!(organization_code_from_file_name("data/export_0412_2025.json"), "0412");
        assert_eq!(organization_code_from_file_name("export_0412.json"), "0412");
        assert_eq!(organization_code_from_file_name("records.json"), "Unknown");
        assert_eq!(organization_code_from_file_name("trailing_.json"), "Unknown");
    }
}
