//! Contact records and the input conventions that produce them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Labels that mark a header row in the first column.
const HEADER_LABELS: &[&str] = &["first name", "firstname"];

/// Column layout of an input file.
///
/// The two layouts are mutually exclusive per run and always chosen by the
/// caller. Nothing in the crate tries to guess which one a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputSchema {
    /// Full name in column 0, phone in column 4.
    NamePhone,
    /// First name in column 0, last name in column 1, phone in column 2.
    #[default]
    FirstLastPhone,
}

impl InputSchema {
    /// Column indices of the required fields, in record order.
    pub fn required_columns(&self) -> &'static [usize] {
        match self {
            InputSchema::NamePhone => &[0, 4],
            InputSchema::FirstLastPhone => &[0, 1, 2],
        }
    }

    /// Header row written to a fresh output file.
    pub fn output_header(&self) -> &'static [&'static str] {
        match self {
            InputSchema::NamePhone => &["name", "number", "email", "page"],
            InputSchema::FirstLastPhone => &[
                "First Name",
                "Last Name",
                "Phone",
                "Full Name",
                "Email",
                "Source Link",
            ],
        }
    }

    /// Default free-text query for records of this layout.
    pub fn default_query_template(&self) -> &'static str {
        match self {
            InputSchema::NamePhone => "Realtor Email for: {name} {phone}",
            InputSchema::FirstLastPhone => "Email for realtor {first} {last}, {phone}",
        }
    }

    /// Build a record from the trimmed cells of one row.
    ///
    /// Returns `None` when the row fails the validity rules: a required field
    /// is empty, the first field is a header label, or the first field is a
    /// single character.
    pub fn record_from_cells(&self, row_index: usize, cells: &[String]) -> Option<ContactRecord> {
        let cell = |i: usize| cells.get(i).map(|s| s.trim()).unwrap_or("");

        if self.required_columns().iter().any(|&c| cell(c).is_empty()) {
            return None;
        }

        let first = cell(0);
        let lowered = first.to_lowercase();
        if HEADER_LABELS.contains(&lowered.as_str()) || first.chars().count() <= 1 {
            return None;
        }

        let record = match self {
            InputSchema::NamePhone => ContactRecord::new(row_index, first, "", cell(4)),
            InputSchema::FirstLastPhone => ContactRecord::new(row_index, first, cell(1), cell(2)),
        };
        Some(record)
    }
}

impl FromStr for InputSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "name-phone" | "name" | "a" => Ok(InputSchema::NamePhone),
            "first-last-phone" | "first-last" | "b" => Ok(InputSchema::FirstLastPhone),
            _ => Err(format!(
                "Unknown schema: {}. Use: first-last-phone or name-phone.",
                s
            )),
        }
    }
}

impl fmt::Display for InputSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSchema::NamePhone => write!(f, "name-phone"),
            InputSchema::FirstLastPhone => write!(f, "first-last-phone"),
        }
    }
}

/// One contact read from the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    /// Zero-based index of the source row.
    pub row_index: usize,
    pub first_name: String,
    /// Empty for [`InputSchema::NamePhone`] inputs.
    pub last_name: String,
    pub phone: String,
    full_name: String,
}

impl ContactRecord {
    /// Create a record; the full name is derived from the name parts.
    pub fn new(
        row_index: usize,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let full_name = if last_name.is_empty() {
            first_name.clone()
        } else {
            format!("{} {}", first_name, last_name)
        };

        Self {
            row_index,
            first_name,
            last_name,
            phone: phone.into(),
            full_name,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Render a query template for this record.
    ///
    /// Supported placeholders: `{first}`, `{last}`, `{name}` and `{phone}`.
    pub fn render_query(&self, template: &str) -> String {
        template
            .replace("{first}", &self.first_name)
            .replace("{last}", &self.last_name)
            .replace("{name}", &self.full_name)
            .replace("{phone}", &self.phone)
    }
}

/// Half-open range of source row indices, `[start, end)`.
///
/// `end = None` means "read to the end of the file".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWindow {
    pub start: usize,
    pub end: Option<usize>,
}

impl RowWindow {
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Window starting at `start` and running to the end of the file.
    pub fn from_start(start: usize) -> Self {
        Self { start, end: None }
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && !self.is_past_end(index)
    }

    /// True once `index` reaches the exclusive end; readers stop there.
    pub fn is_past_end(&self, index: usize) -> bool {
        self.end.is_some_and(|end| index >= end)
    }
}

impl Default for RowWindow {
    /// Skips the header row.
    fn default() -> Self {
        Self::from_start(1)
    }
}
