//! Shape normalization shared by the CSV and workbook readers.

use excipient_model::Record;

/// A rectangular-ish grid of cells as read from the source, header first.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Push a row unless every cell in it is blank.
    pub fn push_row(&mut self, row: Vec<String>) {
        if row.iter().all(|value| value.trim().is_empty()) {
            return;
        }
        self.rows.push(row);
    }

    /// Header names from the first row, with placeholders for blank cells.
    pub fn headers(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(idx, raw)| header_name(idx, raw))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Convert every data row into a [`Record`], padding or truncating rows
    /// whose width differs from the header.
    pub fn into_records(self) -> Vec<Record> {
        let headers = self.headers();
        self.rows
            .into_iter()
            .skip(1)
            .map(|row| {
                let cells = row.iter().map(|value| normalize_cell(value)).collect();
                Record::from_row(&headers, cells)
            })
            .collect()
    }
}

fn header_name(idx: usize, raw: &str) -> String {
    let normalized = normalize_header(raw);
    if normalized.is_empty() {
        format!("col{idx}")
    } else {
        normalized
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}
