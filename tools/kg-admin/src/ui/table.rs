use chrono::NaiveDate;
use shared_types::{KeyRecord, KeyStatus};

const HEADERS: [&str; 6] = ["KEY", "EXPIRES", "STATUS", "HWID", "NOTES", "CREATED"];

/// Status column; active keys past their expiry read `ACTIVE (EXPIRED)`.
fn status_cell(record: &KeyRecord, today: NaiveDate) -> String {
    let status = record.status.as_str().to_uppercase();
    if record.status == KeyStatus::Active && record.is_expired_on(today) {
        format!("{} (EXPIRED)", status)
    } else {
        status
    }
}

/// Dates are shown without any time part the sheet may have added.
fn date_cell(raw: &str) -> String {
    shared_types::parse_sheet_date(raw)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn row(record: &KeyRecord, today: NaiveDate) -> [String; 6] {
    [
        record.key.clone(),
        date_cell(&record.expire_date),
        status_cell(record, today),
        record.hwid().unwrap_or("Not set").to_string(),
        record.notes.clone(),
        date_cell(&record.created_date),
    ]
}

/// Column-aligned key table.
pub fn render_keys(records: &[KeyRecord], today: NaiveDate) -> String {
    if records.is_empty() {
        return "No keys found\n".to_string();
    }

    let rows: Vec<[String; 6]> = records.iter().map(|r| row(r, today)).collect();

    let mut widths = HEADERS.map(str::len);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[&str]| -> String {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", line.trim_end())
    };

    let mut out = format_line(&HEADERS);
    for cells in &rows {
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        out.push_str(&format_line(&refs));
    }
    out
}
