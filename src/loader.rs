use std::path::Path;

use crate::error::{RedeError, Result};
use crate::models::{RawCell, Sheet};

#[derive(Debug, Clone, Copy, PartialEq)]
enum SheetFormat {
    Csv,
    #[cfg(feature = "xlsx")]
    Workbook,
}

fn detect_format(path: &Path) -> Result<SheetFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" | "txt" => Ok(SheetFormat::Csv),
        #[cfg(feature = "xlsx")]
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SheetFormat::Workbook),
        _ => Err(RedeError::UnsupportedFile(path.display().to_string())),
    }
}

/// Read the first table of a file, using row `header_row` as column labels.
pub fn load_sheet(path: &Path, header_row: usize) -> Result<Sheet> {
    let rows = match detect_format(path)? {
        SheetFormat::Csv => read_csv_rows(path, header_row)?,
        #[cfg(feature = "xlsx")]
        SheetFormat::Workbook => read_workbook_rows(path)?,
    };
    let sheet = Sheet::from_rows(rows, header_row);
    tracing::info!(
        file = %path.display(),
        columns = sheet.headers.len(),
        rows = sheet.rows.len(),
        "loaded sheet"
    );
    Ok(sheet)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Exports from Brazilian Excel use `;` so decimal commas stay unquoted.
/// Decided on the header line: a title above it may hold stray commas.
fn sniff_delimiter(content: &str, header_row: usize) -> u8 {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header = lines.clone().nth(header_row).or_else(|| lines.next()).unwrap_or("");
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons >= commas && semicolons > 0 {
        b';'
    } else {
        b','
    }
}

/// Excel on Windows saves CSV as Windows-1252 unless told otherwise.
fn decode_text(path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(file = %path.display(), "not UTF-8, reading as Windows-1252");
            let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(e.as_bytes());
            text.into_owned()
        }
    }
}

fn read_csv_rows(path: &Path, header_row: usize) -> Result<Vec<Vec<RawCell>>> {
    let content = decode_text(path, std::fs::read(path)?);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(sniff_delimiter(content, header_row))
        .from_reader(content.as_bytes());
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(RawCell::from).collect());
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Workbooks (feature-gated)
// ---------------------------------------------------------------------------

#[cfg(feature = "xlsx")]
fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<RawCell>>> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| RedeError::Spreadsheet(format!("Failed to open {}: {e}", path.display())))?;
    let Some(first) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };
    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| RedeError::Spreadsheet(format!("Failed to read sheet {first}: {e}")))?;

    Ok(range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => RawCell::Empty,
                    Data::Int(i) => RawCell::Int(*i),
                    Data::Float(f) => RawCell::Float(*f),
                    Data::Bool(b) => RawCell::Bool(*b),
                    Data::String(s) => RawCell::from(s.as_str()),
                    Data::Error(_) => RawCell::Empty,
                    other => RawCell::Text(other.to_string()),
                })
                .collect()
        })
        .collect())
}
