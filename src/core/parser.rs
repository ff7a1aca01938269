use crate::domain::model::{columns, AttendanceSheet, Cell, EmployeeRow};
use crate::utils::error::{AnalyticsError, Result};
use chrono::Local;
use csv::ReaderBuilder;

/// The header row is searched for within this many leading rows.
const HEADER_SCAN_ROWS: usize = 10;

#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub delimiter: u8,
    /// Fallback header row when no row contains an `Employee ID` cell.
    pub header_row: usize,
    pub period: String,
}

impl ParseOptions {
    pub fn for_path(path: &str, header_row: usize, period: Option<&str>) -> Self {
        Self {
            delimiter: delimiter_for(path),
            header_row,
            period: period.map(str::to_string).unwrap_or_else(current_period),
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header_row: 0,
            period: current_period(),
        }
    }
}

pub fn delimiter_for(path: &str) -> u8 {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("tsv") | Some("tab") => b'\t',
        _ => b',',
    }
}

/// Month and year the export is reported under, e.g. "November 2024".
pub fn current_period() -> String {
    Local::now().format("%B %Y").to_string()
}

pub fn parse_attendance(data: &[u8], options: &ParseOptions) -> Result<AttendanceSheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(data);

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    // 去掉 UTF-8 BOM（Excel 匯出的 CSV 常見）
    if let Some(first) = raw_rows.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    if raw_rows.is_empty() {
        return Err(AnalyticsError::ValidationError {
            message: "attendance export contains no rows".to_string(),
        });
    }

    let header_idx = detect_header_row(&raw_rows).unwrap_or(options.header_row);
    if header_idx >= raw_rows.len() {
        return Err(AnalyticsError::ValidationError {
            message: format!(
                "header row {} is beyond the end of the export ({} rows)",
                header_idx,
                raw_rows.len()
            ),
        });
    }
    tracing::debug!("Using row {} as the header row", header_idx);

    let width = raw_rows[header_idx..]
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    let header = &raw_rows[header_idx];
    let column_names: Vec<String> = (0..width)
        .map(|i| {
            let name = header.get(i).map(|s| s.trim()).unwrap_or("");
            if name.is_empty() {
                format!("Col_{}", i)
            } else {
                name.to_string()
            }
        })
        .collect();

    if !column_names.iter().any(|c| c == columns::EMPLOYEE_ID) {
        return Err(AnalyticsError::ValidationError {
            message: format!(
                "missing required column '{}' (found: {})",
                columns::EMPLOYEE_ID,
                column_names.join(", ")
            ),
        });
    }

    let mut rows = Vec::new();
    for raw in &raw_rows[header_idx + 1..] {
        if raw.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let values = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| convert_cell(name, raw.get(i).map(String::as_str).unwrap_or("")))
            .collect();
        rows.push(EmployeeRow { values });
    }

    tracing::debug!(
        "Parsed {} employee rows with {} columns",
        rows.len(),
        column_names.len()
    );

    Ok(AttendanceSheet {
        columns: column_names,
        rows,
        period: options.period.clone(),
    })
}

fn detect_header_row(rows: &[Vec<String>]) -> Option<usize> {
    rows.iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| row.iter().any(|cell| cell.trim() == columns::EMPLOYEE_ID))
}

fn convert_cell(column: &str, raw: &str) -> Cell {
    let value = raw.trim();

    if columns::is_numeric(column) {
        return Cell::Number(parse_number(value).unwrap_or(0.0));
    }

    if value.is_empty() {
        return Cell::Empty;
    }

    if column == columns::EMPLOYEE_ID {
        return Cell::Text(normalize_employee_id(value));
    }

    Cell::Text(value.to_string())
}

fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// "101.0" and "101" name the same employee.
fn normalize_employee_id(value: &str) -> String {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
        _ => value.to_string(),
    }
}
