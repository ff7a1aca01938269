use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names used by the attendance exports.
pub mod columns {
    pub const EMPLOYEE_ID: &str = "Employee ID";
    pub const FIRST_NAME: &str = "First Name";
    pub const DEPARTMENT: &str = "Department";
    pub const REGULAR: &str = "Regular(H)";
    pub const LATE_IN: &str = "Late In(M)";
    pub const EARLY_OUT: &str = "Early Out(M)";
    pub const ABSENCE: &str = "Absence(H)";
    pub const NORMAL_OT: &str = "Normal OT(H)";
    pub const WEEKEND_OT: &str = "Weekend OT(H)";
    pub const HOLIDAY_OT: &str = "Holiday OT(H)";

    pub const IDENTITY: [&str; 3] = [EMPLOYEE_ID, FIRST_NAME, DEPARTMENT];

    pub const OVERTIME: [&str; 3] = [NORMAL_OT, WEEKEND_OT, HOLIDAY_OT];

    /// Columns coerced to numbers on load; anything unparsable becomes 0.
    pub const NUMERIC: [&str; 18] = [
        REGULAR,
        LATE_IN,
        EARLY_OUT,
        ABSENCE,
        NORMAL_OT,
        WEEKEND_OT,
        HOLIDAY_OT,
        "OT1(H)",
        "OT2(H)",
        "OT3(H)",
        "Annual Leave(H)",
        "Sick Leave(H)",
        "Casual Leave(H)",
        "Maternity Leave(H)",
        "Compassionate Leave(H)",
        "Business Trip(H)",
        "Compensatory(H)",
        "Compensatory Leave(H)",
    ];

    pub fn is_numeric(name: &str) -> bool {
        NUMERIC.contains(&name)
    }

    pub fn is_leave(name: &str) -> bool {
        name.contains("Leave")
    }

    /// Day-of-month columns are headed by bare numbers ("1" .. "31").
    pub fn is_daily(name: &str) -> bool {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => f.write_str(&format_number(*n)),
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
        }
    }
}

/// Formats with at most two decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow {
    pub values: Vec<Cell>,
}

/// One monthly attendance export, one row per employee.
#[derive(Debug, Clone)]
pub struct AttendanceSheet {
    pub columns: Vec<String>,
    pub rows: Vec<EmployeeRow>,
    pub period: String,
}

impl AttendanceSheet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: &EmployeeRow, name: &str) -> Cell {
        self.column_index(name)
            .and_then(|idx| row.values.get(idx))
            .cloned()
            .unwrap_or(Cell::Empty)
    }

    pub fn number(&self, row: &EmployeeRow, name: &str) -> f64 {
        self.column_index(name)
            .and_then(|idx| row.values.get(idx))
            .and_then(Cell::as_number)
            .unwrap_or(0.0)
    }

    pub fn text(&self, row: &EmployeeRow, name: &str) -> String {
        self.cell(row, name).to_string()
    }

    pub fn daily_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| columns::is_daily(c))
            .map(String::as_str)
            .collect()
    }

    pub fn leave_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| columns::is_leave(c))
            .cloned()
            .collect()
    }

    /// Display label used in notes and action items.
    pub fn display_name(&self, row: &EmployeeRow) -> String {
        let name = self.text(row, columns::FIRST_NAME);
        if name.trim().is_empty() {
            self.text(row, columns::EMPLOYEE_ID)
        } else {
            name
        }
    }
}

/// Column/row result of an analysis. An analysis that cannot run on the
/// loaded sheet returns a table with no columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn number(&self, row: usize, name: &str) -> f64 {
        self.column_index(name)
            .and_then(|idx| self.rows.get(row).and_then(|r| r.get(idx)))
            .and_then(Cell::as_number)
            .unwrap_or(0.0)
    }

    pub fn text(&self, row: usize, name: &str) -> String {
        self.column_index(name)
            .and_then(|idx| self.rows.get(row).and_then(|r| r.get(idx)))
            .map(|c| c.to_string())
            .unwrap_or_default()
    }

    /// Stable descending sort; ties keep their original order.
    pub fn sort_desc_by(&mut self, name: &str) {
        if let Some(idx) = self.column_index(name) {
            let key = |row: &Vec<Cell>| row.get(idx).and_then(Cell::as_number).unwrap_or(0.0);
            self.rows
                .sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(std::cmp::Ordering::Equal));
        }
    }

    pub fn head(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Projects the named columns, skipping any the table does not have.
    pub fn select(&self, names: &[&str]) -> Table {
        let indices: Vec<usize> = names.iter().filter_map(|n| self.column_index(n)).collect();
        Table {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| {
                    indices
                        .iter()
                        .map(|&i| row.get(i).cloned().unwrap_or(Cell::Empty))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn retain_rows<F: FnMut(&[Cell]) -> bool>(&mut self, mut keep: F) {
        self.rows.retain(|row| keep(row));
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricAvailability {
    pub name: String,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct DataSummary {
    pub total_employees: usize,
    pub departments: Vec<String>,
    pub columns: Vec<String>,
    pub date_range: String,
    pub metrics_available: Vec<MetricAvailability>,
    pub sample_data: Table,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub total_employees: usize,
    pub total_working_hours: f64,
    pub total_overtime: f64,
    pub total_late_minutes: f64,
    pub total_absences: f64,
    pub avg_working_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Insights {
    pub summary: MonthlyReport,
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: Priority,
    pub employee: String,
    pub issue: String,
    pub details: String,
    pub recommended_action: String,
    pub timeline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub query: String,
    pub response: String,
    pub timestamp: DateTime<Local>,
}

/// A single generated report file, named relative to the output directory.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub name: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportArtifacts {
    pub files: Vec<ReportFile>,
}
