use crate::domain::model::{
    columns, AttendanceSheet, Cell, DataSummary, EmployeeRow, MetricAvailability, MonthlyReport,
    Table,
};
use std::collections::BTreeMap;

/// Minutes of lateness counted as one late day when only totals are known.
pub const LATE_MINUTES_PER_DAY: f64 = 30.0;

/// Average number of weeks in a month.
pub const WEEKS_PER_MONTH: f64 = 4.33;

pub const TOTAL_OT: &str = "Total OT";
pub const TOTAL_LEAVE: &str = "Total Leave(H)";
pub const LATE_COUNT: &str = "Late_Count";
pub const AVG_WEEKLY_HOURS: &str = "Avg Weekly Hours";
pub const PUNCTUALITY_SCORE: &str = "Punctuality Score";
pub const EMPLOYEE_COUNT: &str = "Employee_Count";

const DEPARTMENT_METRICS: [&str; 5] = [
    columns::REGULAR,
    columns::LATE_IN,
    columns::EARLY_OUT,
    columns::NORMAL_OT,
    columns::ABSENCE,
];

pub struct AttendanceAnalyzer {
    sheet: AttendanceSheet,
}

impl AttendanceAnalyzer {
    pub fn new(sheet: AttendanceSheet) -> Self {
        Self { sheet }
    }

    pub fn sheet(&self) -> &AttendanceSheet {
        &self.sheet
    }

    pub fn period(&self) -> &str {
        &self.sheet.period
    }

    fn identity(&self, row: &EmployeeRow) -> Vec<Cell> {
        columns::IDENTITY
            .iter()
            .map(|col| self.sheet.cell(row, col))
            .collect()
    }

    fn identity_table<'a>(&self, extra: impl IntoIterator<Item = &'a str>) -> Table {
        Table::new(columns::IDENTITY.iter().copied().chain(extra))
    }

    pub fn data_summary(&self) -> DataSummary {
        let sheet = &self.sheet;

        let mut departments: Vec<String> = Vec::new();
        if sheet.has_column(columns::DEPARTMENT) {
            for row in &sheet.rows {
                let dept = sheet.text(row, columns::DEPARTMENT);
                if !dept.trim().is_empty() && !departments.contains(&dept) {
                    departments.push(dept);
                }
            }
        }

        let metric = |name: &str, available: bool| MetricAvailability {
            name: name.to_string(),
            available,
        };
        let metrics_available = vec![
            metric("working_hours", sheet.has_column(columns::REGULAR)),
            metric("late_arrivals", sheet.has_column(columns::LATE_IN)),
            metric("early_departures", sheet.has_column(columns::EARLY_OUT)),
            metric("overtime", sheet.has_column(columns::NORMAL_OT)),
            metric("leaves", !sheet.leave_columns().is_empty()),
            metric("absences", sheet.has_column(columns::ABSENCE)),
        ];

        let mut sample_data = Table::new(sheet.columns.iter().cloned());
        for row in sheet.rows.iter().take(3) {
            sample_data.push_row(row.values.clone());
        }

        DataSummary {
            total_employees: sheet.len(),
            departments,
            columns: sheet.columns.clone(),
            date_range: sheet.period.clone(),
            metrics_available,
            sample_data,
        }
    }

    /// Employees with late minutes. With day-of-month columns present the late
    /// day count is estimated and filtered against `min_times`.
    pub fn late_employees(&self, min_times: u32) -> Table {
        let sheet = &self.sheet;
        if !sheet.has_column(columns::LATE_IN) {
            return Table::empty();
        }

        let with_count = !sheet.daily_columns().is_empty();
        let mut table = if with_count {
            self.identity_table([columns::LATE_IN, LATE_COUNT])
        } else {
            self.identity_table([columns::LATE_IN])
        };

        for row in &sheet.rows {
            let late = sheet.number(row, columns::LATE_IN);
            if late <= 0.0 {
                continue;
            }
            let mut cells = self.identity(row);
            cells.push(Cell::Number(late));
            if with_count {
                let count = estimate_late_days(late);
                if count < f64::from(min_times) {
                    continue;
                }
                cells.push(Cell::Number(count));
            }
            table.push_row(cells);
        }
        table
    }

    pub fn overtime_analysis(&self) -> Table {
        let sheet = &self.sheet;
        let available: Vec<&str> = columns::OVERTIME
            .iter()
            .copied()
            .filter(|c| sheet.has_column(c))
            .collect();
        if available.is_empty() {
            return Table::empty();
        }

        let mut table = self.identity_table(available.iter().copied().chain([TOTAL_OT]));
        for row in &sheet.rows {
            let mut cells = self.identity(row);
            let mut total = 0.0;
            for col in &available {
                let value = sheet.number(row, col);
                total += value;
                cells.push(Cell::Number(value));
            }
            cells.push(Cell::Number(total));
            table.push_row(cells);
        }
        table.sort_desc_by(TOTAL_OT);
        table
    }

    pub fn working_hours_summary(&self) -> Table {
        let mut table = self.metric_table(columns::REGULAR, |_| true);
        table.sort_desc_by(columns::REGULAR);
        table
    }

    pub fn leave_analysis(&self) -> Table {
        let sheet = &self.sheet;
        let leave_cols = sheet.leave_columns();
        if leave_cols.is_empty() {
            return Table::empty();
        }

        let mut table =
            self.identity_table(leave_cols.iter().map(String::as_str).chain([TOTAL_LEAVE]));
        for row in &sheet.rows {
            let mut cells = self.identity(row);
            let mut total = 0.0;
            for col in &leave_cols {
                let value = sheet.number(row, col);
                total += value;
                cells.push(Cell::Number(value));
            }
            if total <= 0.0 {
                continue;
            }
            cells.push(Cell::Number(total));
            table.push_row(cells);
        }
        table.sort_desc_by(TOTAL_LEAVE);
        table
    }

    pub fn absence_analysis(&self) -> Table {
        let mut table = self.metric_table(columns::ABSENCE, |absence| absence > 0.0);
        table.sort_desc_by(columns::ABSENCE);
        table
    }

    pub fn department_summary(&self) -> Table {
        let sheet = &self.sheet;
        if !sheet.has_column(columns::DEPARTMENT) {
            return Table::empty();
        }
        let metrics: Vec<&str> = DEPARTMENT_METRICS
            .iter()
            .copied()
            .filter(|c| sheet.has_column(c))
            .collect();
        if metrics.is_empty() {
            return Table::empty();
        }

        // 依部門名稱排序
        let mut groups: BTreeMap<String, (usize, Vec<f64>)> = BTreeMap::new();
        for row in &sheet.rows {
            let dept = sheet.text(row, columns::DEPARTMENT);
            if dept.trim().is_empty() {
                continue;
            }
            let entry = groups
                .entry(dept)
                .or_insert_with(|| (0, vec![0.0; metrics.len()]));
            entry.0 += 1;
            for (sum, col) in entry.1.iter_mut().zip(&metrics) {
                *sum += sheet.number(row, col);
            }
        }

        let mut table = Table::new(
            [columns::DEPARTMENT, EMPLOYEE_COUNT]
                .into_iter()
                .chain(metrics.iter().copied()),
        );
        for (dept, (count, sums)) in groups {
            let mut cells = vec![Cell::Text(dept), Cell::from(count)];
            cells.extend(sums.into_iter().map(Cell::Number));
            table.push_row(cells);
        }
        table
    }

    pub fn top_performers(&self, n: usize, metric: &str) -> Table {
        let mut table = self.metric_table(metric, |_| true);
        table.sort_desc_by(metric);
        table.head(n)
    }

    /// Weekly hours estimated from the monthly total.
    pub fn weekly_breakdown(&self) -> Table {
        let sheet = &self.sheet;
        if !sheet.has_column(columns::REGULAR) {
            return Table::empty();
        }

        let mut table = self.identity_table([columns::REGULAR, AVG_WEEKLY_HOURS]);
        for row in &sheet.rows {
            let regular = sheet.number(row, columns::REGULAR);
            let mut cells = self.identity(row);
            cells.push(Cell::Number(regular));
            cells.push(Cell::Number(weekly_hours(regular)));
            table.push_row(cells);
        }
        table
    }

    /// Score out of 100, one point lost per ten minutes late or leaving early.
    pub fn punctuality_score(&self) -> Table {
        let sheet = &self.sheet;
        let has_late = sheet.has_column(columns::LATE_IN);
        let has_early = sheet.has_column(columns::EARLY_OUT);

        let mut table = self.identity_table([PUNCTUALITY_SCORE]);
        for row in &sheet.rows {
            let score = if has_late {
                let mut violations = sheet.number(row, columns::LATE_IN);
                if has_early {
                    violations += sheet.number(row, columns::EARLY_OUT);
                }
                round2((100.0 - violations / 10.0).clamp(0.0, 100.0))
            } else {
                100.0
            };
            let mut cells = self.identity(row);
            cells.push(Cell::Number(score));
            table.push_row(cells);
        }
        table.sort_desc_by(PUNCTUALITY_SCORE);
        table
    }

    pub fn monthly_report(&self, employee_id: Option<&str>) -> MonthlyReport {
        let sheet = &self.sheet;
        let selected: Vec<&EmployeeRow> = sheet
            .rows
            .iter()
            .filter(|row| match employee_id {
                Some(id) => sheet.text(row, columns::EMPLOYEE_ID) == id.trim(),
                None => true,
            })
            .collect();

        let total = |col: &str| -> f64 { selected.iter().map(|row| sheet.number(row, col)).sum() };
        let total_working_hours = total(columns::REGULAR);

        MonthlyReport {
            total_employees: selected.len(),
            total_working_hours,
            total_overtime: total(columns::NORMAL_OT),
            total_late_minutes: total(columns::LATE_IN),
            total_absences: total(columns::ABSENCE),
            avg_working_hours: if selected.is_empty() {
                0.0
            } else {
                total_working_hours / selected.len() as f64
            },
        }
    }

    /// Case-insensitive match on name, employee id, and department.
    pub fn search_employees(&self, query: &str) -> Table {
        let sheet = &self.sheet;
        let needle = query.trim().to_lowercase();

        let mut table = Table::new(sheet.columns.iter().cloned());
        for row in &sheet.rows {
            let matched = [columns::FIRST_NAME, columns::EMPLOYEE_ID, columns::DEPARTMENT]
                .iter()
                .filter(|col| sheet.has_column(col))
                .any(|col| sheet.text(row, col).to_lowercase().contains(&needle));
            if matched {
                table.push_row(row.values.clone());
            }
        }
        table
    }

    /// Mean of a numeric column over all employees, 0 when absent or empty.
    pub fn mean(&self, column: &str) -> f64 {
        let sheet = &self.sheet;
        if !sheet.has_column(column) || sheet.is_empty() {
            return 0.0;
        }
        self.sum(column) / sheet.len() as f64
    }

    pub fn sum(&self, column: &str) -> f64 {
        let sheet = &self.sheet;
        sheet.rows.iter().map(|row| sheet.number(row, column)).sum()
    }

    /// Identity columns plus one metric, keeping rows accepted by `keep`.
    fn metric_table<F: Fn(f64) -> bool>(&self, metric: &str, keep: F) -> Table {
        let sheet = &self.sheet;
        if !sheet.has_column(metric) {
            return Table::empty();
        }

        let mut table = self.identity_table([metric]);
        for row in &sheet.rows {
            let value = sheet.number(row, metric);
            if !keep(value) {
                continue;
            }
            let mut cells = self.identity(row);
            cells.push(Cell::Number(value));
            table.push_row(cells);
        }
        table
    }
}

pub fn estimate_late_days(late_minutes: f64) -> f64 {
    (late_minutes / LATE_MINUTES_PER_DAY).ceil()
}

pub fn weekly_hours(monthly_hours: f64) -> f64 {
    round2(monthly_hours / WEEKS_PER_MONTH)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
