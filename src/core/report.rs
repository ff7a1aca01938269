use crate::core::analyzer::{estimate_late_days, AttendanceAnalyzer};
use crate::core::insights::{status, InsightEngine, Thresholds, NO_ACTION_ITEMS};
use crate::domain::model::{
    columns, ActionItem, Cell, EmployeeRow, Insights, ReportArtifacts, ReportFile, Table,
};
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use zip::write::{FileOptions, ZipWriter};

pub const BUNDLE_FILE: &str = "attendance_report.zip";
pub const MARKDOWN_FILE: &str = "attendance_report.md";

const TOP_ROWS: usize = 10;
const MAX_ACTIONS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Bundle,
    Markdown,
    #[default]
    Both,
}

impl ReportFormat {
    pub fn includes_bundle(self) -> bool {
        matches!(self, ReportFormat::Bundle | ReportFormat::Both)
    }

    pub fn includes_markdown(self) -> bool {
        matches!(self, ReportFormat::Markdown | ReportFormat::Both)
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bundle" | "zip" | "excel" => Ok(ReportFormat::Bundle),
            "markdown" | "md" | "pdf" => Ok(ReportFormat::Markdown),
            "both" | "all" => Ok(ReportFormat::Both),
            other => Err(format!(
                "unknown report format '{}' (expected bundle, markdown or both)",
                other
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Bundle => "bundle",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Both => "both",
        };
        f.write_str(name)
    }
}

#[derive(Serialize)]
struct InsightsDocument<'a> {
    period: &'a str,
    generated_at: String,
    insights: &'a Insights,
    action_items: &'a [ActionItem],
}

/// Builds the HR report files for one attendance export.
pub struct ReportGenerator<'a> {
    analyzer: &'a AttendanceAnalyzer,
    engine: InsightEngine<'a>,
    insights: Insights,
    generated_at: DateTime<Local>,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(
        analyzer: &'a AttendanceAnalyzer,
        thresholds: &'a Thresholds,
        generated_at: DateTime<Local>,
    ) -> Self {
        let engine = InsightEngine::new(analyzer, thresholds);
        let insights = engine.generate();
        Self {
            analyzer,
            engine,
            insights,
            generated_at,
        }
    }

    pub fn insights(&self) -> &Insights {
        &self.insights
    }

    pub fn generate(&self, format: ReportFormat) -> Result<ReportArtifacts> {
        let mut artifacts = ReportArtifacts::default();

        if format.includes_bundle() {
            artifacts.files.push(ReportFile {
                name: BUNDLE_FILE.to_string(),
                contents: self.workbook_bundle()?,
            });
        }

        if format.includes_markdown() {
            artifacts.files.push(ReportFile {
                name: MARKDOWN_FILE.to_string(),
                contents: self.markdown_report().into_bytes(),
            });
        }

        Ok(artifacts)
    }

    /// Sheet file name and contents, in workbook order. Sheets whose source
    /// columns are missing are left out.
    pub fn workbook_sheets(&self) -> Vec<(&'static str, Table)> {
        let mut sheets = vec![("executive_summary.csv", self.executive_summary_sheet())];
        sheets.push(("employee_details.csv", self.employee_details_sheet()));

        let optional = [
            ("late_arrivals.csv", self.late_arrivals_sheet()),
            ("overtime_analysis.csv", self.overtime_sheet()),
            ("leave_analysis.csv", self.leave_sheet()),
            ("department_summary.csv", self.department_sheet()),
        ];
        for (name, sheet) in optional {
            if let Some(sheet) = sheet {
                sheets.push((name, sheet));
            }
        }

        sheets.push(("action_items.csv", self.action_items_sheet()));
        sheets
    }

    pub fn workbook_bundle(&self) -> Result<Vec<u8>> {
        let sheets = self.workbook_sheets();
        tracing::debug!("Creating report bundle with {} sheets", sheets.len());

        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for (name, sheet) in &sheets {
            zip.start_file::<_, ()>(*name, FileOptions::default())?;
            zip.write_all(sheet.to_csv()?.as_bytes())?;
        }

        let action_items = self.engine.action_items();
        let document = InsightsDocument {
            period: self.analyzer.period(),
            generated_at: self.generated_at.to_rfc3339(),
            insights: &self.insights,
            action_items: &action_items,
        };
        zip.start_file::<_, ()>("insights.json", FileOptions::default())?;
        zip.write_all(serde_json::to_string_pretty(&document)?.as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn executive_summary_sheet(&self) -> Table {
        let t = self.engine.thresholds();
        let s = &self.insights.summary;
        let concerns = &self.insights.concerns;

        let mut table = Table::new(["Metric", "Value", "Status"]);
        let mut row = |metric: &str, value: String, state: &str| {
            table.push_row(vec![metric.into(), value.into(), state.into()]);
        };
        row("Report Period", self.analyzer.period().to_string(), "Info");
        row("Total Employees", s.total_employees.to_string(), "Info");
        row(
            "Average Working Hours",
            format!("{:.2}", s.avg_working_hours),
            status(s.avg_working_hours < t.healthy_avg_hours),
        );
        row(
            "Total Late Minutes",
            format!("{:.0}", s.total_late_minutes),
            status(s.total_late_minutes > t.total_late_warning),
        );
        row(
            "Total Overtime Hours",
            format!("{:.2}", s.total_overtime),
            status(s.total_overtime > t.total_overtime_warning),
        );
        row(
            "Total Absence Hours",
            format!("{:.2}", s.total_absences),
            status(s.total_absences > t.total_absence_warning),
        );
        row(
            "Employees Needing Attention",
            concerns.len().to_string(),
            status(!concerns.is_empty()),
        );

        let blank = || vec![Cell::Empty, Cell::Empty, Cell::Empty];
        table.push_row(blank());
        table.push_row(vec!["KEY CONCERNS:".into(), Cell::Empty, Cell::Empty]);
        for concern in concerns {
            table.push_row(vec![format!("• {}", concern).into(), Cell::Empty, Cell::Empty]);
        }
        table.push_row(blank());
        table.push_row(vec!["RECOMMENDATIONS:".into(), Cell::Empty, Cell::Empty]);
        for rec in &self.insights.recommendations {
            table.push_row(vec![format!("• {}", rec).into(), Cell::Empty, Cell::Empty]);
        }
        table
    }

    fn employee_details_sheet(&self) -> Table {
        let sheet = self.analyzer.sheet();
        let mut table = Table::new(
            sheet
                .columns
                .iter()
                .cloned()
                .chain(["HR_Notes".to_string(), "Priority".to_string()]),
        );
        for row in &sheet.rows {
            let mut cells = row.values.clone();
            cells.push(self.engine.employee_note(row).into());
            cells.push(self.engine.priority(row).to_string().into());
            table.push_row(cells);
        }
        table
    }

    fn late_arrivals_sheet(&self) -> Option<Table> {
        let sheet = self.analyzer.sheet();
        if !sheet.has_column(columns::LATE_IN) {
            return None;
        }
        let t = self.engine.thresholds();

        let mut table = Table::new(
            columns::IDENTITY.iter().copied().chain([
                columns::LATE_IN,
                "Days_Late_Estimate",
                "Severity",
                "Follow_Up_Required",
            ]),
        );
        for row in &sheet.rows {
            let late = sheet.number(row, columns::LATE_IN);
            if late <= 0.0 {
                continue;
            }
            let mut cells: Vec<Cell> = columns::IDENTITY
                .iter()
                .map(|c| sheet.cell(row, c))
                .collect();
            cells.push(Cell::Number(late));
            cells.push(Cell::Number(estimate_late_days(late)));
            cells.push(t.late_severity(late).into());
            cells.push(t.late_follow_up(late).into());
            table.push_row(cells);
        }
        table.sort_desc_by(columns::LATE_IN);
        Some(table)
    }

    fn overtime_sheet(&self) -> Option<Table> {
        let t = self.engine.thresholds();
        let mut table = self.analyzer.overtime_analysis();
        if table.columns.is_empty() {
            return None;
        }

        let total_idx = table.column_index(crate::core::analyzer::TOTAL_OT)?;
        table.columns[total_idx] = "Total_OT".to_string();
        table.columns.push("OT_Level".to_string());
        table.columns.push("Action_Required".to_string());
        table.retain_rows(|row| row[total_idx].as_number().unwrap_or(0.0) > 0.0);
        for row in &mut table.rows {
            let total = row[total_idx].as_number().unwrap_or(0.0);
            row.push(t.overtime_level(total).into());
            row.push(t.overtime_action(total).into());
        }
        Some(table)
    }

    fn leave_sheet(&self) -> Option<Table> {
        let mut table = self.analyzer.leave_analysis();
        if table.columns.is_empty() {
            return None;
        }
        if let Some(idx) = table.column_index(crate::core::analyzer::TOTAL_LEAVE) {
            table.columns[idx] = "Total_Leave".to_string();
        }
        Some(table)
    }

    fn department_sheet(&self) -> Option<Table> {
        let sheet = self.analyzer.sheet();
        if !sheet.has_column(columns::DEPARTMENT) {
            return None;
        }

        let has_regular = sheet.has_column(columns::REGULAR);
        let sums: Vec<&str> = [columns::LATE_IN, columns::NORMAL_OT]
            .into_iter()
            .filter(|c| sheet.has_column(c))
            .collect();

        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, row) in sheet.rows.iter().enumerate() {
            let dept = sheet.text(row, columns::DEPARTMENT);
            if !dept.trim().is_empty() {
                groups.entry(dept).or_default().push(idx);
            }
        }

        let mut header = vec![
            columns::DEPARTMENT.to_string(),
            format!("{}_count", columns::EMPLOYEE_ID),
        ];
        if has_regular {
            header.push(format!("{}_sum", columns::REGULAR));
            header.push(format!("{}_mean", columns::REGULAR));
        }
        header.extend(sums.iter().map(|c| format!("{}_sum", c)));

        let mut table = Table::new(header);
        for (dept, members) in groups {
            let total = |col: &str| -> f64 {
                members
                    .iter()
                    .map(|&i| sheet.number(&sheet.rows[i], col))
                    .sum()
            };
            let mut cells = vec![Cell::Text(dept.clone()), Cell::from(members.len())];
            if has_regular {
                let regular = total(columns::REGULAR);
                cells.push(Cell::Number(regular));
                cells.push(Cell::Number(regular / members.len() as f64));
            }
            for col in &sums {
                cells.push(Cell::Number(total(col)));
            }
            table.push_row(cells);
        }
        Some(table)
    }

    fn action_items_sheet(&self) -> Table {
        let items = self.engine.action_items();
        if items.is_empty() {
            let mut table = Table::new(["Message"]);
            table.push_row(vec![NO_ACTION_ITEMS.into()]);
            return table;
        }

        let mut table = Table::new([
            "Priority",
            "Employee",
            "Issue",
            "Details",
            "Recommended_Action",
            "Timeline",
        ]);
        for item in items {
            table.push_row(vec![
                item.priority.to_string().into(),
                item.employee.into(),
                item.issue.into(),
                item.details.into(),
                item.recommended_action.into(),
                item.timeline.into(),
            ]);
        }
        table
    }

    /// Written HR report in Markdown.
    pub fn markdown_report(&self) -> String {
        let t = self.engine.thresholds();
        let s = &self.insights.summary;
        let sheet = self.analyzer.sheet();
        let mut out = String::new();

        out.push_str(&format!("# Attendance Report - {}\n\n", self.analyzer.period()));

        out.push_str("## Executive Summary\n\n");
        let mut summary = Table::new(["Metric", "Value", "Status"]);
        summary.push_row(vec![
            "Total Employees".into(),
            s.total_employees.to_string().into(),
            "Info".into(),
        ]);
        summary.push_row(vec![
            "Avg Working Hours".into(),
            format!("{:.2}", s.avg_working_hours).into(),
            status(s.avg_working_hours < t.healthy_avg_hours).into(),
        ]);
        summary.push_row(vec![
            "Total Late Minutes".into(),
            format!("{:.0}", s.total_late_minutes).into(),
            status(s.total_late_minutes > t.total_late_warning).into(),
        ]);
        summary.push_row(vec![
            "Total Overtime".into(),
            format!("{:.2}h", s.total_overtime).into(),
            status(s.total_overtime > t.total_overtime_warning).into(),
        ]);
        out.push_str(&summary.to_markdown());
        out.push_str("\n\n");

        let bullets = |title: &str, items: &[String], out: &mut String| {
            if items.is_empty() {
                return;
            }
            out.push_str(&format!("## {}\n\n", title));
            for item in items {
                out.push_str(&format!("- {}\n", item));
            }
            out.push('\n');
        };
        bullets("Key Concerns", &self.insights.concerns, &mut out);
        bullets("Recommendations", &self.insights.recommendations, &mut out);
        bullets("Highlights", &self.insights.highlights, &mut out);

        let department = |row: &EmployeeRow| {
            let dept = sheet.text(row, columns::DEPARTMENT);
            if dept.trim().is_empty() {
                "N/A".to_string()
            } else {
                dept
            }
        };

        if sheet.has_column(columns::LATE_IN) {
            out.push_str("## Late Arrivals Analysis\n\n");
            let mut late = Table::new(["Employee", "Department", "Late Minutes", "Action"]);
            let mut rows: Vec<_> = sheet
                .rows
                .iter()
                .filter(|row| sheet.number(row, columns::LATE_IN) > t.severe_late_minutes)
                .collect();
            rows.sort_by(|a, b| {
                sheet
                    .number(b, columns::LATE_IN)
                    .partial_cmp(&sheet.number(a, columns::LATE_IN))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            for row in rows.into_iter().take(TOP_ROWS) {
                let minutes = sheet.number(row, columns::LATE_IN);
                let action = if minutes > t.critical_late_minutes {
                    "Immediate"
                } else {
                    "Follow-up"
                };
                late.push_row(vec![
                    sheet.display_name(row).into(),
                    department(row).into(),
                    format!("{:.0}", minutes).into(),
                    action.into(),
                ]);
            }
            if late.is_empty() {
                out.push_str(&format!(
                    "_No employees above {} late minutes._\n\n",
                    t.severe_late_minutes
                ));
            } else {
                out.push_str(&late.to_markdown());
                out.push_str("\n\n");
            }
        }

        if sheet.has_column(columns::NORMAL_OT) {
            out.push_str("## Overtime Analysis\n\n");
            let mut ot = Table::new(["Employee", "Department", "OT Hours", "Level"]);
            let mut rows: Vec<_> = sheet
                .rows
                .iter()
                .filter(|row| sheet.number(row, columns::NORMAL_OT) > t.note_overtime_hours)
                .collect();
            rows.sort_by(|a, b| {
                sheet
                    .number(b, columns::NORMAL_OT)
                    .partial_cmp(&sheet.number(a, columns::NORMAL_OT))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            for row in rows.into_iter().take(TOP_ROWS) {
                let hours = sheet.number(row, columns::NORMAL_OT);
                let level = if hours > t.high_overtime_hours {
                    "High"
                } else {
                    "Moderate"
                };
                ot.push_row(vec![
                    sheet.display_name(row).into(),
                    department(row).into(),
                    format!("{:.1}", hours).into(),
                    level.into(),
                ]);
            }
            if ot.is_empty() {
                out.push_str(&format!(
                    "_No employees above {} overtime hours._\n\n",
                    t.note_overtime_hours
                ));
            } else {
                out.push_str(&ot.to_markdown());
                out.push_str("\n\n");
            }
        }

        out.push_str("## HR Action Items\n\n");
        out.push_str("Employees requiring immediate attention:\n\n");
        for action in self.engine.action_summary().iter().take(MAX_ACTIONS) {
            out.push_str(&format!("- {}\n", action));
        }
        out.push('\n');

        out.push_str("---\n\n");
        out.push_str(&format!(
            "Generated on: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M")
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::{parse_attendance, ParseOptions};
    use chrono::TimeZone;
    use std::io::Read;

    const EXPORT: &str = "\
Employee ID,First Name,Department,Regular(H),Late In(M),Absence(H),Normal OT(H),Weekend OT(H),Annual Leave(H)
101,Alice,Engineering,168,0,0,12,0,8
102,Bob,Sales,150,95,24,35,4,0
103,Cara,Engineering,172,130,0,5,0,0
104,Dan,,160,20,0,0,0,0
";

    fn analyzer(csv: &str) -> AttendanceAnalyzer {
        let options = ParseOptions {
            delimiter: b',',
            header_row: 0,
            period: "November 2024".to_string(),
        };
        AttendanceAnalyzer::new(parse_attendance(csv.as_bytes(), &options).unwrap())
    }

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 12, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("bundle".parse::<ReportFormat>().unwrap(), ReportFormat::Bundle);
        assert_eq!("MD".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("both".parse::<ReportFormat>().unwrap(), ReportFormat::Both);
        assert!("docx".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_workbook_sheet_order() {
        let analyzer = analyzer(EXPORT);
        let thresholds = Thresholds::default();
        let generator = ReportGenerator::new(&analyzer, &thresholds, generated_at());

        let names: Vec<&str> = generator.workbook_sheets().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "executive_summary.csv",
                "employee_details.csv",
                "late_arrivals.csv",
                "overtime_analysis.csv",
                "leave_analysis.csv",
                "department_summary.csv",
                "action_items.csv",
            ]
        );
    }

    #[test]
    fn test_sheets_follow_available_columns() {
        let analyzer = analyzer("Employee ID,First Name,Regular(H)\n1,Ann,150\n");
        let thresholds = Thresholds::default();
        let generator = ReportGenerator::new(&analyzer, &thresholds, generated_at());

        let sheets = generator.workbook_sheets();
        let names: Vec<&str> = sheets.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec!["executive_summary.csv", "employee_details.csv", "action_items.csv"]
        );

        let (_, actions) = sheets.last().unwrap();
        assert_eq!(actions.columns, vec!["Message"]);
        assert_eq!(actions.text(0, "Message"), NO_ACTION_ITEMS);
    }

    #[test]
    fn test_executive_summary_statuses() {
        let analyzer = analyzer(EXPORT);
        let thresholds = Thresholds::default();
        let generator = ReportGenerator::new(&analyzer, &thresholds, generated_at());
        let sheets = generator.workbook_sheets();
        let summary = &sheets[0].1;

        assert_eq!(summary.text(0, "Value"), "November 2024");
        assert_eq!(summary.text(2, "Value"), "162.50");
        assert_eq!(summary.text(2, "Status"), STATUS_OK_MARK);
        assert_eq!(summary.text(3, "Value"), "245");
        assert_eq!(summary.text(6, "Value"), "3");
        assert_eq!(summary.text(6, "Status"), STATUS_WARN_MARK);
        assert_eq!(summary.text(8, "Metric"), "KEY CONCERNS:");
    }

    const STATUS_OK_MARK: &str = crate::core::insights::STATUS_OK;
    const STATUS_WARN_MARK: &str = crate::core::insights::STATUS_WARN;

    #[test]
    fn test_overtime_sheet_levels() {
        let analyzer = analyzer(EXPORT);
        let thresholds = Thresholds::default();
        let generator = ReportGenerator::new(&analyzer, &thresholds, generated_at());
        let sheets = generator.workbook_sheets();
        let (_, overtime) = sheets
            .iter()
            .find(|(n, _)| *n == "overtime_analysis.csv")
            .unwrap();

        // Dan has no overtime and is dropped
        assert_eq!(overtime.len(), 3);
        assert_eq!(overtime.text(0, "First Name"), "Bob");
        assert_eq!(overtime.number(0, "Total_OT"), 39.0);
        assert_eq!(overtime.text(0, "OT_Level"), "Excessive (>30h)");
        assert_eq!(overtime.text(0, "Action_Required"), "Review workload & consider support");
        assert_eq!(overtime.text(1, "OT_Level"), "Moderate (10-20h)");
    }

    #[test]
    fn test_department_sheet_skips_blank_departments() {
        let analyzer = analyzer(EXPORT);
        let thresholds = Thresholds::default();
        let generator = ReportGenerator::new(&analyzer, &thresholds, generated_at());
        let sheets = generator.workbook_sheets();
        let (_, depts) = sheets
            .iter()
            .find(|(n, _)| *n == "department_summary.csv")
            .unwrap();

        assert_eq!(
            depts.columns,
            vec![
                "Department",
                "Employee ID_count",
                "Regular(H)_sum",
                "Regular(H)_mean",
                "Late In(M)_sum",
                "Normal OT(H)_sum"
            ]
        );
        assert_eq!(depts.len(), 2);
        assert_eq!(depts.number(0, "Regular(H)_mean"), 170.0);
    }

    #[test]
    fn test_bundle_contains_every_sheet() {
        let analyzer = analyzer(EXPORT);
        let thresholds = Thresholds::default();
        let generator = ReportGenerator::new(&analyzer, &thresholds, generated_at());

        let bytes = generator.workbook_bundle().unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 8);

        let mut details = String::new();
        archive
            .by_name("employee_details.csv")
            .unwrap()
            .read_to_string(&mut details)
            .unwrap();
        assert!(details.lines().next().unwrap().ends_with("HR_Notes,Priority"));
        assert!(
            details.contains("Late arrivals: 95min | High OT: 35.0h | High absence: 24.0h,High")
        );

        let mut json = String::new();
        archive
            .by_name("insights.json")
            .unwrap()
            .read_to_string(&mut json)
            .unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(doc["period"], "November 2024");
        assert_eq!(doc["action_items"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_markdown_report_sections() {
        let analyzer = analyzer(EXPORT);
        let thresholds = Thresholds::default();
        let generator = ReportGenerator::new(&analyzer, &thresholds, generated_at());

        let md = generator.markdown_report();

        assert!(md.starts_with("# Attendance Report - November 2024\n"));
        assert!(md.contains("| Avg Working Hours | 162.50 | ✓ |"));
        assert!(md.contains("## Key Concerns"));
        assert!(md.contains("| Cara | Engineering | 130 | Immediate |"));
        assert!(md.contains("| Bob | Sales | 95 | Follow-up |"));
        assert!(md.contains("| Bob | Sales | 35.0 | High |"));
        assert!(md.contains(
            "- **Cara** (ID 103): Excessive late arrivals (130 min) - Schedule counseling"
        ));
        assert!(md.trim_end().ends_with("Generated on: 2024-12-01 09:30"));
    }

    #[test]
    fn test_generate_respects_format() {
        let analyzer = analyzer(EXPORT);
        let thresholds = Thresholds::default();
        let generator = ReportGenerator::new(&analyzer, &thresholds, generated_at());

        let markdown_only = generator.generate(ReportFormat::Markdown).unwrap();
        assert_eq!(markdown_only.files.len(), 1);
        assert_eq!(markdown_only.files[0].name, MARKDOWN_FILE);

        let both = generator.generate(ReportFormat::Both).unwrap();
        let names: Vec<&str> = both.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec![BUNDLE_FILE, MARKDOWN_FILE]);
    }
}
