use crate::core::analyzer::AttendanceAnalyzer;
use crate::domain::model::{columns, ActionItem, EmployeeRow, Insights, Priority};
use serde::{Deserialize, Serialize};

pub const NO_CRITICAL_ISSUES: &str = "No critical issues - all metrics within acceptable ranges";
pub const NO_ACTION_ITEMS: &str = "No critical action items - all metrics within acceptable ranges";

pub const STATUS_OK: &str = "✓";
pub const STATUS_WARN: &str = "⚠";

/// Limits that turn raw attendance numbers into HR follow-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub excessive_late_minutes: f64,
    pub severe_late_minutes: f64,
    pub critical_late_minutes: f64,
    pub moderate_overtime_hours: f64,
    pub note_overtime_hours: f64,
    pub high_overtime_hours: f64,
    pub significant_absence_hours: f64,
    pub avg_late_recommendation: f64,
    pub avg_overtime_recommendation: f64,
    pub healthy_avg_hours: f64,
    pub total_late_warning: f64,
    pub total_overtime_warning: f64,
    pub total_absence_warning: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            excessive_late_minutes: 60.0,
            severe_late_minutes: 50.0,
            critical_late_minutes: 100.0,
            moderate_overtime_hours: 10.0,
            note_overtime_hours: 20.0,
            high_overtime_hours: 30.0,
            significant_absence_hours: 16.0,
            avg_late_recommendation: 20.0,
            avg_overtime_recommendation: 10.0,
            healthy_avg_hours: 160.0,
            total_late_warning: 500.0,
            total_overtime_warning: 200.0,
            total_absence_warning: 100.0,
        }
    }
}

impl Thresholds {
    pub fn late_severity(&self, minutes: f64) -> &'static str {
        if minutes > self.critical_late_minutes {
            "High"
        } else if minutes > self.severe_late_minutes {
            "Medium"
        } else {
            "Low"
        }
    }

    pub fn late_follow_up(&self, minutes: f64) -> &'static str {
        if minutes > self.critical_late_minutes {
            "Yes - Immediate"
        } else if minutes > self.severe_late_minutes {
            "Yes"
        } else {
            "Monitor"
        }
    }

    /// Overtime band label. Bands share their limits with `overtime_action`.
    pub fn overtime_level(&self, hours: f64) -> String {
        let (moderate, note, high) = (
            self.moderate_overtime_hours,
            self.note_overtime_hours,
            self.high_overtime_hours,
        );
        if hours > high {
            format!("Excessive (>{}h)", high)
        } else if hours > note {
            format!("High ({}-{}h)", note, high)
        } else if hours > moderate {
            format!("Moderate ({}-{}h)", moderate, note)
        } else {
            format!("Normal (<{}h)", moderate)
        }
    }

    pub fn overtime_action(&self, hours: f64) -> &'static str {
        if hours > self.high_overtime_hours {
            "Review workload & consider support"
        } else if hours > self.note_overtime_hours {
            "Monitor"
        } else {
            "None"
        }
    }
}

pub fn status(warn: bool) -> &'static str {
    if warn {
        STATUS_WARN
    } else {
        STATUS_OK
    }
}

/// Derives concerns, recommendations and follow-up items from an analyzer.
pub struct InsightEngine<'a> {
    analyzer: &'a AttendanceAnalyzer,
    thresholds: &'a Thresholds,
}

impl<'a> InsightEngine<'a> {
    pub fn new(analyzer: &'a AttendanceAnalyzer, thresholds: &'a Thresholds) -> Self {
        Self {
            analyzer,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        self.thresholds
    }

    fn count_above(&self, column: &str, limit: f64) -> Option<usize> {
        let sheet = self.analyzer.sheet();
        if !sheet.has_column(column) {
            return None;
        }
        Some(
            sheet
                .rows
                .iter()
                .filter(|row| sheet.number(row, column) > limit)
                .count(),
        )
    }

    pub fn generate(&self) -> Insights {
        let t = self.thresholds;
        let analyzer = self.analyzer;

        let mut insights = Insights {
            summary: analyzer.monthly_report(None),
            ..Insights::default()
        };

        if let Some(n) = self.count_above(columns::LATE_IN, t.excessive_late_minutes) {
            if n > 0 {
                insights.concerns.push(format!(
                    "{} employees have excessive late arrivals (>{} min)",
                    n, t.excessive_late_minutes
                ));
            }
        }

        if let Some(n) = self.count_above(columns::NORMAL_OT, t.high_overtime_hours) {
            if n > 0 {
                insights.concerns.push(format!(
                    "{} employees have high overtime (>{} hours) - potential burnout risk",
                    n, t.high_overtime_hours
                ));
            }
        }

        if let Some(n) = self.count_above(columns::ABSENCE, t.significant_absence_hours) {
            if n > 0 {
                insights.concerns.push(format!(
                    "{} employees have significant absences (>{} days)",
                    n,
                    t.significant_absence_hours / 8.0
                ));
            }
        }

        if analyzer.mean(columns::LATE_IN) > t.avg_late_recommendation {
            insights.recommendations.push(
                "Consider reviewing start time policies or flexible work arrangements".to_string(),
            );
        }

        if analyzer.mean(columns::NORMAL_OT) > t.avg_overtime_recommendation {
            insights.recommendations.push(
                "High average overtime detected - review workload distribution and consider additional staffing"
                    .to_string(),
            );
        }

        let top = analyzer.top_performers(1, columns::REGULAR);
        if !top.is_empty() {
            let name = match top.text(0, columns::FIRST_NAME) {
                n if n.trim().is_empty() => top.text(0, columns::EMPLOYEE_ID),
                n => n,
            };
            insights.highlights.push(format!(
                "Top performer: {} with {:.1} working hours",
                name,
                top.number(0, columns::REGULAR)
            ));
        }

        insights
    }

    pub fn employee_note(&self, row: &EmployeeRow) -> String {
        let t = self.thresholds;
        let sheet = self.analyzer.sheet();
        let mut notes = Vec::new();

        let late = sheet.number(row, columns::LATE_IN);
        if late > t.excessive_late_minutes {
            notes.push(format!("Late arrivals: {:.0}min", late));
        }

        let overtime = sheet.number(row, columns::NORMAL_OT);
        if overtime > t.note_overtime_hours {
            notes.push(format!("High OT: {:.1}h", overtime));
        }

        let absence = sheet.number(row, columns::ABSENCE);
        if absence > t.significant_absence_hours {
            notes.push(format!("High absence: {:.1}h", absence));
        }

        if notes.is_empty() {
            "No issues".to_string()
        } else {
            notes.join(" | ")
        }
    }

    pub fn priority(&self, row: &EmployeeRow) -> Priority {
        let t = self.thresholds;
        let sheet = self.analyzer.sheet();
        let mut score = 0;

        let late = sheet.number(row, columns::LATE_IN);
        if late > t.critical_late_minutes {
            score += 3;
        } else if late > t.severe_late_minutes {
            score += 1;
        }

        let overtime = sheet.number(row, columns::NORMAL_OT);
        if overtime > t.high_overtime_hours {
            score += 3;
        } else if overtime > t.note_overtime_hours {
            score += 1;
        }

        if sheet.number(row, columns::ABSENCE) > t.significant_absence_hours {
            score += 2;
        }

        match score {
            s if s >= 5 => Priority::High,
            s if s >= 2 => Priority::Medium,
            _ => Priority::Low,
        }
    }

    fn employee_label(&self, row: &EmployeeRow) -> String {
        let sheet = self.analyzer.sheet();
        format!(
            "{} (ID: {})",
            sheet.display_name(row),
            sheet.text(row, columns::EMPLOYEE_ID)
        )
    }

    /// HR follow-up items, high priority first.
    pub fn action_items(&self) -> Vec<ActionItem> {
        let t = self.thresholds;
        let sheet = self.analyzer.sheet();
        let mut items = Vec::new();

        if sheet.has_column(columns::LATE_IN) {
            for row in &sheet.rows {
                let late = sheet.number(row, columns::LATE_IN);
                if late > t.critical_late_minutes {
                    items.push(ActionItem {
                        priority: Priority::High,
                        employee: self.employee_label(row),
                        issue: "Excessive Late Arrivals".to_string(),
                        details: format!("{:.0} minutes total", late),
                        recommended_action: "Schedule counseling meeting".to_string(),
                        timeline: "This week".to_string(),
                    });
                }
            }
        }

        if sheet.has_column(columns::NORMAL_OT) {
            for row in &sheet.rows {
                let overtime = sheet.number(row, columns::NORMAL_OT);
                if overtime > t.high_overtime_hours {
                    items.push(ActionItem {
                        priority: Priority::High,
                        employee: self.employee_label(row),
                        issue: "Excessive Overtime".to_string(),
                        details: format!("{:.1} hours", overtime),
                        recommended_action: "Review workload, check burnout risk".to_string(),
                        timeline: "This week".to_string(),
                    });
                }
            }
        }

        if sheet.has_column(columns::ABSENCE) {
            for row in &sheet.rows {
                let absence = sheet.number(row, columns::ABSENCE);
                if absence > t.significant_absence_hours {
                    items.push(ActionItem {
                        priority: Priority::Medium,
                        employee: self.employee_label(row),
                        issue: "High Absence Rate".to_string(),
                        details: format!("{:.1} hours", absence),
                        recommended_action: "Wellness check, review circumstances".to_string(),
                        timeline: "Within 2 weeks".to_string(),
                    });
                }
            }
        }

        // sort_by_key 是穩定排序，同優先級保持原順序
        items.sort_by_key(|item| item.priority);
        items
    }

    /// One-line follow-ups for the written report; late arrivals and overtime only.
    pub fn action_summary(&self) -> Vec<String> {
        let t = self.thresholds;
        let sheet = self.analyzer.sheet();
        let mut actions = Vec::new();

        if sheet.has_column(columns::LATE_IN) {
            for row in &sheet.rows {
                let late = sheet.number(row, columns::LATE_IN);
                if late > t.critical_late_minutes {
                    actions.push(format!(
                        "**{}** (ID {}): Excessive late arrivals ({:.0} min) - Schedule counseling",
                        sheet.display_name(row),
                        sheet.text(row, columns::EMPLOYEE_ID),
                        late
                    ));
                }
            }
        }

        if sheet.has_column(columns::NORMAL_OT) {
            for row in &sheet.rows {
                let overtime = sheet.number(row, columns::NORMAL_OT);
                if overtime > t.high_overtime_hours {
                    actions.push(format!(
                        "**{}** (ID {}): High overtime ({:.1}h) - Review workload",
                        sheet.display_name(row),
                        sheet.text(row, columns::EMPLOYEE_ID),
                        overtime
                    ));
                }
            }
        }

        if actions.is_empty() {
            actions.push(NO_CRITICAL_ISSUES.to_string());
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::{parse_attendance, ParseOptions};

    const EXPORT: &str = "\
Employee ID,First Name,Department,Regular(H),Late In(M),Absence(H),Normal OT(H)
101,Alice,Engineering,168,0,0,12
102,Bob,Sales,150,95,24,35
103,Cara,Engineering,172,130,0,5
104,Dan,HR,160,20,0,22
";

    fn analyzer(csv: &str) -> AttendanceAnalyzer {
        let options = ParseOptions {
            delimiter: b',',
            header_row: 0,
            period: "November 2024".to_string(),
        };
        AttendanceAnalyzer::new(parse_attendance(csv.as_bytes(), &options).unwrap())
    }

    #[test]
    fn test_generate_insights() {
        let analyzer = analyzer(EXPORT);
        let thresholds = Thresholds::default();
        let insights = InsightEngine::new(&analyzer, &thresholds).generate();

        assert_eq!(insights.summary.total_employees, 4);
        assert_eq!(
            insights.concerns,
            vec![
                "2 employees have excessive late arrivals (>60 min)",
                "1 employees have high overtime (>30 hours) - potential burnout risk",
                "1 employees have significant absences (>2 days)",
            ]
        );
        // 平均遲到 61.25 分鐘、平均加班 18.5 小時
        assert_eq!(insights.recommendations.len(), 2);
        assert_eq!(
            insights.highlights,
            vec!["Top performer: Cara with 172.0 working hours"]
        );
    }

    #[test]
    fn test_employee_note_and_priority() {
        let analyzer = analyzer(EXPORT);
        let thresholds = Thresholds::default();
        let engine = InsightEngine::new(&analyzer, &thresholds);
        let rows = &analyzer.sheet().rows;

        assert_eq!(engine.employee_note(&rows[0]), "No issues");
        assert_eq!(
            engine.employee_note(&rows[1]),
            "Late arrivals: 95min | High OT: 35.0h | High absence: 24.0h"
        );

        assert_eq!(engine.priority(&rows[0]), Priority::Low);
        // 1 (late > 50) + 3 (ot > 30) + 2 (absence) = 6
        assert_eq!(engine.priority(&rows[1]), Priority::High);
        // 3 (late > 100)
        assert_eq!(engine.priority(&rows[2]), Priority::Medium);
        // 1 (ot > 20)
        assert_eq!(engine.priority(&rows[3]), Priority::Low);
    }

    #[test]
    fn test_action_items_sorted_by_priority() {
        let analyzer = analyzer(EXPORT);
        let thresholds = Thresholds::default();
        let items = InsightEngine::new(&analyzer, &thresholds).action_items();

        let issues: Vec<(&str, Priority)> = items
            .iter()
            .map(|i| (i.issue.as_str(), i.priority))
            .collect();
        assert_eq!(
            issues,
            vec![
                ("Excessive Late Arrivals", Priority::High),
                ("Excessive Overtime", Priority::High),
                ("High Absence Rate", Priority::Medium),
            ]
        );
        assert_eq!(items[0].employee, "Cara (ID: 103)");
        assert_eq!(items[0].details, "130 minutes total");
        assert_eq!(items[2].timeline, "Within 2 weeks");
    }

    #[test]
    fn test_quiet_month_has_no_findings() {
        let analyzer = analyzer("Employee ID,First Name,Regular(H),Late In(M)\n1,Ann,120,5\n");
        let thresholds = Thresholds::default();
        let engine = InsightEngine::new(&analyzer, &thresholds);

        let insights = engine.generate();
        assert!(insights.concerns.is_empty());
        assert!(insights.recommendations.is_empty());
        assert!(engine.action_items().is_empty());
        assert_eq!(engine.action_summary(), vec![NO_CRITICAL_ISSUES]);
    }

    #[test]
    fn test_levels() {
        let t = Thresholds::default();
        assert_eq!(t.late_severity(101.0), "High");
        assert_eq!(t.late_severity(51.0), "Medium");
        assert_eq!(t.late_follow_up(10.0), "Monitor");
        assert_eq!(t.overtime_level(31.0), "Excessive (>30h)");
        assert_eq!(t.overtime_level(15.0), "Moderate (10-20h)");
        assert_eq!(t.overtime_level(10.0), "Normal (<10h)");
        assert_eq!(t.overtime_action(25.0), "Monitor");
    }

    #[test]
    fn test_overtime_bands_follow_configured_limits() {
        let t = Thresholds {
            high_overtime_hours: 25.0,
            ..Thresholds::default()
        };

        assert_eq!(t.overtime_level(28.0), "Excessive (>25h)");
        assert_eq!(t.overtime_action(28.0), "Review workload & consider support");
        assert_eq!(t.overtime_level(22.0), "High (20-25h)");
        assert_eq!(t.overtime_action(22.0), "Monitor");
    }
}
