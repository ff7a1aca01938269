use crate::core::analyzer::{AttendanceAnalyzer, AVG_WEEKLY_HOURS, EMPLOYEE_COUNT, TOTAL_LEAVE};
use crate::domain::model::{columns, Table};

const TOP_N: usize = 10;

/// Appends data tables computed from the sheet to a model answer, chosen by
/// keywords in the question.
pub fn enhance_with_data(query: &str, answer: &str, analyzer: &AttendanceAnalyzer) -> String {
    let query = query.to_lowercase();
    let sheet = analyzer.sheet();
    let mut enhanced = format!("{}\n\n", answer);

    if (query.contains("late") || query.contains("tardy")) && sheet.has_column(columns::LATE_IN) {
        let table = top_positive(analyzer, columns::LATE_IN);
        push_section(&mut enhanced, "📊 Top 10 Late Arrivals", &table);
    }

    if (query.contains("overtime") || has_word(&query, "ot"))
        && sheet.has_column(columns::NORMAL_OT)
    {
        let table = analyzer
            .top_performers(TOP_N, columns::NORMAL_OT)
            .select(&identity_with(columns::NORMAL_OT));
        push_section(&mut enhanced, "📊 Top 10 Overtime Workers", &table);
    }

    if (query.contains("working hours") || query.contains("total hours"))
        && sheet.has_column(columns::REGULAR)
    {
        let table = analyzer
            .top_performers(TOP_N, columns::REGULAR)
            .select(&identity_with(columns::REGULAR));
        push_section(&mut enhanced, "📊 Top 10 by Working Hours", &table);
        enhanced.push_str(&format!(
            "\n\n**📈 Statistics:**\n- Average Working Hours: {:.2}h\n\
             - Total Working Hours: {:.2}h\n",
            analyzer.mean(columns::REGULAR),
            analyzer.sum(columns::REGULAR)
        ));
    }

    if query.contains("leave") || query.contains("absence") {
        let leave = analyzer.leave_analysis();
        if !leave.columns.is_empty() {
            let mut table = leave.head(TOP_N).select(&identity_with(TOTAL_LEAVE));
            rename_last_column(&mut table, "Total Leave");
            push_section(&mut enhanced, "📊 Top 10 by Leave Hours", &table);
        }
    }

    if (query.contains("department") || query.contains("dept"))
        && sheet.has_column(columns::DEPARTMENT)
        && sheet.has_column(columns::REGULAR)
    {
        let mut table = analyzer.department_summary().select(&[
            columns::DEPARTMENT,
            EMPLOYEE_COUNT,
            columns::REGULAR,
        ]);
        table.columns = vec![
            columns::DEPARTMENT.to_string(),
            "Employee Count".to_string(),
            "Total Hours".to_string(),
        ];
        push_section(&mut enhanced, "📊 Department Summary", &table);
    }

    if query.contains("week") && sheet.has_column(columns::REGULAR) {
        let mut table = analyzer.weekly_breakdown().head(TOP_N).select(&[
            columns::EMPLOYEE_ID,
            columns::FIRST_NAME,
            columns::REGULAR,
            AVG_WEEKLY_HOURS,
        ]);
        rename_last_column(&mut table, "Weekly Hours");
        push_section(&mut enhanced, "📊 Weekly Hours Breakdown (Estimated)", &table);
        enhanced.push_str(
            "\n\n*Note: Weekly hours estimated by dividing monthly hours by 4.33 weeks*",
        );
    }

    enhanced
}

fn top_positive(analyzer: &AttendanceAnalyzer, metric: &str) -> Table {
    let mut table = analyzer.top_performers(usize::MAX, metric);
    if let Some(idx) = table.column_index(metric) {
        table.retain_rows(|row| row.get(idx).and_then(|c| c.as_number()).unwrap_or(0.0) > 0.0);
    }
    table.head(TOP_N).select(&identity_with(metric))
}

fn identity_with(metric: &str) -> [&str; 4] {
    [columns::EMPLOYEE_ID, columns::FIRST_NAME, columns::DEPARTMENT, metric]
}

fn rename_last_column(table: &mut Table, name: &str) {
    if let Some(last) = table.columns.last_mut() {
        *last = name.to_string();
    }
}

fn push_section(out: &mut String, title: &str, table: &Table) {
    out.push_str(&format!("\n**{}:**\n\n", title));
    out.push_str(&table.to_markdown());
}

/// Whole-word match, so "ot" does not fire on "total" or "note".
fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::{parse_attendance, ParseOptions};

    const EXPORT: &str = "\
Employee ID,First Name,Department,Regular(H),Late In(M),Normal OT(H),Annual Leave(H),Sick Leave(H)
101,Alice,Engineering,168,0,12,8,0
102,Bob,Sales,150,95,35,0,0
103,Cara,Engineering,172,130,5,0,16
104,Dan,HR,160,20,0,0,0
";

    fn analyzer() -> AttendanceAnalyzer {
        AttendanceAnalyzer::new(
            parse_attendance(EXPORT.as_bytes(), &ParseOptions::default()).unwrap(),
        )
    }

    #[test]
    fn test_no_keywords_leaves_answer_alone() {
        let out = enhance_with_data("Summarize the month", "All good.", &analyzer());
        assert_eq!(out, "All good.\n\n");
    }

    #[test]
    fn test_late_section_sorted_and_positive_only() {
        let out = enhance_with_data("Who was late?", "answer", &analyzer());

        assert!(out.contains("**📊 Top 10 Late Arrivals:**"));
        assert!(out.contains("| Employee ID | First Name | Department | Late In(M) |"));
        let cara = out.find("| 103 | Cara | Engineering | 130 |").unwrap();
        let bob = out.find("| 102 | Bob | Sales | 95 |").unwrap();
        assert!(cara < bob);
        assert!(!out.contains("| 101 | Alice"));
    }

    #[test]
    fn test_ot_matches_whole_word_only() {
        let out = enhance_with_data("Show total OT please", "a", &analyzer());
        assert!(out.contains("Top 10 Overtime Workers"));
        assert!(out.contains("| 102 | Bob | Sales | 35 |"));

        let out = enhance_with_data("Give me a note", "a", &analyzer());
        assert!(!out.contains("Overtime Workers"));
    }

    #[test]
    fn test_working_hours_statistics() {
        let out = enhance_with_data("total hours per person", "a", &analyzer());
        assert!(out.contains("Top 10 by Working Hours"));
        assert!(out.contains("- Average Working Hours: 162.50h"));
        assert!(out.contains("- Total Working Hours: 650.00h"));
    }

    #[test]
    fn test_leave_and_department_sections() {
        let out = enhance_with_data("leave by department", "a", &analyzer());

        assert!(out.contains("| Employee ID | First Name | Department | Total Leave |"));
        assert!(out.contains("| 103 | Cara | Engineering | 16 |"));
        assert!(out.contains("| 101 | Alice | Engineering | 8 |"));
        assert!(out.contains("| Department | Employee Count | Total Hours |"));
        assert!(out.contains("| Engineering | 2 | 340 |"));
        assert!(out.contains("| HR | 1 | 160 |"));
    }

    #[test]
    fn test_weekly_breakdown_note() {
        let out = enhance_with_data("weekly report", "a", &analyzer());
        assert!(out.contains("| Employee ID | First Name | Regular(H) | Weekly Hours |"));
        assert!(out.contains("| 101 | Alice | 168 | 38.8 |"));
        assert!(out.ends_with("dividing monthly hours by 4.33 weeks*"));
    }
}
