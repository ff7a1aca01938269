use crate::domain::model::DataSummary;

const MAX_PROMPT_COLUMNS: usize = 20;

const INSTRUCTIONS: &str = "\
**Instructions:**
1. Analyze the question carefully
2. Determine what data analysis or calculation is needed
3. Provide clear, actionable insights
4. Include specific numbers and statistics
5. Format your response in a clear, professional manner

**Important:**
- Be specific with numbers and percentages
- If the question requires sorting or filtering, explain the criteria
- Suggest actionable recommendations when relevant
- If you need to show data, format it as a clear table or list

Please provide a comprehensive answer:
";

/// Builds the HR-analyst prompt from the data summary and the user's question.
pub fn analysis_prompt(query: &str, summary: &DataSummary) -> String {
    let departments = if summary.departments.is_empty() {
        "Not specified".to_string()
    } else {
        summary.departments.join(", ")
    };

    let metrics = summary
        .metrics_available
        .iter()
        .map(|m| format!("  - {}: {}", m.name, if m.available { "✓" } else { "✗" }))
        .collect::<Vec<_>>()
        .join("\n");

    let columns = format!(
        "{}...",
        summary
            .columns
            .iter()
            .take(MAX_PROMPT_COLUMNS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );

    format!(
        "You are an expert HR data analyst. You have access to employee attendance data and need to answer questions about it.

**Data Summary:**
- Total Employees: {total}
- Departments: {departments}
- Date Range: {date_range}
- Available Metrics: {metrics}

**Available Columns:**
{columns}

**Sample Data:**
{sample}

**User Question:**
{query}

{instructions}",
        total = summary.total_employees,
        departments = departments,
        date_range = summary.date_range,
        metrics = metrics,
        columns = columns,
        sample = summary.sample_data.to_text(),
        query = query,
        instructions = INSTRUCTIONS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{MetricAvailability, Table};

    fn summary(departments: Vec<String>, columns: Vec<String>) -> DataSummary {
        let mut sample_data = Table::new(["Employee ID", "First Name"]);
        sample_data.push_row(vec!["101".into(), "Alice".into()]);
        DataSummary {
            total_employees: 42,
            departments,
            columns,
            date_range: "November 2024".to_string(),
            metrics_available: vec![
                MetricAvailability {
                    name: "working_hours".to_string(),
                    available: true,
                },
                MetricAvailability {
                    name: "leaves".to_string(),
                    available: false,
                },
            ],
            sample_data,
        }
    }

    #[test]
    fn test_prompt_contains_context_and_question() {
        let prompt = analysis_prompt(
            "Who works the most?",
            &summary(
                vec!["Sales".to_string(), "IT".to_string()],
                vec!["Employee ID".to_string(), "First Name".to_string()],
            ),
        );

        assert!(prompt.starts_with("You are an expert HR data analyst."));
        assert!(prompt.contains("- Total Employees: 42"));
        assert!(prompt.contains("- Departments: Sales, IT"));
        assert!(prompt.contains("- Date Range: November 2024"));
        assert!(prompt.contains("  - working_hours: ✓"));
        assert!(prompt.contains("  - leaves: ✗"));
        assert!(prompt.contains("Employee ID, First Name..."));
        assert!(prompt.contains("101          Alice"));
        assert!(prompt.contains("**User Question:**\nWho works the most?"));
        assert!(prompt.trim_end().ends_with("Please provide a comprehensive answer:"));
    }

    #[test]
    fn test_prompt_without_departments_and_many_columns() {
        let columns: Vec<String> = (1..=31).map(|d| d.to_string()).collect();
        let prompt = analysis_prompt("q", &summary(Vec::new(), columns));

        assert!(prompt.contains("- Departments: Not specified"));
        assert!(prompt.contains("19, 20..."));
        assert!(!prompt.contains("20, 21"));
    }
}
