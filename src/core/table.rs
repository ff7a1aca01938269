use crate::domain::model::{Cell, Table};
use crate::utils::error::{AnalyticsError, Result};
use serde_json::{Map, Value};

impl Table {
    /// GitHub-flavoured pipe table.
    pub fn to_markdown(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let escape = |s: String| s.replace('|', "\\|").replace('\n', " ");
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format!(
            "| {} |",
            self.columns
                .iter()
                .map(|c| escape(c.clone()))
                .collect::<Vec<_>>()
                .join(" | ")
        ));
        lines.push(format!(
            "|{}|",
            self.columns
                .iter()
                .map(|_| ":---")
                .collect::<Vec<_>>()
                .join("|")
        ));
        for row in &self.rows {
            let cells: Vec<String> = (0..self.columns.len())
                .map(|i| escape(row.get(i).map(Cell::to_string).unwrap_or_default()))
                .collect();
            lines.push(format!("| {} |", cells.join(" | ")));
        }
        lines.join("\n")
    }

    /// Column-aligned plain text, numbers right-aligned.
    pub fn to_text(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                (0..self.columns.len())
                    .map(|i| row.get(i).map(Cell::to_string).unwrap_or_default())
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                rendered
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = Vec::with_capacity(rendered.len() + 1);
        out.push(
            self.columns
                .iter()
                .zip(&widths)
                .map(|(name, w)| format!("{:<w$}", name, w = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string(),
        );
        for (row_idx, row) in rendered.iter().enumerate() {
            let line = row
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (value, w))| {
                    let numeric = matches!(self.rows[row_idx].get(i), Some(Cell::Number(_)));
                    if numeric {
                        format!("{:>w$}", value, w = *w)
                    } else {
                        format!("{:<w$}", value, w = *w)
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            out.push(line.trim_end().to_string());
        }
        out.join("\n")
    }

    pub fn to_csv(&self) -> Result<String> {
        self.to_delimited(b',')
    }

    pub fn to_tsv(&self) -> Result<String> {
        self.to_delimited(b'\t')
    }

    fn to_delimited(&self, delimiter: u8) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(Vec::new());

        if !self.columns.is_empty() {
            writer.write_record(&self.columns)?;
        }
        for row in &self.rows {
            writer.write_record(row.iter().map(Cell::to_string))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AnalyticsError::ProcessingError {
                message: format!("failed to flush table output: {}", e),
            })?;
        String::from_utf8(bytes).map_err(|e| AnalyticsError::ProcessingError {
            message: format!("table output is not valid UTF-8: {}", e),
        })
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        let value = match row.get(i) {
                            Some(Cell::Number(n)) => serde_json::Number::from_f64(*n)
                                .map(Value::Number)
                                .unwrap_or(Value::Null),
                            Some(Cell::Text(s)) => Value::String(s.clone()),
                            Some(Cell::Empty) | None => Value::Null,
                        };
                        (name.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_records())?)
    }
}
