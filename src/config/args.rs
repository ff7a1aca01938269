use super::toml_config::DEFAULT_CONFIG_FILE;
use crate::core::report::ReportFormat;
use crate::llm::LlmProvider;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "attendance-analytics", version)]
#[command(about = "Employee attendance analytics and HR reporting")]
pub struct CliConfig {
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Overrides general.output_path from the config file
    #[arg(long, global = true)]
    pub output_path: Option<String>,

    /// Report period label, e.g. "November 2024"
    #[arg(long, global = true)]
    pub period: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log system resource usage")]
    pub monitor: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown table
    Table,
    /// Column-aligned plain text
    Text,
    Csv,
    Tsv,
    Json,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Attendance export (.csv, .tsv)
    pub file: String,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Employees, departments, columns and available metrics
    Summary(InputArgs),
    /// Employees with late arrivals
    Late {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value_t = 1)]
        min_times: u32,
    },
    /// Overtime by type with totals
    Overtime(InputArgs),
    /// Regular working hours per employee
    Hours(InputArgs),
    /// Leave hours per employee
    Leave(InputArgs),
    /// Employees with absence hours
    Absence(InputArgs),
    /// Totals per department
    Departments(InputArgs),
    /// Top employees by a numeric column
    Top {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short = 'n', long = "count", default_value_t = 10)]
        n: usize,
        #[arg(long, default_value = "Regular(H)")]
        metric: String,
    },
    /// Estimated weekly hours
    Weekly(InputArgs),
    /// Punctuality score out of 100
    Punctuality(InputArgs),
    /// Monthly totals, optionally for one employee
    Monthly {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        employee_id: Option<String>,
    },
    /// Find employees by name, id or department
    Search {
        #[command(flatten)]
        input: InputArgs,
        query: String,
    },
    /// Generate the report bundle and/or Markdown report
    Report {
        file: String,
        #[arg(long)]
        format: Option<ReportFormat>,
    },
    /// Ask a question about the data using a language model
    Ask {
        file: Option<String>,
        question: Option<String>,
        #[arg(long)]
        provider: Option<LlmProvider>,
        #[arg(long)]
        model: Option<String>,
        /// Print suggested questions and exit
        #[arg(long)]
        suggest: bool,
    },
    /// List installed Ollama models
    Models,
    /// Show or clear previous questions and answers
    History {
        #[arg(long)]
        clear: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Check configuration, output directory and local model server
    Doctor,
}

impl Command {
    /// Whether the command needs a loadable, valid config file before it runs.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Command::Doctor | Command::Ask { suggest: true, .. })
    }
}
