use attendance_analytics::config::args::{Command, InputArgs, OutputFormat};
use attendance_analytics::config::toml_config::{ConfigSource, OPENAI_API_KEY_ENV};
use attendance_analytics::core::parser::{parse_attendance, ParseOptions};
use attendance_analytics::core::Storage;
use attendance_analytics::domain::model::{ChatEntry, MonthlyReport, Table};
use attendance_analytics::llm::{
    list_ollama_models, resolve_model, ChatHistory, OPENAI_MODELS, SUGGESTED_QUESTIONS,
};
use attendance_analytics::utils::validation::{
    validate_input_file, validate_positive_number, Validate,
};
use attendance_analytics::utils::{error::AnalyticsError, logger};
use attendance_analytics::{
    AppConfig, AttendanceAnalyzer, CliConfig, LlmHandler, LocalStorage, ReportEngine,
    ReportPipeline, ReportSettings, Result,
};
use chrono::Local;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    if !cli.command.needs_config() {
        return match cli.command {
            Command::Doctor => {
                let (config, source) = AppConfig::load_lenient(&cli.config);
                doctor(&cli, &config, source).await
            }
            _ => {
                print_suggestions();
                Ok(())
            }
        };
    }

    let (config, _) = AppConfig::load_or_default(&cli.config)?;
    config.validate()?;

    let output_path = cli
        .output_path
        .clone()
        .unwrap_or_else(|| config.general.output_path.clone());
    let period = cli
        .period
        .clone()
        .or_else(|| config.general.report_period.clone());

    let header_row = config.general.header_row;
    let load = |file: &str| load_analyzer(file.to_string(), header_row, period.clone());

    match cli.command {
        Command::Summary(input) => {
            let analyzer = load(&input.file).await?;
            print_summary(&analyzer, input.output)
        }
        Command::Late { input, min_times } => {
            let analyzer = load(&input.file).await?;
            print_table(&analyzer.late_employees(min_times), input.output)
        }
        Command::Overtime(input) => analysis(&input, &load, |a| a.overtime_analysis()).await,
        Command::Hours(input) => analysis(&input, &load, |a| a.working_hours_summary()).await,
        Command::Leave(input) => analysis(&input, &load, |a| a.leave_analysis()).await,
        Command::Absence(input) => analysis(&input, &load, |a| a.absence_analysis()).await,
        Command::Departments(input) => {
            analysis(&input, &load, |a| a.department_summary()).await
        }
        Command::Weekly(input) => analysis(&input, &load, |a| a.weekly_breakdown()).await,
        Command::Punctuality(input) => {
            analysis(&input, &load, |a| a.punctuality_score()).await
        }
        Command::Top { input, n, metric } => {
            validate_positive_number("count", n, 1)?;
            let analyzer = load(&input.file).await?;
            if !analyzer.sheet().has_column(&metric) {
                tracing::warn!("⚠️ Column '{}' not found in this export", metric);
            }
            print_table(&analyzer.top_performers(n, &metric), input.output)
        }
        Command::Monthly { input, employee_id } => {
            let analyzer = load(&input.file).await?;
            let report = analyzer.monthly_report(employee_id.as_deref());
            print_monthly(&report, input.output)
        }
        Command::Search { input, query } => {
            let analyzer = load(&input.file).await?;
            print_table(&analyzer.search_employees(&query), input.output)
        }
        Command::Report { file, format } => {
            let settings = ReportSettings::from_config(&config, file)
                .with_output_path(Some(output_path))
                .with_period(period.clone())
                .with_format(format);
            generate_reports(settings, cli.monitor || config.monitoring.enabled).await
        }
        Command::Ask {
            file,
            question,
            provider,
            model,
            ..
        } => {
            let (file, question) = match (file, question) {
                (Some(file), Some(question)) if !question.trim().is_empty() => (file, question),
                _ => {
                    return Err(AnalyticsError::ValidationError {
                        message: "ask needs an attendance file and a question (or --suggest)"
                            .to_string(),
                    })
                }
            };

            let provider = provider.unwrap_or(config.llm.provider);
            let model_name = resolve_model(provider, model.as_deref(), &config.llm).await?;
            let mut handler = LlmHandler::new();
            handler.initialize(provider, &model_name, &config.llm)?;

            let analyzer = load(&file).await?;
            tracing::info!("🤖 AI is analyzing your data...");
            let answer = handler
                .generate_report(&question, &analyzer.data_summary(), &analyzer)
                .await?;
            println!("{}", answer);

            let history = ChatHistory::new(LocalStorage::new(output_path));
            history
                .append(&ChatEntry {
                    query: question,
                    response: answer,
                    timestamp: Local::now(),
                })
                .await
        }
        Command::Models => {
            println!("OpenAI: {}", OPENAI_MODELS.join(", "));
            let models = list_ollama_models(&config.llm.ollama_base_url).await?;
            if models.is_empty() {
                tracing::warn!(
                    "⚠️ No Ollama models found. Please install Ollama and pull a model."
                );
            }
            for model in models {
                println!("Ollama: {}", model);
            }
            Ok(())
        }
        Command::History { clear, limit } => {
            let history = ChatHistory::new(LocalStorage::new(output_path));
            if clear {
                history.clear().await?;
                println!("🗑️ History cleared");
                return Ok(());
            }

            let entries = history.recent(limit).await?;
            if entries.is_empty() {
                println!("No questions asked yet.");
            }
            for entry in entries {
                println!(
                    "🙋 Question ({}):\n{}\n",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.query
                );
                println!("🤖 Analysis:\n{}\n\n---", entry.response);
            }
            Ok(())
        }
        Command::Doctor => Ok(()),
    }
}

async fn load_analyzer(
    file: String,
    header_row: usize,
    period: Option<String>,
) -> Result<AttendanceAnalyzer> {
    validate_input_file("file", &file)?;

    let data = LocalStorage::new(".").read_file(&file).await?;
    let options = ParseOptions::for_path(&file, header_row, period.as_deref());
    let sheet = parse_attendance(&data, &options)?;
    tracing::info!("📥 Loaded {} employees from {}", sheet.len(), file);

    Ok(AttendanceAnalyzer::new(sheet))
}

async fn analysis<L, Fut, F>(input: &InputArgs, load: &L, run: F) -> Result<()>
where
    L: Fn(&str) -> Fut,
    Fut: std::future::Future<Output = Result<AttendanceAnalyzer>>,
    F: FnOnce(&AttendanceAnalyzer) -> Table,
{
    let analyzer = load(&input.file).await?;
    print_table(&run(&analyzer), input.output)
}

async fn generate_reports(settings: ReportSettings, monitor_enabled: bool) -> Result<()> {
    settings.validate()?;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let sink = LocalStorage::new(settings.output_path.clone());
    let pipeline = ReportPipeline::new(LocalStorage::new("."), sink, settings);
    let engine = ReportEngine::new_with_monitoring(pipeline, monitor_enabled);

    let paths = engine.run().await?;
    println!("✅ Report generation completed successfully!");
    for path in paths {
        println!("📁 {}", path);
    }
    Ok(())
}

fn print_table(table: &Table, format: OutputFormat) -> Result<()> {
    if table.columns.is_empty() {
        println!("ℹ️ The columns needed for this analysis are not in this export.");
        return Ok(());
    }

    match format {
        OutputFormat::Table => println!("{}", table.to_markdown()),
        OutputFormat::Text => println!("{}", table.to_text()),
        OutputFormat::Csv => print!("{}", table.to_csv()?),
        OutputFormat::Tsv => print!("{}", table.to_tsv()?),
        OutputFormat::Json => println!("{}", table.to_json()?),
    }
    if matches!(format, OutputFormat::Table | OutputFormat::Text) {
        println!("\n{} rows", table.len());
    }
    Ok(())
}

fn print_summary(analyzer: &AttendanceAnalyzer, format: OutputFormat) -> Result<()> {
    let summary = analyzer.data_summary();

    if format == OutputFormat::Json {
        let document = serde_json::json!({
            "total_employees": summary.total_employees,
            "departments": summary.departments,
            "columns": summary.columns,
            "date_range": summary.date_range,
            "metrics_available": summary.metrics_available,
            "sample_data": summary.sample_data.to_records(),
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let mut table = Table::new(["Metric", "Value"]);
    table.push_row(vec!["Total Employees".into(), summary.total_employees.into()]);
    table.push_row(vec![
        "Departments".into(),
        if summary.departments.is_empty() {
            "Not specified".into()
        } else {
            summary.departments.join(", ").into()
        },
    ]);
    table.push_row(vec!["Date Range".into(), summary.date_range.clone().into()]);
    table.push_row(vec!["Columns".into(), summary.columns.len().into()]);
    for metric in &summary.metrics_available {
        let mark = if metric.available { "✓" } else { "✗" };
        table.push_row(vec![metric.name.clone().into(), mark.into()]);
    }
    print_table(&table, format)
}

fn print_monthly(report: &MonthlyReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let mut table = Table::new(["Metric", "Value"]);
    table.push_row(vec!["Total Employees".into(), report.total_employees.into()]);
    table.push_row(vec!["Total Working Hours".into(), report.total_working_hours.into()]);
    table.push_row(vec!["Total Overtime".into(), report.total_overtime.into()]);
    table.push_row(vec!["Total Late Minutes".into(), report.total_late_minutes.into()]);
    table.push_row(vec!["Total Absences".into(), report.total_absences.into()]);
    table.push_row(vec!["Avg Working Hours".into(), report.avg_working_hours.into()]);
    print_table(&table, format)
}

fn print_suggestions() {
    println!("💡 Suggested Questions:");
    for question in SUGGESTED_QUESTIONS {
        println!("  - {}", question);
    }
}

async fn doctor(cli: &CliConfig, config: &AppConfig, source: ConfigSource) -> Result<()> {
    println!("🩺 Attendance analytics environment check\n");
    let mut problems = 0;

    match source {
        ConfigSource::File => println!("✓ Configuration file: {}", cli.config),
        ConfigSource::Missing => {
            println!("⚠ Configuration file '{}' not found, using defaults", cli.config)
        }
        ConfigSource::Invalid(e) => {
            problems += 1;
            println!("✗ Configuration file could not be loaded: {}", e);
            println!("  Continuing the checks with default settings");
        }
    }

    match config.validate() {
        Ok(()) => println!("✓ Configuration is valid"),
        Err(e) => {
            problems += 1;
            println!("✗ Configuration is invalid: {}", e);
        }
    }

    let output_path = cli
        .output_path
        .clone()
        .unwrap_or_else(|| config.general.output_path.clone());
    match tokio::fs::create_dir_all(&output_path).await {
        Ok(()) => println!("✓ Output directory: {}", output_path),
        Err(e) => {
            problems += 1;
            println!("✗ Output directory '{}' cannot be created: {}", output_path, e);
        }
    }

    if config.llm.resolved_api_key().is_some() {
        println!("✓ OpenAI API key configured");
    } else {
        println!(
            "⚠ No OpenAI API key (set llm.api_key or {})",
            OPENAI_API_KEY_ENV
        );
    }

    match list_ollama_models(&config.llm.ollama_base_url).await {
        Ok(models) if models.is_empty() => {
            println!("⚠ Ollama is running but has no models. Run `ollama pull llama2`.")
        }
        Ok(models) => println!("✓ Ollama models: {}", models.join(", ")),
        Err(e) => {
            tracing::debug!("Ollama model listing failed: {}", e);
            println!(
                "⚠ Ollama not reachable at {} (optional for local models)",
                config.llm.ollama_base_url
            );
        }
    }

    println!();
    if problems > 0 {
        return Err(AnalyticsError::ValidationError {
            message: format!("environment check found {} problem(s)", problems),
        });
    }
    println!("🎉 Ready to analyze attendance data");
    Ok(())
}
