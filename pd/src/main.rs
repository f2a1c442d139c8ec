//! promptdeck - prompt template browser
//!
//! CLI entry point.

use std::fs;
use std::path::Path;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use promptdeck::cli::{Cli, Command, OutputFormat, get_log_path, prepend_instruction};
use promptdeck::config::Config;
use promptdeck::{
    CategorySelector, FillSession, LoadReport, ReadlinePrompter, TemplateRecord, TemplateTable, UserInputs, compile,
    extract, extract_in_order, filter, load,
};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    info!("promptdeck starting (data dir: {})", data_dir.display());

    // One load per process; RepositoryCache is for long-lived library callers
    let report = load(&data_dir).context(format!("Failed to read data directory {}", data_dir.display()))?;
    let table = load_table(&report, &data_dir)?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Categories => cmd_categories(table),
        Command::List {
            category,
            keyword,
            format,
        } => cmd_list(table, category.as_deref(), keyword.as_deref(), format),
        Command::Show { id } => cmd_show(find(table, id)?, &config),
        Command::Placeholders { id } => cmd_placeholders(find(table, id)?),
        Command::Compile {
            id,
            set,
            no_instruction,
        } => cmd_compile(
            find(table, id)?,
            &set,
            prepend_instruction(config.prepend_instruction, no_instruction),
        ),
        Command::Fill { id, no_instruction } => cmd_fill(
            find(table, id)?,
            &config,
            prepend_instruction(config.prepend_instruction, no_instruction),
        ),
    }
}

/// Report per-file failures; fails when there is no data
fn load_table<'a>(report: &'a LoadReport, data_dir: &Path) -> Result<&'a TemplateTable> {
    for failure in &report.failures {
        eprintln!("{} {}", "✗".red(), failure.error);
    }

    report.table.as_ref().ok_or_else(|| {
        eyre!(
            "No template data found in '{}'. Add CSV files to the data directory.",
            data_dir.display()
        )
    })
}

fn find(table: &TemplateTable, id: usize) -> Result<&TemplateRecord> {
    table
        .get(id)
        .ok_or_else(|| eyre!("No template with id {} (see `pd list`)", id))
}

fn cmd_categories(table: &TemplateTable) -> Result<()> {
    for category in table.categories() {
        println!("{} ({})", category.cyan(), table.count_in(category));
    }
    Ok(())
}

fn cmd_list(table: &TemplateTable, category: Option<&str>, keyword: Option<&str>, format: OutputFormat) -> Result<()> {
    let selector = category.map(CategorySelector::from).unwrap_or_default();
    let rows = filter(table, &selector, keyword);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No templates match the current filters");
                return Ok(());
            }
            for record in &rows {
                let minor = record.minor_category.as_deref().unwrap_or("-");
                println!(
                    "{:>4}  {} {}",
                    record.id.to_string().yellow(),
                    record.display_label(),
                    format!("[{}]", minor).dimmed()
                );
            }
        }
    }
    Ok(())
}

fn cmd_show(record: &TemplateRecord, config: &Config) -> Result<()> {
    println!("{} {}", "Category:".bold(), record.major_category.cyan());
    if let Some(minor) = &record.minor_category {
        println!("{} {}", "Sub category:".bold(), minor);
    }
    if let Some(scene) = &record.scene {
        println!("{} {}", "Scene:".bold(), scene);
    }
    println!();
    println!("{}", record.body);
    println!();

    print_placeholders(record);
    println!();
    print_guidance(record, config);
    Ok(())
}

fn cmd_placeholders(record: &TemplateRecord) -> Result<()> {
    for name in extract_in_order(&record.body) {
        println!("【{}】", name);
    }
    Ok(())
}

fn cmd_compile(record: &TemplateRecord, assignments: &[String], prepend: bool) -> Result<()> {
    let inputs = UserInputs::from_assignments(assignments)?;

    let known = extract(&record.body);
    for (name, _) in inputs.iter() {
        if !known.contains(name) {
            eprintln!("{} Template {} has no placeholder 【{}】", "!".yellow(), record.id, name);
        }
    }

    println!("{}", compile(&record.body, &inputs, prepend));
    Ok(())
}

fn cmd_fill(record: &TemplateRecord, config: &Config, prepend: bool) -> Result<()> {
    println!("{}", record.display_label().bold());
    print_guidance(record, config);
    println!();

    if extract(&record.body).is_empty() {
        println!("{}", "No placeholders detected; the prompt can be used as is.".dimmed());
    } else {
        println!("{}", "Leave an answer empty to keep the placeholder. Ctrl-D to finish early.".dimmed());
    }

    let mut session = FillSession::new(ReadlinePrompter::new()?);
    let Some(inputs) = session.collect(&record.body)? else {
        println!("Aborted");
        return Ok(());
    };

    println!();
    println!("{}", compile(&record.body, &inputs, prepend));
    Ok(())
}

fn print_placeholders(record: &TemplateRecord) {
    let names = extract_in_order(&record.body);
    if names.is_empty() {
        println!("{}", "No placeholders".dimmed());
        return;
    }

    println!("{}", "Placeholders:".bold());
    for name in names {
        if name.is_empty() {
            println!("  {} {}", "【】".yellow(), "(empty placeholder)".dimmed());
        } else {
            println!("  【{}】", name);
        }
    }
}

fn print_guidance(record: &TemplateRecord, config: &Config) {
    println!(
        "{} {}",
        "Suggested sources to attach:".bold(),
        config.guidance.lookup(&record.major_category)
    );
}
