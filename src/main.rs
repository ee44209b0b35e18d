// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use badge_report::{parse_approval_date, AppConfig, DatePolicy, ReportError, Session};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "badge-report", version, about = "Skill-badge approval report generator")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Name → romanized name / ID lookup file
    #[arg(long, global = true)]
    names: Option<PathBuf>,

    /// Badge translation file
    #[arg(long, global = true)]
    badges: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive entry form (default)
    Form,

    /// Print the derived romanization of each name
    Romanize {
        #[arg(required = true, value_name = "NAME")]
        people: Vec<String>,
    },

    /// Merge a spreadsheet or CSV into the name lookup
    Import {
        file: PathBuf,

        /// Write the merged lookup back to the names file
        #[arg(long)]
        save: bool,
    },

    /// Build a report from a records CSV without the form
    Report {
        /// CSV with columns 姓名, 英文名, ID, 现级别, 技能章名, 承认日, 年级, 备注
        #[arg(long)]
        records: PathBuf,

        #[arg(long, short)]
        output: PathBuf,

        #[arg(long)]
        group: Option<String>,

        #[arg(long)]
        leader: Option<String>,

        /// Closing date (YYYYMMDD or YYYY-MM-DD) instead of the last row's date
        #[arg(long)]
        date: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Form) {
        Command::Form => run_form(config),
        Command::Romanize { people } => {
            init_logging();
            run_romanize(config, &people)
        }
        Command::Import { file, save } => {
            init_logging();
            run_import(config, file, save)
        }
        Command::Report {
            records,
            output,
            group,
            leader,
            date,
        } => {
            init_logging();
            run_report(config, records, output, group, leader, date)
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(names) = &cli.names {
        config.name_map_path = names.clone();
    }
    if let Some(badges) = &cli.badges {
        config.badge_path = badges.clone();
    }
    Ok(config)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "badge_report=info".into())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn print_notices(session: &Session) {
    for notice in &session.notices {
        eprintln!("⚠️  {}", notice);
    }
}

fn run_romanize(config: AppConfig, names: &[String]) -> Result<()> {
    let session = Session::open(&config);
    for name in names {
        let (romanized, identifier) = session.candidate_for(name);
        if identifier.is_empty() {
            println!("{}\t{}", name, romanized);
        } else {
            println!("{}\t{}\t{}", name, romanized, identifier);
        }
    }
    Ok(())
}

fn run_import(config: AppConfig, file: PathBuf, save: bool) -> Result<()> {
    let mut session = Session::open(&config);
    print_notices(&session);

    let count = session
        .import_names(&file)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    println!("✓ Imported {} names ({} total)", count, session.names.len());

    if save {
        session
            .names
            .save(&config.name_map_path)
            .context("Failed to save name lookup")?;
        println!("✓ Saved {}", config.name_map_path.display());
    }

    Ok(())
}

fn run_report(
    config: AppConfig,
    records: PathBuf,
    output: PathBuf,
    group: Option<String>,
    leader: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let mut session = Session::open(&config);
    print_notices(&session);

    if let Some(group) = group {
        session.group_name = group;
    }
    if let Some(leader) = leader {
        session.leader_name = leader;
    }

    if let Some(date) = date {
        if parse_approval_date(&date).is_none() {
            return Err(ReportError::DateFormat(date).into());
        }
        session.date_policy = DatePolicy::Fixed(date);
    }

    session
        .load_records_csv(&records)
        .with_context(|| format!("Failed to read records {}", records.display()))?;

    session
        .export(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "✓ Wrote {} rows to {}",
        session.records.len(),
        output.display()
    );

    Ok(())
}

#[cfg(feature = "tui")]
fn run_form(config: AppConfig) -> Result<()> {
    // Logs go to a file so they don't tear the alternate screen
    let log_file = std::fs::File::create("badge-report.log").context("Failed to create log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let session = Session::open(&config);
    let mut app = ui::App::new(session, config);
    ui::run_ui(&mut app)?;

    println!("✅ {} rows entered this session", app.session.records.len());
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_form(_config: AppConfig) -> Result<()> {
    eprintln!("❌ Interactive form not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: badge-report report --records rows.csv --output report.docx");
    std::process::exit(1);
}
