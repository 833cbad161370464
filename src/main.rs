mod ui;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use wordgen::{DEFAULT_MAX_WORDS, GenerationConfig, Generator, Profile, write_wordlist};

const CONFIRMATION_ENV: &str = "WORDGEN_CONFIRMATION_PHRASE";
const DEFAULT_CONFIRMATION_PHRASE: &str = "I have written authorization";

#[derive(Parser)]
#[command(
    name = "wordgen",
    version,
    about = "Deterministic OSINT-based password candidate generator"
)]
struct Cli {
    /// Output wordlist file
    #[arg(short, long, default_value = "output/wordlist.txt")]
    output: PathBuf,

    /// Maximum number of candidates
    #[arg(short, long, default_value_t = DEFAULT_MAX_WORDS as u64, value_parser = clap::value_parser!(u64).range(1..))]
    max_words: u64,

    /// Built-in template to enable (repeatable, default: all)
    #[arg(short, long = "template", value_name = "ID")]
    templates: Vec<String>,

    /// Extra pattern template such as "{name}{sep}{year}" (repeatable)
    #[arg(short, long = "pattern", value_name = "PATTERN")]
    patterns: Vec<String>,

    /// Read the OSINT profile from a JSON file instead of prompting
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Disable the progress display
    #[arg(long)]
    no_spinner: bool,

    /// Do not write a session log file
    #[arg(long)]
    no_log: bool,

    /// Print the template catalog and exit
    #[arg(long)]
    list_templates: bool,
}

fn session_log_path(output: &Path) -> PathBuf {
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("wordgen-session-{stamp}.log"))
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create session log {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "wordgen=debug".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}

fn load_profile(path: &Path) -> Result<Profile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid profile {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_templates {
        ui::print_templates();
        return Ok(());
    }

    let config = GenerationConfig {
        max_count: Some(usize::try_from(cli.max_words).unwrap_or(usize::MAX)),
        templates: (!cli.templates.is_empty()).then(|| cli.templates.clone()),
        patterns: cli.patterns.clone(),
        reference_year: Some(Local::now().year()),
    };
    config.build_templates().context("Invalid template configuration")?;

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        show_progress: !cli.no_spinner,
    };

    let log_file = (!cli.no_log).then(|| session_log_path(&cli.output));
    init_logging(log_file.as_deref())?;

    ui::print_banner(&options);

    let phrase = std::env::var(CONFIRMATION_ENV)
        .unwrap_or_else(|_| DEFAULT_CONFIRMATION_PHRASE.to_string());
    eprintln!("This tool generates password candidates. Ensure you have WRITTEN authorization.");
    if std::env::var_os(CONFIRMATION_ENV).is_none() {
        eprintln!("Type \"{}\" to continue.", DEFAULT_CONFIRMATION_PHRASE);
    }
    if !ui::prompt_confirmation(&phrase)? {
        tracing::error!("confirmation failed");
        eprintln!("Confirmation failed. Exiting.");
        std::process::exit(1);
    }

    let profile = match &cli.profile {
        Some(path) => load_profile(path)?,
        None => ui::prompt_profile()?,
    };

    let generator = Generator::new(&profile, &config)?;
    tracing::info!(output = %cli.output.display(), max = cli.max_words, "starting generation");

    let pb = ui::progress_bar(generator.max_count(), &options);
    let (written, elapsed) = ui::timed(|| {
        write_wordlist(&cli.output, generator.candidates(), |n| pb.set_position(n as u64))
            .with_context(|| format!("Failed to write {}", cli.output.display()))
    })?;
    pb.finish_and_clear();

    tracing::info!(written, elapsed_ms = elapsed.as_millis() as u64, "generation finished");

    ui::display_summary(
        &ui::RunSummary {
            output: &cli.output,
            log_file: log_file.as_deref(),
            tokens: generator.tokens().len(),
            templates: generator.templates().len(),
            written,
            max_count: generator.max_count(),
            elapsed,
        },
        &options,
    );

    Ok(())
}
