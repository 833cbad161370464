use anyhow::{Context, Result};
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use rpassword::read_password;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use unicode_normalization::UnicodeNormalization;
use wordgen::{Field, Profile, TemplateId};
use zeroize::Zeroizing;

pub const MAX_CONFIRM_ATTEMPTS: usize = 3;
pub const MAX_FIELD_BYTES: usize = 4096;

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub show_progress: bool,
}

pub struct RunSummary<'a> {
    pub output: &'a Path,
    pub log_file: Option<&'a Path>,
    pub tokens: usize,
    pub templates: usize,
    pub written: usize,
    pub max_count: Option<usize>,
    pub elapsed: Duration,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

fn style(options: &DisplayOptions, ok: bool) -> Style {
    if !options.color_support {
        Style::new()
    } else if ok {
        Style::new().green()
    } else {
        Style::new().yellow()
    }
}

pub fn print_banner(options: &DisplayOptions) {
    let title = if options.color_support {
        Style::new().cyan().bold()
    } else {
        Style::new()
    };
    println!("{}", title.apply_to(format!("wordgen {}", env!("CARGO_PKG_VERSION"))));
    println!("OSINT-based password candidate generator. Authorized use only.\n");
}

pub fn print_templates() {
    println!("Built-in templates (applied in this order):");
    for id in TemplateId::ALL {
        println!("  {:<18} {}", id.as_str(), id.description());
    }
    println!();
    println!("Pattern placeholders: {{name}} {{nickname}} {{year}} {{date}} {{phone}} {{custom}} {{text}}");
    println!("                      {{symbol}} {{digit}} {{sep}}   ({{{{ and }}}} for literal braces)");
}

/// Trims and NFC-normalizes one typed field. Blank input is `None`; control
/// characters and oversized values are rejected.
fn sanitize_field(label: &str, raw: &str) -> Result<Option<String>> {
    let value: String = raw.trim().nfc().collect();
    if value.is_empty() {
        return Ok(None);
    }

    let positions: Vec<String> = value
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .map(|(pos, _)| pos.to_string())
        .collect();
    if !positions.is_empty() {
        anyhow::bail!(
            "{} contains control character(s) at position(s): {}",
            label,
            positions.join(", ")
        );
    }
    if value.len() > MAX_FIELD_BYTES {
        anyhow::bail!(
            "{} too long ({} bytes, maximum is {})",
            label,
            value.len(),
            MAX_FIELD_BYTES
        );
    }

    Ok(Some(value))
}

pub fn prompt_confirmation(expected: &str) -> Result<bool> {
    let expected: Zeroizing<String> = Zeroizing::new(expected.trim().nfc().collect());

    for attempt in 1..=MAX_CONFIRM_ATTEMPTS {
        print!("Confirmation phrase: ");
        io::stdout().flush()?;

        let typed = Zeroizing::new(read_password().context("Failed to read confirmation phrase")?);
        let typed: Zeroizing<String> = Zeroizing::new(typed.trim().nfc().collect());

        if *typed == *expected {
            tracing::info!(attempt, "authorization confirmed");
            return Ok(true);
        }

        tracing::warn!(attempt, "confirmation phrase mismatch");
        eprintln!(
            "Phrase did not match ({} of {} attempts).",
            attempt, MAX_CONFIRM_ATTEMPTS
        );
    }

    Ok(false)
}

/// Prompts every profile field in order. Enter skips a field, and so does a
/// rejected value, after a warning.
pub fn prompt_profile() -> Result<Profile> {
    println!("Provide OSINT inputs. Press Enter to skip any field.");
    let term = Term::stderr();

    let mut profile = Profile::new();
    for field in Field::ALL {
        print!("{}: ", field.label());
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        match sanitize_field(field.label(), &input) {
            Ok(Some(value)) => profile.insert(field, value),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(field = %field, "field rejected: {}", e);
                term.write_line(&format!("WARNING: {}; field skipped", e))?;
            }
        }
    }

    Ok(profile)
}

pub fn progress_bar(max_count: Option<usize>, options: &DisplayOptions) -> ProgressBar {
    if !options.show_progress {
        return ProgressBar::hidden();
    }

    let pb = match max_count {
        Some(total) => {
            let pb = ProgressBar::new(total as u64);
            let bar_chars = if options.unicode_support { "█▉▊▋▌▍▎▏ " } else { "#>-" };
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:40}] {pos}/{len} ({per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars(bar_chars),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {msg} {pos}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("-\\|/-"),
            );
            pb
        }
    };

    pb.set_message("Generating");
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn timed<F, T>(f: F) -> Result<(T, Duration)>
where
    F: FnOnce() -> Result<T>,
{
    let term = Term::stdout();
    term.hide_cursor().ok();

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    term.show_cursor().ok();

    result.map(|r| (r, elapsed))
}

pub fn display_summary(summary: &RunSummary<'_>, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = if options.unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    };

    let produced = summary.written > 0;
    let count_style = style(options, produced);
    let count_status = if produced { check_ok } else { check_warn };

    let bound_hit = summary.max_count == Some(summary.written);

    println!("\nSummary:");
    println!("  {} Output     {}", branch, summary.output.display());
    println!(
        "  {} Tokens     {} {}",
        branch,
        summary.tokens,
        if summary.tokens == 1 { "token" } else { "tokens" }
    );
    println!(
        "  {} Templates  {} {}",
        branch,
        summary.templates,
        if summary.templates == 1 {
            "template"
        } else {
            "templates"
        }
    );
    println!(
        "  {} Written    {} {} {}",
        branch,
        count_style.apply_to(format!("[{}]", count_status)),
        count_style.apply_to(summary.written),
        if summary.written == 1 {
            "candidate"
        } else {
            "candidates"
        }
    );
    match summary.max_count {
        Some(max) => println!(
            "  {} Bound      {}{}",
            branch,
            max,
            if bound_hit { " (reached)" } else { "" }
        ),
        None => println!("  {} Bound      none", branch),
    }
    if let Some(log_file) = summary.log_file {
        println!("  {} Log        {}", branch, log_file.display());
    }
    println!("  {} Time       {:.2}s", last, summary.elapsed.as_secs_f64());
}
