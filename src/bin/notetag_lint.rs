//! Check notes for malformed auto-state blocks and tech tags.
//!
//! Reads plain note files and/or a TOML database and reports every rule it
//! finds. Exits with an error when anything fails to parse.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use battler_rules::expr;
use battler_rules::notetags::{self, tech as tags};
use battler_rules::{Condition, Database, EngineConfig};

/// Lint battle rule notetags
#[derive(Parser)]
#[command(name = "notetag-lint")]
#[command(about = "Check auto-state and tech-point notetags", long_about = None)]
#[command(version)]
struct Cli {
    /// Note files to check
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// TOML database whose state, skill and item notes are checked
    #[arg(short, long, value_name = "TOML")]
    database: Option<PathBuf>,

    /// Engine configuration to validate
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Only print problems
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Problems found in one run.
#[derive(Default)]
struct Report {
    problems: usize,
    quiet: bool,
}

impl Report {
    fn problem(&mut self, source: &str, message: impl std::fmt::Display) {
        self.problems += 1;
        println!("{source}: error: {message}");
    }

    fn note(&self, source: &str, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("{source}: {message}");
        }
    }

    fn check_auto_states(&mut self, source: &str, notes: &str) {
        for block in notetags::parse_blocks(notes) {
            let rule = match block {
                Ok(rule) => rule,
                Err(err) => {
                    self.problem(source, err);
                    continue;
                }
            };

            let states: Vec<String> = rule.states.iter().map(ToString::to_string).collect();
            self.note(
                source,
                format_args!(
                    "auto state on `{}` -> [{}] ({} conditions)",
                    rule.trigger,
                    states.join(", "),
                    rule.conditions.len()
                ),
            );
            for condition in &rule.conditions {
                if let Condition::Invalid { source: text, reason } = condition {
                    self.problem(source, format_args!("condition `{text}`: {reason}"));
                }
            }
        }
    }

    fn check_expression(&mut self, source: &str, what: &str, text: &str) {
        match expr::parse(text) {
            Ok(parsed) => debug!(source, what, %parsed, "expression ok"),
            Err(err) => self.problem(source, format_args!("{what} `{text}`: {err}")),
        }
    }

    fn check_changes(&self, source: &str, note: &str) {
        for change in tags::item_changes(note) {
            self.note(
                source,
                format_args!("{:?} change for skill {}: {:+}", change.kind, change.skill, change.delta),
            );
        }
    }
}

fn lint_database(report: &mut Report, database: &Database) {
    for state in database.states() {
        let source = format!("state {} ({})", state.id, state.name);
        report.check_auto_states(&source, &state.note);
    }

    for skill in database.skills() {
        let source = format!("skill {} ({})", skill.id, skill.name);
        if skill.is_tech_skill() {
            report.note(&source, "tech skill");
        }
        if let Some(growth) = skill.tech_growth() {
            report.check_expression(&source, "tech growth", growth);
        }
        report.check_changes(&source, &skill.note);
    }

    for item in database.items() {
        let source = format!("item {} ({})", item.id, item.name);
        report.check_changes(&source, &item.note);
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut report = Report {
        quiet: cli.quiet,
        ..Report::default()
    };

    if let Some(path) = &cli.config {
        let config = EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?;
        report.check_expression(&path.display().to_string(), "default tech growth", &config.tech.default_growth);
        info!(path = %path.display(), "config ok");
    }

    if let Some(path) = &cli.database {
        let database = Database::load(path)
            .with_context(|| format!("loading database {}", path.display()))?;
        lint_database(&mut report, &database);
    }

    for path in &cli.files {
        let notes = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let source = path.display().to_string();
        report.check_auto_states(&source, &notes);
        report.check_changes(&source, &notes);
        for call in tags::comment_calls(&notes) {
            report.note(&source, format_args!("comment call {call:?}"));
        }
    }

    if report.problems > 0 {
        bail!("{} problem(s) found", report.problems);
    }
    Ok(())
}
