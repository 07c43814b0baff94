use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, Utc};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use studytrack_core::{
    Assignment, GradingScheme, PriorityLabel, align_to_scheme, calculate_gpa,
    categorize_assignment_type, class_report, find_matching_grading_category, gpa_points,
    graded_assignments, letter_grade, predict_final_grade, prioritize_assignments,
    project_reminders, score_assignment,
};
use studytrack_ingest::{
    load_assignments, load_scheme, parse_syllabus_breakdown, parse_syllabus_schedule,
};

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(name = "studytrack", version, about = "Grades, GPA and assignment priorities for a term")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Evaluate due dates against this instant instead of the clock (RFC 3339)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Weighted class grade, letter and per-category breakdown
    Grade {
        /// Assignment snapshot (.csv or .json)
        #[arg(long)]
        assignments: PathBuf,

        /// Grading scheme JSON (defaults to the suggested scheme)
        #[arg(long)]
        scheme: Option<PathBuf>,
    },

    /// Unweighted GPA over final class percentages
    Gpa {
        #[arg(required = true)]
        percentages: Vec<f64>,
    },

    /// Average needed on remaining work to reach a target grade
    Predict {
        #[arg(long)]
        assignments: PathBuf,

        #[arg(long)]
        scheme: Option<PathBuf>,

        /// Target percentage (default: grades.target from config)
        #[arg(long)]
        target: Option<f64>,
    },

    /// Order pending assignments by priority score
    Prioritize {
        #[arg(long)]
        assignments: PathBuf,

        /// Limit number of rows printed (default: 10)
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Include completed assignments
        #[arg(long)]
        all: bool,
    },

    /// Map free-text assignment labels to standard types
    Categorize {
        #[arg(required = true)]
        labels: Vec<String>,

        /// Match against this scheme's category names instead
        #[arg(long)]
        scheme: Option<PathBuf>,
    },

    /// Grading scheme helpers
    Scheme {
        #[command(subcommand)]
        command: SchemeCommand,
    },

    /// Extract dated gradeable items from a syllabus schedule
    Schedule {
        file: PathBuf,

        /// Term year (rows are month/day only; default: current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Due-soon reminders that are still ahead of now
    Reminders {
        #[arg(long)]
        assignments: PathBuf,
    },

    /// Read or write ~/.studytrack/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SchemeCommand {
    /// Print the suggested default scheme
    Suggest,

    /// Validate a scheme file
    Check { file: PathBuf },

    /// Build a scheme from a syllabus grading section
    FromSyllabus { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,

    /// Print the effective config
    Show,

    /// Turn smart prioritization on or off
    SetSmart {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let now = cli.now.unwrap_or_else(Utc::now);
    let json = cli.json;

    match cli.command {
        Command::Grade { assignments, scheme } => grade(&assignments, scheme.as_deref(), json)?,

        Command::Gpa { percentages } => {
            let gpa = calculate_gpa(&percentages);
            if json {
                print_json(&serde_json::json!({ "gpa": gpa.is_finite().then_some(gpa) }))?;
            } else {
                println!("GPA: {}", fmt_num(gpa, 2));
            }
        }

        Command::Predict {
            assignments,
            scheme,
            target,
        } => predict(&assignments, scheme.as_deref(), target, json)?,

        Command::Prioritize {
            assignments,
            limit,
            all,
        } => prioritize(&assignments, limit, all, now, json)?,

        Command::Categorize { labels, scheme } => {
            let scheme = scheme.as_deref().map(load_scheme).transpose()?;
            let rows: Vec<(String, String)> = labels
                .into_iter()
                .map(|label| {
                    let matched = match &scheme {
                        Some(s) => find_matching_grading_category(&label, &s.category_names()),
                        None => categorize_assignment_type(&label),
                    };
                    (label, matched)
                })
                .collect();

            if json {
                let map: serde_json::Map<String, serde_json::Value> =
                    rows.into_iter().map(|(k, v)| (k, v.into())).collect();
                print_json(&map)?;
            } else {
                for (label, matched) in rows {
                    println!("{label} -> {matched}");
                }
            }
        }

        Command::Scheme { command } => match command {
            SchemeCommand::Suggest => print_scheme(&GradingScheme::suggested(), json)?,
            SchemeCommand::Check { file } => {
                let scheme = load_scheme(&file)?;
                scheme
                    .validate()
                    .with_context(|| format!("invalid scheme {}", file.display()))?;
                if json {
                    print_scheme(&scheme, true)?;
                } else {
                    println!(
                        "OK: {} categories, mode {}, total weight {}",
                        scheme.categories.len(),
                        scheme.mode.as_str(),
                        scheme.total_weight()
                    );
                }
            }
            SchemeCommand::FromSyllabus { file } => {
                let text = read_text(&file)?;
                let scheme = parse_syllabus_breakdown(&text)
                    .with_context(|| format!("parsing {}", file.display()))?;
                if let Err(e) = scheme.validate() {
                    tracing::warn!(error = %e, "syllabus breakdown does not validate");
                }
                print_scheme(&scheme, json)?;
            }
        },

        Command::Schedule { file, year } => {
            let text = read_text(&file)?;
            let year = year.unwrap_or_else(|| now.year());
            let items = parse_syllabus_schedule(&text, year)?;
            if json {
                print_json(&items)?;
            } else if items.is_empty() {
                println!("No gradeable items found in {}", file.display());
            } else {
                for a in &items {
                    println!("{}  {:<10} {}", a.due_date, a.kind, a.display_title());
                }
            }
        }

        Command::Reminders { assignments } => {
            let cfg = config::load_config()?;
            let list = load_assignments(&assignments)?;
            let intents =
                project_reminders(&list, &cfg.profile.timezone, now, cfg.reminder_policy());
            if json {
                print_json(&intents)?;
            } else if intents.is_empty() {
                println!("No upcoming reminders");
            } else {
                for r in &intents {
                    println!("{}  {}", r.send_at_utc.format("%Y-%m-%d %H:%M UTC"), r.body);
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::SetSmart { enabled } => {
                let mut cfg = config::load_config()?;
                cfg.prioritization.smart = enabled;
                let p = config::save_config(&cfg)?;
                println!(
                    "Smart prioritization {} ({})",
                    if enabled { "on" } else { "off" },
                    p.display()
                );
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "studytrack=debug,studytrack_core=debug,studytrack_ingest=debug"
    } else {
        "studytrack=info,studytrack_core=warn,studytrack_ingest=warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn load_scheme_or_suggested(path: Option<&Path>) -> Result<GradingScheme> {
    let scheme = match path {
        Some(p) => load_scheme(p)?,
        None => {
            tracing::info!("no --scheme given; using the suggested scheme");
            GradingScheme::suggested()
        }
    };
    if let Err(e) = scheme.validate() {
        tracing::warn!(error = %e, "grading scheme does not validate; results may be off");
    }
    Ok(scheme)
}

/// Load assignments and canonicalize their types against the scheme.
fn load_aligned(path: &Path, scheme: &GradingScheme) -> Result<Vec<Assignment>> {
    let raw = load_assignments(path).with_context(|| format!("loading {}", path.display()))?;
    let aligned = align_to_scheme(&raw, scheme);

    let names = scheme.category_names();
    let orphans = aligned
        .iter()
        .filter(|a| a.counts_toward_grade() && !names.contains(&a.kind.as_str()))
        .count();
    if orphans > 0 {
        tracing::warn!(
            count = orphans,
            "graded assignments match no scheme category and are ignored"
        );
    }
    Ok(aligned)
}

fn grade(assignments: &Path, scheme: Option<&Path>, json: bool) -> Result<()> {
    let cfg = config::load_config()?;
    let scheme = load_scheme_or_suggested(scheme)?;
    let aligned = load_aligned(assignments, &scheme)?;
    let report = class_report(&aligned, &scheme);

    if json {
        return print_json(&report);
    }

    let decimals = cfg.grades.decimals;
    match (report.percentage, report.letter) {
        (Some(pct), Some(letter)) => println!(
            "Class grade: {}% ({letter}, {} GPA points)",
            fmt_num(pct, decimals),
            fmt_num(gpa_points(pct), 1)
        ),
        _ => println!("Class grade: N/A (nothing graded yet)"),
    }
    println!();
    for r in &report.breakdown {
        let avg = r
            .average
            .map_or_else(|| "N/A".to_string(), |v| format!("{}%", fmt_num(v, decimals)));
        let dropped = if r.dropped > 0 {
            format!(", dropped {}", r.dropped)
        } else {
            String::new()
        };
        println!(
            "  {:<12} weight {:>5}  avg {:>7}  graded {}/{}{}",
            r.name, r.weight, avg, r.graded_count, r.expected_count, dropped
        );
    }
    Ok(())
}

fn predict(
    assignments: &Path,
    scheme: Option<&Path>,
    target: Option<f64>,
    json: bool,
) -> Result<()> {
    let cfg = config::load_config()?;
    let target = target.unwrap_or(cfg.grades.target);
    if !(0.0..=100.0).contains(&target) {
        bail!("target must be between 0 and 100 (got {target})");
    }

    let scheme = load_scheme_or_suggested(scheme)?;
    let aligned = load_aligned(assignments, &scheme)?;
    let graded: Vec<Assignment> = graded_assignments(&aligned).into_iter().cloned().collect();
    let needed = predict_final_grade(&graded, &scheme, target);

    if json {
        return print_json(&serde_json::json!({ "target": target, "needed": needed }));
    }

    let Some(value) = needed.values().next().copied() else {
        println!("No remaining weight; the grade is already locked in");
        return Ok(());
    };
    println!(
        "To reach {}% ({}), average {}% on remaining work:",
        fmt_num(target, cfg.grades.decimals),
        letter_grade(target),
        fmt_num(value, cfg.grades.decimals)
    );
    for name in needed.keys() {
        match scheme.category(name) {
            Some(c) => println!("  {name} (weight {})", c.weight),
            None => println!("  {name}"),
        }
    }
    if value >= 100.0 {
        println!("(even perfect scores may not be enough)");
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PriorityRow<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    due_date: &'a str,
    score: f64,
    label: &'static str,
    color: &'static str,
}

fn prioritize(
    assignments: &Path,
    limit: usize,
    all: bool,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let cfg = config::load_config()?;
    let settings = cfg.settings();

    let list: Vec<Assignment> = load_assignments(assignments)?
        .into_iter()
        .filter(|a| all || !a.completed)
        .collect();
    let ordered = prioritize_assignments(list, &settings, now);

    let rows: Vec<PriorityRow> = ordered
        .iter()
        .take(limit)
        .map(|a| {
            let score = score_assignment(a, &settings, now).score;
            let label = PriorityLabel::from_score(score);
            PriorityRow {
                id: &a.id,
                title: a.display_title(),
                kind: &a.kind,
                due_date: &a.due_date,
                score,
                label: label.as_str(),
                color: label.color(),
            }
        })
        .collect();

    if json {
        return print_json(&rows);
    }
    if !settings.smart_prioritization {
        println!("(smart prioritization is off; showing stored order)");
    }
    for r in &rows {
        println!(
            "{:>5.1}  {:<6} {:<10} {} (due {})",
            r.score, r.label, r.id, r.title, r.due_date
        );
    }
    Ok(())
}

fn print_scheme(scheme: &GradingScheme, json: bool) -> Result<()> {
    if json {
        return print_json(scheme);
    }
    println!("mode: {}", scheme.mode.as_str());
    for c in &scheme.categories {
        let drop = if c.drop_lowest > 0 {
            format!(", drop lowest {}", c.drop_lowest)
        } else {
            String::new()
        };
        println!("  {:<12} {:>5}  ({} items{drop})", c.name, c.weight, c.count);
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serialize output")?);
    Ok(())
}

/// Non-finite values render as "N/A".
fn fmt_num(v: f64, decimals: usize) -> String {
    if v.is_finite() {
        format!("{v:.decimals$}")
    } else {
        "N/A".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(89.2857, 1), "89.3");
        assert_eq!(fmt_num(3.0, 2), "3.00");
        assert_eq!(fmt_num(f64::NAN, 2), "N/A");
    }

    #[test]
    fn test_cli_parses_set_smart_bool() {
        let cli = Cli::try_parse_from(["studytrack", "config", "set-smart", "false"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config {
                command: ConfigCommand::SetSmart { enabled: false }
            }
        ));
    }

    #[test]
    fn test_version_is_package_version() {
        use clap::CommandFactory;
        assert_eq!(Cli::command().get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_cli_parses_now() {
        let cli = Cli::try_parse_from(["studytrack", "--now", "2026-03-02T12:00:00Z", "gpa", "90"])
            .unwrap();
        assert_eq!(cli.now.unwrap().to_rfc3339(), "2026-03-02T12:00:00+00:00");
    }
}
