//! Introscore: self-introduction transcript scorer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use introscore::config::{
    build_ignore_set, default_config_json, is_ignored, load_config, Config, EmbedderProvider,
    CONFIG_FILENAME,
};
use introscore::reporter::{ConsoleReporter, JsonReporter};
use introscore::{ScoreReport, ScoringEngine};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use walkdir::WalkDir;

/// Introscore: rubric scorer for spoken-English self-introductions
#[derive(Parser, Debug)]
#[command(name = "introscore")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Transcript file, directory of .txt transcripts, or - for stdin
    #[arg(conflicts_with = "text")]
    path: Option<PathBuf>,

    /// Score this text instead of reading a file
    #[arg(long)]
    text: Option<String>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Minimum overall score (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (one line per transcript)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output and debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .introscorerc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Embedding provider: hashing, http or off
    #[arg(long, value_name = "PROVIDER")]
    embedder: Option<EmbedderProvider>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of parallel threads for directory runs (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .introscorerc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Embedding provider: hashing, http or off
        #[arg(long)]
        embedder: Option<EmbedderProvider>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Where the transcripts come from
enum Input {
    Text(String),
    Stdin,
    File(PathBuf),
    Directory(PathBuf),
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }
    init_logging(args.verbose)?;

    if let Some(ref cmd) = args.command {
        match cmd {
            Commands::Init {
                threshold,
                embedder,
                dir,
            } => {
                return run_init(*threshold, *embedder, dir.as_deref());
            }
        }
    }

    let input = resolve_input(&args)?;

    // Resolve work directory for config search
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let work_dir = match input {
        Input::File(ref path) => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => cwd.clone(),
        },
        Input::Directory(ref path) => path.clone(),
        Input::Text(_) | Input::Stdin => cwd.clone(),
    };

    // Load config (CLI flags override config file)
    let config = load_config(&work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.embedder);

    if let Some(jobs) = args.jobs {
        if let Err(e) = configure_thread_pool(jobs) {
            eprintln!("{}: {:#}; using the default pool", "Warning".yellow(), e);
        }
    }

    let engine = ScoringEngine::from_config(&config);
    warn_if_semantic_unavailable(&engine, &config, args.quiet);

    let (reports, had_errors) = match input {
        Input::Text(ref text) => (vec![engine.score(text)], false),
        Input::Stdin => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read transcript from stdin")?;
            let report = engine
                .score_bytes(&bytes)
                .context("Failed to score stdin")?;
            (vec![report], false)
        }
        Input::File(ref path) => (vec![score_file(&engine, path)?], false),
        Input::Directory(ref dir) => {
            let ignore_set = if config.ignore.is_empty() {
                None
            } else {
                Some(build_ignore_set(&config.ignore)?)
            };
            let files = collect_transcripts(dir, ignore_set.as_ref())?;
            if files.is_empty() {
                eprintln!(
                    "{}: No .txt transcripts found in {}",
                    "Warning".yellow(),
                    dir.display()
                );
                return Ok(ExitCode::from(2));
            }
            score_files_parallel(&engine, &files, args.quiet)
        }
    };

    if reports.is_empty() {
        eprintln!("{}: All transcripts failed to score", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = ScoringEngine::aggregate_stats(&reports);
    let many = matches!(input, Input::Directory(_));

    // Output results
    if args.json {
        let reporter = if args.pretty {
            JsonReporter::new().pretty()
        } else {
            JsonReporter::new()
        };
        if many {
            println!("{}", reporter.report_many(&reports, &stats));
        } else {
            println!("{}", reporter.report(&reports[0]));
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.no_color {
            reporter = reporter.without_colors();
        }
        if args.verbose {
            reporter = reporter.verbose();
        }

        if args.quiet {
            for report in &reports {
                reporter.report_quiet(report);
            }
        } else if many {
            reporter.report_many(&reports, &stats);
        } else {
            reporter.report(&reports[0]);
        }
    }

    // Check threshold (config or CLI)
    if let Some(threshold) = config.threshold {
        let score = if many {
            stats.average_score
        } else {
            reports[0].overall_score
        };

        if score < threshold as f64 {
            if !args.quiet && !args.json {
                eprintln!(
                    "\n{}: Score {:.1} is below threshold {}",
                    "Failed".red().bold(),
                    score,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to initialize logging")?;
    Ok(())
}

fn resolve_input(args: &Args) -> Result<Input> {
    if let Some(ref text) = args.text {
        return Ok(Input::Text(text.clone()));
    }
    let Some(ref path) = args.path else {
        anyhow::bail!("No transcript given. Pass a file, a directory, '-' for stdin, or --text");
    };
    if path.as_os_str() == "-" {
        return Ok(Input::Stdin);
    }
    if path.is_dir() {
        return Ok(Input::Directory(path.clone()));
    }
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }
    Ok(Input::File(path.clone()))
}

/// Size the global rayon pool; fails if the pool is already running
fn configure_thread_pool(jobs: usize) -> Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .with_context(|| format!("Could not start {} worker threads", jobs))
}

fn warn_if_semantic_unavailable(engine: &ScoringEngine, config: &Config, quiet: bool) {
    let semantic = engine.semantic();
    if quiet || semantic.is_available() {
        return;
    }
    if config.embedder_settings().provider != EmbedderProvider::Off {
        eprintln!(
            "{}: Semantic scoring unavailable for provider {}; using rule scores only",
            "Warning".yellow(),
            semantic.provider()
        );
    }
}

fn score_file(engine: &ScoringEngine, path: &Path) -> Result<ScoreReport> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
    let report = engine
        .score_bytes(&bytes)
        .with_context(|| format!("Failed to score {}", path.display()))?;
    Ok(report.with_source(path.to_path_buf()))
}

fn collect_transcripts(
    dir: &Path,
    ignore_set: Option<&globset::GlobSet>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if !entry.file_type().is_file() || !is_transcript(file_path) {
            continue;
        }
        if let Some(set) = ignore_set {
            if is_ignored(file_path, set) {
                continue;
            }
        }
        files.push(file_path.to_path_buf());
    }

    // Sort for consistent output
    files.sort();

    Ok(files)
}

fn is_transcript(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

fn score_files_parallel(
    engine: &ScoringEngine,
    files: &[PathBuf],
    quiet: bool,
) -> (Vec<ScoreReport>, bool) {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    let had_errors = AtomicBool::new(false);

    let reports: Vec<_> = files
        .par_iter()
        .filter_map(|file| match score_file(engine, file) {
            Ok(report) => Some(report),
            Err(e) => {
                had_errors.store(true, Ordering::Relaxed);
                if !quiet {
                    eprintln!("{}: {:#}", "Error".red(), e);
                }
                None
            }
        })
        .collect();

    (reports, had_errors.load(Ordering::Relaxed))
}

fn run_init(
    threshold: Option<u8>,
    embedder: Option<EmbedderProvider>,
    dir: Option<&Path>,
) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(70);
    let provider = embedder.unwrap_or_default();

    std::fs::write(&config_path, default_config_json(threshold_value, provider))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}, embedder={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value,
        provider
    );
    Ok(ExitCode::SUCCESS)
}
