//! Endorisk: endocrine risk assessment CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use endorisk::config::{
    build_ignore_set, default_config_json, find_project_root, is_ignored, load_config,
    parse_fail_level, Config, CONFIG_FILENAME,
};
use endorisk::history::{append_record, load_history, newest_first, previous_for, save_history};
use endorisk::reporter::{ConsoleReporter, JsonReporter};
use endorisk::request::{AssessedRequest, AssessmentRequest, ExtractionResponse};
use endorisk::watcher::InputWatcher;
use endorisk::{extract_markers, MarkerSet, RiskEngine, RiskLevel};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Endorisk: endocrine and metabolic risk scoring
#[derive(Parser, Debug)]
#[command(name = "endorisk")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (default: search .endoriskrc.json in current dir and parents)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short, global = true)]
    json: bool,

    /// Quiet mode (minimal output)
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Include each rule's contribution in the output
    #[arg(long, global = true)]
    trace_rules: bool,

    /// Exit 1 when any condition reaches this level (moderate or high)
    #[arg(long, global = true, value_name = "LEVEL", value_parser = parse_fail_level)]
    fail_on: Option<RiskLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assess a profile using only its embedded lab results
    Analyze {
        /// Profile or request JSON file (- for stdin)
        #[arg(long)]
        profile: PathBuf,
    },

    /// Extract lab markers from a free-text report
    Extract {
        /// Lab report text file (- for stdin)
        #[arg(long)]
        lab_text: PathBuf,
    },

    /// Full pipeline: extract, merge, score, and record
    Assess {
        /// Profile or request JSON file (- for stdin)
        #[arg(long)]
        profile: PathBuf,

        /// JSON file of explicit marker values
        #[arg(long)]
        markers_json: Option<PathBuf>,

        /// Lab report text file
        #[arg(long)]
        lab_text: Option<PathBuf>,

        /// Patient name stored with the record
        #[arg(long)]
        name: Option<String>,

        /// Do not record this assessment
        #[arg(long)]
        no_history: bool,

        /// Re-run whenever an input file changes
        #[arg(long)]
        watch: bool,
    },

    /// Assess every request file under a directory
    Batch {
        /// Directory to search for *.json request files
        dir: PathBuf,

        /// Number of parallel threads (default: number of CPU cores)
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// List recorded assessments, newest first
    History {
        /// Show at most N records
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Create .endoriskrc.json with the built-in defaults
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("ENDORISK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    match &args.command {
        Commands::Init { dir } => run_init(dir.as_deref().unwrap_or(cwd.as_path())),
        Commands::Extract { lab_text } => run_extract(&args, lab_text),
        Commands::History { limit } => {
            let config = load_config(&cwd, args.config.as_deref())?;
            run_history(&args, &config, &cwd, *limit)
        }
        Commands::Analyze { profile } => {
            let config = load_config(&cwd, args.config.as_deref())?
                .merge_with_cli(args.fail_on, false);
            run_analyze(&args, &config, profile)
        }
        Commands::Assess {
            profile,
            markers_json,
            lab_text,
            name,
            no_history,
            watch,
        } => {
            let config = load_config(&cwd, args.config.as_deref())?
                .merge_with_cli(args.fail_on, *no_history);
            let inputs = AssessInputs {
                profile,
                markers_json: markers_json.as_deref(),
                lab_text: lab_text.as_deref(),
                name: name.as_deref(),
            };
            if *watch {
                run_watch(&args, &config, &cwd, &inputs)
            } else {
                run_assess(&args, &config, &cwd, &inputs)
            }
        }
        Commands::Batch { dir, jobs } => {
            let config = load_config(dir, args.config.as_deref())?
                .merge_with_cli(args.fail_on, false);
            run_batch(&args, &config, &cwd, dir, *jobs)
        }
    }
}

fn build_engine(args: &Args, config: &Config) -> RiskEngine {
    let engine = RiskEngine::from_config(config);
    if args.trace_rules {
        engine.with_trace()
    } else {
        engine
    }
}

/// Read a file, or stdin when the path is `-`
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_request(path: &Path) -> Result<AssessmentRequest> {
    let content = read_input(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    AssessmentRequest::from_value(value).with_context(|| format!("Invalid request: {}", path.display()))
}

fn load_markers(path: &Path) -> Result<MarkerSet> {
    let content = read_input(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(MarkerSet::from_value(&value))
}

fn history_path(config: &Config, cwd: &Path) -> PathBuf {
    let file = config.history.file_name();
    find_project_root(cwd, file)
        .unwrap_or_else(|| cwd.to_path_buf())
        .join(file)
}

/// Exit code for a set of worst levels under the configured failOn
fn check_fail_on(args: &Args, config: &Config, levels: &[RiskLevel]) -> Option<ExitCode> {
    let worst = levels.iter().copied().max()?;
    if !config.fails_at(worst) {
        return None;
    }
    if !args.quiet && !args.json {
        eprintln!(
            "\n{}: {} risk reached (failOn: {})",
            "Failed".red().bold(),
            worst,
            config.fail_on.map(|l| l.to_string()).unwrap_or_default()
        );
    }
    Some(ExitCode::from(1))
}

fn run_init(dir: &Path) -> Result<ExitCode> {
    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }
    let json = default_config_json()?;
    std::fs::write(&config_path, format!("{}\n", json))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    println!(
        "{}: Created {}",
        "Done".green().bold(),
        config_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_extract(args: &Args, lab_text: &Path) -> Result<ExitCode> {
    let text = read_input(lab_text)?;
    let markers = extract_markers(&text);
    if args.json {
        let response = ExtractionResponse {
            extracted_markers: markers,
        };
        println!("{}", JsonReporter::new().pretty().report(&response));
    } else {
        print!("{}", ConsoleReporter::new().render_markers(&markers));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_analyze(args: &Args, config: &Config, profile: &Path) -> Result<ExitCode> {
    let mut request = load_request(profile)?;
    request.lab_report_text = None;

    let engine = build_engine(args, config);
    let assessed = request
        .assess(&engine, &config.profile_defaults(), None)
        .with_context(|| format!("Invalid profile: {}", profile.display()))?;
    let assessment = &assessed.response.assessment;

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(assessment));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(&request.patient_name, assessment);
    } else {
        reporter(args).report(&request.patient_name, &assessed.response, None);
    }

    Ok(check_fail_on(args, config, &[assessment.max_level()]).unwrap_or(ExitCode::SUCCESS))
}

struct AssessInputs<'a> {
    profile: &'a Path,
    markers_json: Option<&'a Path>,
    lab_text: Option<&'a Path>,
    name: Option<&'a str>,
}

impl AssessInputs<'_> {
    fn load(&self) -> Result<(AssessmentRequest, Option<MarkerSet>)> {
        let mut request = load_request(self.profile)?;
        if let Some(path) = self.lab_text {
            request = request.with_lab_text(read_input(path)?);
        }
        if let Some(name) = self.name {
            request = request.with_patient_name(name.to_string());
        }
        let explicit = self.markers_json.map(load_markers).transpose()?;
        Ok((request, explicit))
    }

    /// Files to watch (stdin is never watched)
    fn files(&self) -> Vec<&Path> {
        [Some(self.profile), self.markers_json, self.lab_text]
            .into_iter()
            .flatten()
            .filter(|p| *p != Path::new("-"))
            .collect()
    }
}

fn reporter(args: &Args) -> ConsoleReporter {
    if args.verbose {
        ConsoleReporter::new().verbose()
    } else {
        ConsoleReporter::new()
    }
}

fn run_assess(args: &Args, config: &Config, cwd: &Path, inputs: &AssessInputs) -> Result<ExitCode> {
    let (request, explicit) = inputs.load()?;
    let engine = build_engine(args, config);
    let assessed = request
        .assess(&engine, &config.profile_defaults(), explicit.as_ref())
        .with_context(|| format!("Invalid profile: {}", inputs.profile.display()))?;

    let history_file = history_path(config, cwd);
    let mut history = if config.history.is_enabled() {
        Some(load_history(&history_file))
    } else {
        None
    };
    let previous = history
        .as_ref()
        .and_then(|h| previous_for(h, &request.patient_name))
        .cloned();

    let assessment = &assessed.response.assessment;
    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&assessed.response));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(&request.patient_name, assessment);
    } else {
        reporter(args).report(&request.patient_name, &assessed.response, previous.as_ref());
    }

    if let Some(ref mut history) = history {
        record(args, config, &history_file, history, &request, &assessed);
    }

    Ok(check_fail_on(args, config, &[assessment.max_level()]).unwrap_or(ExitCode::SUCCESS))
}

/// Append and save one record. A save failure is only a warning.
fn record(
    args: &Args,
    config: &Config,
    history_file: &Path,
    history: &mut endorisk::history::HistoryFile,
    request: &AssessmentRequest,
    assessed: &AssessedRequest,
) {
    let id = append_record(
        history,
        &request.patient_name,
        &request.profile,
        assessed,
        config.history.max_records(),
    );
    match save_history(history_file, history) {
        Ok(()) => tracing::debug!(id, path = %history_file.display(), "assessment recorded"),
        Err(e) => {
            if !args.quiet {
                eprintln!("{}: {:#}", "Warning".yellow(), e);
            }
        }
    }
}

fn run_watch(args: &Args, config: &Config, cwd: &Path, inputs: &AssessInputs) -> Result<ExitCode> {
    let files = inputs.files();
    if files.is_empty() {
        anyhow::bail!("--watch needs at least one input file; stdin cannot be watched");
    }
    let watcher = InputWatcher::watch(&files).context("Failed to create file watcher")?;

    if let Err(e) = run_assess(args, config, cwd, inputs) {
        eprintln!("{}: {:#}", "Error".red(), e);
    }
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let changed = watcher.next_changes();
        if changed.is_empty() {
            continue;
        }
        for path in &changed {
            tracing::debug!(path = %path.display(), "input changed");
        }
        if let Err(e) = run_assess(args, config, cwd, inputs) {
            eprintln!("{}: {:#}", "Error".red(), e);
        }
    }
}

fn run_history(args: &Args, config: &Config, cwd: &Path, limit: Option<usize>) -> Result<ExitCode> {
    let history = load_history(&history_path(config, cwd));
    let records = newest_first(&history, limit);
    if args.json {
        println!("{}", JsonReporter::new().pretty().report_history(&records));
    } else {
        print!("{}", ConsoleReporter::new().render_history(&records));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_batch(
    args: &Args,
    config: &Config,
    cwd: &Path,
    dir: &Path,
    jobs: Option<usize>,
) -> Result<ExitCode> {
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let files = collect_request_files(dir, ignore_set.as_ref())?;
    if files.is_empty() {
        eprintln!("{}: No request files found in {}", "Warning".yellow(), dir.display());
        return Ok(ExitCode::from(2));
    }

    if let Some(jobs) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = build_engine(args, config);
    let (assessed, had_errors) = assess_files_parallel(&engine, config, &files, args.quiet);

    if config.history.is_enabled() {
        let history_file = history_path(config, cwd);
        let mut history = load_history(&history_file);
        for (_, request, done) in &assessed {
            append_record(
                &mut history,
                &request.patient_name,
                &request.profile,
                done,
                config.history.max_records(),
            );
        }
        if let Err(e) = save_history(&history_file, &history) {
            if !args.quiet {
                eprintln!("{}: {:#}", "Warning".yellow(), e);
            }
        }
    }

    let entries: Vec<(PathBuf, _)> = assessed
        .into_iter()
        .map(|(path, _, done)| (path, done.response))
        .collect();
    let assessments: Vec<_> = entries.iter().map(|(_, r)| r.assessment.clone()).collect();
    let stats = RiskEngine::aggregate_stats(&assessments);

    if args.json {
        println!("{}", JsonReporter::new().pretty().report_batch(&entries, &stats));
    } else {
        reporter(args).report_batch(&entries, &stats);
    }

    let levels: Vec<RiskLevel> = assessments.iter().map(|a| a.max_level()).collect();
    if let Some(code) = check_fail_on(args, config, &levels) {
        return Ok(code);
    }
    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Assess files in parallel, keeping input order. Failures are reported and skipped.
fn assess_files_parallel(
    engine: &RiskEngine,
    config: &Config,
    files: &[PathBuf],
    quiet: bool,
) -> (Vec<(PathBuf, AssessmentRequest, AssessedRequest)>, bool) {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    let had_errors = AtomicBool::new(false);
    let defaults = config.profile_defaults();

    let results: Vec<_> = files
        .par_iter()
        .filter_map(|file| {
            let outcome = AssessmentRequest::from_path(file).and_then(|request| {
                let done = request
                    .assess(engine, &defaults, None)
                    .with_context(|| format!("Invalid profile: {}", file.display()))?;
                Ok((file.clone(), request, done))
            });
            match outcome {
                Ok(result) => Some(result),
                Err(e) => {
                    had_errors.store(true, Ordering::Relaxed);
                    if !quiet {
                        eprintln!(
                            "{}: Failed to assess {}: {:#}",
                            "Error".red(),
                            file.display(),
                            e
                        );
                    }
                    None
                }
            }
        })
        .collect();

    (results, had_errors.load(Ordering::Relaxed))
}

/// Collect `*.json` request files under `dir`, skipping dotfiles and ignored paths
fn collect_request_files(
    dir: &Path,
    ignore_set: Option<&globset::GlobSet>,
) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Directory does not exist: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !is_request_file(path) {
            continue;
        }
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                continue;
            }
        }
        files.push(path.to_path_buf());
    }
    // Sort for consistent output
    files.sort();
    Ok(files)
}

fn is_request_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !name.starts_with('.') && name.ends_with(".json")
}
