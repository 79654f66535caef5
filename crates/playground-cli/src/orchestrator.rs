//! Main orchestration logic.

use crate::cli::Args;
use crate::config::{ConfigError, PlaygroundConfig};
use crate::output::{Formatter, JsonEntry, RunSummary};
use crate::session::Session;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::Diagnostic;
use playground_parser::{AttributeMode, ParseOptions, StaticRegistry};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use walkdir::WalkDir;

/// Orchestration errors.
#[derive(Debug, Error, Diagnostic)]
pub enum OrchestratorError {
    /// A path given on the command line does not exist.
    #[error("no such file or directory: {0}")]
    #[diagnostic(code(indo_playground::missing_path))]
    MissingPath(Utf8PathBuf),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    /// The working directory could not be determined.
    #[error("failed to read current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// Failed to read from stdin.
    #[error("failed to read stdin: {0}")]
    StdinFailed(#[source] std::io::Error),

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    #[diagnostic(code(indo_playground::invalid_glob))]
    InvalidGlob(String),

    /// Explicit config file could not be loaded.
    #[error(transparent)]
    #[diagnostic(code(indo_playground::config))]
    Config(#[from] ConfigError),

    /// Watch error.
    #[error("watch error: {0}")]
    WatchFailed(String),
}

/// Settings shared by every snippet in a run.
struct RunContext {
    cwd: Utf8PathBuf,
    registry: Arc<StaticRegistry>,
    options: ParseOptions,
    formatter: Formatter,
    timings: bool,
}

impl RunContext {
    /// Path shown to the user: relative to the working directory if possible.
    fn display_path<'a>(&self, path: &'a Utf8Path) -> &'a Utf8Path {
        path.strip_prefix(&self.cwd).unwrap_or(path)
    }
}

/// Runs every snippet the arguments name.
pub async fn run(args: Args) -> Result<RunSummary, OrchestratorError> {
    let cwd = std::env::current_dir().map_err(OrchestratorError::CurrentDir)?;
    let cwd =
        Utf8PathBuf::try_from(cwd).map_err(|e| OrchestratorError::NonUtf8Path(e.to_string()))?;

    let config = load_config(&args, &cwd)?;
    let registry = Arc::new(build_registry(&args, &config));
    let options = parse_options(&args, &config);
    tracing::info!(
        components = registry.len(),
        strict = options.attribute_mode == AttributeMode::Strict,
        max_depth = options.max_depth,
        "configured playground"
    );

    let ctx = RunContext {
        cwd,
        registry,
        options,
        formatter: Formatter::new(args.output),
        timings: args.timings,
    };

    if args.stdin {
        return run_stdin(&ctx);
    }

    let mut patterns = args.ignore.clone();
    patterns.extend(config.exclude.iter().cloned());
    let ignore_set = build_ignore_set(&patterns)?;

    let scan_start = Instant::now();
    let extensions = config.file_extensions();
    let roots = absolute_roots(&ctx.cwd, &args.paths)?;
    let files = collect_files(&roots, &extensions, &ignore_set);
    let scan_time = scan_start.elapsed();
    tracing::debug!(files = files.len(), ?scan_time, "collected snippets");

    if args.watch {
        run_watch_mode(&ctx, &args, &roots, files, &extensions, &ignore_set).await
    } else {
        Ok(run_batch(&ctx, &files, scan_time))
    }
}

/// Loads `--config`, or `indo-playground.json` from the first directory
/// argument (falling back to the working directory).
fn load_config(args: &Args, cwd: &Utf8Path) -> Result<PlaygroundConfig, OrchestratorError> {
    if let Some(path) = &args.config {
        return Ok(PlaygroundConfig::load_file(&cwd.join(path))?);
    }

    let dir = args
        .paths
        .iter()
        .map(|p| cwd.join(p))
        .find(|p| p.is_dir())
        .unwrap_or_else(|| cwd.to_owned());
    Ok(PlaygroundConfig::load(&dir))
}

/// Config registry plus `--component`, minus built-ins under `--no-builtins`.
fn build_registry(args: &Args, config: &PlaygroundConfig) -> StaticRegistry {
    let mut config = config.clone();
    config.include_builtins &= !args.no_builtins;
    config.components.extend(args.components.iter().cloned());
    config.registry()
}

/// Command-line flags override the config file.
fn parse_options(args: &Args, config: &PlaygroundConfig) -> ParseOptions {
    let mut options = config.parse_options();
    if args.strict_attributes {
        options.attribute_mode = AttributeMode::Strict;
    }
    if let Some(max_depth) = args.max_depth {
        options.max_depth = max_depth;
    }
    options
}

fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, OrchestratorError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;
        builder.add(glob);
    }

    // Default ignores
    for pattern in ["**/node_modules/**", "**/target/**", "**/.git/**"] {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }

    builder
        .build()
        .map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))
}

fn absolute_roots(
    cwd: &Utf8Path,
    paths: &[Utf8PathBuf],
) -> Result<Vec<Utf8PathBuf>, OrchestratorError> {
    paths
        .iter()
        .map(|path| {
            let absolute = if path.as_str() == "." {
                cwd.to_owned()
            } else {
                cwd.join(path)
            };
            if absolute.exists() {
                Ok(absolute)
            } else {
                Err(OrchestratorError::MissingPath(path.clone()))
            }
        })
        .collect()
}

/// Expands roots into a sorted list of snippet files.
///
/// Files named directly are always included. Directories are walked for
/// files with a snippet extension that no ignore pattern matches.
fn collect_files(
    roots: &[Utf8PathBuf],
    extensions: &[&str],
    ignore: &GlobSet,
) -> Vec<Utf8PathBuf> {
    let mut files: Vec<Utf8PathBuf> = Vec::new();

    for root in roots {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }

        files.extend(
            WalkDir::new(root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
                .filter(|p| is_snippet(p, extensions))
                .filter(|p| {
                    let relative = p.strip_prefix(root).unwrap_or(p);
                    !ignore.is_match(relative.as_str())
                }),
        );
    }

    files.sort();
    files.dedup();
    files
}

fn is_snippet(path: &Utf8Path, extensions: &[&str]) -> bool {
    let file_name = path.file_name().unwrap_or("");
    extensions.iter().any(|ext| file_name.ends_with(ext))
}

/// Parses `source` with a fresh session and formats the result.
fn run_one(
    ctx: &RunContext,
    name: &str,
    source: &str,
) -> (String, Option<serde_json::Value>, bool) {
    let mut session = Session::new(ctx.registry.as_ref(), ctx.options);
    let result = session.run(source);
    let ok = result.is_ok();

    if ctx.formatter.is_json() {
        (String::new(), Some(JsonEntry::new(name, source, result).to_value()), ok)
    } else {
        (ctx.formatter.format(name, source, result), None, ok)
    }
}

fn run_stdin(ctx: &RunContext) -> Result<RunSummary, OrchestratorError> {
    let source = std::io::read_to_string(std::io::stdin()).map_err(OrchestratorError::StdinFailed)?;

    let start = Instant::now();
    let (text, json, ok) = run_one(ctx, "<stdin>", &source);
    let parse_time = start.elapsed();

    match json {
        Some(value) => println!(
            "{}",
            serde_json::to_string_pretty(&vec![value]).unwrap_or_else(|_| "[]".to_string())
        ),
        None => print!("{text}"),
    }

    if ctx.timings {
        eprintln!("=== indo-playground timings ===");
        eprintln!("parse: {:?}", parse_time);
    }

    Ok(RunSummary {
        file_count: 1,
        failed_count: usize::from(!ok),
    })
}

/// Runs every file once, in parallel, and prints results in path order.
fn run_batch(ctx: &RunContext, files: &[Utf8PathBuf], scan_time: Duration) -> RunSummary {
    let total_start = Instant::now();

    struct FileOutput {
        text: String,
        json: Option<serde_json::Value>,
        ok: bool,
    }

    let parse_start = Instant::now();
    let outputs: Vec<FileOutput> = files
        .par_iter()
        .map(|path| {
            let name = ctx.display_path(path);
            match fs::read_to_string(path) {
                Ok(source) => {
                    let (text, json, ok) = run_one(ctx, name.as_str(), &source);
                    FileOutput { text, json, ok }
                }
                Err(e) => {
                    tracing::warn!(path = %name, "failed to read snippet: {e}");
                    FileOutput {
                        text: format!("{name}\nError: failed to read file: {e}\n\n"),
                        json: Some(serde_json::json!({
                            "filename": name.as_str(),
                            "ok": false,
                            "error": { "code": "read-failed", "message": e.to_string() },
                        })),
                        ok: false,
                    }
                }
            }
        })
        .collect();
    let parse_time = parse_start.elapsed();

    let summary = RunSummary {
        file_count: files.len(),
        failed_count: outputs.iter().filter(|o| !o.ok).count(),
    };

    if ctx.formatter.is_json() {
        let entries: Vec<serde_json::Value> = outputs.into_iter().filter_map(|o| o.json).collect();
        let json = serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string());
        println!("{}", json);
    } else {
        for output in &outputs {
            print!("{}", output.text);
        }
        println!("{}", summary.format());
    }

    if ctx.timings {
        eprintln!("=== indo-playground timings ===");
        eprintln!("file scan: {:?} ({} files)", scan_time, files.len());
        eprintln!("parse: {:?}", parse_time);
        eprintln!("total: {:?}", total_start.elapsed() + scan_time);
    }

    summary
}

/// Per-file sessions kept alive across edits in watch mode.
struct WatchState {
    sessions: BTreeMap<Utf8PathBuf, Session<Arc<StaticRegistry>>>,
    registry: Arc<StaticRegistry>,
    options: ParseOptions,
}

impl WatchState {
    fn new(registry: Arc<StaticRegistry>, options: ParseOptions) -> Self {
        Self {
            sessions: BTreeMap::new(),
            registry,
            options,
        }
    }

    /// Re-runs `path` and returns the text to print.
    ///
    /// On failure the error is shown along with a note about the render
    /// that stays on screen from the last good run.
    fn rerun(&mut self, ctx: &RunContext, path: &Utf8Path) -> String {
        let name = ctx.display_path(path).as_str().to_owned();
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                // Deleted or renamed while watching.
                self.sessions.remove(path);
                return format!("{name}\nError: failed to read file: {e}\n\n");
            }
        };

        let session = self
            .sessions
            .entry(path.to_owned())
            .or_insert_with(|| Session::new(Arc::clone(&self.registry), self.options));

        let mut text = ctx.formatter.format(&name, &source, session.run(&source));
        tracing::debug!(path = %name, runs = session.runs(), "re-ran snippet");
        if let Some(kept) = session.last_output().filter(|_| session.is_stale()) {
            text.push_str(&format!(
                "(keeping last successful render of {name}: {} elements)\n\n",
                kept.element_count()
            ));
        }
        text
    }

    fn failed_count(&self) -> usize {
        self.sessions
            .values()
            .filter(|s| s.last_error().is_some())
            .count()
    }
}

/// Runs in watch mode.
async fn run_watch_mode(
    ctx: &RunContext,
    args: &Args,
    roots: &[Utf8PathBuf],
    initial_files: Vec<Utf8PathBuf>,
    extensions: &[&str],
    ignore: &GlobSet,
) -> Result<RunSummary, OrchestratorError> {
    use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

    println!("Starting watch mode...\n");

    let mut state = WatchState::new(Arc::clone(&ctx.registry), ctx.options);
    for path in &initial_files {
        print!("{}", state.rerun(ctx, path));
    }
    println!(
        "{}",
        RunSummary {
            file_count: initial_files.len(),
            failed_count: state.failed_count(),
        }
        .format()
    );

    // Set up file watcher with tokio channel
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    for root in roots {
        let mode = if root.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(root.as_std_path(), mode)
            .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;
    }

    println!("Watching for changes... (Ctrl+C to stop)\n");

    while let Some(event) = rx.recv().await {
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            continue;
        }

        let changed: Vec<Utf8PathBuf> = event
            .paths
            .into_iter()
            .filter_map(|p| Utf8PathBuf::try_from(p).ok())
            .filter(|p| is_watched(p, roots, extensions, ignore))
            .collect();

        if changed.is_empty() {
            continue;
        }

        if !args.preserve_watch_output {
            // Clear screen
            print!("\x1B[2J\x1B[1;1H");
        }

        for path in &changed {
            tracing::info!(path = %ctx.display_path(path), "snippet changed");
            let start = Instant::now();
            print!("{}", state.rerun(ctx, path));
            if ctx.timings {
                eprintln!("parse: {:?}", start.elapsed());
            }
        }
    }

    Err(OrchestratorError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}

/// True if an event path is one of the snippets this run covers.
fn is_watched(
    path: &Utf8Path,
    roots: &[Utf8PathBuf],
    extensions: &[&str],
    ignore: &GlobSet,
) -> bool {
    roots.iter().any(|root| {
        if root.is_file() {
            return root.as_path() == path;
        }
        match path.strip_prefix(root) {
            Ok(relative) => is_snippet(path, extensions) && !ignore.is_match(relative.as_str()),
            Err(_) => false,
        }
    })
}
