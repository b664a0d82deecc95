use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::dom::UiEvent;
use crate::output::{self, OutputFormat};
use crate::render::{ViewerUrls, DEFAULT_VIEWER_BASE};
use crate::session::{Outcome, Session};
use crate::source::{self, ApiSource, DataSource, StaticSource};
use crate::swap::{ContentSwapper, DEFAULT_SWAP_DELAY};

fn print_banner() {
    const BANNER: &str = r#"
    _________ _______________ ______
   / ___/ __ `/ ___/ ___/ __ `/ ___/
  / /__/ /_/ / /  / /__/ /_/ (__  )
  \___/\__,_/_/   \___/\__,_/____/
"#;
    eprint!("{}", BANNER);
    eprintln!(
        "       v{} - specimen collection content switcher",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label.bold(), value);
}

fn init_tracing(verbose: u8) -> Result<(), String> {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| format!("failed to install log subscriber: {e}"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SourceKind {
    Static,
    Api,
}

impl SourceKind {
    fn parse(raw: &str) -> Result<Self, String> {
        validation::validate_source(raw)?;
        if raw.trim().eq_ignore_ascii_case("api") {
            Ok(Self::Api)
        } else {
            Ok(Self::Static)
        }
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    source: SourceKind,
    api_url: Option<String>,
    viewer_base: String,
    swap_delay: Duration,
    timeout: Duration,
    events: Vec<String>,
    events_file: Option<String>,
    interactive: bool,
    output: Option<String>,
    output_format: OutputFormat,
    menus: bool,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let source = SourceKind::parse(
        args.source
            .as_deref()
            .or(cfg.source.as_deref())
            .unwrap_or("static"),
    )?;

    let api_url = args.api_url.or(cfg.api_url);
    if let Some(url) = api_url.as_deref() {
        validation::validate_http_url("api_url", url)?;
    }
    if source == SourceKind::Api && api_url.is_none() {
        return Err("source 'api' requires --api-url (or api_url in the config file)".to_string());
    }

    let viewer_base = args
        .viewer_base
        .or(cfg.viewer_base)
        .unwrap_or_else(|| DEFAULT_VIEWER_BASE.to_string());
    validation::validate_http_url("viewer_base", &viewer_base)?;

    let swap_delay_ms = args
        .swap_delay
        .or(cfg.swap_delay_ms)
        .unwrap_or(DEFAULT_SWAP_DELAY.as_millis() as u64);
    if swap_delay_ms > validation::MAX_SWAP_DELAY_MS {
        return Err(format!(
            "invalid swap_delay_ms {swap_delay_ms}, expected at most {}ms",
            validation::MAX_SWAP_DELAY_MS
        ));
    }
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10).max(1);

    let output_path = args.output.or(cfg.output);
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output_format '{raw}', expected html, json or text"))?,
        None => output_path
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Html),
    };
    let menus = args.menus.or(cfg.menus).unwrap_or(false);

    Ok(RunConfig {
        source,
        api_url,
        viewer_base,
        swap_delay: Duration::from_millis(swap_delay_ms),
        timeout: Duration::from_secs(timeout),
        events: args.events,
        events_file: args.events_file,
        interactive: args.interactive,
        output: output_path,
        output_format,
        menus,
        no_color,
    })
}

fn parse_event(line: &str, origin: &str, line_no: usize) -> Result<Option<UiEvent>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    trimmed
        .parse::<UiEvent>()
        .map(Some)
        .map_err(|e| format!("invalid event '{trimmed}' ({origin}:{line_no}): {e}"))
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Navigated(view) => format!("navigated to {view}"),
        Outcome::Toggled { dropdown, open } => {
            format!("{dropdown:?} {}", if *open { "opened" } else { "closed" })
        }
        Outcome::Searched { term, matches } => format!("search '{term}' matched {matches}"),
        Outcome::DropdownsClosed => "dropdowns closed".to_string(),
        Outcome::Ignored => "ignored".to_string(),
    }
}

async fn read_script(path: &str) -> Result<Vec<UiEvent>, String> {
    let expanded: PathBuf = config::expand_tilde(path);
    let contents = tokio::fs::read_to_string(&expanded)
        .await
        .map_err(|e| format!("failed to read events file '{}': {e}", expanded.display()))?;
    let mut events = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        if let Some(event) = parse_event(line, path, idx + 1)? {
            events.push(event);
        }
    }
    Ok(events)
}

async fn fetch_catalog(run: &RunConfig) -> Result<std::sync::Arc<source::Catalog>, String> {
    let provider: Box<dyn DataSource> = match (run.source, run.api_url.as_deref()) {
        (SourceKind::Api, Some(url)) => Box::new(
            ApiSource::new(url, run.timeout)
                .map_err(|e| format!("failed to prepare specimen source: {e}"))?,
        ),
        _ => Box::new(StaticSource),
    };

    if run.source == SourceKind::Static {
        return Ok(source::load_catalog(provider.as_ref()).await);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} [{elapsed_precise}]")
            .map_err(|e| format!("failed to build spinner style: {e}"))?,
    );
    pb.set_message("fetching specimens");
    let catalog = source::load_catalog(provider.as_ref()).await;
    pb.finish_and_clear();
    Ok(catalog)
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();

    let catalog = fetch_catalog(&run).await?;
    let source_label = match (run.source, run.api_url.as_deref()) {
        (SourceKind::Api, Some(url)) => format!("api ({url})"),
        _ => "static".to_string(),
    };
    format_kv_line("Source", &source_label);
    format_kv_line("Specimens", &catalog.len().to_string());
    format_kv_line("Animals", &catalog.by_animal().len().to_string());
    format_kv_line("Bones", &catalog.by_bone().len().to_string());
    format_kv_line("Swap", &format!("{}ms", run.swap_delay.as_millis()));
    if catalog.is_empty() {
        eprintln!("{}", ":: no specimens to show".yellow());
    }

    let urls = ViewerUrls::new(&run.viewer_base);
    let swapper = ContentSwapper::new(run.swap_delay);
    let mut session = Session::new(catalog, urls.clone(), swapper.clone());
    session.start();
    swapper.settle().await;

    let mut script: Vec<UiEvent> = Vec::new();
    for (idx, raw) in run.events.iter().enumerate() {
        if let Some(event) = parse_event(raw, "--event", idx + 1)? {
            script.push(event);
        }
    }
    if let Some(path) = run.events_file.as_deref() {
        script.extend(read_script(path).await?);
    }
    for event in script {
        let outcome = session.dispatch(event);
        swapper.settle().await;
        format_kv_line("Event", &describe(&outcome));
    }

    if run.interactive {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut line_no = 0usize;
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| format!("failed to read stdin: {e}"))?
        {
            line_no += 1;
            let event = match parse_event(&line, "stdin", line_no) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    eprintln!("{}", e.as_str().red());
                    continue;
                }
            };
            let outcome = session.dispatch(event);
            swapper.settle().await;
            format_kv_line("Event", &describe(&outcome));
        }
    }

    format_kv_line("View", &session.current_view().to_string());

    let rendered = match run.output_format {
        OutputFormat::Html => {
            let menus = run.menus.then(|| session.menus());
            output::render_html(&swapper.html(), menus.as_deref())
        }
        OutputFormat::Json => output::render_json(&output::build_records(&session.displayed(), &urls)),
        OutputFormat::Text => output::render_text(&output::build_records(&session.displayed(), &urls)),
    };

    match run.output.as_deref() {
        Some(path) => {
            let path = config::expand_tilde(path);
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .await
                .map_err(|e| format!("failed to open output file '{}': {e}", path.display()))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output file '{}': {e}", path.display()))?;
            format_kv_line("Output", &path.display().to_string());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write output: {e}"))?;
        }
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                e.print()
                    .map_err(|err| format!("failed to print help: {err}"))?;
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose)?;

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine a home directory for the config file".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!(":: Config    : wrote {}", path.display());
        } else {
            println!(":: Config    : {} already exists", path.display());
        }
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
