use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use omniselect_core::{AsyncSelect, DiskStore, LoadOutcome, SelectConfig, SelectOption};

mod source;

use source::SourceSettings;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "omniselect",
    about = "Search-driven select with asynchronous option loading",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting OMNISELECT_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use instead of ~/.config/omniselect/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate typing: one input value per keystroke, e.g. `c ca caf`.
    Type {
        #[arg(required = true)]
        keystrokes: Vec<String>,
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Interactive session: each stdin line is an input.
    /// `:more` loads the next page, `:pick N` selects, `:props` reprints,
    /// `:stats` shows cache statistics, `:quit` exits.
    Repl {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// JSON file of options, or an http(s):// endpoint.
    #[arg(long)]
    source: String,
    /// Page size for file sources.
    #[arg(long)]
    page_size: Option<usize>,
    /// Simulated response delay for file sources, in milliseconds.
    #[arg(long)]
    latency_ms: Option<u64>,
    /// Accumulate pages of the same query.
    #[arg(long)]
    pagination: bool,
    /// Allow several selected options.
    #[arg(long)]
    multi: bool,
    /// Keep results in the on-disk cache across runs.
    #[arg(long)]
    disk_cache: bool,
}

// ─── Config Actions ──────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective config.
    Show,
    /// Write the default config file.
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path.
    Path,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let json_output = cli.json || std::env::var("OMNISELECT_JSON").as_deref() == Ok("1");
    let config_path = cli.config.unwrap_or_else(SelectConfig::config_path);

    match cli.command {
        Commands::Type { keystrokes, source } => {
            let mut select = build_select(&source, &config_path)?;
            run_type(&mut select, &keystrokes, json_output).await?;
        }

        Commands::Repl { source } => {
            let mut select = build_select(&source, &config_path)?;
            run_repl(&mut select, json_output).await?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = SelectConfig::load_from(&config_path)?;
                if json_output {
                    print_json(&serde_json::json!({
                        "status": "ok",
                        "data": { "path": config_path, "config": config },
                    }))?;
                } else {
                    print!("{}", config.to_toml_string()?);
                }
            }

            ConfigAction::Init { force } => {
                if config_path.exists() && !force {
                    bail!(
                        "config already exists at {}; pass --force to overwrite",
                        config_path.display()
                    );
                }
                SelectConfig::default().save_to(&config_path)?;
                if json_output {
                    print_json(&serde_json::json!({
                        "status": "ok",
                        "data": { "written": config_path },
                    }))?;
                } else {
                    println!("Wrote default config to {}", config_path.display());
                }
            }

            ConfigAction::Path => {
                if json_output {
                    print_json(&serde_json::json!({
                        "status": "ok",
                        "data": { "path": config_path, "exists": config_path.exists() },
                    }))?;
                } else {
                    println!("{}", config_path.display());
                }
            }
        },
    }

    Ok(())
}

// ─── Commands ────────────────────────────────────────────────────────────────

async fn run_type(
    select: &mut AsyncSelect<SelectOption>,
    keystrokes: &[String],
    json_output: bool,
) -> Result<()> {
    let start = Instant::now();
    let mut tasks = Vec::new();
    let mut frames = Vec::new();

    if let Some(task) = select.mount() {
        tasks.push(task);
    }
    // Issue every keystroke before awaiting anything, as fast typing would.
    for input in keystrokes {
        let (_, task) = select.on_input_change(input);
        tasks.push(task);
        if json_output {
            frames.push(props_json(select));
        } else {
            print_props(select);
        }
    }

    let outcomes = futures::future::join_all(tasks).await;
    let (hits, misses) = select.controller().cache_stats();

    if json_output {
        let outcomes: Vec<_> = outcomes.into_iter().map(outcome_name).collect();
        print_json(&serde_json::json!({
            "status": "ok",
            "data": {
                "frames": frames,
                "final": props_json(select),
                "outcomes": outcomes,
                "cache": { "hits": hits, "misses": misses },
            },
            "meta": { "duration_ms": start.elapsed().as_millis() }
        }))?;
    } else {
        println!("── settled ──");
        print_props(select);
    }
    Ok(())
}

async fn run_repl(select: &mut AsyncSelect<SelectOption>, json_output: bool) -> Result<()> {
    if let Some(task) = select.mount() {
        task.await;
        emit(select, json_output)?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Props => emit(select, json_output)?,
            ReplCommand::Stats => {
                let (hits, misses) = select.controller().cache_stats();
                println!("cache: {hits} hits, {misses} misses");
            }
            ReplCommand::More => match select.on_menu_scroll_to_bottom() {
                Some(task) => {
                    task.await;
                    emit(select, json_output)?;
                }
                None => eprintln!("nothing to load (pagination off or a load is running)"),
            },
            ReplCommand::Pick(n) => match pick(select, n) {
                Ok(()) => {
                    let labels: Vec<_> = select
                        .value()
                        .unwrap_or_default()
                        .iter()
                        .map(|o| o.label.as_str())
                        .collect();
                    println!("selected: {}", labels.join(", "));
                }
                Err(e) => eprintln!("{e}"),
            },
            ReplCommand::Input(text) => {
                let (_, task) = select.on_input_change(&text);
                task.await;
                emit(select, json_output)?;
            }
            ReplCommand::Unknown(cmd) => eprintln!("unknown command: {cmd}"),
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum ReplCommand {
    Quit,
    Props,
    Stats,
    More,
    Pick(usize),
    Input(String),
    Unknown(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let Some(cmd) = line.strip_prefix(':') else {
            return Self::Input(line.to_string());
        };
        let mut parts = cmd.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("quit" | "q"), None) => Self::Quit,
            (Some("props"), None) => Self::Props,
            (Some("stats"), None) => Self::Stats,
            (Some("more"), None) => Self::More,
            (Some("pick"), Some(n)) => match n.parse() {
                Ok(n) => Self::Pick(n),
                Err(_) => Self::Unknown(line.to_string()),
            },
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Select the `n`th visible option (1-based).
fn pick(select: &mut AsyncSelect<SelectOption>, n: usize) -> Result<()> {
    let options = select.props().options;
    let Some(choice) = n.checked_sub(1).and_then(|i| options.get(i)).cloned() else {
        bail!("no option #{n} ({} shown)", options.len());
    };

    let next = if select.config().multi {
        let mut values = select.value().map(<[_]>::to_vec).unwrap_or_default();
        values.push(choice);
        values
    } else {
        vec![choice]
    };
    select.on_change(next);
    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_select(args: &SourceArgs, config_path: &Path) -> Result<AsyncSelect<SelectOption>> {
    let mut config = SelectConfig::load_from(config_path)?;
    if args.pagination {
        config.pagination = true;
    }
    if args.multi {
        config.multi = true;
    }

    let settings = SourceSettings {
        page_size: args.page_size,
        latency: args.latency_ms.map(Duration::from_millis),
        normalize: config.normalize_options(),
    };
    let provider = source::open(&args.source, &settings)?;

    let select = if args.disk_cache && config.cache.enabled {
        let store = DiskStore::new(&source::cache_namespace(&args.source))?;
        tracing::debug!(dir = %store.dir().display(), "using disk cache");
        AsyncSelect::with_store(provider, config, store)
    } else {
        AsyncSelect::new(provider, config)
    };

    Ok(select.with_on_change(|values: &[SelectOption]| {
        tracing::info!(count = values.len(), "selection changed");
    }))
}

fn outcome_name(outcome: LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Cached => "cached",
        LoadOutcome::Applied => "applied",
        LoadOutcome::Superseded => "superseded",
    }
}

fn props_json(select: &AsyncSelect<SelectOption>) -> serde_json::Value {
    let props = select.props();
    serde_json::json!({
        "input": select.input(),
        "query": select.query(),
        "placeholder": props.placeholder,
        "is_loading": props.is_loading,
        "options": props.options,
        "no_results_text": props.no_results_text,
        "error": props.error.map(|e| e.to_string()),
    })
}

fn print_props(select: &AsyncSelect<SelectOption>) {
    let props = select.props();
    let busy = if props.is_loading { " …" } else { "" };
    println!("> {:<24} [{}]{busy}", select.input(), props.placeholder);
    if props.options.is_empty() {
        println!("    {}", props.no_results_text);
    }
    for (i, option) in props.options.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, option.label);
    }
    if let Some(e) = &props.error {
        println!("    ! {e}");
    }
}

fn emit(select: &AsyncSelect<SelectOption>, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string(&props_json(select))?);
    } else {
        print_props(select);
    }
    Ok(())
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
