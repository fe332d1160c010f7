use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scrollmap", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a story and try loading every layer.
    Validate(ValidateArgs),
    /// Replay driver events and print the resulting surface calls as JSON lines.
    Trace(TraceArgs),
    /// Render the map as it looks after entering a step, as a PNG.
    Snapshot(SnapshotArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input story JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Input story JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// JSON array of driver events.
    #[arg(long)]
    events: PathBuf,

    /// Do not run pending fades after the last event.
    #[arg(long)]
    no_settle: bool,
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    /// Input story JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Step index (0-based).
    #[arg(long)]
    step: usize,

    /// Scroll progress within the step.
    #[arg(long, default_value_t = 1.0)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Background color as `#rrggbb`.
    #[arg(long)]
    background: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Trace(args) => cmd_trace(args),
        Command::Snapshot(args) => cmd_snapshot(args),
    }
}

fn read_story(path: &Path) -> anyhow::Result<scrollmap::StoryConfig> {
    scrollmap::StoryConfig::from_path(path)
        .with_context(|| format!("load story '{}'", path.display()))
}

fn story_root(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn load_narrative<S: scrollmap::MapSurface>(
    path: &Path,
    surface: S,
) -> anyhow::Result<scrollmap::Narrative<S>> {
    let story = read_story(path)?;
    let fetcher = scrollmap::FsFetcher::new(story_root(path));
    futures::executor::block_on(scrollmap::Narrative::load(story, &fetcher, surface))
        .with_context(|| format!("validate story '{}'", path.display()))
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let narrative = load_narrative(&args.in_path, scrollmap::RecordingSurface::new())?;
    let registry = narrative.registry();
    for (name, reason) in registry.failures() {
        println!("unavailable: {name}: {reason}");
    }
    println!(
        "ok: {} layers loaded, {} unavailable, {} steps",
        registry.len(),
        registry.failures().count(),
        narrative.story().steps.len()
    );
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let mut narrative = load_narrative(&args.in_path, scrollmap::RecordingSurface::new())?;

    let f = File::open(&args.events)
        .with_context(|| format!("open events '{}'", args.events.display()))?;
    let events: Vec<scrollmap::DriverEvent> =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse events JSON")?;

    let mut last = scrollmap::Millis::ZERO;
    for event in &events {
        anyhow::ensure!(
            event.at() >= last,
            "event timestamps must be non-decreasing ({} after {})",
            event.at().0,
            last.0
        );
        last = event.at();
        narrative.dispatch(event);
    }
    if !args.no_settle {
        narrative.settle();
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for call in narrative.surface().calls() {
        serde_json::to_writer(&mut out, call).context("write trace line")?;
        out.write_all(b"\n").context("write trace line")?;
    }
    Ok(())
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let mut narrative = load_narrative(&args.in_path, scrollmap::SceneSurface::new())?;
    anyhow::ensure!(
        args.step < narrative.story().steps.len(),
        "step {} out of range (story has {} steps)",
        args.step,
        narrative.story().steps.len()
    );

    narrative.on_step_enter(scrollmap::Millis::ZERO, args.step);
    let at = narrative.settle();
    narrative.on_step_progress(at, args.step, args.progress);

    let mut opts = scrollmap::SnapshotOpts {
        width: args.width,
        height: args.height,
        resources_dir: Some(story_root(&args.in_path).to_path_buf()),
        ..Default::default()
    };
    if let Some(bg) = &args.background {
        opts.background = scrollmap::Rgba8::from_hex(bg)?;
    }

    let img = scrollmap::render_snapshot(narrative.surface(), &opts)?;
    img.save(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    tracing::info!(out = %args.out.display(), "snapshot written");
    Ok(())
}
