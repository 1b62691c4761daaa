use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use fluidseed::{
    FeatureSelector, Options, RecordingOverlay, RecordingRenderer, RenderCall, SeedSource, Session,
};

#[derive(Parser, Debug)]
#[command(name = "fluidseed", version)]
struct Cli {
    /// Enable debug-level logging on stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the feature set a seed selects.
    Features(FeaturesArgs),
    /// Drive a headless session and print scheduler transitions.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
#[group(required = true, multiple = false)]
struct SeedArgs {
    /// Numeric seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Seed string, hashed to a numeric seed.
    #[arg(long)]
    hash: Option<String>,
}

impl SeedArgs {
    fn source(&self) -> SeedSource {
        match (&self.hash, self.seed) {
            (Some(h), _) => SeedSource::from_hash(h),
            (None, s) => SeedSource::new(s.unwrap_or_default()),
        }
    }
}

#[derive(Parser, Debug)]
struct FeaturesArgs {
    #[command(flatten)]
    seed: SeedArgs,

    /// Options JSON; missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    seed: SeedArgs,

    /// Options JSON; missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Milliseconds per tick.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Override the change budget.
    #[arg(long)]
    max_changes: Option<u32>,

    /// Print the final state as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Features(args) => cmd_features(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_options(path: Option<&Path>) -> anyhow::Result<Options> {
    let options = match path {
        Some(p) => Options::from_path(p)
            .with_context(|| format!("load options '{}'", p.display()))?,
        None => Options::default(),
    };
    options.validate().context("validate options")?;
    Ok(options)
}

fn cmd_features(args: FeaturesArgs) -> anyhow::Result<()> {
    let mut options = load_options(args.config.as_deref())?;
    let mut seed = args.seed.source();
    options.resolve_defaults(&mut seed);
    let features = FeatureSelector::select(&options, &mut seed)?;
    let snapshot = features.snapshot();
    let fingerprint = features.fingerprint().to_hex();

    if args.json {
        let out = serde_json::json!({
            "seed": seed.seed(),
            "features": snapshot,
            "fingerprint": fingerprint,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("seed         {}", seed.seed());
    println!("composition  {}", snapshot.composition);
    println!("palette      {}", snapshot.palette);
    println!("layers       {}", snapshot.layers);
    println!("color1       #{}", snapshot.color1);
    println!("color2       #{}", snapshot.color2);
    println!("colorW       {:.4}", snapshot.color_w);
    println!("fingerprint  {fingerprint}");
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut options = load_options(args.config.as_deref())?;
    if let Some(n) = args.max_changes {
        options.max_changes = Some(n);
    }
    let seed = args.seed.source();
    let seed_value = seed.seed();
    let mut session = Session::new(
        options,
        seed,
        RecordingRenderer::new(),
        RecordingOverlay::new(),
    )
    .context("start session")?;

    let mut log = Vec::new();
    for _ in 0..args.ticks {
        for t in session.advance(args.tick_ms)? {
            if !args.json {
                println!("{:>10} ms  {t:?}", session.clock().0);
            }
            log.push((session.clock().0, t));
        }
    }

    let state = session.run_state();
    let draws = session
        .renderer()
        .count(|c| matches!(c, RenderCall::Draw(..)));
    if args.json {
        let transitions: Vec<_> = log
            .iter()
            .map(|(at, t)| serde_json::json!({ "at": at, "transition": t }))
            .collect();
        let out = serde_json::json!({
            "seed": seed_value,
            "features": session.snapshot(),
            "transitions": transitions,
            "state": state,
            "frame": session.frame(),
            "layers": session.registry().len(),
            "drawCalls": draws,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "seed {seed_value}: {} changes, phase {:?}, paused {}, frame {}, {} layers, {} draw calls",
        state.change_count,
        state.phase,
        state.paused,
        session.frame(),
        session.registry().len(),
        draws
    );
    Ok(())
}
