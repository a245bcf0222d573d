use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "storyreel", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a storyboard JSON into a Manim scene script.
    Generate(GenerateArgs),
    /// Synthesize narration audio per segment (requires `edge-tts` and `ffprobe` on PATH).
    Narrate(NarrateArgs),
    /// Fit rendered clips to their narration and join them (requires `ffmpeg` on PATH).
    Mux(MuxArgs),
    /// Copy persona files into a repository and open a pull request (requires `git` and `gh`).
    Sync(SyncArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Input storyboard JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output Python script.
    #[arg(long)]
    out: PathBuf,

    /// Scene class name.
    #[arg(long)]
    scene_name: Option<String>,

    /// Font family for all text.
    #[arg(long)]
    font: Option<String>,

    /// JSON object of narration seconds by segment id, as written by `narrate --durations-out`.
    #[arg(long)]
    durations: Option<PathBuf>,

    /// Also write the diagnostics as a JSON array to this path.
    #[arg(long)]
    diagnostics_json: Option<PathBuf>,

    /// Exit with an error when any segment degraded.
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct NarrateArgs {
    /// Narration list `[{id, text}]` or a storyboard JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `<id>.mp3` files.
    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long, default_value = storyreel::DEFAULT_VOICE)]
    voice: String,

    /// Speaking rate such as `+10%` or `-5%`.
    #[arg(long, default_value = storyreel::DEFAULT_RATE, allow_hyphen_values = true)]
    rate: String,

    /// Skip writing `combined.mp3`.
    #[arg(long)]
    no_combined: bool,

    /// Write measured durations as JSON for `generate --durations`.
    #[arg(long)]
    durations_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MuxArgs {
    /// Mux manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SyncArgs {
    /// Sync configuration TOML.
    #[arg(long)]
    config: PathBuf,

    /// Show what would be copied without changing anything.
    #[arg(long)]
    dry_run: bool,

    /// Open the pull request but don't merge it.
    #[arg(long)]
    no_merge: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Narrate(args) => cmd_narrate(args),
        Command::Mux(args) => cmd_mux(args),
        Command::Sync(args) => cmd_sync(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_durations(path: &Path) -> anyhow::Result<BTreeMap<String, f64>> {
    let f = File::open(path).with_context(|| format!("open durations '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| "parse durations JSON")
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut storyboard = storyreel::Storyboard::from_path(&args.in_path)?;
    if let Some(path) = &args.durations {
        let durations = read_durations(path)?;
        let n = storyboard.apply_durations(durations.iter().map(|(k, v)| (k.as_str(), *v)));
        tracing::info!(segments = n, "applied narration durations");
    }

    let mut opts = storyreel::GeneratorOpts::default();
    if let Some(name) = args.scene_name {
        opts.scene_name = name;
    }
    if let Some(font) = args.font {
        opts.font = font;
    }

    let script = storyreel::generate(&storyboard, &opts)?;
    storyreel::write_script(&args.out, &script.source)?;

    for d in &script.diagnostics {
        eprintln!("  [{}] {:?}: {}", d.segment, d.kind, d.message);
    }
    if let Some(path) = &args.diagnostics_json {
        let json = serde_json::to_string_pretty(&script.diagnostics)?;
        std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))?;
    }
    eprintln!(
        "wrote {} ({} segments, {} diagnostics)",
        args.out.display(),
        script.segments.len(),
        script.diagnostics.len()
    );
    if args.strict && !script.diagnostics.is_empty() {
        anyhow::bail!("{} segment(s) degraded", script.diagnostics.len());
    }
    Ok(())
}

fn cmd_narrate(args: NarrateArgs) -> anyhow::Result<()> {
    let items = storyreel::load_narration_items(&args.in_path)?;
    let opts = storyreel::NarrationOpts {
        voice: args.voice,
        rate: args.rate,
        combined: !args.no_combined,
    };
    let report = storyreel::narrate(
        &storyreel::EdgeTts::default(),
        &items,
        &args.out_dir,
        &opts,
    )?;

    for (id, secs) in report.durations() {
        eprintln!("  {id}.mp3: {secs:.2}s");
    }
    if let Some(path) = &args.durations_out {
        let map: BTreeMap<&str, f64> = report.durations().collect();
        let json = serde_json::to_string_pretty(&map)?;
        std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))?;
    }
    eprintln!(
        "narrated {} item(s), {:.1}s total",
        report.items.len(),
        report.total_secs()
    );
    Ok(())
}

fn cmd_mux(args: MuxArgs) -> anyhow::Result<()> {
    let manifest = storyreel::MuxManifest::from_path(&args.manifest)?;
    let report = storyreel::mux(&manifest, &args.out)?;
    eprintln!("wrote {}", report.output.display());
    if let Some(final_out) = &report.final_output {
        eprintln!("wrote {}", final_out.display());
    }
    Ok(())
}

fn cmd_sync(args: SyncArgs) -> anyhow::Result<()> {
    let cfg = storyreel::SyncConfig::from_path(&args.config)?;
    let opts = storyreel::SyncOpts {
        dry_run: args.dry_run,
        no_merge: args.no_merge,
    };
    let now = chrono::Local::now().naive_local();
    let report = storyreel::sync(&cfg, opts, &storyreel::SystemRunner, now)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
