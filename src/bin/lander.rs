use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lander", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the intro storyboard as JSON.
    Storyboard(StoryboardArgs),
    /// Play the intro to the end and print every dispatched event.
    Trace(PlayArgs),
    /// Print the scene at one point in time.
    Frame(FrameArgs),
    /// Write one scene snapshot per frame.
    Frames(FramesArgs),
}

#[derive(Args, Debug)]
struct Common {
    /// Intro config JSON (defaults apply to every missing field).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the image sampler; overrides the config.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct StoryboardArgs {
    #[command(flatten)]
    common: Common,

    /// Project records JSON; the lists stay empty without it.
    #[arg(long)]
    projects: Option<PathBuf>,

    /// Output path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    common: Common,

    /// Project records JSON.
    #[arg(long)]
    projects: PathBuf,

    /// Output path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    play: PlayArgs,

    /// Time in seconds.
    #[arg(long)]
    at: f64,
}

#[derive(Args, Debug)]
struct FramesArgs {
    #[command(flatten)]
    common: Common,

    /// Project records JSON.
    #[arg(long)]
    projects: PathBuf,

    /// Frame rate, `30` or `30000/1001`.
    #[arg(long, default_value = "30")]
    fps: String,

    /// Output directory, one `frame_NNNNN.json` per frame (stdout array when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct FrameDump {
    frame: u64,
    at: f64,
    scene: lander::TreeSnapshot,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Storyboard(args) => cmd_storyboard(args),
        Command::Trace(args) => cmd_trace(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn load_config(common: &Common) -> anyhow::Result<lander::IntroConfig> {
    let mut cfg = match &common.config {
        Some(path) => lander::IntroConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => lander::IntroConfig::default(),
    };
    if common.seed.is_some() {
        cfg.seed = common.seed;
    }
    Ok(cfg)
}

fn start(
    cfg: &lander::IntroConfig,
    projects: Option<&Path>,
) -> anyhow::Result<lander::IntroSession> {
    let records = match projects {
        Some(path) => lander::load_projects(path)
            .with_context(|| format!("load projects '{}'", path.display()))?,
        None => Vec::new(),
    };
    let tree = lander::standard_page(&cfg.page)?;
    Ok(lander::IntroSession::start(cfg, &records, tree)?)
}

fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_storyboard(args: StoryboardArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.common)?;
    let session = start(&cfg, args.projects.as_deref())?;
    emit(session.storyboard(), args.out.as_deref())
}

fn cmd_trace(args: PlayArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.common)?;
    let mut session = start(&cfg, Some(args.projects.as_path()))?;
    let end = session.run_to_end()?;
    tracing::info!(end, events = session.trace().len(), "intro finished");
    emit(session.trace(), args.out.as_deref())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.play.common)?;
    let mut session = start(&cfg, Some(args.play.projects.as_path()))?;
    session
        .advance_to(args.at)
        .with_context(|| format!("advance to {}s", args.at))?;
    emit(&session.tree().snapshot(), args.play.out.as_deref())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let fps = lander::Fps::parse(&args.fps).with_context(|| format!("parse fps '{}'", args.fps))?;
    let mut cfg = load_config(&args.common)?;
    // Both passes must draw the same images.
    cfg.seed = Some(cfg.seed.unwrap_or_else(rand::random));

    let end = start(&cfg, Some(args.projects.as_path()))?.run_to_end()?;
    let frames = fps.secs_to_frames_ceil(end) + 1;

    let mut session = start(&cfg, Some(args.projects.as_path()))?;
    let mut dumps = Vec::new();
    for i in 0..frames {
        let frame = lander::FrameIndex(i);
        let at = fps.frame_time_secs(frame);
        session.advance_to(at)?;
        let dump = FrameDump {
            frame: i,
            at,
            scene: session.tree().snapshot(),
        };
        match &args.out {
            Some(dir) => {
                let path = dir.join(format!("frame_{i:05}.json"));
                let json = serde_json::to_string(&dump)?;
                if i == 0 {
                    std::fs::create_dir_all(dir)
                        .with_context(|| format!("create output dir '{}'", dir.display()))?;
                }
                std::fs::write(&path, json)
                    .with_context(|| format!("write '{}'", path.display()))?;
            }
            None => dumps.push(dump),
        }
    }

    match &args.out {
        Some(dir) => eprintln!("wrote {frames} frames to {}", dir.display()),
        None => emit(&dumps, None)?,
    }
    Ok(())
}
