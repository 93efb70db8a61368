use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use complex_timeline::{
    BuildOutcome, Canvas, ComplexTimeline, PlaybackEvent, PlayerConfig, SimulatedSink,
    TimelineItem, TimelinePlayer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "complex-timeline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a canvas and print its keyframe stream as JSON.
    Keyframes(KeyframesArgs),
    /// Play a canvas headlessly against simulated sinks and print events as JSON lines.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct KeyframesArgs {
    /// Input canvas JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print the whole compiled timeline, items included.
    #[arg(long, default_value_t = false)]
    full: bool,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input canvas JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Player configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seek here (seconds) before playing.
    #[arg(long)]
    seek: Option<f64>,

    /// Stop once the clock passes this many seconds (defaults to the timeline duration).
    #[arg(long)]
    until: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Keyframes(args) => cmd_keyframes(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn load_timeline(path: &std::path::Path) -> anyhow::Result<ComplexTimeline> {
    let canvas = Canvas::from_path(path)?;
    match complex_timeline::build_timeline(&canvas) {
        BuildOutcome::Timeline(t) => Ok(t),
        BuildOutcome::Unsupported(u) => {
            anyhow::bail!("canvas '{}' cannot be played: {u}", path.display())
        }
    }
}

fn cmd_keyframes(args: KeyframesArgs) -> anyhow::Result<()> {
    let timeline = load_timeline(&args.in_path)?;
    let json = if args.full {
        serde_json::to_string_pretty(&timeline)
    } else {
        serde_json::to_string_pretty(timeline.keyframes())
    }
    .context("serialize keyframes")?;
    println!("{json}");
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let timeline = load_timeline(&args.in_path)?;
    let config = match &args.config {
        Some(p) => PlayerConfig::from_path(p)?,
        None => PlayerConfig::default(),
    };
    let frame = config.frame_interval();
    let frame_ms = frame.as_secs_f64() * 1000.0;

    let mut sims = Vec::new();
    let media: Vec<(String, f64)> = timeline
        .items()
        .iter()
        .filter_map(|item| match item {
            TimelineItem::Audio(m) | TimelineItem::Video(m) => {
                Some((m.annotation_id.clone(), m.duration))
            }
            _ => None,
        })
        .collect();
    let until = args.until.unwrap_or(timeline.duration());
    anyhow::ensure!(
        until.is_finite() && until >= 0.0,
        "--until must be a finite, non-negative number of seconds"
    );

    let mut player = TimelinePlayer::new(timeline, config)?;
    let events = player.subscribe();
    for (id, duration) in media {
        let sink = SimulatedSink::new().with_duration(duration);
        player.bind_sink(id, Box::new(sink.clone()));
        sims.push(sink);
    }

    if let Some(t) = args.seek {
        player.set_time(t);
    }
    player.play()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    // Simulated wall time needed to reach `until`, plus one second of slack.
    let budget = Duration::from_secs_f64((until - player.current_time()).max(0.0) + 1.0);
    let mut now = Duration::ZERO;
    player.pump(now);
    while now <= budget {
        for ev in events.try_iter() {
            emit_event(&mut out, ev, player.current_time())?;
        }
        if !player.is_playing() || player.current_time() > until {
            break;
        }
        now += frame;
        for sim in &sims {
            sim.advance(frame_ms);
        }
        player.pump(now);
    }
    for ev in events.try_iter() {
        emit_event(&mut out, ev, player.current_time())?;
    }

    let snapshot =
        serde_json::to_string(&player.snapshot()).context("serialize playback snapshot")?;
    writeln!(out, "{snapshot}").context("write snapshot")?;
    player.teardown();
    Ok(())
}

fn emit_event(out: &mut impl std::io::Write, ev: PlaybackEvent, at: f64) -> anyhow::Result<()> {
    let line = serde_json::json!({ "time": at, "event": ev });
    writeln!(out, "{line}").context("write event")
}
