use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vitrine", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single scene snapshot as a PNG.
    Frame(FrameArgs),
    /// Render a run of snapshots, one PNG per tick.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scene time to snapshot, in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Dispatch a heading click at `X,Y` before ticking.
    #[arg(long, value_parser = parse_point)]
    click: Option<(f64, f64)>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Run length in seconds.
    #[arg(long)]
    duration: f64,

    /// Ticks per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Dispatch a heading click at `X,Y` before ticking.
    #[arg(long, value_parser = parse_point)]
    click: Option<(f64, f64)>,

    /// Output directory for numbered PNGs.
    #[arg(long)]
    out_dir: PathBuf,
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'X,Y', got '{s}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<vitrine::Scene> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let r = BufReader::new(f);
    let scene: vitrine::Scene = serde_json::from_reader(r).with_context(|| "parse scene JSON")?;
    Ok(scene)
}

fn build_app(in_path: &Path, click: Option<(f64, f64)>) -> anyhow::Result<vitrine::App> {
    let scene = read_scene_json(in_path)?;
    scene.validate()?;

    let root = in_path.parent().unwrap_or_else(|| Path::new("."));
    let mut app = vitrine::App::new(scene, root)?;

    if let Some((x, y)) = click {
        app.dispatch(vitrine::Event::HeadingClicked {
            position: vitrine::Point::new(x, y),
        })?;
    }
    Ok(app)
}

fn write_png(frame: &vitrine::FrameRgba, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !args.at.is_finite() || args.at < 0.0 {
        anyhow::bail!("--at must be finite and >= 0");
    }

    let mut app = build_app(&args.in_path, args.click)?;

    // Fixed 60 Hz steps so snapshots are reproducible for a given time.
    let step = Duration::from_secs_f64(1.0 / 60.0);
    let ticks = (args.at * 60.0).round() as u64;
    for _ in 0..ticks {
        app.tick(step);
    }

    let frame = app.render_frame();
    write_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if !args.duration.is_finite() || args.duration <= 0.0 {
        anyhow::bail!("--duration must be finite and > 0");
    }
    if args.fps == 0 {
        anyhow::bail!("--fps must be > 0");
    }

    let mut app = build_app(&args.in_path, args.click)?;

    let step = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let ticks = (args.duration * f64::from(args.fps)).ceil() as u64;
    for i in 0..ticks {
        app.tick(step);
        let frame = app.render_frame();
        write_png(&frame, &args.out_dir.join(format!("frame_{i:05}.png")))?;
    }

    eprintln!("wrote {ticks} frames to {}", args.out_dir.display());
    Ok(())
}
