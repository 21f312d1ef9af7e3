use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use longview_core::gesture::{Gesture, PointerEvent, PointerKind};
use longview_core::io::FileSource;
use longview_core::render::RasterSurface;
use longview_core::{LongImageView, ViewerConfig};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Args)]
pub struct ReplayArgs {
    /// Input image file
    pub file: PathBuf,

    /// View size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_view_size)]
    pub view: (u32, u32),

    /// Session script (TOML); defaults to a single downward fling
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Animation frame interval in milliseconds
    #[arg(long, default_value = "16")]
    pub frame_ms: u64,

    /// Directory that receives one PNG per redrawn frame
    #[arg(short, long)]
    pub out: PathBuf,
}

/// A recorded input session.
#[derive(Debug, Default, Deserialize)]
pub struct Session {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Down,
    Drag { dx: f32, dy: f32 },
    Pinch { factor: f32 },
    DoubleTap,
    Fling { vx: f32, vy: f32 },
    Up,
    /// Raw pointer sample, routed through gesture recognition.
    Pointer {
        #[serde(default)]
        id: u32,
        kind: PointerAction,
        x: f32,
        y: f32,
        time_ms: u64,
    },
    /// Advance the animation clock by `count` frames.
    Tick {
        #[serde(default = "default_tick_count")]
        count: u32,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
}

fn default_tick_count() -> u32 {
    1
}

impl From<PointerAction> for PointerKind {
    fn from(action: PointerAction) -> Self {
        match action {
            PointerAction::Down => PointerKind::Down,
            PointerAction::Move => PointerKind::Move,
            PointerAction::Up => PointerKind::Up,
            PointerAction::Cancel => PointerKind::Cancel,
        }
    }
}

impl Session {
    fn default_fling() -> Self {
        Self {
            steps: vec![
                Step::Down,
                Step::Fling {
                    vx: 0.0,
                    vy: -3000.0,
                },
                Step::Up,
                Step::Tick { count: 120 },
            ],
        }
    }

    /// Progress units: one per step, one per animation frame.
    fn work(&self) -> u64 {
        self.steps
            .iter()
            .map(|s| match s {
                Step::Tick { count } => *count as u64,
                _ => 1,
            })
            .sum()
    }
}

fn parse_view_size(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    if w == 0 || h == 0 {
        return Err("view size must be non-zero".into());
    }
    Ok((w, h))
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).context("Invalid viewer config")
}

fn load_session(path: Option<&Path>) -> Result<Session> {
    let Some(path) = path else {
        return Ok(Session::default_fling());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    toml::from_str(&contents).context("Invalid session script")
}

/// Writes a frame every time the view asks for a redraw.
struct FrameWriter<'a> {
    dir: &'a Path,
    surface: RasterSurface,
    written: usize,
}

impl FrameWriter<'_> {
    fn draw(&mut self, view: &mut LongImageView) -> Result<()> {
        if !view.draw(&mut self.surface)? {
            return Ok(());
        }
        let path = self.dir.join(format!("frame_{:05}.png", self.written));
        self.surface
            .save_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(frame = self.written, path = %path.display(), "Frame written");
        self.written += 1;
        Ok(())
    }
}

/// What a replay produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    pub frames_written: usize,
    pub allocations: u64,
    pub reuses: u64,
}

pub fn run(args: &ReplayArgs) -> Result<()> {
    let report = replay(args)?;

    let label = Style::new().dim();
    let value = Style::new().bold().white();
    let path = Style::new().underlined();
    println!();
    println!(
        "  {:<14}{}",
        label.apply_to("Frames"),
        value.apply_to(report.frames_written)
    );
    println!(
        "  {:<14}{} allocated, {} reused",
        label.apply_to("Buffers"),
        value.apply_to(report.allocations),
        value.apply_to(report.reuses)
    );
    println!(
        "  {:<14}{}",
        label.apply_to("Output"),
        path.apply_to(args.out.display())
    );
    Ok(())
}

pub fn replay(args: &ReplayArgs) -> Result<ReplayReport> {
    let config = load_config(args.config.as_deref())?;
    let session = load_session(args.script.as_deref())?;
    if args.frame_ms == 0 {
        bail!("frame interval must be at least 1 ms");
    }
    let frame = Duration::from_millis(args.frame_ms);

    let source = FileSource::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let mut view = LongImageView::new(config)?;
    view.set_image(&source)?;
    let (width, height) = args.view;
    if view.take_layout_request() {
        view.on_layout(width, height)?;
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;
    let mut writer = FrameWriter {
        dir: &args.out,
        surface: RasterSurface::new(width, height),
        written: 0,
    };
    info!(steps = session.steps.len(), width, height, "Replaying session");

    let pb = ProgressBar::new(session.work());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:12} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    pb.set_message("Layout");
    writer.draw(&mut view)?;

    for step in &session.steps {
        match *step {
            Step::Tick { count } => {
                pb.set_message("Animating");
                for _ in 0..count {
                    if view.on_animation_frame(frame) {
                        writer.draw(&mut view)?;
                    }
                    pb.inc(1);
                }
                continue;
            }
            Step::Pointer {
                id,
                kind,
                x,
                y,
                time_ms,
            } => {
                pb.set_message("Pointer");
                view.on_pointer(PointerEvent::new(id, kind.into(), x, y, time_ms));
            }
            _ => {
                if let Some(gesture) = to_gesture(step) {
                    pb.set_message("Gesture");
                    view.on_gesture(gesture);
                }
            }
        }
        if view.take_redraw_request() {
            writer.draw(&mut view)?;
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    let stats = view.decode_stats();
    Ok(ReplayReport {
        frames_written: writer.written,
        allocations: stats.allocations,
        reuses: stats.reuses,
    })
}

fn to_gesture(step: &Step) -> Option<Gesture> {
    let gesture = match *step {
        Step::Down => Gesture::Down,
        Step::Drag { dx, dy } => Gesture::Drag { dx, dy },
        Step::Pinch { factor } => Gesture::Pinch {
            scale_factor: factor,
        },
        Step::DoubleTap => Gesture::DoubleTap,
        Step::Fling { vx, vy } => Gesture::Fling {
            velocity_x: vx,
            velocity_y: vy,
        },
        Step::Up => Gesture::Up,
        Step::Pointer { .. } | Step::Tick { .. } => return None,
    };
    Some(gesture)
}
