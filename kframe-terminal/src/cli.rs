/// Command-line arguments for the terminal frontend

use std::path::PathBuf;

use clap::Parser;
use kframe_core::{ProjectionMode, SimulationConfig};
use log::LevelFilter;
use nalgebra::Vector3;

const DEFAULT_LOG_FILE: &str = "kframe-terminal.log";

/// Where log records are written while the interface owns the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    File(PathBuf),
    Stderr,
}

#[derive(Debug, Parser)]
#[command(name = "kframe-terminal")]
#[command(about = "Record two poses of a wireframe object and play the motion between them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Wireframe to load (OBJ subset: `v` and `f` lines); a cube when omitted
    #[arg(long, value_name = "FILE")]
    pub mesh: Option<PathBuf>,

    /// Projection method: perspective or orthographic
    #[arg(long, default_value = "perspective")]
    pub projection: ProjectionMode,

    /// Camera location as x,y,z
    #[arg(long, value_name = "X,Y,Z", default_value = "400,400,-100", value_parser = parse_vector, allow_hyphen_values = true)]
    pub camera: Vector3<f64>,

    /// Object center as x,y,z
    #[arg(long, value_name = "X,Y,Z", default_value = "300,300,300", value_parser = parse_vector, allow_hyphen_values = true)]
    pub center: Vector3<f64>,

    /// Half of the cube's edge length
    #[arg(long, default_value_t = 50.0)]
    pub half_extent: f64,

    /// Logical screen width that projected points are laid out in
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Logical screen height that projected points are laid out in
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Degrees turned per rotation key press
    #[arg(long, default_value_t = 2.25)]
    pub rotation_step: f64,

    /// Distance moved per translation key press
    #[arg(long, default_value_t = 5.0)]
    pub translation_step: f64,

    /// Playback frames per second
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Interpolated frames per playback, both keyframes included
    #[arg(long, default_value_t = 60)]
    pub frames: usize,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs here; defaults to a file in the temp directory when stderr
    /// is the terminal being drawn on
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn config(&self) -> SimulationConfig {
        SimulationConfig {
            screen_width: self.width,
            screen_height: self.height,
            camera: self.camera,
            rotation_step: self.rotation_step.to_radians(),
            translation_step: self.translation_step,
            frame_rate: self.fps,
            number_of_frames: self.frames,
            projection: self.projection,
            center: self.center,
            half_extents: Vector3::repeat(self.half_extent),
            ..Default::default()
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        verbosity_filter(self.verbose)
    }

    /// Logs may only go to stderr when it is not the screen being drawn on
    pub fn log_destination(&self, stderr_is_terminal: bool) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::File(path.clone()),
            None if stderr_is_terminal => {
                LogDestination::File(std::env::temp_dir().join(DEFAULT_LOG_FILE))
            }
            None => LogDestination::Stderr,
        }
    }
}

/// Log filter for a `-v` count
pub fn verbosity_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn parse_vector(s: &str) -> Result<Vector3<f64>, String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in '{s}': {e}"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(format!("expected three comma-separated values, got '{s}'")),
    }
}
