/// Simulation settings handed to the core by the host program
use std::f64::consts::PI;
use std::time::Duration;

use nalgebra::Vector3;

use crate::error::{Error, Result};
use crate::projection::{ProjectionMode, Projector};

/// Every tunable of a simulation session. The core never reads these from
/// files or the environment; the host fills them in.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub camera: Vector3<f64>,
    /// Radians per rotation step
    pub rotation_step: f64,
    /// World units per translation step
    pub translation_step: f64,
    pub scale_down: f64,
    pub scale_up: f64,
    pub frame_rate: u32,
    /// Interpolated frames per playback, endpoints included
    pub number_of_frames: usize,
    pub projection: ProjectionMode,
    pub center: Vector3<f64>,
    pub half_extents: Vector3<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 800,
            camera: Vector3::new(400.0, 400.0, -100.0),
            rotation_step: PI / 80.0,
            translation_step: 5.0,
            scale_down: 0.9,
            scale_up: 1.1,
            frame_rate: 30,
            number_of_frames: 60,
            projection: ProjectionMode::Perspective,
            center: Vector3::new(300.0, 300.0, 300.0),
            half_extents: Vector3::new(50.0, 50.0, 50.0),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "screen must have a non-zero size, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.frame_rate == 0 {
            return Err(Error::InvalidConfig("frame rate must be positive".to_string()));
        }
        for factor in [self.scale_down, self.scale_up] {
            if factor.is_nan() || factor <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "scale factors must be positive, got {factor}"
                )));
            }
        }
        if self.half_extents.iter().any(|h| !h.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "half extents must be finite, got {:?}",
                self.half_extents
            )));
        }
        Ok(())
    }

    /// Time each playback frame stays on screen
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }

    pub fn projector(&self) -> Projector {
        Projector::new(self.projection, self.camera)
    }
}
