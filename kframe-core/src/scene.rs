/// The rigid object being manipulated and the commands that drive it

use log::{debug, info};
use nalgebra::Vector3;

use crate::animation::{AnimationController, Frame, Pose, Renderer};
use crate::config::SimulationConfig;
use crate::coordinates::local_coordinates;
use crate::error::Result;
use crate::geometry::{Face, VertexSet, Wireframe};
use crate::projection::Projector;
use crate::quaternion::{update_orientation, Quaternion};
use crate::transform::{self, Axis};

/// The single rigid object of a session.
///
/// Direct manipulation edits `vertices` in place and tracks `orientation`
/// and `center` alongside. Playback instead rebuilds `vertices` from
/// `reference_vertices`. The two are not re-synchronized, so editing
/// `vertices` by hand makes them drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub center: Vector3<f64>,
    pub vertices: VertexSet,
    /// Vertex positions relative to `center` at identity orientation
    pub reference_vertices: VertexSet,
    pub orientation: Quaternion,
    pub faces: Vec<Face>,
}

impl SceneObject {
    /// Wrap a wireframe whose current orientation is taken as identity
    pub fn new(wireframe: Wireframe, center: Vector3<f64>) -> Result<Self> {
        wireframe.validate()?;
        let mut reference_vertices = vec![Vector3::zeros(); wireframe.vertices.len()];
        local_coordinates(&mut reference_vertices, &wireframe.vertices, &center)?;

        Ok(Self {
            center,
            vertices: wireframe.vertices,
            reference_vertices,
            orientation: Quaternion::identity(),
            faces: wireframe.faces,
        })
    }

    pub fn cuboid(center: &Vector3<f64>, half_width: f64, half_height: f64, half_depth: f64) -> Self {
        let Wireframe { vertices, faces } =
            Wireframe::cuboid(center, half_width, half_height, half_depth);
        let reference_vertices = vertices.iter().map(|v| v - center).collect();

        Self {
            center: *center,
            vertices,
            reference_vertices,
            orientation: Quaternion::identity(),
            faces,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.orientation, self.center)
    }

    /// Rotate about the object's own center and fold the same rotation into
    /// `orientation`
    pub fn rotate(&mut self, axis: Axis, angle: f64) {
        transform::rotate_about_axis(&self.center, &mut self.vertices, angle, axis);
        self.orientation = update_orientation(&self.orientation, angle, &axis.unit());
    }

    pub fn translate(&mut self, axis: usize, step: f64) -> Result<()> {
        transform::translate(&mut self.center, &mut self.vertices, step, axis)
    }

    /// Scale about the center. The reference vertices are scaled too so that
    /// playback keeps the current size.
    pub fn scale(&mut self, factor: f64) -> Result<()> {
        transform::uniform_scale(&self.center, &mut self.vertices, factor)?;
        transform::uniform_scale(&Vector3::zeros(), &mut self.reference_vertices, factor)
    }

    /// Make a playback frame the live pose
    pub fn apply_frame(&mut self, frame: Frame) {
        self.orientation = frame.orientation;
        self.center = frame.center;
        self.vertices = frame.vertices;
    }
}

/// One input command together with its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Rotate { axis: Axis, angle: f64 },
    Translate { axis: usize, step: f64 },
    Scale { factor: f64 },
    Record { slot: usize },
    Play,
    Quit,
}

/// The live object, its keyframes and the projection used to show it
#[derive(Debug, Clone)]
pub struct Session {
    pub object: SceneObject,
    pub animation: AnimationController,
    pub projector: Projector,
    running: bool,
}

impl Session {
    /// Session around the configured cuboid
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let h = config.half_extents;
        let object = SceneObject::cuboid(&config.center, h.x, h.y, h.z);
        Ok(Self::with_object(config, object))
    }

    /// Session around a loaded wireframe centered at the configured center
    pub fn with_wireframe(config: &SimulationConfig, wireframe: Wireframe) -> Result<Self> {
        config.validate()?;
        let object = SceneObject::new(wireframe, config.center)?;
        Ok(Self::with_object(config, object))
    }

    fn with_object(config: &SimulationConfig, object: SceneObject) -> Self {
        info!(
            "session with {} vertices, {} faces, {} projection",
            object.vertices.len(),
            object.faces.len(),
            config.projection
        );
        Self {
            object,
            animation: AnimationController::new(config.number_of_frames),
            projector: config.projector(),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Draw the live object once
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<()> {
        let points = self.projector.project(&self.object.vertices);
        renderer.draw(&points, &self.object.faces)
    }

    /// Run one command. `Play` blocks on `renderer` until playback ends.
    pub fn dispatch<R: Renderer + ?Sized>(&mut self, action: Action, renderer: &mut R) -> Result<()> {
        debug!("dispatching {action:?}");
        match action {
            Action::Rotate { axis, angle } => self.object.rotate(axis, angle),
            Action::Translate { axis, step } => self.object.translate(axis, step)?,
            Action::Scale { factor } => self.object.scale(factor)?,
            Action::Record { slot } => self.animation.record(slot, &self.object)?,
            Action::Play => {
                let played = self
                    .animation
                    .try_play(&mut self.object, &self.projector, renderer)?;
                if !played {
                    info!(
                        "cannot play, keyframes are {:?}",
                        self.animation.slots().state()
                    );
                }
            }
            Action::Quit => self.running = false,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationState;
    use crate::quaternion::rotate_vectors;
    use log::{Level, Log, Metadata, Record};
    use nalgebra::Point2;
    use std::sync::Mutex;

    struct NullRenderer {
        draws: usize,
    }

    impl Renderer for NullRenderer {
        fn draw(&mut self, _points: &[Point2<f64>], _faces: &[Face]) -> Result<()> {
            self.draws += 1;
            Ok(())
        }
    }

    fn rebuilt(object: &SceneObject) -> VertexSet {
        rotate_vectors(&object.orientation, &object.reference_vertices)
            .unwrap()
            .into_iter()
            .map(|v| v + object.center)
            .collect()
    }

    fn assert_vertices_close(actual: &[Vector3<f64>], expected: &[Vector3<f64>]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).norm() < 1e-9, "{a:?} != {e:?}");
        }
    }

    #[test]
    fn test_reference_vertices_are_local() {
        let object = SceneObject::cuboid(&Vector3::new(300.0, 300.0, 300.0), 50.0, 50.0, 50.0);
        assert_eq!(object.reference_vertices[0], Vector3::new(50.0, 50.0, 50.0));
        assert_eq!(object.reference_vertices[7], Vector3::new(-50.0, -50.0, -50.0));
    }

    #[test]
    fn test_new_from_wireframe() {
        let wireframe = Wireframe::cuboid(&Vector3::new(1.0, 2.0, 3.0), 1.0, 1.0, 1.0);
        let object = SceneObject::new(wireframe, Vector3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(
            object,
            SceneObject::cuboid(&Vector3::new(1.0, 2.0, 3.0), 1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_orientation_tracks_direct_rotations() {
        let mut object = SceneObject::cuboid(&Vector3::new(300.0, 300.0, 300.0), 50.0, 30.0, 10.0);
        object.rotate(Axis::Y, 0.3);
        object.rotate(Axis::X, -0.7);
        object.translate(2, 12.0).unwrap();
        object.rotate(Axis::Z, 1.9);
        assert_vertices_close(&object.vertices, &rebuilt(&object));
    }

    #[test]
    fn test_scale_keeps_reference_in_step() {
        let mut object = SceneObject::cuboid(&Vector3::new(10.0, 0.0, 0.0), 1.0, 1.0, 1.0);
        object.rotate(Axis::X, 0.4);
        object.scale(1.1).unwrap();
        assert_vertices_close(&object.vertices, &rebuilt(&object));
        assert!(object.scale(0.0).is_err());
    }

    #[test]
    fn test_dispatch_commands() {
        let mut session = Session::new(&SimulationConfig::default()).unwrap();
        let mut renderer = NullRenderer { draws: 0 };

        session
            .dispatch(Action::Translate { axis: 0, step: 5.0 }, &mut renderer)
            .unwrap();
        assert_eq!(session.object.center, Vector3::new(305.0, 300.0, 300.0));

        session
            .dispatch(Action::Record { slot: 0 }, &mut renderer)
            .unwrap();
        session.dispatch(Action::Play, &mut renderer).unwrap();
        assert_eq!(renderer.draws, 0);
        assert_eq!(session.animation.state(), AnimationState::PartiallyRecorded);

        session
            .dispatch(Action::Record { slot: 1 }, &mut renderer)
            .unwrap();
        session.dispatch(Action::Play, &mut renderer).unwrap();
        assert_eq!(renderer.draws, 60);
        assert_eq!(session.animation.state(), AnimationState::Empty);

        assert!(session
            .dispatch(Action::Translate { axis: 5, step: 1.0 }, &mut renderer)
            .is_err());
        assert!(session
            .dispatch(Action::Record { slot: 2 }, &mut renderer)
            .is_err());

        assert!(session.is_running());
        session.dispatch(Action::Quit, &mut renderer).unwrap();
        assert!(!session.is_running());
    }

    struct CapturingLogger {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl Log for CapturingLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if let Ok(mut records) = self.records.lock() {
                records.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger {
        records: Mutex::new(Vec::new()),
    };

    #[test]
    fn test_play_before_recording_is_not_a_warning() {
        // Only this test installs a logger
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);

        let mut session = Session::new(&SimulationConfig::default()).unwrap();
        let mut renderer = NullRenderer { draws: 0 };
        session.dispatch(Action::Play, &mut renderer).unwrap();

        let records = LOGGER.records.lock().unwrap();
        let not_ready: Vec<_> = records
            .iter()
            .filter(|(_, message)| message.starts_with("cannot play"))
            .collect();
        assert!(!not_ready.is_empty());
        assert!(not_ready.iter().all(|(level, _)| *level > Level::Warn));
        assert_eq!(renderer.draws, 0);
    }

    #[test]
    fn test_render_draws_live_vertices() {
        let session = Session::new(&SimulationConfig::default()).unwrap();
        let mut renderer = NullRenderer { draws: 0 };
        session.render(&mut renderer).unwrap();
        assert_eq!(renderer.draws, 1);
    }
}
