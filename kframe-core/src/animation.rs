/// Keyframe recording and playback.
///
/// Two keyframe slots capture `(orientation, center)` poses of the live
/// object. Once both are set, playback interpolates between them and
/// rebuilds the object's vertices from its reference vertex set for each
/// frame. Taking a playback always empties both slots, however many of its
/// frames end up drawn.

use std::vec;

use log::{debug, info};
use nalgebra::{Point2, Vector3, Vector4};

use crate::error::{Error, Result};
use crate::geometry::{Face, VertexSet};
use crate::interpolation::linear_interpolation;
use crate::projection::Projector;
use crate::quaternion::{Quaternion, SandwichRotation};
use crate::scene::SceneObject;

/// Number of keyframe slots
pub const N_SLOTS: usize = 2;

/// A captured orientation and center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub orientation: Quaternion,
    pub center: Vector3<f64>,
}

impl Pose {
    pub fn new(orientation: Quaternion, center: Vector3<f64>) -> Self {
        Self {
            orientation,
            center,
        }
    }

    pub fn has_nan(&self) -> bool {
        self.orientation.has_nan() || self.center.iter().any(|c| c.is_nan())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Empty,
    PartiallyRecorded,
    Ready,
    Playing,
}

/// The two keyframe slots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeSlots {
    slots: [Option<Pose>; N_SLOTS],
}

impl KeyframeSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `pose` in `slot`, replacing what was there.
    ///
    /// A pose with a NaN anywhere counts as unset, so recording one clears
    /// the slot.
    pub fn record(&mut self, slot: usize, pose: Pose) -> Result<()> {
        let target = self.slots.get_mut(slot).ok_or(Error::SlotOutOfRange(slot))?;
        *target = if pose.has_nan() { None } else { Some(pose) };
        debug!("recorded keyframe {slot}: {pose:?}");
        Ok(())
    }

    pub fn get(&self, slot: usize) -> Option<&Pose> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn is_ready(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn state(&self) -> AnimationState {
        match self.slots.iter().filter(|slot| slot.is_some()).count() {
            0 => AnimationState::Empty,
            N_SLOTS => AnimationState::Ready,
            _ => AnimationState::PartiallyRecorded,
        }
    }

    pub fn clear(&mut self) {
        self.slots = [None; N_SLOTS];
    }

    fn take_pair(&mut self) -> Option<(Pose, Pose)> {
        match self.slots {
            [Some(first), Some(second)] => {
                self.clear();
                Some((first, second))
            }
            _ => None,
        }
    }
}

/// One interpolated playback frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub orientation: Quaternion,
    pub center: Vector3<f64>,
    /// World-space vertices: rotated reference vertices plus the center
    pub vertices: VertexSet,
}

/// Interpolated frames between two keyframes, produced lazily
#[derive(Debug, Clone)]
pub struct Playback {
    reference: VertexSet,
    samples: std::iter::Enumerate<std::iter::Zip<vec::IntoIter<Vector4<f64>>, vec::IntoIter<Vector3<f64>>>>,
    len: usize,
}

impl Playback {
    pub fn new(start: &Pose, end: &Pose, reference: &[Vector3<f64>], number_of_frames: usize) -> Self {
        let orientations = linear_interpolation(
            &[start.orientation.coords(), end.orientation.coords()],
            number_of_frames,
        );
        let centers = linear_interpolation(&[start.center, end.center], number_of_frames);

        Self {
            reference: reference.to_vec(),
            samples: orientations.into_iter().zip(centers).enumerate(),
            len: number_of_frames,
        }
    }

    /// Total number of frames, drawn or not
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Iterator for Playback {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let (index, (coords, center)) = self.samples.next()?;
        let orientation = Quaternion::from(coords);
        let vertices = SandwichRotation::new(&orientation)
            .apply_vectors(&self.reference)
            .into_iter()
            .map(|v| v + center)
            .collect();

        Some(Frame {
            index,
            orientation,
            center,
            vertices,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.samples.size_hint()
    }
}

/// Host-side drawing surface used during playback
pub trait Renderer {
    /// Draw one frame: 2D points with the bottom left corner as origin and
    /// the faces outlining them
    fn draw(&mut self, points: &[Point2<f64>], faces: &[Face]) -> Result<()>;

    /// Block until the next frame is due
    fn wait_frame(&mut self) -> Result<()> {
        Ok(())
    }

    /// Checked between frames; returning false cancels the rest of playback
    fn keep_playing(&mut self) -> bool {
        true
    }
}

/// Keyframe slots plus the playback currently running, if any
#[derive(Debug, Clone)]
pub struct AnimationController {
    slots: KeyframeSlots,
    number_of_frames: usize,
    playback: Option<Playback>,
}

impl AnimationController {
    pub fn new(number_of_frames: usize) -> Self {
        Self {
            slots: KeyframeSlots::new(),
            number_of_frames,
            playback: None,
        }
    }

    pub fn slots(&self) -> &KeyframeSlots {
        &self.slots
    }

    pub fn number_of_frames(&self) -> usize {
        self.number_of_frames
    }

    pub fn state(&self) -> AnimationState {
        if self.playback.is_some() {
            AnimationState::Playing
        } else {
            self.slots.state()
        }
    }

    /// Capture the live pose of `object` into `slot`
    pub fn record(&mut self, slot: usize, object: &SceneObject) -> Result<()> {
        self.slots.record(slot, object.pose())
    }

    /// Interpolate between the two recorded keyframes and empty the slots.
    ///
    /// Returns `None`, leaving everything untouched, unless both slots are set.
    pub fn take_playback(&mut self, reference: &[Vector3<f64>]) -> Option<Playback> {
        let (start, end) = self.slots.take_pair()?;
        Some(Playback::new(&start, &end, reference, self.number_of_frames))
    }

    /// Begin a frame-by-frame playback driven through [`Self::next_frame`]
    pub fn start(&mut self, reference: &[Vector3<f64>]) -> bool {
        match self.take_playback(reference) {
            Some(playback) => {
                info!("starting playback of {} frames", playback.len());
                self.playback = Some(playback);
                true
            }
            None => false,
        }
    }

    /// Next frame of the running playback. The controller leaves the
    /// `Playing` state once the frames run out.
    pub fn next_frame(&mut self) -> Option<Frame> {
        let frame = self.playback.as_mut()?.next();
        if frame.is_none() {
            self.playback = None;
        }
        frame
    }

    /// Abandon the running playback
    pub fn stop(&mut self) {
        self.playback = None;
    }

    /// Play the recorded keyframes on `renderer`, blocking until done.
    ///
    /// Returns `Ok(false)` without side effects when a keyframe is missing.
    /// Each drawn frame also becomes the live pose of `object`.
    pub fn try_play<R: Renderer + ?Sized>(
        &mut self,
        object: &mut SceneObject,
        projector: &Projector,
        renderer: &mut R,
    ) -> Result<bool> {
        if !self.start(&object.reference_vertices) {
            debug!("playback requested with state {:?}", self.slots.state());
            return Ok(false);
        }

        let result = self.play_frames(object, projector, renderer);
        self.stop();
        let drawn = result?;
        info!("playback finished after {drawn} frames");
        Ok(true)
    }

    fn play_frames<R: Renderer + ?Sized>(
        &mut self,
        object: &mut SceneObject,
        projector: &Projector,
        renderer: &mut R,
    ) -> Result<usize> {
        let mut drawn = 0;
        while let Some(frame) = self.next_frame() {
            let points = projector.project(&frame.vertices);
            renderer.draw(&points, &object.faces)?;
            object.apply_frame(frame);
            drawn += 1;

            renderer.wait_frame()?;
            if !renderer.keep_playing() {
                info!("playback cancelled after {drawn} frames");
                break;
            }
        }
        Ok(drawn)
    }
}
