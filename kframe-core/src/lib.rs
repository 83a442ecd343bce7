/// kframe core library - keyframe animation of a rigid wireframe object
///
/// Quaternion arithmetic, vertex transforms, projection and keyframe
/// interpolation. Nothing here touches a terminal or a window; frontends
/// plug in through the [`Renderer`] trait.

pub mod animation;
pub mod config;
pub mod coordinates;
pub mod error;
pub mod geometry;
pub mod interpolation;
pub mod projection;
pub mod quaternion;
pub mod scene;
pub mod transform;
pub mod wireframe;

// Re-export commonly used types
pub use animation::{AnimationController, AnimationState, Frame, Pose, Renderer};
pub use config::SimulationConfig;
pub use error::{Error, Result};
pub use geometry::{Face, VertexSet, Wireframe};
pub use projection::{ProjectionMode, Projector};
pub use quaternion::Quaternion;
pub use scene::{Action, SceneObject, Session};
pub use transform::Axis;
pub use wireframe::parse_wireframe;
