/// Projection of world-space vertices onto the x-y plane
use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, Point2, Vector3};

use crate::coordinates::to_homogeneous;
use crate::error::{Error, Result};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl TryFrom<u8> for ProjectionMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ProjectionMode::Perspective),
            1 => Ok(ProjectionMode::Orthographic),
            other => Err(Error::UnknownProjection(other.to_string())),
        }
    }
}

impl FromStr for ProjectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "perspective" => Ok(ProjectionMode::Perspective),
            "orthographic" => Ok(ProjectionMode::Orthographic),
            _ => Err(Error::UnknownProjection(s.to_string())),
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Perspective => write!(f, "perspective"),
            ProjectionMode::Orthographic => write!(f, "orthographic"),
        }
    }
}

/// The 4 x 3 matrix mapping homogeneous world points to homogeneous
/// image-plane points for a camera at `camera`.
#[rustfmt::skip]
pub fn perspective_matrix(camera: &Vector3<f64>) -> DMatrix<f64> {
    DMatrix::from_row_slice(4, 3, &[
        -camera.z, 0.0, 0.0,
        0.0, -camera.z, 0.0,
        camera.x, camera.y, 1.0,
        0.0, 0.0, -camera.z,
    ])
}

/// Perspective projection onto the x-y plane as seen from `camera`.
///
/// A vertex with the same depth as the camera has a zero divisor and comes
/// out non-finite.
pub fn perspective_projection(camera: &Vector3<f64>, vertices: &[Vector3<f64>]) -> Vec<Point2<f64>> {
    let points = DMatrix::from_fn(vertices.len(), 3, |i, j| vertices[i][j]);
    let projected = to_homogeneous(&points) * perspective_matrix(camera);

    // Rows are homogeneous image points (x, y, w)
    projected
        .row_iter()
        .map(|row| Point2::new(row[0] / row[2], row[1] / row[2]))
        .collect()
}

/// Orthographic projection: the z coordinate is dropped
pub fn orthographic_projection(vertices: &[Vector3<f64>]) -> Vec<Point2<f64>> {
    vertices.iter().map(|v| Point2::new(v.x, v.y)).collect()
}

/// A projection bound to a fixed camera location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub mode: ProjectionMode,
    pub camera: Vector3<f64>,
}

impl Projector {
    pub fn new(mode: ProjectionMode, camera: Vector3<f64>) -> Self {
        Self { mode, camera }
    }

    /// Project vertices to 2D points with the bottom left corner as origin
    pub fn project(&self, vertices: &[Vector3<f64>]) -> Vec<Point2<f64>> {
        match self.mode {
            ProjectionMode::Perspective => perspective_projection(&self.camera, vertices),
            ProjectionMode::Orthographic => orthographic_projection(vertices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Vector3<f64> {
        Vector3::new(400.0, 400.0, -100.0)
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(ProjectionMode::try_from(0), Ok(ProjectionMode::Perspective));
        assert_eq!(ProjectionMode::try_from(1), Ok(ProjectionMode::Orthographic));
        assert_eq!(
            ProjectionMode::try_from(2),
            Err(Error::UnknownProjection("2".to_string()))
        );
        assert_eq!("Orthographic".parse::<ProjectionMode>(), Ok(ProjectionMode::Orthographic));
        assert!("isometric".parse::<ProjectionMode>().is_err());
    }

    #[test]
    fn test_points_on_plane_are_fixed() {
        let points = perspective_projection(&camera(), &[Vector3::new(123.0, -45.0, 0.0)]);
        assert!((points[0] - Point2::new(123.0, -45.0)).norm() < 1e-9);
    }

    #[test]
    fn test_perspective_pulls_towards_camera_axis() {
        // Twice the camera distance behind the plane halves the offset
        let points = perspective_projection(&camera(), &[Vector3::new(500.0, 300.0, 100.0)]);
        assert!((points[0] - Point2::new(450.0, 350.0)).norm() < 1e-9);
    }

    #[test]
    fn test_perspective_degenerates_at_camera_depth() {
        let points = perspective_projection(&camera(), &[Vector3::new(1.0, 2.0, -100.0)]);
        assert!(!points[0].x.is_finite());
    }

    #[test]
    fn test_orthographic_drops_depth() {
        let vertices = [Vector3::new(1.0, 2.0, 3.0), Vector3::new(-4.0, 5.0, -6.0)];
        let points = orthographic_projection(&vertices);
        assert_eq!(points, vec![Point2::new(1.0, 2.0), Point2::new(-4.0, 5.0)]);
        assert_eq!(vertices[0], Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_projector_dispatches_on_mode() {
        let vertices = [Vector3::new(500.0, 300.0, 100.0)];
        let perspective = Projector::new(ProjectionMode::Perspective, camera());
        let orthographic = Projector::new(ProjectionMode::Orthographic, camera());
        assert_eq!(perspective.project(&vertices), perspective_projection(&camera(), &vertices));
        assert_eq!(orthographic.project(&vertices), vec![Point2::new(500.0, 300.0)]);
    }

    #[test]
    fn test_perspective_matches_homogeneous_divide() {
        use crate::coordinates::to_cartesian;

        let vertices = [
            Vector3::new(500.0, 300.0, 100.0),
            Vector3::new(-20.0, 75.5, 40.0),
            Vector3::new(1.0, 2.0, -100.0),
        ];
        let points = perspective_projection(&camera(), &vertices);
        assert_eq!(points.len(), vertices.len());

        let rows = DMatrix::from_fn(vertices.len(), 3, |i, j| vertices[i][j]);
        let expected = to_cartesian(&(to_homogeneous(&rows) * perspective_matrix(&camera()))).unwrap();
        for (point, row) in points.iter().zip(expected.row_iter()) {
            assert_eq!(point.x.is_finite(), row[0].is_finite());
            if point.x.is_finite() {
                assert!((point.x - row[0]).abs() < 1e-9);
                assert!((point.y - row[1]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_empty_vertex_set() {
        assert!(perspective_projection(&camera(), &[]).is_empty());
    }
}
