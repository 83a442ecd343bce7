/// Rigid transforms applied in place to a vertex set about its center
use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::error::{Error, Result};

/// Coordinate axis of a rigid transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    /// Rotation matrix for row vectors, i.e. applied as `v^T * R`
    #[rustfmt::skip]
    pub fn rotation_matrix(self, angle: f64) -> Matrix3<f64> {
        let (s, c) = angle.sin_cos();
        match self {
            Axis::X => Matrix3::new(
                1.0, 0.0, 0.0,
                0.0, c, -s,
                0.0, s, c,
            ),
            Axis::Y => Matrix3::new(
                c, 0.0, s,
                0.0, 1.0, 0.0,
                -s, 0.0, c,
            ),
            Axis::Z => Matrix3::new(
                c, -s, 0.0,
                s, c, 0.0,
                0.0, 0.0, 1.0,
            ),
        }
    }
}

impl TryFrom<usize> for Axis {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            other => Err(Error::AxisOutOfRange(other)),
        }
    }
}

/// Rotate `vertices` about `axis` through `center`. The center is unchanged.
pub fn rotate_about_axis(
    center: &Vector3<f64>,
    vertices: &mut [Vector3<f64>],
    angle: f64,
    axis: Axis,
) {
    let rotation = axis.rotation_matrix(angle);
    for vertex in vertices.iter_mut() {
        let local = (*vertex - center).transpose() * rotation;
        *vertex = local.transpose() + center;
    }
    debug!("rotated {} vertices by {angle} about {axis:?}", vertices.len());
}

/// Move every vertex and the center by `step` along axis index `axis`
pub fn translate(
    center: &mut Vector3<f64>,
    vertices: &mut [Vector3<f64>],
    step: f64,
    axis: usize,
) -> Result<()> {
    let axis = Axis::try_from(axis)?.index();
    for vertex in vertices.iter_mut() {
        vertex[axis] += step;
    }
    center[axis] += step;
    debug!("translated by {step} along axis {axis}, center now {center:?}");
    Ok(())
}

/// Scale `vertices` about `center` by a positive `factor`
pub fn uniform_scale(
    center: &Vector3<f64>,
    vertices: &mut [Vector3<f64>],
    factor: f64,
) -> Result<()> {
    if factor.is_nan() || factor <= 0.0 {
        return Err(Error::NonPositiveScale(factor));
    }
    for vertex in vertices.iter_mut() {
        *vertex = (*vertex - center) * factor + center;
    }
    debug!("scaled {} vertices by {factor}", vertices.len());
    Ok(())
}
