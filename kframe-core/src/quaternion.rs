/// Quaternion algebra used to track and replay orientations.
///
/// Quaternions are stored as a scalar part `w` and a vector part `xyz`.
/// Rotation quaternions follow a left-handed sign convention: the vector part
/// of [`rotation_quaternion`] carries `-sin(angle / 2)`. Every rotation built
/// or composed through this module uses that convention, which makes the
/// sandwich product agree with the row-vector matrices in
/// [`crate::transform`].

use std::ops::Mul;

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::coordinates::normalize;
use crate::error::{Error, Result};

/// A quaternion `(w, x, y, z)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub xyz: Vector3<f64>,
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            w,
            xyz: Vector3::new(x, y, z),
        }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Components in `(w, x, y, z)` order
    pub fn coords(&self) -> Vector4<f64> {
        Vector4::new(self.w, self.xyz.x, self.xyz.y, self.xyz.z)
    }

    pub fn norm_squared(&self) -> f64 {
        self.w * self.w + self.xyz.norm_squared()
    }

    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    pub fn conjugate(&self) -> Self {
        Self {
            w: self.w,
            xyz: -self.xyz,
        }
    }

    pub fn has_nan(&self) -> bool {
        self.w.is_nan() || self.xyz.iter().any(|c| c.is_nan())
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        multiply(&self, &rhs)
    }
}

impl From<[f64; 4]> for Quaternion {
    fn from(value: [f64; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

impl From<Quaternion> for [f64; 4] {
    fn from(value: Quaternion) -> Self {
        [value.w, value.xyz.x, value.xyz.y, value.xyz.z]
    }
}

impl From<Vector4<f64>> for Quaternion {
    fn from(value: Vector4<f64>) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

impl From<Quaternion> for Vector4<f64> {
    fn from(value: Quaternion) -> Self {
        value.coords()
    }
}

/// Hamilton product `q * p`
pub fn multiply(q: &Quaternion, p: &Quaternion) -> Quaternion {
    Quaternion {
        w: q.w * p.w - q.xyz.dot(&p.xyz),
        xyz: p.xyz * q.w + q.xyz * p.w + q.xyz.cross(&p.xyz),
    }
}

/// Multiplicative inverse, valid for any non-zero quaternion
pub fn inverse(q: &Quaternion) -> Quaternion {
    let norm_squared = q.norm_squared();
    let conjugate = q.conjugate();
    Quaternion {
        w: conjugate.w / norm_squared,
        xyz: conjugate.xyz / norm_squared,
    }
}

fn from_unit_axis(angle: f64, unit_axis: &Vector3<f64>) -> Quaternion {
    let half = angle / 2.0;
    Quaternion {
        w: half.cos(),
        xyz: unit_axis * -half.sin(),
    }
}

/// Quaternion for a rotation by `angle` radians about `axis`.
///
/// The axis is normalized first; a zero axis stays zero.
pub fn rotation_quaternion(angle: f64, axis: &Vector3<f64>) -> Quaternion {
    let unit_axis = normalize(std::slice::from_ref(axis))[0];
    from_unit_axis(angle, &unit_axis)
}

/// Angles for a batch of rotation quaternions
#[derive(Debug, Clone, Copy)]
pub enum Angles<'a> {
    /// One angle shared by every axis
    Uniform(f64),
    /// One angle per axis, paired element-wise
    PerAxis(&'a [f64]),
}

/// Batched [`rotation_quaternion`].
///
/// A per-axis angle list must have exactly one angle per axis, so several
/// angles against a single axis are rejected rather than broadcast.
pub fn rotation_quaternions(angles: Angles<'_>, axes: &[Vector3<f64>]) -> Result<Vec<Quaternion>> {
    let unit_axes = normalize(axes);
    match angles {
        Angles::Uniform(angle) => Ok(unit_axes
            .iter()
            .map(|axis| from_unit_axis(angle, axis))
            .collect()),
        Angles::PerAxis(list) => {
            if list.len() != unit_axes.len() {
                return Err(Error::AmbiguousBatch {
                    angles: list.len(),
                    axes: unit_axes.len(),
                });
            }
            Ok(list
                .iter()
                .zip(&unit_axes)
                .map(|(angle, axis)| from_unit_axis(*angle, axis))
                .collect())
        }
    }
}

/// Pure quaternion `(0, v)`
pub fn vector_to_quaternion(v: &Vector3<f64>) -> Quaternion {
    Quaternion { w: 0.0, xyz: *v }
}

pub fn vectors_to_quaternions(vectors: &[Vector3<f64>]) -> Vec<Quaternion> {
    vectors.iter().map(vector_to_quaternion).collect()
}

/// Vector part of a pure quaternion. The scalar part must be exactly zero.
pub fn quaternion_to_vector(q: &Quaternion) -> Result<Vector3<f64>> {
    if q.w != 0.0 {
        return Err(Error::NonZeroScalarPart(q.w));
    }
    Ok(q.xyz)
}

pub fn quaternions_to_vectors(quaternions: &[Quaternion]) -> Result<Vec<Vector3<f64>>> {
    quaternions.iter().map(quaternion_to_vector).collect()
}

/// The linear map `v -> q v q^-1`, built once and applied to many quaternions.
///
/// The matrix is divided by `|q|^2`, so it rotates correctly even when `q`
/// has drifted away from unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SandwichRotation {
    matrix: Matrix4<f64>,
}

impl SandwichRotation {
    pub fn new(q: &Quaternion) -> Self {
        let (w, x, y, z) = (q.w, q.xyz.x, q.xyz.y, q.xyz.z);
        let norm_squared = q.norm_squared();

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            norm_squared, 0.0, 0.0, 0.0,
            0.0, w * w + x * x - y * y - z * z, 2.0 * (x * y - w * z), 2.0 * (x * z + w * y),
            0.0, 2.0 * (x * y + w * z), w * w + y * y - x * x - z * z, 2.0 * (y * z - w * x),
            0.0, 2.0 * (x * z - w * y), 2.0 * (y * z + w * x), w * w + z * z - x * x - y * y,
        );

        Self {
            matrix: matrix / norm_squared,
        }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn apply(&self, v: &Quaternion) -> Quaternion {
        Quaternion::from(self.matrix * v.coords())
    }

    pub fn apply_all(&self, vs: &[Quaternion]) -> Vec<Quaternion> {
        vs.iter().map(|v| self.apply(v)).collect()
    }

    /// Rotate plain vectors. Non-finite results are passed through rather
    /// than checked, since a degenerate `q` only yields NaN entries.
    pub fn apply_vectors(&self, vectors: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
        vectors
            .iter()
            .map(|v| self.apply(&vector_to_quaternion(v)).xyz)
            .collect()
    }
}

/// Rotate every quaternion in `vs` by `q` (the sandwich product `q v q^-1`)
pub fn rotate(q: &Quaternion, vs: &[Quaternion]) -> Vec<Quaternion> {
    SandwichRotation::new(q).apply_all(vs)
}

/// Rotate plain vectors by `q`
pub fn rotate_vectors(q: &Quaternion, vectors: &[Vector3<f64>]) -> Result<Vec<Vector3<f64>>> {
    quaternions_to_vectors(&rotate(q, &vectors_to_quaternions(vectors)))
}

/// Rotation quaternion for the angle between unit vectors `from` and `to`,
/// about their common normal `from x to`.
///
/// Under the module's sign convention it is the inverse of this quaternion
/// that carries `from` onto `to`.
pub fn orientation_between(from: &Vector3<f64>, to: &Vector3<f64>) -> Quaternion {
    let angle = from.dot(to).clamp(-1.0, 1.0).acos();
    rotation_quaternion(angle, &from.cross(to))
}

/// [`orientation_between`] for many position vectors against one reference
pub fn orientations_between(positions: &[Vector3<f64>], reference: &Vector3<f64>) -> Vec<Quaternion> {
    positions
        .iter()
        .map(|position| orientation_between(position, reference))
        .collect()
}

/// Compose a rotation about `axis` onto `orientation`. No renormalization is
/// applied, so drift accumulates over many compositions.
pub fn update_orientation(orientation: &Quaternion, angle: f64, axis: &Vector3<f64>) -> Quaternion {
    rotation_quaternion(angle, axis) * *orientation
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-8;

    fn assert_quaternion_close(actual: &Quaternion, expected: &Quaternion) {
        assert!(
            (actual.coords() - expected.coords()).norm() < EPSILON,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_multiply_basis() {
        let i = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let j = Quaternion::new(0.0, 0.0, 1.0, 0.0);
        let k = Quaternion::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(i * j, k);
        assert_eq!(j * i, Quaternion::new(0.0, 0.0, 0.0, -1.0));
        assert_eq!(i * i, Quaternion::new(-1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_multiply_associative() {
        let a = Quaternion::new(1.5, -2.0, 0.5, 3.0);
        let b = Quaternion::new(-0.3, 4.0, 1.0, -1.0);
        let c = Quaternion::new(2.0, 0.1, -0.7, 0.9);
        assert_quaternion_close(&((a * b) * c), &(a * (b * c)));
    }

    #[test]
    fn test_inverse_times_q_is_identity() {
        let quaternions = [
            Quaternion::new(-9.50095535, 4.10391213, -3.19310876, 3.7417457),
            Quaternion::new(0.2, 0.0, 0.0, 0.0),
            rotation_quaternion(1.2, &Vector3::new(1.0, 2.0, 3.0)),
        ];
        for q in &quaternions {
            assert_quaternion_close(&(inverse(q) * *q), &Quaternion::identity());
        }
    }

    #[test]
    fn test_inverse_of_unit_is_conjugate() {
        let q = rotation_quaternion(0.7, &Vector3::new(0.0, 1.0, 1.0));
        assert_quaternion_close(&inverse(&q), &q.conjugate());
    }

    #[test]
    fn test_vector_round_trip_is_exact() {
        let vectors = [
            Vector3::new(-9.63644587, -1.44091167, 2.84153074),
            Vector3::new(6.75599579, 6.51768392, -8.04741763),
            Vector3::new(7.09786417, 0.34134506, 8.39147551),
        ];
        let quaternions = vectors_to_quaternions(&vectors);
        assert_eq!(
            quaternions[1],
            Quaternion::new(0.0, 6.75599579, 6.51768392, -8.04741763)
        );
        assert_eq!(quaternions_to_vectors(&quaternions).unwrap(), vectors.to_vec());
    }

    #[test]
    fn test_quaternion_to_vector_rejects_scalar_part() {
        let q = Quaternion::new(1e-300, 1.0, 2.0, 3.0);
        assert_eq!(quaternion_to_vector(&q), Err(Error::NonZeroScalarPart(1e-300)));
    }

    #[test]
    fn test_rotation_quaternion_one_axis_one_angle() {
        let axis = Vector3::new(-3.58214914, 5.94684718, 6.93615019);
        let axis_norm = 9.813611124439042;
        let angle: f64 = 0.6868663310182441;
        let s = -(angle / 2.0).sin() / axis_norm;
        let expected = Quaternion::new((angle / 2.0).cos(), s * axis.x, s * axis.y, s * axis.z);
        assert_quaternion_close(&rotation_quaternion(angle, &axis), &expected);
    }

    fn batch_axes() -> ([Vector3<f64>; 3], [f64; 3]) {
        (
            [
                Vector3::new(-9.63644587, -1.44091167, 2.84153074),
                Vector3::new(6.75599579, 6.51768392, -8.04741763),
                Vector3::new(7.09786417, 0.34134506, 8.39147551),
            ],
            [10.149463650486522, 12.364651766514053, 10.996047174357063],
        )
    }

    #[test]
    fn test_rotation_quaternions_one_angle_many_axes() {
        let (axes, norms) = batch_axes();
        let angle: f64 = 0.6868663310182441;
        let actual = rotation_quaternions(Angles::Uniform(angle), &axes).unwrap();
        assert_eq!(actual.len(), 3);
        for ((q, axis), norm) in actual.iter().zip(&axes).zip(&norms) {
            let expected = Quaternion {
                w: (angle / 2.0).cos(),
                xyz: axis * (-(angle / 2.0).sin() / norm),
            };
            assert_quaternion_close(q, &expected);
        }
    }

    #[test]
    fn test_rotation_quaternions_many_angles_many_axes() {
        let (axes, norms) = batch_axes();
        let angles = [3.21870791, 7.74255517, 6.78019798];
        let actual = rotation_quaternions(Angles::PerAxis(&angles), &axes).unwrap();
        for i in 0..3 {
            let half: f64 = angles[i] / 2.0;
            let expected = Quaternion {
                w: half.cos(),
                xyz: axes[i] * (-half.sin() / norms[i]),
            };
            assert_quaternion_close(&actual[i], &expected);
        }
    }

    #[test]
    fn test_rotation_quaternions_many_angles_one_axis_fails() {
        let angles = [3.21870791, 7.74255517, 6.78019798];
        let axis = [Vector3::new(-3.58214914, 5.94684718, 6.93615019)];
        assert_eq!(
            rotation_quaternions(Angles::PerAxis(&angles), &axis),
            Err(Error::AmbiguousBatch { angles: 3, axes: 1 })
        );
    }

    #[test]
    fn test_rotation_is_isometry() {
        let q = rotation_quaternion(2.1, &Vector3::new(0.3, -1.0, 0.4));
        let vectors = [Vector3::new(3.0, 4.0, 5.0), Vector3::new(-1.0, 0.5, 2.0)];
        let rotated = rotate_vectors(&q, &vectors).unwrap();
        for (before, after) in vectors.iter().zip(&rotated) {
            assert!((before.norm() - after.norm()).abs() < EPSILON);
        }
    }

    #[test]
    fn test_rotate_matches_explicit_sandwich_for_non_unit_q() {
        let q = Quaternion::new(2.0, -1.0, 0.5, 3.0);
        let v = vector_to_quaternion(&Vector3::new(1.0, -2.0, 0.25));
        let explicit = q * v * inverse(&q);
        let closed_form = rotate(&q, &[v]);
        assert_quaternion_close(&closed_form[0], &explicit);
    }

    #[test]
    fn test_rotate_keeps_scalar_part_zero() {
        let q = Quaternion::new(0.3, 1.2, -0.4, 2.0);
        let rotated = rotate(&q, &vectors_to_quaternions(&[Vector3::new(5.0, 1.0, -7.0)]));
        assert_eq!(rotated[0].w, 0.0);
    }

    #[test]
    fn test_rotation_sign_convention() {
        // A quarter turn about y carries x onto +z under this convention
        let q = rotation_quaternion(PI / 2.0, &Vector3::y());
        let rotated = rotate_vectors(&q, &[Vector3::x()]).unwrap();
        assert!((rotated[0] - Vector3::z()).norm() < EPSILON);
    }

    #[test]
    fn test_orientation_between_one_vector() {
        let position = Vector3::new(6.0, 3.0, 10.0).normalize();
        let reference = Vector3::new(2.0, 9.0, 8.0).normalize();
        let expected = rotation_quaternion(
            0.627328929,
            &(Vector3::new(-33.0, -14.0, 24.0) / 1861.0_f64.sqrt()),
        );
        assert_quaternion_close(&orientation_between(&position, &reference), &expected);
    }

    #[test]
    fn test_orientation_between_carries_from_onto_to() {
        let from = Vector3::new(1.0, 2.0, -2.0).normalize();
        let to = Vector3::new(-4.0, 0.0, 3.0).normalize();
        let q = orientation_between(&from, &to);
        // The negative sine convention turns the other way round the axis
        let carried = rotate_vectors(&inverse(&q), &[from]).unwrap();
        assert!((carried[0] - to).norm() < 1e-6);
    }

    #[test]
    fn test_orientations_between_many_vectors() {
        let reference = Vector3::new(2.0, 9.0, 8.0) / 12.206555615733702;
        let positions = [
            Vector3::new(6.0, 3.0, 10.0) / 12.041594578792296,
            Vector3::new(4.0, 7.0, 5.0) / 9.486832980505138,
            Vector3::new(-7.0, 6.0, 7.0) / 11.575836902790225,
        ];
        let crosses = [
            (Vector3::new(-66.0, -28.0, 48.0), 86.27861844049197),
            (Vector3::new(11.0, -22.0, 22.0), 33.0),
            (Vector3::new(-15.0, 70.0, -75.0), 103.6822067666386),
        ];
        let dots: [f64; 3] = [
            119.0 / (12.041594578792296 * 12.206555615733702),
            111.0 / (9.486832980505138 * 12.206555615733702),
            96.0 / (11.575836902790225 * 12.206555615733702),
        ];

        let actual = orientations_between(&positions, &reference);
        assert_eq!(actual.len(), 3);
        for i in 0..3 {
            let half = dots[i].acos() / 2.0;
            let (cross, norm) = crosses[i];
            let expected = Quaternion {
                w: half.cos(),
                xyz: cross * (-half.sin() / norm),
            };
            assert_quaternion_close(&actual[i], &expected);
        }
    }

    #[test]
    fn test_update_orientation_composes_left() {
        let start = rotation_quaternion(0.4, &Vector3::x());
        let updated = update_orientation(&start, 0.9, &Vector3::z());
        let expected = rotation_quaternion(0.9, &Vector3::z()) * start;
        assert_eq!(updated, expected);
    }

    #[test]
    fn test_array_conversions() {
        let q = Quaternion::from([0.5, -0.5, 0.25, 1.0]);
        assert_eq!(<[f64; 4]>::from(q), [0.5, -0.5, 0.25, 1.0]);
        assert_eq!(Vector4::from(q), Vector4::new(0.5, -0.5, 0.25, 1.0));
    }
}
