/// Coordinate conversions and per-row vector helpers
use nalgebra::{DMatrix, Point2, SVector, Vector3};

use crate::error::{Error, Result};

/// Append a column of ones, turning `n x d` cartesian points into `n x (d + 1)`
/// homogeneous points.
pub fn to_homogeneous(points: &DMatrix<f64>) -> DMatrix<f64> {
    let ncols = points.ncols();
    points.clone().insert_column(ncols, 1.0)
}

/// Perspective divide: every column but the last is divided by the last one.
///
/// A zero in the last column yields inf/NaN entries, which are returned as-is.
pub fn to_cartesian(points: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let ncols = points.ncols();
    if ncols == 0 {
        return Err(Error::ShapeMismatch {
            expected: "at least one column".to_string(),
            actual: format!("{} x 0", points.nrows()),
        });
    }

    let last = ncols - 1;
    Ok(DMatrix::from_fn(points.nrows(), last, |i, j| {
        points[(i, j)] / points[(i, last)]
    }))
}

/// Write each vertex's position relative to `origin` into `result`.
///
/// `result` is caller-owned so a single buffer can be reused across frames.
pub fn local_coordinates(
    result: &mut [Vector3<f64>],
    vertices: &[Vector3<f64>],
    origin: &Vector3<f64>,
) -> Result<()> {
    if result.len() != vertices.len() {
        return Err(Error::ShapeMismatch {
            expected: format!("{} x 3", vertices.len()),
            actual: format!("{} x 3", result.len()),
        });
    }

    for (out, vertex) in result.iter_mut().zip(vertices) {
        *out = vertex - origin;
    }
    Ok(())
}

/// Normalize every row. Rows with an exactly zero norm are returned unchanged.
pub fn normalize<const D: usize>(vectors: &[SVector<f64, D>]) -> Vec<SVector<f64, D>> {
    vectors
        .iter()
        .map(|vector| {
            let norm = vector.norm();
            if norm != 0.0 {
                vector / norm
            } else {
                *vector
            }
        })
        .collect()
}

/// Convert points that use the bottom left corner as origin into points that
/// use the top left corner, the usual convention of drawing surfaces.
pub fn flip_vertical(points: &[Point2<f64>], screen_height: f64) -> Vec<Point2<f64>> {
    points
        .iter()
        .map(|p| Point2::new(p.x, screen_height - p.y))
        .collect()
}
