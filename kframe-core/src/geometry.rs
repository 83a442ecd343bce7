/// Wireframe geometry: vertex sets and the faces drawn between them
use nalgebra::Vector3;

use crate::error::{Error, Result};

/// Ordered vertex positions of an object
pub type VertexSet = Vec<Vector3<f64>>;

/// A closed polygon outline given as indices into a vertex set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face(pub Vec<usize>);

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Consecutive index pairs, closing with the last-to-first edge
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.0.len();
        (0..n).map(move |i| (self.0[i], self.0[(i + 1) % n]))
    }
}

/// A wireframe object: vertex positions plus the faces outlining them
#[derive(Debug, Clone, PartialEq)]
pub struct Wireframe {
    pub vertices: VertexSet,
    pub faces: Vec<Face>,
}

impl Wireframe {
    pub fn new(vertices: VertexSet, faces: Vec<Face>) -> Result<Self> {
        let wireframe = Self { vertices, faces };
        wireframe.validate()?;
        Ok(wireframe)
    }

    /// Check that every face index refers to an existing vertex
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.0.iter().find(|&&i| i >= vertex_count) {
                return Err(Error::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Axis-aligned cuboid around `center` with the given half extents.
    ///
    /// Vertex `4i + 2j + k` takes the `+`/`-` offset in y from `i`, in x from
    /// `j` and in z from `k` (0 is `+`, 1 is `-`).
    pub fn cuboid(center: &Vector3<f64>, half_width: f64, half_height: f64, half_depth: f64) -> Self {
        let xs = [center.x + half_width, center.x - half_width];
        let ys = [center.y + half_height, center.y - half_height];
        let zs = [center.z + half_depth, center.z - half_depth];

        let mut vertices = Vec::with_capacity(8);
        for y in ys {
            for x in xs {
                for z in zs {
                    vertices.push(Vector3::new(x, y, z));
                }
            }
        }

        let faces = [
            [0, 4, 6, 2],
            [1, 3, 7, 5],
            [0, 2, 3, 1],
            [0, 1, 5, 4],
            [4, 5, 7, 6],
            [2, 6, 7, 3],
        ]
        .iter()
        .map(|indices| Face::new(indices.to_vec()))
        .collect();

        Self { vertices, faces }
    }
}
