//! Cell connectivity types for triangular meshes.
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Index-based connectivity of a mesh cell.
///
/// The indices returned by [`vertex_indices`](Connectivity::vertex_indices) refer to the
/// vertex buffer of the mesh that owns the connectivity.
pub trait Connectivity {
    type FaceConnectivity: Connectivity;

    fn num_faces(&self) -> usize;

    fn get_face_connectivity(&self, index: usize) -> Option<Self::FaceConnectivity>;

    fn vertex_indices(&self) -> &[usize];
}

impl Connectivity for () {
    type FaceConnectivity = ();

    fn num_faces(&self) -> usize {
        0
    }

    fn get_face_connectivity(&self, _index: usize) -> Option<Self::FaceConnectivity> {
        None
    }

    fn vertex_indices(&self) -> &[usize] {
        &[]
    }
}

/// Connectivity for a two-dimensional linear triangle.
///
/// Vertices are expected in counterclockwise order. The faces are the three edges
/// `(0, 1)`, `(1, 2)` and `(2, 0)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Tri3d2Connectivity(pub [usize; 3]);

impl Connectivity for Tri3d2Connectivity {
    type FaceConnectivity = Segment2d2Connectivity;

    fn num_faces(&self) -> usize {
        3
    }

    fn get_face_connectivity(&self, index: usize) -> Option<Self::FaceConnectivity> {
        let idx = &self.0;
        (index < 3).then(|| Segment2d2Connectivity([idx[index], idx[(index + 1) % 3]]))
    }

    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }
}

impl Deref for Tri3d2Connectivity {
    type Target = [usize; 3];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Tri3d2Connectivity {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Connectivity for a two-dimensional line segment, used for boundary facets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Segment2d2Connectivity(pub [usize; 2]);

impl Segment2d2Connectivity {
    /// The connectivity with vertex indices sorted ascending.
    ///
    /// Two facets describe the same undirected edge exactly when their canonical
    /// forms are equal.
    pub fn canonicalize(&self) -> Self {
        let [a, b] = self.0;
        if a <= b {
            Self([a, b])
        } else {
            Self([b, a])
        }
    }
}

impl Connectivity for Segment2d2Connectivity {
    type FaceConnectivity = ();

    fn num_faces(&self) -> usize {
        0
    }

    fn get_face_connectivity(&self, _index: usize) -> Option<Self::FaceConnectivity> {
        None
    }

    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }
}

impl Deref for Segment2d2Connectivity {
    type Target = [usize; 2];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Segment2d2Connectivity {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
