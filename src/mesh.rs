//! Mesh data structures, boundary extraction and subdomain markers.
use crate::connectivity::{Connectivity, Segment2d2Connectivity, Tri3d2Connectivity};
use eyre::eyre;
use fxhash::{FxHashMap, FxHashSet};
use nalgebra::{center, Point2, Scalar};
use serde::{Deserialize, Serialize};

use crate::Real;

pub mod procedural;

/// Index-based data structure for conforming meshes (i.e. no hanging nodes).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Mesh2d<T, Connectivity>
where
    T: Scalar,
{
    vertices: Vec<Point2<T>>,
    connectivity: Vec<Connectivity>,
}

pub type TriangleMesh2d<T> = Mesh2d<T, Tri3d2Connectivity>;

impl<T, C> Mesh2d<T, C>
where
    T: Scalar,
{
    /// Construct a mesh from vertices and connectivity.
    ///
    /// The provided connectivity is expected only to return valid (i.e. in-bounds)
    /// indices, but this cannot be trusted. Users of the mesh are permitted to panic
    /// when they encounter invalid indices, so indexing must always be checked.
    pub fn from_vertices_and_connectivity(vertices: Vec<Point2<T>>, connectivity: Vec<C>) -> Self {
        Self { vertices, connectivity }
    }

    pub fn vertices(&self) -> &[Point2<T>] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Point2<T>] {
        &mut self.vertices
    }

    pub fn connectivity(&self) -> &[C] {
        &self.connectivity
    }
}

impl<T, C> Mesh2d<T, C>
where
    T: Scalar,
    C: Connectivity,
{
    /// Returns all boundary facets, i.e. facets referenced by exactly one cell.
    ///
    /// Facets are returned with the orientation they have in their owning cell.
    pub fn find_boundary_facets(&self) -> Vec<C::FaceConnectivity>
    where
        C: Connectivity<FaceConnectivity = Segment2d2Connectivity>,
    {
        let mut occurrences: FxHashMap<Segment2d2Connectivity, (Segment2d2Connectivity, usize)> =
            FxHashMap::default();
        for cell in self.connectivity() {
            for face_idx in 0..cell.num_faces() {
                let face = cell
                    .get_face_connectivity(face_idx)
                    .expect("Face index is in bounds by construction");
                let entry = occurrences.entry(face.canonicalize()).or_insert((face, 0));
                entry.1 += 1;
            }
        }

        let mut boundary: Vec<_> = occurrences
            .into_iter()
            .filter_map(|(_, (face, count))| (count == 1).then_some(face))
            .collect();
        // Hash map iteration order is unspecified; sort for reproducible output
        boundary.sort_unstable_by_key(|facet| facet.0);
        boundary
    }
}

/// Integer subdomain markers attached to boundary facets.
///
/// This plays the role of the boundary-marker file of the benchmark problem:
/// each boundary facet carries a tag identifying the boundary region it belongs
/// to (e.g. no-slip wall, inflow, outflow). The tag values themselves carry no
/// meaning to the library; their interpretation is up to the problem definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct FacetMarkers {
    facets: Vec<Segment2d2Connectivity>,
    tags: Vec<i32>,
}

impl FacetMarkers {
    /// Constructs markers from parallel facet and tag arrays.
    ///
    /// Each facet carries exactly one tag: the lengths must match, and a facet
    /// (up to orientation) may appear only once.
    pub fn from_facets_and_tags(facets: Vec<Segment2d2Connectivity>, tags: Vec<i32>) -> eyre::Result<Self> {
        if facets.len() != tags.len() {
            return Err(eyre!(
                "number of facets ({}) does not match number of tags ({})",
                facets.len(),
                tags.len()
            ));
        }
        let mut seen = FxHashSet::default();
        for facet in &facets {
            if !seen.insert(facet.canonicalize()) {
                return Err(eyre!("facet ({}, {}) is marked more than once", facet.0[0], facet.0[1]));
            }
        }
        Ok(Self { facets, tags })
    }

    /// Classifies all boundary facets of the mesh with the given predicate on
    /// facet midpoints.
    ///
    /// Classification must be total: a facet for which the classifier returns
    /// `None` is an error, since an unmarked boundary facet would silently
    /// receive natural (do-nothing) boundary conditions.
    pub fn from_classifier<T>(
        mesh: &TriangleMesh2d<T>,
        classify: impl Fn(&Point2<T>) -> Option<i32>,
    ) -> eyre::Result<Self>
    where
        T: Real,
    {
        let facets = mesh.find_boundary_facets();
        let mut tags = Vec::with_capacity(facets.len());
        for facet in &facets {
            let [a, b] = facet.0;
            let midpoint = center(&mesh.vertices()[a], &mesh.vertices()[b]);
            let tag = classify(&midpoint)
                .ok_or_else(|| eyre!("boundary facet with midpoint {} was not classified", midpoint))?;
            tags.push(tag);
        }
        Ok(Self { facets, tags })
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Segment2d2Connectivity, i32)> {
        self.facets.iter().zip(self.tags.iter().copied())
    }

    pub fn facets_with_tag(&self, tag: i32) -> impl Iterator<Item = &Segment2d2Connectivity> {
        self.iter()
            .filter_map(move |(facet, facet_tag)| (facet_tag == tag).then_some(facet))
    }

    /// All node indices on facets with the given tag, sorted and deduplicated.
    pub fn nodes_with_tag(&self, tag: i32) -> Vec<usize> {
        let mut nodes: Vec<_> = self
            .facets_with_tag(tag)
            .flat_map(|facet| facet.0.iter().copied())
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }
}
