//! Loading of triangle meshes and boundary markers from Gmsh MSH files.
//!
//! The mesh is read from the 2D (triangle) element blocks; boundary markers are
//! read from the 1D (line) element blocks, where the marker tag of a facet is the
//! tag of the curve entity the line element belongs to. Meshes prepared for this
//! loader should therefore number their boundary curves according to the intended
//! marker scheme (e.g. 0 = no-slip wall, 1 = inflow, 2 = outflow).
use crate::connectivity::{Segment2d2Connectivity, Tri3d2Connectivity};
use crate::mesh::{FacetMarkers, TriangleMesh2d};
use crate::Real;
use eyre::{eyre, Context};
use log::warn;
use nalgebra::Point2;
use num::ToPrimitive;
use std::path::Path;

/// Loads a [`TriangleMesh2d`] and its boundary [`FacetMarkers`] from a Gmsh MSH
/// file at the given path.
pub fn load_msh_from_file<T, P: AsRef<Path>>(file_path: P) -> eyre::Result<(TriangleMesh2d<T>, FacetMarkers)>
where
    T: Real,
{
    let msh_bytes = std::fs::read(file_path).wrap_err("failed to read file")?;
    load_msh_from_bytes(&msh_bytes).wrap_err("failed to load mesh from msh file")
}

/// Loads a [`TriangleMesh2d`] and its boundary [`FacetMarkers`] by parsing the
/// given bytes as a Gmsh MSH file.
pub fn load_msh_from_bytes<T>(bytes: &[u8]) -> eyre::Result<(TriangleMesh2d<T>, FacetMarkers)>
where
    T: Real,
{
    let mut msh_file = mshio::parse_msh_bytes(bytes).map_err(|e| eyre!("failed to parse msh file: {}", e))?;

    let msh_nodes = msh_file
        .data
        .nodes
        .take()
        .ok_or_else(|| eyre!("MSH file does not contain nodes"))?;
    let msh_elements = msh_file
        .data
        .elements
        .take()
        .ok_or_else(|| eyre!("MSH file does not contain elements"))?;

    // Collect all mesh vertices
    let mut vertices = Vec::new();
    for node_block in &msh_nodes.node_blocks {
        // Node tags must be consecutive so that element connectivity can refer to
        // vertices by index
        if node_block.node_tags.is_some() {
            return Err(eyre!("node block tags are not consecutive in msh file"));
        }
        for node in &node_block.nodes {
            if node.z != 0.0 {
                warn!("node has nonzero z coordinate {}; it will be projected onto the plane", node.z);
            }
            vertices.push(Point2::new(
                T::from_f64(node.x).ok_or_else(|| eyre!("failed to convert node coordinate from f64"))?,
                T::from_f64(node.y).ok_or_else(|| eyre!("failed to convert node coordinate from f64"))?,
            ));
        }
    }

    let mut connectivity = Vec::new();
    let mut facets = Vec::new();
    let mut tags = Vec::new();

    for element_block in &msh_elements.element_blocks {
        if element_block.element_tags.is_some() {
            return Err(eyre!("element block tags are not consecutive in msh file"));
        }
        let entity_dim = element_block
            .entity_dim
            .to_usize()
            .ok_or_else(|| eyre!("error converting element block entity dimension to usize"))?;

        match (element_block.element_type, entity_dim) {
            (mshio::ElementType::Tri3, 2) => {
                for element in &element_block.elements {
                    if element.nodes.len() < 3 {
                        return Err(eyre!("not enough nodes to initialize triangle connectivity"));
                    }
                    connectivity.push(Tri3d2Connectivity([
                        element.nodes[0] as usize - 1,
                        element.nodes[1] as usize - 1,
                        element.nodes[2] as usize - 1,
                    ]));
                }
            }
            (mshio::ElementType::Lin2, 1) => {
                let marker = element_block
                    .entity_tag
                    .to_i32()
                    .ok_or_else(|| eyre!("error converting curve entity tag to i32"))?;
                for element in &element_block.elements {
                    if element.nodes.len() < 2 {
                        return Err(eyre!("not enough nodes to initialize facet connectivity"));
                    }
                    facets.push(Segment2d2Connectivity([
                        element.nodes[0] as usize - 1,
                        element.nodes[1] as usize - 1,
                    ]));
                    tags.push(marker);
                }
            }
            // Points and other element types are irrelevant for the 2D mesh
            _ => {}
        }
    }

    if connectivity.is_empty() {
        return Err(eyre!("MSH file does not contain any triangle elements"));
    }

    for conn in &connectivity {
        if conn.0.iter().any(|&idx| idx >= vertices.len()) {
            return Err(eyre!("MSH element references node index out of bounds"));
        }
    }
    for facet in &facets {
        if facet.0.iter().any(|&idx| idx >= vertices.len()) {
            return Err(eyre!("MSH boundary element references node index out of bounds"));
        }
    }

    let mesh = TriangleMesh2d::from_vertices_and_connectivity(vertices, connectivity);
    let markers = FacetMarkers::from_facets_and_tags(facets, tags)?;
    Ok((mesh, markers))
}
