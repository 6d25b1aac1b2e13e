//! Basic procedural mesh generation routines.
use crate::connectivity::Tri3d2Connectivity;
use crate::mesh::TriangleMesh2d;
use crate::Real;
use nalgebra::{Point2, Vector2};

/// Generates an axis-aligned rectangular uniform triangle mesh given a unit length,
/// dimensions as multipliers of the unit length and the number of cells per unit length.
///
/// Each grid square is split into two counterclockwise triangles along its
/// bottom-left to top-right diagonal.
pub fn create_rectangular_uniform_tri_mesh_2d<T>(
    unit_length: T,
    units_x: usize,
    units_y: usize,
    cells_per_unit: usize,
    bottom_left: &Vector2<T>,
) -> TriangleMesh2d<T>
where
    T: Real,
{
    if cells_per_unit == 0 || units_x == 0 || units_y == 0 {
        return TriangleMesh2d::from_vertices_and_connectivity(Vec::new(), Vec::new());
    }

    let cell_size = unit_length / T::from_usize(cells_per_unit).expect("Must be able to fit usize in T");
    let num_cells_x = units_x * cells_per_unit;
    let num_cells_y = units_y * cells_per_unit;
    let num_vertices_x = num_cells_x + 1;
    let num_vertices_y = num_cells_y + 1;

    let to_global_vertex_index = |i, j| num_vertices_x * j + i;

    let mut vertices = Vec::with_capacity(num_vertices_x * num_vertices_y);
    for j in 0..num_vertices_y {
        for i in 0..num_vertices_x {
            let i_as_t = T::from_usize(i).expect("Must be able to fit usize in T");
            let j_as_t = T::from_usize(j).expect("Must be able to fit usize in T");
            let v = bottom_left + Vector2::new(i_as_t, j_as_t) * cell_size;
            vertices.push(Point2::from(v));
        }
    }

    let mut cells = Vec::with_capacity(2 * num_cells_x * num_cells_y);
    for j in 0..num_cells_y {
        for i in 0..num_cells_x {
            let bottom_left = to_global_vertex_index(i, j);
            let bottom_right = to_global_vertex_index(i + 1, j);
            let top_right = to_global_vertex_index(i + 1, j + 1);
            let top_left = to_global_vertex_index(i, j + 1);
            cells.push(Tri3d2Connectivity([bottom_left, bottom_right, top_right]));
            cells.push(Tri3d2Connectivity([bottom_left, top_right, top_left]));
        }
    }

    TriangleMesh2d::from_vertices_and_connectivity(vertices, cells)
}

pub fn create_unit_square_uniform_tri_mesh_2d<T>(cells_per_dim: usize) -> TriangleMesh2d<T>
where
    T: Real,
{
    create_rectangular_uniform_tri_mesh_2d(T::one(), 1, 1, cells_per_dim, &Vector2::zeros())
}
