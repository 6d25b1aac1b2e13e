//! Pressure-driven Stokes flow through a rectangular channel.
//!
//! Solves the Stokes equations on the channel $[0, 5] \times [0, 1]$ with a
//! parabolic inflow profile on the left edge, no-slip walls on the top and
//! bottom edges and a zero-pressure outflow condition on the right edge. The
//! exact solution is the Poiseuille flow
//! $u = (4 y (1 - y), 0)$, $p = 8 (5 - x)$.
//!
//! A mesh can be supplied as a Gmsh MSH file whose boundary curves carry the
//! marker tags expected below; otherwise a uniform triangle mesh is generated.
use nalgebra::Vector2;

use stokeslet::io::msh::load_msh_from_file;
use stokeslet::io::vtk::FiniteElementMeshDataSetBuilder;
use stokeslet::mesh::procedural::create_rectangular_uniform_tri_mesh_2d;
use stokeslet::mesh::{FacetMarkers, TriangleMesh2d};
use stokeslet::stokes::StokesProblem;

const CHANNEL_LENGTH: f64 = 5.0;

const NO_SLIP: i32 = 0;
const INFLOW: i32 = 1;
const OUTFLOW: i32 = 2;

fn channel_mesh_and_markers() -> eyre::Result<(TriangleMesh2d<f64>, FacetMarkers)> {
    let resolution = 8;
    let mesh = create_rectangular_uniform_tri_mesh_2d(
        1.0,
        CHANNEL_LENGTH as usize,
        1,
        resolution,
        &Vector2::zeros(),
    );
    let markers = FacetMarkers::from_classifier(&mesh, |midpoint| {
        let eps = 1e-12;
        if midpoint.x < eps {
            Some(INFLOW)
        } else if midpoint.x > CHANNEL_LENGTH - eps {
            Some(OUTFLOW)
        } else if midpoint.y < eps || midpoint.y > 1.0 - eps {
            Some(NO_SLIP)
        } else {
            None
        }
    })?;
    Ok((mesh, markers))
}

fn main() -> eyre::Result<()> {
    let (mesh, markers) = match std::env::args().nth(1) {
        Some(path) => load_msh_from_file(&path)?,
        None => channel_mesh_and_markers()?,
    };
    println!(
        "Mesh has {} vertices, {} elements, {} marked boundary facets",
        mesh.vertices().len(),
        mesh.connectivity().len(),
        markers.len()
    );

    let problem = StokesProblem::new(&mesh, &markers)
        .with_velocity_bc(NO_SLIP, |_| Vector2::zeros())
        .with_velocity_bc(INFLOW, |p| Vector2::new(4.0 * p.y * (1.0 - p.y), 0.0))
        .with_pressure_bc(OUTFLOW, |_| 0.0);
    let solution = problem.solve()?;

    let max_speed = solution
        .velocity()
        .iter()
        .map(|u| u.norm())
        .fold(0.0, f64::max);
    println!("Maximum velocity magnitude: {:.6}", max_speed);

    FiniteElementMeshDataSetBuilder::from_mesh(&mesh)
        .with_title("Stokes channel flow: velocity")
        .with_point_vector_attributes("velocity", solution.velocity())
        .try_export("stokes_channel_velocity.vtk")?;
    FiniteElementMeshDataSetBuilder::from_mesh(&mesh)
        .with_title("Stokes channel flow: pressure")
        .with_point_scalar_attributes("pressure", solution.pressure())
        .try_export("stokes_channel_pressure.vtk")?;

    println!("Exported stokes_channel_velocity.vtk and stokes_channel_pressure.vtk");
    Ok(())
}
