//! Export of meshes and nodal fields to VTK files for visualization.
use crate::connectivity::{Connectivity, Segment2d2Connectivity, Tri3d2Connectivity};
use crate::mesh::Mesh2d;
use eyre::eyre;
use nalgebra::{Scalar, Vector2};
use num::ToPrimitive;
use std::convert::TryInto;
use std::path::Path;
use vtkio::model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, DataSet, ElementType, Piece,
    UnstructuredGridPiece, Version, VertexNumbers, Vtk,
};

/// Represents connectivity that is supported by VTK.
pub trait VtkCellConnectivity: Connectivity {
    fn num_nodes(&self) -> usize {
        self.vertex_indices().len()
    }

    fn cell_type(&self) -> CellType;

    /// Write connectivity for the VTK cell.
    ///
    /// Panics if `connectivity.len() != self.num_nodes()`.
    fn write_vtk_connectivity(&self, connectivity: &mut [usize]) {
        assert_eq!(connectivity.len(), self.vertex_indices().len());
        connectivity.clone_from_slice(self.vertex_indices());
    }
}

impl VtkCellConnectivity for Segment2d2Connectivity {
    fn cell_type(&self) -> CellType {
        CellType::Line
    }
}

impl VtkCellConnectivity for Tri3d2Connectivity {
    fn cell_type(&self) -> CellType {
        CellType::Triangle
    }
}

enum PointAttribute {
    Scalars { name: String, components: Vec<f64> },
    /// Components are padded to three entries per point, as VTK expects.
    Vectors { name: String, components: Vec<f64> },
}

impl PointAttribute {
    fn to_vtk_attribute(&self) -> Attribute {
        match self {
            PointAttribute::Scalars { name, components } => Attribute::DataArray(DataArray {
                name: name.clone(),
                elem: ElementType::Scalars {
                    num_comp: 1,
                    lookup_table: None,
                },
                data: components.clone().into(),
            }),
            PointAttribute::Vectors { name, components } => Attribute::DataArray(DataArray {
                name: name.clone(),
                elem: ElementType::Vectors,
                data: components.clone().into(),
            }),
        }
    }
}

/// Builds a VTK dataset from a finite element mesh and associated nodal fields.
pub struct FiniteElementMeshDataSetBuilder<'a, T, C>
where
    T: Scalar,
{
    mesh: &'a Mesh2d<T, C>,
    title: Option<String>,
    point_attributes: Vec<PointAttribute>,
}

impl<'a, T, C> FiniteElementMeshDataSetBuilder<'a, T, C>
where
    T: Scalar,
{
    pub fn from_mesh(mesh: &'a Mesh2d<T, C>) -> Self {
        Self {
            mesh,
            title: None,
            point_attributes: Vec::new(),
        }
    }
}

impl<'a, T, C> FiniteElementMeshDataSetBuilder<'a, T, C>
where
    T: Scalar + ToPrimitive,
{
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attaches a scalar field with one value per mesh vertex.
    pub fn with_point_scalar_attributes(mut self, name: impl Into<String>, values: &[T]) -> Self {
        let components = values.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect();
        self.point_attributes.push(PointAttribute::Scalars {
            name: name.into(),
            components,
        });
        self
    }

    /// Attaches a vector field with one 2-vector per mesh vertex. The third
    /// component is padded with zeros.
    pub fn with_point_vector_attributes(mut self, name: impl Into<String>, values: &[Vector2<T>]) -> Self {
        let mut components = Vec::with_capacity(3 * values.len());
        for v in values {
            components.push(v.x.to_f64().unwrap_or(f64::NAN));
            components.push(v.y.to_f64().unwrap_or(f64::NAN));
            components.push(0.0);
        }
        self.point_attributes.push(PointAttribute::Vectors {
            name: name.into(),
            components,
        });
        self
    }

    pub fn try_build(&self) -> eyre::Result<DataSet>
    where
        C: VtkCellConnectivity,
    {
        let points: Vec<f64> = {
            let mut points = Vec::with_capacity(3 * self.mesh.vertices().len());
            for v in self.mesh.vertices() {
                points.push(v.x.to_f64().ok_or_else(|| eyre!("vertex coordinate not representable as f64"))?);
                points.push(v.y.to_f64().ok_or_else(|| eyre!("vertex coordinate not representable as f64"))?);
                // VTK always stores three-dimensional points
                points.push(0.0);
            }
            points
        };

        for attribute in &self.point_attributes {
            let (name, len_per_point) = match attribute {
                PointAttribute::Scalars { name, components } => (name, components.len()),
                PointAttribute::Vectors { name, components } => (name, components.len() / 3),
            };
            if len_per_point != self.mesh.vertices().len() {
                return Err(eyre!(
                    "attribute '{}' has {} entries but the mesh has {} vertices",
                    name,
                    len_per_point,
                    self.mesh.vertices().len()
                ));
            }
        }

        // Vertices are laid out as N, i_1, i_2, ..., i_N per cell
        let mut vertices = Vec::new();
        let mut cell_types = Vec::new();
        let mut vertex_indices = Vec::new();
        for cell in self.mesh.connectivity() {
            vertices.push(
                cell.num_nodes()
                    .try_into()
                    .map_err(|_| eyre!("cell node count does not fit in u32"))?,
            );

            vertex_indices.clear();
            vertex_indices.resize(cell.num_nodes(), 0);
            cell.write_vtk_connectivity(&mut vertex_indices);

            for &idx in &vertex_indices {
                vertices.push(idx.try_into().map_err(|_| eyre!("vertex index does not fit in u32"))?);
            }
            cell_types.push(cell.cell_type());
        }

        let mut data = Attributes::new();
        for attribute in &self.point_attributes {
            data.point.push(attribute.to_vtk_attribute());
        }

        let piece = UnstructuredGridPiece {
            points: points.into(),
            cells: Cells {
                cell_verts: VertexNumbers::Legacy {
                    num_cells: self.mesh.connectivity().len() as u32,
                    vertices,
                },
                types: cell_types,
            },
            data,
        };

        Ok(DataSet::UnstructuredGrid {
            meta: None,
            pieces: vec![Piece::Inline(Box::new(piece))],
        })
    }

    /// Convenience function for directly exporting the dataset to a file.
    pub fn try_export(&self, filename: impl AsRef<Path>) -> eyre::Result<()>
    where
        C: VtkCellConnectivity,
    {
        let filepath = filename.as_ref();
        let fallback_title = filepath
            .file_stem()
            .map(|os_str| os_str.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string());
        let dataset = self.try_build()?;
        Vtk {
            version: Version { major: 4, minor: 1 },
            // If we don't have a title then just make the file stem the title
            title: self.title.clone().unwrap_or(fallback_title),
            byte_order: ByteOrder::BigEndian,
            data: dataset,
            file_path: None,
        }
        .export(filepath)
        .map_err(|e| eyre!("failed to export VTK file: {}", e))?;
        Ok(())
    }
}
