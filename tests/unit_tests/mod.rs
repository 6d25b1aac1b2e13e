mod mesh;
mod quadrature;
mod stokes;
