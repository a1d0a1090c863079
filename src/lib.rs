//! Small-vector, quaternion and 3x3/4x4 matrix algebra for real-time 3D transforms.
//!
//! All types are plain `Copy` values. Matrices are column-major, angles are in radians and
//! every degenerate input maps to a documented fallback value instead of an error.

pub mod core;
pub mod util;
