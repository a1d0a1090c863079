#[allow(unused_imports)]
pub use itertools::Itertools;
#[allow(unused_imports)]
pub use num_traits;

#[allow(unused_imports)]
pub use crate::{
    core::config::*,
    util::{
        assert::*,
        geometry::{distance_point_plane, distance_point_plane_through},
        linalg,
        linalg::{Vec2, Vec3, Vec4},
        mat::{Mat3x3, Mat4x4},
        quat::Quat,
        xf_float::almost_equal,
    },
};
