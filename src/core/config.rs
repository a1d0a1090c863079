use std::f32::consts::PI;

/// Degeneracy threshold: zero-length vectors, zero quaternions and singular pivots.
pub const EPSILON: f32 = 1e-6;
/// Above this cosine, [`Quat::slerp`](crate::util::quat::Quat::slerp) falls back to
/// [`Quat::nlerp`](crate::util::quat::Quat::nlerp).
pub const SLERP_NLERP_THRESHOLD: f32 = 0.9995;
/// Per-component tolerance used by the `almost_eq()` helpers.
pub const ALMOST_EQ_TOLERANCE: f32 = 1e-4;
pub const DEG_TO_RAD: f32 = PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / PI;
