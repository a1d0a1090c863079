use std::f32::consts::{FRAC_PI_2, PI};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::fmt::time::OffsetTime;
use xform::core::prelude::*;

fn setup_log() {
    let timer = OffsetTime::new(
        time::UtcOffset::UTC,
        time::macros::format_description!("[hour]:[minute]:[second].[subsecond digits:6]"),
    );
    tracing_subscriber::fmt()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_target(false)
                .with_source_location(true)
                .with_timer(timer),
        )
        .init();
}

fn main() -> Result<()> {
    setup_log();
    run_vectors()?;
    run_quaternions()?;
    run_transforms();
    run_inverses();
    info!("all checks passed");
    Ok(())
}

fn run_vectors() -> Result<()> {
    let raw: [f32; 4] = [1.0, 2.0, 3.0, 4.0];
    let v = Vec4::try_from(&raw[..])?;
    info!("v = {v}, v.xyz = {}, v.xy = {}", v.xyz(), v.xy());
    check_eq!(v.xyz(), Vec3::new(1.0, 2.0, 3.0));
    check_eq!(v.xy(), Vec2::new(1.0, 2.0));

    let n = Vec3::new(3.0, 0.0, 4.0).normed();
    info!("normed = {n:.3}");
    check_lt!((n.len() - 1.0).abs(), EPSILON);
    check_eq!(Vec3::zero().normed(), Vec3::zero());

    let r = Vec3::new(1.0, -1.0, 0.0).reflect(Vec3::up());
    let t = Vec3::new(1.0, -0.2, 0.0).normed().refract(Vec3::up(), 1.5);
    info!("reflect = {r}, refract (total internal reflection) = {t}");
    check_almost_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    check_eq!(t, Vec3::zero());
    Ok(())
}

fn run_quaternions() -> Result<()> {
    let q = Quat::from_axis_angle(Vec3::up(), PI);
    let rotated = q.rotate_vector(Vec3::right());
    info!("180 degrees about +Y: {} -> {rotated:.4}", Vec3::right());
    check_almost_eq!(rotated, Vec3::left());

    let raw: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    check_eq!(Quat::try_from(&raw[..])?, Quat::identity());

    let axis = Vec3::new(1.0, 2.0, 3.0).normed();
    let q = Quat::from_axis_angle(axis, 1.2);
    let back = q.to_mat3x3().to_quat();
    info!("axis-angle round trip: {q:.4} -> {back:.4}");
    check!(back.almost_eq_rotation(q));

    let a = Quat::identity();
    let b = Quat::from_axis_angle(Vec3::forward(), FRAC_PI_2);
    let mid = a.slerp(b, 0.5);
    info!("slerp halfway = {mid:.4}");
    check_almost_eq!(mid, Quat::from_axis_angle(Vec3::forward(), FRAC_PI_2 / 2.0));
    Ok(())
}

fn run_transforms() {
    let model = Mat4x4::translate(Vec3::new(10.0, 20.0, 30.0))
        * Mat4x4::rotate_y(FRAC_PI_2)
        * Mat4x4::scale(Vec3::splat(2.0));
    let world = model * Vec4::new(1.0, 0.0, 0.0, 1.0);
    info!("translate * rotate_y * scale: {world:.3}");
    check_almost_eq!(world, Vec4::new(10.0, 20.0, 28.0, 1.0));

    let rot = Mat3x3::rotate_axis_angle(Vec3::new(0.0, 1.0, 1.0), 0.7);
    info!("rotation = {rot:.3}");
    check_almost_eq!(rot * rot.inverse_orthonormal(), Mat3x3::identity());

    let view = Mat4x4::look_at_lh(Vec3::new(0.0, 0.0, -5.0), Vec3::zero(), Vec3::up());
    let proj = Mat4x4::perspective_lh(FRAC_PI_2, 16.0 / 9.0, 0.1, 100.0);
    let clip = proj * view * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let depth = clip.z / clip.w;
    info!("origin depth = {depth:.5}");
    check!(depth > 0.0 && depth < 1.0);
}

fn run_inverses() {
    let model = Mat4x4::translate(Vec3::new(1.0, 2.0, 3.0))
        * Mat4x4::rotate_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.5)
        * Mat4x4::scale(Vec3::splat(3.0));
    let fast = model.affine_inverse();
    let general = model.inverse();
    info!("affine inverse = {fast:.3}");
    check_almost_eq!(fast, general);
    check_almost_eq!(model * fast, Mat4x4::identity());

    let singular = Mat4x4::scale(Vec3::new(1.0, 1.0, 0.0));
    check_eq!(singular.inverse(), Mat4x4::identity());

    let stretched = Mat4x4::scale(Vec3::new(2.0, 1.0, 1.0));
    let tangent = stretched.transform_vector(Vec3::new(1.0, 1.0, 0.0));
    let normal = stretched.normal_matrix() * Vec3::new(1.0, -1.0, 0.0);
    info!("normal matrix: tangent {tangent}, normal {normal}");
    check_lt!(tangent.dot(normal).abs(), EPSILON);
}
