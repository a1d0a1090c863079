use crate::core::config::{ALMOST_EQ_TOLERANCE, EPSILON, SLERP_NLERP_THRESHOLD};
use crate::util::linalg::{Vec3, Vec4};
use crate::util::xf_float;
use anyhow::Result;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fmt::Formatter,
    ops::{Add, Mul, MulAssign, Neg, Sub},
};

/// A quaternion with vector part `(x, y, z)` and scalar part `w`.
///
/// Rotation routines assume a unit quaternion (`|q| = 1`); this is not enforced. Non-unit values
/// are valid intermediates, e.g. the result of [`Quat::inverse`] on a non-unit input, but must be
/// re-normalised with [`Quat::normed`] before being used as a rotation.
///
/// # Examples
///
/// ```
/// use xform::core::prelude::*;
/// use std::f32::consts::PI;
///
/// let q = Quat::from_axis_angle(Vec3::up(), PI);
/// let v = q.rotate_vector(Vec3::right());
/// assert!(v.almost_eq(Vec3::left()));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Quat {
        Quat { x, y, z, w }
    }

    /// The identity rotation `{0, 0, 0, 1}`.
    pub fn identity() -> Quat {
        Quat {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }

    /// Rotation of `radians` about `axis`, right-handed.
    ///
    /// `axis` must already be unit length; the result is then unit length too.
    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Quat {
        let half = radians * 0.5;
        let s = half.sin();
        Quat {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: half.cos(),
        }
    }

    /// Builds a rotation from three half-angle rotations.
    ///
    /// The closed form is fixed; the result equals
    /// `from_axis_angle(Z, yaw) * from_axis_angle(Y, pitch) * from_axis_angle(X, roll)`,
    /// so under [`rotate_vector`](Self::rotate_vector) `roll` is applied first, then `pitch`,
    /// then `yaw`.
    pub fn from_euler(yaw: f32, pitch: f32, roll: f32) -> Quat {
        let (sy, cy) = (yaw * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sr, cr) = (roll * 0.5).sin_cos();

        Quat {
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
            w: cr * cp * cy + sr * sp * sy,
        }
    }

    pub fn vector_part(&self) -> Vec3 {
        Vec3 {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }

    #[must_use]
    pub fn dot(&self, other: Quat) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[must_use]
    pub fn len_squared(&self) -> f32 {
        self.dot(*self)
    }

    #[must_use]
    pub fn len(&self) -> f32 {
        self.len_squared().sqrt()
    }

    /// Rescales to unit length. A quaternion within [`EPSILON`] of zero length becomes the zero
    /// quaternion, matching [`Vec4::normed`].
    pub fn normed(&self) -> Quat {
        Vec4::from(*self).normed().into()
    }

    /// `{-x, -y, -z, w}`. Equal to the inverse for unit quaternions.
    pub fn conjugate(&self) -> Quat {
        Quat {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// General inverse, valid for non-unit quaternions: `conjugate / |q|²`.
    ///
    /// Returns [`Quat::identity`] when `|q|²` is within [`EPSILON`] of zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use xform::core::prelude::*;
    /// let q = Quat::new(0.0, 2.0, 0.0, 2.0);
    /// assert!((q * q.inverse()).almost_eq(Quat::identity()));
    /// assert_eq!(Quat::new(0.0, 0.0, 0.0, 0.0).inverse(), Quat::identity());
    /// ```
    pub fn inverse(&self) -> Quat {
        let len_squared = self.len_squared();
        if xf_float::almost_equal(len_squared, 0.0, EPSILON) {
            return Quat::identity();
        }
        self.conjugate() * (1.0 / len_squared)
    }

    /// Normalised linear interpolation. Cheap, but the angular velocity is not constant.
    pub fn nlerp(&self, to: Quat, t: f32) -> Quat {
        (*self + (to - *self) * t).normed()
    }

    /// Spherical linear interpolation along the shorter great-circle arc.
    ///
    /// If `to` lies in the opposite hemisphere it is negated first (`q` and `-q` are the same
    /// rotation). Nearly parallel inputs, with a cosine above [`SLERP_NLERP_THRESHOLD`], fall back
    /// to [`nlerp`](Self::nlerp) since `sin(θ)` is too close to zero to divide by.
    pub fn slerp(&self, to: Quat, t: f32) -> Quat {
        let mut d = self.dot(to);
        let mut to = to;
        if d < 0.0 {
            to = -to;
            d = -d;
        }

        if d > SLERP_NLERP_THRESHOLD {
            return self.nlerp(to, t);
        }

        let theta = d.clamp(-1.0, 1.0).acos();
        let sine = theta.sin();
        let wa = ((1.0 - t) * theta).sin() / sine;
        let wb = (t * theta).sin() / sine;
        *self * wa + to * wb
    }

    /// Computes `q * (v, 0) * conjugate(q)`.
    ///
    /// Assumes `self` is unit length: the conjugate stands in for the inverse.
    #[must_use]
    pub fn rotate_vector(&self, v: Vec3) -> Vec3 {
        let vq = Quat {
            x: v.x,
            y: v.y,
            z: v.z,
            w: 0.0,
        };
        (*self * vq * self.conjugate()).vector_part()
    }

    pub fn almost_eq(&self, rhs: Quat) -> bool {
        Vec4::from(*self).almost_eq(rhs.into())
    }

    /// True if `self` and `rhs` are approximately equal up to sign, i.e. describe the same
    /// rotation.
    pub fn almost_eq_rotation(&self, rhs: Quat) -> bool {
        self.almost_eq(rhs) || self.almost_eq(-rhs)
    }

    pub fn is_unit(&self) -> bool {
        (self.len_squared() - 1.0).abs() < ALMOST_EQ_TOLERANCE
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl One for Quat {
    fn one() -> Self {
        Self::identity()
    }
}

impl From<Vec4> for Quat {
    fn from(value: Vec4) -> Self {
        Quat {
            x: value.x,
            y: value.y,
            z: value.z,
            w: value.w,
        }
    }
}
impl From<Quat> for Vec4 {
    fn from(value: Quat) -> Self {
        Vec4 {
            x: value.x,
            y: value.y,
            z: value.z,
            w: value.w,
        }
    }
}
impl From<[f32; 4]> for Quat {
    fn from(value: [f32; 4]) -> Self {
        Vec4::from(value).into()
    }
}
impl From<Quat> for [f32; 4] {
    fn from(value: Quat) -> Self {
        Vec4::from(value).into()
    }
}
impl TryFrom<&[f32]> for Quat {
    type Error = anyhow::Error;

    fn try_from(value: &[f32]) -> Result<Self> {
        Ok(xf_float::array_from_slice::<4>(value, "Quat")?.into())
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(p) = f.precision() {
            write!(
                f,
                "quat({:.*}, {:.*}, {:.*}; {:.*})",
                p, self.x, p, self.y, p, self.z, p, self.w
            )
        } else {
            write!(f, "quat({}, {}, {}; {})", self.x, self.y, self.z, self.w)
        }
    }
}

/// Hamilton product.
///
/// Not commutative. Rotating by `a * b` is rotating by `b`, then by `a`, the same order as
/// [`Mat4x4`](crate::util::mat::Mat4x4) composition.
impl Mul<Quat> for Quat {
    type Output = Quat;

    fn mul(self, rhs: Quat) -> Self::Output {
        let (a, b) = (self, rhs);
        Quat {
            x: a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            y: a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            z: a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            w: a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        }
    }
}
impl MulAssign<Quat> for Quat {
    fn mul_assign(&mut self, rhs: Quat) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        self.rotate_vector(rhs)
    }
}

impl Mul<f32> for Quat {
    type Output = Quat;

    fn mul(self, rhs: f32) -> Self::Output {
        (Vec4::from(self) * rhs).into()
    }
}
impl Mul<Quat> for f32 {
    type Output = Quat;

    fn mul(self, rhs: Quat) -> Self::Output {
        rhs * self
    }
}

impl Add<Quat> for Quat {
    type Output = Quat;

    fn add(self, rhs: Quat) -> Self::Output {
        (Vec4::from(self) + Vec4::from(rhs)).into()
    }
}
impl Sub<Quat> for Quat {
    type Output = Quat;

    fn sub(self, rhs: Quat) -> Self::Output {
        (Vec4::from(self) - Vec4::from(rhs)).into()
    }
}
impl Neg for Quat {
    type Output = Quat;

    fn neg(self) -> Self::Output {
        (-Vec4::from(self)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, PI};

    fn random_unit_quat(rng: &mut StdRng) -> Quat {
        loop {
            let q = Quat::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if q.len_squared() > 0.01 {
                return q.normed();
            }
        }
    }

    #[test]
    fn identity() {
        let id = Quat::identity();
        assert_eq!(id, Quat::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(Quat::default(), id);
        assert_eq!(<Quat as One>::one(), id);
        let v = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(id.rotate_vector(v), v);
    }

    #[test]
    fn from_axis_angle_unit() {
        let q = Quat::from_axis_angle(Vec3::new(1.0, 1.0, 1.0).normed(), 2.0 * FRAC_PI_3);
        assert!(q.is_unit());
        // 120 degrees about (1,1,1) cycles the axes.
        assert!(q.rotate_vector(Vec3::right()).almost_eq(Vec3::up()));
        assert!(q.rotate_vector(Vec3::up()).almost_eq(Vec3::forward()));
    }

    #[test]
    fn rotate_vector_right_handed() {
        let v = Quat::from_axis_angle(Vec3::up(), PI).rotate_vector(Vec3::right());
        assert!(v.almost_eq(Vec3::left()));
        let v = Quat::from_axis_angle(Vec3::up(), FRAC_PI_2).rotate_vector(Vec3::right());
        assert!(v.almost_eq(Vec3::back()));
        let v = Quat::from_axis_angle(Vec3::forward(), FRAC_PI_2).rotate_vector(Vec3::right());
        assert!(v.almost_eq(Vec3::up()));
        let v = Quat::from_axis_angle(Vec3::right(), FRAC_PI_2) * Vec3::up();
        assert!(v.almost_eq(Vec3::forward()));
    }

    #[test]
    fn multiply_order() {
        let a = Quat::from_axis_angle(Vec3::up(), FRAC_PI_2);
        let b = Quat::from_axis_angle(Vec3::right(), FRAC_PI_2);
        let v = Vec3::new(0.3, -1.2, 2.0);
        let composed = (a * b).rotate_vector(v);
        assert!(composed.almost_eq(a.rotate_vector(b.rotate_vector(v))));
        assert!(!(a * b).almost_eq(b * a));

        let mut c = a;
        c *= b;
        assert_eq!(c, a * b);
    }

    #[test]
    fn multiply_exact_terms() {
        let a = Quat::new(1.0, 2.0, 3.0, 4.0);
        let b = Quat::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(a * b, Quat::new(24.0, 48.0, 48.0, -6.0));
        assert_eq!(b * a, Quat::new(32.0, 32.0, 56.0, -6.0));
    }

    #[test]
    fn from_euler_single_axes() {
        assert_eq!(Quat::from_euler(0.0, 0.0, 0.0), Quat::identity());
        let angle = 0.7;
        assert!(Quat::from_euler(angle, 0.0, 0.0)
            .almost_eq(Quat::from_axis_angle(Vec3::forward(), angle)));
        assert!(Quat::from_euler(0.0, angle, 0.0)
            .almost_eq(Quat::from_axis_angle(Vec3::up(), angle)));
        assert!(Quat::from_euler(0.0, 0.0, angle)
            .almost_eq(Quat::from_axis_angle(Vec3::right(), angle)));
    }

    #[test]
    fn from_euler_composition() {
        let (yaw, pitch, roll) = (0.4, -1.1, 2.3);
        let expected = Quat::from_axis_angle(Vec3::forward(), yaw)
            * Quat::from_axis_angle(Vec3::up(), pitch)
            * Quat::from_axis_angle(Vec3::right(), roll);
        let q = Quat::from_euler(yaw, pitch, roll);
        assert!(q.almost_eq(expected));
        assert!(q.is_unit());
    }

    #[test]
    fn conjugate_and_inverse() {
        let q = Quat::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q.conjugate(), Quat::new(-1.0, -2.0, -3.0, 4.0));
        assert!((q * q.inverse()).almost_eq(Quat::identity()));
        assert!((q.inverse() * q).almost_eq(Quat::identity()));

        let unit = q.normed();
        assert!(unit.inverse().almost_eq(unit.conjugate()));
    }

    #[test]
    fn inverse_of_zero_is_identity() {
        assert_eq!(Quat::new(0.0, 0.0, 0.0, 0.0).inverse(), Quat::identity());
        assert_eq!(Quat::new(1e-4, 0.0, 0.0, 0.0).inverse(), Quat::identity());
    }

    #[test]
    fn normed() {
        assert!(Quat::new(0.0, 0.0, 0.0, 3.0).normed().almost_eq(Quat::identity()));
        assert_eq!(
            Quat::new(0.0, 0.0, 0.0, 0.0).normed(),
            Quat::new(0.0, 0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn nlerp_normalises() {
        let a = Quat::identity();
        let b = Quat::from_axis_angle(Vec3::up(), FRAC_PI_2);
        let mid = a.nlerp(b, 0.5);
        assert!(mid.is_unit());
        assert!(mid.almost_eq(Quat::from_axis_angle(Vec3::up(), FRAC_PI_4)));
        assert!(a.nlerp(b, 0.0).almost_eq(a));
        assert!(a.nlerp(b, 1.0).almost_eq(b));
    }

    #[test]
    fn slerp_boundaries() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let a = random_unit_quat(&mut rng);
            let b = random_unit_quat(&mut rng);
            assert!(a.slerp(b, 0.0).almost_eq(a), "{a} -> {b}");
            assert!(a.slerp(b, 1.0).almost_eq_rotation(b), "{a} -> {b}");
            for t in [0.0, 0.25, 0.5, 1.0] {
                assert!(a.slerp(a, t).almost_eq(a));
            }
        }
    }

    #[test]
    fn slerp_constant_angular_velocity() {
        let a = Quat::identity();
        let b = Quat::from_axis_angle(Vec3::forward(), 2.0);
        for t in [0.1, 0.3, 0.5, 0.9] {
            let q = a.slerp(b, t);
            assert!(q.almost_eq(Quat::from_axis_angle(Vec3::forward(), 2.0 * t)));
            assert!(q.is_unit());
        }
    }

    #[test]
    fn slerp_takes_shortest_path() {
        let a = Quat::identity();
        let b = Quat::from_axis_angle(Vec3::up(), FRAC_PI_2);
        let via_negated = a.slerp(-b, 0.5);
        assert!(via_negated.almost_eq(Quat::from_axis_angle(Vec3::up(), FRAC_PI_4)));
        assert!(a.slerp(-b, 1.0).almost_eq(b));
    }

    #[test]
    fn slerp_near_parallel_falls_back_to_nlerp() {
        let a = Quat::identity();
        let b = Quat::from_axis_angle(Vec3::right(), 0.01);
        assert!(a.dot(b) > SLERP_NLERP_THRESHOLD);
        let q = a.slerp(b, 0.5);
        assert_eq!(q, a.nlerp(b, 0.5));
        assert!(q.almost_eq(Quat::from_axis_angle(Vec3::right(), 0.005)));
    }

    #[test]
    fn rotate_vector_preserves_length() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let q = random_unit_quat(&mut rng);
            let v = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let rotated = q.rotate_vector(v);
            assert!((rotated.len() - v.len()).abs() < 1e-3);
            assert!((q.conjugate().rotate_vector(rotated) - v).len() < 1e-3);
        }
    }

    #[test]
    fn conversions_and_display() {
        let q = Quat::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Vec4::from(q), Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(Quat::from([1.0, 2.0, 3.0, 4.0]), q);
        let raw: [f32; 4] = q.into();
        assert_eq!(Quat::try_from(&raw[..]).unwrap(), q);
        assert!(Quat::try_from(&raw[..3]).is_err());
        assert_eq!(q.to_string(), "quat(1, 2, 3; 4)");
        assert_eq!(format!("{:.1}", q), "quat(1.0, 2.0, 3.0; 4.0)");
    }
}
