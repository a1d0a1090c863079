use crate::core::config::{ALMOST_EQ_TOLERANCE, EPSILON};
use crate::util::xf_float;
use anyhow::Result;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::{
    fmt,
    fmt::Formatter,
    ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign},
};

/// A 2D vector of 32-bit floats.
///
/// # Examples
///
/// ```
/// use xform::core::prelude::*;
///
/// let v = Vec2 { x: 3.0, y: 4.0 };
/// assert_eq!(v.len(), 5.0);
/// ```
#[derive(Default, Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// A 3D vector of 32-bit floats.
///
/// The unit-vector constructors use a +Z forward convention:
/// [`Vec3::right`] is +X, [`Vec3::up`] is +Y and [`Vec3::forward`] is +Z.
///
/// # Examples
///
/// ```
/// use xform::core::prelude::*;
///
/// let z = Vec3::right().cross(Vec3::up());
/// assert_eq!(z, Vec3::forward());
/// ```
#[derive(Default, Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A 4D vector of 32-bit floats, used for homogeneous coordinates and matrix columns.
#[derive(Default, Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

macro_rules! impl_vector_ops {
    ($t:ident, $n:literal, { $($idx:literal => $field:ident),+ }) => {
        impl $t {
            /// Creates a vector with every component set to `v`.
            #[must_use]
            pub fn splat(v: f32) -> $t {
                $t { $($field: v),+ }
            }
            #[must_use]
            pub fn zero() -> $t {
                Self::splat(0.0)
            }
            #[must_use]
            pub fn one() -> $t {
                Self::splat(1.0)
            }

            #[must_use]
            pub fn dot(&self, other: $t) -> f32 {
                0.0 $(+ self.$field * other.$field)+
            }

            /// Returns the squared length of the vector.
            ///
            /// Prefer this over [`len`](Self::len) when only comparing lengths.
            #[must_use]
            pub fn len_squared(&self) -> f32 {
                self.dot(*self)
            }

            #[must_use]
            pub fn len(&self) -> f32 {
                self.len_squared().sqrt()
            }

            /// Returns the unit vector in the same direction.
            ///
            /// If the length is within [`EPSILON`] of zero, returns the zero vector instead of
            /// dividing.
            #[must_use]
            pub fn normed(&self) -> $t {
                let len = self.len();
                if xf_float::almost_equal(len, 0.0, EPSILON) {
                    $t::zero()
                } else {
                    *self * (1.0 / len)
                }
            }

            /// Unclamped linear interpolation: `self + t * (to - self)`.
            ///
            /// Values of `t` outside `[0, 1]` extrapolate.
            #[must_use]
            pub fn lerp(&self, to: $t, t: f32) -> $t {
                *self + (to - *self) * t
            }

            /// Returns true if every component differs by less than
            /// [`ALMOST_EQ_TOLERANCE`].
            pub fn almost_eq(&self, rhs: $t) -> bool {
                $((self.$field - rhs.$field).abs() < ALMOST_EQ_TOLERANCE)&&+
            }

            pub fn is_finite(&self) -> bool {
                $(self.$field.is_finite())&&+
            }
        }

        impl Zero for $t {
            fn zero() -> Self {
                $t::zero()
            }

            fn is_zero(&self) -> bool {
                $(self.$field == 0.0)&&+
            }
        }

        impl From<[f32; $n]> for $t {
            fn from(value: [f32; $n]) -> Self {
                let [$($field),+] = value;
                $t { $($field),+ }
            }
        }

        impl From<$t> for [f32; $n] {
            fn from(value: $t) -> Self {
                [$(value.$field),+]
            }
        }

        impl TryFrom<&[f32]> for $t {
            type Error = anyhow::Error;

            fn try_from(value: &[f32]) -> Result<Self> {
                Ok(xf_float::array_from_slice::<$n>(value, stringify!($t))?.into())
            }
        }

        impl Index<usize> for $t {
            type Output = f32;

            fn index(&self, index: usize) -> &Self::Output {
                match index {
                    $($idx => &self.$field,)+
                    _ => panic!("{}: index out of range: {}", stringify!($t), index),
                }
            }
        }
        impl IndexMut<usize> for $t {
            fn index_mut(&mut self, index: usize) -> &mut Self::Output {
                match index {
                    $($idx => &mut self.$field,)+
                    _ => panic!("{}: index out of range: {}", stringify!($t), index),
                }
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                let components: [f32; $n] = (*self).into();
                write!(f, "vec(")?;
                for (i, c) in components.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(p) = f.precision() {
                        write!(f, "{:.*}", p, c)?;
                    } else {
                        write!(f, "{}", c)?;
                    }
                }
                write!(f, ")")
            }
        }

        impl Add<$t> for $t {
            type Output = $t;

            fn add(self, rhs: $t) -> Self::Output {
                $t { $($field: self.$field + rhs.$field),+ }
            }
        }
        impl AddAssign<$t> for $t {
            fn add_assign(&mut self, rhs: $t) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl Sub<$t> for $t {
            type Output = $t;

            fn sub(self, rhs: $t) -> Self::Output {
                $t { $($field: self.$field - rhs.$field),+ }
            }
        }
        impl SubAssign<$t> for $t {
            fn sub_assign(&mut self, rhs: $t) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl Sum<$t> for $t {
            fn sum<I: Iterator<Item = $t>>(iter: I) -> Self {
                iter.fold($t::zero(), $t::add)
            }
        }

        impl Mul<f32> for $t {
            type Output = $t;

            fn mul(self, rhs: f32) -> Self::Output {
                $t { $($field: self.$field * rhs),+ }
            }
        }
        impl Mul<$t> for f32 {
            type Output = $t;

            fn mul(self, rhs: $t) -> Self::Output {
                rhs * self
            }
        }
        impl MulAssign<f32> for $t {
            fn mul_assign(&mut self, rhs: f32) {
                $(self.$field *= rhs;)+
            }
        }

        impl Div<f32> for $t {
            type Output = $t;

            fn div(self, rhs: f32) -> Self::Output {
                $t { $($field: self.$field / rhs),+ }
            }
        }
        impl DivAssign<f32> for $t {
            fn div_assign(&mut self, rhs: f32) {
                $(self.$field /= rhs;)+
            }
        }

        impl Neg for $t {
            type Output = $t;

            fn neg(self) -> Self::Output {
                $t { $($field: -self.$field),+ }
            }
        }
    };
}

impl_vector_ops!(Vec2, 2, { 0 => x, 1 => y });
impl_vector_ops!(Vec3, 3, { 0 => x, 1 => y, 2 => z });
impl_vector_ops!(Vec4, 4, { 0 => x, 1 => y, 2 => z, 3 => w });

impl Vec2 {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }
}

impl Vec3 {
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }

    /// +X.
    #[must_use]
    pub fn right() -> Vec3 {
        Vec3 { x: 1.0, y: 0.0, z: 0.0 }
    }
    /// -X.
    #[must_use]
    pub fn left() -> Vec3 {
        Vec3 { x: -1.0, y: 0.0, z: 0.0 }
    }
    /// +Y.
    #[must_use]
    pub fn up() -> Vec3 {
        Vec3 { x: 0.0, y: 1.0, z: 0.0 }
    }
    /// -Y.
    #[must_use]
    pub fn down() -> Vec3 {
        Vec3 { x: 0.0, y: -1.0, z: 0.0 }
    }
    /// +Z, into the screen.
    #[must_use]
    pub fn forward() -> Vec3 {
        Vec3 { x: 0.0, y: 0.0, z: 1.0 }
    }
    /// -Z.
    #[must_use]
    pub fn back() -> Vec3 {
        Vec3 { x: 0.0, y: 0.0, z: -1.0 }
    }

    /// Cross product; the result is perpendicular to both inputs.
    ///
    /// # Examples
    ///
    /// ```
    /// use xform::core::prelude::*;
    /// let a = Vec3::new(1.0, 2.0, 3.0);
    /// let b = Vec3::new(4.0, 5.0, 6.0);
    /// assert_eq!(a.cross(b), Vec3::new(-3.0, 6.0, -3.0));
    /// assert_eq!(a.cross(b).dot(a), 0.0);
    /// ```
    #[must_use]
    pub fn cross(&self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[must_use]
    pub fn xy(&self) -> Vec2 {
        Vec2 { x: self.x, y: self.y }
    }

    /// Appends a `w` component: `1.0` for points, `0.0` for directions.
    #[must_use]
    pub fn extend(&self, w: f32) -> Vec4 {
        Vec4 { x: self.x, y: self.y, z: self.z, w }
    }
}

impl Vec4 {
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
        Vec4 { x, y, z, w }
    }

    #[must_use]
    pub fn xyz(&self) -> Vec3 {
        Vec3 { x: self.x, y: self.y, z: self.z }
    }

    #[must_use]
    pub fn xy(&self) -> Vec2 {
        Vec2 { x: self.x, y: self.y }
    }
}

/// A linear interpolation between two values. Not clamped.
///
/// # Examples
/// ```
/// use xform::core::prelude::*;
/// assert_eq!(linalg::lerp(0.0, 10.0, 0.5), 5.0);
/// assert_eq!(linalg::lerp(0.0, 10.0, 1.5), 15.0);
/// ```
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_1_SQRT_2;

    #[test]
    fn vec3_scalar_multiplication() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a / 2.0, Vec3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn vec3_assign_ops() {
        let mut a = Vec3::new(1.0, 2.0, 3.0);
        a += Vec3::one();
        assert_eq!(a, Vec3::new(2.0, 3.0, 4.0));
        a -= Vec3::new(2.0, 2.0, 2.0);
        assert_eq!(a, Vec3::new(0.0, 1.0, 2.0));
        a *= 3.0;
        assert_eq!(a, Vec3::new(0.0, 3.0, 6.0));
        a /= 3.0;
        assert_eq!(a, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(-a, Vec3::new(0.0, -1.0, -2.0));
    }

    #[test]
    fn vec4_sum() {
        let vs = [Vec4::one(), Vec4::new(1.0, 2.0, 3.0, 4.0), Vec4::splat(-1.0)];
        assert_eq!(vs.into_iter().sum::<Vec4>(), Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(std::iter::empty::<Vec4>().sum::<Vec4>(), Vec4::zero());
    }

    #[test]
    fn dot_and_lengths() {
        assert_eq!(Vec2::new(3.0, 4.0).len(), 5.0);
        assert_eq!(Vec2::new(3.0, 4.0).len_squared(), 25.0);
        assert_eq!(Vec3::new(1.0, 2.0, 2.0).len(), 3.0);
        assert_eq!(Vec4::new(1.0, 1.0, 1.0, 1.0).len(), 2.0);
        assert_eq!(Vec3::new(1.0, 2.0, 3.0).dot(Vec3::new(4.0, -5.0, 6.0)), 12.0);
        assert_eq!(Vec4::new(1.0, 2.0, 3.0, 4.0).dot(Vec4::one()), 10.0);
    }

    #[test]
    fn normed_unit_length() {
        let v = Vec3::new(3.0, 0.0, 4.0).normed();
        assert!(v.almost_eq(Vec3::new(0.6, 0.0, 0.8)));
        assert!((v.len() - 1.0).abs() < 1e-6);
        let v = Vec2::new(1.0, 1.0).normed();
        assert!(v.almost_eq(Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2)));
    }

    #[test]
    fn normed_zero_returns_zero() {
        assert_eq!(Vec2::zero().normed(), Vec2::zero());
        assert_eq!(Vec3::zero().normed(), Vec3::zero());
        assert_eq!(Vec4::zero().normed(), Vec4::zero());
        // Within EPSILON of zero length is treated as zero.
        assert_eq!(Vec3::new(1e-7, 0.0, 0.0).normed(), Vec3::zero());
    }

    #[test]
    fn normed_idempotent() {
        for v in [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-0.001, 0.002, 0.0),
            Vec3::new(1e4, -3e3, 7.5),
        ] {
            let n = v.normed();
            assert!(n.normed().almost_eq(n));
        }
    }

    #[test]
    fn cross_right_handed() {
        assert_eq!(Vec3::right().cross(Vec3::up()), Vec3::forward());
        assert_eq!(Vec3::up().cross(Vec3::forward()), Vec3::right());
        assert_eq!(Vec3::forward().cross(Vec3::right()), Vec3::up());
        assert_eq!(Vec3::up().cross(Vec3::right()), Vec3::back());
        let a = Vec3::new(2.0, -1.0, 0.5);
        assert_eq!(a.cross(a), Vec3::zero());
    }

    #[test]
    fn lerp_unclamped() {
        let a = Vec3::zero();
        let b = Vec3::new(10.0, 20.0, 30.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vec3::new(5.0, 10.0, 15.0));
        assert_eq!(a.lerp(b, 2.0), Vec3::new(20.0, 40.0, 60.0));
        assert_eq!(a.lerp(b, -1.0), Vec3::new(-10.0, -20.0, -30.0));
        assert_eq!(lerp(1.0, 3.0, -0.5), 0.0);
    }

    #[test]
    fn unit_vectors() {
        assert_eq!(Vec3::right(), -Vec3::left());
        assert_eq!(Vec3::up(), -Vec3::down());
        assert_eq!(Vec3::forward(), -Vec3::back());
        for v in [Vec3::right(), Vec3::up(), Vec3::forward()] {
            assert_eq!(v.len(), 1.0);
        }
    }

    #[test]
    fn swizzles() {
        let pos = Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(pos.xyz(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pos.xy(), Vec2::new(1.0, 2.0));
        assert_eq!(pos.xyz().xy(), Vec2::new(1.0, 2.0));
        assert_eq!(pos.xyz().extend(0.0), Vec4::new(1.0, 2.0, 3.0, 0.0));
    }

    #[test]
    fn indexing() {
        let mut v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[3], 4.0);
        v[2] = 9.0;
        assert_eq!(v.z, 9.0);
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn indexing_out_of_range() {
        let v = Vec3::zero();
        let _component = v[3];
    }

    #[test]
    fn array_conversions() {
        let v: Vec3 = [1.0, 2.0, 3.0].into();
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
        let raw: [f32; 4] = Vec4::new(4.0, 3.0, 2.0, 1.0).into();
        assert_eq!(raw, [4.0, 3.0, 2.0, 1.0]);
        let raw: [f32; 2] = [0.5, 1.5];
        assert_eq!(Vec2::try_from(&raw[..]).unwrap(), Vec2::new(0.5, 1.5));
        assert!(Vec3::try_from(&raw[..]).is_err());
    }

    #[test]
    fn zero_trait() {
        assert!(Zero::is_zero(&Vec3::zero()));
        assert!(!Zero::is_zero(&Vec3::new(0.0, 1e-9, 0.0)));
        assert_eq!(<Vec4 as Zero>::zero(), Vec4::default());
    }

    #[test]
    fn display() {
        assert_eq!(Vec3::new(1.0, 2.5, -3.0).to_string(), "vec(1, 2.5, -3)");
        assert_eq!(format!("{:.2}", Vec2::new(1.0, 0.126)), "vec(1.00, 0.13)");
    }

    #[test]
    fn finiteness() {
        assert!(Vec3::one().is_finite());
        assert!(!Vec3::new(f32::NAN, 0.0, 0.0).is_finite());
        assert!(!Vec4::new(0.0, 0.0, 0.0, f32::INFINITY).is_finite());
    }
}
