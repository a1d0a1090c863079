use crate::util::linalg::{Vec3, Vec4};
use crate::util::quat::Quat;
use crate::util::xf_float;
use anyhow::Result;
use itertools::{Itertools, iproduct};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fmt::Formatter,
    ops::{Add, Div, Index, IndexMut, Mul, MulAssign},
};

/// A column-major 3x3 matrix, used for rotation/orientation.
///
/// `columns[i][j]` is column `i`, row `j`. Vectors are treated as column vectors, so
/// `(a * b) * v == a * (b * v)`: the right-hand matrix applies first.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Mat3x3 {
    pub columns: [Vec3; 3],
}

/// A column-major 4x4 matrix for homogeneous 3D transforms.
///
/// `columns[i][j]` is column `i`, row `j`; the translation lives in `columns[3]`. Composition
/// follows the column-vector convention: `(a * b) * v == a * (b * v)`.
///
/// # Examples
///
/// ```
/// use xform::core::prelude::*;
/// use std::f32::consts::FRAC_PI_2;
///
/// let model = Mat4x4::translate(Vec3::new(10.0, 20.0, 30.0))
///     * Mat4x4::rotate_y(FRAC_PI_2)
///     * Mat4x4::scale(Vec3::splat(2.0));
/// let world = model * Vec4::new(1.0, 0.0, 0.0, 1.0);
/// assert!(world.almost_eq(Vec4::new(10.0, 20.0, 28.0, 1.0)));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Mat4x4 {
    pub columns: [Vec4; 4],
}

impl Mat3x3 {
    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Mat3x3 {
        Mat3x3 {
            columns: [c0, c1, c2],
        }
    }

    pub fn identity() -> Mat3x3 {
        Self::from_cols(Vec3::right(), Vec3::up(), Vec3::forward())
    }

    pub fn zero() -> Mat3x3 {
        Self::from_cols(Vec3::zero(), Vec3::zero(), Vec3::zero())
    }

    /// Right-handed rotation about +X.
    pub fn rotate_x(radians: f32) -> Mat3x3 {
        let (s, c) = radians.sin_cos();
        Self::from_cols(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, c, s),
            Vec3::new(0.0, -s, c),
        )
    }

    /// Right-handed rotation about +Y.
    pub fn rotate_y(radians: f32) -> Mat3x3 {
        let (s, c) = radians.sin_cos();
        Self::from_cols(
            Vec3::new(c, 0.0, -s),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(s, 0.0, c),
        )
    }

    /// Right-handed rotation about +Z.
    pub fn rotate_z(radians: f32) -> Mat3x3 {
        let (s, c) = radians.sin_cos();
        Self::from_cols(
            Vec3::new(c, s, 0.0),
            Vec3::new(-s, c, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Right-handed rotation about `axis`, which is normalised first.
    pub fn rotate_axis_angle(axis: Vec3, radians: f32) -> Mat3x3 {
        Quat::from_axis_angle(axis.normed(), radians).to_mat3x3()
    }

    pub fn transposed(&self) -> Mat3x3 {
        let mut rv = Mat3x3::zero();
        for (i, j) in iproduct!(0..3, 0..3) {
            rv.columns[i][j] = self.columns[j][i];
        }
        rv
    }

    /// Fast inverse for orthonormal matrices (pure rotation): returns the transpose.
    ///
    /// Only valid if the columns are unit length and mutually perpendicular. For any matrix with
    /// scale or shear use [`inverse`](Self::inverse).
    pub fn inverse_orthonormal(&self) -> Mat3x3 {
        self.transposed()
    }

    pub fn det(&self) -> f32 {
        let [a, b, c] = self.columns;
        a.dot(b.cross(c))
    }

    pub fn almost_eq(&self, rhs: Mat3x3) -> bool {
        self.columns
            .iter()
            .zip(rhs.columns.iter())
            .all(|(a, b)| a.almost_eq(*b))
    }

    /// The nine floats in column-major order.
    #[must_use]
    pub fn to_cols_array(&self) -> [f32; 9] {
        let mut rv = [0.0; 9];
        for (i, j) in iproduct!(0..3, 0..3) {
            rv[i * 3 + j] = self.columns[i][j];
        }
        rv
    }
}

impl Mat4x4 {
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Mat4x4 {
        Mat4x4 {
            columns: [c0, c1, c2, c3],
        }
    }

    pub fn identity() -> Mat4x4 {
        Self::from_cols(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn zero() -> Mat4x4 {
        Self::from_cols(Vec4::zero(), Vec4::zero(), Vec4::zero(), Vec4::zero())
    }

    /// Embeds a 3x3 block and a translation; the bottom row is `{0, 0, 0, 1}`.
    pub fn from_upper_3x3(upper: Mat3x3, translation: Vec3) -> Mat4x4 {
        let [c0, c1, c2] = upper.columns;
        Self::from_cols(
            c0.extend(0.0),
            c1.extend(0.0),
            c2.extend(0.0),
            translation.extend(1.0),
        )
    }

    pub fn upper_3x3(&self) -> Mat3x3 {
        Mat3x3::from_cols(
            self.columns[0].xyz(),
            self.columns[1].xyz(),
            self.columns[2].xyz(),
        )
    }

    pub fn translate(t: Vec3) -> Mat4x4 {
        Self::from_upper_3x3(Mat3x3::identity(), t)
    }

    /// Per-axis scale.
    pub fn scale(s: Vec3) -> Mat4x4 {
        Self::from_cols(
            Vec4::new(s.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, s.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, s.z, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// Right-handed rotation about +X.
    pub fn rotate_x(radians: f32) -> Mat4x4 {
        Self::from_upper_3x3(Mat3x3::rotate_x(radians), Vec3::zero())
    }
    /// Right-handed rotation about +Y.
    pub fn rotate_y(radians: f32) -> Mat4x4 {
        Self::from_upper_3x3(Mat3x3::rotate_y(radians), Vec3::zero())
    }
    /// Right-handed rotation about +Z.
    pub fn rotate_z(radians: f32) -> Mat4x4 {
        Self::from_upper_3x3(Mat3x3::rotate_z(radians), Vec3::zero())
    }

    /// Right-handed rotation about `axis` (Rodrigues' formula). The axis is normalised first.
    pub fn rotate_axis_angle(axis: Vec3, radians: f32) -> Mat4x4 {
        let Vec3 { x, y, z } = axis.normed();
        let (s, c) = radians.sin_cos();
        let t = 1.0 - c;

        Self::from_cols(
            Vec4::new(t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0),
            Vec4::new(t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0),
            Vec4::new(t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    fn view_from_basis(x: Vec3, y: Vec3, z: Vec3, eye: Vec3) -> Mat4x4 {
        Self::from_cols(
            Vec4::new(x.x, y.x, z.x, 0.0),
            Vec4::new(x.y, y.y, z.y, 0.0),
            Vec4::new(x.z, y.z, z.z, 0.0),
            Vec4::new(-x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0),
        )
    }

    /// Left-handed view matrix: the camera looks down +Z.
    pub fn look_at_lh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4x4 {
        let z = (target - eye).normed();
        let x = up.cross(z).normed();
        let y = z.cross(x);
        Self::view_from_basis(x, y, z, eye)
    }

    /// Right-handed view matrix: the camera looks down -Z.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4x4 {
        let z = (eye - target).normed();
        let x = up.cross(z).normed();
        let y = z.cross(x);
        Self::view_from_basis(x, y, z, eye)
    }

    /// Left-handed perspective projection, depth mapped to `[0, 1]`.
    ///
    /// ```text
    /// | w 0 0  0      |
    /// | 0 h 0  0      |
    /// | 0 0 d  -d * n |
    /// | 0 0 1  0      |
    /// ```
    /// where `h = 1 / tan(fov_y / 2)`, `w = h / aspect` and `d = f / (f - n)`.
    pub fn perspective_lh(fov_y_radians: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4x4 {
        let h = 1.0 / (fov_y_radians * 0.5).tan();
        let w = h / aspect;
        let d = z_far / (z_far - z_near);

        Self::from_cols(
            Vec4::new(w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, d, 1.0),
            Vec4::new(0.0, 0.0, -d * z_near, 0.0),
        )
    }

    /// Right-handed perspective projection, depth mapped to `[0, 1]`.
    ///
    /// Differs from [`perspective_lh`](Self::perspective_lh) in the depth term,
    /// `d = f / (n - f)`, the sign of the w-row (`-1`) and the translation term (`d * n`).
    pub fn perspective_rh(fov_y_radians: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4x4 {
        let h = 1.0 / (fov_y_radians * 0.5).tan();
        let w = h / aspect;
        let d = z_far / (z_near - z_far);

        Self::from_cols(
            Vec4::new(w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, d, -1.0),
            Vec4::new(0.0, 0.0, d * z_near, 0.0),
        )
    }

    /// Left-handed orthographic projection centred on the origin, depth mapped to `[0, 1]`.
    pub fn ortho_lh(width: f32, height: f32, z_near: f32, z_far: f32) -> Mat4x4 {
        let r = width * 0.5;
        let t = height * 0.5;

        Self::from_cols(
            Vec4::new(1.0 / r, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0 / t, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0 / (z_far - z_near), 0.0),
            Vec4::new(0.0, 0.0, z_near / (z_near - z_far), 1.0),
        )
    }

    /// Right-handed orthographic projection centred on the origin, OpenGL-style depth: `-n` maps
    /// to `-1` and `-f` to `1`.
    ///
    /// For a `[0, 1]` depth range use [`ortho_rh_zo`](Self::ortho_rh_zo).
    pub fn ortho_rh(width: f32, height: f32, z_near: f32, z_far: f32) -> Mat4x4 {
        let r = width * 0.5;
        let t = height * 0.5;

        Self::from_cols(
            Vec4::new(1.0 / r, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0 / t, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -2.0 / (z_far - z_near), 0.0),
            Vec4::new(0.0, 0.0, (z_far + z_near) / (z_near - z_far), 1.0),
        )
    }

    /// Right-handed orthographic projection centred on the origin, depth mapped to `[0, 1]`.
    pub fn ortho_rh_zo(width: f32, height: f32, z_near: f32, z_far: f32) -> Mat4x4 {
        let r = width * 0.5;
        let t = height * 0.5;

        Self::from_cols(
            Vec4::new(1.0 / r, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0 / t, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0 / (z_near - z_far), 0.0),
            Vec4::new(0.0, 0.0, z_near / (z_near - z_far), 1.0),
        )
    }

    pub fn transposed(&self) -> Mat4x4 {
        let mut rv = Mat4x4::zero();
        for (i, j) in iproduct!(0..4, 0..4) {
            rv.columns[i][j] = self.columns[j][i];
        }
        rv
    }

    /// Transforms a point (`w = 1`). No perspective divide.
    #[must_use]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * p.extend(1.0)).xyz()
    }

    /// Transforms a direction (`w = 0`), ignoring translation.
    #[must_use]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (*self * v.extend(0.0)).xyz()
    }

    pub fn almost_eq(&self, rhs: Mat4x4) -> bool {
        self.columns
            .iter()
            .zip(rhs.columns.iter())
            .all(|(a, b)| a.almost_eq(*b))
    }

    /// The sixteen floats in column-major order, as expected by GPU uniform uploads.
    #[must_use]
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut rv = [0.0; 16];
        for (i, j) in iproduct!(0..4, 0..4) {
            rv[i * 4 + j] = self.columns[i][j];
        }
        rv
    }
}

impl Default for Mat3x3 {
    fn default() -> Self {
        Self::identity()
    }
}
impl Default for Mat4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl One for Mat3x3 {
    fn one() -> Self {
        Self::identity()
    }
}
impl Zero for Mat3x3 {
    fn zero() -> Self {
        Self::zero()
    }

    fn is_zero(&self) -> bool {
        self.columns.iter().all(Zero::is_zero)
    }
}
impl One for Mat4x4 {
    fn one() -> Self {
        Self::identity()
    }
}
impl Zero for Mat4x4 {
    fn zero() -> Self {
        Self::zero()
    }

    fn is_zero(&self) -> bool {
        self.columns.iter().all(Zero::is_zero)
    }
}

impl From<[f32; 9]> for Mat3x3 {
    fn from(value: [f32; 9]) -> Self {
        let mut rv = Mat3x3::zero();
        for (i, j) in iproduct!(0..3, 0..3) {
            rv.columns[i][j] = value[i * 3 + j];
        }
        rv
    }
}
impl From<[f32; 16]> for Mat4x4 {
    fn from(value: [f32; 16]) -> Self {
        let mut rv = Mat4x4::zero();
        for (i, j) in iproduct!(0..4, 0..4) {
            rv.columns[i][j] = value[i * 4 + j];
        }
        rv
    }
}
/// Reads nine column-major floats.
impl TryFrom<&[f32]> for Mat3x3 {
    type Error = anyhow::Error;

    fn try_from(value: &[f32]) -> Result<Self> {
        Ok(xf_float::array_from_slice::<9>(value, "Mat3x3")?.into())
    }
}
/// Reads sixteen column-major floats.
impl TryFrom<&[f32]> for Mat4x4 {
    type Error = anyhow::Error;

    fn try_from(value: &[f32]) -> Result<Self> {
        Ok(xf_float::array_from_slice::<16>(value, "Mat4x4")?.into())
    }
}

impl Index<usize> for Mat3x3 {
    type Output = Vec3;

    fn index(&self, index: usize) -> &Self::Output {
        &self.columns[index]
    }
}
impl IndexMut<usize> for Mat3x3 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.columns[index]
    }
}
impl Index<usize> for Mat4x4 {
    type Output = Vec4;

    fn index(&self, index: usize) -> &Self::Output {
        &self.columns[index]
    }
}
impl IndexMut<usize> for Mat4x4 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.columns[index]
    }
}

impl fmt::Display for Mat3x3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let columns = match f.precision() {
            Some(p) => self.columns.iter().map(|c| format!("{:.*}", p, c)).join(", "),
            None => self.columns.iter().join(", "),
        };
        write!(f, "mat3[{columns}]")
    }
}
impl fmt::Display for Mat4x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let columns = match f.precision() {
            Some(p) => self.columns.iter().map(|c| format!("{:.*}", p, c)).join(", "),
            None => self.columns.iter().join(", "),
        };
        write!(f, "mat4[{columns}]")
    }
}

impl Add<Mat3x3> for Mat3x3 {
    type Output = Mat3x3;

    fn add(self, rhs: Mat3x3) -> Self::Output {
        let [a0, a1, a2] = self.columns;
        let [b0, b1, b2] = rhs.columns;
        Mat3x3::from_cols(a0 + b0, a1 + b1, a2 + b2)
    }
}
impl Add<Mat4x4> for Mat4x4 {
    type Output = Mat4x4;

    fn add(self, rhs: Mat4x4) -> Self::Output {
        let [a0, a1, a2, a3] = self.columns;
        let [b0, b1, b2, b3] = rhs.columns;
        Mat4x4::from_cols(a0 + b0, a1 + b1, a2 + b2, a3 + b3)
    }
}

impl Mul<f32> for Mat3x3 {
    type Output = Mat3x3;

    fn mul(self, rhs: f32) -> Self::Output {
        Mat3x3 {
            columns: self.columns.map(|c| c * rhs),
        }
    }
}
impl Div<f32> for Mat3x3 {
    type Output = Mat3x3;

    fn div(self, rhs: f32) -> Self::Output {
        Mat3x3 {
            columns: self.columns.map(|c| c / rhs),
        }
    }
}
impl Mul<f32> for Mat4x4 {
    type Output = Mat4x4;

    fn mul(self, rhs: f32) -> Self::Output {
        Mat4x4 {
            columns: self.columns.map(|c| c * rhs),
        }
    }
}

/// `v` as a column vector: `v.x * columns[0] + v.y * columns[1] + v.z * columns[2]`.
impl Mul<Vec3> for Mat3x3 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        self.columns[0] * rhs.x + self.columns[1] * rhs.y + self.columns[2] * rhs.z
    }
}
impl Mul<Mat3x3> for Mat3x3 {
    type Output = Mat3x3;

    fn mul(self, rhs: Mat3x3) -> Self::Output {
        Mat3x3 {
            columns: rhs.columns.map(|c| self * c),
        }
    }
}
impl MulAssign<Mat3x3> for Mat3x3 {
    fn mul_assign(&mut self, rhs: Mat3x3) {
        *self = *self * rhs;
    }
}

/// `v` as a column vector: the sum of `v[i] * columns[i]`.
impl Mul<Vec4> for Mat4x4 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Self::Output {
        self.columns[0] * rhs.x
            + self.columns[1] * rhs.y
            + self.columns[2] * rhs.z
            + self.columns[3] * rhs.w
    }
}
impl Mul<Mat4x4> for Mat4x4 {
    type Output = Mat4x4;

    fn mul(self, rhs: Mat4x4) -> Self::Output {
        Mat4x4 {
            columns: rhs.columns.map(|c| self * c),
        }
    }
}
impl MulAssign<Mat4x4> for Mat4x4 {
    fn mul_assign(&mut self, rhs: Mat4x4) {
        *self = *self * rhs;
    }
}
