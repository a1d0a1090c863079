//! Quaternion/matrix conversion and matrix inversion.
//!
//! These are the numerically sensitive routines: branch selection in [`Mat3x3::to_quat`],
//! pivoting in [`Mat4x4::inverse`], and the degenerate-input fallbacks of each inverse.
use crate::core::config::EPSILON;
use crate::util::linalg::Vec3;
use crate::util::mat::{Mat3x3, Mat4x4};
use crate::util::quat::Quat;
use itertools::iproduct;

impl Quat {
    /// The rotation matrix `R` with `R * v == self.rotate_vector(v)`.
    ///
    /// Assumes `self` is unit length; no renormalisation is performed.
    pub fn to_mat3x3(&self) -> Mat3x3 {
        let Quat { x, y, z, w } = *self;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);

        Mat3x3::from_cols(
            Vec3::new(1.0 - 2.0 * (yy + zz), 2.0 * (xy + wz), 2.0 * (xz - wy)),
            Vec3::new(2.0 * (xy - wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + wx)),
            Vec3::new(2.0 * (xz + wy), 2.0 * (yz - wx), 1.0 - 2.0 * (xx + yy)),
        )
    }

    /// As [`to_mat3x3`](Self::to_mat3x3), embedded in a 4x4 matrix with no translation.
    pub fn to_mat4x4(&self) -> Mat4x4 {
        Mat4x4::from_upper_3x3(self.to_mat3x3(), Vec3::zero())
    }
}

impl Mat3x3 {
    /// Extracts the unit quaternion of a rotation matrix.
    ///
    /// Branches on the largest of the trace and the three diagonal entries, so the square root
    /// is always taken of a value of at least one.
    pub fn to_quat(&self) -> Quat {
        // Row r, column c.
        let m = |r: usize, c: usize| self.columns[c][r];
        let trace = m(0, 0) + m(1, 1) + m(2, 2);

        if trace > 0.0 {
            let s = 2.0 * (trace + 1.0).sqrt();
            Quat::new(
                (m(2, 1) - m(1, 2)) / s,
                (m(0, 2) - m(2, 0)) / s,
                (m(1, 0) - m(0, 1)) / s,
                0.25 * s,
            )
        } else if m(0, 0) > m(1, 1) && m(0, 0) > m(2, 2) {
            let s = 2.0 * (1.0 + m(0, 0) - m(1, 1) - m(2, 2)).sqrt();
            Quat::new(
                0.25 * s,
                (m(0, 1) + m(1, 0)) / s,
                (m(0, 2) + m(2, 0)) / s,
                (m(2, 1) - m(1, 2)) / s,
            )
        } else if m(1, 1) > m(2, 2) {
            let s = 2.0 * (1.0 + m(1, 1) - m(0, 0) - m(2, 2)).sqrt();
            Quat::new(
                (m(0, 1) + m(1, 0)) / s,
                0.25 * s,
                (m(1, 2) + m(2, 1)) / s,
                (m(0, 2) - m(2, 0)) / s,
            )
        } else {
            let s = 2.0 * (1.0 + m(2, 2) - m(0, 0) - m(1, 1)).sqrt();
            Quat::new(
                (m(0, 2) + m(2, 0)) / s,
                (m(1, 2) + m(2, 1)) / s,
                0.25 * s,
                (m(1, 0) - m(0, 1)) / s,
            )
        }
    }

    /// General inverse via the adjugate. Returns the identity if the matrix is singular, i.e.
    /// `|det|` is at most [`EPSILON`] times the product of the column lengths.
    ///
    /// For pure rotations prefer [`inverse_orthonormal`](Self::inverse_orthonormal).
    pub fn inverse(&self) -> Mat3x3 {
        let [a, b, c] = self.columns;
        let r0 = b.cross(c);
        let r1 = c.cross(a);
        let r2 = a.cross(b);
        let det = a.dot(r0);
        if det.abs() <= EPSILON * a.len() * b.len() * c.len() {
            return Mat3x3::identity();
        }
        Mat3x3::from_cols(r0, r1, r2).transposed() / det
    }
}

impl Mat4x4 {
    /// General inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Returns the identity if any pivot falls below [`EPSILON`], i.e. the matrix is singular or
    /// too close to it. On ties between candidate pivot rows, the topmost row is used.
    ///
    /// # Examples
    ///
    /// ```
    /// use xform::core::prelude::*;
    ///
    /// let m = Mat4x4::perspective_lh(1.0, 1.5, 0.1, 100.0);
    /// assert!((m * m.inverse()).almost_eq(Mat4x4::identity()));
    ///
    /// let singular = Mat4x4::scale(Vec3::new(1.0, 0.0, 1.0));
    /// assert_eq!(singular.inverse(), Mat4x4::identity());
    /// ```
    pub fn inverse(&self) -> Mat4x4 {
        // Row-major working copies: a[row][col].
        let mut a = [[0.0f32; 4]; 4];
        for (r, c) in iproduct!(0..4, 0..4) {
            a[r][c] = self.columns[c][r];
        }
        let mut inv = [[0.0f32; 4]; 4];
        for (i, row) in inv.iter_mut().enumerate() {
            row[i] = 1.0;
        }

        for i in 0..4 {
            let mut pivot = i;
            let mut max = a[i][i].abs();
            for j in (i + 1)..4 {
                if a[j][i].abs() > max {
                    max = a[j][i].abs();
                    pivot = j;
                }
            }
            if max < EPSILON {
                return Mat4x4::identity();
            }

            a.swap(i, pivot);
            inv.swap(i, pivot);

            let scale = 1.0 / a[i][i];
            for c in 0..4 {
                a[i][c] *= scale;
                inv[i][c] *= scale;
            }

            let (pivot_row, pivot_inv) = (a[i], inv[i]);
            for r in (0..4).filter(|&r| r != i) {
                let factor = a[r][i];
                for c in 0..4 {
                    a[r][c] -= factor * pivot_row[c];
                    inv[r][c] -= factor * pivot_inv[c];
                }
            }
        }

        let mut rv = Mat4x4::zero();
        for (r, c) in iproduct!(0..4, 0..4) {
            rv.columns[c][r] = inv[r][c];
        }
        rv
    }

    /// Fast inverse for rotation + uniform scale + translation.
    ///
    /// The upper 3x3 block `sR` is inverted as `transpose / s²`, where `s²` is read from the
    /// first column; the translation is then rotated and negated. Returns the identity if the
    /// scale is zero or too small to divide by.
    ///
    /// Non-uniform scale, shear and projection are not supported and give a wrong result; use
    /// [`inverse`](Self::inverse) for those.
    pub fn affine_inverse(&self) -> Mat4x4 {
        let upper = self.upper_3x3();
        let scale_squared = upper.columns[0].len_squared();
        if scale_squared < f32::MIN_POSITIVE {
            return Mat4x4::identity();
        }
        let upper_inv = upper.transposed() / scale_squared;
        let translation = upper_inv * -self.columns[3].xyz();
        Mat4x4::from_upper_3x3(upper_inv, translation)
    }

    /// Inverse-transpose of the upper 3x3 block, for transforming surface normals.
    ///
    /// Keeps normals perpendicular to their surfaces under non-uniform scale. The result is
    /// not normalised; re-normalise transformed normals before lighting.
    pub fn normal_matrix(&self) -> Mat3x3 {
        self.upper_3x3().inverse().transposed()
    }
}

impl From<Quat> for Mat3x3 {
    fn from(value: Quat) -> Self {
        value.to_mat3x3()
    }
}
impl From<Quat> for Mat4x4 {
    fn from(value: Quat) -> Self {
        value.to_mat4x4()
    }
}
impl From<Mat3x3> for Quat {
    fn from(value: Mat3x3) -> Self {
        value.to_quat()
    }
}
