//! Shading and geometry helpers on [`Vec3`], in the style of the GLSL built-ins.
use crate::core::config::EPSILON;
use crate::util::linalg::Vec3;

impl Vec3 {
    /// Reflects an incident direction across the surface normal `n`: `i - 2 (i . n) n`.
    ///
    /// `n` should be unit length.
    #[must_use]
    pub fn reflect(&self, n: Vec3) -> Vec3 {
        *self - 2.0 * self.dot(n) * n
    }

    /// Refracts an incident direction through a surface with unit normal `n` (Snell's law).
    ///
    /// `eta` is the ratio of refractive indices, from the incident medium to the other. Returns
    /// the zero vector on total internal reflection.
    ///
    /// # Examples
    ///
    /// ```
    /// use xform::core::prelude::*;
    ///
    /// // Head-on rays pass straight through.
    /// let i = Vec3::down();
    /// assert!(i.refract(Vec3::up(), 1.0 / 1.33).almost_eq(Vec3::down()));
    ///
    /// // Grazing ray leaving glass: total internal reflection.
    /// let grazing = Vec3::new(1.0, -0.1, 0.0).normed();
    /// assert_eq!(grazing.refract(Vec3::up(), 1.5), Vec3::zero());
    /// ```
    #[must_use]
    pub fn refract(&self, n: Vec3, eta: f32) -> Vec3 {
        let n_dot_i = n.dot(*self);
        let k = 1.0 - eta * eta * (1.0 - n_dot_i * n_dot_i);
        if k < 0.0 {
            return Vec3::zero();
        }
        eta * *self - (eta * n_dot_i + k.sqrt()) * n
    }

    /// Returns `self` if `nref` faces against the incident direction `i` (`nref . i < 0`),
    /// otherwise `-self`.
    #[must_use]
    pub fn faceforward(&self, i: Vec3, nref: Vec3) -> Vec3 {
        if nref.dot(i) < 0.0 { *self } else { -*self }
    }

    /// Angle in radians between two vectors, in `[0, π]`. Returns 0 if either is zero-length.
    #[must_use]
    pub fn angle_between(&self, other: Vec3) -> f32 {
        let len_squared = self.len_squared() * other.len_squared();
        if len_squared <= 0.0 {
            return 0.0;
        }
        (self.dot(other) / len_squared.sqrt()).clamp(-1.0, 1.0).acos()
    }

    /// As [`angle_between`](Self::angle_between), for vectors already of unit length.
    #[must_use]
    pub fn angle_between_normalized(&self, other: Vec3) -> f32 {
        self.dot(other).clamp(-1.0, 1.0).acos()
    }

    /// The component of `self` along `onto`. Returns the zero vector if `onto` is (nearly)
    /// zero-length.
    #[must_use]
    pub fn project_onto(&self, onto: Vec3) -> Vec3 {
        let denom = onto.dot(onto);
        if denom <= EPSILON {
            return Vec3::zero();
        }
        (self.dot(onto) / denom) * onto
    }
}

/// Signed distance from `point` to the plane `p . normal + d = 0`.
///
/// `normal` should be unit length; positive distances lie on the side it points towards.
pub fn distance_point_plane(point: Vec3, normal: Vec3, d: f32) -> f32 {
    point.dot(normal) + d
}

/// Signed distance from `point` to the plane through `point_on_plane` with unit `normal`.
pub fn distance_point_plane_through(point: Vec3, normal: Vec3, point_on_plane: Vec3) -> f32 {
    (point - point_on_plane).dot(normal)
}
