pub mod assert;
pub mod conversions;
pub mod geometry;
pub mod linalg;
pub mod mat;
pub mod quat;

pub mod xf_float {
    use anyhow::{Result, bail};

    /// Returns true if `|a - b| <= eps`.
    ///
    /// # Examples
    /// ```
    /// use xform::core::prelude::*;
    /// assert!(almost_equal(1.0, 1.0 + 1e-7, EPSILON));
    /// assert!(!almost_equal(1.0, 1.1, EPSILON));
    /// ```
    pub fn almost_equal(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    pub fn array_from_slice<const N: usize>(values: &[f32], what: &str) -> Result<[f32; N]> {
        match <[f32; N]>::try_from(values) {
            Ok(array) => Ok(array),
            Err(_) => bail!("{what}: expected {N} floats, got {}", values.len()),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn almost_equal_is_inclusive() {
            assert!(almost_equal(0.0, 0.5, 0.5));
            assert!(!almost_equal(0.0, 0.500_1, 0.5));
            assert!(almost_equal(-2.0, -2.0, 0.0));
        }

        #[test]
        fn array_from_slice_checks_length() {
            assert_eq!(array_from_slice::<3>(&[1.0, 2.0, 3.0], "Vec3").unwrap(), [1.0, 2.0, 3.0]);
            let err = array_from_slice::<3>(&[1.0, 2.0], "Vec3").unwrap_err();
            assert_eq!(err.to_string(), "Vec3: expected 3 floats, got 2");
        }
    }
}
