//! Denavit-Hartenberg joint transform

use crate::kinematic_traits::Transform;

/// Builds the homogeneous transform of a single joint from its DH parameters.
///
/// * `a` - link length
/// * `alpha` - link twist, radians
/// * `d` - link offset
/// * `theta` - joint angle in radians, the joint angle offset already included
///
/// ```
/// use dh_arm_kinematics::dh_transform::dh_transform;
///
/// let t = dh_transform(1.0, 0.0, 0.0, std::f64::consts::FRAC_PI_2);
/// assert!((t[(1, 3)] - 1.0).abs() < 1e-12);
/// ```
pub fn dh_transform(a: f64, alpha: f64, d: f64, theta: f64) -> Transform {
    let (st, ct) = theta.sin_cos();
    let (sa, ca) = alpha.sin_cos();

    Transform::new(
        ct, -st * ca, st * sa, a * ct,
        st, ct * ca, -ct * sa, a * st,
        0.0, sa, ca, d,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_zero_parameters_give_identity() {
        let t = dh_transform(0.0, 0.0, 0.0, 0.0);
        assert_abs_diff_eq!(t, Transform::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_link_length_translates_along_rotated_x() {
        let t = dh_transform(2.0, 0.0, 0.0, FRAC_PI_2);
        assert_abs_diff_eq!(t[(0, 3)], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t[(1, 3)], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t[(2, 3)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_link_offset_translates_along_z() {
        let t = dh_transform(0.0, 0.3, 0.75, 1.1);
        assert_abs_diff_eq!(t[(2, 3)], 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(t[(0, 3)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_twist_rotates_about_x() {
        let t = dh_transform(0.0, FRAC_PI_2, 0.0, 0.0);
        // z axis of the new frame points along -y of the old one
        assert_abs_diff_eq!(t[(0, 2)], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t[(1, 2)], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t[(2, 1)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_block_is_orthonormal() {
        let t = dh_transform(0.4, 0.7, -0.2, PI / 3.0);
        let r = t.fixed_view::<3, 3>(0, 0).into_owned();
        assert_abs_diff_eq!(r * r.transpose(), nalgebra::Matrix3::identity(), epsilon = 1e-12);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-12);
        assert_eq!(t.row(3).into_owned(), nalgebra::RowVector4::new(0.0, 0.0, 0.0, 1.0));
    }
}
