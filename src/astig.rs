//! Astigmatism vector algebra: axis normalization, double-angle projection,
//! and the derived angular features consumed by the prediction model.

/// Canonicalize an astigmatism axis into `[0, 180)` degrees.
///
/// An axis is a line orientation, not a ray direction, so values are
/// equivalent modulo 180°. Total over all reals, including negatives and
/// inputs beyond one period.
pub fn normalize_axis(axis_degrees: f64) -> f64 {
    ((axis_degrees % 180.0) + 180.0) % 180.0
}

/// A cylinder measurement as (magnitude, axis), axis periodic at 180°.
///
/// The magnitude is unsigned; direction is encoded by the axis alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AstigmatismVector {
    pub magnitude: f64,
    pub axis_degrees: f64,
}

impl AstigmatismVector {
    pub fn new(magnitude: f64, axis_degrees: f64) -> Self {
        debug_assert!(magnitude >= 0.0, "magnitude must be unsigned");
        Self {
            magnitude,
            axis_degrees,
        }
    }

    /// Build from cylinder notation, converting negative-cylinder entries to
    /// positive-cylinder form: magnitude negated, axis rotated 90° and folded
    /// into `(0, 180]`.
    pub fn from_cylinder(cylinder: f64, axis_degrees: f64) -> Self {
        if cylinder < 0.0 {
            let mut axis = axis_degrees + 90.0;
            if axis > 180.0 {
                axis -= 180.0;
            }
            Self::new(-cylinder, axis)
        } else {
            Self::new(cylinder, axis_degrees)
        }
    }
}

/// Signed equivalent magnitude of a vector at some target axis.
///
/// Positive values reinforce the target meridian, negative values oppose it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedMagnitude {
    pub value: f64,
    pub target_axis_degrees: f64,
}

/// Project a vector onto `target_axis_degrees` via the double-angle transform.
///
/// Cylinder power is a rank-2 quantity whose directional component repeats
/// every 180°, hence the factor 2: `value = magnitude · cos(2Δ)` with
/// `Δ = axis − target`. Even and 180°-periodic in Δ; orthogonal axes
/// (Δ = 90°) cancel completely. The sign is preserved, never clamped.
pub fn project_to_axis(
    vector: &AstigmatismVector,
    target_axis_degrees: f64,
) -> ProjectedMagnitude {
    let delta = normalize_axis(vector.axis_degrees) - normalize_axis(target_axis_degrees);
    let value = vector.magnitude * (2.0 * delta.to_radians()).cos();
    ProjectedMagnitude {
        value,
        target_axis_degrees,
    }
}

/// `(cos 2θ, sin 2θ)` of an axis, the model's angular feature pair.
pub fn axis_double_angle(axis_degrees: f64) -> (f64, f64) {
    let two_theta = (2.0 * axis_degrees).to_radians();
    (two_theta.cos(), two_theta.sin())
}

/// Clinical orientation class of an astigmatism axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstigOrientation {
    WithTheRule,
    AgainstTheRule,
    Oblique,
}

impl AstigOrientation {
    /// Classify by the double-angle cosine of the axis. In positive-cylinder
    /// notation an axis near 0°/180° is against the rule and an axis near 90°
    /// is with the rule; everything between is oblique.
    pub fn classify(axis_degrees: f64) -> Self {
        let (cos_2theta, _) = axis_double_angle(axis_degrees);
        if cos_2theta > 0.5 {
            Self::AgainstTheRule
        } else if cos_2theta < -0.55 {
            Self::WithTheRule
        } else {
            Self::Oblique
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::WithTheRule => "with the rule",
            Self::AgainstTheRule => "against the rule",
            Self::Oblique => "oblique",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn normalize_is_periodic_mod_180() {
        for x in [-400.0, -185.0, -90.0, 0.0, 5.0, 90.0, 179.9, 250.0, 720.0] {
            assert!((normalize_axis(x) - normalize_axis(x + 180.0)).abs() < EPS);
        }
    }

    #[test]
    fn normalize_handles_negatives_and_overflow() {
        assert!((normalize_axis(-10.0) - 170.0).abs() < EPS);
        assert!((normalize_axis(185.0) - 5.0).abs() < EPS);
        assert!((normalize_axis(360.0) - 0.0).abs() < EPS);
        assert!((normalize_axis(0.0) - 0.0).abs() < EPS);
    }

    #[test]
    fn self_projection_is_identity() {
        let v = AstigmatismVector::new(1.25, 85.0);
        let projected = project_to_axis(&v, v.axis_degrees);
        assert!((projected.value - v.magnitude).abs() < EPS);
    }

    #[test]
    fn orthogonal_projection_vanishes() {
        let v = AstigmatismVector::new(0.75, 40.0);
        let projected = project_to_axis(&v, v.axis_degrees + 90.0);
        assert!(projected.value.abs() < EPS);
    }

    #[test]
    fn projection_is_periodic_in_target_axis() {
        let v = AstigmatismVector::new(0.52, 92.0);
        for target in [-170.0, 0.0, 33.0, 85.0, 179.0] {
            let a = project_to_axis(&v, target).value;
            let b = project_to_axis(&v, target + 180.0).value;
            assert!((a - b).abs() < EPS);
        }
    }

    #[test]
    fn fully_opposing_axes_negate_the_magnitude() {
        // Δ = 90°, cos(180°) = −1: a vertical cylinder fully opposes the
        // horizontal meridian.
        let v = AstigmatismVector::new(1.0, 90.0);
        let projected = project_to_axis(&v, 0.0);
        assert!((projected.value + 1.0).abs() < EPS);
    }

    #[test]
    fn projection_sign_is_preserved() {
        let v = AstigmatismVector::new(1.0, 90.0);
        for target in [0.0, 10.0, 80.0, 100.0, 170.0] {
            let expected =
                (2.0 * (normalize_axis(90.0) - normalize_axis(target)).to_radians()).cos();
            assert!((project_to_axis(&v, target).value - expected).abs() < EPS);
        }
    }

    #[test]
    fn negative_cylinder_converts_to_positive_form() {
        let v = AstigmatismVector::from_cylinder(-1.5, 180.0);
        assert!((v.magnitude - 1.5).abs() < EPS);
        assert!((v.axis_degrees - 90.0).abs() < EPS);
    }

    #[test]
    fn negative_cylinder_axis_folds_into_half_open_period() {
        // 95° + 90° = 185° folds to 5°; 90° + 90° = 180° stays 180°.
        let folded = AstigmatismVector::from_cylinder(-0.5, 95.0);
        assert!((folded.axis_degrees - 5.0).abs() < EPS);
        let boundary = AstigmatismVector::from_cylinder(-0.5, 90.0);
        assert!((boundary.axis_degrees - 180.0).abs() < EPS);
    }

    #[test]
    fn positive_cylinder_is_used_as_is() {
        let v = AstigmatismVector::from_cylinder(1.25, 85.0);
        assert!((v.magnitude - 1.25).abs() < EPS);
        assert!((v.axis_degrees - 85.0).abs() < EPS);
    }

    #[test]
    fn orientation_thresholds() {
        assert_eq!(
            AstigOrientation::classify(90.0),
            AstigOrientation::WithTheRule
        );
        assert_eq!(
            AstigOrientation::classify(180.0),
            AstigOrientation::AgainstTheRule
        );
        assert_eq!(
            AstigOrientation::classify(5.0),
            AstigOrientation::AgainstTheRule
        );
        assert_eq!(AstigOrientation::classify(45.0), AstigOrientation::Oblique);
        assert_eq!(AstigOrientation::classify(135.0), AstigOrientation::Oblique);
    }

    #[test]
    fn double_angle_components() {
        let (cos_2theta, sin_2theta) = axis_double_angle(45.0);
        assert!(cos_2theta.abs() < EPS);
        assert!((sin_2theta - 1.0).abs() < EPS);
    }
}
