//! Incision plan model and eye-relative arc layout resolution.

use serde::Serializer;
use std::f64::consts::PI;

/// Which eye a measurement or diagram pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Laterality {
    Right,
    Left,
}

impl Laterality {
    pub const ALL: [Self; 2] = [Self::Right, Self::Left];

    /// Clinical shorthand used on the wire and in the UI.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Right => "OD",
            Self::Left => "OS",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Right => "Right eye (OD)",
            Self::Left => "Left eye (OS)",
        }
    }
}

impl serde::Serialize for Laterality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncisionType {
    None,
    Single,
    Paired,
}

impl IncisionType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Single => "Single",
            Self::Paired => "Paired",
        }
    }

    /// Number of incisions this type implies.
    pub const fn expected_count(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Single => 1,
            Self::Paired => 2,
        }
    }

    /// Classifier label code used by the prediction service.
    pub const fn wire_code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Single => 1,
            Self::Paired => 2,
        }
    }
}

/// A predicted incision plan.
///
/// `incision_count` is a derived check field: consumers branch on
/// `incision_type` only.
#[derive(Debug, Clone, PartialEq)]
pub struct IncisionPlan {
    pub incision_type: IncisionType,
    pub arc_length_degrees: Option<f64>,
    pub axis_degrees: Option<f64>,
    pub incision_count: u8,
}

impl IncisionPlan {
    /// Check the type/fields/count invariants. A violation is a defect in the
    /// producing side, not a user error.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.incision_count != self.incision_type.expected_count() {
            anyhow::bail!(
                "{} plan carries incision count {} (expected {})",
                self.incision_type.label(),
                self.incision_count,
                self.incision_type.expected_count()
            );
        }
        match self.incision_type {
            IncisionType::None => {
                if self.arc_length_degrees.is_some() || self.axis_degrees.is_some() {
                    anyhow::bail!("plan of type None must not carry an arc length or axis");
                }
            }
            IncisionType::Single | IncisionType::Paired => {
                if self.arc_length_degrees.is_none() || self.axis_degrees.is_none() {
                    anyhow::bail!(
                        "{} plan is missing its arc length or axis",
                        self.incision_type.label()
                    );
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcRole {
    Primary,
    Secondary,
}

/// A fully resolved, orientation-correct arc on the unit circle, ready for
/// drawing. Ephemeral: produced and consumed within one rendering pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcDescriptor {
    pub center_angle_radians: f64,
    pub half_span_radians: f64,
    pub role: ArcRole,
}

/// Resolve a plan into zero, one, or two arc descriptors in eye-centered
/// polar coordinates.
///
/// The clinical axis is measured relative to the patient's right regardless
/// of which eye is displayed, so the right eye maps the axis directly while
/// the left eye's displayed angle is reflected through the vertical meridian.
/// Paired incisions are always antipodal and of equal length.
///
/// A Single/Paired plan with an absent length or axis is a contract violation
/// and fails fast.
pub fn resolve_arc_layout(
    plan: &IncisionPlan,
    laterality: Laterality,
) -> anyhow::Result<Vec<ArcDescriptor>> {
    if plan.incision_type == IncisionType::None {
        return Ok(Vec::new());
    }
    let (Some(arc_length), Some(axis)) = (plan.arc_length_degrees, plan.axis_degrees) else {
        anyhow::bail!(
            "{} plan is missing its arc length or axis",
            plan.incision_type.label()
        );
    };

    let half_span_radians = arc_length.to_radians() / 2.0;
    let center_angle_radians = match laterality {
        Laterality::Right => -axis.to_radians(),
        Laterality::Left => -(180.0 - axis).to_radians(),
    };

    let mut arcs = vec![ArcDescriptor {
        center_angle_radians,
        half_span_radians,
        role: ArcRole::Primary,
    }];
    if plan.incision_type == IncisionType::Paired {
        arcs.push(ArcDescriptor {
            center_angle_radians: center_angle_radians + PI,
            half_span_radians,
            role: ArcRole::Secondary,
        });
    }
    Ok(arcs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn none_plan() -> IncisionPlan {
        IncisionPlan {
            incision_type: IncisionType::None,
            arc_length_degrees: None,
            axis_degrees: None,
            incision_count: 0,
        }
    }

    fn single_plan(length: f64, axis: f64) -> IncisionPlan {
        IncisionPlan {
            incision_type: IncisionType::Single,
            arc_length_degrees: Some(length),
            axis_degrees: Some(axis),
            incision_count: 1,
        }
    }

    fn paired_plan(length: f64, axis: f64) -> IncisionPlan {
        IncisionPlan {
            incision_type: IncisionType::Paired,
            arc_length_degrees: Some(length),
            axis_degrees: Some(axis),
            incision_count: 2,
        }
    }

    #[test]
    fn none_plan_resolves_to_no_arcs() {
        let arcs = resolve_arc_layout(&none_plan(), Laterality::Right).unwrap();
        assert!(arcs.is_empty());
    }

    #[test]
    fn single_plan_resolves_to_one_primary_arc() {
        let arcs = resolve_arc_layout(&single_plan(40.0, 30.0), Laterality::Right).unwrap();
        assert_eq!(arcs.len(), 1);
        assert_eq!(arcs[0].role, ArcRole::Primary);
        assert!((arcs[0].half_span_radians - 20.0_f64.to_radians()).abs() < EPS);
        assert!((arcs[0].center_angle_radians - (-30.0_f64.to_radians())).abs() < EPS);
    }

    #[test]
    fn left_eye_reflects_through_the_vertical_meridian() {
        // axis 30°, right center −30°, left center −150°.
        let right = resolve_arc_layout(&single_plan(40.0, 30.0), Laterality::Right).unwrap();
        let left = resolve_arc_layout(&single_plan(40.0, 30.0), Laterality::Left).unwrap();
        assert!((right[0].center_angle_radians - (-30.0_f64.to_radians())).abs() < EPS);
        assert!((left[0].center_angle_radians - (-150.0_f64.to_radians())).abs() < EPS);
    }

    #[test]
    fn left_eye_single_concrete_case() {
        let arcs = resolve_arc_layout(&single_plan(40.0, 10.0), Laterality::Left).unwrap();
        assert_eq!(arcs.len(), 1);
        assert!((arcs[0].half_span_radians - 20.0_f64.to_radians()).abs() < EPS);
        assert!((arcs[0].center_angle_radians - (-170.0_f64.to_radians())).abs() < EPS);
    }

    #[test]
    fn paired_arcs_are_antipodal_with_equal_span() {
        for laterality in Laterality::ALL {
            let arcs = resolve_arc_layout(&paired_plan(35.0, 65.0), laterality).unwrap();
            assert_eq!(arcs.len(), 2);
            assert_eq!(arcs[0].role, ArcRole::Primary);
            assert_eq!(arcs[1].role, ArcRole::Secondary);
            let separation = (arcs[1].center_angle_radians - arcs[0].center_angle_radians)
                .rem_euclid(2.0 * PI);
            assert!((separation - PI).abs() < EPS);
            assert!((arcs[1].half_span_radians - arcs[0].half_span_radians).abs() < EPS);
        }
    }

    #[test]
    fn resolve_is_idempotent() {
        let plan = paired_plan(28.5, 85.0);
        let first = resolve_arc_layout(&plan, Laterality::Left).unwrap();
        let second = resolve_arc_layout(&plan, Laterality::Left).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert!((a.center_angle_radians - b.center_angle_radians).abs() < EPS);
            assert!((a.half_span_radians - b.half_span_radians).abs() < EPS);
            assert_eq!(a.role, b.role);
        }
    }

    #[test]
    fn concrete_plan_without_geometry_fails_fast() {
        let mut plan = single_plan(40.0, 30.0);
        plan.arc_length_degrees = None;
        assert!(resolve_arc_layout(&plan, Laterality::Right).is_err());

        let mut plan = paired_plan(40.0, 30.0);
        plan.axis_degrees = None;
        assert!(resolve_arc_layout(&plan, Laterality::Left).is_err());
    }

    #[test]
    fn validate_enforces_type_invariants() {
        assert!(none_plan().validate().is_ok());
        assert!(single_plan(28.5, 85.0).validate().is_ok());
        assert!(paired_plan(22.0, 100.0).validate().is_ok());

        let mut plan = none_plan();
        plan.axis_degrees = Some(85.0);
        assert!(plan.validate().is_err());

        let mut plan = single_plan(28.5, 85.0);
        plan.incision_count = 2;
        assert!(plan.validate().is_err());

        let mut plan = paired_plan(22.0, 100.0);
        plan.arc_length_degrees = None;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn laterality_codes() {
        assert_eq!(Laterality::Right.code(), "OD");
        assert_eq!(Laterality::Left.code(), "OS");
    }
}
