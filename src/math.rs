//! The rotation between a reference frame and an orbit's model frame.
//!
//! An orbit is oriented in the [`Reference`] frame by three angles: the position angle of the
//! line of nodes, the inclination of the orbital plane about that line, and the argument of
//! periapsis within the orbital plane. Together they define the rotation
//!
//! ```text
//! P = Rz(position angle) · Rx(inclination) · Rz(argument of periapsis)
//! ```
//!
//! which takes [`Model`]-frame vectors into the [`Reference`] frame. Its transpose goes the other
//! way. [`OrbitRotation`] holds `P` for one set of angles and one [`Convention`]; the transforms
//! in [`crate::OrbitTransform`] are built on top of it.

use crate::frames::AngleUnit;
use crate::{Matrix3, Rotation3, Vector3};
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;
use uom::ConstZero;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::frames::{Model, Reference};

/// The three angles orienting an orbit in the [`Reference`] frame.
///
/// All three are angles on a circle: any real value is accepted and values a full turn apart
/// describe the same orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalAngles {
    /// Tilt of the orbital plane about the line of nodes.
    pub inclination: Angle,

    /// Angle of the line of nodes (the longitude of the ascending node), measured from the
    /// reference X axis towards Y.
    pub position_angle: Angle,

    /// Angle within the orbital plane from the line of nodes to periapsis.
    pub argument_of_periapsis: Angle,
}

impl OrbitalAngles {
    #[must_use]
    pub fn new(
        inclination: impl Into<Angle>,
        position_angle: impl Into<Angle>,
        argument_of_periapsis: impl Into<Angle>,
    ) -> Self {
        Self {
            inclination: inclination.into(),
            position_angle: position_angle.into(),
            argument_of_periapsis: argument_of_periapsis.into(),
        }
    }

    /// Constructs the angles from raw values given in `unit`.
    #[must_use]
    pub fn from_unit(
        inclination: f64,
        position_angle: f64,
        argument_of_periapsis: f64,
        unit: AngleUnit,
    ) -> Self {
        Self::new(
            unit.angle(inclination),
            unit.angle(position_angle),
            unit.angle(argument_of_periapsis),
        )
    }

    /// The orientation whose model frame coincides with the reference frame.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(Angle::ZERO, Angle::ZERO, Angle::ZERO)
    }
}

impl Default for OrbitalAngles {
    fn default() -> Self {
        Self::zero()
    }
}

impl Display for OrbitalAngles {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inclination {:?}°, position angle {:?}°, argument of periapsis {:?}°",
            self.inclination.get::<degree>(),
            self.position_angle.get::<degree>(),
            self.argument_of_periapsis.get::<degree>(),
        )
    }
}

/// Which angle convention an orbit's angles are given in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Convention {
    /// Angles are used as given, and reference X and Y are used in that order.
    #[default]
    Standard,

    /// The convention of the ZODIPIC zodiacal dust cloud model: all angles are negated,
    /// periapsis is additionally shifted by -90°, and the reference X and Y axes trade places.
    Zodipic,
}

impl Convention {
    /// Returns how this convention maps orbital angles and reference axes onto the standard
    /// rotation.
    #[must_use]
    pub fn descriptor(self) -> ConventionDescriptor {
        match self {
            Self::Standard => ConventionDescriptor {
                angle_sign: 1.,
                periapsis_phase: Angle::ZERO,
                swaps_reference_xy: false,
            },
            Self::Zodipic => ConventionDescriptor {
                angle_sign: -1.,
                periapsis_phase: Angle::new::<radian>(-FRAC_PI_2),
                swaps_reference_xy: true,
            },
        }
    }
}

/// The sign pattern, phase offset, and axis permutation that make up a [`Convention`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConventionDescriptor {
    /// Multiplies all three orbital angles.
    pub angle_sign: f64,
    /// Added to the argument of periapsis after `angle_sign` is applied.
    pub periapsis_phase: Angle,
    /// Whether reference-frame vectors enter and leave the rotation as (Y, X, Z).
    pub swaps_reference_xy: bool,
}

impl ConventionDescriptor {
    /// Returns (position angle, inclination, argument of periapsis) in radians, as they enter the
    /// standard rotation.
    fn effective_radians(&self, angles: &OrbitalAngles) -> (f64, f64, f64) {
        (
            self.angle_sign * angles.position_angle.get::<radian>(),
            self.angle_sign * angles.inclination.get::<radian>(),
            self.angle_sign * angles.argument_of_periapsis.get::<radian>()
                + self.periapsis_phase.get::<radian>(),
        )
    }

    /// Moves a reference-frame vector into (or, equivalently, out of) the slot order the rotation
    /// works in.
    pub(crate) fn reference_slots(&self, v: Vector3) -> Vector3 {
        if self.swaps_reference_xy {
            Vector3::new(v.y, v.x, v.z)
        } else {
            v
        }
    }
}

/// The rotation `P` from an orbit's model frame into the reference frame.
///
/// `P` is built once from a set of [`OrbitalAngles`] and a [`Convention`], and then applied
/// directly (model to reference) or transposed (reference to model). Transposition inverts a
/// rotation matrix exactly, so both directions come from the same matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitRotation {
    inner: Rotation3,
    convention: Convention,
}

impl OrbitRotation {
    /// Builds `P` from the explicit trigonometric expansion of its three factors.
    ///
    /// This is what [`crate::OrbitTransform`] uses. It evaluates six sines and cosines and no
    /// matrix products.
    #[must_use]
    pub fn new(angles: &OrbitalAngles, convention: Convention) -> Self {
        let (position_angle, inclination, periapsis) =
            convention.descriptor().effective_radians(angles);
        let (s0, c0) = position_angle.sin_cos();
        let (s1, c1) = inclination.sin_cos();
        let (s2, c2) = periapsis.sin_cos();

        #[rustfmt::skip]
        let matrix = Matrix3::new(
            c0 * c2 - c1 * s0 * s2, -c0 * s2 - c1 * s0 * c2,  s1 * s0,
            s0 * c2 + c1 * c0 * s2,  c1 * c0 * c2 - s0 * s2, -s1 * c0,
            s1 * s2,                 s1 * c2,                 c1,
        );

        Self {
            inner: Rotation3::from_matrix_unchecked(matrix),
            convention,
        }
    }

    /// Builds `P` by literally multiplying the three elemental rotations.
    ///
    /// Mathematically identical to [`OrbitRotation::new`]; kept as an independent construction
    /// to validate the expansion against.
    #[must_use]
    pub fn from_elemental_rotations(angles: &OrbitalAngles, convention: Convention) -> Self {
        let (position_angle, inclination, periapsis) =
            convention.descriptor().effective_radians(angles);
        let about_z = |angle| Rotation3::from_axis_angle(&Vector3::z_axis(), angle);
        let about_x = |angle| Rotation3::from_axis_angle(&Vector3::x_axis(), angle);

        Self {
            inner: about_z(position_angle) * about_x(inclination) * about_z(periapsis),
            convention,
        }
    }

    #[must_use]
    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// Returns `P`, whose columns are the model frame's axes expressed in reference slots.
    #[must_use]
    pub fn matrix(&self) -> nalgebra::Matrix3<f64> {
        *self.inner.matrix()
    }

    /// Applies `P`: model-frame vector in, reference-slot vector out.
    pub(crate) fn model_to_reference_slots(&self, v: &Vector3) -> Vector3 {
        self.inner.transform_vector(v)
    }

    /// Applies `Pᵀ`: reference-slot vector in, model-frame vector out.
    pub(crate) fn reference_slots_to_model(&self, v: &Vector3) -> Vector3 {
        self.inner.inverse_transform_vector(v)
    }
}

impl Display for OrbitRotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} rotation: {}", self.convention, self.inner.matrix())
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for OrbitRotation {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        Rotation3::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.convention == other.convention && self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for OrbitRotation {
    fn default_max_relative() -> Self::Epsilon {
        Rotation3::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.convention == other.convention
            && self.inner.relative_eq(&other.inner, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::{Convention, OrbitRotation, OrbitalAngles};
    use crate::frames::AngleUnit;
    use crate::{Matrix3, Vector3};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use quickcheck::{quickcheck, Arbitrary};
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, TAU};
    use uom::si::angle::{degree, radian};
    use uom::si::f64::Angle;

    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }
    fn r(radians: f64) -> Angle {
        Angle::new::<radian>(radians)
    }

    impl Arbitrary for OrbitalAngles {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            // quickcheck will give us awkward f64 values -- keep to [-2π, 2π]
            let mut angle = || loop {
                match f64::arbitrary(g) {
                    0. => break r(0.),
                    f if f.is_normal() => break r(f.rem_euclid(2. * TAU) - TAU),
                    _ => {}
                }
            };
            Self::new(angle(), angle(), angle())
        }
    }

    impl Arbitrary for Convention {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            *g.choose(&[Convention::Standard, Convention::Zodipic])
                .expect("non-empty")
        }
    }

    #[rstest]
    #[case(Convention::Standard)]
    #[case(Convention::Zodipic)]
    fn rotation_is_orthonormal(#[case] convention: Convention) {
        let rotation =
            OrbitRotation::new(&OrbitalAngles::new(d(33.), d(-120.), d(400.)), convention);
        let m = rotation.matrix();
        assert_relative_eq!(m * m.transpose(), Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(m.determinant(), 1., epsilon = 1e-12);
    }

    #[test]
    fn zero_angles_are_identity_in_standard_convention() {
        let rotation = OrbitRotation::new(&OrbitalAngles::zero(), Convention::Standard);
        assert_eq!(rotation.matrix(), Matrix3::identity());
    }

    #[test]
    fn zero_angles_are_a_quarter_turn_in_zodipic_convention() {
        let rotation = OrbitRotation::new(&OrbitalAngles::zero(), Convention::Zodipic);
        #[rustfmt::skip]
        let expected = Matrix3::new(
             0., 1., 0.,
            -1., 0., 0.,
             0., 0., 1.,
        );
        assert_abs_diff_eq!(rotation.matrix(), expected, epsilon = 1e-15);
    }

    // each factor on its own must match the textbook elemental rotation
    #[rstest]
    #[case(OrbitalAngles::new(d(30.), d(0.), d(0.)), Vector3::x_axis().into_inner(), 30.)]
    #[case(OrbitalAngles::new(d(0.), d(30.), d(0.)), Vector3::z_axis().into_inner(), 30.)]
    #[case(OrbitalAngles::new(d(0.), d(0.), d(30.)), Vector3::z_axis().into_inner(), 30.)]
    fn single_angle_is_elemental_rotation(
        #[case] angles: OrbitalAngles,
        #[case] axis: Vector3,
        #[case] degrees: f64,
    ) {
        let expected = nalgebra::Rotation3::from_axis_angle(
            &nalgebra::Unit::new_normalize(axis),
            degrees.to_radians(),
        );
        assert_relative_eq!(
            OrbitRotation::new(&angles, Convention::Standard).matrix(),
            *expected.matrix(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn right_angle_inclination_about_x() {
        let rotation = OrbitRotation::new(
            &OrbitalAngles::new(r(FRAC_PI_2), r(0.), r(0.)),
            Convention::Standard,
        );
        #[rustfmt::skip]
        let expected = Matrix3::new(
            1., 0.,  0.,
            0., 0., -1.,
            0., 1.,  0.,
        );
        assert_abs_diff_eq!(rotation.matrix(), expected, epsilon = 1e-15);
    }

    #[test]
    fn degree_and_radian_angles_agree() {
        let in_radians = OrbitalAngles::from_unit(0.3, -1.2, 2.9, AngleUnit::Radians);
        let in_degrees = OrbitalAngles::from_unit(
            0.3_f64.to_degrees(),
            (-1.2_f64).to_degrees(),
            2.9_f64.to_degrees(),
            AngleUnit::Degrees,
        );
        assert_relative_eq!(
            OrbitRotation::new(&in_radians, Convention::Standard),
            OrbitRotation::new(&in_degrees, Convention::Standard),
            epsilon = 1e-12
        );
    }

    #[test]
    fn display() {
        insta::assert_snapshot!(
            OrbitalAngles::new(d(0.), d(0.), d(0.)),
            @"inclination 0.0°, position angle 0.0°, argument of periapsis 0.0°"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rotation_serde() {
        let rotation = OrbitRotation::new(
            &OrbitalAngles::new(d(12.), d(34.), d(56.)),
            Convention::Zodipic,
        );
        let ser = serde_yaml::to_string(&rotation).unwrap();
        let de = serde_yaml::from_str::<OrbitRotation>(&ser).unwrap();
        assert_relative_eq!(rotation, de);
    }

    quickcheck! {
        fn closed_form_matches_elemental_rotations(angles: OrbitalAngles, convention: Convention) -> () {
            assert_relative_eq!(
                OrbitRotation::new(&angles, convention),
                OrbitRotation::from_elemental_rotations(&angles, convention),
                epsilon = 1e-12
            );
        }

        fn full_turns_do_not_change_the_rotation(angles: OrbitalAngles) -> () {
            let turned = OrbitalAngles::new(
                angles.inclination + r(TAU),
                angles.position_angle - r(2. * TAU),
                angles.argument_of_periapsis + r(TAU),
            );
            assert_relative_eq!(
                OrbitRotation::new(&angles, Convention::Standard),
                OrbitRotation::new(&turned, Convention::Standard),
                epsilon = 1e-9
            );
        }
    }
}
