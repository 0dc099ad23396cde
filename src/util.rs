use uom::si::angle::radian;
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

/// An angle compared modulo a full turn.
///
/// Azimuths returned from `atan2` live in (-180°, 180°], while callers may well have handed us
/// the same direction as 270° or -450°. Comparisons of spherical points go through this type so
/// that those are considered equal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WrappedAngle {
    radians: f64,
}

impl WrappedAngle {
    pub(crate) fn new(angle: impl Into<Angle>) -> Self {
        Self {
            radians: Self::into_turn(angle.into().get::<radian>()),
        }
    }

    /// Returns the angle in [0°, 360°) in radians.
    #[cfg(test)]
    pub(crate) fn get_wrapped(self) -> f64 {
        self.radians
    }

    /// Returns the angle in [-180°, 180°) in radians.
    pub(crate) fn to_signed_range(self) -> f64 {
        if self.radians < Angle::HALF_TURN.get::<radian>() {
            self.radians
        } else {
            self.radians - Angle::FULL_TURN.get::<radian>()
        }
    }

    fn into_turn(radians: f64) -> f64 {
        let wrapped = radians.rem_euclid(Angle::FULL_TURN.get::<radian>());
        // rem_euclid may round up to exactly one full turn for tiny negative inputs
        if wrapped >= Angle::FULL_TURN.get::<radian>() {
            0.
        } else {
            wrapped
        }
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for WrappedAngle {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        // this is very accurate in radians
        0.000_000_001
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        Self::new(Angle::new::<radian>(self.radians - other.radians))
            .to_signed_range()
            .abs()
            <= epsilon
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for WrappedAngle {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        let min = f64::min(self.radians, other.radians);
        let max = f64::max(self.radians, other.radians);

        f64::relative_eq(&min, &max, epsilon, max_relative)
            || f64::relative_eq(
                &(min + Angle::FULL_TURN.get::<radian>()),
                &max,
                epsilon,
                max_relative,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::WrappedAngle;
    use approx::{assert_abs_diff_eq, assert_abs_diff_ne, assert_relative_eq, assert_relative_ne};
    use rstest::rstest;
    use uom::si::angle::degree;
    use uom::si::f64::Angle;

    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    #[rstest]
    #[case(d(-90.), 270.)]
    #[case(d(-390.), 330.)]
    #[case(d(180.), 180.)]
    #[case(d(725.), 5.)]
    fn wraps_into_one_turn(#[case] input: Angle, #[case] expected_degrees: f64) {
        assert_relative_eq!(
            WrappedAngle::new(input).get_wrapped(),
            expected_degrees.to_radians(),
            epsilon = 1e-12
        );
    }

    #[rstest]
    #[case(d(0.), 0.)]
    #[case(d(180.), -180.)]
    #[case(d(359.), -1.)]
    #[case(d(270.), -90.)]
    #[case(d(-180.), -180.)]
    #[case(d(360. + 340.), -20.)]
    fn signed_range(#[case] input: Angle, #[case] expected_degrees: f64) {
        assert_relative_eq!(
            WrappedAngle::new(input).to_signed_range(),
            expected_degrees.to_radians(),
            epsilon = f64::EPSILON * 1000.
        );
    }

    #[rstest]
    #[case(0., 0. + f64::EPSILON, true)]
    #[case(10., 2., false)]
    #[case(360. - f64::EPSILON * 1e3, 0., true)]
    #[case(-90., 270., true)]
    #[case(179.999_999_999_999, -180., true)]
    #[case(10., 2. + 360., false)]
    fn comparison_is_modulo_full_turn(#[case] a: f64, #[case] b: f64, #[case] expected: bool) {
        let a = WrappedAngle::new(d(a));
        let b = WrappedAngle::new(d(b));

        if expected {
            assert_relative_eq!(&a, &b, epsilon = 1e-9);
            assert_abs_diff_eq!(&a, &b, epsilon = 1e-9);
        } else {
            assert_relative_ne!(&a, &b, epsilon = 1e-9);
            assert_abs_diff_ne!(&a, &b, epsilon = 1e-9);
        }
    }
}
