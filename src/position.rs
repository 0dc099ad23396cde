use crate::frames::{AngleUnit, Frame};
use crate::Vector3;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use crate::util::WrappedAngle;
#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point given by its (x, y, z) cartesian components in the [`Frame`] `In`.
///
/// The components carry no length unit of their own; any unit works as long as the same one is
/// used for the point and for the [`FrameOffset`](crate::FrameOffset) it is transformed with.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require In: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct Cartesian<In> {
    pub(crate) point: Vector3,
    #[cfg_attr(feature = "serde", serde(skip))]
    system: PhantomData<In>,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for Cartesian<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for Cartesian<In> {}

impl<In> Cartesian<In> {
    pub(crate) fn from_nalgebra_vector(point: Vector3) -> Self {
        Self {
            point,
            system: PhantomData,
        }
    }

    /// Constructs the point (x, y, z) in the [`Frame`] `In`.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_nalgebra_vector(Vector3::new(x, y, z))
    }

    /// The origin of `In`.
    #[must_use]
    pub fn origin() -> Self {
        Self::from_nalgebra_vector(Vector3::zeros())
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.point.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.point.y
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.point.z
    }

    /// Returns the components in XYZ order.
    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        [self.point.x, self.point.y, self.point.z]
    }

    /// Returns the straight-line distance from the origin of `In`.
    #[must_use]
    pub fn distance_from_origin(&self) -> f64 {
        self.point.norm()
    }

    /// Expresses this point as radius, azimuth, and elevation.
    ///
    /// Azimuth is `atan2(y, x)` and so lies in (-180°, 180°]; elevation is `atan2(z, ρ)` with ρ
    /// the distance from the Z axis and so lies in [-90°, 90°]. At the origin, and anywhere on the
    /// Z axis, the azimuth is 0.
    #[must_use]
    pub fn to_spherical(&self) -> Spherical<In> {
        let rho = self.point.x.hypot(self.point.y);
        let radius = rho.hypot(self.point.z);
        Spherical {
            radius,
            // adding 0 turns -0 into +0 so the azimuth never lands on -180°
            azimuth: Angle::new::<radian>((self.point.y + 0.).atan2(self.point.x)),
            elevation: Angle::new::<radian>(self.point.z.atan2(rho)),
            system: PhantomData,
        }
    }
}

impl<In> From<[f64; 3]> for Cartesian<In> {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl<In> PartialEq<Self> for Cartesian<In> {
    fn eq(&self, other: &Self) -> bool {
        self.point.eq(&other.point)
    }
}

impl<In: Frame> Display for Cartesian<In> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x: {}, y: {}, z: {}) in {} frame",
            self.point.x,
            self.point.y,
            self.point.z,
            In::NAME
        )
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> AbsDiffEq<Self> for Cartesian<In> {
    type Epsilon = <Vector3 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        Vector3::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.point.abs_diff_eq(&other.point, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> RelativeEq for Cartesian<In> {
    fn default_max_relative() -> Self::Epsilon {
        Vector3::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.point.relative_eq(&other.point, epsilon, max_relative)
    }
}

/// A point given by radius, azimuth, and elevation in the [`Frame`] `In`.
///
/// This follows the astronomical rather than the physics convention for spherical coordinates:
///
/// - azimuth is the angle from positive X towards positive Y in the XY plane; and
/// - elevation is the angle from the XY plane towards positive Z (ie, θ = 90° - elevation is the
///   polar angle of the physics convention).
///
/// Any real radius and angles are accepted. A negative radius denotes the point in the opposite
/// direction, and converting back through [`Cartesian::to_spherical`] yields the equivalent point
/// with a non-negative radius.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct Spherical<In> {
    radius: f64,
    azimuth: Angle,
    elevation: Angle,
    #[cfg_attr(feature = "serde", serde(skip))]
    system: PhantomData<In>,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for Spherical<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for Spherical<In> {}

impl<In> Spherical<In> {
    /// Constructs the point at `radius` towards `azimuth` and `elevation` in the [`Frame`] `In`.
    #[must_use]
    pub fn new(radius: f64, azimuth: impl Into<Angle>, elevation: impl Into<Angle>) -> Self {
        Self {
            radius,
            azimuth: azimuth.into(),
            elevation: elevation.into(),
            system: PhantomData,
        }
    }

    /// Constructs a point from raw azimuth and elevation values given in `unit`.
    #[must_use]
    pub fn from_unit(radius: f64, azimuth: f64, elevation: f64, unit: AngleUnit) -> Self {
        Self::new(radius, unit.angle(azimuth), unit.angle(elevation))
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn azimuth(&self) -> Angle {
        self.azimuth
    }

    #[must_use]
    pub fn elevation(&self) -> Angle {
        self.elevation
    }

    /// Returns radius, azimuth, and elevation as raw values with angles in `unit`.
    #[must_use]
    pub fn to_array(&self, unit: AngleUnit) -> [f64; 3] {
        [
            self.radius,
            unit.value(self.azimuth),
            unit.value(self.elevation),
        ]
    }

    /// Expresses this point in cartesian components.
    #[must_use]
    pub fn to_cartesian(&self) -> Cartesian<In> {
        let azimuth = self.azimuth.get::<radian>();
        let polar = std::f64::consts::FRAC_PI_2 - self.elevation.get::<radian>();
        let (sin_az, cos_az) = azimuth.sin_cos();
        let (sin_polar, cos_polar) = polar.sin_cos();
        Cartesian::new(
            self.radius * cos_az * sin_polar,
            self.radius * sin_az * sin_polar,
            self.radius * cos_polar,
        )
    }
}

impl<In> PartialEq<Self> for Spherical<In> {
    fn eq(&self, other: &Self) -> bool {
        self.radius.eq(&other.radius)
            && self.azimuth.eq(&other.azimuth)
            && self.elevation.eq(&other.elevation)
    }
}

impl<In: Frame> Display for Spherical<In> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(r: {}, azimuth: {:?}°, elevation: {:?}°) in {} frame",
            self.radius,
            self.azimuth.get::<degree>(),
            self.elevation.get::<degree>(),
            In::NAME
        )
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> AbsDiffEq<Self> for Spherical<In> {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        WrappedAngle::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        f64::abs_diff_eq(&self.radius, &other.radius, epsilon)
            && WrappedAngle::abs_diff_eq(
                &WrappedAngle::new(self.azimuth),
                &WrappedAngle::new(other.azimuth),
                epsilon,
            )
            && WrappedAngle::abs_diff_eq(
                &WrappedAngle::new(self.elevation),
                &WrappedAngle::new(other.elevation),
                epsilon,
            )
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> RelativeEq for Spherical<In> {
    fn default_max_relative() -> Self::Epsilon {
        WrappedAngle::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        f64::relative_eq(&self.radius, &other.radius, epsilon, max_relative)
            && WrappedAngle::relative_eq(
                &WrappedAngle::new(self.azimuth),
                &WrappedAngle::new(other.azimuth),
                epsilon,
                max_relative,
            )
            && WrappedAngle::relative_eq(
                &WrappedAngle::new(self.elevation),
                &WrappedAngle::new(other.elevation),
                epsilon,
                max_relative,
            )
    }
}

/// A point in the [`Frame`] `In`, in exactly one of its two representations.
///
/// Transforms hand back a `Position` in the same representation they were given, so a caller
/// working in radius/azimuth/elevation never has to convert by hand. Since the representation is
/// an explicit variant, there is no way to build a position that is "neither", and the origin is
/// a perfectly valid point in both.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Position<In> {
    Cartesian(Cartesian<In>),
    Spherical(Spherical<In>),
}

impl<In> Clone for Position<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for Position<In> {}

impl<In> Position<In> {
    /// Returns true if this position is held as radius, azimuth, and elevation.
    #[must_use]
    pub fn is_spherical(&self) -> bool {
        matches!(self, Self::Spherical(_))
    }

    #[must_use]
    pub fn to_cartesian(&self) -> Cartesian<In> {
        match self {
            Self::Cartesian(c) => *c,
            Self::Spherical(s) => s.to_cartesian(),
        }
    }

    #[must_use]
    pub fn to_spherical(&self) -> Spherical<In> {
        match self {
            Self::Cartesian(c) => c.to_spherical(),
            Self::Spherical(s) => *s,
        }
    }

    /// Applies `f` to the cartesian form of this position and returns the result in the
    /// representation `self` was in.
    pub(crate) fn map_cartesian<Out>(
        self,
        f: impl FnOnce(Cartesian<In>) -> Cartesian<Out>,
    ) -> Position<Out> {
        match self {
            Self::Cartesian(c) => Position::Cartesian(f(c)),
            Self::Spherical(s) => Position::Spherical(f(s.to_cartesian()).to_spherical()),
        }
    }
}

impl<In> From<Cartesian<In>> for Position<In> {
    fn from(value: Cartesian<In>) -> Self {
        Self::Cartesian(value)
    }
}

impl<In> From<Spherical<In>> for Position<In> {
    fn from(value: Spherical<In>) -> Self {
        Self::Spherical(value)
    }
}

impl<In> PartialEq<Self> for Position<In> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Cartesian(a), Self::Cartesian(b)) => a.eq(b),
            (Self::Spherical(a), Self::Spherical(b)) => a.eq(b),
            _ => false,
        }
    }
}

impl<In: Frame> Display for Position<In> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cartesian(c) => c.fmt(f),
            Self::Spherical(s) => s.fmt(f),
        }
    }
}

// positions in different representations are never approximately equal; convert first if that
// is what you want to compare.
#[cfg(any(test, feature = "approx"))]
impl<In> AbsDiffEq<Self> for Position<In> {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        WrappedAngle::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        match (self, other) {
            (Self::Cartesian(a), Self::Cartesian(b)) => a.abs_diff_eq(b, epsilon),
            (Self::Spherical(a), Self::Spherical(b)) => a.abs_diff_eq(b, epsilon),
            _ => false,
        }
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> RelativeEq for Position<In> {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        match (self, other) {
            (Self::Cartesian(a), Self::Cartesian(b)) => a.relative_eq(b, epsilon, max_relative),
            (Self::Spherical(a), Self::Spherical(b)) => a.relative_eq(b, epsilon, max_relative),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cartesian, Position, Spherical};
    use crate::frames::{AngleUnit, Model, Reference};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use quickcheck::quickcheck;
    use rstest::rstest;
    use uom::si::angle::degree;
    use uom::si::f64::Angle;

    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    // quickcheck will give us awkward f64 values -- we ignore those and stay in a sane box
    fn sane_f64(g: &mut quickcheck::Gen, bound: f64) -> f64 {
        loop {
            match f64::arbitrary(g) {
                0. => break 0.,
                f if f.is_normal() => break f.rem_euclid(2. * bound) - bound,
                _ => {}
            }
        }
    }

    use quickcheck::Arbitrary;

    impl<In> Arbitrary for Cartesian<In>
    where
        In: 'static,
    {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            Self::new(
                sane_f64(g, 1_000.),
                sane_f64(g, 1_000.),
                sane_f64(g, 1_000.),
            )
        }
    }

    impl<In> Arbitrary for Spherical<In>
    where
        In: 'static,
    {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            Self::new(
                sane_f64(g, 1_000.).abs(),
                Angle::new::<uom::si::angle::radian>(sane_f64(g, std::f64::consts::PI)),
                // stay clear of the poles, where azimuth is meaningless
                Angle::new::<uom::si::angle::radian>(sane_f64(g, 1.5)),
            )
        }
    }

    #[rstest]
    #[case(0., 0., [1., 0., 0.])]
    #[case(90., 0., [0., 1., 0.])]
    #[case(180., 0., [-1., 0., 0.])]
    #[case(-90., 0., [0., -1., 0.])]
    #[case(0., 90., [0., 0., 1.])]
    #[case(123., -90., [0., 0., -1.])]
    #[case(45., 45., [0.5, 0.5, std::f64::consts::FRAC_1_SQRT_2])]
    fn spherical_to_cartesian(
        #[case] azimuth: f64,
        #[case] elevation: f64,
        #[case] expected: [f64; 3],
    ) {
        assert_abs_diff_eq!(
            Spherical::<Reference>::new(1., d(azimuth), d(elevation)).to_cartesian(),
            Cartesian::from(expected),
            epsilon = 1e-12
        );
    }

    #[test]
    fn ten_units_due_ninety_degrees() {
        let spherical = Spherical::<Reference>::from_unit(10., 90., 0., AngleUnit::Degrees);
        let cartesian = spherical.to_cartesian();
        assert_abs_diff_eq!(cartesian, Cartesian::new(0., 10., 0.), epsilon = 1e-12);

        let [r, az, el] = cartesian.to_spherical().to_array(AngleUnit::Degrees);
        assert_relative_eq!(r, 10., epsilon = 1e-12);
        assert_relative_eq!(az, 90., epsilon = 1e-12);
        assert_relative_eq!(el, 0., epsilon = 1e-12);
    }

    #[rstest]
    #[case([1., 1., 0.], 45.)]
    #[case([-1., 1., 0.], 135.)]
    #[case([-1., -1., 0.], -135.)]
    #[case([1., -1., 0.], -45.)]
    fn azimuth_resolves_quadrants(#[case] xyz: [f64; 3], #[case] azimuth: f64) {
        let spherical = Cartesian::<Model>::from(xyz).to_spherical();
        assert_relative_eq!(spherical.azimuth().get::<degree>(), azimuth, epsilon = 1e-12);
        assert_relative_eq!(spherical.radius(), std::f64::consts::SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn origin_is_a_valid_point() {
        let origin = Cartesian::<Reference>::origin();
        let spherical = origin.to_spherical();
        assert_eq!(spherical.radius(), 0.);
        assert_eq!(spherical.azimuth(), d(0.));
        assert_eq!(spherical.elevation(), d(0.));
        assert_eq!(spherical.to_cartesian(), origin);
    }

    #[test]
    fn negative_radius_points_the_other_way() {
        let spherical = Spherical::<Reference>::new(-2., d(0.), d(0.));
        let back = spherical.to_cartesian().to_spherical();
        assert_relative_eq!(back.radius(), 2., epsilon = 1e-12);
        assert_relative_eq!(back.azimuth().get::<degree>(), 180., epsilon = 1e-12);
    }

    #[rstest]
    #[case([-1., 0., 0.])]
    #[case([-1., -0., 0.])]
    #[case([-3., -0., -0.])]
    fn negative_x_axis_is_half_a_turn(#[case] xyz: [f64; 3]) {
        let spherical = Cartesian::<Reference>::from(xyz).to_spherical();
        assert_relative_eq!(spherical.azimuth().get::<degree>(), 180., epsilon = 1e-12);
    }

    #[test]
    fn representation_survives_map() {
        let spherical = Position::from(Spherical::<Reference>::new(1., d(10.), d(20.)));
        let relabel = |c: Cartesian<Reference>| Cartesian::<Model>::from(c.to_array());

        let mapped = spherical.map_cartesian(relabel);
        assert!(mapped.is_spherical());

        let cartesian = Position::from(Cartesian::<Reference>::new(1., 2., 3.));
        let mapped = cartesian.map_cartesian(relabel);
        assert!(!mapped.is_spherical());
    }

    #[test]
    fn display() {
        insta::assert_snapshot!(
            Cartesian::<Reference>::new(1., -2.5, 0.),
            @"(x: 1, y: -2.5, z: 0) in reference frame"
        );
        insta::assert_snapshot!(
            Position::from(Spherical::<Model>::new(3., d(0.), d(0.))),
            @"(r: 3, azimuth: 0.0°, elevation: 0.0°) in model frame"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn position_serde() {
        let position = Position::from(Spherical::<Reference>::new(3., d(15.), d(-4.)));
        let ser = serde_yaml::to_string(&position).unwrap();
        let de = serde_yaml::from_str::<Position<Reference>>(&ser).unwrap();
        assert_relative_eq!(position, de);
    }

    quickcheck! {
        fn cartesian_spherical_roundtrip(point: Cartesian<Reference>) -> () {
            assert_relative_eq!(
                point,
                point.to_spherical().to_cartesian(),
                epsilon = 1e-9
            );
        }

        fn spherical_cartesian_roundtrip(point: Spherical<Model>) -> () {
            if point.radius() < 1e-6 {
                // direction is not recoverable for (numerically) zero radius
                return;
            }
            assert_abs_diff_eq!(
                point,
                point.to_cartesian().to_spherical(),
                epsilon = 1e-9
            );
        }
    }
}
