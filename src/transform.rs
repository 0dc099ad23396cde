use crate::frames::{AngleUnit, Model, Reference};
use crate::math::{Convention, ConventionDescriptor, OrbitRotation, OrbitalAngles};
use crate::position::{Cartesian, Position, Spherical};
use crate::Vector3;
use std::fmt;
use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the centre of the model frame sits, as a cartesian displacement in the [`Reference`]
/// frame.
///
/// Uses the same (arbitrary) length unit as the points it is applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameOffset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl FrameOffset {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn to_vector(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for FrameOffset {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Moves points between the [`Reference`] frame and the [`Model`] frame of one orbit.
///
/// `rotate` goes reference → model: the [`FrameOffset`] is subtracted, then `Pᵀ` is applied.
/// `derotate` goes model → reference: `P` is applied, then the offset is added. The two are exact
/// inverses of each other for any angles, offset, and [`Convention`].
///
/// Both accept either representation of a point and answer in the representation they were
/// given.
///
/// ```
/// use approx::assert_relative_eq;
/// use orbit_frames::{Cartesian, Convention, FrameOffset, OrbitTransform, OrbitalAngles};
/// use uom::si::{f64::Angle, angle::degree};
///
/// let orbit = OrbitTransform::new(
///     OrbitalAngles::new(
///         Angle::new::<degree>(60.),  // inclination
///         Angle::new::<degree>(135.), // position angle
///         Angle::new::<degree>(20.),  // argument of periapsis
///     ),
///     FrameOffset::new(0.5, -0.2, 0.),
///     Convention::Standard,
/// );
///
/// let seen = Cartesian::new(3., 4., 0.);
/// let in_orbit = orbit.rotate_cartesian(seen);
/// assert_relative_eq!(orbit.derotate_cartesian(in_orbit), seen, epsilon = 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitTransform {
    rotation: OrbitRotation,
    offset: FrameOffset,
}

impl OrbitTransform {
    #[must_use]
    pub fn new(angles: OrbitalAngles, offset: FrameOffset, convention: Convention) -> Self {
        log::trace!("orbit transform in {convention:?} convention: {angles}, offset {offset:?}");
        Self::from_rotation(OrbitRotation::new(&angles, convention), offset)
    }

    /// Builds a transform around an already constructed rotation.
    #[must_use]
    pub fn from_rotation(rotation: OrbitRotation, offset: FrameOffset) -> Self {
        Self { rotation, offset }
    }

    #[must_use]
    pub fn rotation(&self) -> OrbitRotation {
        self.rotation
    }

    #[must_use]
    pub fn offset(&self) -> FrameOffset {
        self.offset
    }

    fn descriptor(&self) -> ConventionDescriptor {
        self.rotation.convention().descriptor()
    }

    /// Expresses a reference-frame point in the model frame.
    #[must_use]
    pub fn rotate_cartesian(&self, point: Cartesian<Reference>) -> Cartesian<Model> {
        let shifted = point.point - self.offset.to_vector();
        let slots = self.descriptor().reference_slots(shifted);
        Cartesian::from_nalgebra_vector(self.rotation.reference_slots_to_model(&slots))
    }

    /// Expresses a model-frame point in the reference frame.
    #[must_use]
    pub fn derotate_cartesian(&self, point: Cartesian<Model>) -> Cartesian<Reference> {
        let slots = self.rotation.model_to_reference_slots(&point.point);
        let unshifted = self.descriptor().reference_slots(slots);
        Cartesian::from_nalgebra_vector(unshifted + self.offset.to_vector())
    }

    /// Expresses a reference-frame point in the model frame, in the representation it was given.
    #[must_use]
    pub fn rotate(&self, point: impl Into<Position<Reference>>) -> Position<Model> {
        point
            .into()
            .map_cartesian(|cartesian| self.rotate_cartesian(cartesian))
    }

    /// Expresses a model-frame point in the reference frame, in the representation it was given.
    #[must_use]
    pub fn derotate(&self, point: impl Into<Position<Model>>) -> Position<Reference> {
        point
            .into()
            .map_cartesian(|cartesian| self.derotate_cartesian(cartesian))
    }
}

/// A point as three raw numbers, tagged with which representation they are.
///
/// This is the untyped counterpart of [`Position`] for [`rotate`] and [`derotate`]: it carries no
/// frame, and its azimuth and elevation are interpreted in whatever [`AngleUnit`] the call is
/// made with.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Triple {
    Spherical {
        radius: f64,
        azimuth: f64,
        elevation: f64,
    },
    Cartesian {
        x: f64,
        y: f64,
        z: f64,
    },
}

impl Triple {
    /// Returns the three numbers in order: (radius, azimuth, elevation) or (x, y, z).
    #[must_use]
    pub fn to_array(self) -> [f64; 3] {
        match self {
            Self::Spherical {
                radius,
                azimuth,
                elevation,
            } => [radius, azimuth, elevation],
            Self::Cartesian { x, y, z } => [x, y, z],
        }
    }

    /// Reads this triple as a point in the frame `In`.
    #[must_use]
    pub fn into_position<In>(self, unit: AngleUnit) -> Position<In> {
        match self {
            Self::Spherical {
                radius,
                azimuth,
                elevation,
            } => Spherical::from_unit(radius, azimuth, elevation, unit).into(),
            Self::Cartesian { x, y, z } => Cartesian::new(x, y, z).into(),
        }
    }

    /// Writes a point out as raw numbers, with angles in `unit`.
    #[must_use]
    pub fn from_position<In>(position: Position<In>, unit: AngleUnit) -> Self {
        match position {
            Position::Spherical(spherical) => {
                let [radius, azimuth, elevation] = spherical.to_array(unit);
                Self::Spherical {
                    radius,
                    azimuth,
                    elevation,
                }
            }
            Position::Cartesian(cartesian) => {
                let [x, y, z] = cartesian.to_array();
                Self::Cartesian { x, y, z }
            }
        }
    }
}

impl Display for Triple {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spherical {
                radius,
                azimuth,
                elevation,
            } => write!(f, "[r: {radius}, az: {azimuth}, el: {elevation}]"),
            Self::Cartesian { x, y, z } => write!(f, "[x: {x}, y: {y}, z: {z}]"),
        }
    }
}

/// Moves a point from the reference frame to the model frame.
///
/// `angles` is `[inclination, position angle, argument of periapsis]`. `unit` applies to those
/// angles, to the azimuth and elevation of a spherical `point`, and to the azimuth and elevation
/// returned. The result has the same representation as `point`.
///
/// Prefer [`OrbitTransform`] when transforming several points with the same orbit, or when the
/// angles are already [`uom`] quantities.
#[must_use]
pub fn rotate(
    point: Triple,
    angles: [f64; 3],
    offset: impl Into<FrameOffset>,
    unit: AngleUnit,
    convention: Convention,
) -> Triple {
    let transform = transform_from_raw(angles, offset.into(), unit, convention);
    Triple::from_position(transform.rotate(point.into_position::<Reference>(unit)), unit)
}

/// Moves a point from the model frame to the reference frame.
///
/// Takes its arguments exactly as [`rotate`] does, and undoes it.
#[must_use]
pub fn derotate(
    point: Triple,
    angles: [f64; 3],
    offset: impl Into<FrameOffset>,
    unit: AngleUnit,
    convention: Convention,
) -> Triple {
    let transform = transform_from_raw(angles, offset.into(), unit, convention);
    Triple::from_position(transform.derotate(point.into_position::<Model>(unit)), unit)
}

fn transform_from_raw(
    [inclination, position_angle, argument_of_periapsis]: [f64; 3],
    offset: FrameOffset,
    unit: AngleUnit,
    convention: Convention,
) -> OrbitTransform {
    OrbitTransform::new(
        OrbitalAngles::from_unit(inclination, position_angle, argument_of_periapsis, unit),
        offset,
        convention,
    )
}
