use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::{Cartesian, Position, Spherical};

/// Marks one of the two frames an orbit is described in.
///
/// A frame is a zero-sized type used only to tag [`Position`]s, [`Cartesian`]s, and
/// [`Spherical`]s with the frame they are expressed in, so that a model-frame point cannot be
/// passed where a reference-frame point is expected. A frame knows nothing about its relation to
/// the other frame; that relation is an [`OrbitTransform`](crate::OrbitTransform).
pub trait Frame {
    /// Human-readable name used when displaying points.
    const NAME: &'static str;
}

/// The external, observer-fixed frame (eg, sky-plane coordinates of an image).
///
/// Bearings in the reference frame are defined as:
///
/// - azimuth is the angle from positive X towards positive Y ("East of North" when X is North and
///   Y is East on the sky); and
/// - elevation is the angle from the XY plane towards positive Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference;

impl Frame for Reference {
    const NAME: &'static str = "reference";
}

/// The frame aligned with the orbital plane being modelled.
///
/// X points along the periapsis direction, Z along the orbit normal. Azimuth and elevation are
/// defined as for [`Reference`], but relative to these axes, so the azimuth of a point in the
/// orbital plane is its true anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Model;

impl Frame for Model {
    const NAME: &'static str = "model";
}

/// Selects whether raw angle values are in degrees or radians.
///
/// A unit applies uniformly to every angle of a single call: the three orbital angles, the
/// azimuth and elevation of a spherical input, and the azimuth and elevation returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Interprets a raw value in this unit as an [`Angle`].
    #[must_use]
    pub fn angle(self, value: f64) -> Angle {
        match self {
            Self::Radians => Angle::new::<radian>(value),
            Self::Degrees => Angle::new::<degree>(value),
        }
    }

    /// Expresses an [`Angle`] as a raw value in this unit.
    #[must_use]
    pub fn value(self, angle: Angle) -> f64 {
        match self {
            Self::Radians => angle.get::<radian>(),
            Self::Degrees => angle.get::<degree>(),
        }
    }
}

impl Display for AngleUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radians => f.write_str("rad"),
            Self::Degrees => f.write_str("°"),
        }
    }
}
