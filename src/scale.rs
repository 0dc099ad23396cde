//! Relations between the distance to an object, the angle it subtends on the sky, and its
//! physical size.
//!
//! For distance `D`, angular size `θ` and physical size `s`:
//!
//! ```text
//! s = D·tan θ        θ = atan(s / D)        D = s / tan θ
//! ```
//!
//! Any two of the three determine the third. [`SkyScale::builder`] enforces "exactly two" at
//! compile time; [`SkyScale::solve`] does so at runtime for when the inputs come in as
//! [`Option`]s. Astronomers conventionally quote distances in parsec, angles in arcseconds and
//! sizes in astronomical units, which is what the [`Display`] of a [`SkyScale`] uses:
//!
//! ```
//! use orbit_frames::scale::SkyScale;
//! use uom::si::f64::{Angle, Length};
//! use uom::si::angle::second;
//! use uom::si::length::{astronomical_unit, parsec};
//!
//! // an arcsecond at a parsec is an astronomical unit, give or take
//! let scale = SkyScale::builder()
//!     .distance(Length::new::<parsec>(1.))
//!     .angle(Angle::new::<second>(1.))
//!     .solve_size();
//! assert!((scale.size().get::<astronomical_unit>() - 1.).abs() < 1e-6);
//! ```

use crate::errors::{AstroError, AstroResult};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use uom::si::angle::{radian, second};
use uom::si::f64::{Angle, Length};
use uom::si::length::{astronomical_unit, meter, parsec};
use uom::ConstZero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Returns the physical size of something subtending `angle` at `distance`.
#[must_use]
pub fn physical_size(distance: impl Into<Length>, angle: impl Into<Angle>) -> Length {
    let distance = distance.into();
    let angle = angle.into();
    distance * angle.get::<radian>().tan()
}

/// Returns the angle subtended by something of physical `size` at `distance`.
///
/// Fails for a zero `distance`, where every non-zero size fills half the sky.
pub fn angular_size(distance: impl Into<Length>, size: impl Into<Length>) -> AstroResult<Angle> {
    let distance = distance.into();
    let size = size.into();
    if distance == Length::ZERO {
        return Err(AstroError::degenerate_geometry(
            "angular size is undefined at zero distance",
        ));
    }
    Ok(Angle::new::<radian>(
        (size.get::<meter>() / distance.get::<meter>()).atan(),
    ))
}

/// Returns the distance at which something of physical `size` subtends `angle`.
///
/// Fails when `tan(angle)` is zero, as no finite distance makes a finite size look that small.
pub fn distance(angle: impl Into<Angle>, size: impl Into<Length>) -> AstroResult<Length> {
    let angle = angle.into();
    let size = size.into();
    let tan = angle.get::<radian>().tan();
    if tan == 0. {
        return Err(AstroError::degenerate_geometry(
            "distance is undefined for a zero angular size",
        ));
    }
    Ok(size / tan)
}

/// A consistent distance, angular size, and physical size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkyScale {
    distance: Length,
    angle: Angle,
    size: Length,
}

/// Which quantity [`SkyScale::solve`] had to work out, and its value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScaleSolution {
    Distance(Length),
    Angle(Angle),
    Size(Length),
}

impl SkyScale {
    /// Provides a constructor that takes exactly two of the three quantities and solves for the
    /// third.
    pub fn builder() -> Builder<Unset, Unset, Unset> {
        Builder {
            distance: Length::ZERO,
            angle: Angle::ZERO,
            size: Length::ZERO,
            has: (PhantomData, PhantomData, PhantomData),
        }
    }

    /// Solves for whichever of `distance`, `angle` and `size` is `None`.
    ///
    /// Exactly one must be `None`; anything else is [`AstroError::ScaleArguments`].
    pub fn solve(
        distance: Option<Length>,
        angle: Option<Angle>,
        size: Option<Length>,
    ) -> AstroResult<ScaleSolution> {
        let solution = match (distance, angle, size) {
            (Some(d), Some(a), None) => {
                ScaleSolution::Size(Self::builder().distance(d).angle(a).solve_size().size)
            }
            (Some(d), None, Some(s)) => {
                ScaleSolution::Angle(Self::builder().distance(d).size(s).solve_angle()?.angle)
            }
            (None, Some(a), Some(s)) => {
                ScaleSolution::Distance(Self::builder().angle(a).size(s).solve_distance()?.distance)
            }
            _ => {
                let given = [distance.is_some(), angle.is_some(), size.is_some()]
                    .into_iter()
                    .filter(|&is_given| is_given)
                    .count();
                return Err(AstroError::ScaleArguments { given });
            }
        };
        log::debug!("solved sky scale: {solution:?}");
        Ok(solution)
    }

    #[must_use]
    pub fn distance(&self) -> Length {
        self.distance
    }

    #[must_use]
    pub fn angle(&self) -> Angle {
        self.angle
    }

    #[must_use]
    pub fn size(&self) -> Length {
        self.size
    }
}

impl Display for SkyScale {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pc, {}\", {} au",
            self.distance.get::<parsec>(),
            self.angle.get::<second>(),
            self.size.get::<astronomical_unit>()
        )
    }
}

/// [`Builder`] typestate for a quantity that has not been provided yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unset;

/// [`Builder`] typestate for a quantity that has been provided.
#[derive(Debug, Default, Clone, Copy)]
pub struct Set;

/// Used to construct a [`SkyScale`] from two known quantities.
///
/// See [`SkyScale::builder`].
#[derive(Debug)]
#[must_use]
pub struct Builder<Distance, AngularSize, Size> {
    distance: Length,
    angle: Angle,
    size: Length,
    has: (
        PhantomData<Distance>,
        PhantomData<AngularSize>,
        PhantomData<Size>,
    ),
}

// manual impls of Clone and Copy to avoid requiring the state markers to be Clone + Copy
impl<D, A, S> Clone for Builder<D, A, S> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<D, A, S> Copy for Builder<D, A, S> {}

impl<D, A, S> Builder<D, A, S> {
    /// Sets the distance to the object.
    pub fn distance(self, distance: impl Into<Length>) -> Builder<Set, A, S> {
        Builder {
            distance: distance.into(),
            angle: self.angle,
            size: self.size,
            has: (PhantomData::<Set>, self.has.1, self.has.2),
        }
    }

    /// Sets the angle the object subtends on the sky.
    pub fn angle(self, angle: impl Into<Angle>) -> Builder<D, Set, S> {
        Builder {
            distance: self.distance,
            angle: angle.into(),
            size: self.size,
            has: (self.has.0, PhantomData::<Set>, self.has.2),
        }
    }

    /// Sets the physical size of the object.
    pub fn size(self, size: impl Into<Length>) -> Builder<D, A, Set> {
        Builder {
            distance: self.distance,
            angle: self.angle,
            size: size.into(),
            has: (self.has.0, self.has.1, PhantomData::<Set>),
        }
    }
}

impl Builder<Set, Set, Unset> {
    pub fn solve_size(self) -> SkyScale {
        SkyScale {
            distance: self.distance,
            angle: self.angle,
            size: physical_size(self.distance, self.angle),
        }
    }
}

impl Builder<Set, Unset, Set> {
    pub fn solve_angle(self) -> AstroResult<SkyScale> {
        Ok(SkyScale {
            distance: self.distance,
            angle: angular_size(self.distance, self.size)?,
            size: self.size,
        })
    }
}

impl Builder<Unset, Set, Set> {
    pub fn solve_distance(self) -> AstroResult<SkyScale> {
        Ok(SkyScale {
            distance: distance(self.angle, self.size)?,
            angle: self.angle,
            size: self.size,
        })
    }
}
