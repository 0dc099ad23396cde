//! Expected number of stars of each type in a cone of sky.
//!
//! The Galaxy is modelled as the thin and thick exponential disks of Jurić et al. (2008,
//! ApJ 673, 864, table 10), normalised to the solar neighbourhood, and scaled per stellar class
//! by Mamajek's census of local stellar number densities. The cone along the line of sight is
//! integrated numerically in spherical shells. The halo is not modelled, and most parameters
//! carry ~20% uncertainties, so the counts are best read as lower limits.
//!
//! Positions are galactic longitude and latitude; converting from equatorial coordinates is up
//! to the caller.
//!
//! ```
//! use orbit_frames::star_count::{SkyRegion, StarCountQuery, StellarClass};
//! use uom::si::f64::{Angle, Length};
//! use uom::si::angle::degree;
//! use uom::si::length::parsec;
//!
//! let toward_centre = StarCountQuery::new(
//!     Angle::new::<degree>(0.),
//!     Angle::new::<degree>(0.),
//!     Length::new::<parsec>(500.),
//!     SkyRegion::SquareDegrees(1.),
//! )
//! .integrate()?;
//! let toward_anticentre = StarCountQuery::new(
//!     Angle::new::<degree>(180.),
//!     Angle::new::<degree>(0.),
//!     Length::new::<parsec>(500.),
//!     SkyRegion::SquareDegrees(1.),
//! )
//! .integrate()?;
//! assert!(toward_centre.count(StellarClass::MDwarf) > toward_anticentre.count(StellarClass::MDwarf));
//! # Ok::<(), orbit_frames::AstroError>(())
//! ```

use crate::errors::{AstroError, AstroResult};
use crate::scale;
use std::f64::consts::PI;
use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::angle::{degree, radian};
use uom::si::f64::{Angle, Length};
use uom::si::length::parsec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of integration shells used by [`StarCountQuery::new`].
///
/// 150 shells get within about a percent of the converged count.
pub const DEFAULT_SHELLS: usize = 150;

/// Square degrees in the whole sky.
const FULL_SKY_SQUARE_DEGREES: f64 = 41_252.96;

// Jurić et al. (2008), table 10. Lengths in parsec.
const SUN_GALACTOCENTRIC_RADIUS: f64 = 8000.;
const THIN_DISK_SCALE_LENGTH: f64 = 2600.;
const THICK_DISK_SCALE_LENGTH: f64 = 3600.;
const SUN_HEIGHT: f64 = 25.;
const THIN_DISK_SCALE_HEIGHT: f64 = 300.;
const THICK_DISK_SCALE_HEIGHT: f64 = 900.;
const THICK_DISK_FRACTION: f64 = 0.12;

/// The kinds of star counted separately.
///
/// The dwarf classes are subsets of their parent spectral class, and [`StellarClass::All`]
/// counts every star, so the counts do not sum to anything meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StellarClass {
    O,
    B,
    A,
    F,
    FDwarf,
    G,
    GDwarf,
    KDwarf,
    MDwarf,
    WhiteDwarf,
    Evolved,
    RedGiant,
    All,
}

impl StellarClass {
    /// Every class, in the order [`StarCount::classes`] reports them.
    pub const EVERY: [Self; 13] = [
        Self::O,
        Self::B,
        Self::A,
        Self::F,
        Self::FDwarf,
        Self::G,
        Self::GDwarf,
        Self::KDwarf,
        Self::MDwarf,
        Self::WhiteDwarf,
        Self::Evolved,
        Self::RedGiant,
        Self::All,
    ];

    /// Number density of this class in the solar neighbourhood, in stars per cubic parsec.
    #[must_use]
    pub fn local_density(self) -> f64 {
        match self {
            Self::O => 4.4e-8,
            Self::B => 3.2e-5,
            Self::A => 4.9e-4,
            Self::F => 0.0025,
            Self::FDwarf => 0.0024,
            Self::G => 0.0048,
            Self::GDwarf => 0.0033,
            Self::KDwarf => 0.0135,
            Self::MDwarf => 0.0917,
            Self::WhiteDwarf => 0.0048,
            Self::Evolved => 8.8e-4,
            Self::RedGiant => 2.7e-4,
            Self::All => 0.0984,
        }
    }
}

impl Display for StellarClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::O => "O",
            Self::B => "B",
            Self::A => "A",
            Self::F => "F",
            Self::FDwarf => "F dwarf",
            Self::G => "G",
            Self::GDwarf => "G dwarf",
            Self::KDwarf => "K dwarf",
            Self::MDwarf => "M dwarf",
            Self::WhiteDwarf => "white dwarf",
            Self::Evolved => "evolved",
            Self::RedGiant => "red giant",
            Self::All => "all",
        })
    }
}

/// The size of a [`SkyRegion`], either directly on the sky or as a physical size.
///
/// A physical extent is taken to be at the far end of the counted volume.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "lowercase", tag = "kind", content = "value")
)]
pub enum Extent {
    Angular(Angle),
    Physical(Length),
}

impl Extent {
    fn in_degrees(self, distance: Length) -> AstroResult<f64> {
        match self {
            Self::Angular(angle) => Ok(angle.get::<degree>()),
            Self::Physical(size) => Ok(scale::angular_size(distance, size)?.get::<degree>()),
        }
    }
}

/// The patch of sky the cone of stars is counted in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "snake_case", tag = "shape", content = "extent")
)]
pub enum SkyRegion {
    SquareDegrees(f64),
    /// A disk of the given radius.
    Circle(Extent),
    /// A square of the given side.
    Square(Extent),
}

impl SkyRegion {
    /// Returns the solid angle of the region in square degrees, for a cone reaching out to
    /// `distance`.
    pub fn square_degrees(&self, distance: impl Into<Length>) -> AstroResult<f64> {
        let distance = distance.into();
        let area = match *self {
            Self::SquareDegrees(area) => area,
            Self::Circle(radius) => PI * radius.in_degrees(distance)?.powi(2),
            Self::Square(side) => side.in_degrees(distance)?.powi(2),
        };
        if area.is_nan() || area < 0. {
            return Err(AstroError::invalid_parameter(
                "region",
                format!("area must not be negative, got {area} square degrees"),
            ));
        }
        Ok(area)
    }
}

/// A line of sight and the cone around it to count stars in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StarCountQuery {
    pub galactic_longitude: Angle,
    pub galactic_latitude: Angle,
    /// How far out the cone reaches.
    pub max_distance: Length,
    pub region: SkyRegion,
    /// Number of shells the cone is cut into for integration.
    pub shells: usize,
}

impl StarCountQuery {
    /// Counts stars out to `max_distance` in `region` around galactic (`longitude`, `latitude`),
    /// integrating over [`DEFAULT_SHELLS`] shells.
    pub fn new(
        longitude: impl Into<Angle>,
        latitude: impl Into<Angle>,
        max_distance: impl Into<Length>,
        region: SkyRegion,
    ) -> Self {
        Self {
            galactic_longitude: longitude.into(),
            galactic_latitude: latitude.into(),
            max_distance: max_distance.into(),
            region,
            shells: DEFAULT_SHELLS,
        }
    }

    #[must_use]
    pub fn with_shells(mut self, shells: usize) -> Self {
        self.shells = shells;
        self
    }

    /// Integrates the disk model along the line of sight.
    pub fn integrate(&self) -> AstroResult<StarCount> {
        if self.shells == 0 {
            return Err(AstroError::invalid_parameter("shells", "must be at least 1"));
        }
        let max_distance = self.max_distance.get::<parsec>();
        if max_distance.is_nan() || max_distance <= 0. {
            return Err(AstroError::invalid_parameter(
                "max_distance",
                format!("must be positive, got {max_distance} pc"),
            ));
        }
        let sky_fraction = self.region.square_degrees(self.max_distance)? / FULL_SKY_SQUARE_DEGREES;

        let l = self.galactic_longitude.get::<radian>();
        let b = self.galactic_latitude.get::<radian>();
        let (sin_b, cos_b) = b.sin_cos();
        let cos_l = l.cos();

        let step = max_distance / self.shells as f64;
        let mut total_volume = 0.;
        let mut weighted_volume = 0.;
        for i in 1..=self.shells {
            let r = i as f64 * step;
            // galactocentric cylindrical radius and height above the plane
            let galactic_radius = SUN_GALACTOCENTRIC_RADIUS - r * cos_b * cos_l;
            let height = r * sin_b;
            let volume = sky_fraction * 4. * PI * r.powi(2) * step;

            total_volume += volume;
            weighted_volume += normalised_density(galactic_radius, height) * volume;
        }

        let classes = StellarClass::EVERY
            .into_iter()
            .map(|class| ClassCount {
                class,
                local_density: class.local_density(),
                count: class.local_density() * weighted_volume,
            })
            .collect();

        log::debug!("total volume integrated is {total_volume} pc³");
        Ok(StarCount {
            total_volume,
            classes,
        })
    }
}

/// Stellar density at galactocentric radius `r` and height `z` (both in pc), relative to the
/// solar neighbourhood.
fn normalised_density(r: f64, z: f64) -> f64 {
    let in_plane = SUN_GALACTOCENTRIC_RADIUS - r;
    let above = z + SUN_HEIGHT;
    (in_plane / THIN_DISK_SCALE_LENGTH).exp() * (-above / THIN_DISK_SCALE_HEIGHT).exp()
        + THICK_DISK_FRACTION
            * (in_plane / THICK_DISK_SCALE_LENGTH).exp()
            * (-above / THICK_DISK_SCALE_HEIGHT).exp()
}

/// The expected number of one class of star in the counted volume.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassCount {
    pub class: StellarClass,
    /// Stars per cubic parsec in the solar neighbourhood.
    pub local_density: f64,
    pub count: f64,
}

/// The result of [`StarCountQuery::integrate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StarCount {
    /// Total volume of the cone, in cubic parsec.
    pub total_volume: f64,
    /// One entry per [`StellarClass`], in the order of [`StellarClass::EVERY`].
    pub classes: Vec<ClassCount>,
}

impl StarCount {
    /// Returns the expected number of stars of `class`.
    #[must_use]
    pub fn count(&self, class: StellarClass) -> f64 {
        self.classes
            .iter()
            .find(|entry| entry.class == class)
            .map_or(0., |entry| entry.count)
    }
}
