//! This library moves points between the frame an astronomer observes an orbit in and the frame
//! the orbit is naturally described in, along with a handful of small estimators that tend to be
//! needed alongside it.
//!
//! First and foremost, the library provides [`Cartesian`], [`Spherical`], and [`Position`] types
//! for points. They are generic over a [`Frame`] so that a point in the observer's [`Reference`]
//! frame cannot (easily) be mistaken for one in an orbit's [`Model`] frame. A [`Position`] is
//! either of the two representations, and transforms always answer in the representation they
//! were given.
//!
//! To move between the two frames, build an [`OrbitTransform`] from the orbit's
//! [`OrbitalAngles`] (inclination, position angle, argument of periapsis), an optional
//! [`FrameOffset`] of the orbit's centre, and the [`Convention`] the angles are given in. The
//! rotation underneath is available as [`math::OrbitRotation`].
//!
//! If your angles and points come as raw numbers with a degrees-or-radians switch, the free
//! functions [`rotate`] and [`derotate`] take exactly that.
//!
//! # Examples
//!
//! A point observed on the sky (the reference frame) and where it sits in an inclined orbit:
//!
//! ```
//! use approx::assert_relative_eq;
//! use orbit_frames::{
//!     Convention, FrameOffset, OrbitTransform, OrbitalAngles, Position, Reference, Spherical,
//! };
//! use uom::si::f64::Angle;
//! use uom::si::angle::degree;
//!
//! let orbit = OrbitTransform::new(
//!     OrbitalAngles::new(
//!         Angle::new::<degree>(45.), // inclination
//!         Angle::new::<degree>(30.), // position angle
//!         Angle::new::<degree>(0.),  // argument of periapsis
//!     ),
//!     FrameOffset::default(),
//!     Convention::Standard,
//! );
//!
//! // 2 units out along position angle 30°, in the plane of the sky
//! let seen = Spherical::<Reference>::new(2., Angle::new::<degree>(30.), Angle::new::<degree>(0.));
//!
//! // that is the ascending node, so it is at periapsis in the orbit's frame
//! let Position::Spherical(in_orbit) = orbit.rotate(seen) else {
//!     unreachable!("spherical in, spherical out");
//! };
//! assert_relative_eq!(in_orbit.radius(), 2., epsilon = 1e-12);
//! assert_relative_eq!(in_orbit.azimuth().get::<degree>(), 0., epsilon = 1e-12);
//! assert_relative_eq!(in_orbit.elevation().get::<degree>(), 0., epsilon = 1e-12);
//! ```
//!
//! The same through the raw-number interface, with everything in degrees:
//!
//! ```
//! use orbit_frames::{rotate, AngleUnit, Convention, Triple};
//!
//! let in_orbit = rotate(
//!     Triple::Spherical { radius: 2., azimuth: 30., elevation: 0. },
//!     [45., 30., 0.],
//!     [0., 0., 0.],
//!     AngleUnit::Degrees,
//!     Convention::Standard,
//! );
//! let [r, az, el] = in_orbit.to_array();
//! assert!((r - 2.).abs() < 1e-12 && az.abs() < 1e-12 && el.abs() < 1e-12);
//! ```
//!
//! Beyond the frames, [`scale`] relates distance and angular and physical size, [`kinematics`]
//! gives Keplerian orbital speeds, [`star_count`] estimates how many stars of each kind lie in a
//! patch of sky, [`stellar`] matches stars against a table of spectral types, and
//! [`contamination`] gives the odds of a background galaxy turning up next to a target.

mod errors;
mod frames;
mod position;
mod transform;
#[cfg(any(test, feature = "approx"))]
mod util;

pub mod contamination;
pub mod kinematics;
pub mod math;
pub mod scale;
pub mod star_count;
pub mod stellar;

pub(crate) type Vector3 = nalgebra::Vector3<f64>;
pub(crate) type Matrix3 = nalgebra::Matrix3<f64>;
pub(crate) type Rotation3 = nalgebra::Rotation3<f64>;

pub use errors::{AstroError, AstroResult};
pub use frames::{AngleUnit, Frame, Model, Reference};
pub use math::{Convention, OrbitalAngles};
pub use position::{Cartesian, Position, Spherical};
pub use transform::{derotate, rotate, FrameOffset, OrbitTransform, Triple};
