//! Speeds of bodies on circular Keplerian orbits.

use crate::errors::{AstroError, AstroResult};
use crate::scale;
use uom::si::f64::{Angle, Length, Mass, Velocity};
use uom::si::length::meter;
use uom::si::mass::kilogram;
use uom::si::velocity::meter_per_second;

/// Newtonian constant of gravitation, in m³ kg⁻¹ s⁻² (CODATA 2018).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;

/// Nominal solar mass, in kg.
pub const SOLAR_MASS_KG: f64 = 1.988_47e30;

/// Returns `solar_masses` multiples of the mass of the Sun.
#[must_use]
pub fn solar_masses(solar_masses: f64) -> Mass {
    Mass::new::<kilogram>(solar_masses * SOLAR_MASS_KG)
}

/// Returns the speed `√(GM/R)` of a body on a circular orbit of `radius` around a central
/// `mass`.
///
/// This is also the largest line-of-sight velocity the orbit can show an observer.
///
/// ```
/// use orbit_frames::kinematics::{keplerian_velocity, solar_masses};
/// use uom::si::f64::Length;
/// use uom::si::length::astronomical_unit;
/// use uom::si::velocity::kilometer_per_second;
///
/// let earth = keplerian_velocity(Length::new::<astronomical_unit>(1.), solar_masses(1.))?;
/// assert!((earth.get::<kilometer_per_second>() - 29.78).abs() < 0.01);
/// # Ok::<(), orbit_frames::AstroError>(())
/// ```
pub fn keplerian_velocity(
    radius: impl Into<Length>,
    mass: impl Into<Mass>,
) -> AstroResult<Velocity> {
    let radius = radius.into().get::<meter>();
    let mass = mass.into().get::<kilogram>();
    if radius.is_nan() || radius <= 0. {
        return Err(AstroError::invalid_parameter(
            "radius",
            format!("orbit radius must be positive, got {radius} m"),
        ));
    }
    if mass.is_nan() || mass < 0. {
        return Err(AstroError::invalid_parameter(
            "mass",
            format!("central mass must not be negative, got {mass} kg"),
        ));
    }

    Ok(Velocity::new::<meter_per_second>(
        (GRAVITATIONAL_CONSTANT * mass / radius).sqrt(),
    ))
}

/// Like [`keplerian_velocity`], but for an orbit whose radius is only known as the `separation`
/// it spans on the sky at `distance`.
pub fn keplerian_velocity_at_separation(
    distance: impl Into<Length>,
    mass: impl Into<Mass>,
    separation: impl Into<Angle>,
) -> AstroResult<Velocity> {
    let radius = scale::physical_size(distance, separation);
    let velocity = keplerian_velocity(radius, mass)?;
    log::debug!(
        "keplerian velocity at {} m is {} m/s",
        radius.get::<meter>(),
        velocity.get::<meter_per_second>()
    );
    Ok(velocity)
}
