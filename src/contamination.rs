//! Chance that an unrelated background galaxy sits close to a target in a (sub)millimetre
//! pointed survey.
//!
//! Dusty star-forming galaxies are common enough at (sub)millimetre wavelengths that a detection
//! next to a star may well be a chance alignment. Given the survey's limiting flux, the cumulative
//! number counts N(>S) say how many such galaxies there are per square degree. Within a radius
//! `r` of the target the expected number is λ = n·πr², and the galaxies are Poisson distributed:
//!
//! ```text
//! P(this image) = 1 - e^(-λ)
//! E[contaminated images] = P·survey size
//! P(any image) = 1 - (1 - P)^(survey size)
//! ```
//!
//! The counts are those of Simpson et al. (2015, ApJ 807, 128) at 870 µm and Carniani et al.
//! (2015, A&A 584, A78) at 1.1 mm and 1.3 mm.
//!
//! ```
//! use orbit_frames::contamination::{ContaminationQuery, ObservingBand};
//! use uom::si::angle::second;
//! use uom::si::f64::{Angle, Length};
//! use uom::si::length::millimeter;
//!
//! let band = ObservingBand::from_wavelength(Length::new::<millimeter>(1.3))?;
//! let odds = ContaminationQuery::new(0.1, band, Angle::new::<second>(1.), 20).estimate()?;
//! assert!(odds.any_image > odds.this_image);
//! # Ok::<(), orbit_frames::AstroError>(())
//! ```

use crate::errors::{AstroError, AstroResult};
use std::f64::consts::PI;
use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::angle::second;
use uom::si::f64::{Angle, Length};
use uom::si::length::millimeter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const SQUARE_ARCSECONDS_PER_SQUARE_DEGREE: f64 = 3600. * 3600.;

// Simpson et al. (2015): double power law.
const SIMPSON_N0: f64 = 390.;
const SIMPSON_S0: f64 = 8.4;
const SIMPSON_ALPHA: f64 = 1.9;
const SIMPSON_BETA: f64 = 10.5;

/// A wavelength with published (sub)millimetre galaxy number counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObservingBand {
    /// 0.87 mm, ALMA band 7.
    Micron870,
    /// 1.1 mm.
    Micron1100,
    /// 1.3 mm, ALMA band 6.
    Micron1300,
}

impl ObservingBand {
    pub const EVERY: [Self; 3] = [Self::Micron870, Self::Micron1100, Self::Micron1300];

    /// Picks the band observed at `wavelength`.
    ///
    /// Only 0.87, 1.1 and 1.3 mm have counts; anything else is
    /// [`AstroError::UnsupportedWavelength`].
    pub fn from_wavelength(wavelength: impl Into<Length>) -> AstroResult<Self> {
        let millimeters = wavelength.into().get::<millimeter>();
        Self::EVERY
            .into_iter()
            .find(|band| (band.millimeters() - millimeters).abs() <= 1e-9 * millimeters.abs())
            .ok_or(AstroError::UnsupportedWavelength { millimeters })
    }

    #[must_use]
    pub fn millimeters(self) -> f64 {
        match self {
            Self::Micron870 => 0.87,
            Self::Micron1100 => 1.1,
            Self::Micron1300 => 1.3,
        }
    }

    #[must_use]
    pub fn wavelength(self) -> Length {
        Length::new::<millimeter>(self.millimeters())
    }

    /// Flux limits in mJy, lower and upper, outside of which the counts are extrapolated.
    fn fitted_range(self) -> (f64, f64) {
        match self {
            Self::Micron870 => (2., 8.),
            Self::Micron1100 => (0.1, f64::INFINITY),
            Self::Micron1300 => (0.06, f64::INFINITY),
        }
    }

    /// Number of galaxies per square degree brighter than `flux_limit_mjy`.
    ///
    /// The 1.1 and 1.3 mm counts integrate a Schechter function with normalisation φ*, knee S*
    /// and slope α, which gives φ*·Γ(α + 1, S/S*).
    #[must_use]
    pub fn cumulative_counts(self, flux_limit_mjy: f64) -> f64 {
        let schechter = |phi: f64, knee: f64, slope: f64| {
            phi * upper_incomplete_gamma(slope + 1., flux_limit_mjy / knee)
        };
        match self {
            Self::Micron870 => {
                let ratio = flux_limit_mjy / SIMPSON_S0;
                SIMPSON_N0 / SIMPSON_S0 / (ratio.powf(SIMPSON_ALPHA) + ratio.powf(SIMPSON_BETA))
            }
            Self::Micron1100 => schechter(2.7e3, 2.6, -1.81),
            Self::Micron1300 => schechter(1.8e3, 1.7, -2.08),
        }
    }
}

impl Display for ObservingBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm", self.millimeters())
    }
}

/// An unbiased pointed survey to estimate background contamination for.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContaminationQuery {
    /// Limiting detection flux in mJy.
    pub flux_limit_mjy: f64,
    pub band: ObservingBand,
    /// How close to the image centre a galaxy has to be to count as a contaminant.
    pub separation: Angle,
    /// Number of targets in the survey.
    pub survey_size: u32,
}

impl ContaminationQuery {
    pub fn new(
        flux_limit_mjy: f64,
        band: ObservingBand,
        separation: impl Into<Angle>,
        survey_size: u32,
    ) -> Self {
        Self {
            flux_limit_mjy,
            band,
            separation: separation.into(),
            survey_size,
        }
    }

    pub fn estimate(&self) -> AstroResult<Contamination> {
        let flux = self.flux_limit_mjy;
        if !flux.is_finite() || flux <= 0. {
            return Err(AstroError::invalid_parameter(
                "flux_limit",
                format!("must be positive, got {flux} mJy"),
            ));
        }
        let separation = self.separation.get::<second>();
        if !separation.is_finite() || separation < 0. {
            return Err(AstroError::invalid_parameter(
                "separation",
                format!("must not be negative, got {separation}\""),
            ));
        }

        let (faintest, brightest) = self.band.fitted_range();
        if flux < faintest {
            log::warn!("{} counts are extrapolated below {faintest} mJy", self.band);
        } else if flux > brightest {
            log::warn!("{} counts are extrapolated above {brightest} mJy", self.band);
        }

        let counts = self.band.cumulative_counts(flux);
        // square arcseconds
        let area = PI * separation.powi(2);
        let expected_galaxies = counts / SQUARE_ARCSECONDS_PER_SQUARE_DEGREE * area;
        let this_image = -(-expected_galaxies).exp_m1();
        let survey_size = f64::from(self.survey_size);
        let any_image = -(survey_size * (-this_image).ln_1p()).exp_m1();

        log::debug!("{counts} galaxies per square degree, {expected_galaxies} expected per image");
        Ok(Contamination {
            expected_galaxies,
            this_image,
            expected_contaminated: this_image * survey_size,
            any_image,
        })
    }
}

/// The result of [`ContaminationQuery::estimate`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contamination {
    /// Mean number of background galaxies within the separation of one target.
    pub expected_galaxies: f64,
    /// Chance that a given image holds at least one background galaxy.
    pub this_image: f64,
    /// Expected number of contaminated images across the survey.
    pub expected_contaminated: f64,
    /// Chance that at least one image in the survey is contaminated.
    pub any_image: f64,
}

const LANCZOS_G: f64 = 7.;
const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Γ(s) by the Lanczos approximation, reflected below ½.
fn gamma(s: f64) -> f64 {
    if s < 0.5 {
        return PI / ((PI * s).sin() * gamma(1. - s));
    }
    let s = s - 1.;
    let t = s + LANCZOS_G + 0.5;
    let sum = LANCZOS[1..]
        .iter()
        .zip(1_u32..)
        .fold(LANCZOS[0], |sum, (c, i)| sum + c / (s + f64::from(i)));
    (2. * PI).sqrt() * t.powf(s + 0.5) * (-t).exp() * sum
}

const MAX_TERMS: usize = 500;
const CONVERGED: f64 = 1e-15;

/// Upper incomplete gamma function Γ(s, x) for x > 0 and any s that is not a non-positive
/// integer.
///
/// Far from the origin this is the continued fraction of Γ(s, x); closer in it is Γ(s) minus
/// the series for γ(s, x), with Γ(s, x) = (Γ(s + 1, x) - x^s·e^(-x)) / s stepping up from
/// negative `s`.
fn upper_incomplete_gamma(s: f64, x: f64) -> f64 {
    if x >= 1. && x >= s + 1. {
        upper_continued_fraction(s, x)
    } else if s > 0. {
        gamma(s) - lower_series(s, x)
    } else {
        (upper_incomplete_gamma(s + 1., x) - x.powf(s) * (-x).exp()) / s
    }
}

fn lower_series(s: f64, x: f64) -> f64 {
    let mut denominator = s;
    let mut term = 1. / s;
    let mut sum = term;
    for _ in 0..MAX_TERMS {
        denominator += 1.;
        term *= x / denominator;
        sum += term;
        if term.abs() < sum.abs() * CONVERGED {
            break;
        }
    }
    sum * (s * x.ln() - x).exp()
}

// modified Lentz
fn upper_continued_fraction(s: f64, x: f64) -> f64 {
    const TINY: f64 = 1e-300;
    let mut b = x + 1. - s;
    let mut c = 1. / TINY;
    let mut d = 1. / b;
    let mut fraction = d;
    for i in 1..MAX_TERMS {
        let i = i as f64;
        let a = -i * (i - s);
        b += 2.;
        d = a * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + a / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1. / d;
        let delta = d * c;
        fraction *= delta;
        if (delta - 1.).abs() < CONVERGED {
            break;
        }
    }
    (s * x.ln() - x).exp() * fraction
}
