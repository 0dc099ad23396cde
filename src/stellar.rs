//! Looking up main-sequence stars by spectral type, and the distance modulus that ties their
//! absolute magnitudes to what is seen on the sky.
//!
//! The [`SpectralTable`] holds one [`SpectralType`] per row of a colour/temperature table such
//! as Mamajek's "modern mean dwarf stellar colour and effective temperature sequence", with the
//! 27 numeric [`Column`]s of that table. Reading the table from disk is left to the caller; with
//! the `serde` feature the table can be deserialized directly.
//!
//! Any two of spectral type, distance and apparent V magnitude determine the third:
//!
//! ```text
//! m = Mv + 5·(log₁₀ d − 1)        d = 10^((m − Mv)/5 + 1) pc
//! ```
//!
//! and going from distance and magnitude back to a spectral type means searching the table for
//! rows with a similar absolute magnitude `Mv`.

use crate::errors::{AstroError, AstroResult};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uom::si::f64::Length;
use uom::si::length::parsec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A numeric column of the spectral type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Column {
    /// Effective temperature, in K.
    Teff,
    LogT,
    /// Bolometric correction in V.
    BCv,
    /// Absolute V magnitude.
    Mv,
    LogL,
    BMinusV,
    BtMinusVt,
    VMinusG,
    UMinusB,
    VMinusRc,
    VMinusIc,
    VMinusKs,
    JMinusH,
    HMinusKs,
    KsMinusW1,
    W1MinusW2,
    W1MinusW3,
    W1MinusW4,
    /// Mass, in solar masses.
    Msun,
    LogAge,
    /// Strömgren b−y.
    BMinusY,
    MJ,
    MKs,
    Mbol,
    IMinusZ,
    ZMinusY,
    /// Radius, in solar radii.
    RRsun,
}

impl Column {
    /// Every column, in table order.
    pub const EVERY: [Self; 27] = [
        Self::Teff,
        Self::LogT,
        Self::BCv,
        Self::Mv,
        Self::LogL,
        Self::BMinusV,
        Self::BtMinusVt,
        Self::VMinusG,
        Self::UMinusB,
        Self::VMinusRc,
        Self::VMinusIc,
        Self::VMinusKs,
        Self::JMinusH,
        Self::HMinusKs,
        Self::KsMinusW1,
        Self::W1MinusW2,
        Self::W1MinusW3,
        Self::W1MinusW4,
        Self::Msun,
        Self::LogAge,
        Self::BMinusY,
        Self::MJ,
        Self::MKs,
        Self::Mbol,
        Self::IMinusZ,
        Self::ZMinusY,
        Self::RRsun,
    ];

    /// Returns the column's header in the published table.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Teff => "Teff",
            Self::LogT => "logT",
            Self::BCv => "BCv",
            Self::Mv => "Mv",
            Self::LogL => "logL",
            Self::BMinusV => "B-V",
            Self::BtMinusVt => "Bt-Vt",
            Self::VMinusG => "V-G",
            Self::UMinusB => "U-B",
            Self::VMinusRc => "V-Rc",
            Self::VMinusIc => "V-Ic",
            Self::VMinusKs => "V-Ks",
            Self::JMinusH => "J-H",
            Self::HMinusKs => "H-Ks",
            Self::KsMinusW1 => "Ks-W1",
            Self::W1MinusW2 => "W1-W2",
            Self::W1MinusW3 => "W1-W3",
            Self::W1MinusW4 => "W1-W4",
            Self::Msun => "Msun",
            Self::LogAge => "logAge",
            Self::BMinusY => "b-y",
            Self::MJ => "M_J",
            Self::MKs => "M_Ks",
            Self::Mbol => "Mbol",
            Self::IMinusZ => "i-z",
            Self::ZMinusY => "z-Y",
            Self::RRsun => "R_Rsun",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = AstroError;

    /// Parses a column from its table header, e.g. `"B-V"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::EVERY
            .into_iter()
            .find(|column| column.header() == s)
            .ok_or_else(|| AstroError::invalid_parameter("column", format!("no column `{s}`")))
    }
}

/// One row of the table: a spectral type and its tabulated properties.
///
/// Values the table does not give are conventionally stored as infinity, which never matches a
/// search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpectralType {
    name: String,
    values: [f64; 27],
}

impl SpectralType {
    /// Constructs a row from its name (e.g. `"G2V"`) and its values in [`Column::EVERY`] order.
    pub fn new(name: impl Into<String>, values: [f64; 27]) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get(&self, column: Column) -> f64 {
        self.values[column.index()]
    }

    pub fn set(&mut self, column: Column, value: f64) {
        self.values[column.index()] = value;
    }
}

/// A row of the table that came close to a searched-for value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    pub spectral_type: String,
    pub value: f64,
    /// The row's value minus the searched-for value.
    pub residual: f64,
}

/// The result of [`SpectralTable::search`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    /// Every row within the threshold, in table order.
    pub matches: Vec<Match>,
    /// The names of the matches that are closer than any other row in the table.
    ///
    /// Usually one, more on ties. Empty if no match is the closest row overall, which can only
    /// happen when nothing matched at all.
    pub closest: Vec<String>,
}

/// What [`SpectralTable::estimate`] worked out from the two quantities it was given.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StellarEstimate {
    ApparentMagnitude(f64),
    Distance(Length),
    SpectralTypes {
        absolute_magnitude: f64,
        candidates: SearchResult,
    },
}

/// A table of spectral types.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SpectralTable {
    rows: Vec<SpectralType>,
}

impl FromIterator<SpectralType> for SpectralTable {
    fn from_iter<T: IntoIterator<Item = SpectralType>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl SpectralTable {
    pub fn new(rows: Vec<SpectralType>) -> Self {
        Self { rows }
    }

    /// Returns the row for the spectral type `name`, which includes the luminosity class, e.g.
    /// `"A0V"`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SpectralType> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpectralType> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row(&self, name: &str) -> AstroResult<&SpectralType> {
        self.get(name)
            .ok_or_else(|| AstroError::unknown_spectral_type(name))
    }

    /// Finds the spectral types whose `column` is within a fraction `threshold` of `value`.
    ///
    /// A `threshold` of 0.2 matches rows within 20% of `value`. Values close to zero need
    /// generous thresholds.
    #[must_use]
    pub fn search(&self, value: f64, column: Column, threshold: f64) -> SearchResult {
        let tolerance = value.abs() * threshold;

        let mut matches = Vec::new();
        let mut smallest = f64::INFINITY;
        for row in &self.rows {
            let tabulated = row.get(column);
            let residual = tabulated - value;
            smallest = smallest.min(residual.abs());
            if residual.abs() <= tolerance {
                matches.push(Match {
                    spectral_type: row.name.clone(),
                    value: tabulated,
                    residual,
                });
            }
        }

        let closest = matches
            .iter()
            .filter(|m| m.residual.abs() == smallest)
            .map(|m| m.spectral_type.clone())
            .collect();
        SearchResult { matches, closest }
    }

    /// Returns the apparent V magnitude a star of `spectral_type` has at `distance`.
    pub fn apparent_magnitude(
        &self,
        spectral_type: &str,
        distance: impl Into<Length>,
    ) -> AstroResult<f64> {
        let absolute = self.row(spectral_type)?.get(Column::Mv);
        Ok(absolute + 5. * (positive_parsecs(distance.into())?.log10() - 1.))
    }

    /// Returns how far away a star of `spectral_type` is if it appears with V magnitude
    /// `apparent`.
    pub fn distance(&self, spectral_type: &str, apparent: f64) -> AstroResult<Length> {
        let absolute = self.row(spectral_type)?.get(Column::Mv);
        Ok(Length::new::<parsec>(
            10f64.powf((apparent - absolute) / 5. + 1.),
        ))
    }

    /// Finds the spectral types that would appear with V magnitude `apparent` at `distance`.
    pub fn classify(
        &self,
        distance: impl Into<Length>,
        apparent: f64,
        threshold: f64,
    ) -> AstroResult<(f64, SearchResult)> {
        let absolute = apparent - 5. * (positive_parsecs(distance.into())?.log10() - 1.);
        Ok((absolute, self.search(absolute, Column::Mv, threshold)))
    }

    /// Works out whichever of spectral type, distance and apparent V magnitude is `None`.
    ///
    /// Exactly one must be `None`; anything else is [`AstroError::EstimateArguments`]. The
    /// `threshold` only matters when looking for a spectral type, see [`SpectralTable::search`].
    pub fn estimate(
        &self,
        spectral_type: Option<&str>,
        distance: Option<Length>,
        apparent: Option<f64>,
        threshold: f64,
    ) -> AstroResult<StellarEstimate> {
        if let Some(name) = spectral_type {
            self.row(name)?;
        }
        let estimate = match (spectral_type, distance, apparent) {
            (Some(name), Some(distance), None) => {
                StellarEstimate::ApparentMagnitude(self.apparent_magnitude(name, distance)?)
            }
            (Some(name), None, Some(apparent)) => {
                StellarEstimate::Distance(self.distance(name, apparent)?)
            }
            (None, Some(distance), Some(apparent)) => {
                let (absolute_magnitude, candidates) =
                    self.classify(distance, apparent, threshold)?;
                StellarEstimate::SpectralTypes {
                    absolute_magnitude,
                    candidates,
                }
            }
            _ => {
                let given = [
                    spectral_type.is_some(),
                    distance.is_some(),
                    apparent.is_some(),
                ]
                .into_iter()
                .filter(|&is_given| is_given)
                .count();
                return Err(AstroError::EstimateArguments { given });
            }
        };
        log::debug!("stellar estimate: {estimate:?}");
        Ok(estimate)
    }
}

fn positive_parsecs(distance: Length) -> AstroResult<f64> {
    let parsecs = distance.get::<parsec>();
    if parsecs.is_nan() || parsecs <= 0. {
        return Err(AstroError::invalid_parameter(
            "distance",
            format!("must be positive, got {parsecs} pc"),
        ));
    }
    Ok(parsecs)
}

#[cfg(test)]
mod tests {
    use super::{Column, Match, SpectralTable, SpectralType, StellarEstimate};
    use crate::errors::AstroError;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use uom::si::f64::Length;
    use uom::si::length::parsec;

    fn pc(parsecs: f64) -> Length {
        Length::new::<parsec>(parsecs)
    }

    fn row(name: &str, teff: f64, mv: f64) -> SpectralType {
        let mut row = SpectralType::new(name, [f64::INFINITY; 27]);
        row.set(Column::Teff, teff);
        row.set(Column::Mv, mv);
        row
    }

    fn table() -> SpectralTable {
        [
            row("A0V", 9700., 1.11),
            row("F0V", 7220., 2.51),
            row("G2V", 5770., 4.79),
            row("K0V", 5270., 5.90),
            row("M0V", 3850., 8.91),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn columns_round_trip_through_headers() {
        for column in Column::EVERY {
            assert_eq!(column.header().parse::<Column>().unwrap(), column);
        }
        assert!("Vmag".parse::<Column>().is_err());
        insta::assert_snapshot!(
            Column::EVERY.map(|c| c.header()).join(" "),
            @"Teff logT BCv Mv logL B-V Bt-Vt V-G U-B V-Rc V-Ic V-Ks J-H H-Ks Ks-W1 W1-W2 W1-W3 W1-W4 Msun logAge b-y M_J M_Ks Mbol i-z z-Y R_Rsun"
        );
    }

    #[test]
    fn search_within_fraction() {
        let found = table().search(5500., Column::Teff, 0.1);
        assert_eq!(
            found.matches,
            vec![
                Match {
                    spectral_type: "G2V".to_owned(),
                    value: 5770.,
                    residual: 270.,
                },
                Match {
                    spectral_type: "K0V".to_owned(),
                    value: 5270.,
                    residual: -230.,
                },
            ]
        );
        assert_eq!(found.closest, vec!["K0V".to_owned()]);
    }

    #[test]
    fn search_without_matches() {
        let found = table().search(20_000., Column::Teff, 0.1);
        assert!(found.matches.is_empty());
        assert!(found.closest.is_empty());
    }

    #[test]
    fn search_with_negative_value() {
        let mut bright = row("O9V", 31_500., -4.13);
        bright.set(Column::BMinusV, -0.31);
        let table: SpectralTable = table().iter().cloned().chain([bright]).collect();

        let found = table.search(-0.3, Column::BMinusV, 0.1);
        assert_eq!(found.closest, vec!["O9V".to_owned()]);
    }

    #[test]
    fn search_reports_ties() {
        let table: SpectralTable = [row("X", 1., 1.), row("Y", 3., 1.)].into_iter().collect();
        let found = table.search(2., Column::Teff, 0.5);
        assert_eq!(found.closest, vec!["X".to_owned(), "Y".to_owned()]);
    }

    #[rstest]
    // at 10 pc apparent and absolute magnitude agree
    #[case("G2V", 10., 4.79)]
    #[case("G2V", 100., 9.79)]
    #[case("A0V", 1., -3.89)]
    fn distance_modulus(#[case] spectral_type: &str, #[case] distance: f64, #[case] apparent: f64) {
        let table = table();
        assert_relative_eq!(
            table.apparent_magnitude(spectral_type, pc(distance)).unwrap(),
            apparent,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            table.distance(spectral_type, apparent).unwrap().get::<parsec>(),
            distance,
            max_relative = 1e-12
        );
    }

    #[test]
    fn classify_from_distance_and_magnitude() {
        // a K0V at 20 pc
        let (absolute, found) = table().classify(pc(20.), 7.405, 0.1).unwrap();
        assert_relative_eq!(absolute, 5.90, epsilon = 1e-3);
        assert_eq!(found.closest, vec!["K0V".to_owned()]);
        assert!(found.matches.iter().any(|m| m.spectral_type == "K0V"));
    }

    #[test]
    fn estimate_dispatches_on_what_is_missing() {
        let table = table();
        let Ok(StellarEstimate::ApparentMagnitude(apparent)) =
            table.estimate(Some("G2V"), Some(pc(10.)), None, 0.1)
        else {
            panic!("expected an apparent magnitude");
        };
        assert_relative_eq!(apparent, 4.79, epsilon = 1e-12);

        let Ok(StellarEstimate::Distance(distance)) =
            table.estimate(Some("M0V"), None, Some(8.91), 0.1)
        else {
            panic!("expected a distance");
        };
        assert_relative_eq!(distance.get::<parsec>(), 10., max_relative = 1e-12);

        let Ok(StellarEstimate::SpectralTypes { candidates, .. }) =
            table.estimate(None, Some(pc(10.)), Some(2.5), 0.1)
        else {
            panic!("expected spectral types");
        };
        assert_eq!(candidates.closest, vec!["F0V".to_owned()]);
    }

    #[rstest]
    #[case(None, None, None, 0)]
    #[case(Some("G2V"), None, None, 1)]
    #[case(None, Some(1.), None, 1)]
    #[case(Some("G2V"), Some(1.), Some(5.), 3)]
    fn estimate_needs_exactly_two(
        #[case] spectral_type: Option<&str>,
        #[case] distance: Option<f64>,
        #[case] apparent: Option<f64>,
        #[case] given: usize,
    ) {
        assert_eq!(
            table().estimate(spectral_type, distance.map(pc), apparent, 0.1),
            Err(AstroError::EstimateArguments { given })
        );
    }

    #[test]
    fn unknown_spectral_types_are_rejected() {
        let table = table();
        assert_eq!(
            table.estimate(Some("G2"), Some(pc(10.)), None, 0.1),
            Err(AstroError::unknown_spectral_type("G2"))
        );
        // even when the argument count is also wrong
        assert_eq!(
            table.estimate(Some("Z9V"), None, None, 0.1),
            Err(AstroError::unknown_spectral_type("Z9V"))
        );
    }

    #[test]
    fn distances_must_be_positive() {
        assert!(matches!(
            table().apparent_magnitude("G2V", pc(0.)),
            Err(AstroError::InvalidParameter { name: "distance", .. })
        ));
        assert!(matches!(
            table().classify(pc(-1.), 5., 0.1),
            Err(AstroError::InvalidParameter { name: "distance", .. })
        ));
    }

    #[test]
    fn lookup() {
        let table = table();
        assert_eq!(table.len(), 5);
        assert!(!table.is_empty());
        assert_eq!(table.get("G2V").unwrap().get(Column::Teff), 5770.);
        assert_eq!(table.get("G2V").unwrap().get(Column::RRsun), f64::INFINITY);
        assert!(table.get("G2").is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn table_serde() {
        let table: SpectralTable = [row("G2V", 5770., 4.79)].into_iter().collect();
        let yaml = serde_yaml::to_string(&table).unwrap();
        let back: SpectralTable = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, table);
    }
}
