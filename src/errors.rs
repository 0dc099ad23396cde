use thiserror::Error;

pub type AstroResult<T> = Result<T, AstroError>;

/// Failures of the scale, kinematics, star count, stellar and contamination estimators.
///
/// The frame transforms themselves cannot fail and never return this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AstroError {
    /// A two-of-three solver was handed some other number of quantities.
    #[error("Exactly two of distance, angular size and physical size must be given, got {given}")]
    ScaleArguments { given: usize },

    #[error("Exactly two of spectral type, distance and apparent magnitude must be given, got {given}")]
    EstimateArguments { given: usize },

    /// The requested quantity is undefined for the given geometry, such as an angular size seen
    /// from zero distance.
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    #[error("Invalid parameter `{name}`: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("Unknown spectral type `{spectral_type}`")]
    UnknownSpectralType { spectral_type: String },

    /// No galaxy number counts are known at this wavelength.
    #[error("Unsupported observing wavelength {millimeters} mm, expected 0.87, 1.1 or 1.3 mm")]
    UnsupportedWavelength { millimeters: f64 },
}

impl AstroError {
    pub fn degenerate_geometry(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    pub fn unknown_spectral_type(spectral_type: impl Into<String>) -> Self {
        Self::UnknownSpectralType {
            spectral_type: spectral_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AstroError;

    #[test]
    fn messages() {
        insta::assert_snapshot!(
            AstroError::ScaleArguments { given: 3 },
            @"Exactly two of distance, angular size and physical size must be given, got 3"
        );
        insta::assert_snapshot!(
            AstroError::invalid_parameter("shells", "must be at least 1"),
            @"Invalid parameter `shells`: must be at least 1"
        );
        insta::assert_snapshot!(
            AstroError::unknown_spectral_type("Z9V"),
            @"Unknown spectral type `Z9V`"
        );
        insta::assert_snapshot!(
            AstroError::UnsupportedWavelength { millimeters: 2. },
            @"Unsupported observing wavelength 2 mm, expected 0.87, 1.1 or 1.3 mm"
        );
    }

    #[test]
    fn constructors_fill_variants() {
        assert_eq!(
            AstroError::degenerate_geometry("zero distance"),
            AstroError::DegenerateGeometry {
                message: "zero distance".to_owned()
            }
        );
    }
}
