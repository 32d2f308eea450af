//! Air-quality sample model and the fixed AQI category table

use crate::SkypanelError;
use serde::{Deserialize, Serialize};

/// AQI category per the OpenWeatherMap air-pollution classification,
/// integer 1 (Good) to 5 (Very Poor).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AqiCategory {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiCategory {
    /// Convert the provider's 1-5 index into a category. Values outside
    /// 1-5 are rejected at this boundary rather than left undefined.
    pub fn from_index(index: i64) -> Result<Self, SkypanelError> {
        match index {
            1 => Ok(Self::Good),
            2 => Ok(Self::Fair),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::Poor),
            5 => Ok(Self::VeryPoor),
            other => Err(SkypanelError::validation(format!(
                "AQI category must be between 1 and 5, got: {other}"
            ))),
        }
    }

    /// The provider's numeric index for this category
    #[must_use]
    pub fn index(&self) -> u8 {
        match self {
            Self::Good => 1,
            Self::Fair => 2,
            Self::Moderate => 3,
            Self::Poor => 4,
            Self::VeryPoor => 5,
        }
    }

    /// Status label shown in the results panel
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }

    /// Background color for the AQI column
    #[must_use]
    pub fn display_color(&self) -> &'static str {
        match self {
            Self::Good => "#38a169",
            Self::Fair => "#d69e2e",
            Self::Moderate => "#dd6b20",
            Self::Poor => "#e53e3e",
            Self::VeryPoor => "#805ad5",
        }
    }
}

/// One air-quality observation
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct AirQualitySample {
    /// AQI category
    pub category: AqiCategory,
    /// PM2.5 concentration in μg/m³
    pub pm2_5: f64,
    /// PM10 concentration in μg/m³
    pub pm10: f64,
}

impl AirQualitySample {
    /// Format the PM2.5 field for the results panel
    #[must_use]
    pub fn format_pm2_5(&self) -> String {
        format!("PM2.5: {} μg/m³", self.pm2_5)
    }

    /// Format the PM10 field for the results panel
    #[must_use]
    pub fn format_pm10(&self) -> String {
        format!("PM10: {} μg/m³", self.pm10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, AqiCategory::Good, "Good", "#38a169")]
    #[case(2, AqiCategory::Fair, "Fair", "#d69e2e")]
    #[case(3, AqiCategory::Moderate, "Moderate", "#dd6b20")]
    #[case(4, AqiCategory::Poor, "Poor", "#e53e3e")]
    #[case(5, AqiCategory::VeryPoor, "Very Poor", "#805ad5")]
    fn test_category_table(
        #[case] index: i64,
        #[case] expected: AqiCategory,
        #[case] label: &str,
        #[case] color: &str,
    ) {
        let category = AqiCategory::from_index(index).unwrap();
        assert_eq!(category, expected);
        assert_eq!(category.index() as i64, index);
        assert_eq!(category.status_label(), label);
        assert_eq!(category.display_color(), color);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    #[case(100)]
    fn test_out_of_range_index_rejected(#[case] index: i64) {
        assert!(AqiCategory::from_index(index).is_err());
    }

    #[test]
    fn test_pollutant_formatting() {
        let sample = AirQualitySample {
            category: AqiCategory::Fair,
            pm2_5: 12.3,
            pm10: 40.1,
        };
        assert_eq!(sample.format_pm2_5(), "PM2.5: 12.3 μg/m³");
        assert_eq!(sample.format_pm10(), "PM10: 40.1 μg/m³");
    }
}
