use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Maximum package weight in hundredths of a kilogram (1000 kg)
const MAX_WEIGHT_HUNDREDTHS: u64 = 100_000;

/// Round a decimal amount to whole hundredths, rejecting non-positive results
fn to_hundredths(field: &str, value: f64) -> Result<u64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    let hundredths = (value * 100.0).round();
    if hundredths < 1.0 {
        return Err(ValidationError::NotPositive {
            field: field.to_string(),
            value,
        });
    }

    Ok(hundredths as u64)
}

/// Package weight in kilograms, stored with two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(u64);

impl Weight {
    pub fn from_kilograms(value: f64) -> Result<Self, ValidationError> {
        let hundredths = to_hundredths("weight", value)?;
        if hundredths > MAX_WEIGHT_HUNDREDTHS {
            return Err(ValidationError::AboveMaximum {
                field: "weight".to_string(),
                value,
                max: (MAX_WEIGHT_HUNDREDTHS / 100) as f64,
            });
        }
        Ok(Self(hundredths))
    }

    pub fn hundredths(&self) -> u64 {
        self.0
    }

    pub fn kilograms(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl TryFrom<f64> for Weight {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_kilograms(value)
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> Self {
        weight.kilograms()
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02} kg", self.0 / 100, self.0 % 100)
    }
}

/// Package price, stored with two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(u64);

impl Price {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        to_hundredths("price", value).map(Self)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn amount(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl TryFrom<f64> for Price {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.amount()
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_is_normalized() {
        let weight = Weight::from_kilograms(2.456).unwrap();
        assert_eq!(weight.hundredths(), 246);
        assert_eq!(weight.to_string(), "2.46 kg");
        assert_eq!(Weight::from_kilograms(1000.0).unwrap().hundredths(), 100_000);
    }

    #[test]
    fn test_weight_bounds() {
        assert!(Weight::from_kilograms(0.0).is_err());
        assert!(Weight::from_kilograms(-1.0).is_err());
        assert!(Weight::from_kilograms(0.001).is_err());
        assert!(Weight::from_kilograms(1000.01).is_err());
        assert!(Weight::from_kilograms(f64::NAN).is_err());
    }

    #[test]
    fn test_price() {
        let price = Price::new(50.75).unwrap();
        assert_eq!(price.cents(), 5075);
        assert_eq!(price.to_string(), "$50.75");
        assert!(Price::new(0.0).is_err());
        assert!(Price::new(0.004).is_err());
    }

    #[test]
    fn test_serde_keeps_two_decimals() {
        let weight = Weight::from_kilograms(2.5).unwrap();
        let json = serde_json::to_string(&weight).unwrap();
        assert_eq!(json, "2.5");
        let back: Weight = serde_json::from_str(&json).unwrap();
        assert_eq!(back, weight);
    }
}
