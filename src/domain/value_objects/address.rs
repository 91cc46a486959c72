use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

const MIN_LENGTH: usize = 10;
const MAX_LENGTH: usize = 100;

/// A validated postal address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let value = value.trim().to_string();
        let length = value.chars().count();

        if length < MIN_LENGTH || length > MAX_LENGTH {
            return Err(ValidationError::AddressLength {
                actual: length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            });
        }

        for c in value.chars() {
            let allowed = c.is_ascii_alphanumeric()
                || c.is_whitespace()
                || matches!(c, ',' | '.' | '\'' | '-');
            if !allowed {
                return Err(ValidationError::InvalidAddressCharacter(c));
            }
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
