use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 15;

/// A validated phone number, 10 to 15 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let value = value.trim().to_string();

        if let Some(c) = value.chars().find(|c| !c.is_ascii_digit()) {
            return Err(ValidationError::InvalidPhoneCharacter(c));
        }

        if value.len() < MIN_DIGITS || value.len() > MAX_DIGITS {
            return Err(ValidationError::PhoneLength {
                actual: value.len(),
                min: MIN_DIGITS,
                max: MAX_DIGITS,
            });
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_lengths() {
        assert!(PhoneNumber::new("1234567890".to_string()).is_ok());
        assert!(PhoneNumber::new("123456789012345".to_string()).is_ok());
        assert_eq!(
            PhoneNumber::new("123456789".to_string()),
            Err(ValidationError::PhoneLength {
                actual: 9,
                min: 10,
                max: 15
            })
        );
        assert!(PhoneNumber::new("1234567890123456".to_string()).is_err());
    }

    #[test]
    fn test_phone_characters() {
        assert_eq!(
            PhoneNumber::new("123-456-7890".to_string()),
            Err(ValidationError::InvalidPhoneCharacter('-'))
        );
    }
}
