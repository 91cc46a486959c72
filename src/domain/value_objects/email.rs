use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// A validated email address of the form `local@domain.tld`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ValidationError::Required {
                field: "email".to_string(),
            });
        }

        if value.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidEmail(value));
        }

        let mut parts = value.split('@');
        let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => (local, domain),
            _ => return Err(ValidationError::InvalidEmail(value)),
        };

        // Domain needs a dot with something on both sides
        let dotted = domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());

        if local.is_empty() || !dotted {
            return Err(ValidationError::InvalidEmail(value));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(EmailAddress::new("john.doe@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("a@b.io".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert!(EmailAddress::new("".to_string()).is_err());
        assert!(EmailAddress::new("john.doe".to_string()).is_err());
        assert!(EmailAddress::new("john@doe@example.com".to_string()).is_err());
        assert!(EmailAddress::new("@example.com".to_string()).is_err());
        assert!(EmailAddress::new("john@example".to_string()).is_err());
        assert!(EmailAddress::new("john@.com".to_string()).is_err());
        assert!(EmailAddress::new("john doe@example.com".to_string()).is_err());
    }
}
