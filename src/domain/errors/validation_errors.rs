/// Validation errors for domain value objects and entity details
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required text field was empty or whitespace only
    Required { field: String },

    // Name validation errors
    InvalidName {
        field: String,
        value: String,
    },

    // Email validation errors
    InvalidEmail(String),

    // Phone validation errors
    InvalidPhoneCharacter(char),
    PhoneLength {
        actual: usize,
        min: usize,
        max: usize,
    },

    // Address validation errors
    AddressLength {
        actual: usize,
        min: usize,
        max: usize,
    },
    InvalidAddressCharacter(char),

    // Decimal amount validation errors
    NotPositive {
        field: String,
        value: f64,
    },
    AboveMaximum {
        field: String,
        value: f64,
        max: f64,
    },
    NotFinite {
        field: String,
    },

    // Package status validation errors
    UnknownStatus(String),

    /// Field cannot be changed through this operation
    ImmutableField { field: String },

    InvalidField {
        field: String,
        value: String,
        expected: String,
    },
}

impl ValidationError {
    /// Name of the field the error is about
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::InvalidName { field, .. }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::AboveMaximum { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::ImmutableField { field }
            | ValidationError::InvalidField { field, .. } => field,
            ValidationError::InvalidEmail(_) => "email",
            ValidationError::InvalidPhoneCharacter(_) | ValidationError::PhoneLength { .. } => {
                "phone"
            }
            ValidationError::AddressLength { .. } | ValidationError::InvalidAddressCharacter(_) => {
                "address"
            }
            ValidationError::UnknownStatus(_) => "status",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Required { field } => write!(f, "Field '{}' is required", field),

            ValidationError::InvalidName { field, value } => {
                write!(
                    f,
                    "'{}' is not a valid {}! Only letters and spaces are allowed",
                    value, field
                )
            }

            ValidationError::InvalidEmail(value) => {
                write!(f, "'{}' is not a valid email address", value)
            }

            ValidationError::InvalidPhoneCharacter(c) => {
                write!(f, "Invalid character in phone number: '{}'", c)
            }
            ValidationError::PhoneLength { actual, min, max } => {
                write!(
                    f,
                    "Phone number has {} digits, must be {} to {} digits long",
                    actual, min, max
                )
            }

            ValidationError::AddressLength { actual, min, max } => {
                write!(
                    f,
                    "Address has {} characters, must be between {} and {}",
                    actual, min, max
                )
            }
            ValidationError::InvalidAddressCharacter(c) => {
                write!(f, "Invalid character in address: '{}'", c)
            }

            ValidationError::NotPositive { field, value } => {
                write!(f, "{} must be a positive number, got {}", field, value)
            }
            ValidationError::AboveMaximum { field, value, max } => {
                write!(f, "{} must not exceed {}, got {}", field, max, value)
            }
            ValidationError::NotFinite { field } => {
                write!(f, "{} must be a finite number", field)
            }

            ValidationError::UnknownStatus(value) => {
                write!(
                    f,
                    "Unknown package status '{}' (expected: pending, in-transit, delivered, not-delivered)",
                    value
                )
            }

            ValidationError::ImmutableField { field } => {
                write!(f, "Field '{}' cannot be changed by a partial update", field)
            }

            ValidationError::InvalidField {
                field,
                value,
                expected,
            } => {
                write!(
                    f,
                    "Invalid value for field '{}': '{}' (expected: {})",
                    field, value, expected
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
