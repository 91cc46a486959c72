mod address;
mod amount;
mod email;
mod identifier;
mod person_name;
mod phone_number;
mod record_key;

pub use address::Address;
pub use amount::{Price, Weight};
pub use email::EmailAddress;
pub use identifier::{Identifier, IdentifierBlock};
pub use person_name::{PersonName, PlaceName};
pub use phone_number::PhoneNumber;
pub use record_key::RecordKey;
