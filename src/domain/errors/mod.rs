mod attachment_errors;
mod record_errors;
mod store_errors;
mod validation_errors;

pub use attachment_errors::*;
pub use record_errors::*;
pub use store_errors::*;
pub use validation_errors::*;
