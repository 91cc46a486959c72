pub mod attachment;
pub mod bulk;
pub mod entity;
pub mod package;
pub mod query;
pub mod recipient;

pub use attachment::*;
pub use bulk::*;
pub use entity::*;
pub use package::{Package, PackageChanges, PackageDetails, PackageDraft, PackagePatch, PackageStatus};
pub use query::*;
pub use recipient::{Recipient, RecipientChanges, RecipientDetails, RecipientDraft, RecipientPatch};
