pub mod correspondence;
pub mod enums;
pub mod error;
pub mod ids;
pub mod records;
pub mod scheme;

pub use correspondence::{Association, Correspondence};
pub use enums::{MatchKind, NoteKind, Side};
pub use error::{ModelError, Result};
pub use ids::{ClassificationVersion, FamilyCode, Identifier, VersionLabel};
pub use records::{CorrespondenceRecord, DEFAULT_LANGUAGE, ItemRecord, LabelRecord};
pub use scheme::{Item, ItemArena, Label, Level, Note, Scheme, add_label_if_absent};
