//! Public types for the Mimir API.

mod classifier;
mod combination;
mod outcome;
mod request;
mod sample;

pub use classifier::{Classifier, ClassifierClass, ClassifierStatus};
pub use combination::Combination;
pub use outcome::{JobOutcome, ResultSet, TrainingResult};
pub use request::{
    DEFAULT_NEGATIVE_TOKENS, ExampleSlot, NEGATIVE_EXAMPLES_FIELD, SlotKind, TrainingRequest,
    is_negative_label,
};
pub use sample::{ARCHIVE_EXTENSION, SampleCategory, archive_path, scan_categories};
